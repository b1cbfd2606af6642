use predicates::prelude::*;

use super::common::TestEnv;

fn commit(env: &TestEnv, script: &str) {
  env.cmd().args(["edit", "--force"]).write_stdin(script).assert().success();
}

#[test]
fn commit_writes_backup_of_previous_values() {
  let env = TestEnv::with_scopes(r"C:\A;C:\B", r"C:\U");
  commit(&env, "delete system 0\ncommit\n");

  let output = env.cmd().args(["backup", "list", "-o", "json"]).output().unwrap();
  assert!(output.status.success());
  let list: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let records = list.as_array().unwrap();
  assert_eq!(records.len(), 1);
  assert_eq!(records[0]["values"]["system"], r"C:\A;C:\B");
  assert_eq!(records[0]["values"]["user"], r"C:\U");
  assert_eq!(records[0]["values"]["session"], r"C:\A;C:\B;C:\U");

  let id = records[0]["id"].as_str().unwrap();
  env
    .cmd()
    .args(["backup", "show", id])
    .assert()
    .success()
    .stdout(predicate::str::contains(r"[0] C:\A"))
    .stdout(predicate::str::contains(r"[1] C:\B"));
}

#[test]
fn backups_accumulate_newest_first() {
  let env = TestEnv::with_scopes(r"C:\A;C:\B", r"C:\U");
  commit(&env, "delete system 0\ncommit\n");
  commit(&env, "add user C:\\U2\ncommit\n");

  let output = env.cmd().args(["backup", "list", "-o", "json"]).output().unwrap();
  let list: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let records = list.as_array().unwrap();
  assert_eq!(records.len(), 2);
  assert_eq!(records[0]["values"]["system"], r"C:\B");
  assert_eq!(records[1]["values"]["system"], r"C:\A;C:\B");

  env
    .cmd()
    .args(["backup", "list"])
    .assert()
    .success()
    .stdout(predicate::str::contains("2 backup(s)"));
}
