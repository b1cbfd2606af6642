use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn show_lists_entries_with_indexes() {
  let env = TestEnv::with_scopes(r"C:\A;;C:\B;", r"C:\U");

  env
    .cmd()
    .arg("show")
    .assert()
    .success()
    .stdout(predicate::str::contains("System (2 entries)"))
    .stdout(predicate::str::contains(r"[0] C:\A"))
    .stdout(predicate::str::contains(r"[1] C:\B"))
    .stdout(predicate::str::contains("User (1 entry)"))
    .stdout(predicate::str::contains("Session (3 entries)"));
}

#[test]
fn show_single_scope_as_json() {
  let env = TestEnv::with_scopes(r"C:\A;C:\B", r"C:\U1;C:\U2");

  let output = env
    .cmd()
    .args(["show", "--scope", "user", "-o", "json"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(
    json,
    serde_json::json!([{ "scope": "user", "entries": [r"C:\U1", r"C:\U2"] }])
  );
}

#[test]
fn corrupt_store_fails_to_load() {
  let env = TestEnv::empty();
  std::fs::write(env.store_path(), "not json").unwrap();

  env
    .cmd()
    .arg("show")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load the System scope"));
}
