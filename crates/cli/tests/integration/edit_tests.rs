use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn delete_and_commit_updates_store() {
  let env = TestEnv::with_scopes(r"C:\A;C:\B", r"C:\U");

  env
    .cmd()
    .args(["edit", "--force"])
    .write_stdin("delete system 0\ncommit\n")
    .assert()
    .success()
    .stdout(predicate::str::contains(r"Removed C:\A from System"))
    .stdout(predicate::str::contains("System PATH updated (1 entry)"));

  assert_eq!(env.stored("system"), r"C:\B");
  assert_eq!(env.stored("user"), r"C:\U");
  assert_eq!(env.backup_count(), 1);
}

#[test]
fn commit_shows_diff_before_applying() {
  let env = TestEnv::with_scopes(r"C:\A;C:\B", r"C:\U");

  env
    .cmd()
    .args(["edit", "--force"])
    .write_stdin("add user C:\\Program Files\\Tool\nup system 1\ncommit\n")
    .assert()
    .success()
    .stdout(predicate::str::contains(r"+ C:\Program Files\Tool"))
    .stdout(predicate::str::contains("order changed"));

  assert_eq!(env.stored("system"), r"C:\B;C:\A");
  assert_eq!(env.stored("user"), r"C:\U;C:\Program Files\Tool");
}

#[test]
fn commit_without_force_is_not_confirmed() {
  let env = TestEnv::with_scopes(r"C:\A;C:\B", r"C:\U");
  let before = std::fs::read_to_string(env.store_path()).unwrap();

  env
    .cmd()
    .arg("edit")
    .write_stdin("delete system 0\ncommit\n")
    .assert()
    .failure()
    .stderr(predicate::str::contains("--force"));

  assert_eq!(std::fs::read_to_string(env.store_path()).unwrap(), before);
  assert_eq!(env.backup_count(), 0);
}

#[test]
fn cancel_changes_nothing() {
  let env = TestEnv::with_scopes(r"C:\A;C:\B", r"C:\U");
  let before = std::fs::read_to_string(env.store_path()).unwrap();

  env
    .cmd()
    .args(["edit", "--force"])
    .write_stdin("delete system 0\nadd user C:\\X\ncancel\ncommit\n")
    .assert()
    .success()
    .stdout(predicate::str::contains("Cancelled"));

  assert_eq!(std::fs::read_to_string(env.store_path()).unwrap(), before);
  assert_eq!(env.backup_count(), 0);
}

#[test]
fn identity_edits_commit_nothing() {
  let env = TestEnv::with_scopes(r"C:\A;C:\B", r"C:\U");

  env
    .cmd()
    .args(["edit", "--force"])
    .write_stdin("up system 1\nup system 1\ncommit\n")
    .assert()
    .success()
    .stdout(predicate::str::contains("No changes to commit"));

  assert_eq!(env.backup_count(), 0);
}

#[test]
fn out_of_range_index_aborts_script() {
  let env = TestEnv::with_scopes(r"C:\A;C:\B", r"C:\U");
  let before = std::fs::read_to_string(env.store_path()).unwrap();

  env
    .cmd()
    .args(["edit", "--force"])
    .write_stdin("add user C:\\X\ndelete system 7\ncommit\n")
    .assert()
    .failure()
    .stderr(predicate::str::contains("index 7 is out of range"));

  assert_eq!(std::fs::read_to_string(env.store_path()).unwrap(), before);
}

#[test]
fn unknown_command_aborts_script() {
  let env = TestEnv::with_scopes(r"C:\A", r"C:\U");

  env
    .cmd()
    .args(["edit", "--force"])
    .write_stdin("frobnicate\ncommit\n")
    .assert()
    .failure()
    .stderr(predicate::str::contains("line 1"));
}

#[test]
fn session_scope_is_reported_as_process_only() {
  let env = TestEnv::with_scopes(r"C:\A", r"C:\U");

  env
    .cmd()
    .args(["edit", "--force"])
    .write_stdin("delete session 2\ncommit\n")
    .assert()
    .success()
    .stdout(predicate::str::contains("Session PATH updated for this process only"));

  assert_eq!(env.stored("system"), r"C:\A");
  assert_eq!(env.stored("user"), r"C:\U");
}

#[test]
fn script_file_is_used_instead_of_stdin() {
  let env = TestEnv::with_scopes(r"C:\A;C:\B", r"C:\U");
  let script = env.temp.path().join("edits.txt");
  std::fs::write(&script, "# move B first\ndown system 0\ncommit\n").unwrap();

  env
    .cmd()
    .args(["edit", "--force", "--script"])
    .arg(&script)
    .assert()
    .success();

  assert_eq!(env.stored("system"), r"C:\B;C:\A");
}

#[test]
fn readonly_store_reports_failed_scope() {
  let env = TestEnv::with_scopes(r"C:\A", r"C:\U");
  // A directory where the temp file would go makes the save fail.
  std::fs::create_dir_all(env.temp.path().join("scopes.json.tmp")).unwrap();

  env
    .cmd()
    .args(["edit", "--force"])
    .write_stdin("add system C:\\S\ncommit\n")
    .assert()
    .failure()
    .stderr(predicate::str::contains("System PATH was not changed"))
    .stderr(predicate::str::contains("1 of 1 scope(s) failed"));

  assert_eq!(env.stored("system"), r"C:\A");
  assert_eq!(env.backup_count(), 1);
}
