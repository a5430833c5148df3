use assert_cmd::Command;
use predicates::prelude::*;

fn lodestone() -> Command {
    let mut cmd = Command::cargo_bin("lodestone").unwrap();
    // Keep a developer's .env and shell settings out of the run.
    cmd.env_clear().current_dir(std::env::temp_dir());
    cmd
}

#[test]
fn help_lists_subcommands() {
    lodestone()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn serve_help_documents_bind() {
    lodestone()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--bind"))
        .stdout(predicate::str::contains("--database-url"));
}

#[test]
fn check_without_database_settings_fails() {
    lodestone()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL"));
}

#[test]
fn serve_with_bad_bind_env_fails() {
    lodestone()
        .arg("serve")
        .env("DATABASE_URL", "postgres://app:pw@127.0.0.1:1/app")
        .env("BIND_ADDR", "not-an-address")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid bind address"));
}
