//! Integration tests for the CredVault CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.
//! The master password is supplied through `CREDVAULT_PASSWORD` and
//! credential passwords through stdin, so no terminal is needed.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const MASTER: &str = "correct-horse";

/// Fast Argon2 settings so each invocation stays quick.
const FAST_CONFIG: &str = "argon2_memory_kib = 8192\nargon2_iterations = 1\nargon2_parallelism = 1\n";

/// Helper: get a Command pointing at the credvault binary.
fn credvault() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("credvault").expect("binary should exist");
    cmd.env_remove("CREDVAULT_FILE")
        .env_remove("CREDVAULT_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// A temp dir with a fast config file, and a command running inside it.
fn workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    tmp.child(".credvault.toml").write_str(FAST_CONFIG).unwrap();
    tmp
}

fn in_workspace(tmp: &TempDir) -> Command {
    let mut cmd = credvault();
    cmd.current_dir(tmp.path()).env("CREDVAULT_PASSWORD", MASTER);
    cmd
}

fn add(tmp: &TempDir, service: &str, username: &str, password: &str) {
    in_workspace(tmp)
        .args(["add", service, "-u", username])
        .write_stdin(format!("{password}\n"))
        .assert()
        .success();
}

#[test]
fn help_flag_shows_usage() {
    credvault()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Encrypted local password manager"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("shell"));
}

#[test]
fn version_flag_shows_version() {
    credvault()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("credvault"));
}

#[test]
fn no_args_shows_help() {
    credvault()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn generate_prints_password_of_requested_length() {
    let tmp = TempDir::new().unwrap();
    let output = credvault()
        .current_dir(tmp.path())
        .args(["generate", "--length", "20"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let password = stdout.trim_end_matches('\n');
    assert_eq!(password.chars().count(), 20);
    assert!(password.chars().all(|c| c.is_ascii_graphic()));
}

#[test]
fn generate_zero_length_fails() {
    let tmp = TempDir::new().unwrap();
    credvault()
        .current_dir(tmp.path())
        .args(["generate", "--length", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid length"));
}

#[test]
fn add_get_list_delete_flow() {
    let tmp = workspace();
    add(&tmp, "github.com", "alice", "p@ss1");
    tmp.child("passwords.vault").assert(predicate::path::exists());

    in_workspace(&tmp)
        .args(["get", "github.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("p@ss1"));

    add(&tmp, "gitlab.com", "bob", "hunter2");
    in_workspace(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("github.com"))
        .stdout(predicate::str::contains("gitlab.com"))
        .stdout(predicate::str::contains("p@ss1").not());

    in_workspace(&tmp)
        .args(["delete", "github.com", "--force"])
        .assert()
        .success();

    in_workspace(&tmp)
        .args(["get", "github.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No credentials stored"));
}

#[test]
fn add_with_generate_reports_the_password() {
    let tmp = workspace();
    in_workspace(&tmp)
        .args(["add", "example.org", "-u", "carol", "--length", "24"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Generated password"));
}

#[test]
fn empty_piped_password_generates_one() {
    let tmp = workspace();
    in_workspace(&tmp)
        .args(["add", "svc", "-u", "bob"])
        .write_stdin("\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Generated password"));

    let output = in_workspace(&tmp).args(["get", "svc"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let password = stdout
        .lines()
        .find_map(|line| line.strip_prefix("Password: "))
        .expect("password line");
    assert_eq!(password.chars().count(), 16);
}

#[test]
fn vault_flag_selects_another_file() {
    let tmp = workspace();
    in_workspace(&tmp)
        .args(["--vault", "work.vault", "add", "jira", "-u", "me", "--generate"])
        .assert()
        .success();

    tmp.child("work.vault").assert(predicate::path::exists());
    tmp.child("passwords.vault").assert(predicate::path::missing());
}

#[test]
fn get_on_missing_vault_fails() {
    let tmp = workspace();
    in_workspace(&tmp)
        .args(["get", "github.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Vault not found"));

    tmp.child("passwords.vault").assert(predicate::path::missing());
}

#[test]
fn wrong_password_fails() {
    let tmp = workspace();
    add(&tmp, "github.com", "alice", "p@ss1");

    in_workspace(&tmp)
        .env("CREDVAULT_PASSWORD", "not-the-password")
        .args(["get", "github.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authentication failed"))
        .stdout(predicate::str::contains("p@ss1").not());
}

#[test]
fn short_master_password_cannot_create_a_vault() {
    let tmp = workspace();
    in_workspace(&tmp)
        .env("CREDVAULT_PASSWORD", "short")
        .args(["add", "github.com", "-u", "alice", "--generate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));

    tmp.child("passwords.vault").assert(predicate::path::missing());
}

#[test]
fn garbage_vault_is_reported_as_invalid() {
    let tmp = workspace();
    tmp.child("passwords.vault").write_binary(&[0u8; 128]).unwrap();

    in_workspace(&tmp)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid vault format"));
}

#[test]
fn bad_config_file_is_reported() {
    let tmp = TempDir::new().unwrap();
    tmp.child(".credvault.toml").write_str("not valid {{toml").unwrap();

    credvault()
        .current_dir(tmp.path())
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file error"));
}

#[test]
fn completions_unknown_shell_is_rejected() {
    credvault()
        .args(["completions", "csh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn completions_bash_generates_script() {
    credvault()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("credvault"));
}
