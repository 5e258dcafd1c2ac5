use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `skillagent` command isolated from the developer's own config and keys
fn skillagent(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("skillagent").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("OPENAI_API_KEY")
        .env_remove("OPENAI_BASE_URL")
        .env_remove("OPENAI_MODEL")
        .env_remove("SKILLAGENT_MODEL")
        .env_remove("SKILLAGENT_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn tools_lists_echo_tool() {
    let home = TempDir::new().unwrap();
    skillagent(&home)
        .arg("tools")
        .assert()
        .success()
        .stdout("EchoTool: Echoes the input text.\n");
}

#[test]
fn missing_credential_fails_before_answering() {
    let home = TempDir::new().unwrap();
    skillagent(&home)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Agent response").not())
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn empty_key_in_config_file_fails() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("skillagent.json"), r#"{"api_key": ""}"#).unwrap();

    skillagent(&home)
        .arg("What is Rust?")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required field: api_key"));
}

#[test]
fn question_and_subcommand_conflict() {
    let home = TempDir::new().unwrap();
    skillagent(&home)
        .args(["tools", "extra"])
        .assert()
        .failure();
}

#[test]
fn version_flag() {
    let home = TempDir::new().unwrap();
    skillagent(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("skillagent "));
}
