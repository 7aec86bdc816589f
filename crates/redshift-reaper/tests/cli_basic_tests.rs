use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test command
fn reaper() -> Command {
    let mut cmd = Command::cargo_bin("redshift-reaper").unwrap();
    cmd.env_remove("REDSHIFT_REAPER_PROFILE")
        .env_remove("REDSHIFT_REAPER_CONFIG_FILE")
        .env_remove("RUST_LOG");
    cmd
}

/// Command bound to a config file inside `dir`
fn reaper_with_config(dir: &TempDir) -> Command {
    let mut cmd = reaper();
    cmd.arg("--config-file").arg(dir.path().join("config.toml"));
    cmd
}

#[test]
fn test_help_flag() {
    reaper()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Delete aged Amazon Redshift resources"))
        .stdout(predicate::str::contains("EXAMPLES:"));
}

#[test]
fn test_version_flag() {
    reaper()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("redshift-reaper"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_args_shows_help() {
    reaper()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_subcommand() {
    reaper()
        .arg("invalid-command")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_nuke_help() {
    reaper()
        .args(["nuke", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--older-than"))
        .stdout(predicate::str::contains("--required-tag"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_nuke_invalid_duration() {
    reaper()
        .args(["nuke", "--older-than", "soon"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("soon"));
}

#[test]
fn test_nuke_invalid_required_tag() {
    reaper()
        .args(["nuke", "--older-than", "7d", "--required-tag", "novalue"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn test_nuke_invalid_kind() {
    reaper()
        .args(["nuke", "--older-than", "7d", "--kind", "warehouse"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_nuke_conflicting_thresholds() {
    reaper()
        .args(["nuke", "--older-than", "7d", "--before", "1700000000"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_nuke_without_threshold_fails() {
    let dir = TempDir::new().unwrap();
    reaper_with_config(&dir)
        .arg("nuke")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No age threshold"));
}

#[test]
fn test_nuke_with_missing_profile_fails() {
    let dir = TempDir::new().unwrap();
    reaper_with_config(&dir)
        .args(["--profile", "ghost", "nuke", "--older-than", "7d"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Profile 'ghost' not found"));
}

#[test]
fn test_corrupt_config_file_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.toml"), "[[[broken").unwrap();
    reaper_with_config(&dir)
        .args(["profile", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_profile_help() {
    reaper()
        .args(["profile", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile management"));
}

#[test]
fn test_profile_path_uses_config_file() {
    let dir = TempDir::new().unwrap();
    reaper_with_config(&dir)
        .args(["profile", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_profile_list_empty() {
    let dir = TempDir::new().unwrap();
    reaper_with_config(&dir)
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No profiles configured"));
}

#[test]
fn test_profile_list_json_empty() {
    let dir = TempDir::new().unwrap();
    reaper_with_config(&dir)
        .args(["profile", "list", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 0"));
}

#[test]
fn test_profile_show_missing() {
    let dir = TempDir::new().unwrap();
    reaper_with_config(&dir)
        .args(["profile", "show", "ghost"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Profile 'ghost' not found"));
}

#[test]
fn test_profile_show_missing_name() {
    reaper()
        .args(["profile", "show"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_profile_set_then_show() {
    let dir = TempDir::new().unwrap();
    reaper_with_config(&dir)
        .args([
            "profile",
            "set",
            "sandbox",
            "--region",
            "eu-west-1",
            "--older-than",
            "7d",
            "--required-tag",
            "keep=true",
            "--kind",
            "snapshot",
            "--tag-failure",
            "preserve",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile 'sandbox' saved"));

    let written = fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(written.contains("default_profile = \"sandbox\""));
    assert!(written.contains("eu-west-1"));

    reaper_with_config(&dir)
        .args(["profile", "show", "sandbox", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"region\": \"eu-west-1\""))
        .stdout(predicate::str::contains("\"tag_failure\": \"preserve\""))
        .stdout(predicate::str::contains("\"keep\": \"true\""));

    reaper_with_config(&dir)
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sandbox"))
        .stdout(predicate::str::contains("(default)"));
}

#[test]
fn test_profile_set_rejects_bad_duration() {
    let dir = TempDir::new().unwrap();
    reaper_with_config(&dir)
        .args(["profile", "set", "sandbox", "--older-than", "later"])
        .assert()
        .failure()
        .code(2);
    assert!(!dir.path().join("config.toml").exists());
}

#[test]
fn test_profile_remove() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "default_profile = \"sandbox\"\n\n[profiles.sandbox]\nregion = \"eu-west-1\"\n",
    )
    .unwrap();

    reaper_with_config(&dir)
        .args(["profile", "remove", "sandbox"])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed"));

    let written = fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(!written.contains("sandbox"));

    reaper_with_config(&dir)
        .args(["profile", "remove", "sandbox"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_nuke_uses_profile_threshold_validation() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[profiles.sandbox]\nolder_than = \"whenever\"\n",
    )
    .unwrap();

    reaper_with_config(&dir)
        .arg("nuke")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("older_than"));
}

#[test]
fn test_nuke_rejects_overflowing_duration() {
    reaper()
        .args(["nuke", "--older-than", "213503982334602d"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("too large"));
}

#[test]
fn test_profile_edits_keep_env_references() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "default_profile = \"sandbox\"\n\n[profiles.sandbox]\nregion = \"${REAPER_TEST_REGION:-eu-west-1}\"\n",
    )
    .unwrap();

    reaper_with_config(&dir)
        .env("REAPER_TEST_REGION", "ap-south-1")
        .args(["profile", "set", "staging", "--older-than", "3d"])
        .assert()
        .success();

    reaper_with_config(&dir)
        .args(["profile", "default", "staging"])
        .assert()
        .success();

    let written = fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(written.contains("${REAPER_TEST_REGION:-eu-west-1}"), "{written}");
    assert!(!written.contains("ap-south-1"), "{written}");
    assert!(written.contains("default_profile = \"staging\""), "{written}");
}
