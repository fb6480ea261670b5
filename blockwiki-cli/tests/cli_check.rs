use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn check_accepts_layered_config() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    fs::write(
        dir.path().join("config.example.yml"),
        r#"
notion:
  secret: secret_YOUR_NOTION_INTEGRATION_SECRET
  database_id: YOUR_NOTION_DATABASE_ID
output_dir: build
default_icon: "💡"
"#,
    )?;
    fs::write(
        dir.path().join("config.yml"),
        r#"
notion:
  secret: secret_test
  database_id: 0123456789abcdef0123456789abcdef
"#,
    )?;

    #[allow(deprecated)]
    Command::cargo_bin("blockwiki")?
        .current_dir(dir.path())
        .env_remove("BLOCKWIKI_NOTION_SECRET")
        .arg("check")
        .assert()
        .success();

    Ok(())
}

#[test]
fn check_rejects_placeholder_secret() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    fs::write(
        dir.path().join("config.example.yml"),
        r#"
notion:
  secret: secret_YOUR_NOTION_INTEGRATION_SECRET
  database_id: 0123456789abcdef0123456789abcdef
"#,
    )?;

    #[allow(deprecated)]
    Command::cargo_bin("blockwiki")?
        .current_dir(dir.path())
        .env_remove("BLOCKWIKI_NOTION_SECRET")
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));

    Ok(())
}

#[test]
fn secret_from_environment_is_used() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    fs::write(
        dir.path().join("config.yml"),
        r#"
notion:
  database_id: 0123456789abcdef0123456789abcdef
"#,
    )?;

    #[allow(deprecated)]
    Command::cargo_bin("blockwiki")?
        .current_dir(dir.path())
        .env("BLOCKWIKI_NOTION_SECRET", "secret_from_env")
        .arg("check")
        .assert()
        .success();

    Ok(())
}

#[test]
fn missing_config_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    #[allow(deprecated)]
    Command::cargo_bin("blockwiki")?
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));

    Ok(())
}
