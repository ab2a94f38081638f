use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::{CliTest, REGISTRY_PATH, stdout};

/// Validates registry file structure and default values.
fn assert_registry_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Registry should be valid JSON")?;

    assert_eq!(parsed["version"], "1.0");
    assert!(parsed["last_updated"].is_null());
    assert!(
        parsed["parsed_files"].as_object().is_some_and(|m| m.is_empty()),
        "Registry should start with no parsed files"
    );
    assert!(parsed["migrated_tables"].is_object());
    for counter in [
        "total_dimensions",
        "total_pentaho_files",
        "total_tables",
        "completed_migrations",
        "pending_migrations",
    ] {
        assert_eq!(parsed["statistics"][counter], 0, "counter {}", counter);
    }

    assert!(
        content.contains("\n  \""),
        "Registry should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_registry() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created ./config/migration_registry.json

    ----- stderr -----
    ");

    assert!(test.root().join(REGISTRY_PATH).exists());
    assert_registry_content(&test.read_file(REGISTRY_PATH)?)?;

    Ok(())
}

#[test]
fn test_init_in_other_directory() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().args(["init", "migration"]).output()?;
    assert!(output.status.success());
    assert!(test.root().join("migration").join(REGISTRY_PATH).exists());

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(REGISTRY_PATH, "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    Error: ./config/migration_registry.json already exists
    ");
    assert_eq!(test.read_file(REGISTRY_PATH)?, "{}");

    Ok(())
}

#[test]
fn test_help_without_command() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().output()?;
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("parse"));
    assert!(out.contains("status"));
    assert!(out.contains("init"));

    Ok(())
}
