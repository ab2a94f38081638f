use anyhow::Result;

use crate::{CUSTOMER_KTR, CliTest, stderr, stdout};

#[test]
fn test_status_lists_parsed_files() -> Result<()> {
    let test = CliTest::with_file("queries/dim_customer/d_customer.ktr", CUSTOMER_KTR)?;
    test.init_registry()?;

    let parse = test.parse_command("queries/dim_customer").output()?;
    assert!(parse.status.success(), "stderr: {}", stderr(&parse));

    let output = test.command().arg("status").output()?;
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("(1 file)"), "stdout: {}", out);
    assert!(out.contains("d_customer.ktr  dim_customer  transformation"));
    assert!(out.contains("total_pentaho_files: 1"));

    Ok(())
}

#[test]
fn test_status_from_subdirectory() -> Result<()> {
    let test = CliTest::with_file("queries/dim_store/readme.txt", "")?;
    test.init_registry()?;

    let output = test
        .command()
        .args(["status", "queries/dim_store"])
        .output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("(0 files)"));

    Ok(())
}

#[test]
fn test_status_without_registry() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("status").output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("no config/migration_registry.json found"));

    Ok(())
}
