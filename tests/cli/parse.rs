use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{CUSTOMER_KTR, CliTest, LOAD_KJB, REGISTRY_PATH, stderr, stdout};

const DIRECTORY: &str = "queries/dim_customer";
const OUTPUT: &str = "dimensions/dim_customer/metadata/pentaho_raw.json";

fn customer_project() -> Result<CliTest> {
    let test = CliTest::with_file("queries/dim_customer/d_customer.ktr", CUSTOMER_KTR)?;
    test.write_file("queries/dim_customer/load_customer.kjb", LOAD_KJB)?;
    test.write_file("queries/dim_customer/README.md", "not a candidate")?;
    test.init_registry()?;
    Ok(test)
}

#[test]
fn test_parse_extracts_transformation() -> Result<()> {
    let test = customer_project()?;

    let output = test.parse_command(DIRECTORY).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Found 1 transformation(s) and 1 job(s)"));
    assert!(out.contains("parsed transformation d_customer.ktr"));
    assert!(out.contains("parsed job load_customer.kjb"));
    assert!(out.contains("Summary: 2 newly parsed, 0 skipped (already in registry), 0 failed"));

    let document = test.read_json(OUTPUT)?;
    let files = document["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);

    let transformation = &files[0];
    assert_eq!(transformation["file_name"], "d_customer.ktr");
    assert_eq!(transformation["file_type"], "transformation");
    assert_eq!(transformation["level"], "dimension");
    assert_eq!(transformation["transformation_name"], "d_customer");
    assert_eq!(transformation["tables_input"], json!(["STG_CUST"]));
    assert_eq!(transformation["tables_output"], json!(["DIM_CUSTOMER"]));
    assert_eq!(transformation["variables"], json!(["ENV_NAME"]));
    assert_eq!(
        transformation["sql_queries"],
        json!(["SELECT id, name FROM STG_CUST"])
    );
    assert_eq!(
        transformation["steps"][1],
        json!({
            "step_name": "Write dimension",
            "step_type": "TableOutput",
            "connection": "DWH",
            "table_name": "DIM_CUSTOMER",
            "truncate": true,
            "commit_size": "1000"
        })
    );
    assert_eq!(
        transformation["statistics"],
        json!({ "total_steps": 2, "sql_steps": 1, "estimated_complexity": "low" })
    );

    let job = &files[1];
    assert_eq!(job["file_type"], "job");
    assert_eq!(job["level"], json!(null));
    assert_eq!(job["transformations_called"], json!(["d_customer.ktr"]));

    let registry = test.read_json(REGISTRY_PATH)?;
    let entry = &registry["parsed_files"]["d_customer.ktr"];
    assert_eq!(entry["dimension"], "dim_customer");
    assert_eq!(entry["hash"].as_str().map(str::len), Some(32));
    assert!(registry["last_updated"].is_string());
    assert_eq!(registry["statistics"]["total_pentaho_files"], 2);

    Ok(())
}

#[test]
fn test_rerun_skips_unchanged_files() -> Result<()> {
    let test = customer_project()?;

    let first = test.parse_command(DIRECTORY).output()?;
    assert!(first.status.success(), "stderr: {}", stderr(&first));
    let first_output = test.read_file(OUTPUT)?;

    insta::with_settings!({ filters => test.root_filters().iter().map(|(p, r)| (p.as_str(), *r)).collect::<Vec<_>>() }, {
        assert_cmd_snapshot!(test.parse_command(DIRECTORY), @r"
        success: true
        exit_code: 0
        ----- stdout -----
        Parsing Pentaho files in: queries/dim_customer
        ------------------------------------------------------------
        Found 1 transformation(s) and 1 job(s)
        - skipped d_customer.ktr (already parsed)
        - skipped load_customer.kjb (already parsed)

        Summary: 0 newly parsed, 2 skipped (already in registry), 0 failed
        ✓ All files already parsed and in registry. No new files to process.
        ✓ Registry updated: [ROOT]/config/migration_registry.json

        ----- stderr -----
        ");
    });

    // Nothing new, so the previous document is left as it was.
    assert_eq!(test.read_file(OUTPUT)?, first_output);

    Ok(())
}

#[test]
fn test_changed_file_is_parsed_again() -> Result<()> {
    let test = customer_project()?;
    test.parse_command(DIRECTORY).output()?;

    test.write_file(
        "queries/dim_customer/d_customer.ktr",
        &CUSTOMER_KTR.replace("Customer dimension", "Customer dimension v2"),
    )?;

    let output = test.parse_command(DIRECTORY).output()?;
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Summary: 1 newly parsed, 1 skipped (already in registry), 0 failed"));

    let document = test.read_json(OUTPUT)?;
    assert_eq!(document["files"].as_array().map(Vec::len), Some(1));
    assert_eq!(document["files"][0]["description"], "Customer dimension v2");

    Ok(())
}

#[test]
fn test_malformed_file_fails_run() -> Result<()> {
    let test = CliTest::with_file("jobs/broken.ktr", "<transformation><info>")?;

    let output = test.parse_command("jobs").output()?;
    assert_eq!(output.status.code(), Some(1));

    let err = stderr(&output);
    assert!(err.contains("error broken.ktr"), "stderr: {}", err);
    assert!(err.contains("No files were successfully parsed (1 of 1 failed)"));
    assert!(!test.root().join("jobs/metadata").exists());

    Ok(())
}

#[test]
fn test_malformed_file_does_not_stop_batch() -> Result<()> {
    let test = CliTest::with_file("etl/a_broken.ktr", "<transformation>")?;
    test.write_file("etl/f_sales.ktr", CUSTOMER_KTR)?;

    let output = test.parse_command("etl").output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("error a_broken.ktr"));

    let document = test.read_json("etl/metadata/pentaho_raw.json")?;
    assert_eq!(document["files"][0]["file_name"], "f_sales.ktr");
    assert_eq!(document["files"][0]["level"], "fact");

    Ok(())
}

#[test]
fn test_empty_directory_fails_run() -> Result<()> {
    let test = CliTest::new()?;
    std::fs::create_dir(test.root().join("empty"))?;

    let output = test.parse_command("empty").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("No .ktr or .kjb files found"));

    Ok(())
}

#[test]
fn test_missing_directory() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.parse_command("nowhere").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("does not exist"));

    Ok(())
}

#[test]
fn test_output_override_and_explicit_registry() -> Result<()> {
    let test = CliTest::with_file("src/d_customer.ktr", CUSTOMER_KTR)?;

    let output = test
        .parse_command("src")
        .args(["--output", "out/meta.json", "--registry", "state/registry.json"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let document = test.read_json("out/meta.json")?;
    assert_eq!(document["files"][0]["file_name"], "d_customer.ktr");

    let registry = test.read_json("state/registry.json")?;
    assert_eq!(registry["parsed_files"]["d_customer.ktr"]["dimension"], "unknown");

    Ok(())
}

#[test]
fn test_unwritable_registry_only_warns() -> Result<()> {
    let test = CliTest::with_file("src/d_customer.ktr", CUSTOMER_KTR)?;
    std::fs::create_dir_all(test.root().join("state/registry.json"))?;

    let output = test
        .parse_command("src")
        .args(["--registry", "state/registry.json"])
        .output()?;
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let document = test.read_json("src/metadata/pentaho_raw.json")?;
    assert_eq!(document["files"][0]["file_name"], "d_customer.ktr");
    assert!(stderr(&output).contains("could not save registry"));

    Ok(())
}

#[test]
fn test_registry_from_environment() -> Result<()> {
    let test = CliTest::with_file("src/d_customer.ktr", CUSTOMER_KTR)?;

    let output = test
        .parse_command("src")
        .env("PENTAHO_META_REGISTRY", "env-registry.json")
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(test.root().join("env-registry.json").exists());

    Ok(())
}

#[test]
fn test_corrupt_registry_is_replaced() -> Result<()> {
    let test = CliTest::with_file("src/d_customer.ktr", CUSTOMER_KTR)?;
    test.write_file(REGISTRY_PATH, "{ definitely not json")?;

    let output = test.parse_command("src").output()?;
    assert!(output.status.success());
    assert!(stderr(&output).contains("could not read registry"));

    let registry = test.read_json(REGISTRY_PATH)?;
    assert!(registry["parsed_files"]["d_customer.ktr"].is_object());

    Ok(())
}

#[test]
fn test_without_registry_every_run_parses() -> Result<()> {
    let test = CliTest::with_file("src/d_customer.ktr", CUSTOMER_KTR)?;

    for _ in 0..2 {
        let output = test.parse_command("src").output()?;
        assert!(output.status.success());
        assert!(stdout(&output).contains("Summary: 1 newly parsed"));
    }

    Ok(())
}
