use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Ok, Result};
use insta_cmd::get_cargo_bin;
use serde_json::Value;
use tempfile::TempDir;

mod init;
mod parse;
mod status;

const BIN_NAME: &str = "pentaho-meta";

pub const REGISTRY_PATH: &str = "config/migration_registry.json";

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    pub fn with_file(path: &str, content: &str) -> Result<Self> {
        let test = Self::new()?;
        test.write_file(path, content)?;
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    /// Snapshot filters that replace the temporary project path with `[ROOT]`.
    pub fn root_filters(&self) -> Vec<(String, &'static str)> {
        let root = self.project_dir.display().to_string();
        vec![(regex::escape(&root), "[ROOT]")]
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    pub fn parse_command(&self, directory: &str) -> Command {
        let mut cmd = self.command();
        cmd.arg("parse").arg(directory);
        cmd
    }

    pub fn init_registry(&self) -> Result<()> {
        let output = self.command().arg("init").output()?;
        assert!(output.status.success(), "init failed: {}", stderr(&output));
        Ok(())
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }

    pub fn read_json(&self, path: &str) -> Result<Value> {
        let content = self.read_file(path)?;
        serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path))
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

pub const CUSTOMER_KTR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<transformation>
  <info>
    <name>d_customer</name>
    <description>Customer dimension</description>
  </info>
  <parameters>
    <parameter><name>ENV</name><default_value>${ENV_NAME}</default_value></parameter>
  </parameters>
  <step>
    <name>Read staging</name>
    <type>TableInput</type>
    <connection>STAGE</connection>
    <table>STG_CUST</table>
    <sql>
      SELECT id, name FROM STG_CUST
    </sql>
  </step>
  <step>
    <name>Write dimension</name>
    <type>TableOutput</type>
    <connection>DWH</connection>
    <schema/>
    <table>DIM_CUSTOMER</table>
    <truncate>Y</truncate>
    <commit>1000</commit>
  </step>
</transformation>
"#;

pub const LOAD_KJB: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<job>
  <name>Load customer</name>
  <entries>
    <entry><name>START</name><type>SPECIAL</type></entry>
    <entry><name>Customer</name><type>TRANS</type><filename>d_customer.ktr</filename></entry>
  </entries>
</job>
"#;
