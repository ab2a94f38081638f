use anyhow::Result;
use colored::Colorize;

use super::super::{args::InitCommand, exit_status::ExitStatus, report::SUCCESS_MARK};
use crate::{
    config::REGISTRY_RELATIVE_PATH,
    registry::{RegistryError, create_default},
};

pub fn init(cmd: InitCommand) -> Result<ExitStatus> {
    let registry_path = cmd.directory.join(REGISTRY_RELATIVE_PATH);

    match create_default(&registry_path) {
        Ok(()) => {
            println!(
                "{} {}",
                SUCCESS_MARK.green(),
                format!("Created {}", registry_path.display()).green()
            );
            Ok(ExitStatus::Success)
        }
        Err(RegistryError::AlreadyExists { path }) => {
            eprintln!("Error: {} already exists", path.display());
            Ok(ExitStatus::Failure)
        }
        Err(err) => Err(err.into()),
    }
}
