//! Command-line interface layer.

use anyhow::Result;

mod args;
mod commands;
mod exit_status;
mod logging;
pub mod report;
mod run;

pub use args::{Arguments, Command, InitCommand, ParseCommand, RegistryArgs, StatusCommand};
pub use exit_status::ExitStatus;
pub use logging::init_logging;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    run::run(args)
}
