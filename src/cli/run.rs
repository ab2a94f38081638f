use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{init::init, parse::parse, status::status},
    exit_status::ExitStatus,
};

/// Dispatch to the handler for the parsed command.
pub fn run(Arguments { command }: Arguments) -> Result<ExitStatus> {
    match command {
        Some(Command::Parse(cmd)) => parse(cmd),
        Some(Command::Status(cmd)) => status(cmd),
        Some(Command::Init(cmd)) => init(cmd),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
