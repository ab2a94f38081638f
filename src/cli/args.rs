//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `parse`: Extract metadata from a directory of `.ktr`/`.kjb` files
//! - `status`: Show what the registry has recorded
//! - `init`: Create an empty registry file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's registry args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Parse(cmd)) => cmd.registry.verbose,
            Some(Command::Status(cmd)) => cmd.registry.verbose,
            Some(Command::Init(_)) | None => false,
        }
    }
}

/// Registry selection shared by commands that read the registry.
#[derive(Debug, Clone, Args)]
pub struct RegistryArgs {
    /// Registry file to use instead of searching parent directories
    #[arg(long, env = crate::config::REGISTRY_ENV_VAR)]
    pub registry: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ParseCommand {
    /// Directory containing .ktr and .kjb files
    pub directory: PathBuf,

    /// Output file (default: <directory>/metadata/pentaho_raw.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub registry: RegistryArgs,
}

#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Directory to start the registry search from
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    #[command(flatten)]
    pub registry: RegistryArgs,
}

#[derive(Debug, Args)]
pub struct InitCommand {
    /// Project root that will hold config/migration_registry.json
    #[arg(default_value = ".")]
    pub directory: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract metadata from transformation and job files in a directory
    Parse(ParseCommand),
    /// List files recorded in the processing registry
    Status(StatusCommand),
    /// Create config/migration_registry.json with default contents
    Init(InitCommand),
}
