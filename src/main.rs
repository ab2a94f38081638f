use std::process::ExitCode;

use clap::Parser;
use pentaho_meta::cli::{Arguments, ExitStatus};

fn main() -> ExitCode {
    let args = Arguments::parse();
    pentaho_meta::cli::init_logging(args.verbose());

    match pentaho_meta::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitStatus::Error.into()
        }
    }
}
