use anyhow::Result;

use super::super::{args::ParseCommand, exit_status::ExitStatus, report};
use crate::{
    config::{default_output_path, resolve_registry_path},
    core::{BatchError, BatchStatus, MetadataDocument, run_batch},
    json_writer::write_pretty,
    registry::{Registry, RegistryLoadResult},
};

pub fn parse(cmd: ParseCommand) -> Result<ExitStatus> {
    let directory = &cmd.directory;
    let verbose = cmd.registry.verbose;
    let output_path = cmd
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(directory));

    let registry_path = resolve_registry_path(directory, cmd.registry.registry.as_deref());
    let RegistryLoadResult {
        mut registry,
        warning,
    } = Registry::load(registry_path);
    if let Some(warning) = warning {
        report::print_warning(&format!("{}; continuing with an empty registry", warning));
    }
    if verbose {
        match registry.path() {
            Some(path) => report::print_note(&format!("using registry {}", path.display())),
            None => report::print_note("no registry found; run history will not be recorded"),
        }
    }

    report::print_header(directory);

    let outcome = match run_batch(directory, &mut registry, |event| report::print_event(&event)) {
        Ok(outcome) => outcome,
        Err(BatchError::DirectoryNotFound(path)) => {
            report::print_error(&format!("Directory {} does not exist", path.display()));
            return Ok(ExitStatus::Failure);
        }
        Err(err) => return Err(err.into()),
    };

    report::print_summary(&outcome);
    report::print_conclusion(&outcome, directory);

    let status = outcome.status();
    match status {
        BatchStatus::Parsed => {
            let document = MetadataDocument {
                files: outcome.records,
            };
            write_pretty(&output_path, &document)?;
            report::print_output_written(&output_path, document.files.len());
            save_registry(&mut registry);
        }
        BatchStatus::AllSkipped => save_registry(&mut registry),
        BatchStatus::NoCandidates | BatchStatus::AllFailed => {}
    }

    Ok(if status.is_success() {
        ExitStatus::Success
    } else {
        ExitStatus::Failure
    })
}

/// Persist the registry. Failure here does not fail the run.
fn save_registry(registry: &mut Registry) {
    match registry.save() {
        Ok(Some(path)) => report::print_registry_saved(path),
        Ok(None) => {}
        Err(err) => report::print_warning(&err.to_string()),
    }
}
