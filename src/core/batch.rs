//! Batch driver: discover candidate files in one directory, skip those the
//! registry already knows, extract the rest.
//!
//! Failures are scoped per file. Only a missing or unlistable directory
//! aborts the batch.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{
    extract::{ExtractError, parse_file},
    record::ExtractedRecord,
    source::{FileKind, SourceFile},
};
use crate::{
    config::classify_directory,
    registry::{Registry, hash_file},
};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("directory {} does not exist", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("failed to list {}: {source}", path.display())]
    Listing {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// Progress notifications, delivered in processing order.
#[derive(Debug)]
pub enum FileEvent<'a> {
    Discovered { transformations: usize, jobs: usize },
    Skipped { source: &'a SourceFile },
    Parsed { source: &'a SourceFile, record: &'a ExtractedRecord },
    Failed { source: &'a SourceFile, error: &'a ExtractError },
}

#[derive(Debug)]
pub struct FileFailure {
    pub file_name: String,
    pub error: ExtractError,
}

/// How a batch ended, for choosing the exit status and the closing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// At least one new record was produced.
    Parsed,
    /// Nothing new, but some files were already in the registry.
    AllSkipped,
    /// The directory holds no candidate files.
    NoCandidates,
    /// Every candidate failed and none was already registered.
    AllFailed,
}

impl BatchStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, BatchStatus::Parsed | BatchStatus::AllSkipped)
    }
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub classification: String,
    pub candidates: usize,
    pub records: Vec<ExtractedRecord>,
    pub skipped: Vec<String>,
    pub failures: Vec<FileFailure>,
}

impl BatchOutcome {
    pub fn parsed_count(&self) -> usize {
        self.records.len()
    }

    pub fn status(&self) -> BatchStatus {
        if !self.records.is_empty() {
            BatchStatus::Parsed
        } else if !self.skipped.is_empty() {
            BatchStatus::AllSkipped
        } else if self.candidates == 0 {
            BatchStatus::NoCandidates
        } else {
            BatchStatus::AllFailed
        }
    }
}

/// Candidate files directly inside `directory`: transformations first, then
/// jobs, each group in file-name order. Hidden files are ignored.
pub fn discover(directory: &Path) -> Result<Vec<SourceFile>, BatchError> {
    if !directory.is_dir() {
        return Err(BatchError::DirectoryNotFound(directory.to_path_buf()));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(BatchError::Listing {
                    path: directory.to_path_buf(),
                    source: err,
                });
            }
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };

        if entry.file_name().to_string_lossy().starts_with('.') || !entry.path().is_file() {
            continue;
        }
        if let Some(source) = SourceFile::from_path(entry.path()) {
            files.push(source);
        }
    }

    files.sort_by_key(|source| source.kind);
    Ok(files)
}

/// Process every candidate in `directory` against `registry`.
///
/// Successful extractions are recorded in the registry in memory; saving it
/// is left to the caller.
pub fn run_batch(
    directory: &Path,
    registry: &mut Registry,
    mut on_event: impl FnMut(FileEvent<'_>),
) -> Result<BatchOutcome, BatchError> {
    let files = discover(directory)?;
    let transformations = files
        .iter()
        .filter(|source| source.kind == FileKind::Transformation)
        .count();
    on_event(FileEvent::Discovered {
        transformations,
        jobs: files.len() - transformations,
    });

    let mut outcome = BatchOutcome {
        classification: classify_directory(directory),
        candidates: files.len(),
        ..Default::default()
    };

    for source in &files {
        let hash = match hash_file(&source.path) {
            Ok(hash) => hash,
            Err(err) => {
                let error = ExtractError::Io {
                    path: source.path.clone(),
                    source: err,
                };
                fail(&mut outcome, source, error, &mut on_event);
                continue;
            }
        };

        if registry.is_already_processed(&source.file_name, &hash) {
            debug!(file = %source.file_name, "unchanged since last run");
            on_event(FileEvent::Skipped { source });
            outcome.skipped.push(source.file_name.clone());
            continue;
        }

        match parse_file(source) {
            Ok(record) => {
                debug!(file = %source.file_name, title = record.name(), "parsed");
                registry.record(
                    &source.file_name,
                    hash,
                    &outcome.classification,
                    &source.path,
                );
                on_event(FileEvent::Parsed {
                    source,
                    record: &record,
                });
                outcome.records.push(record);
            }
            Err(error) => fail(&mut outcome, source, error, &mut on_event),
        }
    }

    registry.update_statistics();
    Ok(outcome)
}

fn fail(
    outcome: &mut BatchOutcome,
    source: &SourceFile,
    error: ExtractError,
    on_event: &mut impl FnMut(FileEvent<'_>),
) {
    warn!(file = %source.file_name, error = %error, "file skipped");
    on_event(FileEvent::Failed {
        source,
        error: &error,
    });
    outcome.failures.push(FileFailure {
        file_name: source.file_name.clone(),
        error,
    });
}
