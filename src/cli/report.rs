//! Console output for operators.
//!
//! Progress and summary lines are printed here, separate from the library,
//! so the extraction engine itself never writes to the terminal.

use std::{
    io::{self, Write},
    path::Path,
};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::{
    core::{BatchOutcome, BatchStatus, ExtractedRecord, FileEvent, FileKind},
    registry::{Registry, RegistryEntry},
};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Mark for files left alone because the registry already has them.
pub const SKIP_MARK: &str = "-";

/// Digest characters shown by `status`.
const SHORT_HASH_LEN: usize = 8;

const RULE_WIDTH: usize = 60;

pub fn print_header(directory: &Path) {
    println!("Parsing Pentaho files in: {}", directory.display());
    println!("{}", "-".repeat(RULE_WIDTH));
}

/// Print one progress line. Failures go to stderr, everything else to stdout.
pub fn print_event(event: &FileEvent<'_>) {
    match event {
        FileEvent::Failed { .. } => print_event_to(event, &mut io::stderr().lock()),
        _ => print_event_to(event, &mut io::stdout().lock()),
    }
}

pub fn print_event_to<W: Write>(event: &FileEvent<'_>, writer: &mut W) {
    let _ = match event {
        FileEvent::Discovered {
            transformations,
            jobs,
        } => writeln!(
            writer,
            "Found {} transformation(s) and {} job(s)",
            transformations, jobs
        ),
        FileEvent::Skipped { source } => writeln!(
            writer,
            "{} {} {}",
            SKIP_MARK.dimmed(),
            "skipped".dimmed(),
            format!("{} (already parsed)", source.file_name).dimmed()
        ),
        FileEvent::Parsed { source, record } => writeln!(
            writer,
            "{} parsed {} {} {}",
            SUCCESS_MARK.green(),
            source.kind.as_str(),
            source.file_name,
            describe_record(record).dimmed()
        ),
        FileEvent::Failed { source, error } => writeln!(
            writer,
            "{} {} {}: {}",
            FAILURE_MARK.red(),
            "error".bold().red(),
            source.file_name,
            error
        ),
    };
}

fn describe_record(record: &ExtractedRecord) -> String {
    let (count, noun) = match record {
        ExtractedRecord::Transformation(t) => (t.statistics.total_steps, "step"),
        ExtractedRecord::Job(j) => (j.statistics.total_entries, "entry"),
    };
    let noun = match (count, noun) {
        (1, noun) => noun.to_string(),
        (_, "entry") => "entries".to_string(),
        (_, noun) => format!("{}s", noun),
    };
    format!("({} {}, {} complexity)", count, noun, record.complexity())
}

pub fn print_summary(outcome: &BatchOutcome) {
    print_summary_to(outcome, &mut io::stdout().lock());
}

pub fn print_summary_to<W: Write>(outcome: &BatchOutcome, writer: &mut W) {
    let _ = writeln!(
        writer,
        "\nSummary: {} newly parsed, {} skipped (already in registry), {} failed",
        outcome.parsed_count(),
        outcome.skipped.len(),
        outcome.failures.len()
    );
}

/// Closing line for the run, one distinct message per outcome.
pub fn print_conclusion(outcome: &BatchOutcome, directory: &Path) {
    match outcome.status() {
        BatchStatus::Parsed | BatchStatus::AllSkipped => {
            print_conclusion_to(outcome, directory, &mut io::stdout().lock())
        }
        BatchStatus::NoCandidates | BatchStatus::AllFailed => {
            print_conclusion_to(outcome, directory, &mut io::stderr().lock())
        }
    }
}

pub fn print_conclusion_to<W: Write>(outcome: &BatchOutcome, directory: &Path, writer: &mut W) {
    let _ = match outcome.status() {
        BatchStatus::Parsed => Ok(()),
        BatchStatus::AllSkipped => writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            "All files already parsed and in registry. No new files to process.".green()
        ),
        BatchStatus::NoCandidates => writeln!(
            writer,
            "{} No .ktr or .kjb files found in {}",
            "warning:".bold().yellow(),
            directory.display()
        ),
        BatchStatus::AllFailed => writeln!(
            writer,
            "{} No files were successfully parsed ({} of {} failed)",
            "warning:".bold().yellow(),
            outcome.failures.len(),
            outcome.candidates
        ),
    };
}

pub fn print_output_written(path: &Path, file_count: usize) {
    println!(
        "\n{} {}",
        SUCCESS_MARK.green(),
        format!("Metadata written to: {}", path.display()).green()
    );
    println!("  Total files processed: {}", file_count);
}

pub fn print_registry_saved(path: &Path) {
    println!("{} Registry updated: {}", SUCCESS_MARK.green(), path.display());
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "warning:".bold().yellow(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "error:".bold().red(), message);
}

pub fn print_note(message: &str) {
    println!("{} {}", "note:".bold(), message);
}

/// Print every registered file and the statistics counters.
pub fn print_registry(registry: &Registry) {
    print_registry_to(registry, &mut io::stdout().lock());
}

pub fn print_registry_to<W: Write>(registry: &Registry, writer: &mut W) {
    let snapshot = registry.snapshot();
    let location = registry
        .path()
        .map(|path| path.display().to_string())
        .unwrap_or_default();

    let _ = writeln!(
        writer,
        "Registry: {} ({} {})",
        location,
        snapshot.parsed_files.len(),
        if snapshot.parsed_files.len() == 1 {
            "file"
        } else {
            "files"
        }
    );
    if let Some(updated) = &snapshot.last_updated {
        let _ = writeln!(writer, "Last updated: {}", updated);
    }

    let name_width = snapshot
        .parsed_files
        .keys()
        .map(|name| UnicodeWidthStr::width(name.as_str()))
        .max()
        .unwrap_or(0);
    let class_width = snapshot
        .parsed_files
        .values()
        .map(|entry| UnicodeWidthStr::width(entry.classification.as_str()))
        .max()
        .unwrap_or(0);

    if !snapshot.parsed_files.is_empty() {
        let _ = writeln!(writer);
    }
    for (name, entry) in &snapshot.parsed_files {
        print_entry(writer, name, entry, name_width, class_width);
    }

    if !snapshot.statistics.is_empty() {
        let _ = writeln!(writer, "\n{}", "Statistics:".bold());
        for (counter, value) in &snapshot.statistics {
            let _ = writeln!(writer, "  {}: {}", counter, value);
        }
    }
}

fn print_entry<W: Write>(
    writer: &mut W,
    name: &str,
    entry: &RegistryEntry,
    name_width: usize,
    class_width: usize,
) {
    let kind = FileKind::from_path(Path::new(name))
        .map(|kind| kind.as_str())
        .unwrap_or("?");
    let short_hash: String = entry.hash.chars().take(SHORT_HASH_LEN).collect();
    let _ = writeln!(
        writer,
        "  {}{}  {}{}  {:<14}  {}  {}",
        name,
        padding(name, name_width),
        entry.classification,
        padding(&entry.classification, class_width),
        kind,
        short_hash.dimmed(),
        entry.parsed_at.dimmed()
    );
}

fn padding(text: &str, width: usize) -> String {
    " ".repeat(width.saturating_sub(UnicodeWidthStr::width(text)))
}
