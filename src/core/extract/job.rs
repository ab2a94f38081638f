use roxmltree::Node;
use tracing::debug;

use super::variables::find_variables;
use crate::core::{
    record::{Complexity, JobEntry, JobRecord, JobStatistics},
    source::{FileKind, SourceFile},
    xml::{descendants_named, find_text, flatten_text},
};

const UNKNOWN: &str = "Unknown";

/// Entry types with extra fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Transformation,
    Sql,
    Other,
}

impl EntryKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "TRANS" => EntryKind::Transformation,
            "SQL" => EntryKind::Sql,
            _ => EntryKind::Other,
        }
    }
}

pub fn extract(source: &SourceFile, root: Node<'_, '_>) -> JobRecord {
    let job_name = find_text(root, "name").unwrap_or_else(|| source.stem());
    let description = find_text(root, "description").unwrap_or_default();

    let mut entries = Vec::new();
    let mut sql_queries = Vec::new();
    let mut transformations_called = Vec::new();

    for node in descendants_named(root, "entry") {
        let entry = extract_entry(node);

        if let Some(sql) = &entry.sql {
            sql_queries.push(sql.clone());
        }
        if let Some(filename) = &entry.filename {
            transformations_called.push(filename.clone());
        }

        debug!(
            file = %source.file_name,
            entry = %entry.entry_name,
            entry_type = %entry.entry_type,
            "extracted job entry"
        );
        entries.push(entry);
    }

    let statistics = JobStatistics {
        total_entries: entries.len(),
        sql_entries: sql_queries.len(),
        transformation_calls: transformations_called.len(),
        estimated_complexity: Complexity::from_count(entries.len()),
    };

    JobRecord {
        file_name: source.file_name.clone(),
        file_type: FileKind::Job,
        level: source.level,
        job_name,
        description,
        variables: find_variables(&flatten_text(root)),
        sql_queries,
        transformations_called,
        entries,
        statistics,
    }
}

/// Build an entry record from an `<entry>` element.
pub fn extract_entry(node: Node<'_, '_>) -> JobEntry {
    let mut entry = JobEntry {
        entry_name: find_text(node, "name").unwrap_or_else(|| UNKNOWN.to_string()),
        entry_type: find_text(node, "type").unwrap_or_else(|| UNKNOWN.to_string()),
        ..Default::default()
    };

    match EntryKind::from_tag(&entry.entry_type) {
        EntryKind::Transformation => {
            entry.filename = find_text(node, "filename");
        }
        EntryKind::Sql => {
            entry.sql = find_text(node, "sql");
            entry.connection = find_text(node, "connection");
        }
        EntryKind::Other => {}
    }

    entry
}
