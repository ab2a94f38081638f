use std::collections::BTreeSet;

use roxmltree::Node;
use tracing::debug;

use super::variables::find_variables;
use crate::{
    config::{INPUT_TABLE_STEPS, OUTPUT_TABLE_STEPS},
    core::{
        record::{Complexity, StepEntry, TransformationRecord, TransformationStatistics},
        source::{FileKind, SourceFile},
        xml::{descendants_named, find, find_all, find_text, flatten_text},
    },
};

const UNKNOWN: &str = "Unknown";

/// Step types that get fields beyond the common ones.
///
/// The tool defines far more step types than listed here; everything else
/// lands in `Other` and keeps only its name, type and common fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    TableOutput,
    InsertUpdate,
    Update,
    Delete,
    Lookup,
    Other,
}

impl StepKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "TableOutput" => StepKind::TableOutput,
            "InsertUpdate" => StepKind::InsertUpdate,
            "Update" => StepKind::Update,
            "Delete" => StepKind::Delete,
            "DBLookup" | "DatabaseJoin" => StepKind::Lookup,
            _ => StepKind::Other,
        }
    }
}

/// Whether a step's table is read from or written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRole {
    Input,
    Output,
}

/// Role of a step type in table tracking; `None` for types in neither list.
pub fn table_role(step_type: &str) -> Option<TableRole> {
    if INPUT_TABLE_STEPS.contains(&step_type) {
        Some(TableRole::Input)
    } else if OUTPUT_TABLE_STEPS.contains(&step_type) {
        Some(TableRole::Output)
    } else {
        None
    }
}

pub fn extract(source: &SourceFile, root: Node<'_, '_>) -> TransformationRecord {
    let transformation_name = find_text(root, "info/name").unwrap_or_else(|| source.stem());
    let description = find_text(root, "info/description").unwrap_or_default();

    let mut steps = Vec::new();
    let mut sql_queries = Vec::new();
    let mut tables_input = BTreeSet::new();
    let mut tables_output = BTreeSet::new();

    for node in descendants_named(root, "step") {
        let step = extract_step(node);

        if let Some(sql) = &step.sql_query {
            sql_queries.push(sql.clone());
        }
        if let Some(table) = &step.table_name {
            match table_role(&step.step_type) {
                Some(TableRole::Input) => {
                    tables_input.insert(table.clone());
                }
                Some(TableRole::Output) => {
                    tables_output.insert(table.clone());
                }
                None => {}
            }
        }

        debug!(
            file = %source.file_name,
            step = %step.step_name,
            step_type = %step.step_type,
            "extracted step"
        );
        steps.push(step);
    }

    let sql_steps = steps.iter().filter(|s| s.sql_query.is_some()).count();
    let statistics = TransformationStatistics {
        total_steps: steps.len(),
        sql_steps,
        estimated_complexity: Complexity::from_count(steps.len()),
    };

    TransformationRecord {
        file_name: source.file_name.clone(),
        file_type: FileKind::Transformation,
        level: source.level,
        transformation_name,
        description,
        variables: find_variables(&flatten_text(root)),
        sql_queries,
        tables_input: tables_input.into_iter().collect(),
        tables_output: tables_output.into_iter().collect(),
        steps,
        statistics,
    }
}

/// Build a step record from a `<step>` element.
///
/// Missing name or type read as `Unknown`, so every element yields a step.
pub fn extract_step(node: Node<'_, '_>) -> StepEntry {
    let step_type = find_text(node, "type").unwrap_or_else(|| UNKNOWN.to_string());
    let mut step = StepEntry {
        step_name: find_text(node, "name").unwrap_or_else(|| UNKNOWN.to_string()),
        connection: find_text(node, "connection"),
        sql_query: find_text(node, "sql"),
        table_name: resolve_table(node),
        step_type,
        ..Default::default()
    };

    match StepKind::from_tag(&step.step_type) {
        StepKind::TableOutput => {
            step.truncate = find_text(node, "truncate").map(|flag| is_yes(&flag));
            step.commit_size = find_text(node, "commit");
        }
        StepKind::InsertUpdate => {
            step.is_merge = Some(true);
            step.update_bypassed = find_text(node, "update_bypassed").map(|flag| is_yes(&flag));
            step.key_fields = key_fields(node);
        }
        StepKind::Update => {
            step.is_update = Some(true);
            step.key_fields = key_fields(node);
        }
        StepKind::Delete => {
            step.is_delete = Some(true);
        }
        StepKind::Lookup => {
            step.lookup_table = find_text(node, "lookup/table");
        }
        StepKind::Other => {}
    }

    step
}

/// `schema.table` when both are set, otherwise the bare table.
fn resolve_table(node: Node<'_, '_>) -> Option<String> {
    let table = find_text(node, "table")?;
    match find_text(node, "schema") {
        Some(schema) => Some(format!("{}.{}", schema, table)),
        None => Some(table),
    }
}

/// Key field names from the first `<lookup>` block, in document order.
fn key_fields(node: Node<'_, '_>) -> Option<Vec<String>> {
    let lookup = find(node, "lookup")?;
    let keys: Vec<String> = find_all(lookup, "key")
        .into_iter()
        .filter_map(|key| find_text(key, "name"))
        .collect();
    (!keys.is_empty()).then_some(keys)
}

fn is_yes(flag: &str) -> bool {
    flag.eq_ignore_ascii_case("y")
}
