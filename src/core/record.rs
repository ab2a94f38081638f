//! Output records produced by the extractor.
//!
//! Field order here is the field order of the emitted JSON.

use std::fmt;

use serde::Serialize;

use super::source::FileKind;

/// Coarse size tag derived from the number of steps or entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    /// `<5` is low, `5..=15` is medium, anything above is high.
    pub fn from_count(count: usize) -> Self {
        match count {
            0..=4 => Complexity::Low,
            5..=15 => Complexity::Medium,
            _ => Complexity::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extracted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExtractedRecord {
    Transformation(TransformationRecord),
    Job(JobRecord),
}

impl ExtractedRecord {
    pub fn name(&self) -> &str {
        match self {
            ExtractedRecord::Transformation(record) => &record.transformation_name,
            ExtractedRecord::Job(record) => &record.job_name,
        }
    }

    pub fn complexity(&self) -> Complexity {
        match self {
            ExtractedRecord::Transformation(record) => record.statistics.estimated_complexity,
            ExtractedRecord::Job(record) => record.statistics.estimated_complexity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformationRecord {
    pub file_name: String,
    pub file_type: FileKind,
    pub level: Option<&'static str>,
    pub transformation_name: String,
    pub description: String,
    pub variables: Vec<String>,
    pub sql_queries: Vec<String>,
    pub tables_input: Vec<String>,
    pub tables_output: Vec<String>,
    pub steps: Vec<StepEntry>,
    pub statistics: TransformationStatistics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformationStatistics {
    pub total_steps: usize,
    pub sql_steps: usize,
    pub estimated_complexity: Complexity,
}

/// One `<step>` of a transformation. Optional fields are emitted only when
/// the document provides them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StepEntry {
    pub step_name: String,
    pub step_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_merge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_bypassed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_update: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_delete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_table: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRecord {
    pub file_name: String,
    pub file_type: FileKind,
    pub level: Option<&'static str>,
    pub job_name: String,
    pub description: String,
    pub variables: Vec<String>,
    pub sql_queries: Vec<String>,
    pub transformations_called: Vec<String>,
    pub entries: Vec<JobEntry>,
    pub statistics: JobStatistics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobStatistics {
    pub total_entries: usize,
    pub sql_entries: usize,
    pub transformation_calls: usize,
    pub estimated_complexity: Complexity,
}

/// One `<entry>` of a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobEntry {
    pub entry_name: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
}

/// The aggregate document written at the end of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetadataDocument {
    pub files: Vec<ExtractedRecord>,
}
