use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{JOB_EXTENSION, LEVEL_PREFIXES, TRANSFORMATION_EXTENSION};

/// Kind of Pentaho document, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Transformation,
    Job,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            TRANSFORMATION_EXTENSION => Some(FileKind::Transformation),
            JOB_EXTENSION => Some(FileKind::Job),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Transformation => "transformation",
            FileKind::Job => "job",
        }
    }
}

/// A candidate document on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub file_name: String,
    pub kind: FileKind,
    pub level: Option<&'static str>,
}

impl SourceFile {
    /// Returns `None` when the path has no recognized extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let kind = FileKind::from_path(&path)?;
        let file_name = path.file_name()?.to_string_lossy().into_owned();
        let level = detect_level(&file_name);
        Some(Self {
            path,
            file_name,
            kind,
            level,
        })
    }

    /// File name without its extension, used when the document has no name.
    pub fn stem(&self) -> String {
        Path::new(&self.file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_name.clone())
    }
}

/// Layer tag inferred from the filename prefix, case-insensitively.
pub fn detect_level(file_name: &str) -> Option<&'static str> {
    let lower = file_name.to_lowercase();
    LEVEL_PREFIXES
        .iter()
        .find(|(prefix, _)| lower.starts_with(prefix))
        .map(|(_, level)| *level)
}
