use std::path::{Path, PathBuf};

/// Registry location relative to a project root.
pub const REGISTRY_RELATIVE_PATH: &str = "config/migration_registry.json";

/// Environment variable that pins the registry path and skips discovery.
pub const REGISTRY_ENV_VAR: &str = "PENTAHO_META_REGISTRY";

pub const TRANSFORMATION_EXTENSION: &str = "ktr";
pub const JOB_EXTENSION: &str = "kjb";

pub const OUTPUT_DIR_NAME: &str = "metadata";
pub const OUTPUT_FILE_NAME: &str = "pentaho_raw.json";

/// Input paths under a `queries` tree write their output to the sibling `dimensions` tree.
const QUERIES_SEGMENT: &str = "queries";
const DIMENSIONS_SEGMENT: &str = "dimensions";

/// Directories named `dim_*` classify the files parsed from them.
const CLASSIFICATION_PREFIX: &str = "dim_";
pub const UNKNOWN_CLASSIFICATION: &str = "unknown";

/// Filename prefixes (lowercased) and the level tag they map to.
pub const LEVEL_PREFIXES: &[(&str, &str)] = &[
    ("adq_", "adq"),
    ("mas_", "mas"),
    ("d_", "dimension"),
    ("f_", "fact"),
];

/// Step types whose table is read from.
pub const INPUT_TABLE_STEPS: &[&str] = &["TableInput", "DBLookup", "DatabaseJoin"];

/// Step types whose table is written to.
pub const OUTPUT_TABLE_STEPS: &[&str] = &[
    "TableOutput",
    "InsertUpdate",
    "Update",
    "VerticaBulkLoader",
    "ExcelOutput",
    "TextFileOutput",
];

/// Search `start_dir` and each ancestor for `config/migration_registry.json`.
///
/// The walk continues up to the filesystem root.
pub fn find_registry_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let candidate = current.join(REGISTRY_RELATIVE_PATH);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Decide where the registry lives for a run.
///
/// An explicit path always wins. Otherwise the search starts from the
/// canonical form of `start_dir`.
pub fn resolve_registry_path(start_dir: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let start = start_dir
        .canonicalize()
        .unwrap_or_else(|_| start_dir.to_path_buf());
    find_registry_file(&start)
}

/// Default location of the aggregate JSON document for an input directory.
pub fn default_output_path(directory: &Path) -> PathBuf {
    let as_text = directory.to_string_lossy();
    let base = if as_text.contains(QUERIES_SEGMENT) {
        PathBuf::from(as_text.replace(QUERIES_SEGMENT, DIMENSIONS_SEGMENT))
    } else {
        directory.to_path_buf()
    };
    base.join(OUTPUT_DIR_NAME).join(OUTPUT_FILE_NAME)
}

/// Classification recorded in the registry for files parsed from `directory`.
pub fn classify_directory(directory: &Path) -> String {
    directory
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| name.starts_with(CLASSIFICATION_PREFIX))
        .unwrap_or_else(|| UNKNOWN_CLASSIFICATION.to_string())
}
