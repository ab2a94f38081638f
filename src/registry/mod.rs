//! Processing registry: remembers which files were parsed, by name and content hash.
//!
//! The registry is either unbound (no file, every run is a first run) or bound
//! to one JSON file. Reading is permissive and writing is a full overwrite.

pub mod hash;

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

pub use hash::{hash_file, hash_reader};

pub const REGISTRY_VERSION: &str = "1.0";

/// Counter updated after every batch.
pub const TOTAL_FILES_COUNTER: &str = "total_pentaho_files";

const DEFAULT_COUNTERS: &[&str] = &[
    "total_dimensions",
    TOTAL_FILES_COUNTER,
    "total_tables",
    "completed_migrations",
    "pending_migrations",
];

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("could not read registry at {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },
    #[error("could not save registry to {}: {source}", path.display())]
    Unwritable { path: PathBuf, source: io::Error },
    #[error("registry already exists at {}", path.display())]
    AlreadyExists { path: PathBuf },
}

/// One parsed file.
///
/// Fields missing from entries written by other tooling read as empty, and
/// fields this tool does not know are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryEntry {
    pub hash: String,
    pub parsed_at: String,
    /// Directory grouping the file was parsed under.
    #[serde(rename = "dimension")]
    pub classification: String,
    pub file_path: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The on-disk registry document.
///
/// `migrated_tables`, the statistics counters and any unknown top-level keys
/// belong to other migration tooling and are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub parsed_files: BTreeMap<String, RegistryEntry>,
    #[serde(default)]
    pub migrated_tables: Map<String, Value>,
    #[serde(default = "default_statistics")]
    pub statistics: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_version() -> String {
    REGISTRY_VERSION.to_string()
}

fn default_statistics() -> Map<String, Value> {
    DEFAULT_COUNTERS
        .iter()
        .map(|name| (name.to_string(), Value::from(0)))
        .collect()
}

impl Default for RegistrySnapshot {
    fn default() -> Self {
        Self {
            version: default_version(),
            last_updated: None,
            parsed_files: BTreeMap::new(),
            migrated_tables: Map::new(),
            statistics: default_statistics(),
            extra: Map::new(),
        }
    }
}

impl RegistrySnapshot {
    pub fn set_counter(&mut self, name: &str, value: usize) {
        self.statistics.insert(name.to_string(), Value::from(value));
    }

    pub fn counter(&self, name: &str) -> Option<u64> {
        self.statistics.get(name).and_then(Value::as_u64)
    }
}

/// Result of loading a registry. A load never fails; problems surface as a warning.
pub struct RegistryLoadResult {
    pub registry: Registry,
    pub warning: Option<RegistryError>,
}

#[derive(Debug, Clone)]
pub struct Registry {
    path: Option<PathBuf>,
    snapshot: RegistrySnapshot,
}

impl Registry {
    /// A registry with no backing file; `save` is a no-op.
    pub fn unbound() -> Self {
        Self {
            path: None,
            snapshot: RegistrySnapshot::default(),
        }
    }

    /// Bind to `path` (or stay unbound) and read whatever is there.
    ///
    /// A missing file yields defaults silently; an unreadable or invalid file
    /// yields defaults plus a warning.
    pub fn load(path: Option<PathBuf>) -> RegistryLoadResult {
        let Some(path) = path else {
            debug!("no registry file, running unbound");
            return RegistryLoadResult {
                registry: Self::unbound(),
                warning: None,
            };
        };

        let (snapshot, warning) = if path.exists() {
            match read_snapshot(&path) {
                Ok(snapshot) => (snapshot, None),
                Err(err) => {
                    let warning = RegistryError::Unreadable {
                        path: path.clone(),
                        reason: format!("{:#}", err),
                    };
                    warn!(%warning, "falling back to an empty registry");
                    (RegistrySnapshot::default(), Some(warning))
                }
            }
        } else {
            debug!(path = %path.display(), "registry file does not exist yet");
            (RegistrySnapshot::default(), None)
        };

        RegistryLoadResult {
            registry: Self {
                path: Some(path),
                snapshot,
            },
            warning,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn snapshot(&self) -> &RegistrySnapshot {
        &self.snapshot
    }

    pub fn entry(&self, file_name: &str) -> Option<&RegistryEntry> {
        self.snapshot.parsed_files.get(file_name)
    }

    /// True when `file_name` was recorded with content digest `hash`.
    pub fn is_already_processed(&self, file_name: &str, hash: &str) -> bool {
        self.entry(file_name)
            .is_some_and(|entry| !entry.hash.is_empty() && entry.hash == hash)
    }

    /// Insert or replace the entry for `file_name`. In-memory only.
    pub fn record(&mut self, file_name: &str, hash: String, classification: &str, path: &Path) {
        let file_path = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf())
            .display()
            .to_string();
        let entry = RegistryEntry {
            hash,
            parsed_at: timestamp(),
            classification: classification.to_string(),
            file_path,
            extra: Map::new(),
        };
        debug!(file = file_name, hash = %entry.hash, "recording parsed file");
        self.snapshot
            .parsed_files
            .insert(file_name.to_string(), entry);
    }

    /// Refresh the counters this tool owns.
    pub fn update_statistics(&mut self) {
        let total = self.snapshot.parsed_files.len();
        self.snapshot.set_counter(TOTAL_FILES_COUNTER, total);
    }

    /// Write the snapshot to the bound path, stamping `last_updated`.
    ///
    /// Returns the path written, or `None` when unbound.
    pub fn save(&mut self) -> Result<Option<&Path>, RegistryError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(None);
        };

        self.snapshot.last_updated = Some(timestamp());
        write_snapshot(path, &self.snapshot).map_err(|source| RegistryError::Unwritable {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "registry saved");
        Ok(Some(path))
    }
}

/// Create a fresh registry file at `path`; refuses to overwrite.
pub fn create_default(path: &Path) -> Result<(), RegistryError> {
    if path.exists() {
        return Err(RegistryError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    write_snapshot(path, &RegistrySnapshot::default()).map_err(|source| {
        RegistryError::Unwritable {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn read_snapshot(path: &Path) -> anyhow::Result<RegistrySnapshot> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content).context("Failed to parse registry JSON")
}

fn write_snapshot(path: &Path, snapshot: &RegistrySnapshot) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(snapshot).map_err(io::Error::other)?;
    fs::write(path, format!("{}\n", content))
}

fn timestamp() -> String {
    Local::now().to_rfc3339()
}
