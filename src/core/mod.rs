//! Extraction engine.
//!
//! - `source`: candidate files and their filename-derived tags
//! - `xml`: path lookups over the parsed tree
//! - `extract`: transformation and job extraction
//! - `record`: the records written to the metadata document
//! - `batch`: directory-level driver tying extraction to the registry

pub mod batch;
pub mod extract;
pub mod record;
pub mod source;
pub mod xml;

pub use batch::{BatchError, BatchOutcome, BatchStatus, FileEvent, run_batch};
pub use extract::{ExtractError, parse_document, parse_file};
pub use record::{Complexity, ExtractedRecord, MetadataDocument};
pub use source::{FileKind, SourceFile};
