//! Document extraction: bytes of one `.ktr`/`.kjb` file in, one record out.
//!
//! Extraction is a pure function of the document bytes and the file name.

pub mod job;
pub mod transformation;
pub mod variables;

use std::{fs, path::PathBuf};

use roxmltree::{Document, ParsingOptions};
use thiserror::Error;

use super::{
    record::ExtractedRecord,
    source::{FileKind, SourceFile},
};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{file} is not valid UTF-8 (byte {offset})")]
    Encoding { file: String, offset: usize },
    #[error("malformed XML in {file}: {message}")]
    MalformedDocument { file: String, message: String },
}

/// Parse the document bytes of `source` into a record.
pub fn parse_document(source: &SourceFile, content: &[u8]) -> Result<ExtractedRecord, ExtractError> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    let text = std::str::from_utf8(content).map_err(|err| ExtractError::Encoding {
        file: source.file_name.clone(),
        offset: err.valid_up_to(),
    })?;

    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    let doc = Document::parse_with_options(text, options).map_err(|err| {
        ExtractError::MalformedDocument {
            file: source.file_name.clone(),
            message: err.to_string(),
        }
    })?;

    let root = doc.root_element();
    let record = match source.kind {
        FileKind::Transformation => {
            ExtractedRecord::Transformation(transformation::extract(source, root))
        }
        FileKind::Job => ExtractedRecord::Job(job::extract(source, root)),
    };
    Ok(record)
}

/// Read `source` from disk and parse it.
pub fn parse_file(source: &SourceFile) -> Result<ExtractedRecord, ExtractError> {
    let content = fs::read(&source.path).map_err(|err| ExtractError::Io {
        path: source.path.clone(),
        source: err,
    })?;
    parse_document(source, &content)
}
