//! pentaho-meta - metadata extraction for Pentaho migrations
//!
//! Reads Pentaho transformation (`.ktr`) and job (`.kjb`) files, extracts
//! names, steps, SQL, table references and variables, and writes one JSON
//! document per directory. A content-hash registry makes re-runs incremental.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (arguments, commands, console report)
//! - `config`: Constants and path conventions
//! - `core`: Extraction engine and batch driver
//! - `registry`: Persisted record of already-parsed files
//! - `json_writer`: Pretty JSON output

pub mod cli;
pub mod config;
pub mod core;
pub mod json_writer;
pub mod registry;
