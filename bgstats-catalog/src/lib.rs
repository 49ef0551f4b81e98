//! BG Stats export data model and JSON I/O.
//!
//! This crate defines the export document types without any merge logic.
//! Consumers can load exports, inspect them, and write the merged result.

pub mod json;
pub mod types;

pub use json::{ExportError, SourceFile, load_export, load_source_files, save_export};
pub use types::*;
