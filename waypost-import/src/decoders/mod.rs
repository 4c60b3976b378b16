//! Per-format file decoders
//!
//! Each decoder turns one file into a sequence of raw, string-valued field
//! mappings. Decoders never parse numbers or compute ratings; typing and
//! validation happen downstream in the normalizer. A file that cannot be
//! opened or parsed at all fails with a [`DecodeError`]; a single bad row
//! inside an otherwise readable file becomes a row-level skip and never
//! aborts its siblings.

mod csv;
mod json;
mod xml;

use crate::normalize::SkipReason;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File-level decode errors
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Specified path does not exist
    #[error("File does not exist: {0}")]
    FileNotFound(PathBuf),

    /// Extension does not map to a known format
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Cannot read the file
    #[error("File access error {0}: {1}")]
    FileAccess(PathBuf, String),

    /// Top-level CSV structure is unreadable
    #[error("Invalid CSV file: {0}")]
    InvalidCsv(String),

    /// Top-level JSON value is malformed or of the wrong shape
    #[error("Invalid JSON file: {0}")]
    InvalidJson(String),

    /// XML document is malformed
    #[error("Invalid XML file: {0}")]
    InvalidXml(String),
}

/// One raw field mapping extracted from a source file, pre-trim.
///
/// All values are strings exactly as the file carried them (numbers
/// stringified for JSON); `source_file` is the base filename for
/// provenance. `description` is absent for formats that do not carry one.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub external_id: String,
    pub name: String,
    pub latitude: String,
    pub longitude: String,
    pub category: String,
    pub ratings: String,
    pub description: Option<String>,
    pub source_file: String,
}

/// Decoder output for one input row: either a raw record or a row-level
/// skip that the orchestrator counts but does not treat as a fault.
pub type RawRow = Result<RawRecord, SkipReason>;

/// Supported input formats, dispatched by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
    Xml,
}

impl Format {
    /// Map a path to its format by case-insensitive extension
    pub fn from_path(path: &Path) -> Result<Self, DecodeError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            "xml" => Ok(Format::Xml),
            other => Err(DecodeError::UnsupportedFormat(format!(".{}", other))),
        }
    }

    /// Decode an entire file into raw rows
    pub fn decode(self, path: &Path) -> Result<Vec<RawRow>, DecodeError> {
        let source_file = base_name(path);
        match self {
            Format::Csv => csv::decode(path, &source_file),
            Format::Json => json::decode(path, &source_file),
            Format::Xml => xml::decode(path, &source_file),
        }
    }
}

/// Decode one file, dispatching by extension
pub fn decode_file(path: &Path) -> Result<Vec<RawRow>, DecodeError> {
    if !path.exists() {
        return Err(DecodeError::FileNotFound(path.to_path_buf()));
    }
    Format::from_path(path)?.decode(path)
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
