//! Reading and splitting of the semicolon-delimited course tables.
//!
//! - [`sections`] - the section metadata table (`sectionsInfo.csv`)
//! - [`steps`] - per-section step tables (`{folder}-courseSteps.csv`)
//!
//! Tables have no header row and no quoting: every line is split on `;`
//! as-is. Files are decoded to UTF-8 first, so spreadsheet exports in a
//! legacy code page are accepted too.

pub mod sections;
pub mod steps;

pub use sections::{load_sections, parse_section_line, parse_sections};
pub use steps::{load_steps, parse_step_line, parse_steps};

use std::path::Path;

use crate::error::{RowError, RowResult, SourceError};

/// Field separator of every course table.
pub const DELIMITER: char = ';';

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// =============================================================================
// Id Sequence
// =============================================================================

/// Monotonic 1-based id counter.
///
/// Owned by the driver and lent to the parsers, which read
/// [`IdSequence::current`] and call [`IdSequence::advance`] once per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    next: u32,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }

    /// The id the next record will receive.
    pub fn current(&self) -> u32 {
        self.next
    }

    /// Consume the current id and return it. Fails once the id range is
    /// exhausted instead of wrapping.
    pub fn advance(&mut self) -> RowResult<u32> {
        let id = self.next;
        self.next = id.checked_add(1).ok_or_else(|| {
            RowError::Structural(format!("id range exhausted at {id}"))
        })?;
        Ok(id)
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Source Decoding
// =============================================================================

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-2" | "latin2" | "latin-2" => "iso-8859-2".to_string(),
        "windows-1250" | "cp1250" => "windows-1250".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes using the named encoding. `None` if the label is unknown or
/// the bytes are not valid in that encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> Option<String> {
    let encoding = encoding_rs::Encoding::for_label(encoding.as_bytes())?;
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        None
    } else {
        Some(text.into_owned())
    }
}

/// Turn file bytes into text: UTF-8 (BOM stripped) when valid, otherwise
/// the detected legacy encoding.
pub fn decode_source(bytes: &[u8], path: &Path) -> Result<String, SourceError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.to_string());
    }

    let encoding = detect_encoding(bytes);
    decode_content(bytes, &encoding).ok_or_else(|| SourceError::Encoding {
        path: path.to_path_buf(),
        encoding,
    })
}

/// Read a whole table into memory. The file is closed before returning.
///
/// With `encoding` set, the bytes are decoded with that label instead of
/// being auto-detected.
pub fn read_source(path: &Path, encoding: Option<&str>) -> Result<String, SourceError> {
    let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let Some(label) = encoding else {
        return decode_source(&bytes, path);
    };

    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
    decode_content(bytes, label).ok_or_else(|| SourceError::Encoding {
        path: path.to_path_buf(),
        encoding: label.to_string(),
    })
}

// =============================================================================
// Field Helpers
// =============================================================================

/// Split one table line into its raw fields.
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(DELIMITER).collect()
}

/// Parse an integer field. Surrounding whitespace is tolerated.
pub fn parse_int(field: &'static str, value: &str) -> RowResult<i32> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| RowError::not_an_integer(field, value))
}
