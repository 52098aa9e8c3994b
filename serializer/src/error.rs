//! Error types for the course serialization pipeline.
//!
//! - [`RowError`] - a single malformed row (no location attached)
//! - [`ParseError`] - a [`RowError`] located at `file:line`
//! - [`SourceError`] - reading or decoding an input file
//! - [`ValidationError`] - rendered JSON violating the course schema
//! - [`SettingsError`] - loading the course settings file
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Every error is fatal: the pipeline stops at the first one and never
//! writes a partial `course.json`.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Row Errors
// =============================================================================

/// Why a single row of a section or step table was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// The row does not have the number of fields its kind requires.
    #[error("wrong column count for {kind} row: expected {expected}, found {found}")]
    ColumnCount {
        kind: &'static str,
        expected: &'static str,
        found: usize,
    },

    /// A field holds a value that does not have the required format.
    #[error("invalid value '{value}' in field '{field}': {reason}")]
    Format {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    /// The leading tag is not one of the known step kinds.
    #[error("unknown step kind '{0}'")]
    UnknownKind(String),

    /// Exercise language other than the single accepted code.
    #[error("unsupported exercise language '{found}' (only '{accepted}' is accepted)")]
    UnsupportedLanguage {
        found: String,
        accepted: &'static str,
    },

    /// Missing fields, incomplete pairs or empty required collections.
    #[error("{0}")]
    Structural(String),
}

impl RowError {
    pub(crate) fn not_an_integer(field: &'static str, value: &str) -> Self {
        Self::Format {
            field,
            value: value.to_string(),
            reason: "expected an integer",
        }
    }
}

// =============================================================================
// Located Errors
// =============================================================================

/// A [`RowError`] together with the file and 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}:{line}: {source}", .path.display())]
pub struct ParseError {
    pub path: PathBuf,
    pub line: usize,
    #[source]
    pub source: RowError,
}

impl ParseError {
    pub fn new(path: impl Into<PathBuf>, line: usize, source: RowError) -> Self {
        Self {
            path: path.into(),
            line,
            source,
        }
    }
}

// =============================================================================
// Source Errors
// =============================================================================

/// Failure to obtain the text of an input file.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file could not be read.
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes could not be decoded into text.
    #[error("cannot decode '{}' as {encoding}", .path.display())]
    Encoding { path: PathBuf, encoding: String },
}

// =============================================================================
// Validation Errors
// =============================================================================

/// The rendered course does not match the embedded schema.
#[derive(Debug, Error)]
#[error("course JSON failed schema validation: {}", .errors.join("; "))]
pub struct ValidationError {
    pub errors: Vec<String>,
}

// =============================================================================
// Settings Errors
// =============================================================================

/// Errors while loading course settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level error returned by [`crate::transform::pipeline::run`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An input file could not be read.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// A row was rejected.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The course settings could not be loaded.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// The rendered course is not valid against the schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// JSON rendering or reading failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the output file failed.
    #[error("cannot write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for single-row parsing.
pub type RowResult<T> = Result<T, RowError>;

/// Result type for whole-table parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
