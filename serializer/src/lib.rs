//! # Course Serializer - course step tables to `course.json`
//!
//! Converts the semicolon-delimited tables that describe a course (one
//! metadata table listing the sections, one step table per section) into a
//! single nested JSON document.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ sectionsInfo.csv │────▶│  Metadata   │────▶│  Assembler  │────▶│ course.json │
//! │ *-courseSteps.csv│────▶│ Step parser │────▶│ (tree)      │     │ (validated) │
//! └──────────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use course_serializer::{run, ConvertOptions};
//!
//! let result = run(&ConvertOptions::default()).unwrap();
//! println!("Wrote {} steps", result.stats.steps);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy
//! - [`config`] - Course settings and run options
//! - [`models`] - Course tree (Course, Section, Step)
//! - [`parser`] - Section and step table parsing
//! - [`transform`] - Tree assembly and the pipeline
//! - [`output`] - JSON rendering and writing
//! - [`validation`] - Course JSON schema
//! - [`logs`] - Progress logging

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod models;

// Parsing
pub mod parser;

// Assembly and pipeline
pub mod transform;

// Output
pub mod output;

// Validation
pub mod validation;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{
    ParseError,
    PipelineError,
    RowError,
    SettingsError,
    SourceError,
    ValidationError,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{ConvertOptions, CourseSettings, SettingsOverrides};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    Course,
    CourseStats,
    Exercise,
    ExerciseId,
    Pretest,
    Section,
    SectionMetaData,
    Step,
    StepKind,
    StepPayload,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    load_sections,
    load_steps,
    parse_section_line,
    parse_sections,
    parse_step_line,
    parse_steps,
    IdSequence,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::{assemble, build_course, run, ConvertResult, CourseBuilder};

// =============================================================================
// Re-exports - Output and Validation
// =============================================================================

pub use output::{read_course, to_json, write_course};
pub use validation::{is_valid_course, validate_course, validate_course_json};
