//! Course settings and pipeline options.
//!
//! The course header (slug, title, description, grade, language) is not part
//! of any input table. It comes from [`CourseSettings`], which defaults to
//! the values of the current course and can be overridden from a JSON file,
//! CLI flags or environment variables.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SettingsError;

/// Name of the section metadata table inside the input directory.
pub const SECTIONS_FILE: &str = "sectionsInfo.csv";

/// Suffix appended to a section's folder name to locate its step table.
pub const STEPS_FILE_SUFFIX: &str = "-courseSteps.csv";

/// The only exercise language currently accepted.
pub const ACCEPTED_LANGUAGE: &str = "cs";

/// Default input directory, relative to the working directory.
pub const DEFAULT_INPUT_DIR: &str = "in";

/// Default output file, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "out/course.json";

/// File name of the step table for a section folder.
pub fn steps_file_name(folder_name: &str) -> String {
    format!("{folder_name}{STEPS_FILE_SUFFIX}")
}

// =============================================================================
// Course Settings
// =============================================================================

/// Course-level fields written at the top of `course.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CourseSettings {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub grade: i32,
    pub language: String,
}

impl Default for CourseSettings {
    fn default() -> Self {
        Self {
            slug: "priprava-na-prijimacky".to_string(),
            title: "Příprava na přijímačky".to_string(),
            description: "Online kurz pro deváťáky. Příprava na přijímací zkoušky z matematiky do středních škol."
                .to_string(),
            grade: 9,
            language: "cs".to_string(),
        }
    }
}

impl CourseSettings {
    /// Load settings from a JSON file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply individual overrides on top of these settings.
    pub fn with_overrides(mut self, overrides: SettingsOverrides) -> Self {
        if let Some(slug) = overrides.slug {
            self.slug = slug;
        }
        if let Some(title) = overrides.title {
            self.title = title;
        }
        if let Some(description) = overrides.description {
            self.description = description;
        }
        if let Some(grade) = overrides.grade {
            self.grade = grade;
        }
        if let Some(language) = overrides.language {
            self.language = language;
        }
        self
    }
}

/// Per-field overrides, typically sourced from CLI flags or the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub grade: Option<i32>,
    pub language: Option<String>,
}

// =============================================================================
// Pipeline Options
// =============================================================================

/// Options for a full conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Directory holding `sectionsInfo.csv` and the step tables.
    pub input_dir: PathBuf,
    /// Where `course.json` is written.
    pub output_path: PathBuf,
    /// Course header fields.
    pub settings: CourseSettings,
    /// Input encoding label; auto-detected when `None`.
    pub encoding: Option<String>,
    /// Parse and validate, but do not write the output file.
    pub dry_run: bool,
    /// Skip the schema check before writing.
    pub skip_validation: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            settings: CourseSettings::default(),
            encoding: None,
            dry_run: false,
            skip_validation: false,
        }
    }
}

impl ConvertOptions {
    /// Path of the section metadata table.
    pub fn sections_path(&self) -> PathBuf {
        self.input_dir.join(SECTIONS_FILE)
    }

    /// Path of the step table for a section folder.
    pub fn steps_path(&self, folder_name: &str) -> PathBuf {
        self.input_dir.join(steps_file_name(folder_name))
    }
}
