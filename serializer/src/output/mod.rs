//! Rendering and writing of `course.json`.
//!
//! Output is pretty-printed with two-space indentation and a trailing
//! newline. Non-ASCII text is written as-is, and absent step payloads are
//! left out rather than written as `null`.

use std::fs;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult, SourceError};
use crate::models::Course;

/// Render the course as it is written to disk.
pub fn to_json(course: &Course) -> serde_json::Result<String> {
    let mut json = serde_json::to_string_pretty(course)?;
    json.push('\n');
    Ok(json)
}

/// Parse a rendered course back into the typed tree.
pub fn from_json(json: &str) -> serde_json::Result<Course> {
    serde_json::from_str(json)
}

/// Write already rendered JSON to `path`, creating parent directories and
/// replacing any existing file.
pub fn write_json(json: &str, path: &Path) -> PipelineResult<()> {
    let write_err = |source: std::io::Error| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, json).map_err(write_err)
}

/// Render and write the course in one step.
pub fn write_course(course: &Course, path: &Path) -> PipelineResult<()> {
    let json = to_json(course)?;
    write_json(&json, path)
}

/// Load a previously written `course.json`.
pub fn read_course(path: &Path) -> PipelineResult<Course> {
    let content = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(from_json(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Exercise, ExerciseId, Pretest, Section, Step, StepPayload};

    fn sample_course() -> Course {
        Course {
            slug: "priprava-na-prijimacky".into(),
            title: "Příprava na přijímačky".into(),
            description: "Online kurz".into(),
            grade: 9,
            language: "cs".into(),
            sections: vec![Section {
                section_id: 1,
                slug: "uvod".into(),
                title: "Úvod".into(),
                steps: vec![
                    Step {
                        step_id: 1,
                        title: "Vstupní test".into(),
                        duration: 15,
                        payload: StepPayload::Pretest(Pretest {
                            steps: vec![2],
                            exercise: Exercise {
                                language: "cs".into(),
                                exercises: vec![ExerciseId::new(201, 4)],
                            },
                        }),
                    },
                    Step {
                        step_id: 2,
                        title: "Vítejte".into(),
                        duration: 5,
                        payload: StepPayload::Text("Ahoj světe".into()),
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_non_ascii_written_literally() {
        let json = to_json(&sample_course()).unwrap();
        assert!(json.contains("\"title\": \"Příprava na přijímačky\""));
        assert!(json.contains("Ahoj světe"));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn test_no_nulls_and_trailing_newline() {
        let json = to_json(&sample_course()).unwrap();
        assert!(!json.contains("null"));
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn test_course_key_order() {
        let json = to_json(&sample_course()).unwrap();
        let keys = [
            "\"slug\"",
            "\"title\"",
            "\"description\"",
            "\"grade\"",
            "\"language\"",
            "\"sections\"",
        ];
        let positions: Vec<usize> = keys
            .iter()
            .map(|key| json.find(key).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_round_trip() {
        let course = sample_course();
        let json = to_json(&course).unwrap();
        assert_eq!(from_json(&json).unwrap(), course);
    }

    #[test]
    fn test_write_creates_parent_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("nested").join("course.json");

        write_json("stale", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "stale");

        write_course(&sample_course(), &path).unwrap();
        let course = read_course(&path).unwrap();
        assert_eq!(course, sample_course());
    }
}
