//! Domain models for the course tree.
//!
//! - [`Course`] - the root document written to `course.json`
//! - [`Section`] - a chapter of the course with its ordered steps
//! - [`Step`] - one content unit carrying exactly one [`StepPayload`]
//! - [`Exercise`] / [`ExerciseId`] - references into the external exercise bank
//! - [`SectionMetaData`] - one row of `sectionsInfo.csv`, input only
//!
//! Field names serialize in camelCase and in declaration order, which is
//! the wire format consumers of `course.json` rely on.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Course
// =============================================================================

/// The whole course: fixed header fields followed by its sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub grade: i32,
    pub language: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Course {
    /// Count sections, steps and steps per kind.
    pub fn stats(&self) -> CourseStats {
        let mut stats = CourseStats {
            sections: self.sections.len(),
            ..CourseStats::default()
        };

        for step in self.sections.iter().flat_map(|s| s.steps.iter()) {
            stats.steps += 1;
            match step.payload.kind() {
                StepKind::Video => stats.videos += 1,
                StepKind::Text => stats.texts += 1,
                StepKind::Exercise => stats.exercises += 1,
                StepKind::Pretest => stats.pretests += 1,
            }
        }

        stats
    }
}

/// Summary counts reported after a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CourseStats {
    pub sections: usize,
    pub steps: usize,
    pub videos: usize,
    pub texts: usize,
    pub exercises: usize,
    pub pretests: usize,
}

// =============================================================================
// Section
// =============================================================================

/// One row of the section metadata table.
///
/// `folder_name` only locates the section's step file and never reaches
/// the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionMetaData {
    pub section_id: u32,
    pub folder_name: String,
    pub slug: String,
    pub title: String,
}

/// A section of the course with its steps in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub section_id: u32,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Section {
    /// Build a section from its metadata row and parsed steps.
    pub fn new(meta: SectionMetaData, steps: Vec<Step>) -> Self {
        Self {
            section_id: meta.section_id,
            slug: meta.slug,
            title: meta.title,
            steps,
        }
    }
}

// =============================================================================
// Exercises
// =============================================================================

/// A set of exercises in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub language: String,
    pub exercises: Vec<ExerciseId>,
}

/// Reference to an exercise in the external bank and how many instances
/// of it to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseId {
    pub exercise_id: i32,
    pub count: i32,
}

impl ExerciseId {
    pub fn new(exercise_id: i32, count: i32) -> Self {
        Self { exercise_id, count }
    }
}

/// Placement test: the step ids it stands in front of plus its exercises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pretest {
    pub steps: Vec<u32>,
    pub exercise: Exercise,
}

// =============================================================================
// Step
// =============================================================================

/// Row kind selected by the leading tag of a step line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Video,
    Text,
    Exercise,
    Pretest,
}

impl StepKind {
    /// Look up a kind by its CSV tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "vid" => Some(Self::Video),
            "txt" => Some(Self::Text),
            "exe" => Some(Self::Exercise),
            "pretest" => Some(Self::Pretest),
            _ => None,
        }
    }

    /// The CSV tag for this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Video => "vid",
            Self::Text => "txt",
            Self::Exercise => "exe",
            Self::Pretest => "pretest",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// The content of a step. Exactly one variant per step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepPayload {
    Video { url: String, ask_for_feedback: bool },
    Text(String),
    Exercise(Exercise),
    Pretest(Pretest),
}

impl StepPayload {
    pub fn kind(&self) -> StepKind {
        match self {
            Self::Video { .. } => StepKind::Video,
            Self::Text(_) => StepKind::Text,
            Self::Exercise(_) => StepKind::Exercise,
            Self::Pretest(_) => StepKind::Pretest,
        }
    }
}

/// A single course step.
///
/// Serialized through [`StepRecord`], which flattens the payload into the
/// optional `video`/`askForFeedback`/`exercise`/`text`/`pretest` keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StepRecord", into = "StepRecord")]
pub struct Step {
    pub step_id: u32,
    pub title: String,
    pub duration: i32,
    pub payload: StepPayload,
}

/// Wire shape of a [`Step`].
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct StepRecord {
    step_id: u32,
    title: String,
    duration: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ask_for_feedback: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exercise: Option<Exercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pretest: Option<Pretest>,
}

impl From<Step> for StepRecord {
    fn from(step: Step) -> Self {
        let mut record = StepRecord {
            step_id: step.step_id,
            title: step.title,
            duration: step.duration,
            video: None,
            ask_for_feedback: None,
            exercise: None,
            text: None,
            pretest: None,
        };

        match step.payload {
            StepPayload::Video {
                url,
                ask_for_feedback,
            } => {
                record.video = Some(url);
                record.ask_for_feedback = ask_for_feedback.then_some(true);
            }
            StepPayload::Text(text) => record.text = Some(text),
            StepPayload::Exercise(exercise) => record.exercise = Some(exercise),
            StepPayload::Pretest(pretest) => record.pretest = Some(pretest),
        }

        record
    }
}

impl TryFrom<StepRecord> for Step {
    type Error = String;

    fn try_from(record: StepRecord) -> Result<Self, Self::Error> {
        let step_id = record.step_id;

        if record.ask_for_feedback.is_some() && record.video.is_none() {
            return Err(format!("step {step_id}: askForFeedback requires video"));
        }

        let mut payloads = Vec::with_capacity(1);
        if let Some(url) = record.video {
            payloads.push(StepPayload::Video {
                url,
                ask_for_feedback: record.ask_for_feedback.unwrap_or(false),
            });
        }
        if let Some(exercise) = record.exercise {
            payloads.push(StepPayload::Exercise(exercise));
        }
        if let Some(text) = record.text {
            payloads.push(StepPayload::Text(text));
        }
        if let Some(pretest) = record.pretest {
            payloads.push(StepPayload::Pretest(pretest));
        }

        if payloads.len() != 1 {
            return Err(format!(
                "step {step_id}: expected exactly one of video, exercise, text, pretest; found {}",
                payloads.len()
            ));
        }

        Ok(Step {
            step_id,
            title: record.title,
            duration: record.duration,
            payload: payloads.remove(0),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
