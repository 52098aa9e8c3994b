//! High-level pipeline: section table → step tables → course tree → JSON.
//!
//! Every input is parsed before anything is written, so a bad row leaves an
//! existing `course.json` untouched.
//!
//! # Example
//!
//! ```rust,ignore
//! use course_serializer::{run, ConvertOptions};
//!
//! let result = run(&ConvertOptions::default())?;
//! println!("{} steps in {} sections", result.stats.steps, result.stats.sections);
//! ```

use std::path::PathBuf;

use super::assembler::CourseBuilder;
use crate::config::ConvertOptions;
use crate::error::PipelineResult;
use crate::logs::{log_debug_indent, log_info, log_info_indent, log_success, log_warning};
use crate::models::{Course, CourseStats, Step, StepPayload};
use crate::output::{to_json, write_json};
use crate::parser::{load_sections, load_steps, IdSequence};
use crate::validation::validate_course;

/// Result of a complete conversion run
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// The assembled course
    pub course: Course,
    /// Section and step counts
    pub stats: CourseStats,
    /// The rendered JSON, exactly as written
    pub json: String,
    /// Where the JSON was written; `None` on a dry run
    pub output_path: Option<PathBuf>,
}

/// Parse every input table and assemble the course, without validating or
/// writing anything.
pub fn build_course(options: &ConvertOptions) -> PipelineResult<Course> {
    let sections_path = options.sections_path();
    log_info(format!("📖 Reading sections from {}", sections_path.display()));

    let encoding = options.encoding.as_deref();
    let metadata = load_sections(&sections_path, encoding)?;
    if metadata.is_empty() {
        log_warning(format!("{} has no sections", sections_path.display()));
    } else {
        log_success(format!("{} section(s)", metadata.len()));
    }

    let mut step_ids = IdSequence::new();
    let mut builder = CourseBuilder::new(&options.settings);

    for meta in metadata {
        let steps_path = options.steps_path(&meta.folder_name);
        log_info(format!(
            "📄 Section {} \"{}\" ← {}",
            meta.section_id,
            meta.title,
            steps_path.display()
        ));

        let steps = load_steps(&steps_path, &mut step_ids, encoding)?;
        log_steps(&steps);
        log_info_indent(format!("{} step(s)", steps.len()), 1);

        builder.add_section(meta, steps);
    }

    Ok(builder.build())
}

/// Run the full pipeline: build, validate, render and write.
pub fn run(options: &ConvertOptions) -> PipelineResult<ConvertResult> {
    let course = build_course(options)?;
    let stats = course.stats();
    print_stats(&stats);

    if options.skip_validation {
        log_info("(validation skipped)");
    } else {
        log_info("✔️  Validating course JSON...");
        validate_course(&course)?;
        log_success("Course matches the schema");
    }

    let json = to_json(&course)?;

    let output_path = if options.dry_run {
        log_info("Dry run, nothing written");
        None
    } else {
        write_json(&json, &options.output_path)?;
        log_success(format!("💾 Written to {}", options.output_path.display()));
        Some(options.output_path.clone())
    };

    Ok(ConvertResult {
        course,
        stats,
        json,
        output_path,
    })
}

/// One debug line per step
fn log_steps(steps: &[Step]) {
    for step in steps {
        let detail = match &step.payload {
            StepPayload::Video { url, ask_for_feedback: true } => format!("{url} (feedback)"),
            StepPayload::Video { url, .. } => url.clone(),
            StepPayload::Text(_) => String::new(),
            StepPayload::Exercise(exercise) => format!("{} exercise(s)", exercise.exercises.len()),
            StepPayload::Pretest(pretest) => format!("reserves {:?}", pretest.steps),
        };
        log_debug_indent(
            format!(
                "#{} [{}] {} ({} min) {}",
                step.step_id,
                step.payload.kind(),
                step.title,
                step.duration,
                detail
            ),
            1,
        );
    }
}

/// Print the summary counts
fn print_stats(stats: &CourseStats) {
    log_success(format!(
        "{} section(s), {} step(s)",
        stats.sections, stats.steps
    ));
    log_info_indent(
        format!(
            "video: {}, text: {}, exercise: {}, pretest: {}",
            stats.videos, stats.texts, stats.exercises, stats.pretests
        ),
        1,
    );
}
