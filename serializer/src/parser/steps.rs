//! Step tables: one step per non-blank line, dispatched on the leading tag.
//!
//! ```text
//! vid;title;duration;url[;askForFeedback]
//! txt;title;duration;text
//! exe;title;duration;language;exerciseId;count[;exerciseId;count...]
//! pretest;title;duration;stepsCount;language;exercisesCount;exerciseId;count[...]
//! ```
//!
//! Step ids are shared by every section of the course, so the caller passes
//! the same [`IdSequence`] to each table in turn.

use std::path::Path;

use super::{parse_int, read_source, split_fields, IdSequence};
use crate::config::ACCEPTED_LANGUAGE;
use crate::error::{ParseError, ParseResult, PipelineResult, RowError, RowResult};
use crate::models::{Exercise, ExerciseId, Pretest, Step, StepKind, StepPayload};

const ASK_FOR_FEEDBACK: &str = "askForFeedback";

/// Upper bound on how many following steps one pretest may reserve.
pub const MAX_PRETEST_STEPS: i32 = 10_000;

/// Parse one split step line into a step with the given id.
pub fn parse_step_line(fields: &[&str], step_id: u32) -> RowResult<Step> {
    let tag = fields.first().copied().unwrap_or_default();
    let kind = StepKind::from_tag(tag).ok_or_else(|| RowError::UnknownKind(tag.to_string()))?;

    match kind {
        StepKind::Video => parse_video(fields, step_id),
        StepKind::Text => parse_text(fields, step_id),
        StepKind::Exercise => parse_exercise(fields, step_id),
        StepKind::Pretest => parse_pretest(fields, step_id),
    }
}

fn parse_video(fields: &[&str], step_id: u32) -> RowResult<Step> {
    if !(4..=5).contains(&fields.len()) {
        return Err(RowError::ColumnCount {
            kind: "vid",
            expected: "4 or 5",
            found: fields.len(),
        });
    }

    let duration = parse_int("duration", fields[2])?;

    let ask_for_feedback = match fields.get(4) {
        None => false,
        Some(&ASK_FOR_FEEDBACK) => true,
        Some(other) => {
            return Err(RowError::Format {
                field: "askForFeedback",
                value: (*other).to_string(),
                reason: "fifth column must be absent or the literal 'askForFeedback'",
            })
        }
    };

    Ok(Step {
        step_id,
        title: fields[1].to_string(),
        duration,
        payload: StepPayload::Video {
            url: fields[3].to_string(),
            ask_for_feedback,
        },
    })
}

fn parse_text(fields: &[&str], step_id: u32) -> RowResult<Step> {
    if fields.len() != 4 {
        return Err(RowError::ColumnCount {
            kind: "txt",
            expected: "4",
            found: fields.len(),
        });
    }

    Ok(Step {
        step_id,
        title: fields[1].to_string(),
        duration: parse_int("duration", fields[2])?,
        payload: StepPayload::Text(fields[3].to_string()),
    })
}

fn parse_exercise(fields: &[&str], step_id: u32) -> RowResult<Step> {
    if fields.len() < 6 {
        return Err(RowError::Structural(format!(
            "exe row needs at least 6 fields (title, duration, language and one exerciseId/count pair), found {}",
            fields.len()
        )));
    }

    let duration = parse_int("duration", fields[2])?;
    let language = check_language(fields[3])?;

    let pair_fields = &fields[4..];
    if pair_fields.len() % 2 != 0 {
        return Err(RowError::Structural(format!(
            "exe row has an incomplete exerciseId/count pair: {} fields after the language",
            pair_fields.len()
        )));
    }

    Ok(Step {
        step_id,
        title: fields[1].to_string(),
        duration,
        payload: StepPayload::Exercise(Exercise {
            language,
            exercises: parse_exercise_pairs(pair_fields)?,
        }),
    })
}

fn parse_pretest(fields: &[&str], step_id: u32) -> RowResult<Step> {
    if fields.len() < 8 {
        return Err(RowError::Structural(format!(
            "pretest row needs at least 8 fields, found {}",
            fields.len()
        )));
    }

    let duration = parse_int("duration", fields[2])?;
    let steps_count = parse_int("stepsCount", fields[3])?;
    let exercises_count = parse_int("exercisesCount", fields[5])?;

    if steps_count < 1 {
        return Err(RowError::Structural(format!(
            "pretest must precede at least one step, stepsCount is {steps_count}"
        )));
    }
    if steps_count > MAX_PRETEST_STEPS {
        return Err(RowError::Structural(format!(
            "pretest stepsCount {steps_count} exceeds the limit of {MAX_PRETEST_STEPS}"
        )));
    }
    let steps = reserve_following_ids(step_id, steps_count as u32)?;

    let language = check_language(fields[4])?;

    if exercises_count < 1 {
        return Err(RowError::Structural(format!(
            "pretest needs at least one exercise, exercisesCount is {exercises_count}"
        )));
    }

    // Fields past the declared pairs are ignored.
    let pairs_end = 6 + 2 * exercises_count as usize;
    if fields.len() < pairs_end {
        return Err(RowError::Structural(format!(
            "pretest declares {exercises_count} exercise pair(s) but only has {} field(s) for them",
            fields.len() - 6
        )));
    }

    Ok(Step {
        step_id,
        title: fields[1].to_string(),
        duration,
        payload: StepPayload::Pretest(Pretest {
            steps,
            exercise: Exercise {
                language,
                exercises: parse_exercise_pairs(&fields[6..pairs_end])?,
            },
        }),
    })
}

/// Ids `step_id + 1 ..= step_id + count`, for steps that do not exist yet.
fn reserve_following_ids(step_id: u32, count: u32) -> RowResult<Vec<u32>> {
    let last = step_id.checked_add(count).ok_or_else(|| {
        RowError::Structural(format!(
            "pretest reserves {count} steps after step {step_id}, which overflows the step id range"
        ))
    })?;

    Ok((step_id + 1..=last).collect())
}

fn check_language(value: &str) -> RowResult<String> {
    if value == ACCEPTED_LANGUAGE {
        Ok(value.to_string())
    } else {
        Err(RowError::UnsupportedLanguage {
            found: value.to_string(),
            accepted: ACCEPTED_LANGUAGE,
        })
    }
}

/// Parse `exerciseId;count` pairs. `fields` must have an even length.
fn parse_exercise_pairs(fields: &[&str]) -> RowResult<Vec<ExerciseId>> {
    fields
        .chunks_exact(2)
        .map(|pair| {
            let exercise_id = parse_int("exerciseId", pair[0])?;
            let count = parse_int("count", pair[1])?;
            Ok(ExerciseId::new(exercise_id, count))
        })
        .collect()
}

/// Parse a whole step table.
///
/// Blank lines are skipped without consuming an id. Every other line takes
/// `ids.current()` and advances the sequence by exactly one, whatever its
/// kind. The first bad line aborts with its 1-based line number.
pub fn parse_steps(content: &str, path: &Path, ids: &mut IdSequence) -> ParseResult<Vec<Step>> {
    let mut steps = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let fields = split_fields(line);
        let step = parse_step_line(&fields, ids.current())
            .and_then(|step| ids.advance().map(|_| step))
            .map_err(|e| ParseError::new(path, line_idx + 1, e))?;

        steps.push(step);
    }

    Ok(steps)
}

/// Read and parse the step table at `path`, continuing the shared id sequence.
pub fn load_steps(
    path: &Path,
    ids: &mut IdSequence,
    encoding: Option<&str>,
) -> PipelineResult<Vec<Step>> {
    let content = read_source(path, encoding)?;
    Ok(parse_steps(&content, path, ids)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(input: &str, step_id: u32) -> RowResult<Step> {
        parse_step_line(&split_fields(input), step_id)
    }

    fn table(content: &str, ids: &mut IdSequence) -> ParseResult<Vec<Step>> {
        parse_steps(content, Path::new("intro-courseSteps.csv"), ids)
    }

    // -------------------------------------------------------------------------
    // vid
    // -------------------------------------------------------------------------

    #[test]
    fn test_video_without_feedback() {
        let step = line("vid;Úvodní video;4;https://youtu.be/abc", 1).unwrap();
        assert_eq!(step.step_id, 1);
        assert_eq!(step.title, "Úvodní video");
        assert_eq!(step.duration, 4);
        assert_eq!(
            step.payload,
            StepPayload::Video {
                url: "https://youtu.be/abc".into(),
                ask_for_feedback: false
            }
        );

        let json = serde_json::to_value(&step).unwrap();
        assert!(json.get("askForFeedback").is_none());
    }

    #[test]
    fn test_video_with_feedback() {
        let step = line("vid;Video;4;https://youtu.be/abc;askForFeedback", 3).unwrap();
        assert!(matches!(
            step.payload,
            StepPayload::Video { ask_for_feedback: true, .. }
        ));
    }

    #[test]
    fn test_video_bad_feedback_literal() {
        let err = line("vid;Video;4;https://youtu.be/abc;true", 1).unwrap_err();
        assert!(matches!(
            err,
            RowError::Format { field: "askForFeedback", ref value, .. } if value == "true"
        ));
    }

    #[test]
    fn test_video_column_count() {
        let err = line("vid;Video;4", 1).unwrap_err();
        assert!(matches!(err, RowError::ColumnCount { kind: "vid", found: 3, .. }));

        let err = line("vid;Video;4;url;askForFeedback;x", 1).unwrap_err();
        assert!(matches!(err, RowError::ColumnCount { kind: "vid", found: 6, .. }));
    }

    // -------------------------------------------------------------------------
    // txt
    // -------------------------------------------------------------------------

    #[test]
    fn test_text() {
        let step = line("txt;Vítejte;5;Ahoj světe", 1).unwrap();
        assert_eq!(
            step,
            Step {
                step_id: 1,
                title: "Vítejte".into(),
                duration: 5,
                payload: StepPayload::Text("Ahoj světe".into()),
            }
        );
    }

    #[test]
    fn test_text_keeps_field_whitespace() {
        let step = line("txt; Nadpis ;5; text ", 1).unwrap();
        assert_eq!(step.title, " Nadpis ");
        assert_eq!(step.payload, StepPayload::Text(" text ".into()));
    }

    #[test]
    fn test_text_column_count() {
        let err = line("txt;Vítejte;5;Ahoj;světe", 1).unwrap_err();
        assert!(matches!(err, RowError::ColumnCount { kind: "txt", found: 5, .. }));
    }

    #[test]
    fn test_bad_duration() {
        let err = line("txt;Vítejte;pět;Ahoj", 1).unwrap_err();
        assert!(matches!(
            err,
            RowError::Format { field: "duration", ref value, .. } if value == "pět"
        ));
    }

    // -------------------------------------------------------------------------
    // exe
    // -------------------------------------------------------------------------

    #[test]
    fn test_exercise_pairs() {
        let step = line("exe;Cvičení;10;cs;101;3;102;1", 7).unwrap();
        let StepPayload::Exercise(exercise) = step.payload else {
            panic!("expected exercise payload");
        };
        assert_eq!(exercise.language, "cs");
        assert_eq!(
            exercise.exercises,
            vec![ExerciseId::new(101, 3), ExerciseId::new(102, 1)]
        );
    }

    #[test]
    fn test_exercise_needs_one_pair() {
        let err = line("exe;Cvičení;10;cs;101", 1).unwrap_err();
        assert!(matches!(err, RowError::Structural(_)));
    }

    #[test]
    fn test_exercise_incomplete_pair() {
        let err = line("exe;Cvičení;10;cs;101;3;102", 1).unwrap_err();
        assert!(matches!(err, RowError::Structural(ref msg) if msg.contains("incomplete")));
    }

    #[test]
    fn test_exercise_language() {
        let err = line("exe;Exercise;10;en;101;3", 1).unwrap_err();
        assert_eq!(
            err,
            RowError::UnsupportedLanguage {
                found: "en".into(),
                accepted: "cs"
            }
        );
    }

    #[test]
    fn test_exercise_bad_count() {
        let err = line("exe;Cvičení;10;cs;101;x", 1).unwrap_err();
        assert!(matches!(err, RowError::Format { field: "count", .. }));
    }

    // -------------------------------------------------------------------------
    // pretest
    // -------------------------------------------------------------------------

    #[test]
    fn test_pretest_reserves_following_ids() {
        let step = line("pretest;Vstupní test;15;2;cs;1;201;4", 10).unwrap();
        assert_eq!(step.step_id, 10);
        let StepPayload::Pretest(pretest) = step.payload else {
            panic!("expected pretest payload");
        };
        assert_eq!(pretest.steps, vec![11, 12]);
        assert_eq!(pretest.exercise.language, "cs");
        assert_eq!(pretest.exercise.exercises, vec![ExerciseId::new(201, 4)]);
    }

    #[test]
    fn test_pretest_multiple_pairs_and_trailing_fields() {
        let step = line("pretest;Test;15;1;cs;2;201;4;202;5;ignored", 1).unwrap();
        let StepPayload::Pretest(pretest) = step.payload else {
            panic!("expected pretest payload");
        };
        assert_eq!(pretest.steps, vec![2]);
        assert_eq!(
            pretest.exercise.exercises,
            vec![ExerciseId::new(201, 4), ExerciseId::new(202, 5)]
        );
    }

    #[test]
    fn test_pretest_too_short() {
        let err = line("pretest;Test;15;2;cs;1;201", 1).unwrap_err();
        assert!(matches!(err, RowError::Structural(_)));
    }

    #[test]
    fn test_pretest_zero_steps() {
        let err = line("pretest;Test;15;0;cs;1;201;4", 1).unwrap_err();
        assert!(matches!(err, RowError::Structural(ref msg) if msg.contains("stepsCount")));
    }

    #[test]
    fn test_pretest_negative_steps_count() {
        let err = line("pretest;Test;15;-2;cs;1;201;4", 1).unwrap_err();
        assert!(matches!(err, RowError::Structural(ref msg) if msg.contains("stepsCount")));
    }

    #[test]
    fn test_pretest_huge_steps_count() {
        let err = line("pretest;T;1;2000000000;cs;1;1;1", 1).unwrap_err();
        assert!(matches!(err, RowError::Structural(ref msg) if msg.contains("2000000000")));

        let step = line(&format!("pretest;T;1;{MAX_PRETEST_STEPS};cs;1;1;1"), 1).unwrap();
        let StepPayload::Pretest(pretest) = step.payload else {
            panic!("expected pretest payload");
        };
        assert_eq!(pretest.steps.len(), MAX_PRETEST_STEPS as usize);
    }

    #[test]
    fn test_pretest_reservation_overflow() {
        let err = line("pretest;T;1;2;cs;1;1;1", u32::MAX - 1).unwrap_err();
        assert!(matches!(err, RowError::Structural(ref msg) if msg.contains("overflows")));
    }

    #[test]
    fn test_pretest_zero_exercises() {
        let err = line("pretest;Test;15;2;cs;0;201;4", 1).unwrap_err();
        assert!(matches!(err, RowError::Structural(ref msg) if msg.contains("exercisesCount")));
    }

    #[test]
    fn test_pretest_negative_exercises_count() {
        let err = line("pretest;Test;15;2;cs;-1;201;4", 1).unwrap_err();
        assert!(matches!(err, RowError::Structural(ref msg) if msg.contains("exercisesCount")));
    }

    #[test]
    fn test_pretest_bad_exercises_count() {
        let err = line("pretest;Test;15;2;cs;jeden;201;4", 1).unwrap_err();
        assert!(matches!(
            err,
            RowError::Format { field: "exercisesCount", ref value, .. } if value == "jeden"
        ));
    }

    #[test]
    fn test_pretest_missing_declared_pairs() {
        let err = line("pretest;Test;15;2;cs;2;201;4", 1).unwrap_err();
        assert!(matches!(err, RowError::Structural(ref msg) if msg.contains("2 exercise pair")));
    }

    #[test]
    fn test_pretest_language() {
        let err = line("pretest;Test;15;2;sk;1;201;4", 1).unwrap_err();
        assert!(matches!(err, RowError::UnsupportedLanguage { .. }));
    }

    #[test]
    fn test_pretest_bad_steps_count() {
        let err = line("pretest;Test;15;two;cs;1;201;4", 1).unwrap_err();
        assert!(matches!(err, RowError::Format { field: "stepsCount", .. }));
    }

    // -------------------------------------------------------------------------
    // dispatch and tables
    // -------------------------------------------------------------------------

    #[test]
    fn test_unknown_kind() {
        let err = line("quiz;Kvíz;5;otázka", 1).unwrap_err();
        assert_eq!(err, RowError::UnknownKind("quiz".into()));
    }

    #[test]
    fn test_table_skips_blank_lines_without_consuming_ids() {
        let content = "txt;A;1;a\n\n   \nvid;B;2;url\n\t\ntxt;C;3;c\n";
        let mut ids = IdSequence::new();
        let steps = table(content, &mut ids).unwrap();

        let ids_seen: Vec<u32> = steps.iter().map(|s| s.step_id).collect();
        assert_eq!(ids_seen, vec![1, 2, 3]);
        assert_eq!(ids.current(), 4);
    }

    #[test]
    fn test_pretest_advances_counter_by_one() {
        let content = "pretest;Test;15;2;cs;1;201;4\ntxt;A;1;a\ntxt;B;1;b\n";
        let mut ids = IdSequence::starting_at(10);
        let steps = table(content, &mut ids).unwrap();

        assert_eq!(steps[0].step_id, 10);
        assert_eq!(steps[1].step_id, 11);
        assert_eq!(steps[2].step_id, 12);
        assert_eq!(ids.current(), 13);
    }

    #[test]
    fn test_table_continues_shared_sequence() {
        let mut ids = IdSequence::new();
        let first = table("txt;A;1;a\ntxt;B;1;b", &mut ids).unwrap();
        let second = table("txt;C;1;c", &mut ids).unwrap();

        assert_eq!(first.last().map(|s| s.step_id), Some(2));
        assert_eq!(second[0].step_id, 3);
    }

    #[test]
    fn test_table_stops_at_end_of_id_range() {
        let mut ids = IdSequence::starting_at(u32::MAX);
        let err = table("\ntxt;A;1;a\n", &mut ids).unwrap_err();

        assert_eq!(err.line, 2);
        assert!(matches!(err.source, RowError::Structural(ref msg) if msg.contains("exhausted")));
    }

    #[test]
    fn test_table_error_reports_line_number() {
        let content = "txt;A;1;a\n\nquiz;B;1;b\n";
        let err = table(content, &mut IdSequence::new()).unwrap_err();

        assert_eq!(err.line, 3);
        assert_eq!(err.path, Path::new("intro-courseSteps.csv"));
        assert_eq!(err.source, RowError::UnknownKind("quiz".into()));
    }

    #[test]
    fn test_crlf_lines() {
        let steps = table("txt;A;1;a\r\nvid;B;2;url\r\n", &mut IdSequence::new()).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].payload, StepPayload::Text("a".into()));
    }
}
