//! JSON Schema validation of the rendered course.
//!
//! The schema is embedded at compile time from `schemas/course.json` and
//! pins down the wire format: required keys, integer ids, exactly one
//! payload key per step, and `askForFeedback` only next to `video`.
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use course_serializer::validation::is_valid_course;
//!
//! let course = json!({
//!     "slug": "uvod", "title": "Úvod", "description": "", "grade": 9,
//!     "language": "cs", "sections": []
//! });
//! assert!(is_valid_course(&course));
//! ```

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::ValidationError;
use crate::models::Course;

static COURSE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/course.json"))
        .expect("Invalid embedded schema")
});

/// Validate a JSON value against a schema.
///
/// # Returns
/// * `Ok(())` when valid
/// * `Err(Vec<String>)` with one message per violation
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Quick true/false check against a schema.
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

/// The embedded course schema.
pub fn course_schema() -> &'static Value {
    &COURSE_SCHEMA
}

/// Validate an arbitrary JSON document against the course schema.
pub fn validate_course_json(data: &Value) -> Result<(), ValidationError> {
    validate(course_schema(), data).map_err(|errors| ValidationError { errors })
}

/// Quick check against the course schema.
pub fn is_valid_course(data: &Value) -> bool {
    is_valid(course_schema(), data)
}

/// Render a typed course and validate it against the course schema.
pub fn validate_course(course: &Course) -> Result<(), ValidationError> {
    let value = serde_json::to_value(course).map_err(|e| ValidationError {
        errors: vec![e.to_string()],
    })?;
    validate_course_json(&value)
}
