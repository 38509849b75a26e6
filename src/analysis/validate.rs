//! Validation of decoded analysis records.
//!
//! Syntactically valid JSON is not trusted as-is: the shape must match the
//! record exactly and the numeric fields must fall in their documented
//! ranges.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use super::DocumentAnalysis;

/// A single problem found while validating a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// JSON path of the offending value, e.g. `sections[2].importance`.
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// The reply decoded as JSON but does not describe a valid analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Analysis failed validation: {}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Decode a JSON value into a [`DocumentAnalysis`], checking shape and ranges.
pub fn decode_analysis(value: Value) -> Result<DocumentAnalysis, ValidationError> {
    if !value.is_object() {
        return Err(ValidationError {
            issues: vec![ValidationIssue::new(
                "$",
                format!("expected a JSON object, found {}", json_type_name(&value)),
            )],
        });
    }

    let analysis: DocumentAnalysis =
        serde_json::from_value(value).map_err(|e| ValidationError {
            issues: vec![ValidationIssue::new("$", e.to_string())],
        })?;

    let issues = check_ranges(&analysis);
    if issues.is_empty() {
        Ok(analysis)
    } else {
        Err(ValidationError { issues })
    }
}

fn check_ranges(analysis: &DocumentAnalysis) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if analysis.abstract_text.trim().is_empty() {
        issues.push(ValidationIssue::new("abstract", "must not be empty"));
    }
    if analysis.summary.trim().is_empty() {
        issues.push(ValidationIssue::new("summary", "must not be empty"));
    }

    check_unit_interval(&mut issues, "sentiment.score", analysis.sentiment.score);
    for (i, section) in analysis.sections.iter().enumerate() {
        check_unit_interval(
            &mut issues,
            &format!("sections[{}].importance", i),
            section.importance,
        );
    }

    issues
}

fn check_unit_interval(issues: &mut Vec<ValidationIssue>, path: &str, value: f64) {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        issues.push(ValidationIssue::new(
            path,
            format!("must be between 0.0 and 1.0, got {}", value),
        ));
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
