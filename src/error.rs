use thiserror::Error;

use crate::types::{PrimitiveKind, ValidationIssue};

/// Configuration and programming defects raised by the validation engine.
///
/// These are never accumulated as validation issues: a declaration that
/// names an unknown value set or a registry populated twice for one type is
/// a bug in the caller's setup, not a property of the validated document.
#[derive(Error, Debug)]
pub enum FhirValidationError {
    #[error("Validator already registered for type: {type_name}")]
    DuplicateValidator { type_name: &'static str },

    #[error("Primitive validator already registered for kind: {kind}")]
    DuplicatePrimitiveValidator { kind: PrimitiveKind },

    #[error("Value set already registered: {name}")]
    DuplicateValueSet { name: String },

    #[error("Unknown value set '{name}' referenced at {location}")]
    UnknownValueSet { name: String, location: String },

    #[error("Maximum validation depth {limit} exceeded at {location}")]
    DepthLimitExceeded { limit: usize, location: String },

    #[error(transparent)]
    Failed(#[from] ValidationFailure),
}

impl FhirValidationError {
    pub fn unknown_value_set(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self::UnknownValueSet {
            name: name.into(),
            location: location.into(),
        }
    }

    pub fn depth_limit_exceeded(limit: usize, location: impl Into<String>) -> Self {
        Self::DepthLimitExceeded {
            limit,
            location: location.into(),
        }
    }

    /// True for defects in engine setup rather than in the validated data.
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// Aggregate failure produced by `Validation::raise_if_errors`.
///
/// The message lists one line per ERROR or WARNING issue in insertion order.
#[derive(Error, Debug, Clone)]
#[error(
    "Validation failed with {} issue(s), {error_count} error(s):\n{}",
    .lines.len(),
    .lines.join("\n")
)]
pub struct ValidationFailure {
    pub error_count: usize,
    pub lines: Vec<String>,
}

impl ValidationFailure {
    pub fn from_issues<'a>(issues: impl IntoIterator<Item = &'a ValidationIssue>) -> Self {
        let mut error_count = 0;
        let mut lines = Vec::new();
        for issue in issues {
            if issue.severity().is_error() {
                error_count += 1;
            }
            if issue.severity().is_reportable() {
                lines.push(issue.to_string());
            }
        }
        Self { error_count, lines }
    }
}

pub type Result<T> = std::result::Result<T, FhirValidationError>;
