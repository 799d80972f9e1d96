//! The issue accumulator threaded through a validation run.

use serde::Serialize;

use crate::error::ValidationFailure;
use crate::types::{CodedEnum, IssueDefinition, LocationContext, Severity, ValidationIssue};

/// Per-severity issue counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IssueCounts {
    pub errors: usize,
    pub warnings: usize,
    pub information: usize,
}

/// Ordered, append-only list of issues found during one validation run.
///
/// Child validators return their own `Validation`, which the parent merges
/// before returning; issues are never dropped on the way up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validation {
    issues: Vec<ValidationIssue>,
}

impl Validation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_issue(&mut self, definition: IssueDefinition, location: &LocationContext) {
        self.issues
            .push(ValidationIssue::new(definition, location.clone()));
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Records `definition` unless `condition` holds. Returns `condition`.
    pub fn check_true(
        &mut self,
        condition: bool,
        definition: &IssueDefinition,
        location: &LocationContext,
    ) -> bool {
        if !condition {
            self.add_issue(definition.clone(), location);
        }
        condition
    }

    /// Records `definition` if `value` is `None`; passes the value through.
    pub fn check_not_null<'v, T: ?Sized>(
        &mut self,
        value: Option<&'v T>,
        definition: &IssueDefinition,
        location: &LocationContext,
    ) -> Option<&'v T> {
        if value.is_none() {
            self.add_issue(definition.clone(), location);
        }
        value
    }

    /// Resolves a present code against `E`, recording `definition` when the
    /// code is not a member. Absent codes resolve to `None` silently.
    pub fn check_code<E: CodedEnum>(
        &mut self,
        code: Option<&str>,
        definition: &IssueDefinition,
        location: &LocationContext,
    ) -> Option<E> {
        let code = code?;
        let member = E::from_code(code);
        if member.is_none() {
            self.add_issue(definition.clone(), location);
        }
        member
    }

    /// Appends `other`'s issues after this accumulator's own.
    pub fn merge(&mut self, other: Validation) {
        self.issues.extend(other.issues);
    }

    /// Consuming form of [`merge`](Self::merge), convenient for composition.
    pub fn merged(mut self, other: Validation) -> Self {
        self.merge(other);
        self
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }

    /// `SEVERITY CODE: description @ path` per issue, in insertion order.
    pub fn rendered_issues(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity().is_error())
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.with_severity(Severity::Warning)
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.severity() == severity)
    }

    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a ValidationIssue> {
        self.issues.iter().filter(move |issue| issue.code() == code)
    }

    pub fn counts(&self) -> IssueCounts {
        let mut counts = IssueCounts::default();
        for issue in &self.issues {
            match issue.severity() {
                Severity::Error => counts.errors += 1,
                Severity::Warning => counts.warnings += 1,
                Severity::Information => counts.information += 1,
            }
        }
        counts
    }

    /// Fails if any ERROR issue exists. WARNING-only results succeed.
    pub fn raise_if_errors(&self) -> Result<(), ValidationFailure> {
        self.raise_at(Severity::Error)
    }

    /// Fails if any issue at or above `threshold` exists.
    pub fn raise_at(&self, threshold: Severity) -> Result<(), ValidationFailure> {
        if !self.issues.iter().any(|issue| issue.severity() >= threshold) {
            return Ok(());
        }
        let failure = ValidationFailure::from_issues(&self.issues);
        tracing::warn!(
            errors = failure.error_count,
            reported = failure.lines.len(),
            "Validation failed"
        );
        Err(failure)
    }
}

impl Extend<ValidationIssue> for Validation {
    fn extend<I: IntoIterator<Item = ValidationIssue>>(&mut self, iter: I) {
        self.issues.extend(iter);
    }
}

impl FromIterator<ValidationIssue> for Validation {
    fn from_iter<I: IntoIterator<Item = ValidationIssue>>(iter: I) -> Self {
        Self {
            issues: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Validation {
    type Item = ValidationIssue;
    type IntoIter = std::vec::IntoIter<ValidationIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}
