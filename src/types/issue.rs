//! Issue catalog types: severities, reusable issue definitions and the
//! location-bound issues produced while validating.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

use super::location::LocationContext;
use super::primitive::PrimitiveKind;

/// Validation severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational messages
    Information,
    /// Advisory findings that do not invalidate the document
    Warning,
    /// Violations that must abort downstream use
    Error,
}

impl Severity {
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }

    /// ERROR and WARNING issues appear in raised failure messages.
    pub fn is_reportable(self) -> bool {
        self >= Severity::Warning
    }

    /// FHIR `OperationOutcome.issue.severity` code.
    pub fn fhir_code(self) -> &'static str {
        match self {
            Severity::Information => "information",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Information => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Coarse issue classification, mapped onto the FHIR `issue-type` code system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    Required,
    CodeInvalid,
    Value,
    Invariant,
    Structure,
}

impl IssueType {
    pub fn fhir_code(self) -> &'static str {
        match self {
            IssueType::Required => "required",
            IssueType::CodeInvalid => "code-invalid",
            IssueType::Value => "value",
            IssueType::Invariant => "invariant",
            IssueType::Structure => "structure",
        }
    }
}

/// A named, reusable rule definition.
///
/// Definitions are constants for the lifetime of the process; the same code
/// always denotes the same logical violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueDefinition {
    code: Cow<'static, str>,
    severity: Severity,
    #[serde(rename = "type")]
    issue_type: IssueType,
    description: Cow<'static, str>,
    #[serde(rename = "declaredPath", skip_serializing_if = "Option::is_none")]
    declared_path: Option<&'static str>,
}

impl IssueDefinition {
    pub const REQUIRED_CODE: &'static str = "REQUIRED";
    pub const INVALID_VALUE_SET_CODE: &'static str = "INVALID_VALUE_SET";
    pub const UNSUPPORTED_VARIANT_CODE: &'static str = "UNSUPPORTED_VARIANT";
    pub const UNSUPPORTED_REFERENCE_TARGET_CODE: &'static str = "UNSUPPORTED_REFERENCE_TARGET";
    pub const INVALID_FORMAT_CODE: &'static str = "INVALID_FORMAT";

    /// Invariant-style definition with no declared path.
    pub const fn new(code: &'static str, severity: Severity, description: &'static str) -> Self {
        Self::declare(code, severity, IssueType::Invariant, description, None)
    }

    /// Fully specified definition, usable in `const` catalogs.
    pub const fn declare(
        code: &'static str,
        severity: Severity,
        issue_type: IssueType,
        description: &'static str,
        declared_path: Option<&'static str>,
    ) -> Self {
        Self {
            code: Cow::Borrowed(code),
            severity,
            issue_type,
            description: Cow::Borrowed(description),
            declared_path,
        }
    }

    fn parameterized(
        code: &'static str,
        severity: Severity,
        issue_type: IssueType,
        description: String,
    ) -> Self {
        Self {
            code: Cow::Borrowed(code),
            severity,
            issue_type,
            description: Cow::Owned(description),
            declared_path: None,
        }
    }

    /// Field is null or an empty list.
    pub fn required(field: &str) -> Self {
        Self::parameterized(
            Self::REQUIRED_CODE,
            Severity::Error,
            IssueType::Required,
            format!("Field '{field}' is required"),
        )
    }

    /// Code is not a member of the named enumeration.
    pub fn invalid_value_set(field: &str, value_set: &str, code: &str) -> Self {
        Self::parameterized(
            Self::INVALID_VALUE_SET_CODE,
            Severity::Error,
            IssueType::CodeInvalid,
            format!("Code '{code}' in field '{field}' is not a member of value set '{value_set}'"),
        )
    }

    /// Tagged value carries a variant outside the allowed set.
    pub fn unsupported_variant(field: &str, variant: &str) -> Self {
        Self::parameterized(
            Self::UNSUPPORTED_VARIANT_CODE,
            Severity::Error,
            IssueType::Structure,
            format!("Type '{variant}' is not a supported variant of field '{field}'"),
        )
    }

    /// Reference target type outside the allowed set. Advisory only.
    pub fn unsupported_reference_target(field: &str, target: &str) -> Self {
        Self::parameterized(
            Self::UNSUPPORTED_REFERENCE_TARGET_CODE,
            Severity::Warning,
            IssueType::Value,
            format!("Reference in field '{field}' targets unsupported resource type '{target}'"),
        )
    }

    /// Scalar value does not conform to its primitive grammar.
    pub fn invalid_format(kind: PrimitiveKind) -> Self {
        Self::parameterized(
            Self::INVALID_FORMAT_CODE,
            Severity::Error,
            IssueType::Value,
            format!("Value does not conform to the {kind} grammar"),
        )
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn issue_type(&self) -> IssueType {
        self.issue_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn declared_path(&self) -> Option<&'static str> {
        self.declared_path
    }
}

/// An [`IssueDefinition`] bound to the location where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    #[serde(flatten)]
    definition: IssueDefinition,
    location: LocationContext,
}

impl ValidationIssue {
    pub fn new(definition: IssueDefinition, location: LocationContext) -> Self {
        Self {
            definition,
            location,
        }
    }

    pub fn definition(&self) -> &IssueDefinition {
        &self.definition
    }

    pub fn code(&self) -> &str {
        self.definition.code()
    }

    pub fn severity(&self) -> Severity {
        self.definition.severity()
    }

    pub fn description(&self) -> &str {
        self.definition.description()
    }

    pub fn location(&self) -> &LocationContext {
        &self.location
    }

    pub fn path(&self) -> String {
        self.location.render()
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} @ {}",
            self.severity(),
            self.code(),
            self.description(),
            self.location
        )
    }
}
