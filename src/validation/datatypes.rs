//! Hand-written validators for the built-in datatypes
//!
//! Each validator checks its type's invariants and then walks the element's
//! fields and extension lists through the engine.

use chrono::{DateTime, FixedOffset};

use crate::error::Result;
use crate::types::{
    Coding, Extension, IssueDefinition, IssueType, LocationContext, Period, PrimitiveValue,
    Quantity, Reference, ReferenceKind, Severity,
};
use crate::validation::registry::{ElementRegistry, ElementValidator};
use crate::validation::{Validation, ValidationEngine};

/// ext-1
pub const EXTENSION_VALUE_XOR_EXTENSIONS: IssueDefinition = IssueDefinition::declare(
    "R4_EXT_001",
    Severity::Error,
    IssueType::Invariant,
    "Must have either extensions or value[x], not both",
    Some("Extension"),
);

pub const EXTENSION_URL_ABSOLUTE: IssueDefinition = IssueDefinition::declare(
    "R4_EXT_002",
    Severity::Error,
    IssueType::Value,
    "Extension url must be an absolute URI",
    Some("Extension.url"),
);

pub const CODING_SYSTEM_REQUIRED: IssueDefinition = IssueDefinition::declare(
    "R4_CODING_001",
    Severity::Error,
    IssueType::Invariant,
    "If a code is present, the coding system must also be present",
    Some("Coding.system"),
);

/// per-1
pub const PERIOD_START_AFTER_END: IssueDefinition = IssueDefinition::declare(
    "R4_PER_001",
    Severity::Error,
    IssueType::Invariant,
    "If present, start SHALL have a lower value than end",
    Some("Period"),
);

/// qty-3
pub const QUANTITY_SYSTEM_REQUIRED: IssueDefinition = IssueDefinition::declare(
    "R4_QTY_001",
    Severity::Error,
    IssueType::Invariant,
    "If a code for the unit is present, the system SHALL also be present",
    Some("Quantity"),
);

pub const REFERENCE_UNRECOGNIZED_FORMAT: IssueDefinition = IssueDefinition::declare(
    "R4_REF_001",
    Severity::Warning,
    IssueType::Value,
    "Reference must be local (#id), relative (Type/id), an absolute URL or a urn",
    Some("Reference.reference"),
);

/// Registry pre-populated with every validator in this module.
pub fn standard_registry() -> ElementRegistry {
    let mut registry = ElementRegistry::new();
    registry.insert::<Extension, _>(ExtensionValidator);
    registry.insert::<Coding, _>(CodingValidator);
    registry.insert::<Period, _>(PeriodValidator);
    registry.insert::<Quantity, _>(QuantityValidator);
    registry.insert::<Reference, _>(ReferenceValidator);
    registry
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionValidator;

impl ElementValidator<Extension> for ExtensionValidator {
    fn validate(
        &self,
        extension: &Extension,
        location: &LocationContext,
        engine: &ValidationEngine,
    ) -> Result<Validation> {
        let mut validation = Validation::new();

        validation.check_true(
            extension.value.is_some() != !extension.extension.is_empty(),
            &EXTENSION_VALUE_XOR_EXTENSIONS,
            location,
        );

        // Absence is reported by the `Required` declaration on `url`.
        if let Some(url) = extension.url() {
            validation.check_true(
                url::Url::parse(url).is_ok(),
                &EXTENSION_URL_ABSOLUTE,
                &location.field("url"),
            );
        }

        Ok(validation.merged(engine.walk(extension, location)?))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CodingValidator;

impl ElementValidator<Coding> for CodingValidator {
    fn validate(
        &self,
        coding: &Coding,
        location: &LocationContext,
        engine: &ValidationEngine,
    ) -> Result<Validation> {
        let mut validation = Validation::new();
        validation.check_true(
            coding.code.is_none() || coding.system.is_some(),
            &CODING_SYSTEM_REQUIRED,
            location,
        );
        Ok(validation.merged(engine.walk(coding, location)?))
    }
}

/// A `dateTime` reduced to what can be ordered.
enum PeriodBoundary<'a> {
    Timestamp(DateTime<FixedOffset>),
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`; orders lexically at equal precision.
    Partial(&'a str),
}

impl<'a> PeriodBoundary<'a> {
    fn parse(value: &'a PrimitiveValue) -> Option<Self> {
        let text = value.as_text()?;
        if text.contains('T') {
            return DateTime::parse_from_rfc3339(text)
                .ok()
                .map(PeriodBoundary::Timestamp);
        }
        let partial = matches!(text.len(), 4 | 7 | 10)
            && text.bytes().all(|b| b.is_ascii_digit() || b == b'-');
        partial.then_some(PeriodBoundary::Partial(text))
    }

    /// `None` when the two boundaries are not comparable.
    fn is_not_after(&self, other: &PeriodBoundary<'_>) -> Option<bool> {
        match (self, other) {
            (PeriodBoundary::Timestamp(start), PeriodBoundary::Timestamp(end)) => {
                Some(start <= end)
            }
            (PeriodBoundary::Partial(start), PeriodBoundary::Partial(end))
                if start.len() == end.len() =>
            {
                Some(start <= end)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodValidator;

impl ElementValidator<Period> for PeriodValidator {
    fn validate(
        &self,
        period: &Period,
        location: &LocationContext,
        engine: &ValidationEngine,
    ) -> Result<Validation> {
        let mut validation = Validation::new();

        let start = period.start.as_ref().and_then(PeriodBoundary::parse);
        let end = period.end.as_ref().and_then(PeriodBoundary::parse);
        if let (Some(start), Some(end)) = (start, end) {
            if let Some(ordered) = start.is_not_after(&end) {
                validation.check_true(ordered, &PERIOD_START_AFTER_END, location);
            }
        }

        Ok(validation.merged(engine.walk(period, location)?))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QuantityValidator;

impl ElementValidator<Quantity> for QuantityValidator {
    fn validate(
        &self,
        quantity: &Quantity,
        location: &LocationContext,
        engine: &ValidationEngine,
    ) -> Result<Validation> {
        let mut validation = Validation::new();
        validation.check_true(
            quantity.code.is_none() || quantity.system.is_some(),
            &QUANTITY_SYSTEM_REQUIRED,
            location,
        );
        Ok(validation.merged(engine.walk(quantity, location)?))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceValidator;

impl ElementValidator<Reference> for ReferenceValidator {
    fn validate(
        &self,
        reference: &Reference,
        location: &LocationContext,
        engine: &ValidationEngine,
    ) -> Result<Validation> {
        let mut validation = Validation::new();
        if let Some(kind) = reference.kind() {
            validation.check_true(
                kind != ReferenceKind::Unrecognized,
                &REFERENCE_UNRECOGNIZED_FORMAT,
                &location.field("reference"),
            );
        }
        Ok(validation.merged(engine.walk(reference, location)?))
    }
}
