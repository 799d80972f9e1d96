//! Primitive datatype validation
//!
//! Each FHIR primitive kind maps to at most one grammar. A value that fails its
//! grammar yields exactly one `INVALID_FORMAT` issue; kinds without a
//! registered grammar (`boolean`, `xhtml`) always pass.

use chrono::{DateTime, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use url::Url;

use crate::error::{FhirValidationError, Result};
use crate::types::{IssueDefinition, LocationContext, PrimitiveData, PrimitiveKind, PrimitiveValue};
use crate::validation::Validation;

static DECIMAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?$").expect("valid decimal regex")
});
// FHIR code pattern: [^\s]+( [^\s]+)*
static CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s]+( [^\s]+)*$").expect("valid code regex"));
// FHIR ID pattern: [A-Za-z0-9\-\.]{1,64}
static ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9\-\.]{1,64}$").expect("valid id regex"));
static URI_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\S+$").expect("valid uri regex"));
static OID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^urn:oid:[0-2](\.(0|[1-9][0-9]*))+$").expect("valid oid regex")
});
static BASE64_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9+/]{4})*([A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?$")
        .expect("valid base64 regex")
});
static DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<year>[0-9]{4})(-(?P<month>[0-9]{2})(-(?P<day>[0-9]{2}))?)?$")
        .expect("valid date regex")
});
static DATE_TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[0-9]{4}(-[0-9]{2}(-[0-9]{2}(T[0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]+)?(Z|[+-][0-9]{2}:[0-9]{2}))?)?)?$",
    )
    .expect("valid dateTime regex")
});
static INSTANT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]+)?(Z|[+-][0-9]{2}:[0-9]{2})$",
    )
    .expect("valid instant regex")
});
static TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]+)?$").expect("valid time regex")
});

/// Grammar check for one primitive kind. Validators are stateless.
pub trait PrimitiveValidator: Send + Sync {
    fn is_valid(&self, value: &PrimitiveValue) -> bool;
}

impl<F> PrimitiveValidator for F
where
    F: Fn(&PrimitiveValue) -> bool + Send + Sync,
{
    fn is_valid(&self, value: &PrimitiveValue) -> bool {
        self(value)
    }
}

/// Built-in FHIR R4 grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    IntegerRange { min: i64, max: i64 },
    Decimal,
    NonBlank,
    Code,
    Id,
    Uri,
    Url,
    Oid,
    Uuid,
    Base64,
    Date,
    DateTime,
    Instant,
    Time,
}

impl Grammar {
    /// The grammar FHIR defines for `kind`, if any.
    pub fn for_kind(kind: PrimitiveKind) -> Option<Self> {
        let grammar = match kind {
            PrimitiveKind::Integer => Grammar::IntegerRange {
                min: i32::MIN as i64,
                max: i32::MAX as i64,
            },
            PrimitiveKind::PositiveInt => Grammar::IntegerRange {
                min: 1,
                max: i32::MAX as i64,
            },
            PrimitiveKind::UnsignedInt => Grammar::IntegerRange {
                min: 0,
                max: i32::MAX as i64,
            },
            PrimitiveKind::Decimal => Grammar::Decimal,
            PrimitiveKind::String | PrimitiveKind::Markdown => Grammar::NonBlank,
            PrimitiveKind::Code => Grammar::Code,
            PrimitiveKind::Id => Grammar::Id,
            PrimitiveKind::Uri | PrimitiveKind::Canonical => Grammar::Uri,
            PrimitiveKind::Url => Grammar::Url,
            PrimitiveKind::Oid => Grammar::Oid,
            PrimitiveKind::Uuid => Grammar::Uuid,
            PrimitiveKind::Base64Binary => Grammar::Base64,
            PrimitiveKind::Date => Grammar::Date,
            PrimitiveKind::DateTime => Grammar::DateTime,
            PrimitiveKind::Instant => Grammar::Instant,
            PrimitiveKind::Time => Grammar::Time,
            PrimitiveKind::Boolean | PrimitiveKind::Xhtml => return None,
        };
        Some(grammar)
    }

    fn accepts_text(self, text: &str) -> bool {
        match self {
            Grammar::IntegerRange { .. } => false,
            Grammar::Decimal => DECIMAL_REGEX.is_match(text),
            Grammar::NonBlank => !text.trim().is_empty(),
            Grammar::Code => CODE_REGEX.is_match(text),
            Grammar::Id => ID_REGEX.is_match(text),
            Grammar::Uri => URI_REGEX.is_match(text),
            Grammar::Url => Url::parse(text).is_ok(),
            Grammar::Oid => OID_REGEX.is_match(text),
            Grammar::Uuid => is_valid_uuid(text),
            Grammar::Base64 => is_valid_base64(text),
            Grammar::Date => is_valid_date(text),
            Grammar::DateTime => is_valid_date_time(text),
            Grammar::Instant => {
                INSTANT_REGEX.is_match(text) && DateTime::parse_from_rfc3339(text).is_ok()
            }
            Grammar::Time => is_valid_time(text),
        }
    }
}

impl PrimitiveValidator for Grammar {
    fn is_valid(&self, value: &PrimitiveValue) -> bool {
        match (&value.data, *self) {
            (PrimitiveData::Integer(n), Grammar::IntegerRange { min, max }) => {
                (min..=max).contains(n)
            }
            (PrimitiveData::Text(text), grammar) => grammar.accepts_text(text),
            _ => false,
        }
    }
}

fn is_valid_uuid(text: &str) -> bool {
    let Some(rest) = text.strip_prefix("urn:uuid:") else {
        return false;
    };
    rest.len() == 36
        && !rest.chars().any(|c| c.is_ascii_uppercase())
        && uuid::Uuid::parse_str(rest).is_ok()
}

fn is_valid_base64(text: &str) -> bool {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    !compact.is_empty() && BASE64_REGEX.is_match(&compact)
}

fn is_valid_date(text: &str) -> bool {
    let Some(captures) = DATE_REGEX.captures(text) else {
        return false;
    };
    let number = |name: &str| {
        captures
            .name(name)
            .and_then(|m| m.as_str().parse::<u32>().ok())
    };
    let Some(year) = number("year") else {
        return false;
    };
    if year == 0 {
        return false;
    }
    match (number("month"), number("day")) {
        (None, _) => true,
        (Some(month), None) => (1..=12).contains(&month),
        (Some(month), Some(day)) => NaiveDate::from_ymd_opt(year as i32, month, day).is_some(),
    }
}

fn is_valid_date_time(text: &str) -> bool {
    if !DATE_TIME_REGEX.is_match(text) {
        return false;
    }
    if text.contains('T') {
        DateTime::parse_from_rfc3339(text).is_ok()
    } else {
        is_valid_date(text)
    }
}

fn is_valid_time(text: &str) -> bool {
    if !TIME_REGEX.is_match(text) {
        return false;
    }
    let whole_seconds = text.split('.').next().unwrap_or(text);
    NaiveTime::parse_from_str(whole_seconds, "%H:%M:%S").is_ok()
}

/// Primitive-format dispatch: kind to grammar.
#[derive(Clone, Default)]
pub struct PrimitiveRegistry {
    validators: HashMap<PrimitiveKind, Arc<dyn PrimitiveValidator>>,
}

impl PrimitiveRegistry {
    /// An empty registry; every kind passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in FHIR grammars.
    pub fn with_builtins() -> Self {
        let validators = PrimitiveKind::ALL
            .into_iter()
            .filter_map(|kind| {
                Grammar::for_kind(kind)
                    .map(|grammar| (kind, Arc::new(grammar) as Arc<dyn PrimitiveValidator>))
            })
            .collect();
        Self { validators }
    }

    pub fn register<V>(&mut self, kind: PrimitiveKind, validator: V) -> Result<()>
    where
        V: PrimitiveValidator + 'static,
    {
        if self.validators.contains_key(&kind) {
            return Err(FhirValidationError::DuplicatePrimitiveValidator { kind });
        }
        self.validators.insert(kind, Arc::new(validator));
        Ok(())
    }

    /// Replaces (or installs) the grammar for `kind`.
    pub fn replace<V>(&mut self, kind: PrimitiveKind, validator: V)
    where
        V: PrimitiveValidator + 'static,
    {
        self.validators.insert(kind, Arc::new(validator));
    }

    pub fn get(&self, kind: PrimitiveKind) -> Option<&dyn PrimitiveValidator> {
        self.validators.get(&kind).map(|validator| validator.as_ref())
    }

    pub fn contains(&self, kind: PrimitiveKind) -> bool {
        self.validators.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Validates `value` against its kind's grammar.
    pub fn validate(&self, value: &PrimitiveValue, location: &LocationContext) -> Validation {
        let mut validation = Validation::new();
        if let Some(validator) = self.get(value.kind) {
            validation.check_true(
                validator.is_valid(value),
                &IssueDefinition::invalid_format(value.kind),
                location,
            );
        }
        validation
    }
}

impl fmt::Debug for PrimitiveRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.validators.keys().copied().collect();
        kinds.sort();
        f.debug_struct("PrimitiveRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_valid(value: PrimitiveValue) -> bool {
        let registry = PrimitiveRegistry::with_builtins();
        let validation = registry.validate(&value, &LocationContext::root("Test").field("value"));
        assert!(validation.len() <= 1, "grammar failures emit one issue");
        validation.is_empty()
    }

    #[test]
    fn test_builtin_coverage() {
        let registry = PrimitiveRegistry::with_builtins();
        assert_eq!(registry.len(), 18);
        assert!(!registry.contains(PrimitiveKind::Boolean));
        assert!(!registry.contains(PrimitiveKind::Xhtml));
    }

    #[test]
    fn test_validate_integers() {
        assert!(is_valid(PrimitiveValue::integer(-2_147_483_648)));
        assert!(!is_valid(PrimitiveValue::integer(2_147_483_648)));
        assert!(is_valid(PrimitiveValue::positive_int(1)));
        assert!(!is_valid(PrimitiveValue::positive_int(0)));
        assert!(is_valid(PrimitiveValue::unsigned_int(0)));
        assert!(!is_valid(PrimitiveValue::unsigned_int(-1)));
        assert!(!is_valid(PrimitiveValue::text(PrimitiveKind::Integer, "42")));
    }

    #[test]
    fn test_validate_decimal() {
        assert!(is_valid(PrimitiveValue::decimal("0.010")));
        assert!(is_valid(PrimitiveValue::decimal("-1.5e10")));
        assert!(!is_valid(PrimitiveValue::decimal("01.5")));
        assert!(!is_valid(PrimitiveValue::decimal("1.")));
    }

    #[test]
    fn test_validate_date() {
        assert!(is_valid(PrimitiveValue::date("2023")));
        assert!(is_valid(PrimitiveValue::date("2023-12")));
        assert!(is_valid(PrimitiveValue::date("2024-02-29")));
        assert!(!is_valid(PrimitiveValue::date("2023-02-29")));
        assert!(!is_valid(PrimitiveValue::date("2023-13")));
        assert!(!is_valid(PrimitiveValue::date("25/12/2023")));
        assert!(!is_valid(PrimitiveValue::date("0000-01-01")));
    }

    #[test]
    fn test_validate_datetime() {
        assert!(is_valid(PrimitiveValue::date_time("2023-12-25T10:30:00Z")));
        assert!(is_valid(PrimitiveValue::date_time("2023-12-25T10:30:00.123+05:30")));
        assert!(is_valid(PrimitiveValue::date_time("2023-12")));
        assert!(!is_valid(PrimitiveValue::date_time("2023-12-25T10:30:00")));
        assert!(!is_valid(PrimitiveValue::date_time("2023-12-25T25:30:00Z")));
        assert!(!is_valid(PrimitiveValue::date_time("not-a-datetime")));
    }

    #[test]
    fn test_validate_instant_and_time() {
        assert!(is_valid(PrimitiveValue::instant("2015-02-07T13:28:17.239+02:00")));
        assert!(!is_valid(PrimitiveValue::instant("2015-02-07")));
        assert!(is_valid(PrimitiveValue::time("23:59:59")));
        assert!(is_valid(PrimitiveValue::time("08:15:00.5")));
        assert!(!is_valid(PrimitiveValue::time("24:00:00")));
        assert!(!is_valid(PrimitiveValue::time("8:15")));
    }

    #[test]
    fn test_validate_identifiers() {
        assert!(is_valid(PrimitiveValue::id("test-id-123")));
        assert!(!is_valid(PrimitiveValue::id("test id")));
        assert!(!is_valid(PrimitiveValue::id(&"a".repeat(65))));
        assert!(is_valid(PrimitiveValue::code("in progress")));
        assert!(!is_valid(PrimitiveValue::code(" leading")));
        assert!(!is_valid(PrimitiveValue::code("double  space")));
    }

    #[test]
    fn test_validate_uris() {
        assert!(is_valid(PrimitiveValue::uri("Patient/123")));
        assert!(!is_valid(PrimitiveValue::uri("not a uri")));
        assert!(is_valid(PrimitiveValue::url("http://example.com/path")));
        assert!(!is_valid(PrimitiveValue::url("example.com/path")));
        assert!(is_valid(PrimitiveValue::text(PrimitiveKind::Oid, "urn:oid:1.2.3.4")));
        assert!(!is_valid(PrimitiveValue::text(PrimitiveKind::Oid, "urn:oid:3.1")));
        assert!(is_valid(PrimitiveValue::text(
            PrimitiveKind::Uuid,
            "urn:uuid:c757873d-ec9a-4326-a141-556f43239520"
        )));
        assert!(!is_valid(PrimitiveValue::text(
            PrimitiveKind::Uuid,
            "urn:uuid:C757873D-EC9A-4326-A141-556F43239520"
        )));
        assert!(!is_valid(PrimitiveValue::text(
            PrimitiveKind::Uuid,
            "c757873d-ec9a-4326-a141-556f43239520"
        )));
    }

    #[test]
    fn test_validate_base64_and_strings() {
        assert!(is_valid(PrimitiveValue::text(PrimitiveKind::Base64Binary, "aGVsbG8=")));
        assert!(is_valid(PrimitiveValue::text(PrimitiveKind::Base64Binary, "aGVs\nbG8h")));
        assert!(!is_valid(PrimitiveValue::text(PrimitiveKind::Base64Binary, "aGVsbG8")));
        assert!(is_valid(PrimitiveValue::string("hello")));
        assert!(!is_valid(PrimitiveValue::string("   ")));
        assert!(is_valid(PrimitiveValue::boolean(false)));
    }

    #[test]
    fn test_register_custom_grammar() {
        let mut registry = PrimitiveRegistry::new();
        registry
            .register(PrimitiveKind::Code, |value: &PrimitiveValue| {
                value.as_text().is_some_and(|text| text.len() <= 3)
            })
            .unwrap();
        let err = registry
            .register(PrimitiveKind::Code, Grammar::Code)
            .unwrap_err();
        assert!(matches!(err, FhirValidationError::DuplicatePrimitiveValidator { .. }));

        let location = LocationContext::root("Test");
        assert!(registry.validate(&PrimitiveValue::code("abc"), &location).is_empty());
        let validation = registry.validate(&PrimitiveValue::code("abcd"), &location);
        assert_eq!(validation.issues()[0].code(), "INVALID_FORMAT");
        assert!(registry.validate(&PrimitiveValue::date("nope"), &location).is_empty());
    }
}
