//! FHIR primitive (scalar) values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of FHIR primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrimitiveKind {
    Base64Binary,
    Boolean,
    Canonical,
    Code,
    Date,
    DateTime,
    Decimal,
    Id,
    Instant,
    Integer,
    Markdown,
    Oid,
    PositiveInt,
    String,
    Time,
    UnsignedInt,
    Uri,
    Url,
    Uuid,
    Xhtml,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 20] = [
        PrimitiveKind::Base64Binary,
        PrimitiveKind::Boolean,
        PrimitiveKind::Canonical,
        PrimitiveKind::Code,
        PrimitiveKind::Date,
        PrimitiveKind::DateTime,
        PrimitiveKind::Decimal,
        PrimitiveKind::Id,
        PrimitiveKind::Instant,
        PrimitiveKind::Integer,
        PrimitiveKind::Markdown,
        PrimitiveKind::Oid,
        PrimitiveKind::PositiveInt,
        PrimitiveKind::String,
        PrimitiveKind::Time,
        PrimitiveKind::UnsignedInt,
        PrimitiveKind::Uri,
        PrimitiveKind::Url,
        PrimitiveKind::Uuid,
        PrimitiveKind::Xhtml,
    ];

    /// FHIR type name, e.g. `dateTime`.
    pub fn fhir_name(self) -> &'static str {
        match self {
            PrimitiveKind::Base64Binary => "base64Binary",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Canonical => "canonical",
            PrimitiveKind::Code => "code",
            PrimitiveKind::Date => "date",
            PrimitiveKind::DateTime => "dateTime",
            PrimitiveKind::Decimal => "decimal",
            PrimitiveKind::Id => "id",
            PrimitiveKind::Instant => "instant",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Markdown => "markdown",
            PrimitiveKind::Oid => "oid",
            PrimitiveKind::PositiveInt => "positiveInt",
            PrimitiveKind::String => "string",
            PrimitiveKind::Time => "time",
            PrimitiveKind::UnsignedInt => "unsignedInt",
            PrimitiveKind::Uri => "uri",
            PrimitiveKind::Url => "url",
            PrimitiveKind::Uuid => "uuid",
            PrimitiveKind::Xhtml => "xhtml",
        }
    }

    pub fn from_fhir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.fhir_name() == name)
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Integer | PrimitiveKind::PositiveInt | PrimitiveKind::UnsignedInt
        )
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fhir_name())
    }
}

/// Raw scalar payload as delivered by the deserialization layer.
///
/// Decimals stay textual so their precision survives validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimitiveData {
    Boolean(bool),
    Integer(i64),
    Text(String),
}

/// A scalar value tagged with its FHIR primitive type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimitiveValue {
    pub kind: PrimitiveKind,
    pub data: PrimitiveData,
}

impl PrimitiveValue {
    pub fn new(kind: PrimitiveKind, data: PrimitiveData) -> Self {
        Self { kind, data }
    }

    pub fn text(kind: PrimitiveKind, value: impl Into<String>) -> Self {
        Self::new(kind, PrimitiveData::Text(value.into()))
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(PrimitiveKind::Boolean, PrimitiveData::Boolean(value))
    }

    pub fn integer(value: i64) -> Self {
        Self::new(PrimitiveKind::Integer, PrimitiveData::Integer(value))
    }

    pub fn positive_int(value: i64) -> Self {
        Self::new(PrimitiveKind::PositiveInt, PrimitiveData::Integer(value))
    }

    pub fn unsigned_int(value: i64) -> Self {
        Self::new(PrimitiveKind::UnsignedInt, PrimitiveData::Integer(value))
    }

    pub fn decimal(value: impl Into<String>) -> Self {
        Self::text(PrimitiveKind::Decimal, value)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::text(PrimitiveKind::String, value)
    }

    pub fn code(value: impl Into<String>) -> Self {
        Self::text(PrimitiveKind::Code, value)
    }

    pub fn id(value: impl Into<String>) -> Self {
        Self::text(PrimitiveKind::Id, value)
    }

    pub fn uri(value: impl Into<String>) -> Self {
        Self::text(PrimitiveKind::Uri, value)
    }

    pub fn url(value: impl Into<String>) -> Self {
        Self::text(PrimitiveKind::Url, value)
    }

    pub fn canonical(value: impl Into<String>) -> Self {
        Self::text(PrimitiveKind::Canonical, value)
    }

    pub fn date(value: impl Into<String>) -> Self {
        Self::text(PrimitiveKind::Date, value)
    }

    pub fn date_time(value: impl Into<String>) -> Self {
        Self::text(PrimitiveKind::DateTime, value)
    }

    pub fn instant(value: impl Into<String>) -> Self {
        Self::text(PrimitiveKind::Instant, value)
    }

    pub fn time(value: impl Into<String>) -> Self {
        Self::text(PrimitiveKind::Time, value)
    }

    pub fn markdown(value: impl Into<String>) -> Self {
        Self::text(PrimitiveKind::Markdown, value)
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            PrimitiveData::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self.data {
            PrimitiveData::Integer(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.data {
            PrimitiveData::Boolean(value) => Some(value),
            _ => None,
        }
    }

    /// Enumerated-code-shaped values are what value-set checks apply to.
    pub fn as_code(&self) -> Option<&str> {
        if self.kind == PrimitiveKind::Code {
            self.as_text()
        } else {
            None
        }
    }
}

impl fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            PrimitiveData::Boolean(value) => write!(f, "{value}"),
            PrimitiveData::Integer(value) => write!(f, "{value}"),
            PrimitiveData::Text(value) => f.write_str(value),
        }
    }
}
