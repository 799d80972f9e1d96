//! General-purpose datatypes the engine itself depends on.
//!
//! `Extension` and `Reference` are structural to every element. The remaining
//! types are the most common `value[x]` payloads and carry their own invariants.

use super::codes::{CodedEnum, IdentifierUse, QuantityComparator};
use super::dynamic::{DynamicType, DynamicValue, DynamicValuePayload};
use super::element::{Element, Field, FieldConstraint, FieldValue, HasIdAndExtensions};
use super::primitive::PrimitiveValue;

macro_rules! impl_has_id_and_extensions {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl HasIdAndExtensions for $ty {
                fn id(&self) -> Option<&str> {
                    self.id.as_deref()
                }

                fn extensions(&self) -> &[Extension] {
                    &self.extension
                }
            }
        )+
    };
}

macro_rules! impl_dynamic_value_payload {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl DynamicValuePayload for $ty {
                const DYNAMIC_TYPE: DynamicType = DynamicType::$ty;
            }

            impl From<$ty> for DynamicValue {
                fn from(value: $ty) -> Self {
                    DynamicValue::from_element(value)
                }
            }
        )+
    };
}

impl_has_id_and_extensions!(
    Extension,
    Reference,
    Coding,
    CodeableConcept,
    Identifier,
    Period,
    Quantity,
);

impl_dynamic_value_payload!(Coding, CodeableConcept, Identifier, Period, Quantity);

const URL_CONSTRAINTS: &[FieldConstraint] = &[FieldConstraint::Required];
const IDENTIFIER_USE_CONSTRAINTS: &[FieldConstraint] =
    &[FieldConstraint::RequiredValueSet(IdentifierUse::VALUE_SET)];
const ASSIGNER_CONSTRAINTS: &[FieldConstraint] =
    &[FieldConstraint::SupportedReferenceTargets(&["Organization"])];
const COMPARATOR_CONSTRAINTS: &[FieldConstraint] =
    &[FieldConstraint::RequiredValueSet(QuantityComparator::VALUE_SET)];

/// Open-ended (url, value) pair attached to any element.
#[derive(Debug, Default)]
pub struct Extension {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub url: Option<PrimitiveValue>,
    pub value: Option<DynamicValue>,
}

impl Extension {
    pub fn new(url: &str, value: impl Into<DynamicValue>) -> Self {
        Self {
            url: Some(PrimitiveValue::uri(url)),
            value: Some(value.into()),
            ..Default::default()
        }
    }

    /// Complex extension carrying nested extensions instead of a value.
    pub fn complex(url: &str, extension: Vec<Extension>) -> Self {
        Self {
            url: Some(PrimitiveValue::uri(url)),
            extension,
            ..Default::default()
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_ref().and_then(PrimitiveValue::as_text)
    }
}

impl Element for Extension {
    fn type_name(&self) -> &'static str {
        "Extension"
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::new("url", FieldValue::primitive(self.url.as_ref()))
                .with_constraints(URL_CONSTRAINTS),
            Field::new("value", FieldValue::dynamic(self.value.as_ref())),
        ]
    }
}

/// How a reference string addresses its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `#id`, pointing into the same document.
    Local(String),
    /// `Type/id` or `Type/id/_history/version`.
    Relative {
        resource_type: String,
        id: String,
    },
    /// Absolute URL ending in `Type/id` (optionally with history).
    Absolute {
        base: String,
        resource_type: String,
        id: String,
    },
    /// `urn:uuid:` or `urn:oid:` logical reference.
    Urn(String),
    /// Could not be interpreted as any of the above.
    Unrecognized,
}

impl ReferenceKind {
    pub fn parse(reference: &str) -> Self {
        if let Some(id) = reference.strip_prefix('#') {
            return ReferenceKind::Local(id.to_string());
        }
        if reference.starts_with("urn:uuid:") || reference.starts_with("urn:oid:") {
            return ReferenceKind::Urn(reference.to_string());
        }

        let absolute = url::Url::parse(reference).is_ok();
        let without_query = reference.split(['?', '#']).next().unwrap_or(reference);
        let segments: Vec<&str> = without_query
            .trim_end_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        // Drop a trailing `_history/{version}` before locating `Type/id`.
        let tail = match segments.iter().rposition(|segment| *segment == "_history") {
            Some(position) if position + 2 == segments.len() => &segments[..position],
            Some(_) => return ReferenceKind::Unrecognized,
            None => &segments[..],
        };

        let [prefix @ .., resource_type, id] = tail else {
            return ReferenceKind::Unrecognized;
        };
        if !is_resource_type_name(resource_type) {
            return ReferenceKind::Unrecognized;
        }

        match (absolute, prefix.is_empty()) {
            (false, true) => ReferenceKind::Relative {
                resource_type: resource_type.to_string(),
                id: id.to_string(),
            },
            (true, _) => {
                let suffix = format!("/{resource_type}/{id}");
                let base = without_query
                    .find(suffix.as_str())
                    .map_or(without_query, |end| &without_query[..end]);
                ReferenceKind::Absolute {
                    base: base.to_string(),
                    resource_type: resource_type.to_string(),
                    id: id.to_string(),
                }
            }
            (false, false) => ReferenceKind::Unrecognized,
        }
    }

    pub fn resource_type(&self) -> Option<&str> {
        match self {
            ReferenceKind::Relative { resource_type, .. }
            | ReferenceKind::Absolute { resource_type, .. } => Some(resource_type),
            _ => None,
        }
    }
}

fn is_resource_type_name(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(chars.next(), Some(first) if first.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// A reference from one resource to another.
#[derive(Debug, Default)]
pub struct Reference {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub reference: Option<PrimitiveValue>,
    pub r#type: Option<PrimitiveValue>,
    pub identifier: Option<Box<Identifier>>,
    pub display: Option<PrimitiveValue>,
}

impl Reference {
    /// Literal reference, e.g. `Patient/123` or `#contained-1`.
    pub fn to(reference: &str) -> Self {
        Self {
            reference: Some(PrimitiveValue::string(reference)),
            ..Default::default()
        }
    }

    /// Logical reference carrying only a target type.
    pub fn of_type(resource_type: &str) -> Self {
        Self {
            r#type: Some(PrimitiveValue::uri(resource_type)),
            ..Default::default()
        }
    }

    pub fn with_display(mut self, display: &str) -> Self {
        self.display = Some(PrimitiveValue::string(display));
        self
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_ref().and_then(PrimitiveValue::as_text)
    }

    pub fn kind(&self) -> Option<ReferenceKind> {
        self.reference().map(ReferenceKind::parse)
    }

    pub fn is_local(&self) -> bool {
        self.reference().is_some_and(|reference| reference.starts_with('#'))
    }

    /// Target resource type, from the reference string or else from `type`.
    pub fn target_type(&self) -> Option<String> {
        if let Some(resource_type) = self
            .kind()
            .as_ref()
            .and_then(ReferenceKind::resource_type)
        {
            return Some(resource_type.to_string());
        }
        self.r#type
            .as_ref()
            .and_then(PrimitiveValue::as_text)
            .and_then(|uri| uri.rsplit('/').next())
            .filter(|name| is_resource_type_name(name))
            .map(str::to_string)
    }
}

impl Element for Reference {
    fn type_name(&self) -> &'static str {
        "Reference"
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::new("reference", FieldValue::primitive(self.reference.as_ref())),
            Field::new("type", FieldValue::primitive(self.r#type.as_ref())),
            Field::new("identifier", FieldValue::element(self.identifier.as_deref())),
            Field::new("display", FieldValue::primitive(self.display.as_ref())),
        ]
    }
}

/// A code defined by a terminology system.
#[derive(Debug, Default)]
pub struct Coding {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub system: Option<PrimitiveValue>,
    pub version: Option<PrimitiveValue>,
    pub code: Option<PrimitiveValue>,
    pub display: Option<PrimitiveValue>,
    pub user_selected: Option<PrimitiveValue>,
}

impl Coding {
    pub fn new(system: &str, code: &str) -> Self {
        Self {
            system: Some(PrimitiveValue::uri(system)),
            code: Some(PrimitiveValue::code(code)),
            ..Default::default()
        }
    }

    pub fn code_only(code: &str) -> Self {
        Self {
            code: Some(PrimitiveValue::code(code)),
            ..Default::default()
        }
    }

    pub fn with_display(mut self, display: &str) -> Self {
        self.display = Some(PrimitiveValue::string(display));
        self
    }
}

impl Element for Coding {
    fn type_name(&self) -> &'static str {
        "Coding"
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::new("system", FieldValue::primitive(self.system.as_ref())),
            Field::new("version", FieldValue::primitive(self.version.as_ref())),
            Field::new("code", FieldValue::primitive(self.code.as_ref())),
            Field::new("display", FieldValue::primitive(self.display.as_ref())),
            Field::new("userSelected", FieldValue::primitive(self.user_selected.as_ref())),
        ]
    }
}

/// Concept expressed as codings and/or text.
#[derive(Debug, Default)]
pub struct CodeableConcept {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub coding: Vec<Coding>,
    pub text: Option<PrimitiveValue>,
}

impl CodeableConcept {
    pub fn from_coding(coding: Coding) -> Self {
        Self {
            coding: vec![coding],
            ..Default::default()
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            text: Some(PrimitiveValue::string(text)),
            ..Default::default()
        }
    }
}

impl Element for CodeableConcept {
    fn type_name(&self) -> &'static str {
        "CodeableConcept"
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::new("coding", FieldValue::elements(&self.coding)),
            Field::new("text", FieldValue::primitive(self.text.as_ref())),
        ]
    }
}

/// Business identifier.
#[derive(Debug, Default)]
pub struct Identifier {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub r#use: Option<PrimitiveValue>,
    pub r#type: Option<Box<CodeableConcept>>,
    pub system: Option<PrimitiveValue>,
    pub value: Option<PrimitiveValue>,
    pub period: Option<Period>,
    pub assigner: Option<Box<Reference>>,
}

impl Identifier {
    pub fn new(system: &str, value: &str) -> Self {
        Self {
            system: Some(PrimitiveValue::uri(system)),
            value: Some(PrimitiveValue::string(value)),
            ..Default::default()
        }
    }

    pub fn with_use(mut self, code: &str) -> Self {
        self.r#use = Some(PrimitiveValue::code(code));
        self
    }

    pub fn with_assigner(mut self, assigner: Reference) -> Self {
        self.assigner = Some(Box::new(assigner));
        self
    }
}

impl Element for Identifier {
    fn type_name(&self) -> &'static str {
        "Identifier"
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::new("use", FieldValue::primitive(self.r#use.as_ref()))
                .with_constraints(IDENTIFIER_USE_CONSTRAINTS),
            Field::new("type", FieldValue::element(self.r#type.as_deref())),
            Field::new("system", FieldValue::primitive(self.system.as_ref())),
            Field::new("value", FieldValue::primitive(self.value.as_ref())),
            Field::new("period", FieldValue::element(self.period.as_ref())),
            Field::new("assigner", FieldValue::reference(self.assigner.as_deref()))
                .with_constraints(ASSIGNER_CONSTRAINTS),
        ]
    }
}

/// Time range defined by start and end.
#[derive(Debug, Default)]
pub struct Period {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub start: Option<PrimitiveValue>,
    pub end: Option<PrimitiveValue>,
}

impl Period {
    pub fn new(start: Option<&str>, end: Option<&str>) -> Self {
        Self {
            start: start.map(PrimitiveValue::date_time),
            end: end.map(PrimitiveValue::date_time),
            ..Default::default()
        }
    }
}

impl Element for Period {
    fn type_name(&self) -> &'static str {
        "Period"
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::new("start", FieldValue::primitive(self.start.as_ref())),
            Field::new("end", FieldValue::primitive(self.end.as_ref())),
        ]
    }
}

/// Measured amount.
#[derive(Debug, Default)]
pub struct Quantity {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub value: Option<PrimitiveValue>,
    pub comparator: Option<PrimitiveValue>,
    pub unit: Option<PrimitiveValue>,
    pub system: Option<PrimitiveValue>,
    pub code: Option<PrimitiveValue>,
}

impl Quantity {
    pub fn new(value: &str, unit: &str) -> Self {
        Self {
            value: Some(PrimitiveValue::decimal(value)),
            unit: Some(PrimitiveValue::string(unit)),
            ..Default::default()
        }
    }

    pub fn with_code(mut self, system: Option<&str>, code: &str) -> Self {
        self.system = system.map(PrimitiveValue::uri);
        self.code = Some(PrimitiveValue::code(code));
        self
    }

    pub fn with_comparator(mut self, comparator: &str) -> Self {
        self.comparator = Some(PrimitiveValue::code(comparator));
        self
    }
}

impl Element for Quantity {
    fn type_name(&self) -> &'static str {
        "Quantity"
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::new("value", FieldValue::primitive(self.value.as_ref())),
            Field::new("comparator", FieldValue::primitive(self.comparator.as_ref()))
                .with_constraints(COMPARATOR_CONSTRAINTS),
            Field::new("unit", FieldValue::primitive(self.unit.as_ref())),
            Field::new("system", FieldValue::primitive(self.system.as_ref())),
            Field::new("code", FieldValue::primitive(self.code.as_ref())),
        ]
    }
}
