//! Tagged-union values (`value[x]` style fields).

use std::fmt;

use super::datatypes::Reference;
use super::element::Element;
use super::primitive::{PrimitiveKind, PrimitiveValue};

macro_rules! dynamic_types {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Every shape a tagged-union field may take.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum DynamicType {
            $($variant),*
        }

        impl DynamicType {
            pub const ALL: &'static [DynamicType] = &[$(DynamicType::$variant),*];

            /// FHIR type name, e.g. `Quantity` or `dateTime`.
            pub fn fhir_name(self) -> &'static str {
                match self {
                    $(DynamicType::$variant => $name),*
                }
            }
        }
    };
}

dynamic_types! {
    Base64Binary => "base64Binary",
    Boolean => "boolean",
    Canonical => "canonical",
    Code => "code",
    Date => "date",
    DateTime => "dateTime",
    Decimal => "decimal",
    Id => "id",
    Instant => "instant",
    Integer => "integer",
    Markdown => "markdown",
    Oid => "oid",
    PositiveInt => "positiveInt",
    String => "string",
    Time => "time",
    UnsignedInt => "unsignedInt",
    Uri => "uri",
    Url => "url",
    Uuid => "uuid",
    Xhtml => "xhtml",
    Address => "Address",
    Age => "Age",
    Annotation => "Annotation",
    Attachment => "Attachment",
    CodeableConcept => "CodeableConcept",
    Coding => "Coding",
    ContactPoint => "ContactPoint",
    Count => "Count",
    Distance => "Distance",
    Duration => "Duration",
    HumanName => "HumanName",
    Identifier => "Identifier",
    Money => "Money",
    Period => "Period",
    Quantity => "Quantity",
    Range => "Range",
    Ratio => "Ratio",
    Reference => "Reference",
    SampledData => "SampledData",
    Signature => "Signature",
    Timing => "Timing",
    ContactDetail => "ContactDetail",
    Contributor => "Contributor",
    DataRequirement => "DataRequirement",
    Expression => "Expression",
    ParameterDefinition => "ParameterDefinition",
    RelatedArtifact => "RelatedArtifact",
    TriggerDefinition => "TriggerDefinition",
    UsageContext => "UsageContext",
    Dosage => "Dosage",
    Meta => "Meta",
}

impl DynamicType {
    pub fn from_primitive(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Base64Binary => DynamicType::Base64Binary,
            PrimitiveKind::Boolean => DynamicType::Boolean,
            PrimitiveKind::Canonical => DynamicType::Canonical,
            PrimitiveKind::Code => DynamicType::Code,
            PrimitiveKind::Date => DynamicType::Date,
            PrimitiveKind::DateTime => DynamicType::DateTime,
            PrimitiveKind::Decimal => DynamicType::Decimal,
            PrimitiveKind::Id => DynamicType::Id,
            PrimitiveKind::Instant => DynamicType::Instant,
            PrimitiveKind::Integer => DynamicType::Integer,
            PrimitiveKind::Markdown => DynamicType::Markdown,
            PrimitiveKind::Oid => DynamicType::Oid,
            PrimitiveKind::PositiveInt => DynamicType::PositiveInt,
            PrimitiveKind::String => DynamicType::String,
            PrimitiveKind::Time => DynamicType::Time,
            PrimitiveKind::UnsignedInt => DynamicType::UnsignedInt,
            PrimitiveKind::Uri => DynamicType::Uri,
            PrimitiveKind::Url => DynamicType::Url,
            PrimitiveKind::Uuid => DynamicType::Uuid,
            PrimitiveKind::Xhtml => DynamicType::Xhtml,
        }
    }

    /// Suffix used in JSON property names, e.g. `valueQuantity`.
    pub fn property_suffix(self) -> String {
        let name = self.fhir_name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for DynamicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fhir_name())
    }
}

/// Composite types that may appear as the payload of a [`DynamicValue`].
pub trait DynamicValuePayload: Element + Sized {
    const DYNAMIC_TYPE: DynamicType;
}

/// Concrete payload of a [`DynamicValue`].
#[derive(Debug)]
pub enum DynamicPayload {
    Primitive(PrimitiveValue),
    Element(Box<dyn Element>),
    Reference(Reference),
}

/// A type tag plus a value whose shape is determined by the tag.
///
/// The constructors derive the tag from the payload, so the two never disagree.
#[derive(Debug)]
pub struct DynamicValue {
    tag: DynamicType,
    payload: DynamicPayload,
}

impl DynamicValue {
    pub fn from_primitive(value: PrimitiveValue) -> Self {
        Self {
            tag: DynamicType::from_primitive(value.kind),
            payload: DynamicPayload::Primitive(value),
        }
    }

    pub fn from_element<T: DynamicValuePayload>(value: T) -> Self {
        Self {
            tag: T::DYNAMIC_TYPE,
            payload: DynamicPayload::Element(Box::new(value)),
        }
    }

    pub fn from_reference(reference: Reference) -> Self {
        Self {
            tag: DynamicType::Reference,
            payload: DynamicPayload::Reference(reference),
        }
    }

    pub fn tag(&self) -> DynamicType {
        self.tag
    }

    pub fn payload(&self) -> &DynamicPayload {
        &self.payload
    }

    pub fn as_primitive(&self) -> Option<&PrimitiveValue> {
        match &self.payload {
            DynamicPayload::Primitive(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match (self.tag, &self.payload) {
            (DynamicType::Reference, DynamicPayload::Reference(reference)) => Some(reference),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&dyn Element> {
        match &self.payload {
            DynamicPayload::Element(element) => Some(&**element),
            DynamicPayload::Reference(reference) => Some(reference),
            DynamicPayload::Primitive(_) => None,
        }
    }
}

impl From<PrimitiveValue> for DynamicValue {
    fn from(value: PrimitiveValue) -> Self {
        Self::from_primitive(value)
    }
}

impl From<Reference> for DynamicValue {
    fn from(reference: Reference) -> Self {
        Self::from_reference(reference)
    }
}
