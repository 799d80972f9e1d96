//! Core type definitions: locations, issues, primitive and tagged values, and
//! the capability traits the document model implements.

pub mod codes;
pub mod datatypes;
pub mod dynamic;
pub mod element;
pub mod issue;
pub mod location;
pub mod primitive;

pub use codes::{AdministrativeGender, CodedEnum, IdentifierUse, QuantityComparator};
pub use datatypes::{
    CodeableConcept, Coding, Extension, Identifier, Period, Quantity, Reference, ReferenceKind,
};
pub use dynamic::{DynamicPayload, DynamicType, DynamicValue, DynamicValuePayload};
pub use element::{
    AsAny, Element, Field, FieldConstraint, FieldValue, HasIdAndExtensions, HasModifierExtensions,
};
pub use issue::{IssueDefinition, IssueType, Severity, ValidationIssue};
pub use location::{LocationContext, PathSegment};
pub use primitive::{PrimitiveData, PrimitiveKind, PrimitiveValue};
