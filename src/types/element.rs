//! Capability traits implemented by the document model.
//!
//! Concrete resource and datatype definitions live with the model crate. The
//! engine only needs three things from them: identity plus extensions, an
//! optional modifier-extension view for backbone shapes, and a reflection-free
//! listing of their fields with any constraint declarations attached.

use std::any::Any;
use std::fmt;

use super::datatypes::{Extension, Reference};
use super::dynamic::{DynamicType, DynamicValue};
use super::primitive::PrimitiveValue;

/// Object-safe access to `Any` for dispatch by concrete type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Minimum capability of every element: an identifier and an extension list.
pub trait HasIdAndExtensions {
    fn id(&self) -> Option<&str>;

    fn extensions(&self) -> &[Extension];
}

/// Backbone-style composites additionally carry modifier extensions.
pub trait HasModifierExtensions: HasIdAndExtensions {
    fn modifier_extensions(&self) -> &[Extension];
}

/// A composite, field-bearing node of the document model.
pub trait Element: HasIdAndExtensions + AsAny + fmt::Debug + Send + Sync + 'static {
    /// Stable type name, used as the root segment of locations.
    fn type_name(&self) -> &'static str;

    /// Every model field except `extension` and `modifierExtension`, which are
    /// reached through the capability traits.
    fn fields(&self) -> Vec<Field<'_>>;

    /// Modifier-extension view for backbone shapes.
    fn as_backbone(&self) -> Option<&dyn HasModifierExtensions> {
        None
    }
}

/// Declarative, reusable rule attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldConstraint {
    /// Value must be present; list-valued fields must be non-empty.
    Required,
    /// Code must be a member of the named enumeration.
    RequiredValueSet(&'static str),
    /// Active variant of a tagged value must be one of these.
    SupportedVariants(&'static [DynamicType]),
    /// Reference target type must be one of these resource types.
    SupportedReferenceTargets(&'static [&'static str]),
}

/// Borrowed view of a field's current value.
#[derive(Debug)]
pub enum FieldValue<'a> {
    Absent,
    Primitive(&'a PrimitiveValue),
    Element(&'a dyn Element),
    Reference(&'a Reference),
    Dynamic(&'a DynamicValue),
    List(Vec<FieldValue<'a>>),
}

impl<'a> FieldValue<'a> {
    pub fn primitive(value: Option<&'a PrimitiveValue>) -> Self {
        value.map_or(FieldValue::Absent, FieldValue::Primitive)
    }

    pub fn primitives(values: &'a [PrimitiveValue]) -> Self {
        FieldValue::List(values.iter().map(FieldValue::Primitive).collect())
    }

    pub fn element<T: Element>(value: Option<&'a T>) -> Self {
        match value {
            Some(element) => FieldValue::Element(element),
            None => FieldValue::Absent,
        }
    }

    pub fn elements<T: Element>(values: &'a [T]) -> Self {
        FieldValue::List(
            values
                .iter()
                .map(|element| FieldValue::Element(element as &dyn Element))
                .collect(),
        )
    }

    pub fn reference(value: Option<&'a Reference>) -> Self {
        value.map_or(FieldValue::Absent, FieldValue::Reference)
    }

    pub fn references(values: &'a [Reference]) -> Self {
        FieldValue::List(values.iter().map(FieldValue::Reference).collect())
    }

    pub fn dynamic(value: Option<&'a DynamicValue>) -> Self {
        value.map_or(FieldValue::Absent, FieldValue::Dynamic)
    }

    /// Null, or an empty list.
    pub fn is_missing(&self) -> bool {
        match self {
            FieldValue::Absent => true,
            FieldValue::List(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, FieldValue::List(_))
    }
}

/// One field of an element as seen by the structural walker.
#[derive(Debug)]
pub struct Field<'a> {
    pub name: &'static str,
    pub value: FieldValue<'a>,
    pub constraints: &'static [FieldConstraint],
}

impl<'a> Field<'a> {
    pub fn new(name: &'static str, value: FieldValue<'a>) -> Self {
        Self {
            name,
            value,
            constraints: &[],
        }
    }

    pub fn with_constraints(mut self, constraints: &'static [FieldConstraint]) -> Self {
        self.constraints = constraints;
        self
    }

    /// Shorthand for a field carrying only [`FieldConstraint::Required`].
    pub fn required(name: &'static str, value: FieldValue<'a>) -> Self {
        Self::new(name, value).with_constraints(&[FieldConstraint::Required])
    }
}
