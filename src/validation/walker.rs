//! Generic structural walker
//!
//! Used for every element type without a hand-written validator, and by
//! hand-written validators once their own checks are done. The walker visits
//! each entry of [`Element::fields`] exactly once, then the extension lists.
//! The document model is a finite tree, so recursion terminates; the depth
//! guard in [`ValidationEngine::validate_element`] catches malformed models.

use crate::error::Result;
use crate::types::{DynamicPayload, Element, Field, FieldValue, LocationContext};
use crate::validation::constraints;
use crate::validation::{Validation, ValidationEngine};

impl ValidationEngine {
    /// Structural validation of `element`: declared fields, then standard
    /// children.
    pub fn walk(&self, element: &dyn Element, location: &LocationContext) -> Result<Validation> {
        let validation = self.walk_fields(element, location)?;
        Ok(validation.merged(self.validate_standard_children(element, location)?))
    }

    /// Applies declarations and recurses into every field of `element`.
    pub fn walk_fields(
        &self,
        element: &dyn Element,
        location: &LocationContext,
    ) -> Result<Validation> {
        let mut validation = Validation::new();
        for field in element.fields() {
            validation.merge(self.validate_field(&field, location)?);
        }
        Ok(validation)
    }

    /// Validates one field of the element located at `parent`.
    pub fn validate_field(&self, field: &Field<'_>, parent: &LocationContext) -> Result<Validation> {
        let location = parent.field(field.name);
        tracing::trace!(path = %location, constraints = field.constraints.len(), "Visiting field");

        let validation = constraints::apply_all(self, field, &location)?;
        Ok(validation.merged(self.validate_value(&field.value, &location)?))
    }

    /// `extension[i]`, then `modifierExtension[i]` for backbone shapes.
    pub fn validate_standard_children(
        &self,
        element: &dyn Element,
        location: &LocationContext,
    ) -> Result<Validation> {
        let mut validation = Validation::new();
        for (index, extension) in element.extensions().iter().enumerate() {
            validation.merge(
                self.validate_element(extension, &location.field_index("extension", index))?,
            );
        }
        if let Some(backbone) = element.as_backbone() {
            for (index, extension) in backbone.modifier_extensions().iter().enumerate() {
                validation.merge(self.validate_element(
                    extension,
                    &location.field_index("modifierExtension", index),
                )?);
            }
        }
        Ok(validation)
    }

    fn validate_value(&self, value: &FieldValue<'_>, location: &LocationContext) -> Result<Validation> {
        match value {
            FieldValue::Absent => Ok(Validation::new()),
            FieldValue::Primitive(primitive) => Ok(self.validate_primitive(primitive, location)),
            FieldValue::Element(element) => self.validate_element(*element, location),
            FieldValue::Reference(reference) => self.validate_element(*reference, location),
            FieldValue::Dynamic(dynamic) => match dynamic.payload() {
                DynamicPayload::Primitive(primitive) => {
                    Ok(self.validate_primitive(primitive, location))
                }
                DynamicPayload::Element(element) => self.validate_element(&**element, location),
                DynamicPayload::Reference(reference) => self.validate_element(reference, location),
            },
            FieldValue::List(items) => {
                let mut validation = Validation::new();
                for (index, item) in items.iter().enumerate() {
                    validation.merge(self.validate_value(item, &location.index(index))?);
                }
                Ok(validation)
            }
        }
    }
}
