//! Field-constraint interpreter
//!
//! Every declaration kind is processed by one function here, whatever type or
//! field it decorates. Declarations on one field are independent: each
//! contributes its own issues.

use crate::error::{FhirValidationError, Result};
use crate::types::{
    DynamicType, Field, FieldConstraint, FieldValue, IssueDefinition, LocationContext, Reference,
};
use crate::validation::{Validation, ValidationEngine};

/// Applies every declaration on `field` at the field's location.
pub(crate) fn apply_all(
    engine: &ValidationEngine,
    field: &Field<'_>,
    location: &LocationContext,
) -> Result<Validation> {
    let mut validation = Validation::new();
    for constraint in field.constraints {
        validation.merge(apply(engine, constraint, field, location)?);
    }
    Ok(validation)
}

/// Applies a single declaration.
pub fn apply(
    engine: &ValidationEngine,
    constraint: &FieldConstraint,
    field: &Field<'_>,
    location: &LocationContext,
) -> Result<Validation> {
    let mut validation = Validation::new();
    match *constraint {
        FieldConstraint::Required => {
            validation.check_true(
                !field.value.is_missing(),
                &IssueDefinition::required(field.name),
                location,
            );
        }
        FieldConstraint::RequiredValueSet(value_set) => {
            check_value_set(engine, field.name, value_set, &field.value, location, &mut validation)?;
        }
        FieldConstraint::SupportedVariants(allowed) => {
            for_each_item(&field.value, location, &mut |value, location| {
                if let FieldValue::Dynamic(dynamic) = value {
                    check_variant(field.name, allowed, dynamic.tag(), location, &mut validation);
                }
            });
        }
        FieldConstraint::SupportedReferenceTargets(allowed) => {
            if !engine.config().check_reference_targets {
                return Ok(validation);
            }
            for_each_item(&field.value, location, &mut |value, location| {
                let reference = match value {
                    FieldValue::Reference(reference) => Some(*reference),
                    FieldValue::Dynamic(dynamic) => dynamic.as_reference(),
                    _ => None,
                };
                if let Some(reference) = reference {
                    check_reference_target(field.name, allowed, reference, location, &mut validation);
                }
            });
        }
    }
    Ok(validation)
}

/// Visits a scalar value at `location`, or each list item at `location[i]`.
fn for_each_item<'a>(
    value: &FieldValue<'a>,
    location: &LocationContext,
    visit: &mut dyn FnMut(&FieldValue<'a>, &LocationContext),
) {
    match value {
        FieldValue::Absent => {}
        FieldValue::List(items) => {
            for (index, item) in items.iter().enumerate() {
                visit(item, &location.index(index));
            }
        }
        other => visit(other, location),
    }
}

fn check_value_set(
    engine: &ValidationEngine,
    field_name: &str,
    value_set_name: &str,
    value: &FieldValue<'_>,
    location: &LocationContext,
    validation: &mut Validation,
) -> Result<()> {
    let value_set = engine
        .value_sets()
        .get(value_set_name)
        .ok_or_else(|| FhirValidationError::unknown_value_set(value_set_name, location.render()))?;

    for_each_item(value, location, &mut |item, location| {
        let code = match item {
            FieldValue::Primitive(primitive) => primitive.as_code(),
            FieldValue::Dynamic(dynamic) => dynamic.as_primitive().and_then(|p| p.as_code()),
            _ => None,
        };
        if let Some(code) = code {
            validation.check_true(
                value_set.contains(code),
                &IssueDefinition::invalid_value_set(field_name, value_set_name, code),
                location,
            );
        }
    });
    Ok(())
}

fn check_variant(
    field_name: &str,
    allowed: &[DynamicType],
    tag: DynamicType,
    location: &LocationContext,
    validation: &mut Validation,
) {
    validation.check_true(
        allowed.contains(&tag),
        &IssueDefinition::unsupported_variant(field_name, tag.fhir_name()),
        location,
    );
}

fn check_reference_target(
    field_name: &str,
    allowed: &[&str],
    reference: &Reference,
    location: &LocationContext,
    validation: &mut Validation,
) {
    if reference.is_local() {
        return;
    }
    // Unresolvable targets are reported by the Reference format rule instead.
    let Some(target) = reference.target_type() else {
        return;
    };
    validation.check_true(
        allowed.contains(&target.as_str()),
        &IssueDefinition::unsupported_reference_target(field_name, &target),
        location,
    );
}
