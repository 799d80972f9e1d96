//! Property-based tests for the validation engine.
//!
//! Uses proptest to generate locations, issue sequences and documents and
//! verify:
//! - Location rendering is deterministic and sibling indices never collide
//! - `merge` is associative and order preserving
//! - List value-set checks report exactly the failing indices
//! - Validation is deterministic for the same input

mod common;

use common::*;
use octofhir_fhir_validation::*;
use proptest::prelude::*;

// =============================================================================
// Property-Based Test Strategies
// =============================================================================

/// Strategy to generate a path segment
fn segment() -> impl Strategy<Value = PathSegment> {
    prop_oneof![
        "[a-z][a-zA-Z]{0,10}".prop_map(PathSegment::Field),
        (0usize..20).prop_map(PathSegment::Index),
    ]
}

/// Strategy to generate a location rooted at a resource type
fn location() -> impl Strategy<Value = LocationContext> {
    (
        "[A-Z][a-zA-Z]{2,12}",
        prop::collection::vec(segment(), 0..6),
    )
        .prop_map(|(root, segments)| {
            segments
                .into_iter()
                .fold(LocationContext::root(root), |location, segment| {
                    location.append(segment)
                })
        })
}

/// Strategy to generate one issue from a small catalog
fn issue() -> impl Strategy<Value = ValidationIssue> {
    (0usize..4, location()).prop_map(|(rule, location)| {
        let definition = match rule {
            0 => IssueDefinition::required("status"),
            1 => IssueDefinition::invalid_value_set("status", "appointmentstatus", "bogus"),
            2 => IssueDefinition::unsupported_reference_target("actor", "Device"),
            _ => IssueDefinition::invalid_format(PrimitiveKind::Date),
        };
        ValidationIssue::new(definition, location)
    })
}

/// Strategy to generate an accumulator
fn validation() -> impl Strategy<Value = Validation> {
    prop::collection::vec(issue(), 0..8).prop_map(Validation::from_iter)
}

/// Strategy to generate status codes, some outside the value set
fn status_code() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("booked".to_string()),
        Just("proposed".to_string()),
        Just("cancelled".to_string()),
        "[a-z]{3,8}".prop_map(|s| format!("x-{s}")),
    ]
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_rendering_is_deterministic(location in location()) {
        let copy = location.clone();
        prop_assert_eq!(location.render(), copy.render());
        prop_assert_eq!(location.to_string(), location.render());
    }

    #[test]
    fn prop_append_does_not_mutate(location in location(), extra in segment()) {
        let before = location.render();
        let extended = location.append(extra);
        prop_assert_eq!(location.render(), before);
        prop_assert_eq!(extended.depth(), location.depth() + 1);
    }

    #[test]
    fn prop_sibling_indices_render_distinctly(location in location(), a in 0usize..100, b in 0usize..100) {
        prop_assume!(a != b);
        let left = location.field_index("item", a);
        let right = location.field_index("item", b);
        prop_assert_ne!(left.render(), right.render());
    }

    #[test]
    fn prop_merge_is_associative(a in validation(), b in validation(), c in validation()) {
        let left = a.clone().merged(b.clone()).merged(c.clone());
        let right = a.merged(b.merged(c));
        prop_assert_eq!(left, right);
    }

    #[test]
    fn prop_merge_preserves_order(a in validation(), b in validation()) {
        let expected: Vec<String> = a
            .rendered_issues()
            .into_iter()
            .chain(b.rendered_issues())
            .collect();
        let mut merged = a;
        merged.merge(b);
        prop_assert_eq!(merged.rendered_issues(), expected);
    }

    #[test]
    fn prop_raise_iff_errors(v in validation()) {
        prop_assert_eq!(v.raise_if_errors().is_err(), v.has_errors());
    }

    #[test]
    fn prop_value_set_list_reports_failing_indices(history in prop::collection::vec(status_code(), 0..10)) {
        let engine = engine();
        let appointment = Appointment {
            status_history: history.iter().map(PrimitiveValue::code).collect(),
            ..Appointment::booked()
        };
        let validation = engine.validate(&appointment).unwrap();

        let expected: Vec<String> = history
            .iter()
            .enumerate()
            .filter(|(_, code)| code.starts_with("x-"))
            .map(|(index, _)| format!("Appointment.statusHistory[{index}]"))
            .collect();
        prop_assert_eq!(paths(&validation), expected);
    }

    #[test]
    fn prop_validation_is_deterministic(status in status_code(), actor in "(Patient|Device|Location)/[a-z0-9]{1,6}") {
        let engine = engine();
        let appointment = Appointment {
            status: Some(PrimitiveValue::code(&status)),
            participant: vec![AppointmentParticipant::new(&actor, "accepted")],
            ..Default::default()
        };
        let first = engine.validate(&appointment).unwrap();
        let second = engine.validate(&appointment).unwrap();
        prop_assert_eq!(first, second);
    }
}
