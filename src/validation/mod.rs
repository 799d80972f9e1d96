pub mod accumulator;
pub mod constraints;
pub mod datatypes;
pub mod outcome;
pub mod primitive;
pub mod registry;
pub mod value_sets;
pub mod walker;

use crate::core::ValidationConfig;
use crate::error::{FhirValidationError, Result};
use crate::types::{CodedEnum, Element, LocationContext, PrimitiveKind, PrimitiveValue, Severity};

pub use accumulator::{IssueCounts, Validation};
pub use primitive::{Grammar, PrimitiveRegistry, PrimitiveValidator};
pub use registry::{ElementRegistry, ElementValidator};
pub use value_sets::{ValueSet, ValueSetRegistry};

/// Validation engine for document-model elements
///
/// Holds the element-type registry, the primitive grammars, the named value
/// sets and the configuration. All of them are read-only once built, so one
/// engine may validate independent documents from many threads at once.
#[derive(Debug)]
pub struct ValidationEngine {
    elements: ElementRegistry,
    primitives: PrimitiveRegistry,
    value_sets: ValueSetRegistry,
    config: ValidationConfig,
}

impl ValidationEngine {
    /// Engine with the standard datatype validators, built-in primitive
    /// grammars and built-in value sets
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Builder seeded with the same standard registrations as [`new`](Self::new)
    pub fn builder() -> ValidationEngineBuilder {
        ValidationEngineBuilder::new()
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn elements(&self) -> &ElementRegistry {
        &self.elements
    }

    pub fn primitives(&self) -> &PrimitiveRegistry {
        &self.primitives
    }

    pub fn value_sets(&self) -> &ValueSetRegistry {
        &self.value_sets
    }

    /// Validate `element` rooted at its own type name
    pub fn validate(&self, element: &dyn Element) -> Result<Validation> {
        self.validate_element(element, &LocationContext::root(element.type_name()))
    }

    /// Validate `element` as the child found at `location`
    pub fn validate_at(
        &self,
        element: &dyn Element,
        location: &LocationContext,
    ) -> Result<Validation> {
        self.validate_element(element, location)
    }

    /// Dispatch to the hand-written validator for `element`'s concrete type,
    /// falling back to the structural walker
    pub fn validate_element(
        &self,
        element: &dyn Element,
        location: &LocationContext,
    ) -> Result<Validation> {
        if let Some(limit) = self
            .config
            .max_depth
            .filter(|limit| location.depth() > *limit)
        {
            return Err(FhirValidationError::depth_limit_exceeded(
                limit,
                location.render(),
            ));
        }

        if self.elements.handles(element) {
            tracing::debug!(
                element_type = element.type_name(),
                path = %location,
                "Dispatching to registered validator"
            );
            if let Some(result) = self.elements.dispatch(element, location, self) {
                return result;
            }
        }

        tracing::debug!(
            element_type = element.type_name(),
            path = %location,
            "No registered validator, walking structure"
        );
        self.walk(element, location)
    }

    /// Check `value` against its kind's grammar
    pub fn validate_primitive(
        &self,
        value: &PrimitiveValue,
        location: &LocationContext,
    ) -> Validation {
        if !self.config.validate_primitives {
            return Validation::new();
        }
        self.primitives.validate(value, location)
    }

    /// Validate and fail on ERROR issues (or WARNING ones in strict mode)
    pub fn validate_or_raise(&self, element: &dyn Element) -> Result<Validation> {
        let validation = self.validate(element)?;
        let threshold = if self.config.fail_on_warnings {
            Severity::Warning
        } else {
            Severity::Error
        };
        validation.raise_at(threshold)?;
        Ok(validation)
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Explicit, one-time registration step for a [`ValidationEngine`]
#[derive(Debug)]
pub struct ValidationEngineBuilder {
    elements: ElementRegistry,
    primitives: PrimitiveRegistry,
    value_sets: ValueSetRegistry,
    config: ValidationConfig,
}

impl ValidationEngineBuilder {
    /// Builder holding the standard registrations
    pub fn new() -> Self {
        Self {
            elements: datatypes::standard_registry(),
            primitives: PrimitiveRegistry::with_builtins(),
            value_sets: ValueSetRegistry::with_builtins(),
            config: ValidationConfig::default(),
        }
    }

    /// Builder with no validators, grammars or value sets
    pub fn empty() -> Self {
        Self {
            elements: ElementRegistry::new(),
            primitives: PrimitiveRegistry::new(),
            value_sets: ValueSetRegistry::new(),
            config: ValidationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    /// Register the hand-written validator for `T`
    pub fn register<T, V>(mut self, validator: V) -> Result<Self>
    where
        T: Element,
        V: ElementValidator<T> + 'static,
    {
        self.elements.register::<T, V>(validator)?;
        Ok(self)
    }

    /// Register a grammar for a primitive kind without one
    pub fn register_primitive<V>(mut self, kind: PrimitiveKind, validator: V) -> Result<Self>
    where
        V: PrimitiveValidator + 'static,
    {
        self.primitives.register(kind, validator)?;
        Ok(self)
    }

    /// Replace the grammar for a primitive kind
    pub fn override_primitive<V>(mut self, kind: PrimitiveKind, validator: V) -> Self
    where
        V: PrimitiveValidator + 'static,
    {
        self.primitives.replace(kind, validator);
        self
    }

    /// Register the value set described by a coded enumeration
    pub fn register_value_set<E: CodedEnum>(mut self) -> Result<Self> {
        self.value_sets.register_enum::<E>()?;
        Ok(self)
    }

    /// Register a value set from a raw code list
    pub fn register_codes<I, S>(mut self, name: &str, codes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value_sets.register(ValueSet::new(name, codes))?;
        Ok(self)
    }

    pub fn build(self) -> ValidationEngine {
        tracing::info!(
            element_validators = self.elements.len(),
            primitive_grammars = self.primitives.len(),
            value_sets = self.value_sets.len(),
            max_depth = ?self.config.max_depth,
            "Validation engine built"
        );
        ValidationEngine {
            elements: self.elements,
            primitives: self.primitives,
            value_sets: self.value_sets,
            config: self.config,
        }
    }
}

impl Default for ValidationEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coding, Extension, Identifier, Period, PrimitiveValue, Reference};

    #[test]
    fn test_engine_defaults() {
        let engine = ValidationEngine::new();
        assert_eq!(engine.elements().len(), 5);
        assert_eq!(engine.primitives().len(), 18);
        assert!(engine.value_sets().contains("identifier-use"));
        assert_eq!(engine.config(), &ValidationConfig::default());
    }

    #[test]
    fn test_validate_at_uses_parent_location() {
        let engine = ValidationEngine::new();
        let parent = LocationContext::root("Patient").field_index("identifier", 1);
        let identifier = Identifier::new("http://example.org", "1").with_use("primary");
        let validation = engine.validate_at(&identifier, &parent).unwrap();
        assert_eq!(validation.issues()[0].path(), "Patient.identifier[1].use");
    }

    #[test]
    fn test_depth_limit_is_a_configuration_error() {
        let engine = ValidationEngine::builder()
            .with_config(ValidationConfig::default().with_max_depth(2))
            .build();
        let assigner = Reference {
            identifier: Some(Box::new(Identifier::new("http://example.org/orgs", "2"))),
            ..Reference::to("Organization/1")
        };
        let identifier = Identifier::new("http://example.org", "1").with_assigner(assigner);
        let err = engine.validate(&identifier).unwrap_err();
        assert!(matches!(err, FhirValidationError::DepthLimitExceeded { limit: 2, .. }));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_deep_finite_tree_validates_without_limit() {
        let url = "http://example.org/fhir/StructureDefinition/nested";
        let leaf = Extension::new(url, PrimitiveValue::date("2024-05-01"));
        let tree = (0..48).fold(leaf, |inner, _| Extension::complex(url, vec![inner]));

        let validation = ValidationEngine::new().validate(&tree).unwrap();
        assert!(validation.is_empty(), "{:?}", validation.rendered_issues());

        let err = ValidationEngine::builder()
            .with_config(ValidationConfig::default().with_max_depth(64))
            .build()
            .validate(&tree)
            .unwrap_err();
        assert!(matches!(err, FhirValidationError::DepthLimitExceeded { limit: 64, .. }));
    }

    #[test]
    fn test_duplicate_registration_fails_at_build_time() {
        let result = ValidationEngine::builder().register::<Coding, _>(
            |_: &Coding, _: &LocationContext, _: &ValidationEngine| -> Result<Validation> {
                Ok(Validation::new())
            },
        );
        assert!(matches!(
            result,
            Err(FhirValidationError::DuplicateValidator { type_name: "Coding" })
        ));
    }

    #[test]
    fn test_empty_builder_falls_back_to_walker() {
        let engine = ValidationEngineBuilder::empty().build();
        assert!(engine.elements().is_empty());
        // No Coding validator and no grammars: nothing to report.
        assert!(engine.validate(&Coding::code_only("bad  code")).unwrap().is_empty());
    }

    #[test]
    fn test_validate_or_raise() {
        let engine = ValidationEngine::new();
        let reversed = Period::new(Some("2024-03-01"), Some("2024-02-01"));
        let err = engine.validate_or_raise(&reversed).unwrap_err();
        assert!(matches!(err, FhirValidationError::Failed(_)));
        assert!(err.to_string().contains("ERROR R4_PER_001"));

        let warning_only = Reference::to("patient 123");
        assert!(engine.validate_or_raise(&warning_only).is_ok());

        let strict = ValidationEngine::builder()
            .with_config(ValidationConfig::default().with_fail_on_warnings(true))
            .build();
        assert!(strict.validate_or_raise(&warning_only).is_err());
    }
}
