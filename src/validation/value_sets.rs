//! Named enumerations consulted by `RequiredValueSet` declarations.

use std::collections::{BTreeSet, HashMap};

use crate::error::{FhirValidationError, Result};
use crate::types::{AdministrativeGender, CodedEnum, IdentifierUse, QuantityComparator};

/// A closed set of permitted codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSet {
    name: String,
    codes: BTreeSet<String>,
}

impl ValueSet {
    pub fn new<I, S>(name: impl Into<String>, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_enum<E: CodedEnum>() -> Self {
        Self::new(E::VALUE_SET, E::CODES.iter().copied())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Registry of value sets by name.
#[derive(Debug, Clone, Default)]
pub struct ValueSetRegistry {
    value_sets: HashMap<String, ValueSet>,
}

impl ValueSetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the code sets the built-in datatypes declare.
    pub fn with_builtins() -> Self {
        let value_sets = [
            ValueSet::from_enum::<IdentifierUse>(),
            ValueSet::from_enum::<QuantityComparator>(),
            ValueSet::from_enum::<AdministrativeGender>(),
        ];
        Self {
            value_sets: value_sets
                .into_iter()
                .map(|value_set| (value_set.name().to_string(), value_set))
                .collect(),
        }
    }

    pub fn register(&mut self, value_set: ValueSet) -> Result<()> {
        if self.value_sets.contains_key(value_set.name()) {
            return Err(FhirValidationError::DuplicateValueSet {
                name: value_set.name().to_string(),
            });
        }
        self.value_sets
            .insert(value_set.name().to_string(), value_set);
        Ok(())
    }

    pub fn register_enum<E: CodedEnum>(&mut self) -> Result<()> {
        self.register(ValueSet::from_enum::<E>())
    }

    pub fn get(&self, name: &str) -> Option<&ValueSet> {
        self.value_sets.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.value_sets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.value_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value_sets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_enum_value_set() {
        let mut registry = ValueSetRegistry::new();
        registry.register_enum::<IdentifierUse>().unwrap();

        let value_set = registry.get("identifier-use").unwrap();
        assert!(value_set.contains("official"));
        assert!(!value_set.contains("primary"));
        assert_eq!(value_set.len(), 5);
    }

    #[test]
    fn test_builtins_cover_datatype_declarations() {
        let registry = ValueSetRegistry::with_builtins();
        assert!(registry.contains("identifier-use"));
        assert!(registry.get("quantity-comparator").unwrap().contains(">="));
        assert!(registry.contains("administrative-gender"));
        assert!(matches!(
            ValueSetRegistry::with_builtins().register_enum::<IdentifierUse>(),
            Err(FhirValidationError::DuplicateValueSet { .. })
        ));
    }

    #[test]
    fn test_duplicate_value_set_is_rejected() {
        let mut registry = ValueSetRegistry::new();
        registry
            .register(ValueSet::new("colors", ["red", "green"]))
            .unwrap();
        let err = registry
            .register(ValueSet::new("colors", ["blue"]))
            .unwrap_err();
        assert!(matches!(err, FhirValidationError::DuplicateValueSet { .. }));
        assert!(registry.get("colors").unwrap().contains("red"));
    }
}
