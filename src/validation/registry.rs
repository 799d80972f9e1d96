//! Validator registry keyed by concrete element type

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{FhirValidationError, Result};
use crate::types::{Element, LocationContext};
use crate::validation::{Validation, ValidationEngine};

/// Hand-written validation for one element type.
///
/// Implementations perform their own checks and then hand the remaining
/// structure to [`ValidationEngine::walk`], merging the result.
pub trait ElementValidator<T: Element>: Send + Sync {
    fn validate(
        &self,
        element: &T,
        location: &LocationContext,
        engine: &ValidationEngine,
    ) -> Result<Validation>;
}

impl<T, F> ElementValidator<T> for F
where
    T: Element,
    F: Fn(&T, &LocationContext, &ValidationEngine) -> Result<Validation> + Send + Sync,
{
    fn validate(
        &self,
        element: &T,
        location: &LocationContext,
        engine: &ValidationEngine,
    ) -> Result<Validation> {
        self(element, location, engine)
    }
}

/// Object-safe form of [`ElementValidator`], erased over the element type.
pub(crate) trait ErasedValidator: Send + Sync {
    /// `None` when `element` is not the registered type.
    fn validate_dyn(
        &self,
        element: &dyn Element,
        location: &LocationContext,
        engine: &ValidationEngine,
    ) -> Option<Result<Validation>>;
}

struct Typed<T, V> {
    validator: V,
    _element: PhantomData<fn(&T)>,
}

impl<T, V> ErasedValidator for Typed<T, V>
where
    T: Element,
    V: ElementValidator<T>,
{
    fn validate_dyn(
        &self,
        element: &dyn Element,
        location: &LocationContext,
        engine: &ValidationEngine,
    ) -> Option<Result<Validation>> {
        let element = element.as_any().downcast_ref::<T>()?;
        Some(self.validator.validate(element, location, engine))
    }
}

fn short_type_name<T>() -> &'static str {
    let type_name = std::any::type_name::<T>();
    type_name.rsplit("::").next().unwrap_or(type_name)
}

struct Registration {
    type_name: &'static str,
    validator: Arc<dyn ErasedValidator>,
}

/// Mapping from element type to its hand-written validator.
///
/// At most one validator exists per type. Types without one are handled by
/// the structural walker.
#[derive(Default)]
pub struct ElementRegistry {
    validators: HashMap<TypeId, Registration>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T, V>(&mut self, validator: V) -> Result<()>
    where
        T: Element,
        V: ElementValidator<T> + 'static,
    {
        if self.contains::<T>() {
            return Err(FhirValidationError::DuplicateValidator {
                type_name: short_type_name::<T>(),
            });
        }
        self.insert::<T, V>(validator);
        Ok(())
    }

    /// Installs `validator`, replacing any previous one for `T`.
    pub(crate) fn insert<T, V>(&mut self, validator: V)
    where
        T: Element,
        V: ElementValidator<T> + 'static,
    {
        let type_name = short_type_name::<T>();
        self.validators.insert(
            TypeId::of::<T>(),
            Registration {
                type_name,
                validator: Arc::new(Typed {
                    validator,
                    _element: PhantomData,
                }),
            },
        );
    }

    pub fn contains<T: Element>(&self) -> bool {
        self.validators.contains_key(&TypeId::of::<T>())
    }

    /// Whether `element`'s concrete type has a hand-written validator.
    pub fn handles(&self, element: &dyn Element) -> bool {
        self.validators.contains_key(&element.as_any().type_id())
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Names of the registered types, sorted.
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .validators
            .values()
            .map(|registration| registration.type_name)
            .collect();
        names.sort_unstable();
        names
    }

    /// Runs the registered validator for `element`, if any.
    pub(crate) fn dispatch(
        &self,
        element: &dyn Element,
        location: &LocationContext,
        engine: &ValidationEngine,
    ) -> Option<Result<Validation>> {
        self.validators
            .get(&element.as_any().type_id())
            .and_then(|registration| registration.validator.validate_dyn(element, location, engine))
    }
}

impl fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}
