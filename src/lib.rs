//! # OctoFHIR FHIR Validation
//!
//! A generic validation engine for FHIR-style element trees. It checks
//! instances against structural and semantic constraints the element shapes
//! cannot express on their own.
//!
//! ## Features
//!
//! - **Type dispatch**: hand-written validators registered per concrete element
//!   type, with a structural walker as the fallback for every other type
//! - **Field constraints**: declarative `Required`, `RequiredValueSet`,
//!   `SupportedVariants` and `SupportedReferenceTargets` rules attached to
//!   fields and processed by one shared interpreter per kind
//! - **Primitive grammars**: FHIR R4 formats for dates, identifiers, URIs,
//!   UUIDs, OIDs, base64 payloads and bounded integers
//! - **Precise locations**: every issue carries a path such as
//!   `Patient.contact[2].name`
//! - **OperationOutcome output**: render results as a FHIR resource
//!
//! ## Quick Start
//!
//! ```rust
//! use octofhir_fhir_validation::*;
//!
//! # fn example() -> Result<()> {
//! let engine = ValidationEngine::new();
//!
//! let coding = Coding::code_only("22298006");
//! let validation = engine.validate(&coding)?;
//!
//! assert_eq!(validation.len(), 1);
//! assert_eq!(
//!     validation.rendered_issues()[0],
//!     "ERROR R4_CODING_001: If a code is present, the coding system must also be present @ Coding"
//! );
//! assert!(validation.raise_if_errors().is_err());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod core;
pub mod error;
pub mod types;
pub mod validation;

pub use crate::core::ValidationConfig;
pub use error::Result; // Our Result type takes precedence
pub use error::{FhirValidationError, ValidationFailure};
pub use types::*;
pub use validation::{
    ElementRegistry, ElementValidator, Grammar, IssueCounts, PrimitiveRegistry,
    PrimitiveValidator, Validation, ValidationEngine, ValidationEngineBuilder, ValueSet,
    ValueSetRegistry,
};
