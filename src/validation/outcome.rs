//! FHIR `OperationOutcome` rendering of a validation result.

use serde_json::{Value, json};

use crate::types::ValidationIssue;
use crate::validation::Validation;

impl ValidationIssue {
    /// One `OperationOutcome.issue` entry.
    pub fn to_outcome_issue(&self) -> Value {
        let definition = self.definition();
        let mut issue = json!({
            "severity": self.severity().fhir_code(),
            "code": definition.issue_type().fhir_code(),
            "details": { "text": self.description() },
            "diagnostics": self.code(),
            "expression": [self.path()],
        });
        if let Some(declared) = definition.declared_path() {
            issue["extension"] = json!([{
                "url": "http://hl7.org/fhir/StructureDefinition/operationoutcome-issue-source",
                "valueString": declared,
            }]);
        }
        issue
    }
}

impl Validation {
    /// Renders all issues as an `OperationOutcome` resource.
    ///
    /// An empty validation yields the single informational "All OK" issue FHIR
    /// servers conventionally return.
    pub fn to_operation_outcome(&self) -> Value {
        let issues: Vec<Value> = if self.is_empty() {
            vec![json!({
                "severity": "information",
                "code": "informational",
                "details": { "text": "All OK" },
            })]
        } else {
            self.issues()
                .iter()
                .map(ValidationIssue::to_outcome_issue)
                .collect()
        };

        json!({
            "resourceType": "OperationOutcome",
            "issue": issues,
        })
    }
}
