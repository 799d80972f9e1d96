use serde::{Deserialize, Serialize};

/// Validation configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationConfig {
    /// Optional guard against models whose `fields()` never bottom out: the
    /// maximum location depth, in path segments, before validation aborts
    /// with a configuration error. Off by default; finite documents of any
    /// depth validate.
    pub max_depth: Option<usize>,
    /// Run primitive grammar checks on scalar fields (default: true)
    pub validate_primitives: bool,
    /// Apply supported-reference-target declarations (default: true)
    pub check_reference_targets: bool,
    /// Make `ValidationEngine::validate_or_raise` fail on WARNING-only results.
    /// `Validation::raise_if_errors` is unaffected (default: false)
    pub fail_on_warnings: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            validate_primitives: true,
            check_reference_targets: true,
            fail_on_warnings: false,
        }
    }
}

impl ValidationConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_primitive_validation(mut self, enabled: bool) -> Self {
        self.validate_primitives = enabled;
        self
    }

    pub fn with_reference_target_checks(mut self, enabled: bool) -> Self {
        self.check_reference_targets = enabled;
        self
    }

    pub fn with_fail_on_warnings(mut self, enabled: bool) -> Self {
        self.fail_on_warnings = enabled;
        self
    }
}
