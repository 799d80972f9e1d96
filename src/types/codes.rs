//! Coded enumerations: closed sets of permitted code strings.

/// Lookup capability for a closed code set (code string to enum member).
pub trait CodedEnum: Sized + Copy + 'static {
    /// Name under which the code set is registered as a value set.
    const VALUE_SET: &'static str;

    /// Every permitted code, in declaration order.
    const CODES: &'static [&'static str];

    fn from_code(code: &str) -> Option<Self>;

    fn code(&self) -> &'static str;
}

/// Declares a [`CodedEnum`] from `Variant => "code"` pairs.
///
/// ```
/// octofhir_fhir_validation::fhir_code_enum! {
///     pub enum AppointmentStatus("appointmentstatus") {
///         Proposed => "proposed",
///         Booked => "booked",
///     }
/// }
///
/// use octofhir_fhir_validation::CodedEnum;
/// assert_eq!(AppointmentStatus::from_code("booked"), Some(AppointmentStatus::Booked));
/// ```
#[macro_export]
macro_rules! fhir_code_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident($value_set:literal) {
            $($variant:ident => $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::types::CodedEnum for $name {
            const VALUE_SET: &'static str = $value_set;
            const CODES: &'static [&'static str] = &[$($code),+];

            fn from_code(code: &str) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }

            fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }
        }
    };
}

fhir_code_enum! {
    /// http://hl7.org/fhir/ValueSet/identifier-use
    pub enum IdentifierUse("identifier-use") {
        Usual => "usual",
        Official => "official",
        Temp => "temp",
        Secondary => "secondary",
        Old => "old",
    }
}

fhir_code_enum! {
    /// http://hl7.org/fhir/ValueSet/quantity-comparator
    pub enum QuantityComparator("quantity-comparator") {
        LessThan => "<",
        LessOrEqual => "<=",
        GreaterOrEqual => ">=",
        GreaterThan => ">",
    }
}

fhir_code_enum! {
    /// http://hl7.org/fhir/ValueSet/administrative-gender
    pub enum AdministrativeGender("administrative-gender") {
        Male => "male",
        Female => "female",
        Other => "other",
        Unknown => "unknown",
    }
}
