use octofhir_fhir_validation::*;
use tracing_subscriber::EnvFilter;

fhir_code_enum! {
    /// http://hl7.org/fhir/ValueSet/appointmentstatus
    pub enum AppointmentStatus("appointmentstatus") {
        Proposed => "proposed",
        Pending => "pending",
        Booked => "booked",
        Arrived => "arrived",
        Fulfilled => "fulfilled",
        Cancelled => "cancelled",
        Noshow => "noshow",
        EnteredInError => "entered-in-error",
        CheckedIn => "checked-in",
        Waitlist => "waitlist",
    }
}

fhir_code_enum! {
    /// http://hl7.org/fhir/ValueSet/participationstatus
    pub enum ParticipationStatus("participationstatus") {
        Accepted => "accepted",
        Declined => "declined",
        Tentative => "tentative",
        NeedsAction => "needs-action",
    }
}

const STATUS_CONSTRAINTS: &[FieldConstraint] = &[
    FieldConstraint::Required,
    FieldConstraint::RequiredValueSet(AppointmentStatus::VALUE_SET),
];
const STATUS_HISTORY_CONSTRAINTS: &[FieldConstraint] =
    &[FieldConstraint::RequiredValueSet(AppointmentStatus::VALUE_SET)];
const PARTICIPANT_CONSTRAINTS: &[FieldConstraint] = &[FieldConstraint::Required];
const REASON_CONSTRAINTS: &[FieldConstraint] = &[
    FieldConstraint::SupportedVariants(&[DynamicType::CodeableConcept, DynamicType::Reference]),
    FieldConstraint::SupportedReferenceTargets(&["Condition", "Procedure", "Observation"]),
];
const SUPPORTING_INFORMATION_CONSTRAINTS: &[FieldConstraint] =
    &[FieldConstraint::SupportedReferenceTargets(&["Patient", "Observation"])];
const ACTOR_CONSTRAINTS: &[FieldConstraint] = &[FieldConstraint::SupportedReferenceTargets(&[
    "Patient",
    "Practitioner",
    "Location",
])];
const PARTICIPANT_STATUS_CONSTRAINTS: &[FieldConstraint] = &[
    FieldConstraint::Required,
    FieldConstraint::RequiredValueSet(ParticipationStatus::VALUE_SET),
];

/// Test resource with a backbone list, a code list and a `reason[x]` choice.
#[derive(Debug, Default)]
pub struct Appointment {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub modifier_extension: Vec<Extension>,
    pub status: Option<PrimitiveValue>,
    pub status_history: Vec<PrimitiveValue>,
    pub cancelation_reason: Option<CodeableConcept>,
    pub reason: Option<DynamicValue>,
    pub supporting_information: Vec<Reference>,
    pub participant: Vec<AppointmentParticipant>,
}

impl Appointment {
    pub fn booked() -> Self {
        Self {
            status: Some(PrimitiveValue::code("booked")),
            participant: vec![AppointmentParticipant::new("Patient/example", "accepted")],
            ..Default::default()
        }
    }
}

impl HasIdAndExtensions for Appointment {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn extensions(&self) -> &[Extension] {
        &self.extension
    }
}

impl HasModifierExtensions for Appointment {
    fn modifier_extensions(&self) -> &[Extension] {
        &self.modifier_extension
    }
}

impl Element for Appointment {
    fn type_name(&self) -> &'static str {
        "Appointment"
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::new("status", FieldValue::primitive(self.status.as_ref()))
                .with_constraints(STATUS_CONSTRAINTS),
            Field::new("statusHistory", FieldValue::primitives(&self.status_history))
                .with_constraints(STATUS_HISTORY_CONSTRAINTS),
            Field::new(
                "cancelationReason",
                FieldValue::element(self.cancelation_reason.as_ref()),
            ),
            Field::new("reason", FieldValue::dynamic(self.reason.as_ref()))
                .with_constraints(REASON_CONSTRAINTS),
            Field::new(
                "supportingInformation",
                FieldValue::references(&self.supporting_information),
            )
            .with_constraints(SUPPORTING_INFORMATION_CONSTRAINTS),
            Field::new("participant", FieldValue::elements(&self.participant))
                .with_constraints(PARTICIPANT_CONSTRAINTS),
        ]
    }

    fn as_backbone(&self) -> Option<&dyn HasModifierExtensions> {
        Some(self)
    }
}

#[derive(Debug, Default)]
pub struct AppointmentParticipant {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub modifier_extension: Vec<Extension>,
    pub actor: Option<Reference>,
    pub status: Option<PrimitiveValue>,
    pub period: Option<Period>,
}

impl AppointmentParticipant {
    pub fn new(actor: &str, status: &str) -> Self {
        Self {
            actor: Some(Reference::to(actor)),
            status: Some(PrimitiveValue::code(status)),
            ..Default::default()
        }
    }
}

impl HasIdAndExtensions for AppointmentParticipant {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn extensions(&self) -> &[Extension] {
        &self.extension
    }
}

impl HasModifierExtensions for AppointmentParticipant {
    fn modifier_extensions(&self) -> &[Extension] {
        &self.modifier_extension
    }
}

impl Element for AppointmentParticipant {
    fn type_name(&self) -> &'static str {
        "AppointmentParticipant"
    }

    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::new("actor", FieldValue::reference(self.actor.as_ref()))
                .with_constraints(ACTOR_CONSTRAINTS),
            Field::new("status", FieldValue::primitive(self.status.as_ref()))
                .with_constraints(PARTICIPANT_STATUS_CONSTRAINTS),
            Field::new("period", FieldValue::element(self.period.as_ref())),
        ]
    }

    fn as_backbone(&self) -> Option<&dyn HasModifierExtensions> {
        Some(self)
    }
}

#[allow(dead_code)]
pub const CANCELATION_REASON_ONLY_WHEN_CANCELLED: IssueDefinition = IssueDefinition::declare(
    "R4_APPT_001",
    Severity::Error,
    IssueType::Invariant,
    "Cancellation reason is only used for appointments that have been cancelled",
    Some("Appointment.cancelationReason"),
);

/// Hand-written validator exercising the dispatch path.
#[derive(Debug, Default)]
pub struct AppointmentValidator;

impl ElementValidator<Appointment> for AppointmentValidator {
    fn validate(
        &self,
        appointment: &Appointment,
        location: &LocationContext,
        engine: &ValidationEngine,
    ) -> Result<Validation> {
        let mut validation = Validation::new();

        let status = appointment
            .status
            .as_ref()
            .and_then(PrimitiveValue::as_code)
            .and_then(AppointmentStatus::from_code);
        if appointment.cancelation_reason.is_some() {
            validation.check_true(
                matches!(
                    status,
                    Some(AppointmentStatus::Cancelled | AppointmentStatus::Noshow)
                ),
                &CANCELATION_REASON_ONLY_WHEN_CANCELLED,
                &location.field("cancelationReason"),
            );
        }

        Ok(validation.merged(engine.walk(appointment, location)?))
    }
}

/// Engine with the test value sets but no Appointment validator.
#[allow(dead_code)]
pub fn walker_engine() -> ValidationEngine {
    base_builder().build()
}

/// Engine with the test value sets and the Appointment validator.
#[allow(dead_code)]
pub fn engine() -> ValidationEngine {
    base_builder()
        .register::<Appointment, _>(AppointmentValidator)
        .unwrap()
        .build()
}

#[allow(dead_code)]
pub fn engine_with_config(config: ValidationConfig) -> ValidationEngine {
    base_builder()
        .with_config(config)
        .register::<Appointment, _>(AppointmentValidator)
        .unwrap()
        .build()
}

fn base_builder() -> ValidationEngineBuilder {
    init_tracing();
    ValidationEngine::builder()
        .register_value_set::<AppointmentStatus>()
        .unwrap()
        .register_value_set::<ParticipationStatus>()
        .unwrap()
}

#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[allow(dead_code)]
pub fn codes(validation: &Validation) -> Vec<String> {
    validation
        .issues()
        .iter()
        .map(|issue| issue.code().to_string())
        .collect()
}

#[allow(dead_code)]
pub fn paths(validation: &Validation) -> Vec<String> {
    validation.issues().iter().map(ValidationIssue::path).collect()
}
