use std::sync::Arc;

use crate::components::{Control, FileUpload, FileUploader, RadioGroup};
use crate::form::{
    BoundField, FieldDescriptor, FormController, FormError, FormLayout, FormModel, FormOptions,
    FormResult, FormSection, PersistenceError, RenderedForm, Schema, SubmissionError, Violation,
    render_form,
};
use crate::icon;
use crate::phone::PhoneDefaults;

use super::actions::{PatientActions, PatientRef, RegistrationPayload, User};
use super::constants::{identification_type_options, physician_options};
use super::navigation::{NavigationIntent, Navigator};
use super::schema::ValidRegistration;
use super::values::{Gender, RegistrationValues};

pub type RegistrationController = FormController<RegistrationValues, Violation>;

fn gender_control(field: BoundField<Gender>, disabled: bool) -> Control {
    let field = field.try_map(
        |gender| gender.as_str().to_string(),
        |choice: String| choice.parse::<Gender>().ok(),
    );
    Control::Radio(
        RadioGroup::new()
            .choices(Gender::ALL.map(Gender::as_str))
            .bind(field)
            .disabled(disabled),
    )
}

fn document_control(field: BoundField<Vec<FileUpload>>, disabled: bool) -> Control {
    Control::FileUpload(FileUploader::new().bind(field).disabled(disabled))
}

pub fn registration_layout() -> Result<FormLayout<RegistrationValues, Violation>, FormError> {
    let fields = RegistrationValues::fields();

    let personal = FormSection::new("Personal Information")
        .field(
            FieldDescriptor::text(fields.name())
                .label("Full Name")
                .placeholder("Ahmed Mohamed")
                .icon(icon::USER),
        )
        .field(
            FieldDescriptor::text(fields.email())
                .label("Email")
                .placeholder("healthcare@healthcare.com")
                .icon(icon::EMAIL),
        )
        .field(
            FieldDescriptor::phone(fields.phone())
                .label("Phone number")
                .placeholder("065 9983463"),
        )
        .field(FieldDescriptor::date(fields.birth_date()).label("Date of Birth"))
        .field(FieldDescriptor::custom(fields.gender(), gender_control).label("Gender"))
        .field(
            FieldDescriptor::text(fields.address())
                .label("Address")
                .placeholder("14th Street, Cairo"),
        )
        .field(
            FieldDescriptor::text(fields.occupation())
                .label("Occupation")
                .placeholder("Fullstack Developer"),
        )
        .field(
            FieldDescriptor::text(fields.emergency_contact_name())
                .label("Emergency Contact Name")
                .placeholder("Ahmed Abdelfattah"),
        )
        .field(
            FieldDescriptor::phone(fields.emergency_contact_number())
                .label("Emergency Contact Number")
                .placeholder("065 9983463"),
        );

    let medical = FormSection::new("Medical Information")
        .field(
            FieldDescriptor::select(fields.primary_physician())
                .label("Primary Physician")
                .placeholder("Select a Physician")
                .options(physician_options()),
        )
        .field(
            FieldDescriptor::text(fields.insurance_provider())
                .label("Insurance Provider")
                .placeholder("BlueCross BlueShield"),
        )
        .field(
            FieldDescriptor::text(fields.insurance_policy_number())
                .label("Insurance Policy Number")
                .placeholder("ABD123456789"),
        )
        .field(
            FieldDescriptor::long_text(fields.allergies())
                .label("Allergies (if any)")
                .placeholder("Peanuts, Penicillin, Pollen"),
        )
        .field(
            FieldDescriptor::long_text(fields.current_medication())
                .label("Current Medication (if any)")
                .placeholder("Ibuprofen 200mg, Paracetamol 500mg"),
        )
        .field(
            FieldDescriptor::long_text(fields.family_medical_history())
                .label("Family medical history (if relevant)")
                .placeholder("ex: Mother had breast cancer"),
        )
        .field(
            FieldDescriptor::long_text(fields.past_medical_history())
                .label("Past medical history")
                .placeholder("ex: Asthma diagnosis in childhood"),
        );

    let identification = FormSection::new("Identification and Verification")
        .field(
            FieldDescriptor::select(fields.identification_type())
                .label("Identification type")
                .placeholder("Select Identification type")
                .options(identification_type_options()),
        )
        .field(
            FieldDescriptor::text(fields.identification_number())
                .label("Identification Number")
                .placeholder("123456789"),
        )
        .field(
            FieldDescriptor::custom(fields.identification_document(), document_control)
                .label("Scanned copy of identification document"),
        );

    let consent = FormSection::new("Consent and Privacy")
        .field(
            FieldDescriptor::checkbox(fields.treatment_consent())
                .label("I consent to receive treatment for my health condition."),
        )
        .field(FieldDescriptor::checkbox(fields.disclosure_consent()).label(
            "I consent to the use and disclosure of my health information for treatment purposes.",
        ))
        .field(
            FieldDescriptor::checkbox(fields.privacy_consent())
                .label("I acknowledge that I have reviewed and agree to the privacy policy"),
        );

    Ok(
        FormLayout::new(vec![personal, medical, identification, consent])?
            .heading("Welcome 👋")
            .subheading("Let's know more about yourself.")
            .submit_label("Get Started"),
    )
}

/// Full registration of an existing user as a patient.
pub struct RegistrationForm {
    user_id: String,
    controller: RegistrationController,
    layout: FormLayout<RegistrationValues, Violation>,
    actions: Arc<dyn PatientActions>,
    navigator: Arc<dyn Navigator>,
}

impl RegistrationForm {
    pub fn new(
        user: &User,
        actions: Arc<dyn PatientActions>,
        navigator: Arc<dyn Navigator>,
    ) -> FormResult<Self> {
        Self::with_options(
            user,
            actions,
            navigator,
            FormOptions::default(),
            PhoneDefaults::default(),
        )
    }

    pub fn with_options(
        user: &User,
        actions: Arc<dyn PatientActions>,
        navigator: Arc<dyn Navigator>,
        options: FormOptions,
        phone: PhoneDefaults,
    ) -> FormResult<Self> {
        let controller =
            RegistrationController::new(RegistrationValues::for_user(user), options);
        controller.register_schema()?;
        Ok(Self {
            user_id: user.id.clone(),
            controller,
            layout: registration_layout()?.phone_defaults(phone),
            actions,
            navigator,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn controller(&self) -> &RegistrationController {
        &self.controller
    }

    pub fn layout(&self) -> &FormLayout<RegistrationValues, Violation> {
        &self.layout
    }

    pub fn render(&self) -> FormResult<RenderedForm> {
        render_form(&self.layout, &self.controller)
    }

    /// Registers the patient and opens the appointment page.
    pub async fn submit(&self) -> Result<NavigationIntent, SubmissionError> {
        let actions = Arc::clone(&self.actions);
        let user_id = self.user_id.clone();
        let patient = self
            .controller
            .submit_with(RegistrationValues::parse, move |valid: ValidRegistration| async move {
                let payload = RegistrationPayload {
                    user_id,
                    patient: valid.patient,
                    identification_document: valid.identification_document,
                };
                let patient = actions.register_patient(payload).await?;
                if patient.id.trim().is_empty() {
                    return Err(PersistenceError::EmptyResult);
                }
                Ok::<PatientRef, PersistenceError>(patient)
            })
            .await?;

        let intent = NavigationIntent::new_appointment(&patient);
        tracing::info!(route = %intent, "patient registered");
        self.navigator.navigate_to(intent.path());
        Ok(intent)
    }

    pub fn teardown(&self) -> Result<(), FormError> {
        self.controller.teardown()
    }
}
