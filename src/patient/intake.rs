use std::sync::Arc;

use crate::form::{
    FieldDescriptor, FormController, FormError, FormLayout, FormModel, FormOptions, FormResult,
    FormSection, PersistenceError, RenderedForm, Schema, SubmissionError, Violation, render_form,
};
use crate::icon;
use crate::phone::PhoneDefaults;

use super::actions::{NewUser, PatientActions, UserRef};
use super::navigation::{NavigationIntent, Navigator};
use super::values::IntakeValues;

pub type IntakeController = FormController<IntakeValues, Violation>;

pub fn intake_layout() -> Result<FormLayout<IntakeValues, Violation>, FormError> {
    let fields = IntakeValues::fields();
    let section = FormSection::untitled()
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
        );
    Ok(FormLayout::new(vec![section])?
        .heading("Hi there 👋")
        .subheading("Schedule your first appointment.")
        .submit_label("Get Started"))
}

/// Landing-page form creating the user record.
pub struct IntakeForm {
    controller: IntakeController,
    layout: FormLayout<IntakeValues, Violation>,
    actions: Arc<dyn PatientActions>,
    navigator: Arc<dyn Navigator>,
}

impl IntakeForm {
    pub fn new(
        actions: Arc<dyn PatientActions>,
        navigator: Arc<dyn Navigator>,
    ) -> FormResult<Self> {
        Self::with_options(actions, navigator, FormOptions::default(), PhoneDefaults::default())
    }

    pub fn with_options(
        actions: Arc<dyn PatientActions>,
        navigator: Arc<dyn Navigator>,
        options: FormOptions,
        phone: PhoneDefaults,
    ) -> FormResult<Self> {
        let controller = IntakeController::new(IntakeValues::default(), options);
        controller.register_schema()?;
        Ok(Self {
            controller,
            layout: intake_layout()?.phone_defaults(phone),
            actions,
            navigator,
        })
    }

    pub fn controller(&self) -> &IntakeController {
        &self.controller
    }

    pub fn layout(&self) -> &FormLayout<IntakeValues, Violation> {
        &self.layout
    }

    pub fn render(&self) -> FormResult<RenderedForm> {
        render_form(&self.layout, &self.controller)
    }

    /// Creates the user and sends them on to the registration page.
    pub async fn submit(&self) -> Result<NavigationIntent, SubmissionError> {
        let actions = Arc::clone(&self.actions);
        let user = self
            .controller
            .submit_with(IntakeValues::parse, move |new_user: NewUser| async move {
                let user = actions.create_user(new_user).await?;
                if user.id.trim().is_empty() {
                    return Err(PersistenceError::EmptyResult);
                }
                Ok::<UserRef, PersistenceError>(user)
            })
            .await?;

        let intent = NavigationIntent::patient_registration(&user);
        tracing::info!(route = %intent, "user created");
        self.navigator.navigate_to(intent.path());
        Ok(intent)
    }

    /// Abandons a pending submission, e.g. when the page goes away.
    pub fn teardown(&self) -> Result<(), FormError> {
        self.controller.teardown()
    }
}
