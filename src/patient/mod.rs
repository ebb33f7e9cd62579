//! Patient intake and registration forms.

mod actions;
mod constants;
mod intake;
mod navigation;
mod registration;
mod schema;
mod values;


pub use actions::{
    FileAttachment, NewUser, PatientActions, PatientRecord, PatientRef, RegistrationPayload, User,
    UserRef,
};
pub use constants::{
    DEFAULT_IDENTIFICATION_TYPE, IDENTIFICATION_TYPES, PHYSICIANS, Physician,
    identification_type_options, physician_names, physician_options,
};
pub use intake::{IntakeController, IntakeForm, intake_layout};
pub use navigation::{NavigationIntent, Navigator};
pub use registration::{RegistrationController, RegistrationForm, registration_layout};
pub use schema::ValidRegistration;
pub use values::{Gender, IntakeValues, RegistrationValues, UnknownGender};
