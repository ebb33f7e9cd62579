pub mod components;
pub mod form;
pub mod icon;
pub mod patient;
pub mod phone;

pub use form::{FormController, FormLayout, SubmissionError};
pub use patient::{IntakeForm, RegistrationForm};
