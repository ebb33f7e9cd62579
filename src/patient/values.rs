use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::components::FileUpload;
use crate::form::FormModel;

use super::actions::User;
use super::constants::DEFAULT_IDENTIFICATION_TYPE;

/// Landing-page form: who is booking.
#[derive(Clone, Debug, Default, Eq, PartialEq, FormModel)]
pub struct IntakeValues {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub const fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownGender(pub String);

impl Display for UnknownGender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown gender `{}`", self.0)
    }
}

impl std::error::Error for UnknownGender {}

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|gender| gender.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownGender(value.to_string()))
    }
}

/// Full registration form.
#[derive(Clone, Debug, PartialEq, FormModel)]
pub struct RegistrationValues {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: Option<NaiveDateTime>,
    pub gender: Gender,
    pub address: String,
    pub occupation: String,
    pub emergency_contact_name: String,
    pub emergency_contact_number: String,
    pub primary_physician: String,
    pub insurance_provider: String,
    pub insurance_policy_number: String,
    pub allergies: String,
    pub current_medication: String,
    pub family_medical_history: String,
    pub past_medical_history: String,
    pub identification_type: String,
    pub identification_number: String,
    pub identification_document: Vec<FileUpload>,
    pub treatment_consent: bool,
    pub disclosure_consent: bool,
    pub privacy_consent: bool,
}

impl Default for RegistrationValues {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            birth_date: None,
            gender: Gender::default(),
            address: String::new(),
            occupation: String::new(),
            emergency_contact_name: String::new(),
            emergency_contact_number: String::new(),
            primary_physician: String::new(),
            insurance_provider: String::new(),
            insurance_policy_number: String::new(),
            allergies: String::new(),
            current_medication: String::new(),
            family_medical_history: String::new(),
            past_medical_history: String::new(),
            identification_type: DEFAULT_IDENTIFICATION_TYPE.to_string(),
            identification_number: String::new(),
            identification_document: Vec::new(),
            treatment_consent: false,
            disclosure_consent: false,
            privacy_consent: false,
        }
    }
}

impl RegistrationValues {
    /// Defaults with the contact details the user gave on the landing page.
    pub fn for_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            ..Self::default()
        }
    }
}
