use crate::form::rules::{self, RuleResult};
use crate::form::{FieldErrors, FieldKey, FieldLens, FormModel, Schema, Violation};

use super::actions::{FileAttachment, NewUser, PatientRecord};
use super::constants::{IDENTIFICATION_TYPES, physician_names};
use super::values::{IntakeValues, RegistrationValues};

const MAX_NOTES_LEN: usize = 500;

#[derive(Default)]
struct Violations(Vec<(FieldKey, Violation)>);

impl Violations {
    fn check(&mut self, key: FieldKey, result: RuleResult) {
        if let Err(violation) = result {
            self.0.push((key, violation));
        }
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl Schema for IntakeValues {
    type Valid = NewUser;

    fn violations(&self) -> Vec<(FieldKey, Violation)> {
        let fields = Self::fields();
        let mut found = Violations::default();
        found.check(fields.name().key(), rules::length(&self.name, 2, 50, "Name"));
        found.check(fields.email().key(), rules::email(&self.email));
        found.check(fields.phone().key(), rules::international_phone(&self.phone));
        found.0
    }

    fn build(&self) -> Result<NewUser, FieldErrors> {
        Ok(NewUser {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.clone(),
        })
    }
}

/// Checked registration: the record plus the optional document upload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidRegistration {
    pub patient: PatientRecord,
    pub identification_document: Option<FileAttachment>,
}

impl Schema for RegistrationValues {
    type Valid = ValidRegistration;

    fn violations(&self) -> Vec<(FieldKey, Violation)> {
        let fields = Self::fields();
        let mut found = Violations::default();

        found.check(fields.name().key(), rules::length(&self.name, 2, 50, "Name"));
        found.check(fields.email().key(), rules::email(&self.email));
        found.check(fields.phone().key(), rules::international_phone(&self.phone));
        if self.birth_date.is_none() {
            found.check(
                fields.birth_date().key(),
                Err(Violation::new("Date of birth is required")),
            );
        }
        found.check(
            fields.address().key(),
            rules::length(&self.address, 5, 500, "Address"),
        );
        found.check(
            fields.occupation().key(),
            rules::length(&self.occupation, 2, 500, "Occupation"),
        );
        found.check(
            fields.emergency_contact_name().key(),
            rules::length(&self.emergency_contact_name, 2, 50, "Contact name"),
        );
        found.check(
            fields.emergency_contact_number().key(),
            rules::international_phone(&self.emergency_contact_number),
        );
        found.check(
            fields.primary_physician().key(),
            rules::one_of(
                &self.primary_physician,
                &physician_names(),
                "Select at least one doctor",
            ),
        );
        found.check(
            fields.insurance_provider().key(),
            rules::length(&self.insurance_provider, 2, 50, "Insurance name"),
        );
        found.check(
            fields.insurance_policy_number().key(),
            rules::length(&self.insurance_policy_number, 2, 50, "Policy number"),
        );

        for (key, notes) in [
            (fields.allergies().key(), &self.allergies),
            (fields.current_medication().key(), &self.current_medication),
            (fields.family_medical_history().key(), &self.family_medical_history),
            (fields.past_medical_history().key(), &self.past_medical_history),
        ] {
            found.check(
                key,
                rules::optional_length(
                    notes,
                    MAX_NOTES_LEN,
                    "Must be at most 500 characters",
                ),
            );
        }
        if !self.identification_type.is_empty() {
            found.check(
                fields.identification_type().key(),
                rules::one_of(
                    &self.identification_type,
                    &IDENTIFICATION_TYPES,
                    "Select a valid identification type",
                ),
            );
        }

        found.check(
            fields.treatment_consent().key(),
            rules::accepted(
                self.treatment_consent,
                "You must consent to treatment in order to proceed",
            ),
        );
        found.check(
            fields.disclosure_consent().key(),
            rules::accepted(
                self.disclosure_consent,
                "You must consent to disclosure in order to proceed",
            ),
        );
        found.check(
            fields.privacy_consent().key(),
            rules::accepted(
                self.privacy_consent,
                "You must consent to privacy in order to proceed",
            ),
        );
        found.0
    }

    fn build(&self) -> Result<ValidRegistration, FieldErrors> {
        let birth_date = self.birth_date.ok_or_else(|| {
            FieldErrors::single(
                Self::fields().birth_date().key(),
                "Date of birth is required",
            )
        })?;

        let patient = PatientRecord {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.clone(),
            birth_date: birth_date.date(),
            gender: self.gender,
            address: self.address.trim().to_string(),
            occupation: self.occupation.trim().to_string(),
            emergency_contact_name: self.emergency_contact_name.trim().to_string(),
            emergency_contact_number: self.emergency_contact_number.clone(),
            primary_physician: self.primary_physician.clone(),
            insurance_provider: self.insurance_provider.trim().to_string(),
            insurance_policy_number: self.insurance_policy_number.trim().to_string(),
            allergies: optional(&self.allergies),
            current_medication: optional(&self.current_medication),
            family_medical_history: optional(&self.family_medical_history),
            past_medical_history: optional(&self.past_medical_history),
            identification_type: optional(&self.identification_type),
            identification_number: optional(&self.identification_number),
            treatment_consent: self.treatment_consent,
            disclosure_consent: self.disclosure_consent,
            privacy_consent: self.privacy_consent,
        };

        Ok(ValidRegistration {
            patient,
            identification_document: self
                .identification_document
                .first()
                .map(FileAttachment::from_upload),
        })
    }
}
