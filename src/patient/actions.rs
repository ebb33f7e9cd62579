use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::components::FileUpload;
use crate::form::BoxedActionFuture;

use super::values::Gender;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Contact details collected on the landing page.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
}

/// A stored user as the registration form receives it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PatientRef {
    pub id: String,
}

/// Structured part of a registration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub address: String,
    pub occupation: String,
    pub emergency_contact_name: String,
    pub emergency_contact_number: String,
    pub primary_physician: String,
    pub insurance_provider: String,
    pub insurance_policy_number: String,
    pub allergies: Option<String>,
    pub current_medication: Option<String>,
    pub family_medical_history: Option<String>,
    pub past_medical_history: Option<String>,
    pub identification_type: Option<String>,
    pub identification_number: Option<String>,
    pub treatment_consent: bool,
    pub disclosure_consent: bool,
    pub privacy_consent: bool,
}

/// Identification document sent next to the structured record.
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileAttachment {
    pub fn from_upload(upload: &FileUpload) -> Self {
        Self {
            file_name: upload.name.clone(),
            mime_type: upload
                .mime_type
                .clone()
                .filter(|mime| !mime.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string()),
            bytes: upload.bytes.to_vec(),
        }
    }
}

impl std::fmt::Debug for FileAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAttachment")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RegistrationPayload {
    pub user_id: String,
    #[serde(flatten)]
    pub patient: PatientRecord,
    /// Travels as a binary attachment, not inside the structured body.
    #[serde(skip)]
    pub identification_document: Option<FileAttachment>,
}

/// Backend calls made by the patient forms.
pub trait PatientActions: Send + Sync {
    fn create_user(&self, user: NewUser) -> BoxedActionFuture<'_, UserRef>;

    fn register_patient(&self, payload: RegistrationPayload) -> BoxedActionFuture<'_, PatientRef>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn record() -> PatientRecord {
        PatientRecord {
            name: "Ahmed Mohamed".into(),
            email: "ahmed@example.com".into(),
            phone: "+201234567890".into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 3, 7).expect("valid date"),
            gender: Gender::Female,
            address: "14th Street, Cairo".into(),
            occupation: "Engineer".into(),
            emergency_contact_name: "Mona Ali".into(),
            emergency_contact_number: "+201112223334".into(),
            primary_physician: "John Green".into(),
            insurance_provider: "BlueCross".into(),
            insurance_policy_number: "ABD123456789".into(),
            allergies: Some("Peanuts".into()),
            current_medication: None,
            family_medical_history: None,
            past_medical_history: None,
            identification_type: Some("Passport".into()),
            identification_number: Some("A1234567".into()),
            treatment_consent: true,
            disclosure_consent: true,
            privacy_consent: true,
        }
    }

    #[test]
    fn payload_body_is_flat_and_leaves_out_the_attachment() {
        let payload = RegistrationPayload {
            user_id: "user-1".into(),
            patient: record(),
            identification_document: Some(FileAttachment::from_upload(&FileUpload::new(
                "passport.scan",
                vec![1u8, 2, 3],
            ))),
        };

        let body = serde_json::to_value(&payload).expect("serialize payload");
        let object = body.as_object().expect("payload is an object");
        assert_eq!(object.get("user_id"), Some(&json!("user-1")));
        assert_eq!(object.get("name"), Some(&json!("Ahmed Mohamed")));
        assert_eq!(object.get("birth_date"), Some(&json!("1990-03-07")));
        assert_eq!(object.get("gender"), Some(&json!("Female")));
        assert_eq!(object.get("current_medication"), Some(&Value::Null));
        assert!(!object.contains_key("patient"));
        assert!(!object.contains_key("identification_document"));
        assert!(!body.to_string().contains("passport.scan"));

        let decoded: RegistrationPayload =
            serde_json::from_value(body).expect("deserialize payload");
        assert_eq!(decoded.patient, payload.patient);
        assert_eq!(decoded.identification_document, None);
    }

    #[test]
    fn attachment_keeps_upload_mime_type() {
        let upload = FileUpload::new("id.png", vec![7u8]).mime_type("image/png");
        let attachment = FileAttachment::from_upload(&upload);
        assert_eq!(attachment.mime_type, "image/png");
        assert_eq!(
            format!("{attachment:?}"),
            r#"FileAttachment { file_name: "id.png", mime_type: "image/png", len: 1 }"#
        );
    }
}
