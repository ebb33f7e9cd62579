use std::fmt::{Display, Formatter};

use super::actions::{PatientRef, UserRef};

/// Route a successful submission leads to.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct NavigationIntent {
    path: String,
}

impl NavigationIntent {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Registration page for a freshly created user.
    pub fn patient_registration(user: &UserRef) -> Self {
        Self::new(format!("/patients/{}/register", user.id))
    }

    /// Appointment page for a registered patient.
    pub fn new_appointment(patient: &PatientRef) -> Self {
        Self::new(format!("/patients/{}/new-appointment", patient.id))
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Display for NavigationIntent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}

pub trait Navigator: Send + Sync {
    fn navigate_to(&self, path: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate_to(&self, path: &str) {
        (self)(path)
    }
}
