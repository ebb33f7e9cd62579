use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures::future::{self, AbortHandle, Abortable, Either};
use futures_timer::Delay;

use super::controller::{
    FormController, FormError, SubmitState, read_lock, transition_submit_state, write_lock,
};
use super::validation::{FieldErrors, ValidationError};

pub type BoxedActionFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, PersistenceError>> + Send + 'a>>;

/// Failure reported by the persistence layer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PersistenceError {
    Network(String),
    Rejected(String),
    Constraint(String),
    Timeout(Duration),
    /// The call succeeded but returned no record.
    EmptyResult,
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceError::Network(message) => write!(f, "network error: {message}"),
            PersistenceError::Rejected(message) => write!(f, "request rejected: {message}"),
            PersistenceError::Constraint(message) => {
                write!(f, "constraint violated: {message}")
            }
            PersistenceError::Timeout(limit) => {
                write!(f, "no response within {} ms", limit.as_millis())
            }
            PersistenceError::EmptyResult => f.write_str("the server returned no record"),
        }
    }
}

impl std::error::Error for PersistenceError {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmissionError {
    /// Values failed validation; nothing was sent.
    Invalid(FieldErrors),
    /// Another submission of the same form is still pending.
    AlreadySubmitting,
    Persistence(PersistenceError),
    /// The form was torn down while the call was pending.
    Abandoned,
    Form(FormError),
}

impl Display for SubmissionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionError::Invalid(errors) => write!(f, "{errors}"),
            SubmissionError::AlreadySubmitting => {
                f.write_str("a submission is already in progress")
            }
            SubmissionError::Persistence(error) => write!(f, "{error}"),
            SubmissionError::Abandoned => f.write_str("submission abandoned"),
            SubmissionError::Form(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for SubmissionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubmissionError::Invalid(errors) => Some(errors),
            SubmissionError::Persistence(error) => Some(error),
            SubmissionError::Form(error) => Some(error),
            SubmissionError::AlreadySubmitting | SubmissionError::Abandoned => None,
        }
    }
}

impl From<FormError> for SubmissionError {
    fn from(error: FormError) -> Self {
        SubmissionError::Form(error)
    }
}

impl From<PersistenceError> for SubmissionError {
    fn from(error: PersistenceError) -> Self {
        SubmissionError::Persistence(error)
    }
}

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    /// Validates the form, converts the values with `prepare` and runs
    /// `action` once.
    ///
    /// The call runs under [`FormOptions::submit_timeout`](super::FormOptions)
    /// and can be cancelled with [`teardown`](Self::teardown). On success the
    /// form is left in [`SubmitState::NavigatingAway`]; on any failure it is
    /// back to [`SubmitState::Idle`] with the model untouched.
    pub async fn submit_with<P, R, Prepare, Action, Fut>(
        &self,
        prepare: Prepare,
        action: Action,
    ) -> Result<R, SubmissionError>
    where
        Prepare: FnOnce(&T) -> Result<P, FieldErrors>,
        Action: FnOnce(P) -> Fut,
        Fut: Future<Output = Result<R, PersistenceError>>,
    {
        let form = {
            let mut state = write_lock(&self.state, "starting submission")?;
            if state.torn_down {
                return Err(SubmissionError::Abandoned);
            }
            if state.submit_state != SubmitState::Idle {
                tracing::debug!(form = %state.id, "submit ignored while another is pending");
                return Err(SubmissionError::AlreadySubmitting);
            }
            transition_submit_state(&mut state, SubmitState::Validating)?;
            state.submit_count = state.submit_count.saturating_add(1);
            state.last_error = None;
            state.id
        };

        let payload = match self.validate_and_prepare(prepare) {
            Ok(payload) => payload,
            Err(error) => {
                self.return_to_idle(None)?;
                if let SubmissionError::Invalid(errors) = &error {
                    tracing::debug!(%form, fields = %errors, "submission blocked by validation");
                }
                return Err(error);
            }
        };

        let (handle, registration) = AbortHandle::new_pair();
        {
            let mut state = write_lock(&self.state, "entering submitting state")?;
            if state.torn_down {
                transition_submit_state(&mut state, SubmitState::Idle)?;
                tracing::debug!(%form, "form torn down before the action started");
                return Err(SubmissionError::Abandoned);
            }
            transition_submit_state(&mut state, SubmitState::Submitting)?;
            state.in_flight = Some(handle);
        }

        let call = Abortable::new(action(payload), registration);
        let outcome = match self.options.submit_timeout {
            Some(limit) => {
                match future::select(Box::pin(call), Delay::new(limit)).await {
                    Either::Left((outcome, _)) => outcome,
                    Either::Right(((), _)) => Ok(Err(PersistenceError::Timeout(limit))),
                }
            }
            None => call.await,
        };

        match outcome {
            Ok(Ok(result)) => {
                let mut state = write_lock(&self.state, "finishing submission")?;
                state.in_flight = None;
                transition_submit_state(&mut state, SubmitState::NavigatingAway)?;
                tracing::info!(%form, "submission accepted");
                Ok(result)
            }
            Ok(Err(error)) => {
                tracing::warn!(%form, %error, "submission failed");
                let error = SubmissionError::Persistence(error);
                self.return_to_idle(Some(error.clone()))?;
                Err(error)
            }
            Err(_aborted) => {
                tracing::warn!(%form, "submission abandoned");
                self.return_to_idle(None)?;
                Err(SubmissionError::Abandoned)
            }
        }
    }

    /// Cancels a pending submission and refuses later ones. A discarded call
    /// returns [`SubmissionError::Abandoned`], as does a submission still
    /// validating when the form goes away.
    pub fn teardown(&self) -> Result<(), FormError> {
        let handle = {
            let mut state = write_lock(&self.state, "tearing down form")?;
            state.torn_down = true;
            state.in_flight.take()
        };
        if let Some(handle) = handle {
            tracing::debug!("aborting in-flight submission");
            handle.abort();
        }
        Ok(())
    }

    /// True while a submission of this form is validating or pending.
    pub fn is_submitting(&self) -> Result<bool, FormError> {
        let state = read_lock(&self.state, "reading submission flag")?;
        Ok(matches!(
            state.submit_state,
            SubmitState::Validating | SubmitState::Submitting
        ))
    }

    fn validate_and_prepare<P, Prepare>(&self, prepare: Prepare) -> Result<P, SubmissionError>
    where
        Prepare: FnOnce(&T) -> Result<P, FieldErrors>,
    {
        if !self.validate_form()? {
            let state = read_lock(&self.state, "collecting field errors")?;
            let errors = state
                .field_meta
                .iter()
                .filter_map(|(key, meta)| meta.errors.first().map(|error| (*key, error.clone())))
                .collect::<FieldErrors>();
            return Err(SubmissionError::Invalid(errors));
        }
        let model = self.model()?;
        prepare(&model).map_err(SubmissionError::Invalid)
    }

    fn return_to_idle(&self, error: Option<SubmissionError>) -> Result<(), FormError> {
        let mut state = write_lock(&self.state, "returning to idle")?;
        state.in_flight = None;
        transition_submit_state(&mut state, SubmitState::Idle)?;
        if error.is_some() {
            state.last_error = error;
        }
        Ok(())
    }
}
