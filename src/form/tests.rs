use super::*;
use chrono::NaiveDateTime;
use futures::channel::oneshot;
use futures::executor::block_on;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use crate::components::{Control, DEFAULT_DATE_FORMAT, RadioGroup, SelectOption};

#[derive(Clone, Debug, Eq, PartialEq)]
struct TestError(&'static str);

impl ValidationError for TestError {
    fn message(&self) -> std::borrow::Cow<'static, str> {
        self.0.into()
    }
}

#[allow(dead_code)]
#[derive(Clone, Debug, PartialEq, crate::form::FormModel)]
struct ProfileForm {
    email: String,
    password: String,
    confirm_password: String,
    enabled: bool,
    plan: String,
    visit: Option<NaiveDateTime>,
}

fn base_form() -> ProfileForm {
    ProfileForm {
        email: "user@example.com".into(),
        password: "pass".into(),
        confirm_password: "pass".into(),
        enabled: false,
        plan: "basic".into(),
        visit: None,
    }
}

fn required(_model: &ProfileForm, value: &String) -> Result<(), TestError> {
    if value.is_empty() {
        Err(TestError("required"))
    } else {
        Ok(())
    }
}

fn controller_with_required_email(options: FormOptions) -> FormController<ProfileForm, TestError> {
    let controller = FormController::<ProfileForm, TestError>::new(base_form(), options);
    controller
        .register_field_validator(ProfileForm::fields().email(), required)
        .expect("register validator");
    controller
}

fn email_errors(controller: &FormController<ProfileForm, TestError>) -> Vec<TestError> {
    controller
        .field_meta(ProfileForm::fields().email())
        .expect("field meta")
        .map(|meta| meta.errors)
        .unwrap_or_default()
}

#[test]
fn field_lens_updates_model_and_dirty_state() {
    let controller =
        FormController::<ProfileForm, TestError>::new(base_form(), FormOptions::default());
    let fields = ProfileForm::fields();

    controller
        .set(fields.email(), "changed@example.com".into())
        .expect("set must succeed");
    let snapshot = controller.snapshot().expect("snapshot must succeed");
    assert!(snapshot.is_dirty);
    assert_eq!(snapshot.model.email, "changed@example.com");

    let email_meta = snapshot
        .field_meta
        .get(&fields.email().key())
        .expect("email meta should exist");
    assert!(email_meta.dirty);

    controller
        .set(fields.email(), "user@example.com".into())
        .expect("set back to initial");
    assert!(!controller.snapshot().expect("snapshot").is_dirty);
}

#[test]
fn derive_lists_every_field_key() {
    let keys = ProfileForm::FIELD_KEYS
        .iter()
        .map(|key| key.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        keys,
        vec!["email", "password", "confirm_password", "enabled", "plan", "visit"]
    );
    assert!(ProfileForm::has_field(FieldKey::new("plan")));
    assert!(!ProfileForm::has_field(FieldKey::new("nickname")));
}

#[test]
fn validation_mode_controls_when_errors_appear() {
    let fields = ProfileForm::fields();
    let on_change = controller_with_required_email(FormOptions {
        validate_mode: ValidationMode::OnChange,
        ..FormOptions::default()
    });
    on_change
        .set(fields.email(), "".into())
        .expect("set should trigger validation");
    assert_eq!(email_errors(&on_change), vec![TestError("required")]);

    let on_submit = controller_with_required_email(FormOptions::default());
    on_submit
        .set(fields.email(), "".into())
        .expect("set should not trigger validation immediately");
    assert!(email_errors(&on_submit).is_empty());
    assert!(!on_submit.validate_form().expect("validate form"));
    assert_eq!(
        on_submit.first_error().expect("first error"),
        Some(fields.email().key())
    );
}

#[test]
fn edited_and_touched_fields_keep_errors_from_form_validation() {
    let fields = ProfileForm::fields();
    let controller = controller_with_required_email(FormOptions::default());
    controller.set(fields.email(), "".into()).expect("clear email");
    controller.touch(fields.email()).expect("touch email");

    assert!(!controller.validate_form().expect("validate form"));
    assert_eq!(email_errors(&controller), vec![TestError("required")]);
    assert_eq!(
        controller
            .field_error_for_display(fields.email().key())
            .expect("display error"),
        Some("required".to_string())
    );
}

#[test]
fn changes_revalidate_after_first_submit() {
    let fields = ProfileForm::fields();
    let controller = controller_with_required_email(FormOptions::default());
    controller.set(fields.email(), "".into()).expect("clear email");

    let result = block_on(controller.submit_with(|model| Ok(model.clone()), |_| async {
        Ok::<(), PersistenceError>(())
    }));
    assert!(matches!(result, Err(SubmissionError::Invalid(_))));
    assert_eq!(email_errors(&controller), vec![TestError("required")]);

    controller
        .set(fields.email(), "fixed@example.com".into())
        .expect("fix email");
    assert!(email_errors(&controller).is_empty());
}

#[test]
fn form_validators_attach_errors_to_fields() {
    let fields = ProfileForm::fields();
    let controller =
        FormController::<ProfileForm, TestError>::new(base_form(), FormOptions::default());
    controller
        .register_form_validator(move |model: &ProfileForm| {
            if model.password != model.confirm_password {
                vec![(fields.confirm_password().key(), TestError("password mismatch"))]
            } else {
                Vec::new()
            }
        })
        .expect("register form validator");

    controller
        .set(fields.password(), "new-pass".into())
        .expect("set password");
    assert!(!controller.validate_form().expect("validate"));
    assert_eq!(
        controller
            .field_meta(fields.confirm_password())
            .expect("meta")
            .expect("confirm meta")
            .errors,
        vec![TestError("password mismatch")]
    );
}

#[test]
fn errors_display_only_after_touch_or_submit() {
    let fields = ProfileForm::fields();
    let controller = controller_with_required_email(FormOptions::default());
    controller.set(fields.email(), "".into()).expect("clear email");
    controller.validate_form().expect("validate");

    assert_eq!(
        controller
            .field_error_for_display(fields.email().key())
            .expect("display error"),
        None
    );
    controller.touch(fields.email()).expect("touch");
    assert_eq!(
        controller
            .field_error_for_display(fields.email().key())
            .expect("display error")
            .as_deref(),
        Some("required")
    );
}

#[test]
fn submit_state_transitions_are_enforced() {
    let fields = ProfileForm::fields();
    let controller = controller_with_required_email(FormOptions::default());
    let calls = Arc::new(AtomicUsize::new(0));

    controller.set(fields.email(), "".into()).expect("set invalid email");
    let invalid = {
        let calls = calls.clone();
        block_on(controller.submit_with(|model| Ok(model.email.clone()), move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<(), PersistenceError>(()) }
        }))
    };
    assert_eq!(
        invalid,
        Err(SubmissionError::Invalid(FieldErrors::single(
            fields.email().key(),
            "required"
        )))
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    let snapshot = controller.snapshot().expect("snapshot");
    assert_eq!(snapshot.submit_state, SubmitState::Idle);
    assert_eq!(snapshot.submit_count, 1);

    controller
        .set(fields.email(), "valid@example.com".into())
        .expect("set valid email");
    let sent = {
        let calls = calls.clone();
        block_on(controller.submit_with(|model| Ok(model.email.clone()), move |email| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<String, PersistenceError>(email) }
        }))
    };
    assert_eq!(sent, Ok("valid@example.com".to_string()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        controller.submit_state().expect("state"),
        SubmitState::NavigatingAway
    );

    let again = block_on(controller.submit_with(|_| Ok(()), |_| async {
        Ok::<(), PersistenceError>(())
    }));
    assert_eq!(again, Err(SubmissionError::AlreadySubmitting));
}

#[test]
fn prepare_errors_block_the_action() {
    let controller =
        FormController::<ProfileForm, TestError>::new(base_form(), FormOptions::default());
    let key = ProfileForm::fields().visit().key();
    let result = block_on(controller.submit_with(
        |model: &ProfileForm| {
            model
                .visit
                .ok_or_else(|| FieldErrors::single(key, "visit time is required"))
        },
        |_| async { Ok::<(), PersistenceError>(()) },
    ));
    assert_eq!(
        result,
        Err(SubmissionError::Invalid(FieldErrors::single(
            key,
            "visit time is required"
        )))
    );
    assert_eq!(controller.submit_state().expect("state"), SubmitState::Idle);
}

#[test]
fn concurrent_submit_is_rejected_while_pending() {
    let controller =
        FormController::<ProfileForm, TestError>::new(base_form(), FormOptions::default());
    let (release, gate) = oneshot::channel::<()>();
    let calls = Arc::new(AtomicUsize::new(0));

    let pending = {
        let controller = controller.clone();
        let calls = calls.clone();
        thread::spawn(move || {
            block_on(controller.submit_with(|_| Ok(()), move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    gate.await
                        .map_err(|_| PersistenceError::Network("gate closed".into()))
                }
            }))
        })
    };

    for _ in 0..1_000 {
        if controller.is_loading().expect("loading flag") {
            break;
        }
        thread::sleep(Duration::from_millis(2));
    }
    assert!(controller.is_loading().expect("loading flag"));
    assert!(controller.is_submitting().expect("submitting flag"));

    let second = block_on(controller.submit_with(|_| Ok(()), |_| async {
        Ok::<(), PersistenceError>(())
    }));
    assert_eq!(second, Err(SubmissionError::AlreadySubmitting));

    release.send(()).expect("release pending call");
    assert_eq!(pending.join().expect("submit thread joins"), Ok(()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!controller.is_loading().expect("loading flag"));
}

#[test]
fn persistence_failure_is_kept_as_last_error() {
    let controller =
        FormController::<ProfileForm, TestError>::new(base_form(), FormOptions::default());
    let result = block_on(controller.submit_with(|_| Ok(()), |_| async {
        Err::<(), _>(PersistenceError::Rejected("duplicate email".into()))
    }));
    let expected = SubmissionError::Persistence(PersistenceError::Rejected(
        "duplicate email".into(),
    ));
    assert_eq!(result, Err(expected.clone()));
    assert_eq!(controller.last_error().expect("last error"), Some(expected));

    controller.dismiss_error().expect("dismiss");
    assert_eq!(controller.last_error().expect("last error"), None);
}

#[test]
fn teardown_before_submit_refuses_later_submissions() {
    let controller =
        FormController::<ProfileForm, TestError>::new(base_form(), FormOptions::default());
    controller.teardown().expect("teardown");
    assert_eq!(controller.submit_state().expect("state"), SubmitState::Idle);

    let calls = AtomicUsize::new(0);
    let result = block_on(controller.submit_with(|model| Ok(model.clone()), |_| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok::<(), PersistenceError>(()) }
    }));
    assert_eq!(result, Err(SubmissionError::Abandoned));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(controller.snapshot().expect("snapshot").submit_count, 0);
}

#[test]
fn teardown_while_validating_skips_the_action() {
    let controller =
        FormController::<ProfileForm, TestError>::new(base_form(), FormOptions::default());
    let calls = AtomicUsize::new(0);
    let result = block_on(controller.submit_with(
        |model| {
            controller.teardown().expect("teardown during validation");
            Ok(model.clone())
        },
        |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<(), PersistenceError>(()) }
        },
    ));
    assert_eq!(result, Err(SubmissionError::Abandoned));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(controller.submit_state().expect("state"), SubmitState::Idle);
}

#[test]
fn reset_restores_initial_values_and_meta() {
    let fields = ProfileForm::fields();
    let controller = controller_with_required_email(FormOptions::default());
    controller.set(fields.email(), "".into()).expect("clear email");
    controller.touch(fields.email()).expect("touch");
    controller.validate_form().expect("validate");

    controller.reset_to_initial().expect("reset");

    let snapshot = controller.snapshot().expect("snapshot");
    assert_eq!(snapshot.model, base_form());
    assert!(!snapshot.is_dirty);
    assert!(snapshot.is_valid);
    assert_eq!(snapshot.submit_count, 0);
}

#[test]
fn bound_field_writes_from_another_thread() {
    let controller =
        FormController::<ProfileForm, TestError>::new(base_form(), FormOptions::default());
    let field = controller
        .bound(ProfileForm::fields().enabled())
        .expect("bind");
    assert!(!*field.value());

    thread::spawn(move || field.on_change(true))
        .join()
        .expect("writer joins");
    assert!(controller.model().expect("model").enabled);
}

#[test]
fn render_field_builds_typed_controls() {
    let fields = ProfileForm::fields();
    let controller =
        FormController::<ProfileForm, TestError>::new(base_form(), FormOptions::default());

    let date = render_field(
        &FieldDescriptor::date(fields.visit()).label("Visit"),
        &controller,
    )
    .expect("render date");
    let picker = date.control().as_date().expect("date picker");
    assert_eq!(picker.format(), DEFAULT_DATE_FORMAT);
    assert!(!picker.has_time_select());
    assert_eq!(date.label(), Some("Visit"));
    assert_eq!(date.error_message(), "");

    let plan = render_field(
        &FieldDescriptor::select(fields.plan())
            .options([SelectOption::plain("basic"), SelectOption::plain("premium")]),
        &controller,
    )
    .expect("render select");
    let select = plan.control().as_select().expect("select");
    assert_eq!(select.option_list().len(), 2);
    assert!(select.select("premium"));
    assert_eq!(controller.model().expect("model").plan, "premium");
}

fn plan_radio(field: BoundField<String>, disabled: bool) -> Control {
    Control::Radio(
        RadioGroup::new()
            .choices(["basic", "premium"])
            .bind(field)
            .disabled(disabled),
    )
}

#[test]
fn custom_renderer_supplies_the_control() {
    let fields = ProfileForm::fields();
    let controller =
        FormController::<ProfileForm, TestError>::new(base_form(), FormOptions::default());
    let descriptor = FieldDescriptor::custom(fields.plan(), plan_radio).label("Plan");
    assert_eq!(descriptor.kind(), FieldKind::CustomRender);

    let item = render_field(&descriptor, &controller).expect("render custom");
    let radio = item.control().as_radio().expect("radio control");
    assert_eq!(radio.current_value(), "basic");
    assert!(!radio.is_disabled());
    assert!(radio.choose("premium"));

    let model = controller.model().expect("model");
    assert_eq!(model.plan, "premium");
    assert_eq!(model, ProfileForm { plan: "premium".into(), ..base_form() });
}

#[test]
fn custom_renderer_only_receives_its_own_field() {
    let fields = ProfileForm::fields();
    let controller =
        FormController::<ProfileForm, TestError>::new(base_form(), FormOptions::default());
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let descriptor = FieldDescriptor::custom(fields.plan(), move |field, disabled| {
        sink.lock().expect("lock").push((field.key(), field.value().clone()));
        plan_radio(field, disabled)
    });

    render_field(&descriptor, &controller).expect("render custom");
    assert_eq!(
        *seen.lock().expect("lock"),
        vec![(FieldKey::new("plan"), "basic".to_string())]
    );
}

#[test]
fn try_map_drops_values_without_a_model_counterpart() {
    let fields = ProfileForm::fields();
    let controller =
        FormController::<ProfileForm, TestError>::new(base_form(), FormOptions::default());
    let field = controller.bound(fields.plan()).expect("bind plan").try_map(
        |plan| plan.len(),
        |length: usize| match length {
            5 => Some("basic".to_string()),
            7 => Some("premium".to_string()),
            _ => None,
        },
    );
    assert_eq!(*field.value(), 5);

    field.on_change(3);
    assert_eq!(controller.model().expect("model").plan, "basic");
    assert!(!controller.snapshot().expect("snapshot").is_dirty);

    field.on_change(7);
    assert_eq!(controller.model().expect("model").plan, "premium");
}

#[test]
fn field_errors_display_lists_keys() {
    let mut errors = FieldErrors::new();
    errors.insert(FieldKey::new("phone"), "Invalid phone number");
    errors.insert(FieldKey::new("name"), "Name must be at least 2 characters");
    errors.insert(FieldKey::new("name"), "second message is ignored");
    assert_eq!(errors.to_string(), "invalid fields: name, phone");
    assert_eq!(
        errors.get(FieldKey::new("name")),
        Some("Name must be at least 2 characters")
    );
}
