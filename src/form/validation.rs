use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::collections::btree_map;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use super::controller::{
    FieldKey, FormController, FormResult, RevalidateMode, SyncFieldValidatorFn,
    SyncFormValidatorFn, ValidationMode, first_error_key, read_lock, write_lock,
};

pub trait ValidationError: Clone + Send + Sync + 'static {
    fn message(&self) -> Cow<'static, str>;
}

/// A single failed rule on one field, shown inline under that field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Violation(Cow<'static, str>);

impl Violation {
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self(message.into())
    }
}

impl ValidationError for Violation {
    fn message(&self) -> Cow<'static, str> {
        self.0.clone()
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Typed access to one field of a form model.
pub trait FieldLens<T>: Copy + Send + Sync + 'static {
    type Value: Clone + PartialEq + Send + Sync + 'static;

    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a Self::Value;
    fn set(self, model: &mut T, value: Self::Value);
}

pub trait FormModel: Clone + Send + Sync + 'static {
    type Fields;

    /// Every key a lens of this model can produce.
    const FIELD_KEYS: &'static [FieldKey];

    fn fields() -> Self::Fields;

    fn has_field(key: FieldKey) -> bool {
        Self::FIELD_KEYS.contains(&key)
    }
}

pub trait FieldValidator<T, L, E>: Send + Sync
where
    L: FieldLens<T>,
    E: ValidationError,
{
    fn validate(&self, model: &T, value: &L::Value) -> Result<(), E>;
}

impl<T, L, E, F> FieldValidator<T, L, E> for F
where
    L: FieldLens<T>,
    E: ValidationError,
    F: for<'a> Fn(&'a T, &'a L::Value) -> Result<(), E> + Send + Sync,
{
    fn validate(&self, model: &T, value: &L::Value) -> Result<(), E> {
        (self)(model, value)
    }
}

pub trait FormValidator<T, E>: Send + Sync
where
    E: ValidationError,
{
    fn validate(&self, model: &T) -> Vec<(FieldKey, E)>;
}

impl<T, E, F> FormValidator<T, E> for F
where
    E: ValidationError,
    F: Fn(&T) -> Vec<(FieldKey, E)> + Send + Sync,
{
    fn validate(&self, model: &T) -> Vec<(FieldKey, E)> {
        (self)(model)
    }
}

/// Per-field messages of a rejected value set, first message per field.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldErrors(BTreeMap<FieldKey, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(key: FieldKey, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(key, message);
        errors
    }

    /// Records `message` unless the field already has one.
    pub fn insert(&mut self, key: FieldKey, message: impl Into<String>) {
        self.0.entry(key).or_insert_with(|| message.into());
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, FieldKey, String> {
        self.0.iter()
    }
}

impl<E: ValidationError> FromIterator<(FieldKey, E)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (FieldKey, E)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (key, error) in iter {
            errors.insert(key, error.message());
        }
        errors
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("invalid fields: ")?;
        for (index, key) in self.0.keys().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            f.write_str(key.as_str())?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Whole-model validation for one kind of form.
///
/// `violations` lists every failed rule; `build` converts an already clean
/// value set into the typed values handed to the persistence layer.
pub trait Schema: FormModel {
    type Valid;

    fn violations(&self) -> Vec<(FieldKey, Violation)>;

    fn build(&self) -> Result<Self::Valid, FieldErrors>;

    fn parse(&self) -> Result<Self::Valid, FieldErrors> {
        let violations = self.violations();
        if !violations.is_empty() {
            return Err(violations.into_iter().collect());
        }
        self.build()
    }
}

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub fn register_field_validator<L, V>(&self, lens: L, validator: V) -> FormResult<()>
    where
        L: FieldLens<T>,
        V: FieldValidator<T, L, E> + 'static,
    {
        let key = lens.key();
        let validator = Arc::new(validator);
        let wrapped: SyncFieldValidatorFn<T, E> =
            Arc::new(move |model: &T| validator.validate(model, lens.get(model)));
        let mut validators = write_lock(&self.field_validators, "registering field validator")?;
        validators.entry(key).or_default().push(wrapped);
        Ok(())
    }

    pub fn register_form_validator<V>(&self, validator: V) -> FormResult<()>
    where
        V: FormValidator<T, E> + 'static,
    {
        let validator = Arc::new(validator);
        let wrapped: SyncFormValidatorFn<T, E> =
            Arc::new(move |model: &T| validator.validate(model));
        let mut validators = write_lock(&self.form_validators, "registering form validator")?;
        validators.push(wrapped);
        Ok(())
    }

    /// Checks the model against its schema on every form validation pass.
    pub fn register_schema(&self) -> FormResult<()>
    where
        T: Schema,
        E: From<Violation>,
    {
        self.register_form_validator(|model: &T| {
            model
                .violations()
                .into_iter()
                .map(|(key, violation)| (key, E::from(violation)))
                .collect::<Vec<_>>()
        })
    }

    pub fn set<L>(&self, lens: L, value: L::Value) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        let submitted = {
            let mut state = write_lock(&self.state, "writing form model")?;
            lens.set(&mut state.model, value);
            let is_dirty = lens.get(&state.model) != lens.get(&state.initial_model);
            if is_dirty {
                state.dirty_fields.insert(key);
            } else {
                state.dirty_fields.remove(&key);
            }
            state.ensure_meta(key).dirty = is_dirty;
            state.submit_count > 0
        };

        if self.options.validate_mode == ValidationMode::OnChange
            || (submitted && self.options.revalidate_mode == RevalidateMode::OnChange)
        {
            let _ = self.validate_field_by_key(key)?;
        }
        Ok(())
    }

    pub fn touch<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        let submitted = {
            let mut state = write_lock(&self.state, "touching field")?;
            state.ensure_meta(key).touched = true;
            state.submit_count > 0
        };

        if self.options.validate_mode == ValidationMode::OnBlur
            || (submitted && self.options.revalidate_mode == RevalidateMode::OnBlur)
        {
            let _ = self.validate_field_by_key(key)?;
        }
        Ok(())
    }

    pub fn validate_field<L>(&self, lens: L) -> FormResult<bool>
    where
        L: FieldLens<T>,
    {
        self.validate_field_by_key(lens.key())
    }

    /// Runs every registered validator and replaces all field errors.
    pub fn validate_form(&self) -> FormResult<bool> {
        let model = self.model()?;
        let mut field_errors = self.collect_errors(&model, None)?;

        let mut state = write_lock(&self.state, "applying form validation result")?;
        let keys = state
            .field_meta
            .keys()
            .chain(field_errors.keys())
            .copied()
            .collect::<BTreeSet<_>>();
        for key in keys {
            state.ensure_meta(key).errors = field_errors.remove(&key).unwrap_or_default();
        }
        state.first_error = first_error_key(&state.field_meta);
        Ok(state.first_error.is_none())
    }

    pub(super) fn validate_field_by_key(&self, key: FieldKey) -> FormResult<bool> {
        let model = self.model()?;
        let errors = self
            .collect_errors(&model, Some(key))?
            .remove(&key)
            .unwrap_or_default();

        let mut state = write_lock(&self.state, "writing field validation result")?;
        let is_valid = errors.is_empty();
        state.ensure_meta(key).errors = errors;
        state.first_error = first_error_key(&state.field_meta);
        Ok(is_valid)
    }

    fn collect_errors(
        &self,
        model: &T,
        only: Option<FieldKey>,
    ) -> FormResult<BTreeMap<FieldKey, Vec<E>>> {
        let field_validators = read_lock(&self.field_validators, "reading field validators")?
            .iter()
            .filter(|(key, _)| only.is_none_or(|only| **key == only))
            .map(|(key, validators)| (*key, validators.clone()))
            .collect::<Vec<_>>();
        let form_validators = read_lock(&self.form_validators, "reading form validators")?.clone();

        let first_only = self.options.validate_first_error_only;
        let mut field_errors = BTreeMap::<FieldKey, Vec<E>>::new();
        let mut push = |key: FieldKey, error: E| {
            let errors = field_errors.entry(key).or_default();
            if !(first_only && !errors.is_empty()) {
                errors.push(error);
            }
        };

        for (key, validators) in field_validators {
            for validator in validators {
                if let Err(error) = validator(model) {
                    push(key, error);
                }
            }
        }
        for validator in form_validators {
            for (key, error) in validator(model) {
                if only.is_none_or(|only| key == only) {
                    push(key, error);
                }
            }
        }
        Ok(field_errors)
    }
}
