use crate::form::BoundField;

use super::ChangeHandler;

/// Horizontal group of mutually exclusive choices.
#[derive(Clone, Default)]
pub struct RadioGroup {
    value: String,
    choices: Vec<String>,
    disabled: bool,
    on_change: Option<ChangeHandler<String>>,
}

impl RadioGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn on_change(mut self, handler: impl Fn(String) + Send + Sync + 'static) -> Self {
        self.on_change = Some(std::sync::Arc::new(handler));
        self
    }

    pub fn bind(self, field: BoundField<String>) -> Self {
        let value = field.value().clone();
        self.value(value).on_change(move |next| field.on_change(next))
    }

    pub fn current_value(&self) -> &str {
        &self.value
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn choice_list(&self) -> &[String] {
        &self.choices
    }

    pub fn choose(&self, choice: &str) -> bool {
        if self.disabled || !self.choices.iter().any(|known| known == choice) {
            return false;
        }
        if let Some(handler) = &self.on_change {
            handler(choice.to_string());
        }
        true
    }
}
