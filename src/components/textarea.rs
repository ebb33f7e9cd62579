use crate::form::BoundField;

use super::ChangeHandler;

/// Multi-line text control used for the long-text field kind.
#[derive(Clone)]
pub struct Textarea {
    value: String,
    placeholder: Option<String>,
    rows: usize,
    disabled: bool,
    on_change: Option<ChangeHandler<String>>,
}

impl Default for Textarea {
    fn default() -> Self {
        Self {
            value: String::new(),
            placeholder: None,
            rows: 4,
            disabled: false,
            on_change: None,
        }
    }
}

impl Textarea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn rows(mut self, rows: usize) -> Self {
        self.rows = rows.max(1);
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

    pub fn placeholder_text(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn input(&self, raw: impl Into<String>) {
        if self.disabled {
            return;
        }
        if let Some(handler) = &self.on_change {
            handler(raw.into());
        }
    }
}
