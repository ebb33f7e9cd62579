use crate::form::BoundField;
use crate::icon::IconRef;

use super::ChangeHandler;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub icon: Option<IconRef>,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            icon: None,
        }
    }

    /// Option whose label is its value.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
            icon: None,
        }
    }

    pub fn icon(mut self, icon: IconRef) -> Self {
        self.icon = Some(icon);
        self
    }
}

/// Drop-down over a fixed option list. Only listed values can be chosen.
#[derive(Clone, Default)]
pub struct Select {
    value: String,
    placeholder: Option<String>,
    options: Vec<SelectOption>,
    disabled: bool,
    on_change: Option<ChangeHandler<String>>,
}

impl Select {
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

    pub fn options(mut self, options: impl IntoIterator<Item = SelectOption>) -> Self {
        self.options = options.into_iter().collect();
        self
    }

    pub fn option(mut self, option: SelectOption) -> Self {
        self.options.push(option);
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

    pub fn option_list(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn selected_option(&self) -> Option<&SelectOption> {
        self.options.iter().find(|option| option.value == self.value)
    }

    /// Chooses `value`. Returns `false` and leaves the form untouched when the
    /// value is not one of the options or the control is disabled.
    pub fn select(&self, value: &str) -> bool {
        if self.disabled || !self.options.iter().any(|option| option.value == value) {
            return false;
        }
        if let Some(handler) = &self.on_change {
            handler(value.to_string());
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn unknown_values_are_rejected() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let select = Select::new()
            .options(["Passport", "Student ID Card"].map(SelectOption::plain))
            .on_change(move |value| sink.lock().expect("lock").push(value));

        assert!(select.select("Passport"));
        assert!(!select.select("Library Card"));
        assert_eq!(*seen.lock().expect("lock"), vec!["Passport".to_string()]);
    }

    #[test]
    fn selected_option_tracks_value() {
        let select = Select::new()
            .option(SelectOption::new("dr-green", "John Green"))
            .value("dr-green");
        assert_eq!(
            select.selected_option().map(|option| option.label.as_str()),
            Some("John Green")
        );
    }
}
