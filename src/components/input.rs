use crate::form::BoundField;
use crate::icon::IconRef;
use crate::phone::{self, Region};

use super::ChangeHandler;

/// Single-line text control. Keystrokes are forwarded uninterpreted.
#[derive(Clone, Default)]
pub struct TextInput {
    value: String,
    placeholder: Option<String>,
    icon: Option<IconRef>,
    disabled: bool,
    on_change: Option<ChangeHandler<String>>,
}

impl TextInput {
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

    /// Leading icon painted inside the control.
    pub fn icon(mut self, icon: IconRef) -> Self {
        self.icon = Some(icon);
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

    pub fn icon_ref(&self) -> Option<&IconRef> {
        self.icon.as_ref()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
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

/// International phone control.
///
/// Input is normalized to E.164 using the default region; text that cannot be
/// read as a number is forwarded trimmed so validation can report it.
#[derive(Clone, Default)]
pub struct PhoneInput {
    value: String,
    placeholder: Option<String>,
    region: Region,
    disabled: bool,
    on_change: Option<ChangeHandler<String>>,
}

impl PhoneInput {
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

    pub fn default_region(mut self, region: Region) -> Self {
        self.region = region;
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

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn input(&self, raw: &str) {
        if self.disabled {
            return;
        }
        let Some(handler) = &self.on_change else {
            return;
        };
        let next = phone::normalize(raw, self.region).unwrap_or_else(|| raw.trim().to_string());
        handler(next);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(String) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |value| sink.lock().expect("recorder lock").push(value))
    }

    #[test]
    fn text_input_forwards_raw_keystrokes() {
        let (seen, handler) = recorder();
        let input = TextInput::new().on_change(handler);
        input.input("  Ahmed ");
        assert_eq!(*seen.lock().expect("lock"), vec!["  Ahmed ".to_string()]);
    }

    #[test]
    fn disabled_text_input_ignores_input() {
        let (seen, handler) = recorder();
        let input = TextInput::new().disabled(true).on_change(handler);
        input.input("x");
        assert!(seen.lock().expect("lock").is_empty());
    }

    #[test]
    fn phone_input_normalizes_with_default_region() {
        let (seen, handler) = recorder();
        let input = PhoneInput::new().default_region(Region::Eg).on_change(handler);
        input.input("012 3456 7890");
        input.input("not a number");
        assert_eq!(
            *seen.lock().expect("lock"),
            vec!["+201234567890".to_string(), "not a number".to_string()]
        );
    }
}
