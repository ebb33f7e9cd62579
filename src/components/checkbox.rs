use crate::form::BoundField;

use super::ChangeHandler;

/// Boolean control whose label sits beside the box.
#[derive(Clone, Default)]
pub struct Checkbox {
    checked: bool,
    label: String,
    disabled: bool,
    on_change: Option<ChangeHandler<bool>>,
}

impl Checkbox {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn on_change(mut self, handler: impl Fn(bool) + Send + Sync + 'static) -> Self {
        self.on_change = Some(std::sync::Arc::new(handler));
        self
    }

    pub fn bind(self, field: BoundField<bool>) -> Self {
        let checked = *field.value();
        self.checked(checked).on_change(move |next| field.on_change(next))
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn inline_label(&self) -> &str {
        &self.label
    }

    pub fn toggle(&self) {
        self.set_checked(!self.checked);
    }

    pub fn set_checked(&self, checked: bool) {
        if self.disabled {
            return;
        }
        if let Some(handler) = &self.on_change {
            handler(checked);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn toggle_emits_negated_state() {
        let last = Arc::new(AtomicBool::new(false));
        let sink = last.clone();
        let checkbox = Checkbox::new("I consent to treatment")
            .checked(false)
            .on_change(move |value| sink.store(value, Ordering::SeqCst));
        checkbox.toggle();
        assert!(last.load(Ordering::SeqCst));
        assert_eq!(checkbox.inline_label(), "I consent to treatment");
    }
}
