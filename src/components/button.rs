/// Submit control of a rendered form.
///
/// While the form is loading the button is disabled and shows the busy label
/// instead of its own.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubmitButton {
    label: String,
    busy_label: String,
    loading: bool,
    disabled: bool,
}

impl SubmitButton {
    pub const BUSY_LABEL: &'static str = "Loading...";

    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            busy_label: Self::BUSY_LABEL.to_string(),
            loading: false,
            disabled: false,
        }
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn busy_label(mut self, label: impl Into<String>) -> Self {
        self.busy_label = label.into();
        self
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled || self.loading
    }

    /// Text currently shown on the button.
    pub fn text(&self) -> &str {
        if self.loading {
            &self.busy_label
        } else {
            &self.label
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_swaps_label_and_disables() {
        let idle = SubmitButton::new("Get Started");
        assert_eq!(idle.text(), "Get Started");
        assert!(!idle.is_disabled());

        let busy = idle.loading(true);
        assert_eq!(busy.text(), "Loading...");
        assert!(busy.is_disabled());
    }
}
