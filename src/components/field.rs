use std::fmt::{Debug, Formatter};

use crate::form::FieldKey;

use super::{
    Checkbox, DatePicker, FileUploader, PhoneInput, RadioGroup, Select, Textarea, TextInput,
};

/// Concrete widget produced for one field.
#[derive(Clone)]
pub enum Control {
    Text(TextInput),
    LongText(Textarea),
    Phone(PhoneInput),
    Date(DatePicker),
    Select(Select),
    Checkbox(Checkbox),
    Radio(RadioGroup),
    FileUpload(FileUploader),
}

impl Control {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Control::Text(_) => "text",
            Control::LongText(_) => "long_text",
            Control::Phone(_) => "phone",
            Control::Date(_) => "date",
            Control::Select(_) => "select",
            Control::Checkbox(_) => "checkbox",
            Control::Radio(_) => "radio",
            Control::FileUpload(_) => "file_upload",
        }
    }

    pub fn as_text(&self) -> Option<&TextInput> {
        match self {
            Control::Text(input) => Some(input),
            _ => None,
        }
    }

    pub fn as_long_text(&self) -> Option<&Textarea> {
        match self {
            Control::LongText(textarea) => Some(textarea),
            _ => None,
        }
    }

    pub fn as_phone(&self) -> Option<&PhoneInput> {
        match self {
            Control::Phone(input) => Some(input),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DatePicker> {
        match self {
            Control::Date(picker) => Some(picker),
            _ => None,
        }
    }

    pub fn as_select(&self) -> Option<&Select> {
        match self {
            Control::Select(select) => Some(select),
            _ => None,
        }
    }

    pub fn as_checkbox(&self) -> Option<&Checkbox> {
        match self {
            Control::Checkbox(checkbox) => Some(checkbox),
            _ => None,
        }
    }

    pub fn as_radio(&self) -> Option<&RadioGroup> {
        match self {
            Control::Radio(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_file_upload(&self) -> Option<&FileUploader> {
        match self {
            Control::FileUpload(uploader) => Some(uploader),
            _ => None,
        }
    }
}

impl Debug for Control {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Control").field(&self.kind_name()).finish()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LabelPlacement {
    /// Label rendered above the control.
    Above,
    /// Label owned by the control itself, e.g. beside a checkbox.
    Inline,
}

/// Wrapper every rendered field shares: label, control and error slot.
#[derive(Clone, Debug)]
pub struct FieldItem {
    key: FieldKey,
    label: Option<String>,
    placement: LabelPlacement,
    control: Control,
    error: Option<String>,
}

impl FieldItem {
    pub fn new(key: FieldKey, control: Control) -> Self {
        Self {
            key,
            label: None,
            placement: LabelPlacement::Above,
            control,
            error: None,
        }
    }

    /// Label shown above the control. Ignored for inline placement.
    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    pub fn with_placement(mut self, placement: LabelPlacement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }

    pub fn key(&self) -> FieldKey {
        self.key
    }

    pub fn label(&self) -> Option<&str> {
        match self.placement {
            LabelPlacement::Above => self.label.as_deref(),
            LabelPlacement::Inline => None,
        }
    }

    pub fn label_placement(&self) -> LabelPlacement {
        self.placement
    }

    pub fn control(&self) -> &Control {
        &self.control
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Contents of the error slot; empty when the field has no error.
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or_default()
    }
}
