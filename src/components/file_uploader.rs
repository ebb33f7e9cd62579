use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::form::BoundField;
use crate::icon::{self, IconRef};

use super::ChangeHandler;

/// File picked by the user, held in memory until submission.
#[derive(Clone, Eq, PartialEq)]
pub struct FileUpload {
    pub name: String,
    pub mime_type: Option<String>,
    pub bytes: Arc<[u8]>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Debug for FileUpload {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Drop zone that collects uploaded files.
#[derive(Clone)]
pub struct FileUploader {
    files: Vec<FileUpload>,
    prompt: String,
    hint: Option<String>,
    icon: IconRef,
    disabled: bool,
    on_change: Option<ChangeHandler<Vec<FileUpload>>>,
}

impl Default for FileUploader {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            prompt: "Click to upload or drag and drop".to_string(),
            hint: Some("SVG, PNG, JPG or GIF (max. 800x400px)".to_string()),
            icon: icon::UPLOAD,
            disabled: false,
            on_change: None,
        }
    }
}

impl FileUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(mut self, files: Vec<FileUpload>) -> Self {
        self.files = files;
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn hint(mut self, hint: Option<String>) -> Self {
        self.hint = hint;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn on_change(
        mut self,
        handler: impl Fn(Vec<FileUpload>) + Send + Sync + 'static,
    ) -> Self {
        self.on_change = Some(Arc::new(handler));
        self
    }

    pub fn bind(self, field: BoundField<Vec<FileUpload>>) -> Self {
        let files = field.value().clone();
        self.files(files).on_change(move |next| field.on_change(next))
    }

    pub fn file_list(&self) -> &[FileUpload] {
        &self.files
    }

    pub fn prompt_text(&self) -> &str {
        &self.prompt
    }

    pub fn hint_text(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn icon_ref(&self) -> &IconRef {
        &self.icon
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// A drop replaces the current selection.
    pub fn drop_files(&self, files: Vec<FileUpload>) {
        if self.disabled || files.is_empty() {
            return;
        }
        if let Some(handler) = &self.on_change {
            handler(files);
        }
    }

    pub fn clear(&self) {
        if self.disabled {
            return;
        }
        if let Some(handler) = &self.on_change {
            handler(Vec::new());
        }
    }
}
