//! Headless widgets.
//!
//! Each widget holds what a host needs to paint it plus a change callback.
//! Calling the widget's input method is how a host reports user input.

mod button;
mod checkbox;
mod date_picker;
mod field;
mod file_uploader;
mod input;
mod radio;
mod select;
mod textarea;

pub(crate) type ChangeHandler<V> = std::sync::Arc<dyn Fn(V) + Send + Sync>;

pub use button::SubmitButton;
pub use checkbox::Checkbox;
pub use date_picker::{DEFAULT_DATE_FORMAT, DatePicker, chrono_pattern};
pub use field::{Control, FieldItem, LabelPlacement};
pub use file_uploader::{FileUpload, FileUploader};
pub use input::{PhoneInput, TextInput};
pub use radio::RadioGroup;
pub use select::{Select, SelectOption};
pub use textarea::Textarea;
