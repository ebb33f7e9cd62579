//! Typed form state, declarative field layouts and submission.

mod binding;
mod controller;
mod field;
mod render;
pub mod rules;
mod submit;
mod validation;

#[cfg(test)]
mod tests;

pub use binding::BoundField;
pub use careform_derive::FormModel;
pub use controller::{
    FieldKey, FieldMeta, FormController, FormError, FormId, FormOptions, FormResult, FormSnapshot,
    RevalidateMode, SubmitState, ValidationMode,
};
pub use field::{FieldDescriptor, FieldKind, FormLayout, FormSection, LayoutError};
pub use render::{RenderedForm, RenderedSection, render_field, render_form};
pub use submit::{BoxedActionFuture, PersistenceError, SubmissionError};
pub use validation::{
    FieldErrors, FieldLens, FieldValidator, FormModel, FormValidator, Schema, ValidationError,
    Violation,
};
