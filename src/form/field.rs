use std::collections::BTreeSet;
use std::fmt::{Debug, Display, Formatter};
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::components::{Control, SelectOption};
use crate::icon::IconRef;
use crate::phone::PhoneDefaults;

use super::binding::BoundField;
use super::controller::{FieldKey, FormController, FormResult};
use super::validation::{FieldLens, FormModel, ValidationError};

/// Kinds of field a descriptor can declare.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FieldKind {
    Text,
    LongText,
    Phone,
    Checkbox,
    Date,
    Select,
    CustomRender,
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldKind::Text => "text",
            FieldKind::LongText => "long text",
            FieldKind::Phone => "phone",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Date => "date",
            FieldKind::Select => "select",
            FieldKind::CustomRender => "custom render",
        };
        f.write_str(name)
    }
}

/// Draws a custom field from its own bound value. The flag is true while the
/// form is loading.
pub(super) type CustomRenderer<M, E> =
    Arc<dyn Fn(&FormController<M, E>, bool) -> FormResult<Control> + Send + Sync>;

pub(super) type Binder<M, E, V> =
    Arc<dyn Fn(&FormController<M, E>) -> FormResult<BoundField<V>> + Send + Sync>;

/// The typed value slot behind a descriptor. One variant per [`FieldKind`].
pub(super) enum FieldSlot<M, E>
where
    M: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    Text(Binder<M, E, String>),
    LongText(Binder<M, E, String>),
    Phone(Binder<M, E, String>),
    Checkbox(Binder<M, E, bool>),
    Date(Binder<M, E, Option<NaiveDateTime>>),
    Select(Binder<M, E, String>),
    CustomRender(CustomRenderer<M, E>),
}

impl<M, E> Clone for FieldSlot<M, E>
where
    M: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    fn clone(&self) -> Self {
        match self {
            FieldSlot::Text(bind) => FieldSlot::Text(bind.clone()),
            FieldSlot::LongText(bind) => FieldSlot::LongText(bind.clone()),
            FieldSlot::Phone(bind) => FieldSlot::Phone(bind.clone()),
            FieldSlot::Checkbox(bind) => FieldSlot::Checkbox(bind.clone()),
            FieldSlot::Date(bind) => FieldSlot::Date(bind.clone()),
            FieldSlot::Select(bind) => FieldSlot::Select(bind.clone()),
            FieldSlot::CustomRender(render) => FieldSlot::CustomRender(render.clone()),
        }
    }
}

fn binder<M, E, L>(lens: L) -> Binder<M, E, L::Value>
where
    M: Clone + Send + Sync + 'static,
    E: ValidationError,
    L: FieldLens<M>,
{
    Arc::new(move |controller: &FormController<M, E>| controller.bound(lens))
}

/// Declarative description of one form field.
///
/// Built through the kind-specific constructors, which tie the field to a
/// lens of the matching value type.
pub struct FieldDescriptor<M, E>
where
    M: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub(super) name: FieldKey,
    pub(super) slot: FieldSlot<M, E>,
    pub(super) label: Option<String>,
    pub(super) placeholder: Option<String>,
    pub(super) icon: Option<IconRef>,
    pub(super) date_format: Option<String>,
    pub(super) show_time: bool,
    pub(super) options: Vec<SelectOption>,
}

impl<M, E> Clone for FieldDescriptor<M, E>
where
    M: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            slot: self.slot.clone(),
            label: self.label.clone(),
            placeholder: self.placeholder.clone(),
            icon: self.icon.clone(),
            date_format: self.date_format.clone(),
            show_time: self.show_time,
            options: self.options.clone(),
        }
    }
}

impl<M, E> Debug for FieldDescriptor<M, E>
where
    M: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("kind", &self.kind())
            .field("name", &self.name)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl<M, E> FieldDescriptor<M, E>
where
    M: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    fn with_slot(name: FieldKey, slot: FieldSlot<M, E>) -> Self {
        Self {
            name,
            slot,
            label: None,
            placeholder: None,
            icon: None,
            date_format: None,
            show_time: false,
            options: Vec::new(),
        }
    }

    pub fn text<L>(lens: L) -> Self
    where
        L: FieldLens<M, Value = String>,
    {
        Self::with_slot(lens.key(), FieldSlot::Text(binder(lens)))
    }

    pub fn long_text<L>(lens: L) -> Self
    where
        L: FieldLens<M, Value = String>,
    {
        Self::with_slot(lens.key(), FieldSlot::LongText(binder(lens)))
    }

    pub fn phone<L>(lens: L) -> Self
    where
        L: FieldLens<M, Value = String>,
    {
        Self::with_slot(lens.key(), FieldSlot::Phone(binder(lens)))
    }

    pub fn checkbox<L>(lens: L) -> Self
    where
        L: FieldLens<M, Value = bool>,
    {
        Self::with_slot(lens.key(), FieldSlot::Checkbox(binder(lens)))
    }

    pub fn date<L>(lens: L) -> Self
    where
        L: FieldLens<M, Value = Option<NaiveDateTime>>,
    {
        Self::with_slot(lens.key(), FieldSlot::Date(binder(lens)))
    }

    pub fn select<L>(lens: L) -> Self
    where
        L: FieldLens<M, Value = String>,
    {
        Self::with_slot(lens.key(), FieldSlot::Select(binder(lens)))
    }

    /// Field drawn by `renderer`, which only ever sees the value bound to
    /// `lens` and whether the form is loading.
    pub fn custom<L, R>(lens: L, renderer: R) -> Self
    where
        L: FieldLens<M>,
        R: Fn(BoundField<L::Value>, bool) -> Control + Send + Sync + 'static,
    {
        let bind = binder::<M, E, L>(lens);
        let render: CustomRenderer<M, E> =
            Arc::new(move |controller: &FormController<M, E>, disabled: bool| {
                Ok(renderer(bind(controller)?, disabled))
            });
        Self::with_slot(lens.key(), FieldSlot::CustomRender(render))
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<IconRef>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    pub fn show_time(mut self, show_time: bool) -> Self {
        self.show_time = show_time;
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = SelectOption>) -> Self {
        self.options = options.into_iter().collect();
        self
    }

    pub fn kind(&self) -> FieldKind {
        match self.slot {
            FieldSlot::Text(_) => FieldKind::Text,
            FieldSlot::LongText(_) => FieldKind::LongText,
            FieldSlot::Phone(_) => FieldKind::Phone,
            FieldSlot::Checkbox(_) => FieldKind::Checkbox,
            FieldSlot::Date(_) => FieldKind::Date,
            FieldSlot::Select(_) => FieldKind::Select,
            FieldSlot::CustomRender(_) => FieldKind::CustomRender,
        }
    }

    pub fn name(&self) -> FieldKey {
        self.name
    }

    pub fn label_text(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn placeholder_text(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn icon_ref(&self) -> Option<&IconRef> {
        self.icon.as_ref()
    }

    pub fn select_options(&self) -> &[SelectOption] {
        &self.options
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LayoutError {
    DuplicateField(FieldKey),
    UnknownField(FieldKey),
}

impl Display for LayoutError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::DuplicateField(field) => {
                write!(f, "field `{field}` is declared more than once")
            }
            LayoutError::UnknownField(field) => {
                write!(f, "field `{field}` is not part of the form model")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Titled group of fields.
pub struct FormSection<M, E>
where
    M: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub(super) title: Option<String>,
    pub(super) fields: Vec<FieldDescriptor<M, E>>,
}

impl<M, E> Clone for FormSection<M, E>
where
    M: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    fn clone(&self) -> Self {
        Self {
            title: self.title.clone(),
            fields: self.fields.clone(),
        }
    }
}

impl<M, E> FormSection<M, E>
where
    M: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            fields: Vec::new(),
        }
    }

    pub fn untitled() -> Self {
        Self {
            title: None,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDescriptor<M, E>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn fields(&self) -> &[FieldDescriptor<M, E>] {
        &self.fields
    }
}

/// Ordered, checked field list of one form.
///
/// Every descriptor names a key of the model, and no key appears twice.
pub struct FormLayout<M, E>
where
    M: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub(super) heading: Option<String>,
    pub(super) subheading: Option<String>,
    pub(super) sections: Vec<FormSection<M, E>>,
    pub(super) submit_label: String,
    pub(super) phone_defaults: PhoneDefaults,
    _model: PhantomData<fn() -> M>,
}

impl<M, E> Clone for FormLayout<M, E>
where
    M: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    fn clone(&self) -> Self {
        Self {
            heading: self.heading.clone(),
            subheading: self.subheading.clone(),
            sections: self.sections.clone(),
            submit_label: self.submit_label.clone(),
            phone_defaults: self.phone_defaults,
            _model: PhantomData,
        }
    }
}

impl<M, E> FormLayout<M, E>
where
    M: FormModel,
    E: ValidationError,
{
    pub fn new(sections: Vec<FormSection<M, E>>) -> Result<Self, LayoutError> {
        let mut seen = BTreeSet::new();
        for field in sections.iter().flat_map(|section| section.fields.iter()) {
            if !M::has_field(field.name) {
                return Err(LayoutError::UnknownField(field.name));
            }
            if !seen.insert(field.name) {
                return Err(LayoutError::DuplicateField(field.name));
            }
        }
        Ok(Self {
            heading: None,
            subheading: None,
            sections,
            submit_label: "Submit".to_string(),
            phone_defaults: PhoneDefaults::default(),
            _model: PhantomData,
        })
    }

    /// Single untitled section holding `fields` in order.
    pub fn from_fields(
        fields: impl IntoIterator<Item = FieldDescriptor<M, E>>,
    ) -> Result<Self, LayoutError> {
        let section = fields
            .into_iter()
            .fold(FormSection::untitled(), FormSection::field);
        Self::new(vec![section])
    }
}

impl<M, E> FormLayout<M, E>
where
    M: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub fn heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    pub fn subheading(mut self, subheading: impl Into<String>) -> Self {
        self.subheading = Some(subheading.into());
        self
    }

    pub fn submit_label(mut self, label: impl Into<String>) -> Self {
        self.submit_label = label.into();
        self
    }

    pub fn phone_defaults(mut self, defaults: PhoneDefaults) -> Self {
        self.phone_defaults = defaults;
        self
    }

    pub fn sections(&self) -> &[FormSection<M, E>] {
        &self.sections
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor<M, E>> + '_ {
        self.sections.iter().flat_map(|section| section.fields.iter())
    }

    pub fn field(&self, name: FieldKey) -> Option<&FieldDescriptor<M, E>> {
        self.fields().find(|field| field.name == name)
    }
}
