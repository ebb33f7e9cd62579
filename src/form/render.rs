use crate::components::{
    Checkbox, Control, DatePicker, FieldItem, LabelPlacement, PhoneInput, Select, SubmitButton,
    Textarea, TextInput,
};
use crate::phone::PhoneDefaults;

use super::controller::{FormController, FormResult};
use super::field::{FieldDescriptor, FieldSlot, FormLayout};
use super::validation::ValidationError;

#[derive(Clone, Debug)]
pub struct RenderedSection {
    pub title: Option<String>,
    pub fields: Vec<FieldItem>,
}

/// One frame of a form, ready to paint.
#[derive(Clone, Debug)]
pub struct RenderedForm {
    pub heading: Option<String>,
    pub subheading: Option<String>,
    pub sections: Vec<RenderedSection>,
    pub submit: SubmitButton,
    /// Message of the last failed submission, if not dismissed.
    pub error_banner: Option<String>,
}

impl RenderedForm {
    pub fn fields(&self) -> impl Iterator<Item = &FieldItem> + '_ {
        self.sections.iter().flat_map(|section| section.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&FieldItem> {
        self.fields().find(|item| item.key().as_str() == name)
    }
}

/// Produces the widget for one descriptor, bound to `controller`.
pub fn render_field<M, E>(
    descriptor: &FieldDescriptor<M, E>,
    controller: &FormController<M, E>,
) -> FormResult<FieldItem>
where
    M: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    render_field_with(descriptor, controller, PhoneDefaults::default())
}

pub(super) fn render_field_with<M, E>(
    descriptor: &FieldDescriptor<M, E>,
    controller: &FormController<M, E>,
    phone: PhoneDefaults,
) -> FormResult<FieldItem>
where
    M: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    let disabled = controller.is_loading()?;
    let mut placement = LabelPlacement::Above;

    let control = match &descriptor.slot {
        FieldSlot::Text(bind) => {
            let mut input = TextInput::new().bind(bind(controller)?).disabled(disabled);
            if let Some(placeholder) = &descriptor.placeholder {
                input = input.placeholder(placeholder.clone());
            }
            if let Some(icon) = &descriptor.icon {
                input = input.icon(icon.clone());
            }
            Control::Text(input)
        }
        FieldSlot::LongText(bind) => {
            let mut textarea = Textarea::new().bind(bind(controller)?).disabled(disabled);
            if let Some(placeholder) = &descriptor.placeholder {
                textarea = textarea.placeholder(placeholder.clone());
            }
            Control::LongText(textarea)
        }
        FieldSlot::Phone(bind) => {
            let mut input = PhoneInput::new()
                .bind(bind(controller)?)
                .default_region(phone.region)
                .disabled(disabled);
            if let Some(placeholder) = &descriptor.placeholder {
                input = input.placeholder(placeholder.clone());
            }
            Control::Phone(input)
        }
        FieldSlot::Date(bind) => {
            let mut picker = DatePicker::new()
                .bind(bind(controller)?)
                .show_time(descriptor.show_time)
                .disabled(disabled);
            if let Some(format) = &descriptor.date_format {
                picker = picker.date_format(format.clone());
            }
            if let Some(icon) = &descriptor.icon {
                picker = picker.icon(Some(icon.clone()));
            }
            Control::Date(picker)
        }
        FieldSlot::Select(bind) => {
            let mut select = Select::new()
                .bind(bind(controller)?)
                .options(descriptor.options.iter().cloned())
                .disabled(disabled);
            if let Some(placeholder) = &descriptor.placeholder {
                select = select.placeholder(placeholder.clone());
            }
            Control::Select(select)
        }
        FieldSlot::Checkbox(bind) => {
            placement = LabelPlacement::Inline;
            let label = descriptor.label.clone().unwrap_or_default();
            Control::Checkbox(
                Checkbox::new(label)
                    .bind(bind(controller)?)
                    .disabled(disabled),
            )
        }
        FieldSlot::CustomRender(render) => render(controller, disabled)?,
    };

    let error = controller.field_error_for_display(descriptor.name)?;
    Ok(FieldItem::new(descriptor.name, control)
        .with_label(descriptor.label.clone())
        .with_placement(placement)
        .with_error(error))
}

/// Renders every section of `layout` plus the submit button.
pub fn render_form<M, E>(
    layout: &FormLayout<M, E>,
    controller: &FormController<M, E>,
) -> FormResult<RenderedForm>
where
    M: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    let sections = layout
        .sections
        .iter()
        .map(|section| -> FormResult<RenderedSection> {
            let fields = section
                .fields
                .iter()
                .map(|field| render_field_with(field, controller, layout.phone_defaults))
                .collect::<FormResult<Vec<_>>>()?;
            Ok(RenderedSection {
                title: section.title.clone(),
                fields,
            })
        })
        .collect::<FormResult<Vec<_>>>()?;

    let loading = controller.is_loading()?;
    let error_banner = controller.last_error()?.map(|error| error.to_string());
    Ok(RenderedForm {
        heading: layout.heading.clone(),
        subheading: layout.subheading.clone(),
        sections,
        submit: SubmitButton::new(layout.submit_label.clone()).loading(loading),
        error_banner,
    })
}
