use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use super::controller::{FieldKey, FormController, FormResult, read_lock};
use super::validation::{FieldLens, ValidationError};

type ChangeHandler<V> = Arc<dyn Fn(V) + Send + Sync>;

/// One form value handed to a widget: the current value plus the callback
/// that writes a new value back into the owning form.
#[derive(Clone)]
pub struct BoundField<V> {
    key: FieldKey,
    value: V,
    on_change: ChangeHandler<V>,
}

impl<V> BoundField<V> {
    pub fn new(key: FieldKey, value: V, on_change: impl Fn(V) + Send + Sync + 'static) -> Self {
        Self {
            key,
            value,
            on_change: Arc::new(on_change),
        }
    }

    pub fn key(&self) -> FieldKey {
        self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn on_change(&self, next: V) {
        (self.on_change)(next)
    }

    /// Adapts the bound value to a widget working in another type.
    pub fn map<W>(
        self,
        to_widget: impl FnOnce(&V) -> W,
        from_widget: impl Fn(W) -> V + Send + Sync + 'static,
    ) -> BoundField<W>
    where
        V: 'static,
    {
        let value = to_widget(&self.value);
        let on_change = self.on_change;
        BoundField {
            key: self.key,
            value,
            on_change: Arc::new(move |next| on_change(from_widget(next))),
        }
    }
}

impl<V: Send + Sync + 'static> BoundField<V> {
    /// Like [`map`](Self::map), but widget values with no counterpart in `V`
    /// are dropped instead of written.
    pub fn try_map<W>(
        self,
        to_widget: impl FnOnce(&V) -> W,
        from_widget: impl Fn(W) -> Option<V> + Send + Sync + 'static,
    ) -> BoundField<W> {
        let key = self.key;
        let value = to_widget(&self.value);
        let on_change = self.on_change;
        BoundField {
            key,
            value,
            on_change: Arc::new(move |next| match from_widget(next) {
                Some(next) => on_change(next),
                None => tracing::warn!(field = %key, "ignoring unrecognised widget value"),
            }),
        }
    }
}

impl<V: Debug> Debug for BoundField<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundField")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    /// Binds `lens` to this form. Writes through the returned field go to
    /// [`FormController::set`].
    pub fn bound<L>(&self, lens: L) -> FormResult<BoundField<L::Value>>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        let value = lens.get(&read_lock(&self.state, "reading bound value")?.model).clone();
        let controller = self.clone();
        Ok(BoundField::new(key, value, move |next| {
            if let Err(error) = controller.set(lens, next) {
                tracing::warn!(field = %key, %error, "dropping field change");
            }
        }))
    }

    /// Message for the inline error slot of `key`.
    ///
    /// Errors stay hidden until the field was touched or a submit was
    /// attempted.
    pub fn field_error_for_display(&self, key: FieldKey) -> FormResult<Option<String>> {
        let state = read_lock(&self.state, "reading display error message")?;
        let Some(meta) = state.field_meta.get(&key) else {
            return Ok(None);
        };
        if !meta.touched && state.submit_count == 0 {
            return Ok(None);
        }
        Ok(meta
            .errors
            .first()
            .map(|error| error.message().into_owned()))
    }
}
