use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Arc, OnceLock};

use rust_embed::{EmbeddedFile, RustEmbed};

/// Opaque icon identifier. The form layer only passes these through; the
/// hosting UI decides how to paint them.
///
/// Accepted spellings: `"user"`, `"builtin:user"` and asset paths such as
/// `"/assets/icons/user.svg"`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct IconRef {
    value: Cow<'static, str>,
}

impl IconRef {
    pub const fn from_static(value: &'static str) -> Self {
        Self {
            value: Cow::Borrowed(value),
        }
    }

    pub fn new(value: impl Into<Cow<'static, str>>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Splits the reference into `(pack, name)`; `pack` is `None` when the
    /// reference does not name one.
    pub fn parts(&self) -> (Option<&str>, &str) {
        if let Some((pack, name)) = self.value.split_once(':') {
            return (Some(pack), name);
        }
        let stem = Path::new(self.value.as_ref())
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(self.value.as_ref());
        (None, stem)
    }
}

impl Display for IconRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<&'static str> for IconRef {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for IconRef {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

pub const USER: IconRef = IconRef::from_static("builtin:user");
pub const EMAIL: IconRef = IconRef::from_static("builtin:email");
pub const CALENDAR: IconRef = IconRef::from_static("builtin:calendar");
pub const UPLOAD: IconRef = IconRef::from_static("builtin:upload");

#[derive(RustEmbed)]
#[folder = "assets/icons"]
struct BuiltinIcons;

type PackLookup = fn(&str) -> Option<EmbeddedFile>;

#[derive(Clone)]
struct RegistryInner {
    default_pack: String,
    packs: BTreeMap<String, PackLookup>,
}

/// Resolves [`IconRef`]s to embedded SVG bytes for hosts that want the
/// bundled artwork.
#[derive(Clone)]
pub struct IconRegistry {
    inner: Arc<RegistryInner>,
}

impl Default for IconRegistry {
    fn default() -> Self {
        static DEFAULT_REGISTRY: OnceLock<IconRegistry> = OnceLock::new();
        DEFAULT_REGISTRY.get_or_init(Self::build_default).clone()
    }
}

impl IconRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn build_default() -> Self {
        let mut packs = BTreeMap::<String, PackLookup>::new();
        packs.insert("builtin".to_string(), BuiltinIcons::get);
        Self {
            inner: Arc::new(RegistryInner {
                default_pack: "builtin".to_string(),
                packs,
            }),
        }
    }

    pub fn with_default_pack(mut self, pack: impl Into<String>) -> Self {
        let mut next = (*self.inner).clone();
        next.default_pack = pack.into();
        self.inner = Arc::new(next);
        self
    }

    pub fn register_embedded_pack<T: RustEmbed>(mut self, name: impl Into<String>) -> Self {
        let mut next = (*self.inner).clone();
        next.packs.insert(name.into(), T::get);
        self.inner = Arc::new(next);
        self
    }

    pub fn resolve(&self, icon: &IconRef) -> Option<Cow<'static, [u8]>> {
        let (pack, name) = icon.parts();
        let pack = pack.unwrap_or(self.inner.default_pack.as_str());
        let lookup = self.inner.packs.get(pack)?;
        lookup(&format!("{name}.svg")).map(|file| file.data)
    }

    pub fn contains(&self, icon: &IconRef) -> bool {
        self.resolve(icon).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_paths_resolve_by_file_stem() {
        let icon = IconRef::from_static("/assets/icons/user.svg");
        assert_eq!(icon.parts(), (None, "user"));
        assert!(IconRegistry::new().contains(&icon));
    }

    #[test]
    fn builtin_constants_resolve() {
        let registry = IconRegistry::new();
        for icon in [USER, EMAIL, CALENDAR, UPLOAD] {
            assert!(registry.contains(&icon), "{icon} should be bundled");
        }
    }

    #[test]
    fn unknown_pack_or_name_resolves_to_none() {
        let registry = IconRegistry::new();
        assert!(registry.resolve(&IconRef::from_static("tabler:user")).is_none());
        assert!(registry.resolve(&IconRef::from_static("builtin:missing")).is_none());
    }
}
