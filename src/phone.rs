//! Phone number normalization for [`PhoneInput`](crate::components::PhoneInput).
//!
//! Numbers are stored in E.164 form (`+201234567890`). National input is read
//! against the numbering plan of the configured default region.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use phonenumber::{Mode, PhoneNumber, country};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Region {
    #[default]
    Eg,
    Sa,
    Ae,
    Gb,
    De,
    Fr,
    In,
    Us,
}

impl Region {
    pub const ALL: [Region; 8] = [
        Region::Eg,
        Region::Sa,
        Region::Ae,
        Region::Gb,
        Region::De,
        Region::Fr,
        Region::In,
        Region::Us,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Region::Eg => "EG",
            Region::Sa => "SA",
            Region::Ae => "AE",
            Region::Gb => "GB",
            Region::De => "DE",
            Region::Fr => "FR",
            Region::In => "IN",
            Region::Us => "US",
        }
    }

    fn country(self) -> country::Id {
        match self {
            Region::Eg => country::Id::EG,
            Region::Sa => country::Id::SA,
            Region::Ae => country::Id::AE,
            Region::Gb => country::Id::GB,
            Region::De => country::Id::DE,
            Region::Fr => country::Id::FR,
            Region::In => country::Id::IN,
            Region::Us => country::Id::US,
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownRegion(pub String);

impl Display for UnknownRegion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown phone region `{}`", self.0)
    }
}

impl std::error::Error for UnknownRegion {}

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Region::ALL
            .into_iter()
            .find(|region| region.code().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownRegion(value.to_string()))
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PhoneDefaults {
    pub region: Region,
}

impl PhoneDefaults {
    pub fn new(region: Region) -> Self {
        Self { region }
    }

    /// Region taken from the system locale (`en-US` → `US`), falling back to
    /// the default region.
    #[cfg(feature = "i18n")]
    pub fn from_system_locale() -> Self {
        let region = sys_locale::get_locale()
            .as_deref()
            .and_then(region_from_locale)
            .unwrap_or_default();
        Self { region }
    }
}

#[cfg(any(feature = "i18n", test))]
fn region_from_locale(tag: &str) -> Option<Region> {
    tag.split(['-', '_'])
        .skip(1)
        .find_map(|part| part.parse::<Region>().ok())
}

fn e164(number: &PhoneNumber) -> String {
    number.format().mode(Mode::E164).to_string()
}

/// Converts typed input into E.164.
///
/// Returns `None` unless the input parses as a number that is valid in its
/// region. Input without a country prefix is read as a number of `region`.
pub fn normalize(raw: &str, region: Region) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    phonenumber::parse(Some(region.country()), raw)
        .ok()
        .filter(phonenumber::is_valid)
        .map(|number| e164(&number))
}

/// True for a valid number already written in E.164 form.
pub fn is_valid_e164(value: &str) -> bool {
    if !value.starts_with('+') {
        return false;
    }
    phonenumber::parse(None, value)
        .ok()
        .filter(phonenumber::is_valid)
        .is_some_and(|number| e164(&number) == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn national_numbers_are_read_in_the_default_region() {
        assert_eq!(
            normalize("02 34567890", Region::Eg).as_deref(),
            Some("+20234567890")
        );
        assert_eq!(
            normalize("(650) 253-0000", Region::Us).as_deref(),
            Some("+16502530000")
        );
    }

    #[test]
    fn international_input_is_kept() {
        assert_eq!(
            normalize("+20 123 456 7890", Region::Us).as_deref(),
            Some("+201234567890")
        );
        assert_eq!(
            normalize("0044 121 234 5678", Region::Eg).as_deref(),
            Some("+441212345678")
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(normalize("", Region::Eg), None);
        assert_eq!(normalize("call me", Region::Eg), None);
        assert_eq!(normalize("+", Region::Eg), None);
    }

    #[test]
    fn numbers_outside_the_numbering_plan_are_rejected() {
        assert_eq!(normalize("0123", Region::Eg), None);
        assert_eq!(normalize("+20 123", Region::Eg), None);
    }

    #[test]
    fn e164_check_requires_canonical_form() {
        assert!(is_valid_e164("+201234567890"));
        assert!(!is_valid_e164("201234567890"));
        assert!(!is_valid_e164("+20 123 456 7890"));
        assert!(!is_valid_e164("+20123"));
    }

    #[test]
    fn region_parses_case_insensitively() {
        assert_eq!("eg".parse::<Region>(), Ok(Region::Eg));
        assert_eq!(
            "XX".parse::<Region>(),
            Err(UnknownRegion("XX".to_string()))
        );
    }

    #[test]
    fn locale_tags_map_to_regions() {
        assert_eq!(region_from_locale("en-US"), Some(Region::Us));
        assert_eq!(region_from_locale("ar_EG"), Some(Region::Eg));
        assert_eq!(region_from_locale("en"), None);
    }
}
