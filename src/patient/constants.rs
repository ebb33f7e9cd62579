use crate::components::SelectOption;
use crate::icon::IconRef;

pub const DEFAULT_IDENTIFICATION_TYPE: &str = "Birth Certificate";

pub const IDENTIFICATION_TYPES: [&str; 11] = [
    "Birth Certificate",
    "Driver's License",
    "Medical Insurance Card/Policy",
    "Military ID Card",
    "National Identity Card",
    "Passport",
    "Resident Alien Card (Green Card)",
    "Social Security Card",
    "State ID Card",
    "Student ID Card",
    "Voter ID Card",
];

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Physician {
    pub name: &'static str,
    pub portrait: IconRef,
}

const fn physician(name: &'static str, portrait: &'static str) -> Physician {
    Physician {
        name,
        portrait: IconRef::from_static(portrait),
    }
}

pub const PHYSICIANS: [Physician; 9] = [
    physician("John Green", "/assets/images/dr-green.png"),
    physician("Leila Cameron", "/assets/images/dr-cameron.png"),
    physician("David Livingston", "/assets/images/dr-livingston.png"),
    physician("Evan Peter", "/assets/images/dr-peter.png"),
    physician("Jane Powell", "/assets/images/dr-powell.png"),
    physician("Alex Ramirez", "/assets/images/dr-remirez.png"),
    physician("Jasmine Lee", "/assets/images/dr-lee.png"),
    physician("Alyana Cruz", "/assets/images/dr-cruz.png"),
    physician("Hardik Sharma", "/assets/images/dr-sharma.png"),
];

pub fn physician_names() -> Vec<&'static str> {
    PHYSICIANS.iter().map(|physician| physician.name).collect()
}

pub fn physician_options() -> Vec<SelectOption> {
    PHYSICIANS
        .iter()
        .map(|physician| {
            SelectOption::plain(physician.name).icon(physician.portrait.clone())
        })
        .collect()
}

pub fn identification_type_options() -> Vec<SelectOption> {
    IDENTIFICATION_TYPES
        .into_iter()
        .map(SelectOption::plain)
        .collect()
}
