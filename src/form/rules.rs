//! Reusable field rules for [`Schema`](super::Schema) implementations.

use std::borrow::Cow;

use validator::ValidateEmail;

use crate::phone;

use super::validation::Violation;

pub type RuleResult = Result<(), Violation>;

/// Trimmed character count within `min..=max`. Messages name `subject`.
pub fn length(value: &str, min: usize, max: usize, subject: &str) -> RuleResult {
    let len = value.trim().chars().count();
    if len < min {
        Err(Violation::new(format!(
            "{subject} must be at least {min} characters"
        )))
    } else if len > max {
        Err(Violation::new(format!(
            "{subject} must be at most {max} characters"
        )))
    } else {
        Ok(())
    }
}

/// Like [`length`] but lets an empty value through. Counts trimmed characters.
pub fn optional_length(
    value: &str,
    max: usize,
    message: impl Into<Cow<'static, str>>,
) -> RuleResult {
    if value.trim().chars().count() <= max {
        Ok(())
    } else {
        Err(Violation::new(message))
    }
}

pub fn email(value: &str) -> RuleResult {
    let candidate = value.trim().to_owned();
    if candidate.validate_email() {
        Ok(())
    } else {
        Err(Violation::new("Invalid email address"))
    }
}

/// Valid number in E.164 form, as stored by the phone input.
pub fn international_phone(value: &str) -> RuleResult {
    if phone::is_valid_e164(value) {
        Ok(())
    } else {
        Err(Violation::new("Invalid phone number"))
    }
}

pub fn accepted(value: bool, message: impl Into<Cow<'static, str>>) -> RuleResult {
    if value {
        Ok(())
    } else {
        Err(Violation::new(message))
    }
}

pub fn one_of(value: &str, allowed: &[&str], message: impl Into<Cow<'static, str>>) -> RuleResult {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(Violation::new(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_counts_trimmed_characters() {
        assert_eq!(
            length("  a ", 2, 50, "Name"),
            Err(Violation::new("Name must be at least 2 characters"))
        );
        assert!(length("Ahmed", 2, 50, "Name").is_ok());
        assert!(length("ééé", 3, 3, "Code").is_ok());
        assert_eq!(
            length("abcdef", 2, 5, "Code"),
            Err(Violation::new("Code must be at most 5 characters"))
        );
    }

    #[test]
    fn email_rejects_missing_domain() {
        assert!(email("a@b.com").is_ok());
        assert!(email("a@").is_err());
        assert!(email("").is_err());
    }

    #[test]
    fn international_phone_requires_a_valid_e164_number() {
        assert!(international_phone("+201234567890").is_ok());
        assert!(international_phone("201234567890").is_err());
        assert!(international_phone("+20123").is_err());
        assert!(international_phone("+20 123 456 7890").is_err());
    }

    #[test]
    fn optional_length_allows_empty() {
        assert!(optional_length("", 10, "too long").is_ok());
        assert!(optional_length("   ", 0, "too long").is_ok());
        assert!(optional_length("12345678901", 10, "too long").is_err());
    }

    #[test]
    fn padding_counts_the_same_for_both_length_rules() {
        let padded = "   abc   ";
        assert!(length(padded, 1, 3, "Code").is_ok());
        assert!(optional_length(padded, 3, "too long").is_ok());
        assert!(optional_length(" abcd ", 3, "too long").is_err());
    }
}
