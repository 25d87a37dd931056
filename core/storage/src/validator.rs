//! Storage name validation.

use regex::Regex;
use std::sync::LazyLock;

use redfs_common::{Error, Result, MAX_NAME_LEN, MIN_NAME_LEN, SHARED_STORAGE_NAME};

static NAME_RULE: LazyLock<Regex> = LazyLock::new(|| {
    let rule = format!("^[A-Za-z]{{{},{}}}$", MIN_NAME_LEN, MAX_NAME_LEN);
    Regex::new(&rule).expect("storage name rule is a valid regex")
});

/// Outcome of validating a requested storage name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Name can be granted.
    Accepted,
    /// Name is not 3 to 24 ASCII letters.
    InvalidSyntax,
    /// Name is the reserved shared storage name.
    Reserved,
}

impl Validation {
    /// Check if the name was accepted.
    pub fn is_accepted(&self) -> bool {
        *self == Validation::Accepted
    }

    /// Convert into a result, naming `name` in the error.
    pub fn into_result(self, name: &str) -> Result<()> {
        match self {
            Validation::Accepted => Ok(()),
            Validation::InvalidSyntax => Err(Error::InvalidName(name.to_string())),
            Validation::Reserved => Err(Error::ReservedName(name.to_string())),
        }
    }
}

/// Validate a requested storage name.
///
/// A name is accepted when it is made of 3 to 24 ASCII letters and is not,
/// in any casing, the reserved shared name.
pub fn validate(name: &str) -> Validation {
    if !NAME_RULE.is_match(name) {
        return Validation::InvalidSyntax;
    }
    if name.eq_ignore_ascii_case(SHARED_STORAGE_NAME) {
        return Validation::Reserved;
    }
    Validation::Accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_accepts_letters() {
        assert_eq!(validate("MyMod"), Validation::Accepted);
        assert_eq!(validate("abc"), Validation::Accepted);
        assert_eq!(validate("abcdefghijklmnopqrstuvwx"), Validation::Accepted);
    }

    #[test]
    fn test_rejects_length() {
        assert_eq!(validate(""), Validation::InvalidSyntax);
        assert_eq!(validate("ab"), Validation::InvalidSyntax);
        assert_eq!(validate("abcdefghijklmnopqrstuvwxy"), Validation::InvalidSyntax);
    }

    #[test]
    fn test_rejects_non_letters() {
        assert_eq!(validate("my_mod"), Validation::InvalidSyntax);
        assert_eq!(validate("mod42"), Validation::InvalidSyntax);
        assert_eq!(validate("../etc"), Validation::InvalidSyntax);
        assert_eq!(validate("my mod"), Validation::InvalidSyntax);
        assert_eq!(validate("modé"), Validation::InvalidSyntax);
        assert_eq!(validate("abc\n"), Validation::InvalidSyntax);
    }

    #[test]
    fn test_rejects_reserved() {
        assert_eq!(validate("shared"), Validation::Reserved);
        assert_eq!(validate("Shared"), Validation::Reserved);
        assert_eq!(validate("SHARED"), Validation::Reserved);
        assert_eq!(validate("sharedd"), Validation::Accepted);
    }

    #[test]
    fn test_into_result() {
        assert!(validate("MyMod").into_result("MyMod").is_ok());
        assert!(matches!(
            validate("ab").into_result("ab"),
            Err(Error::InvalidName(name)) if name == "ab"
        ));
        assert!(matches!(
            validate("shared").into_result("shared"),
            Err(Error::ReservedName(_))
        ));
    }

    proptest! {
        #[test]
        fn test_letters_accepted(name in "[A-Za-z]{3,24}") {
            prop_assume!(!name.eq_ignore_ascii_case(SHARED_STORAGE_NAME));
            prop_assert!(validate(&name).is_accepted());
        }

        #[test]
        fn test_other_strings_rejected(name in "\\PC{0,32}") {
            let letters_only = name.chars().all(|c| c.is_ascii_alphabetic());
            let len_ok = (MIN_NAME_LEN..=MAX_NAME_LEN).contains(&name.len());
            let reserved = name.eq_ignore_ascii_case(SHARED_STORAGE_NAME);
            prop_assume!(!(letters_only && len_ok && !reserved));
            prop_assert!(!validate(&name).is_accepted());
        }
    }
}
