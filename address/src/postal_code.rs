//! CEP normalization, validation and display formatting.

use crate::constants::{CEP_DIGITS, CEP_PREFIX_DIGITS};
use crate::error::LookupError;

/// Digit-only form of `input`.
#[must_use]
pub fn digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// True iff `input` has exactly 8 digits once non-digits are stripped.
#[must_use]
pub fn validate(input: &str) -> bool {
    digits(input).len() == CEP_DIGITS
}

/// Cosmetic display form of whatever the user typed.
///
/// Strips non-digits and inserts `-` after the fifth digit once there are
/// more than five. Never rejects; lengths other than 8 pass through.
///
/// ```
/// use vitrine_address::postal_code::format;
///
/// assert_eq!(format("01310100"), "01310-100");
/// assert_eq!(format("013"), "013");
/// ```
#[must_use]
pub fn format(input: &str) -> String {
    let digits = digits(input);
    if digits.len() > CEP_PREFIX_DIGITS {
        let (prefix, suffix) = digits.split_at(CEP_PREFIX_DIGITS);
        format!("{prefix}-{suffix}")
    } else {
        digits
    }
}

/// A validated CEP: exactly 8 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostalCode(String);

impl PostalCode {
    /// Normalize and validate raw input.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidFormat`] unless 8 digits remain after
    /// stripping everything else.
    pub fn parse(input: &str) -> Result<Self, LookupError> {
        let digits = digits(input);
        if digits.len() == CEP_DIGITS {
            Ok(Self(digits))
        } else {
            Err(LookupError::InvalidFormat)
        }
    }

    /// The 8 digits, as sent to the provider.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PostalCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (prefix, suffix) = self.0.split_at(CEP_PREFIX_DIGITS);
        write!(f, "{prefix}-{suffix}")
    }
}

impl std::str::FromStr for PostalCode {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_inserts_hyphen_after_fifth_digit() {
        assert_eq!(format("01310100"), "01310-100");
        assert_eq!(format("013101"), "01310-1");
        assert_eq!(format("01310"), "01310");
        assert_eq!(format(""), "");
    }

    #[test]
    fn test_format_strips_non_digits() {
        assert_eq!(format("01.310-100"), "01310-100");
        assert_eq!(format(" 01310 100 "), "01310-100");
        assert_eq!(format("abc"), "");
    }

    #[test]
    fn test_format_keeps_overlong_input() {
        assert_eq!(format("0131010099"), "01310-10099");
        assert!(!validate(&format("0131010099")));
    }

    #[test]
    fn test_validate_counts_digits_only() {
        assert!(validate("01310-100"));
        assert!(validate("01310100"));
        assert!(!validate("123"));
        assert!(!validate("013101000"));
        assert!(!validate("0131a100"));
    }

    #[test]
    fn test_non_ascii_digits_are_not_digits() {
        assert!(!validate("٠١٣١٠١٠٠"));
    }

    #[test]
    fn test_postal_code_parse_and_display() {
        let code = PostalCode::parse("01310-100");
        assert_eq!(code.as_ref().map(PostalCode::digits), Ok("01310100"));
        assert_eq!(code.map(|c| c.to_string()), Ok("01310-100".to_string()));
        assert_eq!("123".parse::<PostalCode>(), Err(LookupError::InvalidFormat));
    }
}
