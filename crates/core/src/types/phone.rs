//! Phone number types.
//!
//! Two levels of validation exist at checkout: the contact step accepts any
//! international number ([`PhoneNumber`]), while Telebirr payments require
//! an Ethiopian mobile number with the country code ([`TelebirrNumber`]).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a phone number.
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// Too few or too many digits after stripping formatting.
    #[error("phone number must have {min}-{max} digits (got {got})")]
    DigitCount {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
        /// Digits found in the input.
        got: usize,
    },
    /// Not a valid Ethiopian Telebirr number.
    #[error("expected an Ethiopian phone number: +251 followed by 9 digits")]
    NotEthiopian,
}

/// An international phone number.
///
/// Formatting characters (spaces, dashes, dots, parentheses) are stripped;
/// what remains must be 10-15 digits, optionally prefixed with `+`. The
/// original input is preserved for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Minimum digits in a valid phone number.
    pub const MIN_DIGITS: usize = 10;
    /// Maximum digits in a valid phone number (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or does not contain 10-15
    /// digits after formatting characters are removed.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.trim().is_empty() {
            return Err(PhoneError::Empty);
        }

        let digits = s.chars().filter(char::is_ascii_digit).count();
        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits) {
            return Err(PhoneError::DigitCount {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
                got: digits,
            });
        }

        Ok(Self(s.trim().to_owned()))
    }

    /// Returns the phone number as entered (trimmed).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns only the digits of the number.
    #[must_use]
    pub fn digits(&self) -> String {
        self.0.chars().filter(char::is_ascii_digit).collect()
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// An Ethiopian mobile number usable for Telebirr payments.
///
/// Must be `+251` (the `+` is optional) followed by exactly 9 digits, e.g.
/// `+251912345678`. Numbers without the country code are rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TelebirrNumber(String);

impl TelebirrNumber {
    /// Digits of the subscriber number after the country code.
    pub const SUBSCRIBER_DIGITS: usize = 9;

    /// Parse a `TelebirrNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::Empty`] for blank input and
    /// [`PhoneError::NotEthiopian`] when the number is not `+251` followed
    /// by exactly 9 digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }

        let rest = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let subscriber = rest.strip_prefix("251").ok_or(PhoneError::NotEthiopian)?;

        if subscriber.len() != Self::SUBSCRIBER_DIGITS
            || !subscriber.chars().all(|c| c.is_ascii_digit())
        {
            return Err(PhoneError::NotEthiopian);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TelebirrNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TelebirrNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
