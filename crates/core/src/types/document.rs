//! Digit-only registration fields (CPF and phone number).

use core::fmt;

use serde::{Deserialize, Serialize};

/// A string holding only ASCII digits, at most [`DigitString::MAX_LENGTH`] long.
///
/// Input is normalized the way the registration form does it: every
/// non-digit character is dropped and the result is cut at eleven digits,
/// so `"123.456.789-09"` becomes `"12345678909"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DigitString(String);

impl DigitString {
    /// Longest accepted value (CPF and mobile numbers both have 11 digits).
    pub const MAX_LENGTH: usize = 11;

    /// Keep the digits of `input`, capped at [`Self::MAX_LENGTH`].
    #[must_use]
    pub fn normalize(input: &str) -> Self {
        Self(
            input
                .chars()
                .filter(char::is_ascii_digit)
                .take(Self::MAX_LENGTH)
                .collect(),
        )
    }

    /// The digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether no digits were kept.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DigitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
