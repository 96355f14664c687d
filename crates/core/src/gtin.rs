//! GTIN-13 (EAN-13) identifiers and check-digit computation.
//!
//! A GTIN-13 is a 12-digit payload plus one check digit. The check digit is
//! always derived here — callers never supply the 13th digit themselves.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A validated 13-digit GTIN with a correct check digit.
///
/// Construction goes through [`Gtin13::from_partial`] (derive the check digit
/// from a 12-digit payload) or [`Gtin13::from_str`] (re-admit a full GTIN-13
/// that was produced by this system, e.g. read back from storage).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gtin13(String);

impl Gtin13 {
    /// Derive a GTIN-13 from a 12-digit payload.
    ///
    /// Input longer than 12 characters is truncated to its first 12; length
    /// validation for the caller's use case happens upstream. The (truncated)
    /// payload must be exactly 12 ASCII digits.
    pub fn from_partial(input: &str) -> DomainResult<Self> {
        let payload = match input.char_indices().nth(12) {
            Some((idx, _)) => &input[..idx],
            None => input,
        };

        if payload.len() != 12 || !payload.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::validation(
                "GTIN-12 must be exactly 12 digits long",
            ));
        }

        let mut full = String::with_capacity(13);
        full.push_str(payload);
        full.push(char::from(b'0' + check_digit(payload.as_bytes())));
        Ok(Self(full))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 12-digit payload without the check digit.
    pub fn payload(&self) -> &str {
        &self.0[..12]
    }
}

impl core::fmt::Display for Gtin13 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Gtin13 {
    type Err = DomainError;

    /// Accept a full 13-digit GTIN whose check digit is consistent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 13 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::validation(
                "GTIN-13 must be exactly 13 digits long",
            ));
        }
        let expected = b'0' + check_digit(&s.as_bytes()[..12]);
        if s.as_bytes()[12] != expected {
            return Err(DomainError::validation("GTIN-13 check digit mismatch"));
        }
        Ok(Self(s.to_string()))
    }
}

/// GS1 check digit for a 12-digit payload.
///
/// Digits at even 0-based positions are summed unweighted, digits at odd
/// positions are summed and tripled; the check digit brings the grand total
/// up to the next multiple of ten.
fn check_digit(payload: &[u8]) -> u8 {
    debug_assert_eq!(payload.len(), 12);

    let mut odd = 0u32;
    let mut even = 0u32;
    for (i, b) in payload.iter().enumerate() {
        let digit = u32::from(b - b'0');
        if i % 2 == 0 {
            odd += digit;
        } else {
            even += digit;
        }
    }
    ((10 - ((odd + 3 * even) % 10)) % 10) as u8
}
