//! EAN-13 barcodes for products registered in the back-office.

use crate::error::{PricingError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Digits before the check digit.
pub const PAYLOAD_LENGTH: usize = 12;

/// Computes the GS1 check digit for a 12-digit payload.
///
/// Digits in odd positions (counting from 1, left to right) weigh 1 and digits
/// in even positions weigh 3.
pub fn check_digit(payload: &str) -> Result<u8> {
    if payload.len() != PAYLOAD_LENGTH || !is_digits(payload) {
        return Err(PricingError::ValidationError(format!(
            "EAN-13 payload must be exactly {} digits, got '{}'",
            PAYLOAD_LENGTH, payload
        )));
    }

    let sum: u32 = payload
        .bytes()
        .enumerate()
        .map(|(index, byte)| {
            let digit = u32::from(byte - b'0');
            if index % 2 == 0 { digit } else { digit * 3 }
        })
        .sum();

    Ok(((10 - sum % 10) % 10) as u8)
}

fn is_digits(value: &str) -> bool {
    value.bytes().all(|byte| byte.is_ascii_digit())
}

/// A validated 13-digit EAN code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ean13(String);

impl Ean13 {
    /// Appends the check digit to a 12-digit payload.
    pub fn complete(payload: &str) -> Result<Self> {
        let digit = check_digit(payload)?;
        Ok(Self(format!("{}{}", payload, digit)))
    }

    /// Validates length, characters and check digit of a full code.
    pub fn parse(code: &str) -> Result<Self> {
        let code = code.trim();
        if code.len() != PAYLOAD_LENGTH + 1 || !is_digits(code) {
            return Err(PricingError::ValidationError(format!(
                "EAN-13 code must be exactly 13 digits, got '{}'",
                code
            )));
        }

        let (payload, check) = code.split_at(PAYLOAD_LENGTH);
        let expected = check_digit(payload)?;
        let actual: u8 = check.parse().map_err(|_| {
            PricingError::ValidationError(format!(
                "EAN-13 check digit is not a digit in '{}'",
                code
            ))
        })?;
        if actual != expected {
            return Err(PricingError::ValidationError(format!(
                "EAN-13 check digit mismatch for '{}': expected {}",
                code, expected
            )));
        }

        Ok(Self(code.to_string()))
    }

    /// Fills the digits after `prefix` at random and appends the check digit.
    pub fn generate<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> Result<Self> {
        let prefix = prefix.trim();
        if prefix.len() > PAYLOAD_LENGTH || !is_digits(prefix) {
            return Err(PricingError::ValidationError(format!(
                "EAN-13 prefix must be at most {} digits, got '{}'",
                PAYLOAD_LENGTH, prefix
            )));
        }

        let mut payload = String::with_capacity(PAYLOAD_LENGTH);
        payload.push_str(prefix);
        while payload.len() < PAYLOAD_LENGTH {
            let digit: u8 = rng.gen_range(0..10);
            payload.push(char::from(b'0' + digit));
        }

        Self::complete(&payload)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ean13 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ean13 {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Ean13 {
    type Error = PricingError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Ean13> for String {
    fn from(code: Ean13) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_check_digit_known_codes() {
        assert_eq!(check_digit("400638133393").unwrap(), 1);
        assert_eq!(check_digit("590123412345").unwrap(), 7);
        assert_eq!(check_digit("000000000000").unwrap(), 0);
    }

    #[test]
    fn test_check_digit_rejects_bad_payload() {
        assert!(matches!(
            check_digit("12345"),
            Err(PricingError::ValidationError(_))
        ));
        assert!(matches!(
            check_digit("40063813339X"),
            Err(PricingError::ValidationError(_))
        ));
    }

    #[test]
    fn test_complete_and_parse() {
        let code = Ean13::complete("400638133393").unwrap();
        assert_eq!(code.as_str(), "4006381333931");
        assert_eq!(Ean13::parse("4006381333931").unwrap(), code);
    }

    #[test]
    fn test_parse_rejects_wrong_check_digit() {
        assert!(Ean13::parse("4006381333932").is_err());
        assert!(Ean13::parse("400638133393").is_err());
    }

    #[test]
    fn test_parse_rejects_non_digit_check_position() {
        assert!(matches!(
            Ean13::parse("400638133393X"),
            Err(PricingError::ValidationError(_))
        ));
        assert!(matches!(
            Ean13::parse("400638133393+"),
            Err(PricingError::ValidationError(_))
        ));
    }

    #[test]
    fn test_generate_keeps_prefix_and_validates() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let code = Ean13::generate("789", &mut rng).unwrap();
            assert!(code.as_str().starts_with("789"));
            assert_eq!(code.as_str().len(), 13);
            assert!(Ean13::parse(code.as_str()).is_ok());
        }
    }

    #[test]
    fn test_generate_rejects_long_prefix() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(Ean13::generate("1234567890123", &mut rng).is_err());
    }

    #[test]
    fn test_serde_validates() {
        let code: Ean13 = serde_json::from_str("\"5901234123457\"").unwrap();
        assert_eq!(code.to_string(), "5901234123457");
        assert!(serde_json::from_str::<Ean13>("\"5901234123450\"").is_err());
    }
}
