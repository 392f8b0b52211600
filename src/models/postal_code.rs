//! Brazilian postal code (CEP) model

use std::fmt;

use serde::Serialize;

use crate::{CepWeatherError, Result};

/// Number of digits in a CEP
pub const POSTAL_CODE_LEN: usize = 8;

/// A postal code that is exactly eight ASCII decimal digits
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    /// Parse raw query input.
    ///
    /// No normalization is applied: `01001-000` and ` 01001000` are rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.len() == POSTAL_CODE_LEN && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(CepWeatherError::invalid_postal_code(raw))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PostalCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("01001000")]
    #[case("99999999")]
    #[case("00000000")]
    fn test_valid_postal_codes(#[case] raw: &str) {
        let cep = PostalCode::parse(raw).unwrap();
        assert_eq!(cep.as_str(), raw);
        assert_eq!(cep.to_string(), raw);
    }

    #[rstest]
    #[case("123")]
    #[case("0100100")]
    #[case("010010000")]
    #[case("01001-000")]
    #[case("0100100a")]
    #[case(" 1001000")]
    #[case("01001000\n")]
    #[case("０１００１０００")]
    fn test_invalid_postal_codes(#[case] raw: &str) {
        let err = PostalCode::parse(raw).unwrap_err();
        assert!(matches!(err, CepWeatherError::InvalidPostalCode { .. }));
    }
}
