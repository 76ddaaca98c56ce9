// ❌ Validation Errors - one variant per failed check
// Structural checks first (country, length, format), checksum last

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// ERROR KIND
// ============================================================================

/// Discriminant of a [`ValidationError`], cheap to copy, count and serialize
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    UnsupportedCountry,
    InvalidLength,
    InvalidFormat,
    InvalidChecksum,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnsupportedCountry => "UnsupportedCountry",
            ErrorKind::InvalidLength => "InvalidLength",
            ErrorKind::InvalidFormat => "InvalidFormat",
            ErrorKind::InvalidChecksum => "InvalidChecksum",
        }
    }

    /// Reason text shared by both message shapes
    pub fn reason(&self) -> &'static str {
        match self {
            ErrorKind::UnsupportedCountry => "country code not valid or not supported",
            ErrorKind::InvalidLength => "length is invalid",
            ErrorKind::InvalidFormat => "format is invalid",
            ErrorKind::InvalidChecksum => "checksum is invalid",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// Why an IBAN was rejected. `input` is the normalized IBAN.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("IBAN ({input}) country code not valid or not supported")]
    UnsupportedCountry { input: String },

    #[error("IBAN ({input}) length is invalid")]
    InvalidLength { input: String },

    #[error("IBAN ({input}) format is invalid")]
    InvalidFormat { input: String },

    #[error("IBAN ({input}) checksum is invalid")]
    InvalidChecksum { input: String },
}

impl ValidationError {
    pub fn new(kind: ErrorKind, input: impl Into<String>) -> Self {
        let input = input.into();
        match kind {
            ErrorKind::UnsupportedCountry => ValidationError::UnsupportedCountry { input },
            ErrorKind::InvalidLength => ValidationError::InvalidLength { input },
            ErrorKind::InvalidFormat => ValidationError::InvalidFormat { input },
            ErrorKind::InvalidChecksum => ValidationError::InvalidChecksum { input },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::UnsupportedCountry { .. } => ErrorKind::UnsupportedCountry,
            ValidationError::InvalidLength { .. } => ErrorKind::InvalidLength,
            ValidationError::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            ValidationError::InvalidChecksum { .. } => ErrorKind::InvalidChecksum,
        }
    }

    pub fn input(&self) -> &str {
        match self {
            ValidationError::UnsupportedCountry { input }
            | ValidationError::InvalidLength { input }
            | ValidationError::InvalidFormat { input }
            | ValidationError::InvalidChecksum { input } => input,
        }
    }

    /// Short diagnostic without the input, e.g. "IBAN length is invalid"
    pub fn reason(&self) -> String {
        format!("IBAN {}", self.kind().reason())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_embeds_input() {
        let err = ValidationError::new(ErrorKind::UnsupportedCountry, "BK561910000001234383");
        assert_eq!(
            err.to_string(),
            "IBAN (BK561910000001234383) country code not valid or not supported"
        );

        let err = ValidationError::new(ErrorKind::InvalidChecksum, "AA00000000000000");
        assert_eq!(err.to_string(), "IBAN (AA00000000000000) checksum is invalid");
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            ErrorKind::UnsupportedCountry,
            ErrorKind::InvalidLength,
            ErrorKind::InvalidFormat,
            ErrorKind::InvalidChecksum,
        ] {
            let err = ValidationError::new(kind, "X");
            assert_eq!(err.kind(), kind);
            assert_eq!(err.input(), "X");
        }
    }

    #[test]
    fn test_reason() {
        let err = ValidationError::new(ErrorKind::InvalidLength, "AL472121100900000002356987410");
        assert_eq!(err.reason(), "IBAN length is invalid");
        assert_eq!(ErrorKind::InvalidFormat.reason(), "format is invalid");
    }

    #[test]
    fn test_kind_serializes_as_name() {
        let json = serde_json::to_string(&ErrorKind::InvalidFormat).unwrap();
        assert_eq!(json, "\"InvalidFormat\"");
    }
}
