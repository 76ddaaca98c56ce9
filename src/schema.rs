// 📐 Shape Layer - IBAN structure
// Fixed offsets of the IBAN subfields + structural validation against the format table
//
// CCkkBBBBBBBBBBBBBB
// ││││└─ BBAN / account identification (offset 4..)
// ││└┴── checksum (offset 2..4)
// └┴──── country code (offset 0..2)

use crate::entities::country::{CountryFormatRule, FormatTable};
use crate::error::{ErrorKind, ValidationError};
use thiserror::Error;

// ============================================================================
// SEMANTIC STRUCTURE CONSTANTS
// ============================================================================

pub const COUNTRY_CODE_OFFSET: usize = 0;
pub const COUNTRY_CODE_LENGTH: usize = 2;
pub const CHECKSUM_OFFSET: usize = 2;
pub const CHECKSUM_LENGTH: usize = 2;
pub const ACCOUNT_IDENTIFICATION_OFFSET: usize = 4;
pub const INSTITUTE_IDENTIFICATION_OFFSET: usize = 4;
pub const INSTITUTE_IDENTIFICATION_LENGTH: usize = 4;
pub const BANK_ACCOUNT_NUMBER_OFFSET: usize = 8;

/// Country code + checksum
pub const PREFIX_LENGTH: usize = COUNTRY_CODE_LENGTH + CHECKSUM_LENGTH;

/// Clamped slice of an ASCII string: never panics, short input yields
/// whatever is there (possibly "").
pub fn segment(s: &str, offset: usize, length: Option<usize>) -> &str {
    let start = offset.min(s.len());
    let end = match length {
        Some(length) => start.saturating_add(length).min(s.len()),
        None => s.len(),
    };
    s.get(start..end).unwrap_or("")
}

pub fn country_code_of(normalized: &str) -> &str {
    segment(normalized, COUNTRY_CODE_OFFSET, Some(COUNTRY_CODE_LENGTH))
}

pub fn checksum_of(normalized: &str) -> &str {
    segment(normalized, CHECKSUM_OFFSET, Some(CHECKSUM_LENGTH))
}

pub fn bban_of(normalized: &str) -> &str {
    segment(normalized, ACCOUNT_IDENTIFICATION_OFFSET, None)
}

// ============================================================================
// STRUCTURAL ERROR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("country code '{0}' not valid or not supported")]
    UnsupportedCountry(String),

    #[error("length {actual} does not match expected length {expected}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("BBAN does not match structure {expected}")]
    InvalidFormat { expected: String },
}

impl StructuralError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StructuralError::UnsupportedCountry(_) => ErrorKind::UnsupportedCountry,
            StructuralError::InvalidLength { .. } => ErrorKind::InvalidLength,
            StructuralError::InvalidFormat { .. } => ErrorKind::InvalidFormat,
        }
    }

    /// Attach the offending input
    pub fn into_validation_error(self, input: &str) -> ValidationError {
        ValidationError::new(self.kind(), input)
    }
}

// ============================================================================
// STRUCTURAL VALIDATOR
// ============================================================================

/// Structural check against the built-in table
///
/// On success returns the matching rule so the checksum stage can reuse it.
pub fn check_structure(normalized: &str) -> Result<&'static CountryFormatRule, StructuralError> {
    check_structure_with(normalized, FormatTable::builtin())
}

/// Country, then length, then BBAN pattern. The first failing check wins.
pub fn check_structure_with<'t>(
    normalized: &str,
    table: &'t FormatTable,
) -> Result<&'t CountryFormatRule, StructuralError> {
    let country_code = country_code_of(normalized);

    let rule = table
        .lookup(country_code)
        .ok_or_else(|| StructuralError::UnsupportedCountry(country_code.to_string()))?;

    if normalized.len() != rule.iban_length() {
        return Err(StructuralError::InvalidLength {
            expected: rule.iban_length(),
            actual: normalized.len(),
        });
    }

    if !rule.matches_bban(bban_of(normalized)) {
        return Err(StructuralError::InvalidFormat {
            expected: rule.to_string(),
        });
    }

    Ok(rule)
}

// ============================================================================
// TESTS
// ============================================================================
