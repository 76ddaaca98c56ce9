// 💳 IBAN Account Entity - normalized value + field extraction
//
// Construction never fails: raw input is kept as given and a normalized
// (upper-case, alphanumeric-only) copy is derived once. Everything else
// (subfields, formatting, validation) reads the normalized copy.
//
// Problem solved:
// - "NL 58 abna 0000 0000 01" and "NL58ABNA0000000001" are the same account
// - Callers get either a yes/no answer or a typed reason to branch on
// - Subfields are available before (and regardless of) validation

use crate::checksum::check_checksum;
use crate::entities::country::FormatTable;
use crate::error::{ErrorKind, ValidationError};
use crate::normalize::normalize;
use crate::schema::{
    bban_of, check_structure_with, checksum_of, country_code_of, segment,
    BANK_ACCOUNT_NUMBER_OFFSET, INSTITUTE_IDENTIFICATION_LENGTH, INSTITUTE_IDENTIFICATION_OFFSET,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of the space-separated groups in the printed form
const PRINT_GROUP_WIDTH: usize = 4;

// ============================================================================
// IBAN ACCOUNT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct IbanAccount {
    /// Input exactly as the caller gave it
    raw: String,

    /// Electronic form: only [A-Z0-9]
    normalized: String,
}

impl IbanAccount {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized = normalize(&raw);
        IbanAccount { raw, normalized }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    // ========================================================================
    // FIELD EXTRACTION
    // ========================================================================

    /// First two characters (shorter if the input is)
    pub fn country_code(&self) -> &str {
        country_code_of(&self.normalized)
    }

    /// Characters 2..4
    pub fn checksum(&self) -> &str {
        checksum_of(&self.normalized)
    }

    /// Everything after the checksum, i.e. the BBAN
    pub fn account_identification(&self) -> &str {
        bban_of(&self.normalized)
    }

    /// First four characters of the BBAN
    pub fn institute_identification(&self) -> &str {
        segment(
            &self.normalized,
            INSTITUTE_IDENTIFICATION_OFFSET,
            Some(INSTITUTE_IDENTIFICATION_LENGTH),
        )
    }

    /// BBAN after the 4-character institute identification
    ///
    /// The length comes from the country rule (`bban_length - 4`), so an
    /// unsupported country is an error. The 4 + rest split is applied to
    /// every country alike, even where the national format differs.
    pub fn bank_account_number(&self) -> Result<&str, ValidationError> {
        self.bank_account_number_with(FormatTable::builtin())
    }

    /// Same as [`IbanAccount::bank_account_number`], against a caller-supplied table
    pub fn bank_account_number_with(&self, table: &FormatTable) -> Result<&str, ValidationError> {
        let rule = table.lookup(self.country_code()).ok_or_else(|| {
            ValidationError::new(ErrorKind::UnsupportedCountry, self.normalized.as_str())
        })?;

        let length = rule.bban_length.saturating_sub(INSTITUTE_IDENTIFICATION_LENGTH);
        Ok(segment(&self.normalized, BANK_ACCOUNT_NUMBER_OFFSET, Some(length)))
    }

    /// Printed form, e.g. "NL58 ABNA 0000 0000 01"
    ///
    /// For unsupported countries the bank account number part is everything
    /// after the institute identification.
    pub fn format(&self) -> String {
        self.format_with(FormatTable::builtin())
    }

    /// Printed form, with the bank account number length taken from `table`
    pub fn format_with(&self, table: &FormatTable) -> String {
        let bank_account_number = self
            .bank_account_number_with(table)
            .unwrap_or_else(|_| segment(&self.normalized, BANK_ACCOUNT_NUMBER_OFFSET, None));

        let groups: Vec<&str> = bank_account_number
            .as_bytes()
            .chunks(PRINT_GROUP_WIDTH)
            .filter_map(|chunk| std::str::from_utf8(chunk).ok())
            .collect();

        format!(
            "{}{} {} {}",
            self.country_code(),
            self.checksum(),
            self.institute_identification(),
            groups.join(" ")
        )
    }

    // ========================================================================
    // VALIDATION
    // ========================================================================

    /// Strict validation against the built-in table
    ///
    /// Country code, length, BBAN format, checksum, in that order. The first
    /// failing check is reported.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_with(FormatTable::builtin())
    }

    /// Strict validation against a caller-supplied table
    pub fn validate_with(&self, table: &FormatTable) -> Result<(), ValidationError> {
        let result = check_structure_with(&self.normalized, table)
            .map_err(|err| err.into_validation_error(&self.normalized))
            .and_then(|_rule| {
                if check_checksum(&self.normalized) {
                    Ok(())
                } else {
                    Err(ValidationError::new(
                        ErrorKind::InvalidChecksum,
                        self.normalized.as_str(),
                    ))
                }
            });

        match &result {
            Ok(()) => tracing::trace!(country = self.country_code(), "IBAN valid"),
            Err(err) => tracing::debug!(
                country = self.country_code(),
                kind = %err.kind(),
                "IBAN rejected"
            ),
        }

        result
    }

    /// Pass/fail only; use [`IbanAccount::validate`] for the reason
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<&str> for IbanAccount {
    fn from(raw: &str) -> Self {
        IbanAccount::new(raw)
    }
}

impl From<String> for IbanAccount {
    fn from(raw: String) -> Self {
        IbanAccount::new(raw)
    }
}

impl From<IbanAccount> for String {
    fn from(account: IbanAccount) -> Self {
        account.raw
    }
}

/// Parsing validates: only well-formed IBANs come out of `str::parse`
impl FromStr for IbanAccount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let account = IbanAccount::new(s);
        account.validate()?;
        Ok(account)
    }
}

/// Electronic form (no spaces)
impl fmt::Display for IbanAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

// ============================================================================
// TESTS
// ============================================================================
