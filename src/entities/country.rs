// 🌍 Country Format Entity - BBAN structure per country
// One immutable rule per IBAN country code, from the ISO 13616 registry snapshot
//
// A rule says how long the BBAN (everything after "CCkk") must be and which
// character class each fixed-width group of it must hold:
// - NL → 4!a10!n   (ABNA 0000000001)
// - FR → 5!n5!n11!c2!n
// - AA → 12!c      (generic test format)

use crate::schema::PREFIX_LENGTH;
use anyhow::{Context as AnyhowContext, Result};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// CHARACTER CLASS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharClass {
    /// Digits only: [0-9]  (ISO "n")
    Numeric,

    /// Upper-case letters only: [A-Z]  (ISO "a")
    Alpha,

    /// Upper-case letters and digits: [A-Z0-9]  (ISO "c")
    Alphanumeric,
}

impl CharClass {
    /// Lower-case letters are rejected on purpose, the matcher only ever sees
    /// normalized input.
    pub fn accepts(&self, byte: u8) -> bool {
        match self {
            CharClass::Numeric => byte.is_ascii_digit(),
            CharClass::Alpha => byte.is_ascii_uppercase(),
            CharClass::Alphanumeric => byte.is_ascii_digit() || byte.is_ascii_uppercase(),
        }
    }

    pub fn iso_code(&self) -> char {
        match self {
            CharClass::Numeric => 'n',
            CharClass::Alpha => 'a',
            CharClass::Alphanumeric => 'c',
        }
    }
}

// ============================================================================
// BBAN GROUP
// ============================================================================

/// Fixed-width run of characters of a single class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BbanGroup {
    pub class: CharClass,
    pub width: usize,
}

impl BbanGroup {
    pub fn new(class: CharClass, width: usize) -> Self {
        BbanGroup { class, width }
    }
}

impl fmt::Display for BbanGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.width, self.class.iso_code())
    }
}

// ============================================================================
// COUNTRY FORMAT RULE
// ============================================================================

/// Longest BBAN the IBAN standard allows (34 characters minus "CCkk")
pub const MAX_BBAN_LENGTH: usize = 30;

/// Structural rule for one IBAN country
///
/// Built-in rules borrow `'static` data; rules loaded from JSON own theirs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryFormatRule {
    /// ISO 3166 alpha-2 code (e.g., "NL"), upper-case
    pub country_code: Cow<'static, str>,

    /// Length of the BBAN, i.e. the IBAN minus its 4-character prefix
    pub bban_length: usize,

    /// Ordered groups the BBAN must match, left to right
    pub structure: Cow<'static, [BbanGroup]>,
}

impl CountryFormatRule {
    pub fn new(
        country_code: impl Into<String>,
        bban_length: usize,
        structure: Vec<BbanGroup>,
    ) -> Self {
        CountryFormatRule {
            country_code: Cow::Owned(country_code.into()),
            bban_length,
            structure: Cow::Owned(structure),
        }
    }

    /// Full IBAN length: country code + checksum + BBAN
    pub fn iban_length(&self) -> usize {
        self.bban_length.saturating_add(PREFIX_LENGTH)
    }

    /// Sum of all group widths (equals `bban_length` for a consistent rule)
    ///
    /// Saturates instead of overflowing on unverified rules.
    pub fn structure_length(&self) -> usize {
        self.checked_structure_length().unwrap_or(usize::MAX)
    }

    fn checked_structure_length(&self) -> Option<usize> {
        self.structure
            .iter()
            .try_fold(0usize, |total, g| total.checked_add(g.width))
    }

    /// Anchored match of the whole BBAN against the group sequence
    pub fn matches_bban(&self, bban: &str) -> bool {
        let bytes = bban.as_bytes();
        if bytes.len() != self.structure_length() {
            return false;
        }

        let mut offset = 0;
        for group in self.structure.iter() {
            let chunk = &bytes[offset..offset + group.width];
            if !chunk.iter().all(|&b| group.class.accepts(b)) {
                return false;
            }
            offset += group.width;
        }

        true
    }

    /// Check the rule is internally consistent
    pub fn verify(&self) -> std::result::Result<(), RuleError> {
        let code: &str = &self.country_code;
        if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(RuleError::InvalidCountryCode(code.to_string()));
        }

        if self.structure.iter().any(|g| g.width == 0) {
            return Err(RuleError::ZeroWidthGroup(code.to_string()));
        }

        if self.bban_length > MAX_BBAN_LENGTH
            || self.structure.iter().any(|g| g.width > MAX_BBAN_LENGTH)
        {
            return Err(RuleError::TooLong {
                country: code.to_string(),
                limit: MAX_BBAN_LENGTH,
            });
        }

        let structure_length = self
            .checked_structure_length()
            .filter(|&length| length <= MAX_BBAN_LENGTH)
            .ok_or_else(|| RuleError::TooLong {
                country: code.to_string(),
                limit: MAX_BBAN_LENGTH,
            })?;
        if structure_length != self.bban_length {
            return Err(RuleError::LengthMismatch {
                country: code.to_string(),
                declared: self.bban_length,
                structure: structure_length,
            });
        }

        Ok(())
    }
}

/// ISO registry notation, e.g. "4!a10!n"
impl fmt::Display for CountryFormatRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in self.structure.iter() {
            write!(f, "{}", group)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("country code '{0}' must be two upper-case letters")]
    InvalidCountryCode(String),

    #[error("rule {0} contains a zero-width group")]
    ZeroWidthGroup(String),

    #[error("rule {country} spans more than {limit} BBAN characters")]
    TooLong { country: String, limit: usize },

    #[error("rule {country} declares BBAN length {declared} but its structure spans {structure}")]
    LengthMismatch {
        country: String,
        declared: usize,
        structure: usize,
    },
}

// ============================================================================
// BUILT-IN REGISTRY DATA
// ============================================================================

macro_rules! group {
    (n $w:literal) => {
        BbanGroup { class: CharClass::Numeric, width: $w }
    };
    (a $w:literal) => {
        BbanGroup { class: CharClass::Alpha, width: $w }
    };
    (c $w:literal) => {
        BbanGroup { class: CharClass::Alphanumeric, width: $w }
    };
}

macro_rules! rule {
    ($code:literal, $len:literal, [$($class:ident $w:literal),+ $(,)?]) => {
        CountryFormatRule {
            country_code: Cow::Borrowed($code),
            bban_length: $len,
            structure: Cow::Borrowed(&[$(group!($class $w)),+]),
        }
    };
}

/// Number of countries in the compiled-in registry snapshot
pub const BUILTIN_RULE_COUNT: usize = 99;

static BUILTIN_RULES: [CountryFormatRule; BUILTIN_RULE_COUNT] = [
    rule!("AA", 12, [c 12]),
    rule!("AD", 20, [n 4, n 4, c 12]),
    rule!("AE", 19, [n 3, n 16]),
    rule!("AL", 24, [n 8, c 16]),
    rule!("AO", 21, [n 21]),
    rule!("AT", 16, [n 5, n 11]),
    rule!("AX", 14, [n 6, n 7, n 1]),
    rule!("AZ", 24, [a 4, c 20]),
    rule!("BA", 16, [n 3, n 3, n 8, n 2]),
    rule!("BE", 12, [n 3, n 7, n 2]),
    rule!("BF", 23, [n 23]),
    rule!("BG", 18, [a 4, n 4, n 2, c 8]),
    rule!("BH", 18, [a 4, c 14]),
    rule!("BI", 12, [n 12]),
    rule!("BJ", 24, [a 1, n 23]),
    rule!("BL", 23, [n 5, n 5, c 11, n 2]),
    rule!("BR", 25, [n 8, n 5, n 10, a 1, c 1]),
    rule!("CH", 17, [n 5, c 12]),
    rule!("CI", 24, [a 1, n 23]),
    rule!("CM", 23, [n 23]),
    rule!("CR", 17, [n 4, n 13]),
    rule!("CV", 21, [n 21]),
    rule!("CY", 24, [n 3, n 5, c 16]),
    rule!("CZ", 20, [n 4, n 6, n 10]),
    rule!("DE", 18, [n 8, n 10]),
    rule!("DK", 14, [n 4, n 9, n 1]),
    rule!("DO", 24, [c 4, n 20]),
    rule!("DZ", 20, [n 20]),
    rule!("EE", 16, [n 2, n 2, n 11, n 1]),
    rule!("ES", 20, [n 4, n 4, n 1, n 1, n 10]),
    rule!("FI", 14, [n 6, n 7, n 1]),
    rule!("FO", 14, [n 4, n 9, n 1]),
    rule!("FR", 23, [n 5, n 5, c 11, n 2]),
    rule!("GB", 18, [a 4, n 6, n 8]),
    rule!("GE", 18, [a 2, n 16]),
    rule!("GF", 23, [n 5, n 5, c 11, n 2]),
    rule!("GI", 19, [a 4, c 15]),
    rule!("GL", 14, [n 4, n 9, n 1]),
    rule!("GP", 23, [n 5, n 5, c 11, n 2]),
    rule!("GR", 23, [n 3, n 4, c 16]),
    rule!("GT", 24, [c 4, c 20]),
    rule!("HR", 17, [n 7, n 10]),
    rule!("HU", 24, [n 3, n 4, n 1, n 15, n 1]),
    rule!("IE", 18, [a 4, n 6, n 8]),
    rule!("IL", 19, [n 3, n 3, n 13]),
    rule!("IR", 22, [n 22]),
    rule!("IS", 22, [n 4, n 2, n 6, n 10]),
    rule!("IT", 23, [a 1, n 5, n 5, c 12]),
    rule!("JO", 26, [a 4, n 4, c 18]),
    rule!("KW", 26, [a 4, c 22]),
    rule!("KZ", 16, [n 3, c 13]),
    rule!("LB", 24, [n 4, c 20]),
    rule!("LC", 28, [a 4, c 24]),
    rule!("LI", 17, [n 5, c 12]),
    rule!("LT", 16, [n 5, n 11]),
    rule!("LU", 16, [n 3, c 13]),
    rule!("LV", 17, [a 4, c 13]),
    rule!("MC", 23, [n 5, n 5, c 11, n 2]),
    rule!("MD", 20, [c 2, c 18]),
    rule!("ME", 18, [n 3, n 13, n 2]),
    rule!("MF", 23, [n 5, n 5, c 11, n 2]),
    rule!("MG", 23, [n 23]),
    rule!("MK", 15, [n 3, c 10, n 2]),
    rule!("ML", 24, [a 1, n 23]),
    rule!("MQ", 23, [n 5, n 5, c 11, n 2]),
    rule!("MR", 23, [n 5, n 5, n 11, n 2]),
    rule!("MT", 27, [a 4, n 5, c 18]),
    rule!("MU", 26, [a 4, n 2, n 2, n 12, n 3, a 3]),
    rule!("MZ", 21, [n 21]),
    rule!("NC", 23, [n 5, n 5, c 11, n 2]),
    rule!("NL", 14, [a 4, n 10]),
    rule!("NO", 11, [n 4, n 6, n 1]),
    rule!("PF", 23, [n 5, n 5, c 11, n 2]),
    rule!("PK", 20, [a 4, c 16]),
    rule!("PL", 24, [n 8, n 16]),
    rule!("PM", 23, [n 5, n 5, c 11, n 2]),
    rule!("PS", 25, [a 4, c 21]),
    rule!("PT", 21, [n 4, n 4, n 11, n 2]),
    rule!("QA", 25, [a 4, n 4, c 17]),
    rule!("RE", 23, [n 5, n 5, c 11, n 2]),
    rule!("RO", 20, [a 4, c 16]),
    rule!("RS", 18, [n 3, n 13, n 2]),
    rule!("SA", 20, [n 2, c 18]),
    rule!("SC", 27, [a 4, n 4, n 16, a 3]),
    rule!("SE", 20, [n 3, n 16, n 1]),
    rule!("SI", 15, [n 5, n 8, n 2]),
    rule!("SK", 20, [n 4, n 6, n 10]),
    rule!("SM", 23, [a 1, n 5, n 5, c 12]),
    rule!("SN", 24, [a 1, n 23]),
    rule!("ST", 21, [n 8, n 11, n 2]),
    rule!("TF", 23, [n 5, n 5, c 11, n 2]),
    rule!("TL", 19, [n 3, n 14, n 2]),
    rule!("TN", 20, [n 2, n 3, n 13, n 2]),
    rule!("TR", 22, [n 5, n 1, c 16]),
    rule!("UA", 25, [n 6, c 19]),
    rule!("VG", 20, [a 4, n 16]),
    rule!("WF", 23, [n 5, n 5, c 11, n 2]),
    rule!("XK", 16, [n 4, n 10, n 2]),
    rule!("YT", 23, [n 5, n 5, c 11, n 2]),
];

lazy_static! {
    static ref BUILTIN_TABLE: FormatTable = FormatTable::index(BUILTIN_RULES.iter().cloned());
}

// ============================================================================
// FORMAT TABLE
// ============================================================================

/// Country code → rule lookup
///
/// The built-in table is process-wide and read-only. Custom tables (for
/// tracking registry updates ahead of a release) are ordinary values.
#[derive(Debug, Clone)]
pub struct FormatTable {
    rules: HashMap<String, CountryFormatRule>,
}

impl FormatTable {
    fn index(rules: impl IntoIterator<Item = CountryFormatRule>) -> Self {
        FormatTable {
            rules: rules
                .into_iter()
                .map(|rule| (rule.country_code.to_string(), rule))
                .collect(),
        }
    }

    /// The compiled-in registry snapshot
    pub fn builtin() -> &'static FormatTable {
        &BUILTIN_TABLE
    }

    /// Build a table from scratch, verifying every rule
    pub fn from_rules(rules: Vec<CountryFormatRule>) -> std::result::Result<Self, RuleError> {
        for rule in &rules {
            rule.verify()?;
        }

        let table = FormatTable::index(rules);
        tracing::debug!(rules = table.len(), "format table built");
        Ok(table)
    }

    /// Parse a JSON array of rules
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rules: Vec<CountryFormatRule> =
            serde_json::from_str(json).context("Failed to parse format rules JSON")?;

        FormatTable::from_rules(rules).context("Invalid format rule")
    }

    /// Load rules from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read format rules file: {:?}", path.as_ref()))?;

        FormatTable::from_json_str(&content)
    }

    /// Layer `rules` on top of this table, replacing same-country entries
    pub fn with_overrides(
        mut self,
        rules: Vec<CountryFormatRule>,
    ) -> std::result::Result<Self, RuleError> {
        for rule in rules {
            rule.verify()?;
            tracing::debug!(country = %rule.country_code, format = %rule, "format rule override");
            self.rules.insert(rule.country_code.to_string(), rule);
        }
        Ok(self)
    }

    pub fn lookup(&self, country_code: &str) -> Option<&CountryFormatRule> {
        self.rules.get(country_code)
    }

    pub fn contains(&self, country_code: &str) -> bool {
        self.rules.contains_key(country_code)
    }

    /// Supported country codes, sorted
    pub fn countries(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.rules.keys().map(|k| k.as_str()).collect();
        codes.sort_unstable();
        codes
    }

    pub fn rules(&self) -> impl Iterator<Item = &CountryFormatRule> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for FormatTable {
    fn default() -> Self {
        FormatTable::builtin().clone()
    }
}

/// Look a country up in the built-in table
pub fn lookup(country_code: &str) -> Option<&'static CountryFormatRule> {
    BUILTIN_TABLE.lookup(country_code)
}

/// Country codes of the built-in table, sorted
pub fn supported_countries() -> Vec<&'static str> {
    BUILTIN_TABLE.countries()
}

// ============================================================================
// TESTS
// ============================================================================
