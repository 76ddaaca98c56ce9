// Entity Models
//
// - country: one immutable BBAN structure rule per IBAN country + the lookup table
// - iban:    an account number as given, its normalized form and its subfields

pub mod country;
pub mod iban;

pub use country::{
    lookup, supported_countries, BbanGroup, CharClass, CountryFormatRule, FormatTable, RuleError,
    BUILTIN_RULE_COUNT, MAX_BBAN_LENGTH,
};
pub use iban::IbanAccount;
