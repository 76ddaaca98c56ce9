// IBAN Validator - Core Library
// Normalizes, validates (ISO 13616 structure + ISO 7064 mod-97) and
// decomposes International Bank Account Numbers.

pub mod normalize;      // Normalizer: raw input → [A-Z0-9]
pub mod entities;       // Country format rules + IbanAccount
pub mod schema;         // Shape Layer: offsets + structural validation
pub mod checksum;       // mod-97-10
pub mod error;          // ValidationError / ErrorKind
pub mod batch;          // Batch validation + CSV input

// Re-export commonly used types
pub use normalize::{normalize, is_normalized};
pub use entities::{
    IbanAccount,
    CountryFormatRule, BbanGroup, CharClass, FormatTable, RuleError,
    lookup, supported_countries,
};
pub use schema::{StructuralError, check_structure, check_structure_with};
pub use checksum::{check_checksum, compute_check_digits, mod97, numeric_representation};
pub use error::{ErrorKind, ValidationError};
pub use batch::{
    BatchValidator, BatchReport, BatchEntry,
    load_csv, load_csv_path,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
