// 📦 Batch Validation - many IBANs, one report
// Validates a list (typically a CSV column from an import file) and summarizes
// how many passed and why the rest failed.

use crate::entities::{FormatTable, IbanAccount};
use crate::error::ErrorKind;
use anyhow::{anyhow, Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

// ============================================================================
// BATCH ENTRY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    /// Input as read
    pub input: String,

    /// Electronic form
    pub normalized: String,

    pub valid: bool,

    /// Failure kind (None when valid)
    pub error: Option<ErrorKind>,

    /// Full diagnostic (None when valid)
    pub message: Option<String>,

    /// Printed form, only for valid entries
    pub formatted: Option<String>,
}

// ============================================================================
// BATCH REPORT
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub total: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub by_kind: BTreeMap<ErrorKind, usize>,
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    fn push(&mut self, entry: BatchEntry) {
        self.total += 1;
        match entry.error {
            None => self.valid_count += 1,
            Some(kind) => {
                self.invalid_count += 1;
                *self.by_kind.entry(kind).or_insert(0) += 1;
            }
        }
        self.entries.push(entry);
    }

    pub fn summary(&self) -> String {
        let breakdown: Vec<String> = self
            .by_kind
            .iter()
            .map(|(kind, count)| format!("{} {}", count, kind))
            .collect();

        format!(
            "{} IBANs: {} valid, {} invalid{}",
            self.total,
            self.valid_count,
            self.invalid_count,
            if breakdown.is_empty() {
                String::new()
            } else {
                format!(" ({})", breakdown.join(", "))
            }
        )
    }

    pub fn count(&self, kind: ErrorKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }

    pub fn failures(&self) -> impl Iterator<Item = &BatchEntry> {
        self.entries.iter().filter(|e| !e.valid)
    }

    pub fn all_valid(&self) -> bool {
        self.invalid_count == 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ============================================================================
// BATCH VALIDATOR
// ============================================================================

/// Validates many IBANs against one format table
pub struct BatchValidator<'t> {
    table: &'t FormatTable,
}

impl BatchValidator<'static> {
    /// Validator backed by the built-in table
    pub fn new() -> Self {
        BatchValidator {
            table: FormatTable::builtin(),
        }
    }
}

impl Default for BatchValidator<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'t> BatchValidator<'t> {
    /// Validator backed by a caller-supplied table
    pub fn with_table(table: &'t FormatTable) -> Self {
        BatchValidator { table }
    }

    /// Validate a single input into a report entry
    pub fn validate_one(&self, input: &str) -> BatchEntry {
        let account = IbanAccount::new(input);

        match account.validate_with(self.table) {
            Ok(()) => BatchEntry {
                input: input.to_string(),
                normalized: account.normalized().to_string(),
                valid: true,
                error: None,
                message: None,
                formatted: Some(account.format_with(self.table)),
            },
            Err(err) => BatchEntry {
                input: input.to_string(),
                normalized: account.normalized().to_string(),
                valid: false,
                error: Some(err.kind()),
                message: Some(err.to_string()),
                formatted: None,
            },
        }
    }

    /// Validate every input, in order, and tally the failures by kind
    pub fn validate_all<I, S>(&self, inputs: I) -> BatchReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = BatchReport::default();
        for input in inputs {
            report.push(self.validate_one(input.as_ref()));
        }

        tracing::info!(
            total = report.total,
            valid = report.valid_count,
            invalid = report.invalid_count,
            "batch validated"
        );

        report
    }
}

// ============================================================================
// CSV INPUT
// ============================================================================

/// Read the non-empty values of `column` from a headed CSV source
///
/// Rows that are too short or hold an empty value are skipped.
pub fn load_csv<R: Read>(reader: R, column: &str) -> Result<Vec<String>> {
    let rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    read_column(rdr, column)
}

/// Same as [`load_csv`], from a file
pub fn load_csv_path(csv_path: &Path, column: &str) -> Result<Vec<String>> {
    let rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file: {:?}", csv_path))?;
    read_column(rdr, column)
}

fn read_column<R: Read>(mut rdr: csv::Reader<R>, column: &str) -> Result<Vec<String>> {
    let index = rdr
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| anyhow!("CSV has no '{}' column", column))?;

    let mut values = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        // Header is line 1
        let line = i + 2;
        let record = result.with_context(|| format!("Failed to read CSV line {}", line))?;

        match record.get(index).map(str::trim) {
            Some(value) if !value.is_empty() => values.push(value.to_string()),
            _ => tracing::warn!(line, column, "CSV row has no IBAN, skipped"),
        }
    }

    Ok(values)
}

// ============================================================================
// TESTS
// ============================================================================
