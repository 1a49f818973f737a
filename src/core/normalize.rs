//! Field normalizer - raw tabular rows to canonical messages
//!
//! `normalize` is a total function: a malformed field never fails the row,
//! it degrades to the field's fallback value (`generated_<n>` identifier,
//! `unknown` gender, absent birth date). The row is always published; the
//! consumer decides what an incomplete message means.

use crate::config::ColumnConfig;
use crate::domain::{CanonicalMessage, Gender, RawRow, UNKNOWN_NAME};
use chrono::NaiveDate;

/// Date formats attempted against the raw birth-date text, in order.
///
/// Day-before-month formats come first: the source feeds write `05/03/1990`
/// meaning March 5th, so day-first disambiguation wins over month-first.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d/%m/%y",
    "%Y-%m-%d",
    "%Y/%m/%d",
];

/// Convert one raw row into a canonical message
///
/// # Arguments
///
/// * `row` - The raw tabular record
/// * `sequence` - Zero-based row index within the run, used for generated
///   placeholder identifiers
/// * `columns` - Configured source column names
pub fn normalize(row: &RawRow, sequence: usize, columns: &ColumnConfig) -> CanonicalMessage {
    let id = normalize_identifier(row.get(&columns.identifier), sequence);
    let name = row
        .get(&columns.name)
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());
    let gender = classify_gender(row.get(&columns.gender));
    let birth_date = row.get(&columns.birth_date).and_then(parse_birth_date);
    let observation = row.get(&columns.observation).map(str::to_string);

    tracing::debug!(
        sequence = sequence,
        id = %id,
        gender = %gender,
        has_birth_date = birth_date.is_some(),
        "Normalized row"
    );

    CanonicalMessage {
        id,
        name,
        gender,
        birth_date,
        observation,
    }
}

/// Reduce a raw identifier to its digits-only projection
///
/// Tabular identifiers arrive with punctuation (formatted national ID
/// numbers); stripping everything but digits yields a store-safe token.
/// When no digits remain, a deterministic per-row placeholder is substituted
/// so the canonical id is never empty.
pub fn normalize_identifier(raw: Option<&str>, sequence: usize) -> String {
    let digits: String = raw
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    if digits.is_empty() {
        format!("generated_{sequence}")
    } else {
        digits
    }
}

/// Classify free-text gender by substring containment
///
/// Source data uses inconsistent and abbreviated spellings (`Masculino`,
/// `masc.`, `FEM`), so this is a best-effort containment check rather than
/// an exact-match lookup.
pub fn classify_gender(raw: Option<&str>) -> Gender {
    let lowered = raw.unwrap_or_default().to_lowercase();

    if lowered.contains("masc") {
        Gender::Male
    } else if lowered.contains("fem") {
        Gender::Female
    } else {
        Gender::Unknown
    }
}

/// Parse a raw birth-date string with day-before-month preference
///
/// Returns `None` on any parse failure; the row is still published and the
/// consumer applies its missing-birth-date policy.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}
