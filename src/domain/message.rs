//! Canonical message and raw row types
//!
//! A [`RawRow`] is one loosely-typed tabular record as it arrives from the
//! source file. The normalizer converts it into a [`CanonicalMessage`], the
//! immutable JSON payload that travels over the queue topic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Display name used when the source row carries no name at all.
pub const UNKNOWN_NAME: &str = "unknown";

/// One raw tabular record with possibly-missing string fields.
///
/// Field lookups are case-insensitive and whitespace-trimmed: keys are
/// normalized once at construction, so a source file with `CPF ` or `Cpf`
/// headers resolves the same way. Ephemeral; consumed once by the normalizer.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, normalizing the column name
    pub fn insert(&mut self, column: &str, value: impl Into<String>) {
        self.fields
            .insert(Self::normalize_column(column), value.into());
    }

    /// Look up a field by column name (case-insensitive, trimmed)
    ///
    /// Returns `None` for missing columns and for blank values, so callers
    /// never have to distinguish "column absent" from "cell empty".
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(&Self::normalize_column(column))
            .map(String::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Number of non-empty fields in the row
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the row has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn normalize_column(column: &str) -> String {
        column.trim().to_lowercase()
    }
}

impl FromIterator<(String, String)> for RawRow {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut row = RawRow::new();
        for (column, value) in iter {
            row.insert(&column, value);
        }
        row
    }
}

/// Administrative gender in the canonical message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Classified from a masculine token in the raw gender text
    Male,
    /// Classified from a feminine token in the raw gender text
    Female,
    /// No recognizable token in the raw gender text
    #[default]
    Unknown,
}

impl Gender {
    /// FHIR administrative-gender code for this value
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The queue payload: one normalized patient record.
///
/// Created by the normalizer, immutable afterward, serialized to JSON on the
/// topic and discarded by the consumer after resource construction.
///
/// Invariants: `id` is always non-empty; `birth_date`, when present, is a
/// valid calendar date (unparsable source dates become `None`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalMessage {
    /// Digits-only identifier, or `generated_<n>` when the raw identifier
    /// contains no digits
    pub id: String,

    /// Display name, `unknown` sentinel when absent
    pub name: String,

    /// Classified gender
    pub gender: Gender,

    /// ISO calendar date, absent when the raw text could not be parsed
    #[serde(rename = "birthDate")]
    pub birth_date: Option<NaiveDate>,

    /// Free-text condition labels separated by `|`, or absent
    pub observation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_row_lookup_is_case_insensitive_and_trimmed() {
        let mut row = RawRow::new();
        row.insert("  CPF ", "123.456.789-00");
        row.insert("Nome", "Maria Silva");

        assert_eq!(row.get("cpf"), Some("123.456.789-00"));
        assert_eq!(row.get(" NOME "), Some("Maria Silva"));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn test_raw_row_blank_value_reads_as_missing() {
        let mut row = RawRow::new();
        row.insert("observação", "   ");

        assert_eq!(row.get("observação"), None);
    }

    #[test]
    fn test_raw_row_from_iterator() {
        let row: RawRow = vec![
            ("CPF".to_string(), "111".to_string()),
            ("nome".to_string(), "Ana".to_string()),
        ]
        .into_iter()
        .collect();

        assert_eq!(row.len(), 2);
        assert_eq!(row.get("cpf"), Some("111"));
    }

    #[test]
    fn test_gender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Gender::Male).unwrap(), "\"male\"");
        assert_eq!(
            serde_json::to_string(&Gender::Female).unwrap(),
            "\"female\""
        );
        assert_eq!(
            serde_json::to_string(&Gender::Unknown).unwrap(),
            "\"unknown\""
        );
    }

    #[test]
    fn test_message_json_shape() {
        let message = CanonicalMessage {
            id: "12345678900".to_string(),
            name: "Maria Silva".to_string(),
            gender: Gender::Female,
            birth_date: NaiveDate::from_ymd_opt(1990, 3, 5),
            observation: Some("Gestante".to_string()),
        };

        let json: serde_json::Value = serde_json::to_value(&message).unwrap();
        assert_eq!(json["id"], "12345678900");
        assert_eq!(json["birthDate"], "1990-03-05");
        assert_eq!(json["gender"], "female");
    }

    #[test]
    fn test_message_round_trips_null_birth_date() {
        let message = CanonicalMessage {
            id: "generated_3".to_string(),
            name: UNKNOWN_NAME.to_string(),
            gender: Gender::Unknown,
            birth_date: None,
            observation: None,
        };

        let json = serde_json::to_string(&message).unwrap();
        let back: CanonicalMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, message);
        assert!(back.birth_date.is_none());
    }
}
