//! Terminology mapping - free-text labels to SNOMED CT codings
//!
//! The [`ConditionMap`] is the fixed label → {code, display} table used to
//! translate observation segments into a controlled clinical vocabulary.
//! It is built once at startup, never mutated, and passed by reference into
//! the resource builder.

use std::collections::HashMap;

/// SNOMED CT terminology system URL
pub const SNOMED_SYSTEM_URL: &str = "http://snomed.info/sct";

/// One terminology entry: code and display text within [`SNOMED_SYSTEM_URL`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionEntry {
    /// SNOMED CT code
    pub code: String,

    /// Display text for the code
    pub display: String,
}

impl ConditionEntry {
    fn new(code: &str, display: &str) -> Self {
        Self {
            code: code.to_string(),
            display: display.to_string(),
        }
    }
}

/// Immutable lookup from lower-cased condition label to terminology entry
#[derive(Debug, Clone, Default)]
pub struct ConditionMap {
    entries: HashMap<String, ConditionEntry>,
}

impl ConditionMap {
    /// The standard table shipped with the pipeline.
    ///
    /// Labels cover the condition vocabulary of the source feed, including
    /// the unaccented spelling variant of "diabético".
    pub fn standard() -> Self {
        let mut map = Self::default();
        map.insert("gestante", ConditionEntry::new("77386006", "Gestante (achado)"));
        map.insert(
            "diabético",
            ConditionEntry::new("44054006", "Diabetes mellitus (transtorno)"),
        );
        map.insert(
            "diabetico",
            ConditionEntry::new("44054006", "Diabetes mellitus (transtorno)"),
        );
        map.insert(
            "hipertenso",
            ConditionEntry::new("38341003", "Hipertensão (transtorno)"),
        );
        map
    }

    /// Look up a label, normalizing it the way observation segments are
    /// normalized (trimmed, lower-cased)
    ///
    /// A miss is not an error; callers silently skip unmatched segments.
    pub fn lookup(&self, label: &str) -> Option<&ConditionEntry> {
        self.entries.get(&label.trim().to_lowercase())
    }

    /// Number of labels in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, label: &str, entry: ConditionEntry) {
        self.entries.insert(label.to_lowercase(), entry);
    }
}
