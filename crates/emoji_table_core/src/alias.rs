//! Community alias dataset (gemoji `emoji.json`) lookup tables.
//!
//! # Responsibility
//! - Deserialize alias records.
//! - Index aliases by description and by code-point-sequence key.
//!
//! # Invariants
//! - Keys repeated in the dataset resolve to the last record (last write wins).
//! - A missing key is an empty alias list, never an error.
//! - Code-point keys use the same format as `RawEntry::sequence_key`.

use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure while loading the alias dataset.
#[derive(Debug)]
pub enum AliasError {
    Json(serde_json::Error),
}

impl Display for AliasError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid alias dataset: {err}"),
        }
    }
}

impl Error for AliasError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for AliasError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// One record of the alias dataset.
///
/// Custom (non-Unicode) records carry no `emoji`/`description`; unknown
/// fields such as `tags` or `category` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AliasRecord {
    #[serde(default)]
    pub description: String,
    /// Literal glyph string.
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Builds the code-point-sequence key of a glyph: `©️` → `00A9 FE0F`.
pub fn glyph_key(glyph: &str) -> String {
    glyph
        .chars()
        .map(|c| format!("{:04X}", u32::from(c)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Description and code-point lookup tables over the alias dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasIndex {
    by_description: HashMap<String, Vec<String>>,
    by_sequence: HashMap<String, Vec<String>>,
}

impl AliasIndex {
    /// Builds both lookup tables from already-deserialized records.
    pub fn from_records(records: impl IntoIterator<Item = AliasRecord>) -> Self {
        let mut index = Self::default();
        for record in records {
            if !record.emoji.is_empty() {
                index
                    .by_sequence
                    .insert(glyph_key(&record.emoji), record.aliases.clone());
            }
            if !record.description.is_empty() {
                index
                    .by_description
                    .insert(record.description, record.aliases);
            }
        }
        index
    }

    /// Parses the JSON array and builds the index.
    ///
    /// # Errors
    /// - Returns `AliasError::Json` when the text is not an array of records.
    pub fn from_json(text: &str) -> Result<Self, AliasError> {
        let records: Vec<AliasRecord> = serde_json::from_str(text)?;
        let record_count = records.len();
        let index = Self::from_records(records);
        debug!(
            "event=alias_index module=alias status=ok records={} descriptions={} sequences={}",
            record_count,
            index.by_description.len(),
            index.by_sequence.len()
        );
        Ok(index)
    }

    pub fn by_description(&self, description: &str) -> &[String] {
        self.by_description
            .get(description)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn by_sequence(&self, key: &str) -> &[String] {
        self.by_sequence
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Union of both lookups, code-point matches first, duplicates removed.
    pub fn lookup(&self, sequence_key: &str, description: &str) -> Vec<String> {
        let mut merged: Vec<String> = Vec::new();
        for alias in self
            .by_sequence(sequence_key)
            .iter()
            .chain(self.by_description(description))
        {
            if !merged.contains(alias) {
                merged.push(alias.clone());
            }
        }
        merged
    }
}
