//! In-memory record store
//!
//! An ordered, read-only view of one record type for a session. The filter
//! engine works against the stored sequence; the backing source (workspace
//! YAML, embedded demo seed) is decided by whoever builds the store.

use thiserror::Error;

use crate::core::filter::{Filterable, FilterQuery};
use crate::core::record::Record;

/// Ordered collection of records of one type
#[derive(Debug, Clone, Default)]
pub struct RecordStore<R> {
    records: Vec<R>,
}

impl<R> RecordStore<R> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn from_records(records: Vec<R>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: R) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }
}

impl<R: Filterable> RecordStore<R> {
    /// Apply a filter query, preserving store order
    pub fn filter(&self, query: &FilterQuery) -> Vec<&R> {
        query.apply(&self.records)
    }
}

impl<R: Record> RecordStore<R> {
    /// Look up a record by exact ID
    pub fn get(&self, id: &crate::core::identity::RecordId) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Resolve a record from user input: exact ID, partial ID, or a
    /// fragment of the label
    ///
    /// Matching is case-insensitive. A fragment matching more than one
    /// record is an error listing the candidates.
    pub fn find(&self, needle: &str) -> Result<&R, StoreError> {
        let needle_lower = needle.to_lowercase();

        if let Some(exact) = self
            .records
            .iter()
            .find(|r| r.id().to_string().eq_ignore_ascii_case(needle))
        {
            return Ok(exact);
        }

        let matches: Vec<&R> = self
            .records
            .iter()
            .filter(|r| {
                r.id().to_string().to_lowercase().contains(&needle_lower)
                    || r.label().to_lowercase().contains(&needle_lower)
            })
            .collect();

        match matches.len() {
            0 => Err(StoreError::NotFound {
                needle: needle.to_string(),
            }),
            1 => Ok(matches[0]),
            _ => Err(StoreError::Ambiguous {
                needle: needle.to_string(),
                candidates: matches
                    .iter()
                    .map(|r| format!("{} ({})", r.id(), r.label()))
                    .collect(),
            }),
        }
    }
}

impl<R> IntoIterator for RecordStore<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Errors from record lookup
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no record matches '{needle}'")]
    NotFound { needle: String },

    #[error("'{needle}' is ambiguous, matches: {}", .candidates.join(", "))]
    Ambiguous {
        needle: String,
        candidates: Vec<String>,
    },
}
