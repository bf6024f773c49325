//! # In-memory Pattern Store
//!
//! Volatile backend keyed by `PatternId`. Uses `BTreeMap` so iteration and
//! tie-breaking are deterministic.

use super::{PatternLookup, PatternStore, rank};
use crate::filter::FilterPredicate;
use crate::{CodePatternRecord, PatternError, PatternId};
use std::collections::BTreeMap;

/// Volatile record store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<PatternId, CodePatternRecord>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load records from a snapshot, enforcing id uniqueness.
    pub fn from_records(
        records: impl IntoIterator<Item = CodePatternRecord>,
    ) -> Result<Self, PatternError> {
        let mut store = Self::new();
        for record in records {
            store.create(&record)?;
        }
        Ok(store)
    }
}

impl PatternLookup for MemoryStore {
    fn get(&self, id: &PatternId) -> Result<Option<CodePatternRecord>, PatternError> {
        Ok(self.records.get(id).cloned())
    }
}

impl PatternStore for MemoryStore {
    fn create(&mut self, record: &CodePatternRecord) -> Result<(), PatternError> {
        if self.records.contains_key(record.id()) {
            return Err(PatternError::DuplicateId(record.id().clone()));
        }
        self.records.insert(record.id().clone(), record.clone());
        Ok(())
    }

    fn search(
        &self,
        query_text: &str,
        predicate: &FilterPredicate,
    ) -> Result<Vec<CodePatternRecord>, PatternError> {
        Ok(rank(self.records.values().cloned(), query_text, predicate))
    }

    fn records(&self) -> Result<Vec<CodePatternRecord>, PatternError> {
        Ok(self.records.values().cloned().collect())
    }

    fn len(&self) -> Result<usize, PatternError> {
        Ok(self.records.len())
    }
}

// =============================================================================
// TESTS
// =============================================================================
