//! # Store Boundary
//!
//! The narrow interface between the engine and the vector-search backend.
//!
//! - `PatternLookup::get` is the only read the version-chain validator makes
//! - `PatternStore::create` is called once per successful build, never retried
//! - `PatternStore::search` receives the query text and compiled predicate;
//!   relevance ranking belongs to the backend
//!
//! Two reference backends ship with the crate: `MemoryStore` (volatile,
//! deterministic) and `RedbStore` (disk-backed, ACID). Neither computes
//! embeddings; they rank by term overlap so the lifecycle can run end to end
//! without an external service.

mod memory;
mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;

use crate::filter::FilterPredicate;
use crate::{CodePatternRecord, PatternError, PatternId};
use std::cmp::Reverse;
use std::collections::BTreeSet;

// =============================================================================
// STORE TRAITS
// =============================================================================

/// Read access by id.
pub trait PatternLookup {
    /// Fetch a record. `Ok(None)` means the id is unknown.
    fn get(&self, id: &PatternId) -> Result<Option<CodePatternRecord>, PatternError>;
}

/// Full store boundary: ingestion and search on top of lookup.
pub trait PatternStore: PatternLookup {
    /// Ingest a record atomically.
    ///
    /// Fails with `DuplicateId` if a record with the same id exists and with
    /// `Unavailable` if the backend cannot complete the write.
    fn create(&mut self, record: &CodePatternRecord) -> Result<(), PatternError>;

    /// Records satisfying `predicate`, most relevant to `query_text` first.
    fn search(
        &self,
        query_text: &str,
        predicate: &FilterPredicate,
    ) -> Result<Vec<CodePatternRecord>, PatternError>;

    /// Every stored record in id order.
    fn records(&self) -> Result<Vec<CodePatternRecord>, PatternError>;

    /// Number of stored records.
    fn len(&self) -> Result<usize, PatternError>;

    /// Whether the store holds no records.
    fn is_empty(&self) -> Result<bool, PatternError> {
        Ok(self.len()? == 0)
    }
}

// =============================================================================
// REFERENCE RANKING
// =============================================================================

/// Lowercased alphanumeric terms of a text.
fn terms(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Number of distinct query terms found in the record's name, explanation
/// or tags.
#[must_use]
pub fn term_overlap(query_text: &str, record: &CodePatternRecord) -> usize {
    let mut haystack = terms(record.name());
    haystack.extend(terms(record.explanation()));
    for tag in record.tags() {
        haystack.extend(terms(tag));
    }
    terms(query_text)
        .iter()
        .filter(|t| haystack.contains(*t))
        .count()
}

/// Filter `records` by `predicate` and order them by descending term overlap,
/// ties broken by id.
pub(crate) fn rank(
    records: impl IntoIterator<Item = CodePatternRecord>,
    query_text: &str,
    predicate: &FilterPredicate,
) -> Vec<CodePatternRecord> {
    let mut scored: Vec<(usize, CodePatternRecord)> = records
        .into_iter()
        .filter(|r| predicate.matches(r))
        .map(|r| (term_overlap(query_text, &r), r))
        .collect();
    scored.sort_by(|(sa, ra), (sb, rb)| {
        Reverse(*sa)
            .cmp(&Reverse(*sb))
            .then_with(|| ra.id().cmp(rb.id()))
    });
    scored.into_iter().map(|(_, r)| r).collect()
}
