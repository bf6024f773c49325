//! # Catalog Module
//!
//! A `Catalog` pairs a storage backend with a `PatternBuilder` and exposes
//! the lifecycle end to end: submit, look up, walk history, search.
//!
//! ## Storage Backends
//!
//! - `InMemory`: `MemoryStore` (fast, volatile unless snapshotted)
//! - `Persistent`: `RedbStore` (disk-backed ACID storage)
//!
//! The catalog never opens or closes a backend on its own; callers construct
//! it with the backend they want and drop it when done.

use crate::analyzer::AnalyzerRegistry;
use crate::builder::{PatternBuilder, PatternDraft};
use crate::filter::{CompiledQuery, FilterCompiler, FilterPredicate, SearchRequest};
use crate::identity::name_slug;
use crate::store::{MemoryStore, PatternLookup, PatternStore, RedbStore};
use crate::system::CatalogStats;
use crate::{CodePatternRecord, PatternError, PatternId};
use std::path::Path;

/// Storage backend for a Catalog.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-memory store (fast, volatile).
    InMemory(MemoryStore),
    /// Disk-backed store using redb (ACID, persistent).
    Persistent(RedbStore),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(MemoryStore::new())
    }
}

impl PatternLookup for StorageBackend {
    fn get(&self, id: &PatternId) -> Result<Option<CodePatternRecord>, PatternError> {
        match self {
            Self::InMemory(store) => store.get(id),
            Self::Persistent(store) => store.get(id),
        }
    }
}

impl PatternStore for StorageBackend {
    fn create(&mut self, record: &CodePatternRecord) -> Result<(), PatternError> {
        match self {
            Self::InMemory(store) => store.create(record),
            Self::Persistent(store) => store.create(record),
        }
    }

    fn search(
        &self,
        query_text: &str,
        predicate: &FilterPredicate,
    ) -> Result<Vec<CodePatternRecord>, PatternError> {
        match self {
            Self::InMemory(store) => store.search(query_text, predicate),
            Self::Persistent(store) => store.search(query_text, predicate),
        }
    }

    fn records(&self) -> Result<Vec<CodePatternRecord>, PatternError> {
        match self {
            Self::InMemory(store) => store.records(),
            Self::Persistent(store) => store.records(),
        }
    }

    fn len(&self) -> Result<usize, PatternError> {
        match self {
            Self::InMemory(store) => store.len(),
            Self::Persistent(store) => store.len(),
        }
    }
}

/// High-level entry point for the pattern lifecycle.
#[derive(Debug, Default)]
pub struct Catalog {
    backend: StorageBackend,
    builder: PatternBuilder,
}

impl Catalog {
    /// Empty catalog with in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog over an existing in-memory store.
    #[must_use]
    pub fn with_memory(store: MemoryStore) -> Self {
        Self {
            backend: StorageBackend::InMemory(store),
            builder: PatternBuilder::new(),
        }
    }

    /// Catalog with persistent redb storage at `path` (created if missing).
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, PatternError> {
        Ok(Self {
            backend: StorageBackend::Persistent(RedbStore::open(path)?),
            builder: PatternBuilder::new(),
        })
    }

    /// Replace the analyzers used for new submissions.
    #[must_use]
    pub fn with_analyzers(mut self, analyzers: AnalyzerRegistry) -> Self {
        self.builder = PatternBuilder::with_analyzers(analyzers);
        self
    }

    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StorageBackend::Persistent(_))
    }

    #[must_use]
    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    // =========================================================================
    // INGESTION
    // =========================================================================

    /// Build a record from `draft` and store it.
    pub fn submit(&mut self, draft: &PatternDraft) -> Result<CodePatternRecord, PatternError> {
        self.builder.submit(draft, &mut self.backend)
    }

    /// Bulk-load already-built records (snapshot import).
    ///
    /// Records are taken as-is; chain rules were enforced when they were
    /// first built. Persistent backends load the batch in one transaction.
    pub fn import(&mut self, records: &[CodePatternRecord]) -> Result<usize, PatternError> {
        match &mut self.backend {
            StorageBackend::Persistent(store) => store.import_batch(records),
            StorageBackend::InMemory(store) => {
                let mut staged = store.clone();
                for record in records {
                    staged.create(record)?;
                }
                *store = staged;
                Ok(records.len())
            }
        }
    }

    // =========================================================================
    // LOOKUP
    // =========================================================================

    /// Record by id, if present.
    pub fn get(&self, id: &PatternId) -> Result<Option<CodePatternRecord>, PatternError> {
        self.backend.get(id)
    }

    /// Record by id, or `NotFound`.
    pub fn require(&self, id: &PatternId) -> Result<CodePatternRecord, PatternError> {
        self.get(id)?
            .ok_or_else(|| PatternError::NotFound(id.clone()))
    }

    /// The chain ending at `id`, newest first, back to version 1.
    ///
    /// Fails with `NotFound` if `id` or any linked predecessor is missing.
    pub fn history(&self, id: &PatternId) -> Result<Vec<CodePatternRecord>, PatternError> {
        let mut current = self.require(id)?;
        let mut chain = Vec::with_capacity(current.version() as usize);
        while let Some(previous) = current.version_info().previous_version_id.clone() {
            let predecessor = self.require(&previous)?;
            // Versions strictly decrease along valid links; stop on anything else.
            if predecessor.version() >= current.version() {
                break;
            }
            chain.push(std::mem::replace(&mut current, predecessor));
        }
        chain.push(current);
        Ok(chain)
    }

    /// Highest stored version of the pattern family named `name`.
    pub fn latest(&self, name: &str) -> Result<Option<CodePatternRecord>, PatternError> {
        let slug = name_slug(name);
        Ok(self
            .backend
            .records()?
            .into_iter()
            .filter(|r| name_slug(r.name()) == slug)
            .max_by_key(|r| r.version()))
    }

    // =========================================================================
    // SEARCH
    // =========================================================================

    /// Compile `request` and run it against the backend.
    pub fn find_similar(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<CodePatternRecord>, PatternError> {
        let compiled = FilterCompiler::compile(request);
        self.search_compiled(&compiled)
    }

    /// Run an already-compiled query.
    pub fn search_compiled(
        &self,
        compiled: &CompiledQuery,
    ) -> Result<Vec<CodePatternRecord>, PatternError> {
        tracing::info!(query = %compiled, "executing pattern search");
        self.backend
            .search(&compiled.query_text, &compiled.predicate)
    }

    // =========================================================================
    // SNAPSHOT / METRICS
    // =========================================================================

    /// Every stored record in id order.
    pub fn records(&self) -> Result<Vec<CodePatternRecord>, PatternError> {
        self.backend.records()
    }

    pub fn len(&self) -> Result<usize, PatternError> {
        self.backend.len()
    }

    pub fn is_empty(&self) -> Result<bool, PatternError> {
        self.backend.is_empty()
    }

    pub fn stats(&self) -> Result<CatalogStats, PatternError> {
        Ok(CatalogStats::from_records(&self.records()?))
    }
}

// =============================================================================
// TESTS
// =============================================================================
