//! # redb-backed Pattern Store
//!
//! A disk-backed record store using the redb embedded database:
//! - ACID transactions, crash safety (copy-on-write B-trees)
//! - Records keyed by id, encoded with postcard
//! - `create` checks for an existing id and inserts inside one write
//!   transaction, so concurrent submissions of the same id cannot both land
//!
//! Backend failures surface as `PatternError::Unavailable`; undecodable rows
//! surface as `PatternError::SerializationError`.

use super::{PatternLookup, PatternStore, rank};
use crate::filter::FilterPredicate;
use crate::{CodePatternRecord, PatternError, PatternId};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::Path;

/// Table for records: id string -> postcard-encoded `CodePatternRecord`.
const PATTERNS: TableDefinition<&str, &[u8]> = TableDefinition::new("patterns");

fn unavailable(e: impl std::fmt::Display) -> PatternError {
    PatternError::Unavailable(e.to_string())
}

fn decode(bytes: &[u8]) -> Result<CodePatternRecord, PatternError> {
    postcard::from_bytes(bytes).map_err(|e| {
        PatternError::SerializationError(format!("Failed to decode pattern record: {}", e))
    })
}

/// A disk-backed pattern store.
pub struct RedbStore {
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a pattern database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PatternError> {
        let db = Database::create(path.as_ref()).map_err(unavailable)?;

        // Initialize the table so read transactions never see it missing
        {
            let write_txn = db.begin_write().map_err(unavailable)?;
            let _ = write_txn.open_table(PATTERNS).map_err(unavailable)?;
            write_txn.commit().map_err(unavailable)?;
        }

        Ok(Self { db })
    }

    /// Insert a batch of records in one transaction.
    ///
    /// The whole batch is rejected if any id already exists or repeats
    /// within the batch.
    pub fn import_batch(&mut self, records: &[CodePatternRecord]) -> Result<usize, PatternError> {
        let write_txn = self.db.begin_write().map_err(unavailable)?;
        {
            let mut table = write_txn.open_table(PATTERNS).map_err(unavailable)?;
            for record in records {
                let key = record.id().as_str();
                if table.get(key).map_err(unavailable)?.is_some() {
                    return Err(PatternError::DuplicateId(record.id().clone()));
                }
                let bytes = postcard::to_stdvec(record)
                    .map_err(|e| PatternError::SerializationError(e.to_string()))?;
                table.insert(key, bytes.as_slice()).map_err(unavailable)?;
            }
        }
        write_txn.commit().map_err(unavailable)?;
        Ok(records.len())
    }
}

impl PatternLookup for RedbStore {
    fn get(&self, id: &PatternId) -> Result<Option<CodePatternRecord>, PatternError> {
        let read_txn = self.db.begin_read().map_err(unavailable)?;
        let table = read_txn.open_table(PATTERNS).map_err(unavailable)?;
        match table.get(id.as_str()).map_err(unavailable)? {
            Some(bytes) => decode(bytes.value()).map(Some),
            None => Ok(None),
        }
    }
}

impl PatternStore for RedbStore {
    fn create(&mut self, record: &CodePatternRecord) -> Result<(), PatternError> {
        let bytes = postcard::to_stdvec(record)
            .map_err(|e| PatternError::SerializationError(e.to_string()))?;

        let write_txn = self.db.begin_write().map_err(unavailable)?;
        {
            let mut table = write_txn.open_table(PATTERNS).map_err(unavailable)?;
            if table.get(record.id().as_str()).map_err(unavailable)?.is_some() {
                return Err(PatternError::DuplicateId(record.id().clone()));
            }
            table
                .insert(record.id().as_str(), bytes.as_slice())
                .map_err(unavailable)?;
        }
        write_txn.commit().map_err(unavailable)?;
        Ok(())
    }

    fn search(
        &self,
        query_text: &str,
        predicate: &FilterPredicate,
    ) -> Result<Vec<CodePatternRecord>, PatternError> {
        Ok(rank(self.records()?, query_text, predicate))
    }

    fn records(&self) -> Result<Vec<CodePatternRecord>, PatternError> {
        let read_txn = self.db.begin_read().map_err(unavailable)?;
        let table = read_txn.open_table(PATTERNS).map_err(unavailable)?;
        let mut records = Vec::new();
        for entry in table.iter().map_err(unavailable)? {
            let (_, value) = entry.map_err(unavailable)?;
            records.push(decode(value.value())?);
        }
        Ok(records)
    }

    fn len(&self) -> Result<usize, PatternError> {
        let read_txn = self.db.begin_read().map_err(unavailable)?;
        let table = read_txn.open_table(PATTERNS).map_err(unavailable)?;
        let count = table.len().map_err(unavailable)?;
        Ok(count as usize)
    }
}

// =============================================================================
// TESTS
// =============================================================================
