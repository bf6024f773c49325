//! # Version Chain Validator
//!
//! Enforces the referential and ordering rules between successive versions
//! of one logical pattern:
//! - version 1 has no predecessor
//! - version n > 1 names a predecessor that exists and is version n - 1
//!
//! Gaps are never filled and out-of-order submissions are rejected, not
//! queued. The validator performs exactly one store read (none for
//! version 1) and no writes.
//!
//! Validation and ingestion are not atomic: two submissions of the same next
//! version can both pass here. The store's uniqueness check on `id` decides
//! which one wins.

use crate::store::PatternLookup;
use crate::{ChainViolation, PatternError, VersionInfo};

/// Stateless version-chain validation.
pub struct VersionChainValidator;

impl VersionChainValidator {
    /// Validate `info` against the store.
    ///
    /// # Errors
    /// - `InvalidVersionChain` naming the failed condition
    /// - `Unavailable` if the lookup itself fails
    pub fn validate<L: PatternLookup + ?Sized>(
        info: &VersionInfo,
        lookup: &L,
    ) -> Result<(), PatternError> {
        let result = Self::check(info, lookup);
        if let Err(PatternError::InvalidVersionChain(violation)) = &result {
            tracing::warn!(
                version = info.version,
                previous = info.previous_version_id.as_ref().map(|p| p.as_str()),
                %violation,
                "rejected version chain"
            );
        }
        result
    }

    fn check<L: PatternLookup + ?Sized>(
        info: &VersionInfo,
        lookup: &L,
    ) -> Result<(), PatternError> {
        match (info.version, &info.previous_version_id) {
            (0, _) => Err(ChainViolation::ZeroVersion.into()),
            (1, None) => Ok(()),
            (1, Some(previous)) => Err(ChainViolation::UnexpectedPredecessor(previous.clone()).into()),
            (version, None) => Err(ChainViolation::MissingPredecessorId(version).into()),
            (version, Some(previous)) => {
                let Some(predecessor) = lookup.get(previous)? else {
                    return Err(ChainViolation::PredecessorNotFound(previous.clone()).into());
                };
                let expected = version - 1;
                let found = predecessor.version();
                if found != expected {
                    return Err(ChainViolation::PredecessorVersionMismatch {
                        id: previous.clone(),
                        expected,
                        found,
                    }
                    .into());
                }
                Ok(())
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
