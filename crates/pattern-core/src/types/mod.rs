//! # Core Type Definitions
//!
//! This module contains the record model shared by every component:
//! - Record identity (`PatternId`)
//! - Classification (`ComplexityLevel`)
//! - Computed metrics and version metadata (`QualityMetrics`, `VersionInfo`)
//! - The immutable record envelope (`CodePatternRecord`)
//! - Error types (`PatternError`, `ChainViolation`)
//!
//! ## Immutability
//!
//! `CodePatternRecord` has no public constructor and no setters. Records are
//! produced by the `PatternBuilder` or decoded from a store; an update is a
//! new record with a higher version linked through `previous_version_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::primitives::COVERAGE_SCALE;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Deterministic record identifier (`<name_slug>_<version>`).
///
/// Identical (name, version) pairs always produce identical ids, which lets
/// the store detect re-submissions by identity collision.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternId(pub String);

impl PatternId {
    /// Create an id from an already-derived string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PatternId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// =============================================================================
// COMPLEXITY LEVEL
// =============================================================================

/// Coarse complexity tier derived from cyclomatic complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Simple,
    Intermediate,
    Advanced,
}

impl ComplexityLevel {
    /// All tiers in ascending order.
    pub const ALL: [Self; 3] = [Self::Simple, Self::Intermediate, Self::Advanced];

    /// Lowercase label used in records and filter predicates.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplexityLevel {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(PatternError::InvalidInput(format!(
                "Unknown complexity level '{}' (expected simple, intermediate or advanced)",
                other
            ))),
        }
    }
}

// =============================================================================
// QUALITY METRICS
// =============================================================================

/// Heuristic quality metrics computed from source text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub cyclomatic_complexity: u32,
    /// Always within [0.0, 1.0], rounded to hundredths.
    pub documentation_coverage: f64,
}

impl QualityMetrics {
    /// Create metrics, clamping coverage into [0.0, 1.0] and rounding it to
    /// two decimal places. A NaN coverage is stored as 0.0.
    #[must_use]
    pub fn new(cyclomatic_complexity: u32, documentation_coverage: f64) -> Self {
        let clamped = if documentation_coverage.is_nan() {
            0.0
        } else {
            documentation_coverage.clamp(0.0, 1.0)
        };
        Self {
            cyclomatic_complexity,
            documentation_coverage: (clamped * COVERAGE_SCALE).round() / COVERAGE_SCALE,
        }
    }
}

// =============================================================================
// VERSION INFO
// =============================================================================

/// Position of a record within its version chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub version: u32,
    pub previous_version_id: Option<PatternId>,
    pub change_log: Option<String>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// RECORD
// =============================================================================

/// Discriminator written into every serialized record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    #[default]
    CodePattern,
}

/// One immutable version of a named code pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodePatternRecord {
    #[serde(rename = "type")]
    kind: RecordKind,
    id: PatternId,
    name: String,
    language: String,
    code: String,
    explanation: String,
    tags: BTreeSet<String>,
    dependencies: Vec<String>,
    complexity_level: ComplexityLevel,
    quality_metrics: QualityMetrics,
    version_info: VersionInfo,
    user_rating: Option<f64>,
}

/// Field bundle used by the builder to assemble a record.
pub(crate) struct RecordParts {
    pub id: PatternId,
    pub name: String,
    pub language: String,
    pub code: String,
    pub explanation: String,
    pub tags: BTreeSet<String>,
    pub dependencies: Vec<String>,
    pub complexity_level: ComplexityLevel,
    pub quality_metrics: QualityMetrics,
    pub version_info: VersionInfo,
    pub user_rating: Option<f64>,
}

impl CodePatternRecord {
    pub(crate) fn from_parts(parts: RecordParts) -> Self {
        Self {
            kind: RecordKind::CodePattern,
            id: parts.id,
            name: parts.name,
            language: parts.language,
            code: parts.code,
            explanation: parts.explanation,
            tags: parts.tags,
            dependencies: parts.dependencies,
            complexity_level: parts.complexity_level,
            quality_metrics: parts.quality_metrics,
            version_info: parts.version_info,
            user_rating: parts.user_rating,
        }
    }

    #[must_use]
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    #[must_use]
    pub fn id(&self) -> &PatternId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Language tag exactly as supplied (matching is case-insensitive).
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    #[must_use]
    pub fn complexity_level(&self) -> ComplexityLevel {
        self.complexity_level
    }

    #[must_use]
    pub fn quality_metrics(&self) -> QualityMetrics {
        self.quality_metrics
    }

    #[must_use]
    pub fn version_info(&self) -> &VersionInfo {
        &self.version_info
    }

    #[must_use]
    pub fn version(&self) -> u32 {
        self.version_info.version
    }

    /// `None` means "not yet rated", which is distinct from a rating of 0.
    #[must_use]
    pub fn user_rating(&self) -> Option<f64> {
        self.user_rating
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// The specific version-chain condition a submission failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainViolation {
    /// Versions start at 1.
    #[error("version 0 is not a valid version")]
    ZeroVersion,

    /// Version 1 must not point at a predecessor.
    #[error("version 1 must not reference a previous version (got {0})")]
    UnexpectedPredecessor(PatternId),

    /// Version n > 1 must point at a predecessor.
    #[error("version {0} requires a previous version id")]
    MissingPredecessorId(u32),

    /// The referenced predecessor is not in the store.
    #[error("previous version {0} does not exist")]
    PredecessorNotFound(PatternId),

    /// The referenced predecessor is not version n - 1.
    #[error("previous version {id} has version {found}, expected {expected}")]
    PredecessorVersionMismatch {
        id: PatternId,
        expected: u32,
        found: u32,
    },
}

/// Errors that can occur in the pattern lifecycle engine.
///
/// - Validation errors are raised before any store write
/// - Store errors (`DuplicateId`, `Unavailable`) are surfaced as-is, never retried
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatternError {
    /// Version/predecessor mismatch.
    #[error("Invalid version chain: {0}")]
    InvalidVersionChain(ChainViolation),

    /// User rating outside [0.0, 5.0].
    #[error("Invalid rating {0}: must lie in [0.0, 5.0]")]
    InvalidRating(f64),

    /// Identity collision at ingestion.
    #[error("Duplicate pattern id: {0}")]
    DuplicateId(PatternId),

    /// The external store could not be reached or failed internally.
    #[error("Pattern store unavailable: {0}")]
    Unavailable(String),

    /// A lookup found no record for the id.
    #[error("Pattern not found: {0}")]
    NotFound(PatternId),

    /// Caller input could not be interpreted (raised by input layers).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<ChainViolation> for PatternError {
    fn from(violation: ChainViolation) -> Self {
        Self::InvalidVersionChain(violation)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complexity_level_parses_case_insensitively() {
        assert_eq!(
            "Intermediate".parse::<ComplexityLevel>().expect("parse"),
            ComplexityLevel::Intermediate
        );
        assert!(matches!(
            "expert".parse::<ComplexityLevel>(),
            Err(PatternError::InvalidInput(_))
        ));
    }

    #[test]
    fn metrics_clamp_and_round_coverage() {
        assert_eq!(QualityMetrics::new(1, 1.7).documentation_coverage, 1.0);
        assert_eq!(QualityMetrics::new(1, -0.2).documentation_coverage, 0.0);
        assert_eq!(QualityMetrics::new(1, 2.0 / 3.0).documentation_coverage, 0.67);
        assert_eq!(QualityMetrics::new(1, f64::NAN).documentation_coverage, 0.0);
    }

    #[test]
    fn chain_violation_converts_into_error() {
        let err: PatternError = ChainViolation::MissingPredecessorId(2).into();
        assert!(matches!(
            err,
            PatternError::InvalidVersionChain(ChainViolation::MissingPredecessorId(2))
        ));
        assert_eq!(
            err.to_string(),
            "Invalid version chain: version 2 requires a previous version id"
        );
    }

    #[test]
    fn pattern_id_displays_raw_string() {
        let id = PatternId::from("binary_search_1");
        assert_eq!(id.to_string(), "binary_search_1");
        assert_eq!(id.as_str(), "binary_search_1");
    }
}
