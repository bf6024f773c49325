//! # pattern-core
//!
//! The pattern record lifecycle engine for Pattern Vault.
//!
//! Turns a caller's code snippet plus metadata into an immutable, versioned
//! `CodePatternRecord` with computed quality metrics, and compiles structured
//! search requests into predicates a vector-search backend can apply.
//!
//! ## Architectural Constraints
//!
//! - Records are never mutated after construction; a change is a new version
//! - Ids are derived from (name, version), so re-submission collides
//! - Validation failures happen before the store sees the record
//! - No async and no network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod analyzer;
pub mod builder;
pub mod catalog;
pub mod chain;
pub mod classifier;
pub mod filter;
pub mod formats;
pub mod identity;
pub mod primitives;
pub mod store;
pub mod system;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    ChainViolation, CodePatternRecord, ComplexityLevel, PatternError, PatternId, QualityMetrics,
    RecordKind, VersionInfo,
};

// =============================================================================
// RE-EXPORTS: Lifecycle
// =============================================================================

pub use analyzer::{AnalyzerRegistry, NeutralAnalyzer, PythonHeuristicAnalyzer, QualityAnalyzer};
pub use builder::{PatternBuilder, PatternDraft};
pub use catalog::{Catalog, StorageBackend};
pub use chain::VersionChainValidator;
pub use classifier::ComplexityClassifier;
pub use filter::{CompiledQuery, FilterClause, FilterCompiler, FilterPredicate, SearchRequest};
pub use identity::{assign_id, name_slug};
pub use store::{MemoryStore, PatternLookup, PatternStore, RedbStore};

// =============================================================================
// RE-EXPORTS: Formats and System
// =============================================================================

pub use formats::{MAX_SNAPSHOT_SIZE, SnapshotHeader, snapshot_from_bytes, snapshot_to_bytes};
pub use system::CatalogStats;
