//! # API Request/Response Types
//!
//! JSON structures for the HTTP API. Requests reuse the core's
//! `PatternDraft` and `SearchRequest` shapes directly.

use pattern_core::{CatalogStats, CodePatternRecord, CompiledQuery};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Catalog status response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    pub backend: String,
    pub record_count: usize,
    pub family_count: usize,
    pub rated_count: usize,
    pub mean_coverage_percent: u32,
    pub by_complexity: BTreeMap<String, usize>,
    pub by_language: BTreeMap<String, usize>,
}

impl StatusResponse {
    pub fn from_stats(backend: impl Into<String>, stats: &CatalogStats) -> Self {
        Self {
            backend: backend.into(),
            record_count: stats.record_count,
            family_count: stats.family_count,
            rated_count: stats.rated_count,
            mean_coverage_percent: stats.mean_coverage_percent,
            by_complexity: stats
                .by_complexity
                .iter()
                .map(|(level, count)| (level.to_string(), *count))
                .collect(),
            by_language: stats.by_language.clone(),
        }
    }
}

// =============================================================================
// PATTERN RESPONSE
// =============================================================================

/// Single-record response (`POST /patterns`, `GET /patterns/{id}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternResponse {
    pub success: bool,
    pub record: Option<CodePatternRecord>,
    pub error: Option<String>,
}

impl PatternResponse {
    pub fn success(record: CodePatternRecord) -> Self {
        Self {
            success: true,
            record: Some(record),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            record: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// HISTORY RESPONSE
// =============================================================================

/// Version chain response, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub records: Vec<CodePatternRecord>,
    pub error: Option<String>,
}

impl HistoryResponse {
    pub fn success(records: Vec<CodePatternRecord>) -> Self {
        Self {
            success: true,
            records,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            records: vec![],
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// SEARCH RESPONSE
// =============================================================================

/// Search response with the compiled predicate echoed back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    /// `search '<q>' with filters: ...` form of the compiled query.
    pub query: String,
    /// Predicate text; empty when unconstrained.
    pub predicate: String,
    pub results: Vec<CodePatternRecord>,
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn success(compiled: &CompiledQuery, results: Vec<CodePatternRecord>) -> Self {
        Self {
            success: true,
            query: compiled.to_string(),
            predicate: compiled.predicate.to_string(),
            results,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            query: String::new(),
            predicate: String::new(),
            results: vec![],
            error: Some(msg.into()),
        }
    }
}
