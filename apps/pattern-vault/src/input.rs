//! # Input Validation
//!
//! Caller-facing checks applied by the CLI and HTTP layers before anything
//! reaches the core. The core accepts any well-typed draft or search request;
//! size limits and empty-field rules live here.

use pattern_core::{PatternDraft, PatternError, SearchRequest};
use serde::{Deserialize, Serialize};

// =============================================================================
// LIMITS
// =============================================================================

pub const MAX_NAME_LENGTH: usize = 256;
pub const MAX_CODE_LENGTH: usize = 1024 * 1024;
pub const MAX_EXPLANATION_LENGTH: usize = 64 * 1024;
pub const MAX_TAGS: usize = 64;
pub const MAX_QUERY_LENGTH: usize = 4096;

/// Maximum number of drafts accepted from one pattern file.
pub const MAX_DRAFTS_PER_FILE: usize = 10_000;

fn invalid(msg: impl Into<String>) -> PatternError {
    PatternError::InvalidInput(msg.into())
}

// =============================================================================
// DRAFTS
// =============================================================================

/// Reject drafts the core would accept but callers should never send.
pub fn validate_draft(draft: &PatternDraft) -> Result<(), PatternError> {
    if draft.name.trim().is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if draft.name.len() > MAX_NAME_LENGTH {
        return Err(invalid(format!(
            "name length {} exceeds maximum {} bytes",
            draft.name.len(),
            MAX_NAME_LENGTH
        )));
    }
    if draft.code.is_empty() {
        return Err(invalid("code must not be empty"));
    }
    if draft.code.len() > MAX_CODE_LENGTH {
        return Err(invalid(format!(
            "code length {} exceeds maximum {} bytes",
            draft.code.len(),
            MAX_CODE_LENGTH
        )));
    }
    if draft.explanation.len() > MAX_EXPLANATION_LENGTH {
        return Err(invalid(format!(
            "explanation length {} exceeds maximum {} bytes",
            draft.explanation.len(),
            MAX_EXPLANATION_LENGTH
        )));
    }
    if draft.language.trim().is_empty() {
        return Err(invalid("language must not be empty"));
    }
    if draft.tags.len() > MAX_TAGS {
        return Err(invalid(format!(
            "{} tags exceeds maximum {}",
            draft.tags.len(),
            MAX_TAGS
        )));
    }
    if draft.tags.iter().any(|t| t.trim().is_empty()) {
        return Err(invalid("tags must not be empty strings"));
    }
    Ok(())
}

/// A pattern file holds one draft or a list of drafts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DraftFile {
    Many(Vec<PatternDraft>),
    One(Box<PatternDraft>),
}

impl DraftFile {
    /// Parse JSON and validate every draft. List order is submission order.
    pub fn parse(data: &[u8]) -> Result<Vec<PatternDraft>, PatternError> {
        let parsed: Self = serde_json::from_slice(data)
            .map_err(|e| invalid(format!("Invalid pattern JSON: {}", e)))?;
        let drafts = match parsed {
            Self::Many(drafts) => drafts,
            Self::One(draft) => vec![*draft],
        };
        if drafts.len() > MAX_DRAFTS_PER_FILE {
            return Err(invalid(format!(
                "{} patterns exceeds maximum {} per file",
                drafts.len(),
                MAX_DRAFTS_PER_FILE
            )));
        }
        for draft in &drafts {
            validate_draft(draft)?;
        }
        Ok(drafts)
    }
}

// =============================================================================
// SEARCH REQUESTS
// =============================================================================

/// Normalize a search request before compilation.
///
/// - blank `language` means "not supplied"
/// - tags are trimmed; blank and repeated tags are dropped
/// - a non-finite `minRating` is rejected
pub fn normalize_search(mut request: SearchRequest) -> Result<SearchRequest, PatternError> {
    if request.query.len() > MAX_QUERY_LENGTH {
        return Err(invalid(format!(
            "query length {} exceeds maximum {} bytes",
            request.query.len(),
            MAX_QUERY_LENGTH
        )));
    }
    if request.min_rating.is_some_and(|min| !min.is_finite()) {
        return Err(invalid("minRating must be a finite number"));
    }

    request.language = request
        .language
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty());

    let mut tags: Vec<String> = Vec::with_capacity(request.required_tags.len());
    for tag in request.required_tags {
        let tag = tag.trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    if tags.len() > MAX_TAGS {
        return Err(invalid(format!(
            "{} required tags exceeds maximum {}",
            tags.len(),
            MAX_TAGS
        )));
    }
    request.required_tags = tags;
    Ok(request)
}

// =============================================================================
// TESTS
// =============================================================================
