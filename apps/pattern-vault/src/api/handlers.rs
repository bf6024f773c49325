//! # API Endpoint Handlers

use super::{
    AppState,
    types::{HealthResponse, HistoryResponse, PatternResponse, SearchResponse, StatusResponse},
};
use crate::input::{normalize_search, validate_draft};
use crate::storage::save_catalog;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use pattern_core::{FilterCompiler, PatternDraft, PatternError, PatternId, SearchRequest};

/// HTTP status for a core error.
///
/// Validation failures are the caller's to fix (4xx); a store that cannot
/// complete the call is 503 so clients can apply their own retry policy.
pub fn error_status(error: &PatternError) -> StatusCode {
    match error {
        PatternError::InvalidVersionChain(_) | PatternError::InvalidRating(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PatternError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        PatternError::DuplicateId(_) => StatusCode::CONFLICT,
        PatternError::NotFound(_) => StatusCode::NOT_FOUND,
        PatternError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        PatternError::SerializationError(_) | PatternError::IoError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

// =============================================================================
// HEALTH / STATUS
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// Catalog statistics.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.catalog.read().await;
    match catalog.stats() {
        Ok(stats) => (
            StatusCode::OK,
            Json(StatusResponse::from_stats(state.config.backend.as_str(), &stats)),
        )
            .into_response(),
        Err(e) => (
            error_status(&e),
            Json(PatternResponse::error(format!("Status failed: {}", e))),
        )
            .into_response(),
    }
}

// =============================================================================
// PATTERNS
// =============================================================================

/// Build and store a new pattern record.
pub async fn create_pattern_handler(
    State(state): State<AppState>,
    Json(draft): Json<PatternDraft>,
) -> impl IntoResponse {
    if let Err(e) = validate_draft(&draft) {
        return (error_status(&e), Json(PatternResponse::error(e.to_string())));
    }

    let mut catalog = state.catalog.write().await;
    let record = match catalog.submit(&draft) {
        Ok(record) => record,
        Err(e) => return (error_status(&e), Json(PatternResponse::error(e.to_string()))),
    };

    // Snapshot-backed catalogs are rewritten while the write lock is held.
    if let Err(e) = save_catalog(&catalog, &state.config) {
        tracing::error!(id = %record.id(), error = %e, "failed to persist snapshot");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(PatternResponse::error(format!(
                "Record accepted but not persisted: {}",
                e
            ))),
        );
    }

    (StatusCode::CREATED, Json(PatternResponse::success(record)))
}

/// Fetch one record by id.
pub async fn get_pattern_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let catalog = state.catalog.read().await;
    match catalog.require(&PatternId::new(id)) {
        Ok(record) => (StatusCode::OK, Json(PatternResponse::success(record))),
        Err(e) => (error_status(&e), Json(PatternResponse::error(e.to_string()))),
    }
}

/// Version chain ending at `id`, newest first.
pub async fn history_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let catalog = state.catalog.read().await;
    match catalog.history(&PatternId::new(id)) {
        Ok(records) => (StatusCode::OK, Json(HistoryResponse::success(records))),
        Err(e) => (error_status(&e), Json(HistoryResponse::error(e.to_string()))),
    }
}

// =============================================================================
// SEARCH
// =============================================================================

/// Compile the request and run it against the catalog's store.
pub async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> impl IntoResponse {
    let request = match normalize_search(request) {
        Ok(r) => r,
        Err(e) => return (error_status(&e), Json(SearchResponse::error(e.to_string()))),
    };

    let compiled = FilterCompiler::compile(&request);
    let catalog = state.catalog.read().await;
    match catalog.search_compiled(&compiled) {
        Ok(results) => (
            StatusCode::OK,
            Json(SearchResponse::success(&compiled, results)),
        ),
        Err(e) => (
            error_status(&e),
            Json(SearchResponse::error(format!("Search failed: {}", e))),
        ),
    }
}
