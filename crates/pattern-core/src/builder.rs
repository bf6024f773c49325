//! # Pattern Record Builder
//!
//! Composes analysis, classification, identity and chain validation into an
//! immutable `CodePatternRecord`.
//!
//! Order of operations:
//! 1. Rating bounds check
//! 2. Quality analysis for the declared language
//! 3. Complexity classification (caller override wins)
//! 4. Identity assignment
//! 5. Version-chain validation (one store read)
//!
//! Any failure aborts before the record exists, so nothing reaches the store.
//! `submit` adds the single `create` call and never retries it.

use crate::analyzer::AnalyzerRegistry;
use crate::chain::VersionChainValidator;
use crate::classifier::ComplexityClassifier;
use crate::identity::assign_id;
use crate::primitives::{MAX_RATING, MIN_RATING, PYTHON_LANGUAGE};
use crate::store::{PatternLookup, PatternStore};
use crate::types::RecordParts;
use crate::{CodePatternRecord, ComplexityLevel, PatternError, PatternId, VersionInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

fn default_language() -> String {
    PYTHON_LANGUAGE.to_string()
}

const fn first_version() -> u32 {
    1
}

// =============================================================================
// DRAFT (caller input)
// =============================================================================

/// Caller-supplied fields for a new record.
///
/// Deserializes from the JSON shape used by the CLI and HTTP layers; omitted
/// fields take the defaults below (language `python`, version 1, no tags).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternDraft {
    pub name: String,
    pub code: String,
    pub explanation: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub complexity_level: Option<ComplexityLevel>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub user_rating: Option<f64>,
    #[serde(default = "first_version")]
    pub version: u32,
    #[serde(default)]
    pub previous_version_id: Option<PatternId>,
    #[serde(default)]
    pub change_log: Option<String>,
}

impl PatternDraft {
    /// Version-1 Python draft with no tags, dependencies or rating.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            explanation: explanation.into(),
            language: default_language(),
            tags: BTreeSet::new(),
            complexity_level: None,
            dependencies: Vec::new(),
            user_rating: None,
            version: first_version(),
            previous_version_id: None,
            change_log: None,
        }
    }

    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Pin the complexity tier instead of deriving it from the score.
    #[must_use]
    pub fn complexity_level(mut self, level: ComplexityLevel) -> Self {
        self.complexity_level = Some(level);
        self
    }

    #[must_use]
    pub fn dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn user_rating(mut self, rating: f64) -> Self {
        self.user_rating = Some(rating);
        self
    }

    /// Mark this draft as version `version` following `previous`.
    #[must_use]
    pub fn successor_of(mut self, previous: PatternId, version: u32) -> Self {
        self.previous_version_id = Some(previous);
        self.version = version;
        self
    }

    #[must_use]
    pub fn change_log(mut self, change_log: impl Into<String>) -> Self {
        self.change_log = Some(change_log.into());
        self
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Turns drafts into validated records.
#[derive(Debug, Default)]
pub struct PatternBuilder {
    analyzers: AnalyzerRegistry,
}

impl PatternBuilder {
    /// Builder with the default analyzers (Python heuristic + neutral fallback).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder with a caller-assembled analyzer registry.
    #[must_use]
    pub fn with_analyzers(analyzers: AnalyzerRegistry) -> Self {
        Self { analyzers }
    }

    #[must_use]
    pub fn analyzers(&self) -> &AnalyzerRegistry {
        &self.analyzers
    }

    /// Validate a rating against [0.0, 5.0]. NaN is rejected.
    pub fn validate_rating(rating: Option<f64>) -> Result<(), PatternError> {
        match rating {
            Some(r) if !(MIN_RATING..=MAX_RATING).contains(&r) => {
                Err(PatternError::InvalidRating(r))
            }
            _ => Ok(()),
        }
    }

    /// Build a record stamped with the current time.
    pub fn build<L: PatternLookup + ?Sized>(
        &self,
        draft: &PatternDraft,
        lookup: &L,
    ) -> Result<CodePatternRecord, PatternError> {
        self.build_at(draft, lookup, Utc::now())
    }

    /// Build a record stamped with `updated_at`.
    pub fn build_at<L: PatternLookup + ?Sized>(
        &self,
        draft: &PatternDraft,
        lookup: &L,
        updated_at: DateTime<Utc>,
    ) -> Result<CodePatternRecord, PatternError> {
        Self::validate_rating(draft.user_rating)?;

        let quality_metrics = self.analyzers.analyze(&draft.code, &draft.language);
        let complexity_level = ComplexityClassifier::classify(
            quality_metrics.cyclomatic_complexity,
            draft.complexity_level,
        );
        let id = assign_id(&draft.name, draft.version);

        let version_info = VersionInfo {
            version: draft.version,
            previous_version_id: draft.previous_version_id.clone(),
            change_log: draft.change_log.clone(),
            updated_at,
        };
        VersionChainValidator::validate(&version_info, lookup)?;

        Ok(CodePatternRecord::from_parts(RecordParts {
            id,
            name: draft.name.clone(),
            language: draft.language.clone(),
            code: draft.code.clone(),
            explanation: draft.explanation.clone(),
            tags: draft.tags.clone(),
            dependencies: draft.dependencies.clone(),
            complexity_level,
            quality_metrics,
            version_info,
            user_rating: draft.user_rating,
        }))
    }

    /// Build a record and hand it to the store in a single `create` call.
    ///
    /// Store errors (`DuplicateId`, `Unavailable`) are returned unchanged.
    pub fn submit<S: PatternStore + ?Sized>(
        &self,
        draft: &PatternDraft,
        store: &mut S,
    ) -> Result<CodePatternRecord, PatternError> {
        let record = self.build(draft, &*store)?;
        if let Err(e) = store.create(&record) {
            tracing::warn!(id = %record.id(), error = %e, "store rejected pattern record");
            return Err(e);
        }
        tracing::info!(
            id = %record.id(),
            version = record.version(),
            complexity = %record.complexity_level(),
            "stored pattern record"
        );
        Ok(record)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::{ChainViolation, RecordKind};
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn end_to_end_python_snippet() {
        let store = MemoryStore::new();
        let draft = PatternDraft::new(
            "Sign check",
            "def f(x):\n if x: return 1\n else: return 0",
            "Returns 1 for truthy input",
        );

        let record = PatternBuilder::new()
            .build_at(&draft, &store, fixed_time())
            .expect("build");

        assert_eq!(record.kind(), RecordKind::CodePattern);
        assert_eq!(record.id().as_str(), "sign_check_1");
        assert_eq!(record.quality_metrics().cyclomatic_complexity, 3);
        assert_eq!(record.quality_metrics().documentation_coverage, 0.0);
        assert_eq!(record.complexity_level(), ComplexityLevel::Simple);
        assert_eq!(record.version_info().updated_at, fixed_time());
        assert_eq!(record.user_rating(), None);
    }

    #[test]
    fn override_is_stored_verbatim() {
        let store = MemoryStore::new();
        let draft = PatternDraft::new("Tiny", "x = 1", "trivial")
            .complexity_level(ComplexityLevel::Advanced);
        let record = PatternBuilder::new().build(&draft, &store).expect("build");
        assert_eq!(record.quality_metrics().cyclomatic_complexity, 1);
        assert_eq!(record.complexity_level(), ComplexityLevel::Advanced);
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        assert!(PatternBuilder::validate_rating(Some(0.0)).is_ok());
        assert!(PatternBuilder::validate_rating(Some(5.0)).is_ok());
        assert!(PatternBuilder::validate_rating(None).is_ok());
        assert_eq!(
            PatternBuilder::validate_rating(Some(-0.1)),
            Err(PatternError::InvalidRating(-0.1))
        );
        assert_eq!(
            PatternBuilder::validate_rating(Some(5.1)),
            Err(PatternError::InvalidRating(5.1))
        );
        assert!(matches!(
            PatternBuilder::validate_rating(Some(f64::NAN)),
            Err(PatternError::InvalidRating(_))
        ));
    }

    #[test]
    fn invalid_rating_never_reaches_store() {
        let mut store = MemoryStore::new();
        let draft = PatternDraft::new("Rated", "x = 1", "e").user_rating(7.5);
        let result = PatternBuilder::new().submit(&draft, &mut store);
        assert_eq!(result, Err(PatternError::InvalidRating(7.5)));
        assert_eq!(store.len().expect("len"), 0);
    }

    #[test]
    fn chain_failure_never_reaches_store() {
        let mut store = MemoryStore::new();
        let draft = PatternDraft::new("Orphan", "x = 1", "e")
            .successor_of(PatternId::from("orphan_1"), 2);
        let result = PatternBuilder::new().submit(&draft, &mut store);
        assert!(matches!(
            result,
            Err(PatternError::InvalidVersionChain(
                ChainViolation::PredecessorNotFound(_)
            ))
        ));
        assert_eq!(store.len().expect("len"), 0);
    }

    #[test]
    fn resubmission_collides_on_id() {
        let mut store = MemoryStore::new();
        let builder = PatternBuilder::new();
        let draft = PatternDraft::new("Heap", "x = 1", "binary heap");

        builder.submit(&draft, &mut store).expect("first submit");
        let second = builder.submit(&draft, &mut store);

        assert_eq!(
            second,
            Err(PatternError::DuplicateId(PatternId::from("heap_1")))
        );
        assert_eq!(store.len().expect("len"), 1);
    }

    #[test]
    fn successor_links_to_predecessor() {
        let mut store = MemoryStore::new();
        let builder = PatternBuilder::new();
        let v1 = builder
            .submit(&PatternDraft::new("Heap", "x = 1", "binary heap"), &mut store)
            .expect("v1");
        let v2 = builder
            .submit(
                &PatternDraft::new("Heap", "x = 2", "binary heap, faster")
                    .successor_of(v1.id().clone(), 2)
                    .change_log("faster sift-down"),
                &mut store,
            )
            .expect("v2");

        assert_eq!(v2.id().as_str(), "heap_2");
        assert_eq!(v2.version_info().previous_version_id.as_ref(), Some(v1.id()));
        assert_eq!(
            v2.version_info().change_log.as_deref(),
            Some("faster sift-down")
        );
    }

    #[test]
    fn draft_json_defaults() {
        let draft: PatternDraft = serde_json::from_str(
            r#"{"name": "Stack", "code": "s = []", "explanation": "LIFO"}"#,
        )
        .expect("parse draft");
        assert_eq!(draft.language, "python");
        assert_eq!(draft.version, 1);
        assert!(draft.tags.is_empty());
        assert!(draft.previous_version_id.is_none());
    }
}
