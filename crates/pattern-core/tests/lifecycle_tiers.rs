//! # Lifecycle Tier Tests (L0-L4)
//!
//! End-to-end checks of the record lifecycle through the public API.
//!
//! ## Tiers
//! - L0: Quality Analysis
//! - L1: Classification and Identity
//! - L2: Version Chains
//! - L3: Record Building and Ingestion
//! - L4: Retrieval Filters

use pattern_core::{
    AnalyzerRegistry, Catalog, ChainViolation, ComplexityClassifier, ComplexityLevel,
    FilterCompiler, MemoryStore, PatternBuilder, PatternDraft, PatternError, PatternId,
    PatternStore, QualityAnalyzer, SearchRequest, assign_id,
};

// =============================================================================
// TIER L0: QUALITY ANALYSIS
// =============================================================================

mod l0_quality_analysis {
    use super::*;

    /// L0.1: Code without control flow scores the base complexity.
    #[test]
    fn straight_line_python_scores_one() {
        let metrics = AnalyzerRegistry::default().analyze("x = 1\ny = x + 2", "python");
        assert_eq!(metrics.cyclomatic_complexity, 1);
    }

    /// L0.2: Every keyword occurrence counts, including inside strings.
    #[test]
    fn keywords_in_strings_are_counted() {
        let code = "msg = 'if you try this'\nfor i in range(3):\n    pass";
        let metrics = AnalyzerRegistry::default().analyze(code, "python");
        // base + if + try + for
        assert_eq!(metrics.cyclomatic_complexity, 4);
    }

    /// L0.3: Keywords only count as whole words.
    #[test]
    fn partial_words_are_not_keywords() {
        let code = "iffy = 1\nelsewhere = 2\nformat = 3\nwhile_loop = 4";
        let metrics = AnalyzerRegistry::default().analyze(code, "python");
        assert_eq!(metrics.cyclomatic_complexity, 1);
    }

    /// L0.4: No definitions means full coverage.
    #[test]
    fn no_definitions_means_full_coverage() {
        let metrics = AnalyzerRegistry::default().analyze("print('hi')", "python");
        assert_eq!(metrics.documentation_coverage, 1.0);
    }

    /// L0.5: Coverage is docstrings over definitions, capped at 1.0.
    #[test]
    fn coverage_ratio_and_cap() {
        let half = "def a():\n    \"\"\"Doc.\"\"\"\n    pass\n\ndef b():\n    pass\n";
        let metrics = AnalyzerRegistry::default().analyze(half, "python");
        assert_eq!(metrics.documentation_coverage, 0.5);

        let over = "'''module'''\nclass A:\n    '''doc'''\n";
        let metrics = AnalyzerRegistry::default().analyze(over, "python");
        assert_eq!(metrics.documentation_coverage, 1.0);
    }

    /// L0.6: Unknown languages get the neutral defaults.
    #[test]
    fn unknown_language_gets_defaults() {
        let code = "if (x) { while (y) {} } else {}";
        let metrics = AnalyzerRegistry::default().analyze(code, "rust");
        assert_eq!(metrics.cyclomatic_complexity, 1);
        assert_eq!(metrics.documentation_coverage, 0.5);
    }

    /// L0.7: Language tags are case-insensitive.
    #[test]
    fn language_tag_is_case_insensitive() {
        let code = "if a:\n    pass";
        let lower = AnalyzerRegistry::default().analyze(code, "python");
        let upper = AnalyzerRegistry::default().analyze(code, "PYTHON");
        assert_eq!(lower, upper);
        assert_eq!(upper.cyclomatic_complexity, 2);
    }

    /// L0.8: A custom analyzer can be registered for a new tag.
    #[test]
    fn custom_analyzer_is_used() {
        struct Fixed;
        impl QualityAnalyzer for Fixed {
            fn cyclomatic_complexity(&self, _code: &str) -> u32 {
                12
            }
            fn documentation_coverage(&self, _code: &str) -> f64 {
                0.25
            }
        }

        let registry = AnalyzerRegistry::default().with("go", Fixed);
        let metrics = registry.analyze("func main() {}", "Go");
        assert_eq!(metrics.cyclomatic_complexity, 12);
        assert_eq!(metrics.documentation_coverage, 0.25);
    }
}

// =============================================================================
// TIER L1: CLASSIFICATION AND IDENTITY
// =============================================================================

mod l1_classification_identity {
    use super::*;

    /// L1.1: Tier boundaries at 5/6 and 10/11.
    #[test]
    fn tier_boundaries() {
        assert_eq!(ComplexityClassifier::from_score(5), ComplexityLevel::Simple);
        assert_eq!(
            ComplexityClassifier::from_score(6),
            ComplexityLevel::Intermediate
        );
        assert_eq!(
            ComplexityClassifier::from_score(10),
            ComplexityLevel::Intermediate
        );
        assert_eq!(ComplexityClassifier::from_score(11), ComplexityLevel::Advanced);
    }

    /// L1.2: An explicit override always wins.
    #[test]
    fn override_wins() {
        assert_eq!(
            ComplexityClassifier::classify(50, Some(ComplexityLevel::Simple)),
            ComplexityLevel::Simple
        );
        assert_eq!(
            ComplexityClassifier::classify(1, Some(ComplexityLevel::Advanced)),
            ComplexityLevel::Advanced
        );
    }

    /// L1.3: Ids lowercase the name and replace spaces.
    #[test]
    fn id_derivation() {
        assert_eq!(assign_id("Binary Search", 1).as_str(), "binary_search_1");
        assert_eq!(assign_id("LRU  Cache", 12).as_str(), "lru__cache_12");
    }

    /// L1.4: Distinct names can share a slug.
    #[test]
    fn distinct_names_can_collide() {
        assert_eq!(assign_id("Quick Sort", 1), assign_id("quick sort", 1));
    }
}

// =============================================================================
// TIER L2: VERSION CHAINS
// =============================================================================

mod l2_version_chains {
    use super::*;

    /// L2.1: Version 2 without version 1 is rejected.
    #[test]
    fn version_two_without_version_one() {
        let mut catalog = Catalog::new();
        let result = catalog.submit(
            &PatternDraft::new("Queue", "q = []", "FIFO")
                .successor_of(PatternId::from("queue_1"), 2),
        );
        assert!(matches!(
            result,
            Err(PatternError::InvalidVersionChain(
                ChainViolation::PredecessorNotFound(_)
            ))
        ));
    }

    /// L2.2: Version 1 with a predecessor is rejected.
    #[test]
    fn version_one_with_predecessor() {
        let mut catalog = Catalog::new();
        let result = catalog.submit(
            &PatternDraft::new("Queue", "q = []", "FIFO")
                .successor_of(PatternId::from("queue_0"), 1),
        );
        assert!(matches!(
            result,
            Err(PatternError::InvalidVersionChain(
                ChainViolation::UnexpectedPredecessor(_)
            ))
        ));
    }

    /// L2.3: Version 2 referencing version 1 is accepted.
    #[test]
    fn version_two_after_version_one() {
        let mut catalog = Catalog::new();
        let v1 = catalog
            .submit(&PatternDraft::new("Queue", "q = []", "FIFO"))
            .expect("v1");
        let v2 = catalog
            .submit(
                &PatternDraft::new("Queue", "from collections import deque", "FIFO")
                    .successor_of(v1.id().clone(), 2),
            )
            .expect("v2");
        assert_eq!(v2.id().as_str(), "queue_2");
        assert_eq!(catalog.history(v2.id()).expect("history").len(), 2);
    }

    /// L2.4: Skipping a version is rejected, never gap-filled.
    #[test]
    fn skipped_version_rejected() {
        let mut catalog = Catalog::new();
        let v1 = catalog
            .submit(&PatternDraft::new("Queue", "q = []", "FIFO"))
            .expect("v1");
        let result = catalog.submit(
            &PatternDraft::new("Queue", "q = []", "FIFO").successor_of(v1.id().clone(), 3),
        );
        assert!(matches!(
            result,
            Err(PatternError::InvalidVersionChain(
                ChainViolation::PredecessorVersionMismatch {
                    expected: 2,
                    found: 1,
                    ..
                }
            ))
        ));
        assert_eq!(catalog.len().expect("len"), 1);
    }
}

// =============================================================================
// TIER L3: RECORD BUILDING AND INGESTION
// =============================================================================

mod l3_building_ingestion {
    use super::*;

    /// L3.1: The documented end-to-end Python example.
    #[test]
    fn end_to_end_python_example() {
        let mut catalog = Catalog::new();
        let record = catalog
            .submit(&PatternDraft::new(
                "Truthy",
                "def f(x):\n if x: return 1\n else: return 0",
                "Map truthiness to 1/0",
            ))
            .expect("submit");

        assert_eq!(record.quality_metrics().cyclomatic_complexity, 3);
        assert_eq!(record.complexity_level(), ComplexityLevel::Simple);
    }

    /// L3.2: Rating bounds are inclusive at 0.0 and 5.0.
    #[test]
    fn rating_boundaries() {
        let mut store = MemoryStore::new();
        let builder = PatternBuilder::new();

        for (name, rating) in [("Low", 0.0), ("High", 5.0)] {
            builder
                .submit(
                    &PatternDraft::new(name, "x = 1", "e").user_rating(rating),
                    &mut store,
                )
                .expect("accepted");
        }
        for rating in [-0.1, 5.1] {
            let result = builder.submit(
                &PatternDraft::new("Bad", "x = 1", "e").user_rating(rating),
                &mut store,
            );
            assert_eq!(result, Err(PatternError::InvalidRating(rating)));
        }
        assert_eq!(store.len().expect("len"), 2);
    }

    /// L3.3: Unrated differs from a rating of zero.
    #[test]
    fn unrated_is_not_zero() {
        let mut catalog = Catalog::new();
        let unrated = catalog
            .submit(&PatternDraft::new("A", "x = 1", "e"))
            .expect("a");
        let zero = catalog
            .submit(&PatternDraft::new("B", "x = 1", "e").user_rating(0.0))
            .expect("b");

        assert_eq!(unrated.user_rating(), None);
        assert_eq!(zero.user_rating(), Some(0.0));

        let hits = catalog
            .find_similar(&SearchRequest::new("").min_rating(0.0))
            .expect("search");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name(), "B");
    }

    /// L3.4: A slug collision between different names is a duplicate.
    #[test]
    fn slug_collision_is_duplicate() {
        let mut catalog = Catalog::new();
        catalog
            .submit(&PatternDraft::new("Quick Sort", "x = 1", "first"))
            .expect("first");
        let result = catalog.submit(&PatternDraft::new("quick sort", "y = 2", "second"));
        assert_eq!(
            result,
            Err(PatternError::DuplicateId(PatternId::from("quick_sort_1")))
        );
    }

    /// L3.5: Stored records serialize with the camelCase wire shape.
    #[test]
    fn record_json_shape() {
        let mut catalog = Catalog::new();
        let record = catalog
            .submit(
                &PatternDraft::new("Shape", "x = 1", "e")
                    .tags(["b", "a"])
                    .user_rating(4.5),
            )
            .expect("submit");

        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json["type"], "code_pattern");
        assert_eq!(json["complexityLevel"], "simple");
        assert_eq!(json["qualityMetrics"]["cyclomaticComplexity"], 1);
        assert_eq!(json["versionInfo"]["version"], 1);
        assert!(json["versionInfo"]["previousVersionId"].is_null());
        assert_eq!(json["userRating"], 4.5);
        assert_eq!(json["tags"], serde_json::json!(["a", "b"]));
    }
}

// =============================================================================
// TIER L4: RETRIEVAL FILTERS
// =============================================================================

mod l4_retrieval_filters {
    use super::*;

    /// L4.1: The documented compiled predicate.
    #[test]
    fn documented_predicate() {
        let compiled = FilterCompiler::compile(
            &SearchRequest::new("efficient search")
                .language("python")
                .min_rating(4.0)
                .required_tags(["algorithm"]),
        );
        assert_eq!(
            compiled.predicate.to_string(),
            "language='python' AND userRating>=4.0 AND tags include ['algorithm']"
        );
    }

    /// L4.2: Absent constraints produce no clauses.
    #[test]
    fn absent_constraints_produce_no_clauses() {
        let compiled = FilterCompiler::compile(&SearchRequest::new("anything"));
        assert!(compiled.predicate.is_empty());
        assert_eq!(compiled.query_text, "anything");
    }

    /// L4.3: Required tags must all be present.
    #[test]
    fn all_required_tags_must_match() {
        let mut store = MemoryStore::new();
        let builder = PatternBuilder::new();
        builder
            .submit(
                &PatternDraft::new("Both", "x = 1", "e").tags(["algorithm", "graph"]),
                &mut store,
            )
            .expect("both");
        builder
            .submit(
                &PatternDraft::new("One", "x = 1", "e").tags(["algorithm"]),
                &mut store,
            )
            .expect("one");

        let compiled =
            FilterCompiler::compile(&SearchRequest::new("").required_tags(["algorithm", "graph"]));
        let hits = store
            .search(&compiled.query_text, &compiled.predicate)
            .expect("search");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name(), "Both");
    }
}
