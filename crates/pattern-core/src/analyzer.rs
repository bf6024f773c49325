//! # Quality Analyzer
//!
//! Estimates cyclomatic complexity and documentation coverage from raw source
//! text, without parsing it.
//!
//! Analysis is selected per language tag through the `QualityAnalyzer` trait,
//! so a parser-backed analyzer can replace a heuristic one for a given tag
//! without touching the record schema. Tags without a registered analyzer
//! fall back to `NeutralAnalyzer`.
//!
//! The Python heuristic matches whole-word tokens anywhere in the text.
//! Keywords inside string literals and comments are counted too; that
//! imprecision is accepted.

use crate::QualityMetrics;
use crate::primitives::{
    BASE_COMPLEXITY, FULL_COVERAGE, NEUTRAL_COMPLEXITY, NEUTRAL_COVERAGE, PYTHON_CONTROL_KEYWORDS,
    PYTHON_LANGUAGE,
};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Whole-word control-flow keywords.
static CONTROL_FLOW_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = PYTHON_CONTROL_KEYWORDS.join("|");
    Regex::new(&format!(r"\b(?:{alternation})\b")).expect("control-flow regex is valid")
});

/// Triple double-quoted docstring spans.
static DOUBLE_DOCSTRING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""""[\s\S]*?""""#).expect("docstring regex is valid"));

/// Triple single-quoted docstring spans.
static SINGLE_DOCSTRING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'''[\s\S]*?'''").expect("docstring regex is valid"));

/// `def name(` definition sites.
static FUNCTION_DEF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bdef\s+\w+\s*\(").expect("def regex is valid"));

/// `class Name:` / `class Name(` definition sites.
static CLASS_DEF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bclass\s+\w+\s*[:(]").expect("class regex is valid"));

// =============================================================================
// ANALYZER TRAIT
// =============================================================================

/// Per-language quality analysis.
///
/// Implementations must be pure and total: every input yields a value.
pub trait QualityAnalyzer: Send + Sync {
    /// Cyclomatic complexity estimate.
    fn cyclomatic_complexity(&self, code: &str) -> u32;

    /// Documentation coverage in [0.0, 1.0].
    fn documentation_coverage(&self, code: &str) -> f64;

    /// Compute both metrics.
    fn analyze(&self, code: &str) -> QualityMetrics {
        QualityMetrics::new(
            self.cyclomatic_complexity(code),
            self.documentation_coverage(code),
        )
    }
}

// =============================================================================
// PYTHON HEURISTIC
// =============================================================================

/// Regex heuristic for Python source.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonHeuristicAnalyzer;

impl PythonHeuristicAnalyzer {
    /// Number of triple-quoted spans, counting each quote style separately.
    #[must_use]
    pub fn docstring_count(code: &str) -> usize {
        DOUBLE_DOCSTRING_RE.find_iter(code).count() + SINGLE_DOCSTRING_RE.find_iter(code).count()
    }

    /// Number of `def` and `class` definition sites.
    #[must_use]
    pub fn definition_count(code: &str) -> usize {
        FUNCTION_DEF_RE.find_iter(code).count() + CLASS_DEF_RE.find_iter(code).count()
    }
}

impl QualityAnalyzer for PythonHeuristicAnalyzer {
    fn cyclomatic_complexity(&self, code: &str) -> u32 {
        let branches = CONTROL_FLOW_RE.find_iter(code).count();
        BASE_COMPLEXITY.saturating_add(u32::try_from(branches).unwrap_or(u32::MAX))
    }

    fn documentation_coverage(&self, code: &str) -> f64 {
        let definitions = Self::definition_count(code);
        if definitions == 0 {
            return FULL_COVERAGE;
        }
        let docstrings = Self::docstring_count(code);
        (docstrings as f64 / definitions as f64).min(FULL_COVERAGE)
    }
}

// =============================================================================
// NEUTRAL FALLBACK
// =============================================================================

/// Documented defaults for languages nobody analyzes yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralAnalyzer;

impl QualityAnalyzer for NeutralAnalyzer {
    fn cyclomatic_complexity(&self, _code: &str) -> u32 {
        NEUTRAL_COMPLEXITY
    }

    fn documentation_coverage(&self, _code: &str) -> f64 {
        NEUTRAL_COVERAGE
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Maps lowercased language tags to analyzers.
///
/// `AnalyzerRegistry::default()` registers the Python heuristic under
/// `"python"`; every other tag resolves to `NeutralAnalyzer`.
pub struct AnalyzerRegistry {
    analyzers: BTreeMap<String, Box<dyn QualityAnalyzer>>,
    fallback: NeutralAnalyzer,
}

impl AnalyzerRegistry {
    /// Registry with no language rules at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            analyzers: BTreeMap::new(),
            fallback: NeutralAnalyzer,
        }
    }

    /// Register (or replace) the analyzer for a language tag.
    pub fn register(&mut self, language: &str, analyzer: impl QualityAnalyzer + 'static) {
        self.analyzers
            .insert(language.to_lowercase(), Box::new(analyzer));
    }

    /// Builder-style variant of `register`.
    #[must_use]
    pub fn with(mut self, language: &str, analyzer: impl QualityAnalyzer + 'static) -> Self {
        self.register(language, analyzer);
        self
    }

    /// Whether a dedicated analyzer exists for the tag.
    #[must_use]
    pub fn supports(&self, language: &str) -> bool {
        self.analyzers.contains_key(&language.to_lowercase())
    }

    /// Analyzer for a tag (case-insensitive), or the neutral fallback.
    #[must_use]
    pub fn resolve(&self, language: &str) -> &dyn QualityAnalyzer {
        match self.analyzers.get(&language.to_lowercase()) {
            Some(analyzer) => analyzer.as_ref(),
            None => &self.fallback,
        }
    }

    /// Compute metrics for `code` under the rules for `language`.
    pub fn analyze(&self, code: &str, language: &str) -> QualityMetrics {
        let metrics = self.resolve(language).analyze(code);
        tracing::debug!(
            language,
            cyclomatic_complexity = metrics.cyclomatic_complexity,
            documentation_coverage = metrics.documentation_coverage,
            "analyzed pattern source"
        );
        metrics
    }
}

impl Default for AnalyzerRegistry {
    fn default() -> Self {
        Self::empty().with(PYTHON_LANGUAGE, PythonHeuristicAnalyzer)
    }
}

impl fmt::Debug for AnalyzerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerRegistry")
            .field("languages", &self.analyzers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================
