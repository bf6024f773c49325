//! # Fixed Primitives
//!
//! Compiled-in constants for the pattern lifecycle engine.
//!
//! None of these are configurable at runtime: classification thresholds,
//! heuristic defaults and rating bounds are part of the record contract, so
//! two deployments always classify the same code the same way.

// =============================================================================
// COMPLEXITY CLASSIFICATION
// =============================================================================

/// Highest cyclomatic complexity still classified as `simple`.
pub const SIMPLE_MAX_COMPLEXITY: u32 = 5;

/// Highest cyclomatic complexity still classified as `intermediate`.
/// Anything above is `advanced`.
pub const INTERMEDIATE_MAX_COMPLEXITY: u32 = 10;

// =============================================================================
// QUALITY HEURISTICS
// =============================================================================

/// Base cyclomatic complexity of any analyzed snippet.
pub const BASE_COMPLEXITY: u32 = 1;

/// Complexity reported for language tags without an analyzer.
pub const NEUTRAL_COMPLEXITY: u32 = 1;

/// Documentation coverage reported for language tags without an analyzer.
pub const NEUTRAL_COVERAGE: f64 = 0.5;

/// Coverage when a snippet has nothing to document.
pub const FULL_COVERAGE: f64 = 1.0;

/// Coverage is stored rounded to hundredths.
pub const COVERAGE_SCALE: f64 = 100.0;

/// Control-flow keywords counted by the Python heuristic.
pub const PYTHON_CONTROL_KEYWORDS: [&str; 8] = [
    "if", "elif", "else", "for", "while", "with", "try", "except",
];

/// Language tag the default heuristic analyzer is registered under.
pub const PYTHON_LANGUAGE: &str = "python";

// =============================================================================
// RATINGS
// =============================================================================

/// Lowest accepted user rating (inclusive).
pub const MIN_RATING: f64 = 0.0;

/// Highest accepted user rating (inclusive).
pub const MAX_RATING: f64 = 5.0;

// =============================================================================
// PERSISTENCE
// =============================================================================

/// Magic bytes for the catalog snapshot header.
pub const MAGIC_BYTES: &[u8; 4] = b"PVLT";

/// Current snapshot format version.
///
/// Increment this when making breaking changes to the record encoding.
pub const FORMAT_VERSION: u8 = 1;
