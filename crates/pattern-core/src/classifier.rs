//! # Complexity Classifier
//!
//! Maps a cyclomatic-complexity score to a `ComplexityLevel`.
//!
//! A caller-supplied level always wins and is never checked against the
//! score. Thresholds live in `primitives` and are not configurable.

use crate::ComplexityLevel;
use crate::primitives::{INTERMEDIATE_MAX_COMPLEXITY, SIMPLE_MAX_COMPLEXITY};

/// Stateless complexity classification.
pub struct ComplexityClassifier;

impl ComplexityClassifier {
    /// Tier for a score: `<= 5` simple, `6..=10` intermediate, `> 10` advanced.
    #[must_use]
    pub const fn from_score(score: u32) -> ComplexityLevel {
        if score <= SIMPLE_MAX_COMPLEXITY {
            ComplexityLevel::Simple
        } else if score <= INTERMEDIATE_MAX_COMPLEXITY {
            ComplexityLevel::Intermediate
        } else {
            ComplexityLevel::Advanced
        }
    }

    /// Tier for a score, honoring an explicit caller override.
    #[must_use]
    pub const fn classify(score: u32, override_level: Option<ComplexityLevel>) -> ComplexityLevel {
        match override_level {
            Some(level) => level,
            None => Self::from_score(score),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries() {
        assert_eq!(ComplexityClassifier::from_score(0), ComplexityLevel::Simple);
        assert_eq!(ComplexityClassifier::from_score(5), ComplexityLevel::Simple);
        assert_eq!(ComplexityClassifier::from_score(6), ComplexityLevel::Intermediate);
        assert_eq!(ComplexityClassifier::from_score(10), ComplexityLevel::Intermediate);
        assert_eq!(ComplexityClassifier::from_score(11), ComplexityLevel::Advanced);
    }

    #[test]
    fn override_wins_regardless_of_score() {
        assert_eq!(
            ComplexityClassifier::classify(1, Some(ComplexityLevel::Advanced)),
            ComplexityLevel::Advanced
        );
        assert_eq!(
            ComplexityClassifier::classify(50, Some(ComplexityLevel::Simple)),
            ComplexityLevel::Simple
        );
        assert_eq!(
            ComplexityClassifier::classify(7, None),
            ComplexityLevel::Intermediate
        );
    }
}
