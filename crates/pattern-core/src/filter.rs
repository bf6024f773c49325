//! # Retrieval Filter Compiler
//!
//! Translates a structured search request into a conjunctive predicate for
//! the vector-search backend.
//!
//! - One clause per supplied constraint, joined with AND
//! - Absent constraints produce no clause
//! - Never ranks or filters results itself; the backend owns both
//!
//! `FilterPredicate` renders as the backend-facing text form:
//! `language='python' AND userRating>=4.0 AND tags include ['algorithm']`.

use crate::{CodePatternRecord, ComplexityLevel};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// REQUEST
// =============================================================================

/// A similarity search with optional constraints.
///
/// An empty `required_tags` list means no tag constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub complexity_level: Option<ComplexityLevel>,
    #[serde(default)]
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub required_tags: Vec<String>,
}

impl SearchRequest {
    /// Unconstrained search for `query`.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub fn complexity_level(mut self, level: ComplexityLevel) -> Self {
        self.complexity_level = Some(level);
        self
    }

    #[must_use]
    pub fn min_rating(mut self, rating: f64) -> Self {
        self.min_rating = Some(rating);
        self
    }

    #[must_use]
    pub fn required_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

// =============================================================================
// PREDICATE
// =============================================================================

/// A single constraint on a record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FilterClause {
    /// `language = <value>`
    Language(String),
    /// `complexityLevel = <value>`
    ComplexityLevel(ComplexityLevel),
    /// `userRating >= <value>`
    MinRating(f64),
    /// `tags ⊇ <values>`
    TagsInclude(Vec<String>),
}

impl FilterClause {
    /// Evaluate the clause against a record.
    ///
    /// Used by backends that execute predicates in-process. Language tags
    /// compare case-insensitively; an unrated record never satisfies a
    /// minimum rating.
    #[must_use]
    pub fn matches(&self, record: &CodePatternRecord) -> bool {
        match self {
            Self::Language(language) => record.language().eq_ignore_ascii_case(language),
            Self::ComplexityLevel(level) => record.complexity_level() == *level,
            Self::MinRating(min) => record.user_rating().is_some_and(|r| r >= *min),
            Self::TagsInclude(tags) => tags.iter().all(|t| record.tags().contains(t)),
        }
    }
}

impl fmt::Display for FilterClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Language(language) => write!(f, "language='{}'", language),
            Self::ComplexityLevel(level) => write!(f, "complexityLevel='{}'", level),
            // Debug formatting keeps the decimal point ("4.0", not "4").
            Self::MinRating(min) => write!(f, "userRating>={:?}", min),
            Self::TagsInclude(tags) => {
                let quoted: Vec<String> = tags.iter().map(|t| format!("'{}'", t)).collect();
                write!(f, "tags include [{}]", quoted.join(", "))
            }
        }
    }
}

/// Conjunction of clauses. An empty predicate matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterPredicate {
    clauses: Vec<FilterClause>,
}

impl FilterPredicate {
    #[must_use]
    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// True when every clause matches.
    #[must_use]
    pub fn matches(&self, record: &CodePatternRecord) -> bool {
        self.clauses.iter().all(|c| c.matches(record))
    }
}

impl fmt::Display for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "{}", clause)?;
        }
        Ok(())
    }
}

/// Query text plus predicate, as handed to the backend's search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledQuery {
    pub query_text: String,
    pub predicate: FilterPredicate,
}

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.predicate.is_empty() {
            write!(f, "search '{}'", self.query_text)
        } else {
            write!(
                f,
                "search '{}' with filters: {}",
                self.query_text, self.predicate
            )
        }
    }
}

// =============================================================================
// COMPILER
// =============================================================================

/// Pure request-to-predicate translation. Always succeeds.
pub struct FilterCompiler;

impl FilterCompiler {
    /// Compile a request. Clause order is fixed: language, complexity,
    /// rating, tags.
    #[must_use]
    pub fn compile(request: &SearchRequest) -> CompiledQuery {
        let mut clauses = Vec::new();

        if let Some(language) = &request.language {
            clauses.push(FilterClause::Language(language.clone()));
        }
        if let Some(level) = request.complexity_level {
            clauses.push(FilterClause::ComplexityLevel(level));
        }
        if let Some(min) = request.min_rating {
            clauses.push(FilterClause::MinRating(min));
        }
        if !request.required_tags.is_empty() {
            clauses.push(FilterClause::TagsInclude(request.required_tags.clone()));
        }

        CompiledQuery {
            query_text: request.query.clone(),
            predicate: FilterPredicate { clauses },
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
    fn unconstrained_request_has_no_clauses() {
        let compiled = FilterCompiler::compile(&SearchRequest::new("sorting"));
        assert!(compiled.predicate.is_empty());
        assert_eq!(compiled.predicate.to_string(), "");
        assert_eq!(compiled.to_string(), "search 'sorting'");
    }

    #[test]
    fn renders_conjunction_in_fixed_order() {
        let request = SearchRequest::new("efficient search")
            .required_tags(["algorithm"])
            .min_rating(4.0)
            .language("python");
        let compiled = FilterCompiler::compile(&request);

        assert_eq!(
            compiled.predicate.to_string(),
            "language='python' AND userRating>=4.0 AND tags include ['algorithm']"
        );
    }

    #[test]
    fn every_constraint_gets_one_clause() {
        let request = SearchRequest::new("q")
            .language("python")
            .complexity_level(ComplexityLevel::Intermediate)
            .min_rating(4.5)
            .required_tags(["algorithm", "searching"]);
        let compiled = FilterCompiler::compile(&request);

        assert_eq!(compiled.predicate.clauses().len(), 4);
        assert_eq!(
            compiled.to_string(),
            "search 'q' with filters: language='python' AND complexityLevel='intermediate' \
             AND userRating>=4.5 AND tags include ['algorithm', 'searching']"
        );
    }

    #[test]
    fn zero_min_rating_is_still_a_clause() {
        let compiled = FilterCompiler::compile(&SearchRequest::new("q").min_rating(0.0));
        assert_eq!(compiled.predicate.clauses(), &[FilterClause::MinRating(0.0)]);
    }

    #[test]
    fn empty_tag_list_is_unconstrained() {
        let compiled =
            FilterCompiler::compile(&SearchRequest::new("q").required_tags(Vec::<String>::new()));
        assert!(compiled.predicate.is_empty());
    }
}
