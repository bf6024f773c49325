//! # Catalog Statistics
//!
//! Aggregate counts over a set of records: tiers, languages, ratings and
//! documentation coverage. Pure and deterministic (BTreeMap ordering).

use crate::{CodePatternRecord, ComplexityLevel};
use serde::Serialize;
use std::collections::BTreeMap;

/// Summary of a catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogStats {
    /// Number of stored records (all versions).
    pub record_count: usize,
    /// Number of distinct pattern families (records at version 1).
    pub family_count: usize,
    /// Records per complexity tier; every tier is present, possibly zero.
    pub by_complexity: BTreeMap<ComplexityLevel, usize>,
    /// Records per lowercased language tag.
    pub by_language: BTreeMap<String, usize>,
    /// Records carrying a user rating.
    pub rated_count: usize,
    /// Mean documentation coverage in hundredths (0..=100), 0 when empty.
    pub mean_coverage_percent: u32,
}

impl CatalogStats {
    /// Compute statistics over `records`.
    #[must_use]
    pub fn from_records(records: &[CodePatternRecord]) -> Self {
        let mut by_complexity: BTreeMap<ComplexityLevel, usize> =
            ComplexityLevel::ALL.iter().map(|l| (*l, 0)).collect();
        let mut by_language = BTreeMap::new();
        let mut family_count = 0;
        let mut rated_count = 0;
        let mut coverage_sum = 0.0;

        for record in records {
            *by_complexity.entry(record.complexity_level()).or_insert(0) += 1;
            *by_language
                .entry(record.language().to_lowercase())
                .or_insert(0) += 1;
            if record.version() == 1 {
                family_count += 1;
            }
            if record.user_rating().is_some() {
                rated_count += 1;
            }
            coverage_sum += record.quality_metrics().documentation_coverage;
        }

        let mean_coverage_percent = if records.is_empty() {
            0
        } else {
            (coverage_sum / records.len() as f64 * 100.0).round() as u32
        };

        Self {
            record_count: records.len(),
            family_count,
            by_complexity,
            by_language,
            rated_count,
            mean_coverage_percent,
        }
    }

    /// Records in a given tier.
    #[must_use]
    pub fn tier_count(&self, level: ComplexityLevel) -> usize {
        self.by_complexity.get(&level).copied().unwrap_or(0)
    }
}
