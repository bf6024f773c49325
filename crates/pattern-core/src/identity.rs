//! # Identity Assigner
//!
//! Record ids are `<slug>_<version>` where the slug is the lowercased name
//! with every space replaced by an underscore.
//!
//! Different names can normalize to the same slug ("Binary Search" and
//! "binary search"). Such collisions are not resolved here; the store rejects
//! the second record with `DuplicateId`.

use crate::PatternId;

/// Lowercase the name and replace each space with `_`.
#[must_use]
pub fn name_slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Deterministic id for a (name, version) pair.
#[must_use]
pub fn assign_id(name: &str, version: u32) -> PatternId {
    PatternId(format!("{}_{}", name_slug(name), version))
}
