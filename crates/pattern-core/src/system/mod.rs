//! # System Module
//!
//! Catalog-wide statistics derived from stored records.

mod stats;

pub use stats::*;
