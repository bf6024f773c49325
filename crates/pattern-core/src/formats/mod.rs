//! # Formats Module
//!
//! Byte-level snapshot encoding for catalogs. File I/O lives in the app layer.

mod persistence;

pub use persistence::*;
