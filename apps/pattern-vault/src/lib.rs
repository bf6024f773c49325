//! # Pattern Vault
//!
//! Application layer over `pattern-core`: layered configuration, concrete
//! store selection, input limits, the HTTP API and the CLI.
//!
//! The binary in `main.rs` only initializes logging and dispatches to
//! [`cli::execute`]; everything else lives here so it can be tested.

pub mod api;
pub mod cli;
pub mod config;
pub mod input;
pub mod storage;
