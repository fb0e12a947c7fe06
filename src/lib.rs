//! Lingcat - translation catalog engine for Qt Linguist TS files
//!
//! Lingcat keeps per-locale translation catalogs in sync with the strings a
//! source scanner extracts, and resolves messages at run time through a
//! locale fallback chain with plural-form selection. The `lingcat` binary
//! wraps the engine in `update`, `check` and `resolve` commands.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (argument parsing, reporting)
//! - `config`: `.lingcatrc.json` loading and validation
//! - `core`: Catalog model, reconciliation, lookup engine and TS codec
//! - `error`: Typed errors of the engine
//! - `issues`: Issue types and the `Report` trait used by the CLI
//! - `logging`: `tracing` subscriber setup for the binary
//! - `utils`: Locale and position helpers

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod issues;
pub mod logging;
pub mod utils;
