//! Catalog engine.
//!
//! ## Module Structure
//!
//! - `data`: catalog model (contexts, messages, identity keys, statuses)
//! - `reconcile`: merge of scanner output into an existing catalog
//! - `lookup`: fallback chains, plural rules and the switchable lookup engine
//! - `parsers` / `writers`: TS catalog codec and scanner output reader
//! - `files`: catalog discovery and file I/O

pub mod data;
pub mod files;
pub mod lookup;
pub mod parsers;
pub mod reconcile;
pub mod writers;

pub use data::{
    Catalog, CatalogStats, Context, Location, Message, MessageKey, MessageRef, MessageStatus,
};
pub use lookup::{CatalogChain, LoadedCatalog, LookupEngine, PluralRule, PluralRules};
pub use reconcile::{
    ExtractedMessage, ExtractionIssue, ReconcileOptions, ReconcileSummary, Reconciliation,
    reconcile,
};
