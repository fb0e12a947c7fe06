//! Catalog writers.
//!
//! - `ts`: Qt Linguist TS XML writer

pub mod ts;
