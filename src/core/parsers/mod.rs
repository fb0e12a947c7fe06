//! Readers for catalog and extraction files.
//!
//! - `ts`: Qt Linguist TS XML catalog reader (all-or-nothing)
//! - `extraction`: scanner JSON output reader (tolerant per item)

pub mod extraction;
pub mod ts;
