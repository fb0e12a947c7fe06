//! Catalog model.
//!
//! ## Module Structure
//!
//! - `message`: Message, MessageKey, MessageStatus, Location
//! - `catalog`: Catalog and Context, with the identity-key index

pub mod catalog;
pub mod message;

pub use catalog::{Catalog, CatalogStats, Context, MessageRef};
pub use message::{Location, Message, MessageKey, MessageStatus, normalize_disambiguation};
