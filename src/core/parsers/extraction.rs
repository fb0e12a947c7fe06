//! Scanner output reader.
//!
//! The scanner writes a JSON array of message objects. Items are decoded one
//! by one so that a single malformed item is reported and skipped instead of
//! failing the whole document.

use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::core::reconcile::{ExtractedMessage, ExtractionIssue};

/// Decoded scanner output.
#[derive(Debug, Default)]
pub struct ExtractionDocument {
    /// Well-formed items in document order.
    pub messages: Vec<ExtractedMessage>,
    /// Document index of each entry of `messages`.
    pub positions: Vec<usize>,
    /// Items that could not be decoded.
    pub rejected: Vec<ExtractionIssue>,
}

impl ExtractionDocument {
    /// Map an issue reported against `messages` back to document indices.
    pub fn locate(&self, issue: ExtractionIssue) -> ExtractionIssue {
        issue.reindexed(&self.positions)
    }
}

pub fn parse_extraction(content: &str) -> Result<ExtractionDocument> {
    let json: Value = serde_json::from_str(content).context("Extraction is not valid JSON")?;
    let Value::Array(items) = json else {
        bail!("Extraction must be a JSON array of messages");
    };

    let mut document = ExtractionDocument::default();
    for (index, item) in items.into_iter().enumerate() {
        let context = item
            .get("context")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        match serde_json::from_value::<ExtractedMessage>(item) {
            Ok(message) => {
                document.messages.push(message);
                document.positions.push(index);
            }
            Err(err) => document.rejected.push(ExtractionIssue::InvalidSource {
                index,
                context,
                reason: err.to_string(),
            }),
        }
    }
    Ok(document)
}

pub fn read_extraction(path: &Path) -> Result<ExtractionDocument> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read extraction file: {:?}", path))?;
    parse_extraction(&content)
        .with_context(|| format!("Failed to parse extraction file: {:?}", path))
}
