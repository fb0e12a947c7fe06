//! Extraction batches produced by the source scanner.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

use crate::core::data::{Location, MessageKey, normalize_disambiguation};

/// One translatable string found in source code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedMessage {
    pub context: String,
    #[serde(rename = "source")]
    pub source_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disambiguation: Option<String>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default, rename = "plural")]
    pub is_plural: bool,
}

impl ExtractedMessage {
    pub fn new(context: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            source_text: source_text.into(),
            disambiguation: None,
            locations: Vec::new(),
            is_plural: false,
        }
    }

    pub fn with_disambiguation(mut self, disambiguation: impl Into<String>) -> Self {
        self.disambiguation = Some(disambiguation.into());
        self
    }

    pub fn with_location(mut self, file_path: impl Into<String>, line: usize) -> Self {
        self.locations.push(Location::new(file_path, line));
        self
    }

    pub fn plural(mut self) -> Self {
        self.is_plural = true;
        self
    }

    pub fn key(&self) -> MessageKey {
        MessageKey::new(self.source_text.clone(), self.disambiguation.as_deref())
    }
}

/// A problem with a single extraction entry.
///
/// Issues never abort a merge: the entry is skipped, trimmed or folded into
/// an earlier one and processing continues. `index` is the entry's position
/// in the batch as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionIssue {
    /// Entry rejected: empty source text or malformed entry.
    InvalidSource {
        index: usize,
        context: String,
        reason: String,
    },
    /// A location with no file or a line below 1 was dropped from the entry.
    InvalidLocation {
        index: usize,
        context: String,
        source_text: String,
        location: Location,
    },
    /// Same identity key listed twice; locations merged into the first entry.
    DuplicateExtraction {
        index: usize,
        first_index: usize,
        context: String,
        key: MessageKey,
    },
}

impl ExtractionIssue {
    pub fn index(&self) -> usize {
        match self {
            ExtractionIssue::InvalidSource { index, .. }
            | ExtractionIssue::InvalidLocation { index, .. }
            | ExtractionIssue::DuplicateExtraction { index, .. } => *index,
        }
    }

    pub fn context(&self) -> &str {
        match self {
            ExtractionIssue::InvalidSource { context, .. }
            | ExtractionIssue::InvalidLocation { context, .. }
            | ExtractionIssue::DuplicateExtraction { context, .. } => context,
        }
    }

    /// Translate entry indices through `positions` (batch index -> index in
    /// the original document). Unmapped indices are kept.
    pub fn reindexed(mut self, positions: &[usize]) -> Self {
        let map = |index: &mut usize| {
            if let Some(&original) = positions.get(*index) {
                *index = original;
            }
        };
        match &mut self {
            ExtractionIssue::InvalidSource { index, .. }
            | ExtractionIssue::InvalidLocation { index, .. } => map(index),
            ExtractionIssue::DuplicateExtraction {
                index, first_index, ..
            } => {
                map(index);
                map(first_index);
            }
        }
        self
    }
}

impl fmt::Display for ExtractionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionIssue::InvalidSource {
                index,
                context,
                reason,
            } => write!(f, "entry #{} in '{}' rejected: {}", index, context, reason),
            ExtractionIssue::InvalidLocation {
                index,
                source_text,
                location,
                ..
            } => write!(
                f,
                "entry #{} (\"{}\") has invalid location '{}'",
                index, source_text, location
            ),
            ExtractionIssue::DuplicateExtraction {
                index,
                first_index,
                context,
                key,
            } => write!(
                f,
                "entry #{} duplicates #{}: {} in '{}'",
                index, first_index, key, context
            ),
        }
    }
}

/// A validated, de-duplicated extraction batch.
#[derive(Debug, Default)]
pub struct PreparedBatch {
    /// Accepted entries in first-occurrence order.
    pub entries: Vec<ExtractedMessage>,
    pub issues: Vec<ExtractionIssue>,
    /// Number of entries rejected outright.
    pub rejected: usize,
}

/// Validate and de-duplicate a raw extraction batch.
///
/// - empty source text: the entry is rejected
/// - invalid locations are dropped from their entry
/// - a repeated identity key keeps the first entry and appends the later
///   locations to it, skipping exact repeats
pub fn prepare_batch(extraction: &[ExtractedMessage]) -> PreparedBatch {
    let mut batch = PreparedBatch::default();
    // (context, key) -> (position in `entries`, original index)
    let mut seen: HashMap<(String, MessageKey), (usize, usize)> = HashMap::new();

    for (index, raw) in extraction.iter().enumerate() {
        if raw.source_text.is_empty() {
            batch.rejected += 1;
            batch.issues.push(ExtractionIssue::InvalidSource {
                index,
                context: raw.context.clone(),
                reason: "empty source text".to_string(),
            });
            continue;
        }

        let mut entry = raw.clone();
        entry.disambiguation = normalize_disambiguation(entry.disambiguation.as_deref())
            .map(str::to_string);
        entry.locations.retain(|location| {
            let valid = location.is_valid();
            if !valid {
                batch.issues.push(ExtractionIssue::InvalidLocation {
                    index,
                    context: raw.context.clone(),
                    source_text: raw.source_text.clone(),
                    location: location.clone(),
                });
            }
            valid
        });

        let key = (entry.context.clone(), entry.key());
        let existing = seen.get(&key).copied();
        match existing {
            Some((position, first_index)) => {
                let first = &mut batch.entries[position];
                for location in entry.locations {
                    if !first.locations.contains(&location) {
                        first.locations.push(location);
                    }
                }
                batch.issues.push(ExtractionIssue::DuplicateExtraction {
                    index,
                    first_index,
                    context: key.0,
                    key: key.1,
                });
            }
            None => {
                seen.insert(key, (batch.entries.len(), index));
                batch.entries.push(entry);
            }
        }
    }

    batch
}
