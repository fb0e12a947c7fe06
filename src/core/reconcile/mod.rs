//! Merge freshly extracted source strings into an existing catalog.
//!
//! Reconciliation is a pure function of the old catalog, the extraction
//! batch and the options: it never touches the old catalog and performs no
//! I/O. Matching is by exact identity key only; a changed source text is a
//! removal plus an addition.
//!
//! Status transitions for a message already in the catalog:
//!
//! | old status            | extracted | new status                        |
//! |-----------------------|-----------|-----------------------------------|
//! | Finished / Unfinished | yes, text | unchanged                         |
//! | any                   | yes, none | Unfinished                        |
//! | Obsolete / Vanished   | yes       | Unfinished                        |
//! | Finished / Unfinished | no        | Obsolete                          |
//! | Obsolete              | no        | Vanished                          |
//! | Vanished              | no        | Vanished, or removed when pruning |

mod extraction;

use std::collections::HashMap;

use tracing::{info, warn};

pub use extraction::{ExtractedMessage, ExtractionIssue, PreparedBatch, prepare_batch};

use crate::core::data::{Catalog, Message, MessageKey, MessageStatus};

/// Knobs for a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Remove messages that were already vanished and are still missing.
    pub prune_vanished: bool,
    /// Plural slots required by the catalog's locale.
    pub plural_forms: usize,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            prune_vanished: false,
            plural_forms: 2,
        }
    }
}

/// What a reconciliation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Extracted entries matched to an active message.
    pub matched: usize,
    /// New messages created.
    pub added: usize,
    /// Obsolete or vanished messages found again.
    pub reactivated: usize,
    /// Active messages no longer extracted.
    pub obsoleted: usize,
    /// Obsolete messages missing for a second pass.
    pub vanished: usize,
    /// Vanished messages removed.
    pub pruned: usize,
    /// Finished messages demoted because required plural forms are missing.
    pub downgraded: usize,
    /// Extraction entries rejected.
    pub rejected: usize,
    /// Contexts dropped because no message was left in them.
    pub contexts_dropped: usize,
}

impl ReconcileSummary {
    /// True if the pass changed any status or membership.
    pub fn has_changes(&self) -> bool {
        self.added + self.reactivated + self.obsoleted + self.vanished + self.pruned > 0
            || self.downgraded > 0
            || self.contexts_dropped > 0
    }
}

/// Result of [`reconcile`].
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub catalog: Catalog,
    pub issues: Vec<ExtractionIssue>,
    pub summary: ReconcileSummary,
}

/// Merge `extraction` into `old`, producing a new catalog.
///
/// Context order of `old` is preserved; new messages are appended to their
/// context in extraction order and contexts first seen in the extraction are
/// appended in first-encounter order.
pub fn reconcile(
    old: &Catalog,
    extraction: &[ExtractedMessage],
    options: &ReconcileOptions,
) -> Reconciliation {
    let batch = prepare_batch(extraction);
    for issue in &batch.issues {
        warn!(context = issue.context(), "{}", issue);
    }

    let mut summary = ReconcileSummary {
        rejected: batch.rejected,
        ..ReconcileSummary::default()
    };

    let index: HashMap<(&str, MessageKey), usize> = batch
        .entries
        .iter()
        .enumerate()
        .map(|(position, entry)| ((entry.context.as_str(), entry.key()), position))
        .collect();
    let mut consumed = vec![false; batch.entries.len()];

    let mut catalog = Catalog::new();
    catalog.language = old.language.clone();
    catalog.source_language = old.source_language.clone();

    for context in old.contexts() {
        catalog.add_context(context.name());
        for message in context.messages() {
            match index.get(&(context.name(), message.key())) {
                Some(&position) => {
                    consumed[position] = true;
                    let merged =
                        merge_matched(message, &batch.entries[position], options, &mut summary);
                    catalog.upsert(context.name(), merged);
                }
                None => {
                    if let Some(retired) = retire(message, options, &mut summary) {
                        catalog.upsert(context.name(), retired);
                    }
                }
            }
        }
    }

    for (entry, _) in batch
        .entries
        .iter()
        .zip(&consumed)
        .filter(|(_, consumed)| !**consumed)
    {
        catalog.upsert(&entry.context, new_message(entry, options));
        summary.added += 1;
    }

    summary.contexts_dropped = catalog.remove_empty_contexts();

    info!(
        language = catalog.language.as_deref().unwrap_or("-"),
        matched = summary.matched,
        added = summary.added,
        reactivated = summary.reactivated,
        obsoleted = summary.obsoleted,
        vanished = summary.vanished,
        pruned = summary.pruned,
        rejected = summary.rejected,
        "reconciled catalog"
    );

    Reconciliation {
        catalog,
        issues: batch.issues,
        summary,
    }
}

/// An existing message found again in source.
fn merge_matched(
    old: &Message,
    entry: &ExtractedMessage,
    options: &ReconcileOptions,
    summary: &mut ReconcileSummary,
) -> Message {
    let mut message = old.clone();
    message.locations = entry.locations.clone();
    if old.is_plural != entry.is_plural {
        change_shape(&mut message, entry.is_plural, options.plural_forms);
    }

    if old.status.is_retired() {
        message.status = MessageStatus::Unfinished;
        summary.reactivated += 1;
    } else {
        // Never promoted: only a translator marks a message finished.
        if !old.has_translation() {
            message.status = MessageStatus::Unfinished;
        }
        summary.matched += 1;
    }

    if message.status == MessageStatus::Finished && !message.is_complete(options.plural_forms) {
        message.status = MessageStatus::Unfinished;
        summary.downgraded += 1;
    }

    message
}

/// Carry the text across a plural flip: a plain translation becomes the
/// first form, and the first form becomes the plain translation.
fn change_shape(message: &mut Message, is_plural: bool, plural_forms: usize) {
    message.is_plural = is_plural;
    if is_plural {
        let mut forms = vec![std::mem::take(&mut message.translation)];
        forms.resize(plural_forms.max(1), String::new());
        message.plural_forms = forms;
    } else {
        message.translation = message.plural_forms.drain(..).next().unwrap_or_default();
    }
}

/// An existing message missing from source. `None` means pruned.
fn retire(
    old: &Message,
    options: &ReconcileOptions,
    summary: &mut ReconcileSummary,
) -> Option<Message> {
    let mut message = old.clone();
    match old.status {
        MessageStatus::Vanished if options.prune_vanished => {
            summary.pruned += 1;
            return None;
        }
        MessageStatus::Vanished => {}
        MessageStatus::Obsolete => {
            message.status = MessageStatus::Vanished;
            summary.vanished += 1;
        }
        MessageStatus::Finished | MessageStatus::Unfinished => {
            message.status = MessageStatus::Obsolete;
            summary.obsoleted += 1;
        }
    }
    Some(message)
}

fn new_message(entry: &ExtractedMessage, options: &ReconcileOptions) -> Message {
    let mut message = Message::new(entry.source_text.clone(), entry.disambiguation.as_deref());
    message.locations = entry.locations.clone();
    message.is_plural = entry.is_plural;
    if entry.is_plural {
        message.plural_forms = vec![String::new(); options.plural_forms.max(1)];
    }
    message
}
