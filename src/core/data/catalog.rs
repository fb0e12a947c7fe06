use std::collections::HashMap;

use super::message::{Message, MessageKey, MessageStatus, normalize_disambiguation};
use crate::error::{CatalogError, Result};

/// Position of a message inside a catalog.
///
/// Only valid for the catalog that produced it and until the next structural
/// change (prune or context removal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub context: usize,
    pub message: usize,
}

/// A named group of messages, usually one per originating class.
#[derive(Debug, Clone, Default)]
pub struct Context {
    name: String,
    messages: Vec<Message>,
    /// Source text -> positions of the messages sharing it.
    by_source: HashMap<String, Vec<usize>>,
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Vec::new(),
            by_source: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Messages in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn find(&self, source_text: &str, disambiguation: Option<&str>) -> Option<&Message> {
        self.position(source_text, disambiguation)
            .map(|index| &self.messages[index])
    }

    fn position(&self, source_text: &str, disambiguation: Option<&str>) -> Option<usize> {
        let disambiguation = normalize_disambiguation(disambiguation);
        self.by_source.get(source_text)?.iter().copied().find(|&index| {
            self.messages[index].disambiguation.as_deref() == disambiguation
        })
    }

    fn push(&mut self, message: Message) -> usize {
        let index = self.messages.len();
        self.by_source
            .entry(message.source_text.clone())
            .or_default()
            .push(index);
        self.messages.push(message);
        index
    }

    fn duplicate_key(&self, message: &Message) -> CatalogError {
        CatalogError::DuplicateKey {
            context: self.name.clone(),
            source_text: message.source_text.clone(),
            disambiguation: message.disambiguation.clone(),
        }
    }

    fn retain(&mut self, keep: impl FnMut(&Message) -> bool) -> usize {
        let before = self.messages.len();
        self.messages.retain(keep);
        self.reindex();
        before - self.messages.len()
    }

    fn reindex(&mut self) {
        self.by_source.clear();
        for (index, message) in self.messages.iter().enumerate() {
            self.by_source
                .entry(message.source_text.clone())
                .or_default()
                .push(index);
        }
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.messages == other.messages
    }
}

impl Eq for Context {}

/// Per-status message counts of a catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub contexts: usize,
    pub finished: usize,
    pub unfinished: usize,
    pub obsolete: usize,
    pub vanished: usize,
    /// Finished messages missing required plural forms.
    pub incomplete: usize,
}

impl CatalogStats {
    /// Messages still present in source.
    pub fn active(&self) -> usize {
        self.finished + self.unfinished
    }
}

/// An ordered collection of contexts for one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// Target locale, e.g. `pt_BR`.
    pub language: Option<String>,
    /// Language of the source texts, e.g. `en`.
    pub source_language: Option<String>,
    contexts: Vec<Context>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            ..Self::default()
        }
    }

    /// Contexts in insertion order.
    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    pub fn context(&self, name: &str) -> Option<&Context> {
        self.context_position(name).map(|index| &self.contexts[index])
    }

    /// All messages with their context name, in catalog order.
    pub fn messages(&self) -> impl Iterator<Item = (&str, &Message)> {
        self.contexts.iter().flat_map(|context| {
            context
                .messages
                .iter()
                .map(move |message| (context.name(), message))
        })
    }

    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(Context::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.iter().all(Context::is_empty)
    }

    pub fn find(
        &self,
        context: &str,
        source_text: &str,
        disambiguation: Option<&str>,
    ) -> Option<&Message> {
        self.context(context)?.find(source_text, disambiguation)
    }

    pub fn find_key(&self, context: &str, key: &MessageKey) -> Option<&Message> {
        self.find(context, &key.source_text, key.disambiguation.as_deref())
    }

    pub fn get(&self, at: MessageRef) -> Option<&Message> {
        self.contexts.get(at.context)?.messages.get(at.message)
    }

    /// Insert or replace a message by its identity key.
    ///
    /// A message with the same key is replaced in place, keeping its
    /// position; otherwise the message is appended to the context, which is
    /// created at the end of the catalog if needed.
    pub fn upsert(&mut self, context: &str, message: Message) -> MessageRef {
        let context_index = self.ensure_context(context);
        let target = &mut self.contexts[context_index];
        let message_index =
            match target.position(&message.source_text, message.disambiguation.as_deref()) {
                Some(index) => {
                    target.messages[index] = message;
                    index
                }
                None => target.push(message),
            };
        MessageRef {
            context: context_index,
            message: message_index,
        }
    }

    /// Append a message, failing if its identity key is already taken.
    pub fn insert(&mut self, context: &str, message: Message) -> Result<MessageRef> {
        let context_index = self.ensure_context(context);
        let target = &mut self.contexts[context_index];
        if target
            .position(&message.source_text, message.disambiguation.as_deref())
            .is_some()
        {
            return Err(target.duplicate_key(&message));
        }
        let message_index = target.push(message);
        Ok(MessageRef {
            context: context_index,
            message: message_index,
        })
    }

    /// Overwrite the message at `at`.
    ///
    /// Fails with [`CatalogError::DuplicateKey`] if the new identity key
    /// already belongs to a different message of the same context.
    pub fn replace(&mut self, at: MessageRef, message: Message) -> Result<()> {
        let stale = CatalogError::StaleReference {
            context: at.context,
            message: at.message,
        };
        let Some(target) = self.contexts.get_mut(at.context) else {
            return Err(stale);
        };
        if at.message >= target.messages.len() {
            return Err(stale);
        }
        match target.position(&message.source_text, message.disambiguation.as_deref()) {
            Some(index) if index != at.message => Err(target.duplicate_key(&message)),
            Some(_) => {
                target.messages[at.message] = message;
                Ok(())
            }
            None => {
                target.messages[at.message] = message;
                target.reindex();
                Ok(())
            }
        }
    }

    /// Append an empty context unless one with this name exists.
    pub fn add_context(&mut self, name: &str) {
        self.ensure_context(name);
    }

    /// Remove every vanished message. Returns the number removed.
    pub fn prune_vanished(&mut self) -> usize {
        self.contexts
            .iter_mut()
            .map(|context| context.retain(|m| m.status != MessageStatus::Vanished))
            .sum()
    }

    /// Drop contexts without messages. Returns the number dropped.
    pub fn remove_empty_contexts(&mut self) -> usize {
        let before = self.contexts.len();
        self.contexts.retain(|context| !context.is_empty());
        before - self.contexts.len()
    }

    pub fn stats(&self, required_plural_forms: usize) -> CatalogStats {
        let mut stats = CatalogStats {
            contexts: self.contexts.len(),
            ..CatalogStats::default()
        };
        for (_, message) in self.messages() {
            match message.status {
                MessageStatus::Finished => {
                    stats.finished += 1;
                    if !message.is_complete(required_plural_forms) {
                        stats.incomplete += 1;
                    }
                }
                MessageStatus::Unfinished => stats.unfinished += 1,
                MessageStatus::Obsolete => stats.obsolete += 1,
                MessageStatus::Vanished => stats.vanished += 1,
            }
        }
        stats
    }

    fn context_position(&self, name: &str) -> Option<usize> {
        // Catalogs rarely hold more than a few hundred contexts.
        self.contexts.iter().position(|context| context.name == name)
    }

    fn ensure_context(&mut self, name: &str) -> usize {
        match self.context_position(name) {
            Some(index) => index,
            None => {
                self.contexts.push(Context::new(name));
                self.contexts.len() - 1
            }
        }
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Catalog {
        let mut catalog = Catalog::with_language("pt_BR");
        catalog.upsert(
            "Call",
            Message::new("New", None)
                .with_translation("Novo")
                .with_status(MessageStatus::Finished),
        );
        catalog.upsert("Call", Message::new("Busy", None));
        catalog.upsert(
            "QObject",
            Message::new("Default", Some("Default TLS protocol version")),
        );
        catalog
    }

    #[test]
    fn test_find_by_identity_key() {
        let catalog = sample();
        assert_eq!(
            catalog.find("Call", "New", None).map(|m| m.translation.as_str()),
            Some("Novo")
        );
        assert!(catalog.find("Call", "New", Some("other")).is_none());
        assert!(catalog.find("Account", "New", None).is_none());
        assert!(
            catalog
                .find("QObject", "Default", Some("Default TLS protocol version"))
                .is_some()
        );
        assert!(catalog.find("QObject", "Default", None).is_none());
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut catalog = sample();
        let at = catalog.upsert("Call", Message::new("New", None).with_translation("Nova"));
        assert_eq!(at, MessageRef { context: 0, message: 0 });
        assert_eq!(catalog.context("Call").map(Context::len), Some(2));
        assert_eq!(
            catalog.find("Call", "New", None).map(|m| m.translation.as_str()),
            Some("Nova")
        );
    }

    #[test]
    fn test_upsert_keeps_context_order() {
        let mut catalog = sample();
        catalog.upsert("Account", Message::new("Ready", None));
        let names: Vec<&str> = catalog.contexts().iter().map(Context::name).collect();
        assert_eq!(names, vec!["Call", "QObject", "Account"]);
    }

    #[test]
    fn test_same_source_different_disambiguation() {
        let mut catalog = Catalog::new();
        catalog
            .insert("QObject", Message::new("Default", None))
            .unwrap();
        catalog
            .insert("QObject", Message::new("Default", Some("TLS")))
            .unwrap();
        assert_eq!(catalog.message_count(), 2);
    }

    #[test]
    fn test_insert_rejects_duplicate() {
        let mut catalog = sample();
        let err = catalog
            .insert("Call", Message::new("Busy", None))
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateKey { ref context, .. } if context == "Call"));
        assert_eq!(catalog.message_count(), 3);
    }

    #[test]
    fn test_replace_rejects_colliding_rekey() {
        let mut catalog = sample();
        let busy = MessageRef { context: 0, message: 1 };
        let err = catalog
            .replace(busy, Message::new("New", None))
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateKey { .. }));
        assert_eq!(catalog.get(busy).map(|m| m.source_text.as_str()), Some("Busy"));
    }

    #[test]
    fn test_replace_rekeys_and_reindexes() {
        let mut catalog = sample();
        let busy = MessageRef { context: 0, message: 1 };
        catalog
            .replace(busy, Message::new("Busy!", None))
            .unwrap();
        assert!(catalog.find("Call", "Busy", None).is_none());
        assert!(catalog.find("Call", "Busy!", None).is_some());

        // Same key at the same reference is a plain update.
        catalog
            .replace(busy, Message::new("Busy!", None).with_translation("Ocupado"))
            .unwrap();
        assert_eq!(
            catalog.find("Call", "Busy!", None).map(|m| m.translation.as_str()),
            Some("Ocupado")
        );
    }

    #[test]
    fn test_prune_vanished() {
        let mut catalog = sample();
        catalog.upsert(
            "Call",
            Message::new("Busy", None).with_status(MessageStatus::Vanished),
        );
        catalog.upsert(
            "QObject",
            Message::new("Default", Some("Default TLS protocol version"))
                .with_status(MessageStatus::Vanished),
        );

        assert_eq!(catalog.prune_vanished(), 2);
        assert!(catalog.find("Call", "Busy", None).is_none());
        assert!(catalog.find("Call", "New", None).is_some());
        assert_eq!(catalog.remove_empty_contexts(), 1);
        assert_eq!(catalog.contexts().len(), 1);
    }

    #[test]
    fn test_stats() {
        let mut catalog = sample();
        catalog.upsert(
            "Call",
            Message::new("%n call(s)", None)
                .with_plural_forms(["%n chamada", ""])
                .with_status(MessageStatus::Finished),
        );
        catalog.upsert(
            "Call",
            Message::new("Hold", None)
                .with_translation("Espera")
                .with_status(MessageStatus::Obsolete),
        );

        let stats = catalog.stats(2);
        assert_eq!(
            stats,
            CatalogStats {
                contexts: 2,
                finished: 2,
                unfinished: 2,
                obsolete: 1,
                vanished: 0,
                incomplete: 1,
            }
        );
        assert_eq!(stats.active(), 4);
    }
}
