use std::fmt;

use serde::{Deserialize, Serialize};

/// A source-code location hint for a message.
///
/// Locations are informational only: they never take part in message
/// identity and are replaced wholesale on every reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Path of the source file, as reported by the scanner.
    #[serde(rename = "file")]
    pub file_path: String,
    /// Line number (1-indexed).
    pub line: usize,
}

impl Location {
    pub fn new(file_path: impl Into<String>, line: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
        }
    }

    /// A location must name a file and a line of at least 1.
    pub fn is_valid(&self) -> bool {
        !self.file_path.is_empty() && self.line >= 1
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file_path, self.line)
    }
}

/// Identity of a message within its context.
///
/// Two messages in the same context are the same message exactly when their
/// source text and disambiguation are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageKey {
    pub source_text: String,
    pub disambiguation: Option<String>,
}

impl MessageKey {
    pub fn new(source_text: impl Into<String>, disambiguation: Option<&str>) -> Self {
        Self {
            source_text: source_text.into(),
            disambiguation: normalize_disambiguation(disambiguation).map(str::to_string),
        }
    }

    pub fn matches(&self, source_text: &str, disambiguation: Option<&str>) -> bool {
        self.source_text == source_text
            && self.disambiguation.as_deref() == normalize_disambiguation(disambiguation)
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.disambiguation {
            Some(d) => write!(f, "\"{}\" ({})", self.source_text, d),
            None => write!(f, "\"{}\"", self.source_text),
        }
    }
}

/// An empty disambiguation is the same as none.
pub fn normalize_disambiguation(disambiguation: Option<&str>) -> Option<&str> {
    disambiguation.filter(|d| !d.is_empty())
}

/// Translation state of a message.
///
/// - `Unfinished`: needs translator attention (new, reactivated or flagged)
/// - `Finished`: translated and approved
/// - `Obsolete`: no longer found in source; translation kept for reuse
/// - `Vanished`: obsolete for two consecutive passes; candidate for pruning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageStatus {
    Unfinished,
    Finished,
    Obsolete,
    Vanished,
}

impl MessageStatus {
    /// Value of the TS `type` attribute, `None` for finished translations.
    pub fn type_attribute(&self) -> Option<&'static str> {
        match self {
            MessageStatus::Finished => None,
            MessageStatus::Unfinished => Some("unfinished"),
            MessageStatus::Obsolete => Some("obsolete"),
            MessageStatus::Vanished => Some("vanished"),
        }
    }

    pub fn from_type_attribute(value: Option<&str>) -> Option<Self> {
        match value {
            None => Some(MessageStatus::Finished),
            Some("unfinished") => Some(MessageStatus::Unfinished),
            Some("obsolete") => Some(MessageStatus::Obsolete),
            Some("vanished") => Some(MessageStatus::Vanished),
            Some(_) => None,
        }
    }

    /// Obsolete and vanished messages are no longer present in source.
    pub fn is_retired(&self) -> bool {
        matches!(self, MessageStatus::Obsolete | MessageStatus::Vanished)
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageStatus::Unfinished => write!(f, "unfinished"),
            MessageStatus::Finished => write!(f, "finished"),
            MessageStatus::Obsolete => write!(f, "obsolete"),
            MessageStatus::Vanished => write!(f, "vanished"),
        }
    }
}

/// A single translatable message of a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub source_text: String,
    pub disambiguation: Option<String>,
    /// Translation of a non-plural message. Empty when not translated yet.
    pub translation: String,
    /// Translation variants of a plural message, indexed by plural category.
    pub plural_forms: Vec<String>,
    pub is_plural: bool,
    pub status: MessageStatus,
    pub locations: Vec<Location>,
    /// Free-form note left by a translator. Never touched by reconciliation.
    pub translator_comment: Option<String>,
}

impl Message {
    /// Create an untranslated message.
    pub fn new(source_text: impl Into<String>, disambiguation: Option<&str>) -> Self {
        Self {
            source_text: source_text.into(),
            disambiguation: normalize_disambiguation(disambiguation).map(str::to_string),
            translation: String::new(),
            plural_forms: Vec::new(),
            is_plural: false,
            status: MessageStatus::Unfinished,
            locations: Vec::new(),
            translator_comment: None,
        }
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = translation.into();
        self
    }

    pub fn with_plural_forms<I, S>(mut self, forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.is_plural = true;
        self.plural_forms = forms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_status(mut self, status: MessageStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_location(mut self, file_path: impl Into<String>, line: usize) -> Self {
        self.locations.push(Location::new(file_path, line));
        self
    }

    pub fn key(&self) -> MessageKey {
        MessageKey {
            source_text: self.source_text.clone(),
            disambiguation: self.disambiguation.clone(),
        }
    }

    pub fn has_key(&self, source_text: &str, disambiguation: Option<&str>) -> bool {
        self.source_text == source_text
            && self.disambiguation.as_deref() == normalize_disambiguation(disambiguation)
    }

    /// True if any translation text is present.
    pub fn has_translation(&self) -> bool {
        if self.is_plural {
            self.plural_forms.iter().any(|form| !form.is_empty())
        } else {
            !self.translation.is_empty()
        }
    }

    /// True if every required slot is filled.
    ///
    /// Non-plural messages need a non-empty translation; plural messages need
    /// `required_plural_forms` non-empty forms (at least one).
    pub fn is_complete(&self, required_plural_forms: usize) -> bool {
        if self.is_plural {
            let required = required_plural_forms.max(1);
            self.plural_forms.len() >= required
                && self.plural_forms[..required].iter().all(|f| !f.is_empty())
        } else {
            !self.translation.is_empty()
        }
    }

    /// Text served for a plural slot, or the plain translation.
    ///
    /// Returns an empty string when the slot does not exist.
    pub fn text_for(&self, plural_index: Option<usize>) -> &str {
        if self.is_plural {
            let index = plural_index.unwrap_or(0);
            self.plural_forms.get(index).map(String::as_str).unwrap_or("")
        } else {
            &self.translation
        }
    }
}

// ============================================================
// Tests
// ============================================================
