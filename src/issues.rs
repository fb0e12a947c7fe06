//! Issue types reported by the CLI.
//!
//! Each issue is self-contained: it carries everything the reporter needs
//! to print it (location, message, notes) without access to the catalogs.

use enum_dispatch::enum_dispatch;

use crate::core::{ExtractionIssue, Location, MessageKey};
use crate::error::CatalogError;

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    InvalidSource,
    InvalidLocation,
    DuplicateExtraction,
    Unfinished,
    ParseError,
    LocaleUnavailable,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::InvalidSource => write!(f, "invalid-source"),
            Rule::InvalidLocation => write!(f, "invalid-location"),
            Rule::DuplicateExtraction => write!(f, "duplicate-extraction"),
            Rule::Unfinished => write!(f, "unfinished"),
            Rule::ParseError => write!(f, "parse-error"),
            Rule::LocaleUnavailable => write!(f, "locale-unavailable"),
        }
    }
}

// ============================================================
// Issue Types - Extraction Input
// ============================================================

/// Extraction entry rejected (empty source text or malformed item).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSourceIssue {
    pub extraction_file: String,
    pub index: usize,
    pub context: String,
    pub reason: String,
}

/// Location dropped from an extraction entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLocationIssue {
    pub extraction_file: String,
    pub index: usize,
    pub context: String,
    pub source_text: String,
    pub location: Location,
}

/// Identity key listed more than once in the extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateExtractionIssue {
    pub extraction_file: String,
    pub index: usize,
    pub first_index: usize,
    pub context: String,
    pub key: MessageKey,
}

// ============================================================
// Issue Types - Catalogs
// ============================================================

/// Message that still needs a translator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnfinishedIssue {
    pub catalog_file: String,
    pub locale: String,
    pub context: String,
    pub key: MessageKey,
    /// First source location, if the message has one.
    pub location: Option<Location>,
}

/// Catalog could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    /// Position of the error; 0 when unknown (I/O failures).
    pub line: usize,
    pub column: usize,
    pub error: String,
}

/// No catalog is available for a requested locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleUnavailableIssue {
    pub locale: String,
}

// ============================================================
// Conversions
// ============================================================

/// Turn an extraction issue into a reportable issue for `extraction_file`.
pub fn from_extraction_issue(extraction_file: &str, issue: ExtractionIssue) -> Issue {
    let extraction_file = extraction_file.to_string();
    match issue {
        ExtractionIssue::InvalidSource {
            index,
            context,
            reason,
        } => Issue::InvalidSource(InvalidSourceIssue {
            extraction_file,
            index,
            context,
            reason,
        }),
        ExtractionIssue::InvalidLocation {
            index,
            context,
            source_text,
            location,
        } => Issue::InvalidLocation(InvalidLocationIssue {
            extraction_file,
            index,
            context,
            source_text,
            location,
        }),
        ExtractionIssue::DuplicateExtraction {
            index,
            first_index,
            context,
            key,
        } => Issue::DuplicateExtraction(DuplicateExtractionIssue {
            extraction_file,
            index,
            first_index,
            context,
            key,
        }),
    }
}

impl ParseErrorIssue {
    pub fn from_error(file_path: &str, error: &CatalogError) -> Self {
        match error {
            CatalogError::Parse {
                line,
                column,
                message,
            } => Self {
                file_path: file_path.to_string(),
                line: *line,
                column: *column,
                error: message.clone(),
            },
            other => Self {
                file_path: file_path.to_string(),
                line: 0,
                column: 0,
                error: other.to_string(),
            },
        }
    }
}

// ============================================================
// Issue Enum
// ============================================================

/// An issue found while updating, checking or resolving.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    InvalidSource(InvalidSourceIssue),
    InvalidLocation(InvalidLocationIssue),
    DuplicateExtraction(DuplicateExtractionIssue),
    Unfinished(UnfinishedIssue),
    ParseError(ParseErrorIssue),
    LocaleUnavailable(LocaleUnavailableIssue),
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLocation<'a> {
    /// Position inside a file. `line`/`column` are 0 when unknown.
    Position {
        path: &'a str,
        line: usize,
        column: usize,
    },
    /// Whole file.
    File { path: &'a str },
    /// Not tied to a file.
    None,
}

impl ReportLocation<'_> {
    /// Sort key: path, line, column.
    pub fn sort_key(&self) -> (&str, usize, usize) {
        match *self {
            ReportLocation::Position { path, line, column } => (path, line, column),
            ReportLocation::File { path } => (path, 0, 0),
            ReportLocation::None => ("", 0, 0),
        }
    }
}

/// Trait for types that can be reported to CLI.
///
/// Uses `enum_dispatch` for static dispatch on the `Issue` enum.
#[enum_dispatch]
pub trait Report {
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display.
    fn message(&self) -> String;

    fn severity(&self) -> Severity;

    fn rule(&self) -> Rule;

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<&str> {
        None
    }

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for InvalidSourceIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.extraction_file,
        }
    }

    fn message(&self) -> String {
        format!("entry #{} rejected: {}", self.index, self.reason)
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn rule(&self) -> Rule {
        Rule::InvalidSource
    }

    fn details(&self) -> Option<String> {
        (!self.context.is_empty()).then(|| format!("in context '{}'", self.context))
    }
}

impl Report for InvalidLocationIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.extraction_file,
        }
    }

    fn message(&self) -> String {
        format!(
            "entry #{} has invalid location '{}'",
            self.index, self.location
        )
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn rule(&self) -> Rule {
        Rule::InvalidLocation
    }

    fn details(&self) -> Option<String> {
        Some(format!("\"{}\" in context '{}'", self.source_text, self.context))
    }

    fn hint(&self) -> Option<&str> {
        Some("locations need a file name and a line number of at least 1")
    }
}

impl Report for DuplicateExtractionIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.extraction_file,
        }
    }

    fn message(&self) -> String {
        format!(
            "entry #{} duplicates entry #{}",
            self.index, self.first_index
        )
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn rule(&self) -> Rule {
        Rule::DuplicateExtraction
    }

    fn details(&self) -> Option<String> {
        Some(format!(
            "{} in context '{}'; locations merged",
            self.key, self.context
        ))
    }
}

impl Report for UnfinishedIssue {
    fn location(&self) -> ReportLocation<'_> {
        match &self.location {
            Some(location) => ReportLocation::Position {
                path: &location.file_path,
                line: location.line,
                column: 0,
            },
            None => ReportLocation::File {
                path: &self.catalog_file,
            },
        }
    }

    fn message(&self) -> String {
        self.key.to_string()
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn rule(&self) -> Rule {
        Rule::Unfinished
    }

    fn details(&self) -> Option<String> {
        Some(format!(
            "{} in context '{}' ({})",
            self.locale, self.context, self.catalog_file
        ))
    }
}

impl Report for ParseErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Position {
            path: &self.file_path,
            line: self.line,
            column: self.column,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn rule(&self) -> Rule {
        Rule::ParseError
    }
}

impl Report for LocaleUnavailableIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::None
    }

    fn message(&self) -> String {
        format!("no catalog available for locale '{}'", self.locale)
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn rule(&self) -> Rule {
        Rule::LocaleUnavailable
    }

    fn hint(&self) -> Option<&str> {
        Some("falling back to the source text")
    }
}
