use crate::core::{CatalogStats, ReconcileSummary};
use crate::issues::Issue;

#[derive(Debug)]
pub enum CommandSummary {
    Update(UpdateSummary),
    Check(CheckSummary),
    Resolve(ResolveSummary),
}

/// Outcome of reconciling one catalog.
#[derive(Debug)]
pub struct LocaleUpdate {
    pub locale: String,
    pub path: String,
    /// The catalog file did not exist before.
    pub created: bool,
    /// The merged catalog differs from the one on disk.
    pub changed: bool,
    pub summary: ReconcileSummary,
}

#[derive(Debug)]
pub struct UpdateSummary {
    pub extraction_file: String,
    /// Items read from the extraction file.
    pub extracted: usize,
    pub locales: Vec<LocaleUpdate>,
    pub is_dry_run: bool,
}

#[derive(Debug)]
pub struct LocaleStats {
    pub locale: String,
    pub path: String,
    pub stats: CatalogStats,
}

#[derive(Debug)]
pub struct CheckSummary {
    pub locales: Vec<LocaleStats>,
}

#[derive(Debug)]
pub struct ResolveSummary {
    pub text: String,
    /// Locales consulted, in order. Empty when the locale is unavailable.
    pub chain: Vec<String>,
}

/// Result of running lingcat commands
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// Issues found, sorted by location.
    pub issues: Vec<Issue>,
    /// Number of catalogs that failed to parse.
    pub parse_error_count: usize,
    /// Number of catalog files that were loaded.
    pub catalogs_checked: usize,
}
