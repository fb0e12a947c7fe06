use std::path::{Component, Path, PathBuf};

use anyhow::Result;

use super::super::args::CommonArgs;
use super::{CommandResult, CommandSummary};
use crate::config::{ConfigLoadResult, load_config};
use crate::core::files::{CatalogFile, ScanResult, scan_catalogs};
use crate::issues::{Issue, LocaleUnavailableIssue, Report, Severity};
use crate::utils::normalize_locale;

pub fn finish(
    summary: CommandSummary,
    mut issues: Vec<Issue>,
    catalogs_checked: usize,
) -> CommandResult {
    issues.sort_by(|a, b| a.location().sort_key().cmp(&b.location().sort_key()));

    let parse_error_count = issues
        .iter()
        .filter(|i| matches!(i, Issue::ParseError(_)))
        .count();

    let error_count = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    CommandResult {
        summary,
        error_count,
        warning_count,
        issues,
        parse_error_count,
        catalogs_checked,
    }
}

/// Configuration and catalogs found from the working directory.
pub struct Project {
    pub loaded: ConfigLoadResult,
    pub catalogs_root: PathBuf,
    pub scan: ScanResult,
}

impl Project {
    pub fn open(common: &CommonArgs) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let loaded = load_config(&cwd)?;
        let catalogs_root = match &common.catalogs_root {
            Some(root) => cwd.join(root),
            None => loaded.catalogs_root(),
        };
        let scan = scan_catalogs(&catalogs_root, &loaded.config.ignores);
        Ok(Self {
            loaded,
            catalogs_root,
            scan,
        })
    }

    pub fn display_path(&self, path: &Path) -> String {
        display_path(&self.loaded.root, path)
    }
}

/// Path as shown to the user: relative to the project root when possible.
pub fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect::<PathBuf>()
        .to_string_lossy()
        .into_owned()
}

/// Catalog files for the requested locales, or every scanned file when
/// none are requested. Locales without a file are returned separately.
pub fn select_files(scan: &ScanResult, locales: &[String]) -> (Vec<CatalogFile>, Vec<String>) {
    if locales.is_empty() {
        return (scan.files.clone(), Vec::new());
    }

    let mut files = Vec::new();
    let mut missing = Vec::new();
    for locale in locales {
        let locale = normalize_locale(locale);
        if files.iter().any(|f: &CatalogFile| f.locale == locale) || missing.contains(&locale) {
            continue;
        }
        match scan.find(&locale) {
            Some(file) => files.push(file.clone()),
            None => missing.push(locale),
        }
    }
    (files, missing)
}

pub fn unavailable_issues(missing: &[String]) -> Vec<Issue> {
    missing
        .iter()
        .map(|locale| {
            Issue::LocaleUnavailable(LocaleUnavailableIssue {
                locale: locale.clone(),
            })
        })
        .collect()
}
