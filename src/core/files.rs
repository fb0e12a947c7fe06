//! Catalog files on disk: discovery, reading and writing.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::Pattern;
use rayon::prelude::*;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::data::Catalog;
use crate::core::parsers::ts::decode;
use crate::core::writers::ts::encode;
use crate::error::CatalogError;
use crate::utils::locale_from_file_name;

pub const CATALOG_EXTENSION: &str = "ts";

/// A catalog file and the locale its name encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFile {
    pub locale: String,
    pub path: PathBuf,
}

impl CatalogFile {
    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Result of scanning for catalog files.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// One file per locale, sorted by path.
    pub files: Vec<CatalogFile>,
    /// Entries that could not be read or carry no locale.
    pub skipped_count: usize,
}

impl ScanResult {
    pub fn find(&self, locale: &str) -> Option<&CatalogFile> {
        self.files.iter().find(|file| file.locale == locale)
    }
}

/// Find `*.ts` catalogs below `root`, skipping paths matched by
/// `ignore_patterns` (relative to `root`).
pub fn scan_catalogs(root: &Path, ignore_patterns: &[String]) -> ScanResult {
    let mut result = ScanResult::default();
    if !root.is_dir() {
        debug!(root = %root.display(), "catalog directory does not exist");
        return result;
    }

    let ignores: Vec<Pattern> = ignore_patterns
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(err) => {
                warn!(pattern = %p, %err, "invalid ignore pattern");
                None
            }
        })
        .collect();

    let mut found: Vec<CatalogFile> = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%err, "cannot access path");
                result.skipped_count += 1;
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(CATALOG_EXTENSION)
        {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if ignores
            .iter()
            .any(|p| p.matches_path(relative) || p.matches_path(path))
        {
            continue;
        }

        match locale_from_file_name(path) {
            Some(locale) => found.push(CatalogFile {
                locale,
                path: path.to_path_buf(),
            }),
            None => {
                debug!(path = %path.display(), "no locale in catalog file name");
                result.skipped_count += 1;
            }
        }
    }

    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    for file in found {
        if let Some(first) = seen.get(&file.locale) {
            warn!(
                locale = %file.locale,
                kept = %first.display(),
                skipped = %file.path.display(),
                "several catalogs for one locale"
            );
            result.skipped_count += 1;
            continue;
        }
        seen.insert(file.locale.clone(), file.path.clone());
        result.files.push(file);
    }
    result
}

/// Read and decode one catalog, keeping the typed error.
pub fn load_catalog(path: &Path) -> std::result::Result<Catalog, CatalogError> {
    let content = fs::read_to_string(path)?;
    decode(&content)
}

pub fn read_catalog(path: &Path) -> Result<Catalog> {
    load_catalog(path).with_context(|| format!("Failed to read catalog: {:?}", path))
}

pub fn write_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    fs::write(path, encode(catalog))
        .with_context(|| format!("Failed to write catalog: {:?}", path))
}

/// A catalog file that could not be loaded.
#[derive(Debug)]
pub struct LoadFailure {
    pub file: CatalogFile,
    pub error: CatalogError,
}

#[derive(Debug, Default)]
pub struct LoadResult {
    /// Loaded catalogs, in the order of the input files.
    pub catalogs: Vec<(CatalogFile, Catalog)>,
    pub failures: Vec<LoadFailure>,
}

/// Load catalogs in parallel. A file that fails to load does not affect
/// the others.
pub fn load_catalogs(files: &[CatalogFile]) -> LoadResult {
    let results: Vec<_> = files
        .par_iter()
        .map(|file| (file.clone(), load_catalog(&file.path)))
        .collect();

    let mut loaded = LoadResult::default();
    for (file, result) in results {
        match result {
            Ok(catalog) => loaded.catalogs.push((file, catalog)),
            Err(error) => {
                warn!(path = %file.path.display(), %error, "catalog not loaded");
                loaded.failures.push(LoadFailure { file, error });
            }
        }
    }
    loaded
}
