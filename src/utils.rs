//! Common utility functions shared across the codebase.

use std::{path::Path, sync::LazyLock};

use regex::Regex;

/// Trailing `<lang>` or `<lang>_<Region>` of a catalog file stem.
static LOCALE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[_.-])([a-z]{2,3}(?:_(?:[A-Z]{2}|[A-Z][a-z]{3}|[0-9]{3}))?)$")
        .expect("locale pattern is valid")
});

/// Canonical locale spelling: `_` as separator.
///
/// ```
/// use lingcat::utils::normalize_locale;
///
/// assert_eq!(normalize_locale("pt-BR"), "pt_BR");
/// assert_eq!(normalize_locale("de"), "de");
/// ```
pub fn normalize_locale(locale: &str) -> String {
    locale.trim().replace('-', "_")
}

/// Language part of a locale identifier.
///
/// ```
/// use lingcat::utils::base_language;
///
/// assert_eq!(base_language("pt_BR"), "pt");
/// assert_eq!(base_language("zh-Hant"), "zh");
/// assert_eq!(base_language("ru"), "ru");
/// ```
pub fn base_language(locale: &str) -> &str {
    locale
        .split(['_', '-'])
        .next()
        .unwrap_or(locale)
}

/// Locale encoded in a catalog file name, e.g. `lrc_pt_BR.ts` -> `pt_BR`.
pub fn locale_from_file_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    LOCALE_SUFFIX
        .captures(stem)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// File name for a new catalog of `locale`.
pub fn catalog_file_name(prefix: &str, locale: &str) -> String {
    if prefix.is_empty() {
        format!("{}.ts", locale)
    } else {
        format!("{}_{}.ts", prefix, locale)
    }
}

/// Byte offsets of every line start. Line 1 starts at offset 0.
pub fn build_line_index(content: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (i, c) in content.char_indices() {
        if c == '\n' {
            offsets.push(i + 1);
        }
    }
    offsets
}

/// 1-based line and column of a byte offset, using a pre-computed index.
pub fn offset_to_position(content: &str, line_index: &[usize], offset: usize) -> (usize, usize) {
    let offset = offset.min(content.len());
    let line = match line_index.binary_search(&offset) {
        Ok(line) => line + 1,
        Err(line) => line,
    };
    let line_start = line_index[line - 1];
    let column = content
        .get(line_start..offset)
        .map(|prefix| prefix.chars().count())
        .unwrap_or(0)
        + 1;
    (line, column)
}
