//! Report formatting and printing utilities.
//!
//! Issues are printed cargo-style; command summaries (per-locale merge
//! results, the statistics table, resolved text) follow them. Kept apart
//! from the engine so lingcat can be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{
    CheckSummary, CommandResult, CommandSummary, LocaleUpdate, ResolveSummary, UpdateSummary,
};
use crate::core::ReconcileSummary;
use crate::issues::{Issue, Report, ReportLocation, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format to `writer`, followed by a
/// problem count.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort_by(|a, b| a.location().sort_key().cmp(&b.location().sort_key()));

    for issue in &sorted {
        print_issue(issue, writer);
    }

    print_summary(&sorted, writer);
}

/// Print a success message when no issues are found.
pub fn print_success_to<W: Write>(catalogs: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Checked {} {} - no issues found",
            catalogs,
            if catalogs == 1 { "catalog" } else { "catalogs" }
        )
        .green()
    );
}

pub fn print(result: &CommandResult, verbose: bool) {
    let mut stdout = io::stdout().lock();
    match &result.summary {
        CommandSummary::Update(summary) => {
            report_to(&result.issues, &mut stdout);
            print_update_to(summary, &mut stdout);
        }
        CommandSummary::Check(summary) => {
            report_to(&result.issues, &mut stdout);
            print_stats_to(summary, &mut stdout);
            if result.issues.is_empty() {
                print_success_to(result.catalogs_checked, &mut stdout);
            }
            if !verbose {
                print_unfinished_hint_to(summary, &mut io::stderr().lock());
            }
        }
        CommandSummary::Resolve(summary) => {
            // stdout carries only the text so the command can be scripted.
            report_to(&result.issues, &mut io::stderr().lock());
            print_resolve_to(summary, &mut stdout);
        }
    }
}

// ============================================================
// Issues
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W) {
    let severity_str = match issue.severity() {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        issue.message(),
        issue.rule().to_string().dimmed().cyan()
    );

    if let Some(location) = format_location(&issue.location()) {
        let _ = writeln!(writer, "  {} {}", "-->".blue(), location);
    }

    if let Some(details) = issue.details() {
        let _ = writeln!(writer, "   {} {} {}", "=".blue(), "note:".bold(), details);
    }

    if let Some(hint) = issue.hint() {
        let _ = writeln!(writer, "   {} {} {}", "=".blue(), "hint:".bold().cyan(), hint);
    }

    let _ = writeln!(writer);
}

/// `path:line:col`, dropping the parts that are unknown.
fn format_location(location: &ReportLocation<'_>) -> Option<String> {
    match *location {
        ReportLocation::Position { path, line, column } if line > 0 && column > 0 => {
            Some(format!("{}:{}:{}", path, line, column))
        }
        ReportLocation::Position { path, line, .. } if line > 0 => {
            Some(format!("{}:{}", path, line))
        }
        ReportLocation::Position { path, .. } | ReportLocation::File { path } => {
            Some(path.to_string())
        }
        ReportLocation::None => None,
    }
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();
    let total_warnings = issues.len() - total_errors;
    let total_problems = total_errors + total_warnings;

    if total_problems > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} ({} {}, {} {})",
            FAILURE_MARK.red(),
            total_problems,
            if total_problems == 1 { "problem" } else { "problems" },
            total_errors,
            if total_errors == 1 { "error" } else { "errors" }.red(),
            total_warnings,
            if total_warnings == 1 {
                "warning"
            } else {
                "warnings"
            }
            .yellow()
        );
        let _ = writeln!(writer);
    }
}

// ============================================================
// Update
// ============================================================

fn print_update_to<W: Write>(summary: &UpdateSummary, writer: &mut W) {
    for locale in &summary.locales {
        print_locale_update(locale, summary.is_dry_run, writer);
    }

    let changed = summary.locales.iter().filter(|l| l.changed).count();
    if summary.locales.is_empty() {
        let _ = writeln!(
            writer,
            "{} no catalogs to update (use {} to create one)",
            "warning:".bold().yellow(),
            "--locale".cyan()
        );
    } else if summary.is_dry_run {
        let _ = writeln!(
            writer,
            "{} {} of {} catalog(s) from {} extracted message(s).",
            "Would update".yellow().bold(),
            changed,
            summary.locales.len(),
            summary.extracted
        );
        if changed > 0 {
            let _ = writeln!(writer, "Run without {} to write them.", "--dry-run".cyan());
        }
    } else {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Updated {} of {} catalog(s) from {} extracted message(s)",
                changed,
                summary.locales.len(),
                summary.extracted
            )
            .green()
        );
    }
}

fn print_locale_update<W: Write>(update: &LocaleUpdate, is_dry_run: bool, writer: &mut W) {
    let verb = match (update.created, update.changed, is_dry_run) {
        (true, _, false) => "Created".green().bold(),
        (true, _, true) => "Would create".yellow().bold(),
        (false, true, false) => "Updated".green().bold(),
        (false, true, true) => "Would update".yellow().bold(),
        (false, false, _) => "Unchanged".dimmed(),
    };
    let _ = writeln!(
        writer,
        "{} {} ({}): {}",
        verb,
        update.path,
        update.locale,
        describe_changes(&update.summary)
    );
}

fn describe_changes(summary: &ReconcileSummary) -> String {
    let mut parts = vec![format!("{} matched", summary.matched)];
    let counts = [
        (summary.added, "added"),
        (summary.reactivated, "reactivated"),
        (summary.obsoleted, "obsolete"),
        (summary.vanished, "vanished"),
        (summary.pruned, "pruned"),
        (summary.downgraded, "downgraded"),
    ];
    parts.extend(
        counts
            .iter()
            .filter(|(count, _)| *count > 0)
            .map(|(count, label)| format!("{} {}", count, label)),
    );
    parts.join(", ")
}

// ============================================================
// Check
// ============================================================

const STATS_HEADERS: [&str; 7] = [
    "Locale",
    "Finished",
    "Unfinished",
    "Obsolete",
    "Vanished",
    "Done",
    "Catalog",
];

fn print_stats_to<W: Write>(summary: &CheckSummary, writer: &mut W) {
    if summary.locales.is_empty() {
        return;
    }

    let rows: Vec<[String; 7]> = summary
        .locales
        .iter()
        .map(|l| {
            let active = l.stats.active();
            let done = if active == 0 {
                100
            } else {
                l.stats.finished * 100 / active
            };
            [
                l.locale.clone(),
                l.stats.finished.to_string(),
                l.stats.unfinished.to_string(),
                l.stats.obsolete.to_string(),
                l.stats.vanished.to_string(),
                format!("{}%", done),
                l.path.clone(),
            ]
        })
        .collect();

    let mut widths = STATS_HEADERS.map(|h| UnicodeWidthStr::width(h));
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(UnicodeWidthStr::width(cell.as_str()));
        }
    }

    let header: Vec<String> = STATS_HEADERS
        .iter()
        .enumerate()
        .map(|(i, h)| align(h, widths[i], i))
        .collect();
    let _ = writeln!(writer, "{}", header.join("  ").trim_end().bold());

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| align(cell, widths[i], i))
            .collect();
        let _ = writeln!(writer, "{}", cells.join("  ").trim_end());
    }
    let _ = writeln!(writer);
}

/// Text columns (first and last) are left aligned, counts right aligned.
fn align(cell: &str, width: usize, column: usize) -> String {
    let padding = " ".repeat(width.saturating_sub(UnicodeWidthStr::width(cell)));
    if column == 0 || column == STATS_HEADERS.len() - 1 {
        format!("{}{}", cell, padding)
    } else {
        format!("{}{}", padding, cell)
    }
}

fn print_unfinished_hint_to<W: Write>(summary: &CheckSummary, writer: &mut W) {
    let unfinished: usize = summary.locales.iter().map(|l| l.stats.unfinished).sum();
    if unfinished > 0 {
        let _ = writeln!(
            writer,
            "{} {} unfinished message(s) (use {} for details)",
            "note:".bold(),
            unfinished,
            "-v".cyan()
        );
    }
}

// ============================================================
// Resolve
// ============================================================

fn print_resolve_to<W: Write>(summary: &ResolveSummary, writer: &mut W) {
    let _ = writeln!(writer, "{}", summary.text);
}

// ============================================================
// Tests
// ============================================================
