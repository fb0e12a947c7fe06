use anyhow::Result;
use tracing::debug;

use super::super::args::ResolveCommand;
use super::{
    CommandResult, CommandSummary, ResolveSummary,
    helper::{Project, finish, unavailable_issues},
};
use crate::{
    core::{LookupEngine, files::load_catalogs},
    error::CatalogError,
    issues::{Issue, ParseErrorIssue},
    utils::normalize_locale,
};

pub fn resolve(cmd: ResolveCommand) -> Result<CommandResult> {
    let project = Project::open(&cmd.common)?;
    let config = &project.loaded.config;
    let engine =
        LookupEngine::new(config.plural_table()).with_fallbacks(config.fallback_table());

    let locale = normalize_locale(&cmd.locale);
    let wanted = engine.fallback_locales(&locale);
    let files: Vec<_> = project
        .scan
        .files
        .iter()
        .filter(|file| wanted.contains(&file.locale))
        .cloned()
        .collect();

    let load = load_catalogs(&files);
    let catalogs_checked = load.catalogs.len() + load.failures.len();
    let mut issues: Vec<Issue> = load
        .failures
        .iter()
        .map(|failure| {
            Issue::ParseError(ParseErrorIssue::from_error(
                &project.display_path(&failure.file.path),
                &failure.error,
            ))
        })
        .collect();

    for (file, catalog) in load.catalogs {
        engine.load_as(&file.locale, catalog);
    }

    let summary = match engine.set_active_locale(&locale) {
        Ok(()) => ResolveSummary {
            text: engine.resolve(
                &cmd.context,
                &cmd.source,
                cmd.disambiguation.as_deref(),
                cmd.count,
            ),
            chain: engine
                .chain()
                .locales()
                .into_iter()
                .map(str::to_string)
                .collect(),
        },
        Err(CatalogError::LocaleUnavailable(missing)) => {
            debug!(locale = %missing, "serving source text");
            issues.extend(unavailable_issues(&[locale]));
            ResolveSummary {
                text: cmd.source.clone(),
                chain: Vec::new(),
            }
        }
        Err(err) => return Err(err.into()),
    };
    engine.teardown();

    Ok(finish(
        CommandSummary::Resolve(summary),
        issues,
        catalogs_checked,
    ))
}
