use anyhow::{Ok, Result};

use super::super::args::CheckCommand;
use super::{
    CheckSummary, CommandResult, CommandSummary, LocaleStats,
    helper::{Project, finish, select_files, unavailable_issues},
};
use crate::{
    core::{Catalog, MessageStatus, files::load_catalogs},
    issues::{Issue, ParseErrorIssue, UnfinishedIssue},
};

pub fn check(cmd: CheckCommand) -> Result<CommandResult> {
    let project = Project::open(&cmd.common)?;
    let (files, missing) = select_files(&project.scan, &cmd.locales);
    let plural_table = project.loaded.config.plural_table();

    let load = load_catalogs(&files);
    let catalogs_checked = load.catalogs.len() + load.failures.len();

    let mut issues = unavailable_issues(&missing);
    issues.extend(load.failures.iter().map(|failure| {
        Issue::ParseError(ParseErrorIssue::from_error(
            &project.display_path(&failure.file.path),
            &failure.error,
        ))
    }));

    let mut locales = Vec::with_capacity(load.catalogs.len());
    for (file, catalog) in &load.catalogs {
        let path = project.display_path(&file.path);
        let required = plural_table.rule_for(&file.locale).form_count();

        if cmd.common.verbose {
            issues.extend(unfinished_issues(catalog, &file.locale, &path));
        }

        locales.push(LocaleStats {
            locale: file.locale.clone(),
            path,
            stats: catalog.stats(required),
        });
    }

    Ok(finish(
        CommandSummary::Check(CheckSummary { locales }),
        issues,
        catalogs_checked,
    ))
}

fn unfinished_issues(catalog: &Catalog, locale: &str, catalog_file: &str) -> Vec<Issue> {
    catalog
        .messages()
        .filter(|(_, message)| message.status == MessageStatus::Unfinished)
        .map(|(context, message)| {
            Issue::Unfinished(UnfinishedIssue {
                catalog_file: catalog_file.to_string(),
                locale: locale.to_string(),
                context: context.to_string(),
                key: message.key(),
                location: message.locations.first().cloned(),
            })
        })
        .collect()
}
