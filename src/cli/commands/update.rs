//! `update`: merge scanner output into every selected catalog.

use std::path::{Path, PathBuf};

use anyhow::Result;
use rayon::prelude::*;
use tracing::{debug, info};

use super::super::args::UpdateCommand;
use super::{
    CommandResult, CommandSummary, LocaleUpdate, UpdateSummary,
    helper::{Project, display_path, finish, select_files},
};
use crate::{
    config::ConfigLoadResult,
    core::{
        Catalog, ReconcileOptions,
        files::{CatalogFile, load_catalogs, write_catalog},
        parsers::extraction::read_extraction,
        reconcile,
        reconcile::prepare_batch,
    },
    issues::{Issue, ParseErrorIssue, from_extraction_issue},
    utils::catalog_file_name,
};

/// A catalog about to be reconciled.
struct Target {
    file: CatalogFile,
    catalog: Catalog,
    created: bool,
}

pub fn update(cmd: UpdateCommand) -> Result<CommandResult> {
    let project = Project::open(&cmd.common)?;
    let loaded = &project.loaded;
    let root = &loaded.root;

    let extraction_path = cmd
        .extraction
        .clone()
        .unwrap_or_else(|| loaded.extraction_path());
    let extraction_file = project.display_path(&extraction_path);
    let document = read_extraction(&extraction_path)?;
    info!(
        file = %extraction_file,
        messages = document.messages.len(),
        rejected = document.rejected.len(),
        "extraction loaded"
    );

    let mut issues: Vec<Issue> = document
        .rejected
        .iter()
        .cloned()
        .chain(
            prepare_batch(&document.messages)
                .issues
                .into_iter()
                .map(|issue| document.locate(issue)),
        )
        .map(|issue| from_extraction_issue(&extraction_file, issue))
        .collect();

    let (files, missing) = select_files(&project.scan, &cmd.locales);

    let load = load_catalogs(&files);
    let catalogs_checked = load.catalogs.len() + load.failures.len();
    issues.extend(load.failures.iter().map(|failure| {
        Issue::ParseError(ParseErrorIssue::from_error(
            &project.display_path(&failure.file.path),
            &failure.error,
        ))
    }));

    let mut targets: Vec<Target> = load
        .catalogs
        .into_iter()
        .map(|(file, mut catalog)| {
            if catalog.language.is_none() {
                catalog.language = Some(file.locale.clone());
            }
            Target {
                file,
                catalog,
                created: false,
            }
        })
        .collect();
    targets.extend(
        missing
            .into_iter()
            .map(|locale| new_target(loaded, &project.catalogs_root, locale)),
    );

    let prune = cmd.prune || loaded.config.prune;
    let plural_table = loaded.config.plural_table();

    let results: Vec<Result<LocaleUpdate>> = targets
        .into_par_iter()
        .map(|target| {
            let options = ReconcileOptions {
                prune_vanished: prune,
                plural_forms: plural_table.rule_for(&target.file.locale).form_count(),
            };
            let merged = reconcile(&target.catalog, &document.messages, &options);
            let changed = target.created || merged.catalog != target.catalog;

            if changed && !cmd.dry_run {
                write_catalog(&target.file.path, &merged.catalog)?;
                debug!(path = %target.file.path.display(), "catalog written");
            }

            Ok(LocaleUpdate {
                locale: target.file.locale,
                path: display_path(root, &target.file.path),
                created: target.created,
                changed,
                summary: merged.summary,
            })
        })
        .collect();

    let mut locales = results.into_iter().collect::<Result<Vec<_>>>()?;
    locales.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(finish(
        CommandSummary::Update(UpdateSummary {
            extraction_file,
            extracted: document.messages.len() + document.rejected.len(),
            locales,
            is_dry_run: cmd.dry_run,
        }),
        issues,
        catalogs_checked,
    ))
}

fn new_target(loaded: &ConfigLoadResult, catalogs_root: &Path, locale: String) -> Target {
    let path: PathBuf =
        catalogs_root.join(catalog_file_name(&loaded.config.catalog_prefix, &locale));
    let mut catalog = Catalog::with_language(locale.clone());
    catalog.source_language = Some(loaded.config.source_language.clone());
    Target {
        file: CatalogFile { locale, path },
        catalog,
        created: true,
    }
}
