use std::sync::Arc;

use super::plural::PluralRule;
use crate::core::data::{Catalog, Message, MessageStatus};

/// A catalog ready to serve lookups: the catalog, its locale and the plural
/// rule used to index its plural forms.
#[derive(Debug)]
pub struct LoadedCatalog {
    locale: String,
    rule: PluralRule,
    catalog: Catalog,
}

impl LoadedCatalog {
    pub fn new(locale: impl Into<String>, rule: PluralRule, catalog: Catalog) -> Self {
        Self {
            locale: locale.into(),
            rule,
            catalog,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn rule(&self) -> PluralRule {
        self.rule
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Displayable translation for the key, if this catalog has one.
    pub fn translate(
        &self,
        context: &str,
        source_text: &str,
        disambiguation: Option<&str>,
        count: Option<i64>,
    ) -> Option<&str> {
        let message = self.catalog.find(context, source_text, disambiguation)?;
        let text = message.text_for(plural_index(message, self.rule, count));
        is_servable(message, text).then_some(text)
    }
}

fn plural_index(message: &Message, rule: PluralRule, count: Option<i64>) -> Option<usize> {
    if message.is_plural {
        count.map(|n| rule.category(n))
    } else {
        None
    }
}

fn is_servable(message: &Message, text: &str) -> bool {
    !text.is_empty() && message.status != MessageStatus::Unfinished
}

/// Ordered list of catalogs consulted until one has a usable translation.
///
/// A chain is immutable; switching languages means building a new chain.
#[derive(Debug, Clone, Default)]
pub struct CatalogChain {
    catalogs: Vec<Arc<LoadedCatalog>>,
}

impl CatalogChain {
    pub fn new(catalogs: Vec<Arc<LoadedCatalog>>) -> Self {
        Self { catalogs }
    }

    /// Chain with no catalogs: every lookup returns the source text.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }

    /// Locale of the first catalog.
    pub fn locale(&self) -> Option<&str> {
        self.catalogs.first().map(|c| c.locale())
    }

    pub fn locales(&self) -> Vec<&str> {
        self.catalogs.iter().map(|c| c.locale()).collect()
    }

    pub fn catalogs(&self) -> &[Arc<LoadedCatalog>] {
        &self.catalogs
    }

    /// Resolve a key to display text.
    ///
    /// Returns the first non-empty, non-unfinished translation along the
    /// chain, or `source_text` itself when none qualifies.
    pub fn resolve<'a>(
        &'a self,
        context: &str,
        source_text: &'a str,
        disambiguation: Option<&str>,
        count: Option<i64>,
    ) -> &'a str {
        self.catalogs
            .iter()
            .find_map(|catalog| catalog.translate(context, source_text, disambiguation, count))
            .unwrap_or(source_text)
    }
}
