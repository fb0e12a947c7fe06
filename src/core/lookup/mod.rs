//! Runtime translation lookup.
//!
//! A [`LookupEngine`] owns the loaded catalogs and publishes the active
//! [`CatalogChain`] behind a single swappable `Arc`. Readers clone the `Arc`
//! and resolve against that snapshot with no lock held; a language switch
//! builds the complete new chain first and publishes it with one store, so
//! in-flight lookups keep the chain they started with.

mod chain;
mod plural;

use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;
use tracing::{debug, info};

pub use chain::{CatalogChain, LoadedCatalog};
pub use plural::{PluralRule, PluralRules};

use crate::core::data::Catalog;
use crate::error::{CatalogError, Result};
use crate::utils::{base_language, normalize_locale};

/// Single published value with cheap snapshot reads.
///
/// The lock only guards the pointer: it is held while cloning or replacing
/// the `Arc`, never while the value is used.
#[derive(Debug)]
struct Published<T> {
    inner: RwLock<Arc<T>>,
}

impl<T> Published<T> {
    fn new(value: T) -> Self {
        Self {
            inner: RwLock::new(Arc::new(value)),
        }
    }

    fn load(&self) -> Arc<T> {
        self.inner.read().clone()
    }

    fn store(&self, value: T) {
        let value = Arc::new(value);
        *self.inner.write() = value;
    }
}

/// Loaded catalogs plus the active fallback chain.
///
/// Lifecycle: [`load`](Self::load) catalogs, [`set_active_locale`](Self::set_active_locale)
/// to switch, [`teardown`](Self::teardown) to go back to source texts.
/// Queries never fail: every path ends in the source text.
#[derive(Debug)]
pub struct LookupEngine {
    library: RwLock<HashMap<String, Arc<LoadedCatalog>>>,
    active: Published<CatalogChain>,
    plural_rules: PluralRules,
    fallbacks: HashMap<String, Vec<String>>,
}

impl Default for LookupEngine {
    fn default() -> Self {
        Self::new(PluralRules::builtin())
    }
}

impl LookupEngine {
    pub fn new(plural_rules: PluralRules) -> Self {
        Self {
            library: RwLock::new(HashMap::new()),
            active: Published::new(CatalogChain::empty()),
            plural_rules,
            fallbacks: HashMap::new(),
        }
    }

    /// Explicit fallback locales per locale, replacing the default
    /// "locale, then its base language" chain for the listed locales.
    pub fn with_fallbacks(mut self, fallbacks: HashMap<String, Vec<String>>) -> Self {
        self.fallbacks = fallbacks
            .into_iter()
            .map(|(locale, chain)| {
                (
                    normalize_locale(&locale),
                    chain.iter().map(|l| normalize_locale(l)).collect(),
                )
            })
            .collect();
        self
    }

    pub fn plural_rules(&self) -> &PluralRules {
        &self.plural_rules
    }

    /// Load a catalog under its own `language`.
    pub fn load(&self, catalog: Catalog) -> Result<String> {
        let locale = catalog
            .language
            .clone()
            .ok_or_else(|| CatalogError::LocaleUnavailable(String::new()))?;
        self.load_as(&locale, catalog);
        Ok(normalize_locale(&locale))
    }

    /// Load a catalog under an explicit locale, replacing any previous one.
    ///
    /// The published chain is not affected until the next switch.
    pub fn load_as(&self, locale: &str, catalog: Catalog) {
        let locale = normalize_locale(locale);
        let rule = self.plural_rules.rule_for(&locale);
        debug!(locale = %locale, rule = %rule, messages = catalog.message_count(), "catalog loaded");
        let loaded = Arc::new(LoadedCatalog::new(locale.clone(), rule, catalog));
        self.library.write().insert(locale, loaded);
    }

    /// Forget a catalog. The published chain keeps its own reference.
    pub fn unload(&self, locale: &str) -> bool {
        self.library.write().remove(&normalize_locale(locale)).is_some()
    }

    pub fn available_locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self.library.read().keys().cloned().collect();
        locales.sort();
        locales
    }

    pub fn is_available(&self, locale: &str) -> bool {
        self.library.read().contains_key(&normalize_locale(locale))
    }

    /// Locales consulted for `locale`, in order, before availability checks.
    pub fn fallback_locales(&self, locale: &str) -> Vec<String> {
        let locale = normalize_locale(locale);
        let mut chain = vec![locale.clone()];
        match self.fallbacks.get(&locale) {
            Some(configured) => chain.extend(configured.iter().cloned()),
            None => {
                let base = base_language(&locale);
                if base != locale {
                    chain.push(base.to_string());
                }
            }
        }
        let mut seen = Vec::with_capacity(chain.len());
        chain.retain(|l| {
            let fresh = !seen.contains(l);
            seen.push(l.clone());
            fresh
        });
        chain
    }

    /// Build the chain for `locale` from the loaded catalogs.
    ///
    /// Fails when `locale` itself is not loaded; missing fallbacks are
    /// skipped.
    pub fn build_chain(&self, locale: &str) -> Result<CatalogChain> {
        let library = self.library.read();
        let mut catalogs = Vec::new();
        for (position, candidate) in self.fallback_locales(locale).iter().enumerate() {
            match library.get(candidate) {
                Some(catalog) => catalogs.push(Arc::clone(catalog)),
                None if position == 0 => {
                    return Err(CatalogError::LocaleUnavailable(candidate.clone()));
                }
                None => debug!(locale = %candidate, "fallback catalog not loaded, skipping"),
            }
        }
        Ok(CatalogChain::new(catalogs))
    }

    /// Switch the active language.
    ///
    /// On failure the previously published chain stays active.
    pub fn set_active_locale(&self, locale: &str) -> Result<()> {
        let chain = self.build_chain(locale)?;
        info!(locales = ?chain.locales(), "active locale switched");
        self.active.store(chain);
        Ok(())
    }

    /// Publish an explicit chain of loaded locales, in order.
    pub fn set_chain(&self, locales: &[&str]) -> Result<()> {
        let chain = {
            let library = self.library.read();
            let catalogs = locales
                .iter()
                .map(|locale| {
                    let locale = normalize_locale(locale);
                    library
                        .get(&locale)
                        .cloned()
                        .ok_or(CatalogError::LocaleUnavailable(locale))
                })
                .collect::<Result<Vec<_>>>()?;
            CatalogChain::new(catalogs)
        };
        info!(locales = ?chain.locales(), "active chain replaced");
        self.active.store(chain);
        Ok(())
    }

    /// Publish the empty chain: lookups return source texts again.
    pub fn teardown(&self) {
        self.active.store(CatalogChain::empty());
    }

    pub fn active_locale(&self) -> Option<String> {
        self.active.load().locale().map(str::to_string)
    }

    /// Snapshot of the active chain.
    pub fn chain(&self) -> Arc<CatalogChain> {
        self.active.load()
    }

    /// Resolve against the active chain.
    pub fn resolve(
        &self,
        context: &str,
        source_text: &str,
        disambiguation: Option<&str>,
        count: Option<i64>,
    ) -> String {
        let chain = self.active.load();
        chain
            .resolve(context, source_text, disambiguation, count)
            .to_string()
    }

    /// Resolve against an ad-hoc chain for `locale`, leaving the active
    /// chain alone. An unavailable locale yields the source text.
    pub fn resolve_in(
        &self,
        locale: &str,
        context: &str,
        source_text: &str,
        disambiguation: Option<&str>,
        count: Option<i64>,
    ) -> String {
        match self.build_chain(locale) {
            Ok(chain) => chain
                .resolve(context, source_text, disambiguation, count)
                .to_string(),
            Err(err) => {
                debug!(%err, "lookup falls back to source text");
                source_text.to_string()
            }
        }
    }
}
