use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::lookup::{PluralRule, PluralRules};

pub const CONFIG_FILE_NAME: &str = ".lingcatrc.json";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory scanned recursively for `*.ts` catalogs.
    #[serde(default = "default_catalogs_root")]
    pub catalogs_root: String,
    /// File name prefix of new catalogs: `<prefix>_<locale>.ts`.
    #[serde(default)]
    pub catalog_prefix: String,
    /// Scanner output consumed by `update`.
    #[serde(default = "default_extraction")]
    pub extraction: String,
    #[serde(default = "default_source_language")]
    pub source_language: String,
    #[serde(default)]
    pub ignores: Vec<String>,
    /// Locale -> ordered fallback locales.
    #[serde(default)]
    pub fallbacks: BTreeMap<String, Vec<String>>,
    /// Locale -> plural rule family, on top of the built-in table.
    #[serde(default)]
    pub plural_rules: BTreeMap<String, PluralRule>,
    /// Prune vanished messages on every update.
    #[serde(default)]
    pub prune: bool,
}

fn default_catalogs_root() -> String {
    "./translations".to_string()
}

fn default_extraction() -> String {
    "./extraction.json".to_string()
}

fn default_source_language() -> String {
    "en".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalogs_root: default_catalogs_root(),
            catalog_prefix: String::new(),
            extraction: default_extraction(),
            source_language: default_source_language(),
            ignores: Vec::new(),
            fallbacks: BTreeMap::new(),
            plural_rules: BTreeMap::new(),
            prune: false,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern in `ignores` is invalid or a
    /// locale in `fallbacks` or `pluralRules` is empty.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        for (locale, chain) in &self.fallbacks {
            if locale.trim().is_empty() || chain.iter().any(|l| l.trim().is_empty()) {
                bail!("Empty locale in 'fallbacks'");
            }
        }

        if self.plural_rules.keys().any(|l| l.trim().is_empty()) {
            bail!("Empty locale in 'pluralRules'");
        }

        Ok(())
    }

    /// Built-in plural table with the configured overrides applied.
    pub fn plural_table(&self) -> PluralRules {
        PluralRules::builtin().with_overrides(
            self.plural_rules
                .iter()
                .map(|(locale, rule)| (locale.replace('-', "_"), *rule)),
        )
    }

    pub fn fallback_table(&self) -> HashMap<String, Vec<String>> {
        self.fallbacks
            .iter()
            .map(|(locale, chain)| (locale.clone(), chain.clone()))
            .collect()
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Directory relative paths in the config are resolved against: the
    /// config file's directory, or the start directory without one.
    pub root: PathBuf,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

impl ConfigLoadResult {
    pub fn catalogs_root(&self) -> PathBuf {
        self.root.join(&self.config.catalogs_root)
    }

    pub fn extraction_path(&self) -> PathBuf {
        self.root.join(&self.config.extraction)
    }
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            let root = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start_dir.to_path_buf());
            Ok(ConfigLoadResult {
                config,
                root,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            root: start_dir.to_path_buf(),
            from_file: false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.catalogs_root, "./translations");
        assert_eq!(config.source_language, "en");
        assert!(config.ignores.is_empty());
        assert!(!config.prune);
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
              "catalogsRoot": "./i18n",
              "catalogPrefix": "lrc",
              "fallbacks": { "pt_BR": ["pt", "es"] },
              "pluralRules": { "pt_BR": "english" },
              "prune": true
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.catalogs_root, "./i18n");
        assert_eq!(config.catalog_prefix, "lrc");
        assert_eq!(config.fallbacks["pt_BR"], vec!["pt", "es"]);
        assert_eq!(config.plural_rules["pt_BR"], PluralRule::English);
        assert!(config.prune);
        assert_eq!(config.extraction, "./extraction.json");
    }

    #[test]
    fn test_plural_overrides_apply() {
        let config: Config =
            serde_json::from_str(r#"{ "pluralRules": { "pt-BR": "english" } }"#).unwrap();
        assert_eq!(config.plural_table().rule_for("pt_BR"), PluralRule::English);
        assert_eq!(Config::default().plural_table().rule_for("pt_BR"), PluralRule::French);
    }

    #[test]
    fn test_unknown_plural_rule_fails() {
        let result: std::result::Result<Config, _> =
            serde_json::from_str(r#"{ "pluralRules": { "pt_BR": "klingon" } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("src").join("ui");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        let found = find_config_file(&sub_dir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        assert!(find_config_file(dir.path()).is_none());
    }

    #[test]
    fn test_load_config_resolves_paths_from_config_dir() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("src");
        fs::create_dir_all(&sub_dir).unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "catalogsRoot": "i18n" }"#,
        )
        .unwrap();

        let result = load_config(&sub_dir).unwrap();
        assert!(result.from_file);
        assert_eq!(result.catalogs_root(), dir.path().join("i18n"));
        assert_eq!(
            result.extraction_path(),
            dir.path().join("./extraction.json")
        );
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(!result.from_file);
        assert_eq!(result.config, Config::default());
        assert_eq!(result.root, dir.path());
    }

    #[test]
    fn test_validate_invalid_ignore_pattern() {
        let config = Config {
            ignores: vec!["[invalid".to_string()],
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("ignores"));
    }

    #[test]
    fn test_validate_empty_fallback_locale() {
        let config = Config {
            fallbacks: BTreeMap::from([("pt_BR".to_string(), vec![String::new()])]),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_with_invalid_pattern_fails() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "ignores": ["[invalid"] }"#,
        )
        .unwrap();

        assert!(load_config(dir.path()).is_err());
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let json = default_config_json().unwrap();
        assert!(json.contains("catalogsRoot"));
        assert!(json.contains("sourceLanguage"));
        assert!(!json.contains("catalogs_root"));
    }
}
