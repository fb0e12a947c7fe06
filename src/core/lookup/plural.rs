//! Plural rules.
//!
//! Each catalog stores plural translations as an ordered list of forms; the
//! form to display for a count is chosen by the rule family of the catalog's
//! language. Rules are plain data: a locale table maps locale identifiers to
//! a [`PluralRule`], and every rule is a pure `count -> index` function.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

use crate::utils::base_language;

/// Plural rule families, named after a representative language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PluralRule {
    /// One form for every count (Japanese, Chinese, Korean, ...).
    Single,
    /// 1 | other.
    English,
    /// 0..=1 | other.
    French,
    /// n%10==1 && n%100!=11 | n!=0 | zero.
    Latvian,
    /// 1 | 2 | other.
    Irish,
    /// 1 | 0 or n%100 in 1..=19 | other.
    Romanian,
    /// n%10==1 && n%100 not in 11..=19 | n%10>=2 && n%100 not in 10..=19 | other.
    Lithuanian,
    /// n%10==1 && n%100!=11 | n%10 in 2..=4 && n%100 not in 10..=19 | other.
    Russian,
    /// 1 | 2..=4 | other.
    Czech,
    /// 1 | n%10 in 2..=4 && n%100 not in 10..=19 | other.
    Polish,
    /// n%100==1 | n%100==2 | n%100 in 3..=4 | other.
    Slovenian,
    /// n%10==1 | n%10==2 | other.
    Macedonian,
    /// 1 | 2 | 8 or 11 | other.
    Welsh,
    /// 1 | 0 or n%100 in 1..=10 | n%100 in 11..=19 | other.
    Maltese,
    /// 0 | 1 | 2 | n%100 in 3..=10 | n%100 in 11..=99 | other.
    Arabic,
}

impl PluralRule {
    /// Number of plural forms a catalog in this family must provide.
    pub fn form_count(&self) -> usize {
        match self {
            PluralRule::Single => 1,
            PluralRule::English | PluralRule::French => 2,
            PluralRule::Latvian
            | PluralRule::Irish
            | PluralRule::Romanian
            | PluralRule::Lithuanian
            | PluralRule::Russian
            | PluralRule::Czech
            | PluralRule::Polish
            | PluralRule::Macedonian => 3,
            PluralRule::Slovenian | PluralRule::Welsh | PluralRule::Maltese => 4,
            PluralRule::Arabic => 6,
        }
    }

    /// Plural form index for `count`. Always below [`form_count`](Self::form_count).
    pub fn category(&self, count: i64) -> usize {
        let n = count.unsigned_abs();
        let n10 = n % 10;
        let n100 = n % 100;
        match self {
            PluralRule::Single => 0,
            PluralRule::English => usize::from(n != 1),
            PluralRule::French => usize::from(n > 1),
            PluralRule::Latvian => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if n != 0 {
                    1
                } else {
                    2
                }
            }
            PluralRule::Irish => match n {
                1 => 0,
                2 => 1,
                _ => 2,
            },
            PluralRule::Romanian => {
                if n == 1 {
                    0
                } else if n == 0 || (1..=19).contains(&n100) {
                    1
                } else {
                    2
                }
            }
            PluralRule::Lithuanian => {
                if n10 == 1 && !(11..=19).contains(&n100) {
                    0
                } else if n10 >= 2 && !(10..=19).contains(&n100) {
                    1
                } else {
                    2
                }
            }
            PluralRule::Russian => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if (2..=4).contains(&n10) && !(10..=19).contains(&n100) {
                    1
                } else {
                    2
                }
            }
            PluralRule::Czech => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
            PluralRule::Polish => {
                if n == 1 {
                    0
                } else if (2..=4).contains(&n10) && !(10..=19).contains(&n100) {
                    1
                } else {
                    2
                }
            }
            PluralRule::Slovenian => match n100 {
                1 => 0,
                2 => 1,
                3 | 4 => 2,
                _ => 3,
            },
            PluralRule::Macedonian => match n10 {
                1 => 0,
                2 => 1,
                _ => 2,
            },
            PluralRule::Welsh => match n {
                1 => 0,
                2 => 1,
                8 | 11 => 2,
                _ => 3,
            },
            PluralRule::Maltese => {
                if n == 1 {
                    0
                } else if n == 0 || (1..=10).contains(&n100) {
                    1
                } else if (11..=19).contains(&n100) {
                    2
                } else {
                    3
                }
            }
            PluralRule::Arabic => match (n, n100) {
                (0, _) => 0,
                (1, _) => 1,
                (2, _) => 2,
                (_, 3..=10) => 3,
                (_, 11..=99) => 4,
                _ => 5,
            },
        }
    }
}

impl fmt::Display for PluralRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PluralRule::Single => "single",
            PluralRule::English => "english",
            PluralRule::French => "french",
            PluralRule::Latvian => "latvian",
            PluralRule::Irish => "irish",
            PluralRule::Romanian => "romanian",
            PluralRule::Lithuanian => "lithuanian",
            PluralRule::Russian => "russian",
            PluralRule::Czech => "czech",
            PluralRule::Polish => "polish",
            PluralRule::Slovenian => "slovenian",
            PluralRule::Macedonian => "macedonian",
            PluralRule::Welsh => "welsh",
            PluralRule::Maltese => "maltese",
            PluralRule::Arabic => "arabic",
        };
        write!(f, "{}", name)
    }
}

/// Built-in locale table. Region-specific entries win over the language.
const BUILTIN_RULES: &[(&str, PluralRule)] = &[
    ("ja", PluralRule::Single),
    ("zh", PluralRule::Single),
    ("ko", PluralRule::Single),
    ("vi", PluralRule::Single),
    ("th", PluralRule::Single),
    ("id", PluralRule::Single),
    ("ms", PluralRule::Single),
    ("tr", PluralRule::Single),
    ("ka", PluralRule::Single),
    ("lo", PluralRule::Single),
    ("km", PluralRule::Single),
    ("en", PluralRule::English),
    ("de", PluralRule::English),
    ("nl", PluralRule::English),
    ("sv", PluralRule::English),
    ("da", PluralRule::English),
    ("nb", PluralRule::English),
    ("nn", PluralRule::English),
    ("fi", PluralRule::English),
    ("et", PluralRule::English),
    ("it", PluralRule::English),
    ("es", PluralRule::English),
    ("pt", PluralRule::English),
    ("ca", PluralRule::English),
    ("el", PluralRule::English),
    ("he", PluralRule::English),
    ("hu", PluralRule::English),
    ("bg", PluralRule::English),
    ("eo", PluralRule::English),
    ("fr", PluralRule::French),
    ("pt_BR", PluralRule::French),
    ("oc", PluralRule::French),
    ("hy", PluralRule::French),
    ("lv", PluralRule::Latvian),
    ("ga", PluralRule::Irish),
    ("ro", PluralRule::Romanian),
    ("lt", PluralRule::Lithuanian),
    ("ru", PluralRule::Russian),
    ("uk", PluralRule::Russian),
    ("be", PluralRule::Russian),
    ("sr", PluralRule::Russian),
    ("hr", PluralRule::Russian),
    ("bs", PluralRule::Russian),
    ("cs", PluralRule::Czech),
    ("sk", PluralRule::Czech),
    ("pl", PluralRule::Polish),
    ("sl", PluralRule::Slovenian),
    ("mk", PluralRule::Macedonian),
    ("cy", PluralRule::Welsh),
    ("mt", PluralRule::Maltese),
    ("ar", PluralRule::Arabic),
];

/// Locale -> plural rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralRules {
    table: HashMap<String, PluralRule>,
    fallback: PluralRule,
}

impl Default for PluralRules {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PluralRules {
    /// Table with the built-in entries only.
    pub fn builtin() -> Self {
        Self {
            table: BUILTIN_RULES
                .iter()
                .map(|(locale, rule)| (locale.to_string(), *rule))
                .collect(),
            fallback: PluralRule::English,
        }
    }

    /// Empty table: every locale resolves to `fallback`.
    pub fn empty(fallback: PluralRule) -> Self {
        Self {
            table: HashMap::new(),
            fallback,
        }
    }

    /// Add or replace entries.
    pub fn with_overrides<I, S>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (S, PluralRule)>,
        S: Into<String>,
    {
        self.table
            .extend(overrides.into_iter().map(|(locale, rule)| (locale.into(), rule)));
        self
    }

    /// Rule for `locale`: exact entry, then its base language, then the
    /// fallback rule.
    pub fn rule_for(&self, locale: &str) -> PluralRule {
        let locale = locale.replace('-', "_");
        self.table
            .get(&locale)
            .or_else(|| self.table.get(base_language(&locale)))
            .copied()
            .unwrap_or(self.fallback)
    }

    pub fn category(&self, locale: &str, count: i64) -> usize {
        self.rule_for(locale).category(count)
    }
}

// ============================================================
// Tests
// ============================================================
