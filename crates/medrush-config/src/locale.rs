//! Locale tables.
//!
//! Each supported language has one TOML table of UI strings keyed by
//! translation key. The three built-in tables are compiled into the binary;
//! a file can override individual keys at startup.
//!
//! ```toml
//! language = "te"
//!
//! [strings]
//! morning = "ఉదయం"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use medrush_contracts::{
    error::{MedRushError, MedRushResult},
    medicine::Language,
};
use medrush_core::traits::Translations;

const EN: &str = include_str!("../locales/en.toml");
const TE: &str = include_str!("../locales/te.toml");
const HI: &str = include_str!("../locales/hi.toml");

/// Keys every built-in table defines.
pub const REQUIRED_KEYS: &[&str] = &[
    "appName",
    "startCare",
    "chooseLanguage",
    "whoAreYou",
    "patient",
    "caretaker",
    "nurse",
    "login",
    "name",
    "phone",
    "otp",
    "verify",
    "hospital",
    "uploadPrescription",
    "scanning",
    "readAloud",
    "callReminder",
    "addRelative",
    "relation",
    "patientPhone",
    "add",
    "dashboard",
    "status",
    "missed",
    "taken",
    "pending",
    "summaryTitle",
    "noCaretakerAlert",
    "morning",
    "afternoon",
    "evening",
    "others",
];

/// UI strings for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleTable {
    pub language: Language,
    #[serde(default)]
    pub strings: BTreeMap<String, String>,
}

impl LocaleTable {
    pub fn from_toml_str(s: &str) -> MedRushResult<Self> {
        toml::from_str(s).map_err(|e| MedRushError::ConfigError {
            reason: format!("failed to parse locale TOML: {}", e),
        })
    }

    /// The string for `key`, or the key itself when absent.
    pub fn text<'a>(&'a self, key: &'a str) -> &'a str {
        self.lookup(key).unwrap_or(key)
    }

    /// Required keys this table does not define.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|k| !self.strings.contains_key(*k))
            .collect()
    }
}

impl Translations for LocaleTable {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }
}

/// The tables for every supported language.
#[derive(Debug, Clone)]
pub struct LocaleCatalog {
    tables: [LocaleTable; 3],
}

fn slot(language: Language) -> usize {
    match language {
        Language::English => 0,
        Language::Telugu => 1,
        Language::Hindi => 2,
    }
}

impl LocaleCatalog {
    /// Parse the compiled-in tables.
    pub fn builtin() -> MedRushResult<Self> {
        let mut tables: [LocaleTable; 3] = Default::default();
        for source in [EN, TE, HI] {
            let table = LocaleTable::from_toml_str(source)?;
            let idx = slot(table.language);
            tables[idx] = table;
        }
        debug!("built-in locale tables loaded");
        Ok(Self { tables })
    }

    pub fn table(&self, language: Language) -> &LocaleTable {
        &self.tables[slot(language)]
    }

    /// Text for `key` in `language`, falling back to English, then the key.
    pub fn text<'a>(&'a self, language: Language, key: &'a str) -> &'a str {
        self.table(language)
            .lookup(key)
            .or_else(|| self.table(Language::English).lookup(key))
            .unwrap_or(key)
    }

    /// Merge the keys of a TOML table over the table for its language.
    /// Returns the language that was updated.
    pub fn merge_toml_str(&mut self, s: &str) -> MedRushResult<Language> {
        let overlay = LocaleTable::from_toml_str(s)?;
        let language = overlay.language;
        debug!(language = %language, keys = overlay.strings.len(), "merging locale overrides");
        self.tables[slot(language)].strings.extend(overlay.strings);
        Ok(language)
    }

    /// Read a locale override file and merge it.
    pub fn merge_file(&mut self, path: &Path) -> MedRushResult<()> {
        let contents = std::fs::read_to_string(path).map_err(|e| MedRushError::ConfigError {
            reason: format!("failed to read locale file '{}': {}", path.display(), e),
        })?;
        let language = self.merge_toml_str(&contents)?;
        let missing = self.table(language).missing_keys();
        if !missing.is_empty() {
            warn!(file = %path.display(), missing = ?missing, "locale table incomplete after merge");
        }
        Ok(())
    }
}
