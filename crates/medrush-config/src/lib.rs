//! # medrush-config
//!
//! TOML-driven configuration for MedRush.
//!
//! Two documents are read at startup:
//!
//! - [`AppConfig`]: provider endpoints, call timings, dummy OTP, speech rate.
//!   Every field has a default.
//! - [`LocaleCatalog`]: UI strings per language. The built-in tables are
//!   compiled in; an override file may replace individual keys.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use medrush_config::{AppConfig, LocaleCatalog};
//!
//! let config = AppConfig::from_file(Path::new("medrush.toml"))?;
//! let catalog = LocaleCatalog::load(&config)?;
//! ```

pub mod locale;
pub mod settings;

use medrush_contracts::error::MedRushResult;

pub use locale::{LocaleCatalog, LocaleTable, REQUIRED_KEYS};
pub use settings::{AppConfig, AuthSettings, CallSettings, ExtractionSettings, VoiceSettings};

impl LocaleCatalog {
    /// Built-in tables plus the override file named by `config`, if any.
    pub fn load(config: &AppConfig) -> MedRushResult<Self> {
        let mut catalog = Self::builtin()?;
        if let Some(path) = &config.locale_file {
            catalog.merge_file(path)?;
        }
        Ok(catalog)
    }
}
