//! Application settings.
//!
//! Every field has a default, so an empty document is a valid configuration
//! and a file only needs the values it changes:
//!
//! ```toml
//! language = "te"
//!
//! [extraction]
//! model = "gemini-3-pro-preview"
//! timeout_secs = 30
//!
//! [call]
//! ring_delay_ms = 1500
//! grace_delay_ms = 2000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use medrush_contracts::{
    error::{MedRushError, MedRushResult},
    medicine::Language,
};
use medrush_core::CallTimings;

/// Settings for the extraction provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    /// Base URL of the generative-language API.
    pub endpoint: String,
    pub model: String,
    /// Whole-request timeout. A single attempt is made.
    pub timeout_secs: u64,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-3-pro-preview".to_string(),
            timeout_secs: 30,
            api_key_env: "GEMINI_API_KEY".to_string(),
        }
    }
}

impl ExtractionSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> MedRushResult<String> {
        std::env::var(&self.api_key_env).map_err(|_| MedRushError::ConfigError {
            reason: format!("environment variable '{}' is not set", self.api_key_env),
        })
    }
}

/// Delays of the simulated reminder call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallSettings {
    pub ring_delay_ms: u64,
    pub grace_delay_ms: u64,
}

impl Default for CallSettings {
    fn default() -> Self {
        let timings = CallTimings::default();
        Self {
            ring_delay_ms: timings.ring_delay.as_millis() as u64,
            grace_delay_ms: timings.grace_delay.as_millis() as u64,
        }
    }
}

impl CallSettings {
    pub fn timings(&self) -> CallTimings {
        CallTimings {
            ring_delay: Duration::from_millis(self.ring_delay_ms),
            grace_delay: Duration::from_millis(self.grace_delay_ms),
        }
    }
}

/// Stand-in OTP verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// The only code the dummy identity provider accepts.
    pub dummy_otp: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self { dummy_otp: "123456".to_string() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    /// Speech rate relative to normal speed.
    pub rate: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self { rate: 0.95 }
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Language selected at startup.
    pub language: Language,
    /// Optional locale override file, merged over the built-in tables.
    pub locale_file: Option<PathBuf>,
    pub extraction: ExtractionSettings,
    pub call: CallSettings,
    pub auth: AuthSettings,
    pub voice: VoiceSettings,
}

impl AppConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> MedRushResult<Self> {
        let config: AppConfig = toml::from_str(s).map_err(|e| MedRushError::ConfigError {
            reason: format!("failed to parse config TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> MedRushResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| MedRushError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        let config = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), language = %config.language, "configuration loaded");
        Ok(config)
    }

    /// Reject values no adapter can work with.
    pub fn validate(&self) -> MedRushResult<()> {
        let fail = |reason: String| Err(MedRushError::ConfigError { reason });

        if self.extraction.timeout_secs == 0 {
            return fail("extraction.timeout_secs must be greater than zero".to_string());
        }
        if self.extraction.model.trim().is_empty() {
            return fail("extraction.model must not be empty".to_string());
        }
        if !(self.voice.rate > 0.0 && self.voice.rate <= 4.0) {
            return fail(format!("voice.rate {} is outside (0, 4]", self.voice.rate));
        }
        let otp = &self.auth.dummy_otp;
        if otp.is_empty() || !otp.chars().all(|c| c.is_ascii_digit()) {
            return fail(format!("auth.dummy_otp '{otp}' must be digits only"));
        }
        Ok(())
    }
}
