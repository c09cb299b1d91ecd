//! Medicine records and the languages prescriptions are read in.
//!
//! A `MedicineRecord` is what the extraction boundary produces for each line
//! of a prescription. Only `time` is interpreted downstream; `dosage` and
//! `frequency` are display text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MedRushError;

/// Target language for extraction summaries, speech, and UI labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "te")]
    Telugu,
    #[serde(rename = "hi")]
    Hindi,
}

impl Language {
    /// Every supported language, in selection-screen order.
    pub const ALL: [Language; 3] = [Language::English, Language::Telugu, Language::Hindi];

    /// Two-letter code used in config files and locale tables.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Telugu => "te",
            Language::Hindi => "hi",
        }
    }

    /// BCP-47 tag handed to speech synthesis.
    pub fn speech_tag(self) -> &'static str {
        match self {
            Language::English => "en-US",
            Language::Telugu => "te-IN",
            Language::Hindi => "hi-IN",
        }
    }

    /// English name of the language, as used in extraction prompts.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Telugu => "Telugu",
            Language::Hindi => "Hindi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = MedRushError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "te" | "telugu" => Ok(Language::Telugu),
            "hi" | "hindi" => Ok(Language::Hindi),
            other => Err(MedRushError::ConfigError {
                reason: format!("unsupported language '{other}' (expected en, te, or hi)"),
            }),
        }
    }
}

/// Adherence status of one medicine.
///
/// Always `Pending` when a record is created. Only caretaker or nurse
/// actions change it; schedule classification never reads or writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicineStatus {
    #[default]
    Pending,
    Taken,
    Missed,
}

impl MedicineStatus {
    /// The raw status string, also the locale-table key for its label.
    pub fn as_str(self) -> &'static str {
        match self {
            MedicineStatus::Pending => "pending",
            MedicineStatus::Taken => "taken",
            MedicineStatus::Missed => "missed",
        }
    }
}

impl fmt::Display for MedicineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One medicine line extracted from a prescription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineRecord {
    pub name: String,
    /// Free text, e.g. "500mg".
    pub dosage: String,
    /// Free text, e.g. "twice daily".
    pub frequency: String,
    /// Free text, e.g. "After Breakfast" or "9 PM".
    pub time: String,
    #[serde(default)]
    pub status: MedicineStatus,
}

impl MedicineRecord {
    /// Build a freshly extracted record. Status starts as `Pending`.
    pub fn new(
        name: impl Into<String>,
        dosage: impl Into<String>,
        frequency: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            dosage: dosage.into(),
            frequency: frequency.into(),
            time: time.into(),
            status: MedicineStatus::Pending,
        }
    }

    /// Return a copy carrying `status`. Used by roster seeding and tests.
    pub fn with_status(mut self, status: MedicineStatus) -> Self {
        self.status = status;
        self
    }
}
