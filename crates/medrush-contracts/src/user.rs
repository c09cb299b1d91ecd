//! Users, patients, and stored prescriptions.
//!
//! These are plain data. The store owns their lifecycle; the core only reads
//! them and passes them through.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{medicine::MedicineRecord, role::Role};

/// The record attached to a session once OTP verification succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable id assigned by the identity provider.
    pub uid: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
    /// Set for nurses; shown as the ward dashboard title.
    #[serde(default)]
    pub hospital_name: Option<String>,
}

/// A patient on someone's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub phone: String,
    /// How the linking caretaker is related, e.g. "Father".
    #[serde(default)]
    pub relation: Option<String>,
    #[serde(default)]
    pub medicines: Vec<MedicineRecord>,
    pub has_caretaker: bool,
    #[serde(default)]
    pub caretaker_ids: Vec<String>,
    #[serde(default)]
    pub nurse_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Patient {
    /// Name used for patients created implicitly by a phone-number link.
    pub const DEFAULT_NAME: &'static str = "New Patient";
}

/// One stored scan result. Prescriptions are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescriptionRecord {
    pub id: String,
    pub patient_id: String,
    /// Position in the store's append order, starting at 0.
    pub sequence: u64,
    pub medicines: Vec<MedicineRecord>,
    /// Content-addressed reference to the uploaded prescription image.
    #[serde(default)]
    pub image_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}
