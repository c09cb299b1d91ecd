//! Collaborator traits for MedRush.
//!
//! Every volatile third-party integration sits behind a single-method trait
//! so adapters can be swapped without touching the classifier or the call
//! state machine:
//!
//! - `ExtractionProvider`: prescription image → raw JSON
//! - `ExtractionVerifier`: raw JSON → verified `ExtractionResult`
//! - `VoiceProvider`     : text → speech playback
//! - `CallOutProvider`   : request a real reminder call
//! - `IdentityProvider`  : phone OTP verification
//! - `PatientStore`      : users, patients, prescriptions
//! - `Translations`      : locale key → display string

use std::collections::HashMap;
use std::time::Duration;

use medrush_contracts::{
    error::MedRushResult,
    extraction::{ExtractionRequest, ExtractionResult},
    medicine::{Language, MedicineRecord, MedicineStatus},
    user::{Patient, PrescriptionRecord, UserProfile},
};

/// Reads a prescription image and returns the provider's raw JSON answer.
///
/// Implementations make exactly one attempt. Any failure, including a
/// timeout, is reported as `MedRushError::ExtractionFailed`.
pub trait ExtractionProvider: Send + Sync {
    fn extract(&self, request: &ExtractionRequest) -> MedRushResult<serde_json::Value>;
}

/// Turns raw extraction output into a verified result.
///
/// Malformed output is rejected as a whole; partial results are never
/// returned. Every medicine in a passing result has status `Pending`.
pub trait ExtractionVerifier: Send + Sync {
    fn verify(&self, raw: &serde_json::Value) -> MedRushResult<ExtractionResult>;
}

/// Outcome of starting speech playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Playback {
    /// When playback will signal completion. `None` means no completion
    /// signal will arrive.
    pub completes_after: Option<Duration>,
}

impl Playback {
    pub fn finishing_after(duration: Duration) -> Self {
        Self { completes_after: Some(duration) }
    }

    pub fn without_signal() -> Self {
        Self { completes_after: None }
    }
}

/// Converts text to audible speech.
pub trait VoiceProvider: Send + Sync {
    /// Start speaking `text` in `language`.
    ///
    /// An `Err` means playback could not start. Callers treat that the same
    /// as playback having finished.
    fn speak(&self, text: &str, language: Language) -> MedRushResult<Playback>;
}

/// Acknowledgement from a call-out provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutReceipt {
    /// Provider-reported status, e.g. "queued" or "not_implemented".
    pub status: String,
    pub message: String,
}

/// Places an outbound reminder call to a patient.
pub trait CallOutProvider: Send + Sync {
    fn call_out(&self, patient: &Patient, message: &str) -> MedRushResult<CallOutReceipt>;
}

/// Handle returned when an OTP has been sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    pub phone: String,
    /// Provider-side id of this verification attempt.
    pub verification_id: String,
}

/// Phone-number verification.
pub trait IdentityProvider: Send + Sync {
    fn send_otp(&self, phone: &str) -> MedRushResult<OtpChallenge>;

    /// Confirm `code` for `challenge`. Returns the verified user id.
    fn verify_otp(&self, challenge: &OtpChallenge, code: &str) -> MedRushResult<String>;
}

/// The document store holding users, patients, and prescriptions.
///
/// All methods take `&self`; implementations provide their own interior
/// synchronisation.
pub trait PatientStore: Send + Sync {
    /// Create or merge the user document for `profile.uid`.
    fn upsert_user(&self, profile: &UserProfile) -> MedRushResult<()>;

    /// Find the patient with `phone`, creating a default record if absent.
    /// Returns the patient id.
    fn get_or_create_patient(&self, phone: &str) -> MedRushResult<String>;

    fn patient(&self, patient_id: &str) -> MedRushResult<Patient>;

    /// Rename a patient.
    fn rename_patient(&self, patient_id: &str, name: &str) -> MedRushResult<()>;

    /// Add `caretaker_id` to the patient's caretakers (set semantics) and
    /// mark the patient as having a caretaker.
    fn link_caretaker(
        &self,
        patient_id: &str,
        caretaker_id: &str,
        relation: Option<&str>,
    ) -> MedRushResult<()>;

    fn link_nurse(&self, patient_id: &str, nurse_id: &str) -> MedRushResult<()>;

    fn unlink_caretaker(&self, patient_id: &str, caretaker_id: &str) -> MedRushResult<()>;

    fn unlink_nurse(&self, patient_id: &str, nurse_id: &str) -> MedRushResult<()>;

    /// Delete a patient and its prescription history.
    fn remove_patient(&self, patient_id: &str) -> MedRushResult<()>;

    fn patients_for_caretaker(&self, caretaker_id: &str) -> MedRushResult<Vec<Patient>>;

    fn patients_for_nurse(&self, nurse_id: &str) -> MedRushResult<Vec<Patient>>;

    /// Set the status of the medicine at `index` in the patient's current list.
    fn update_medicine_status(
        &self,
        patient_id: &str,
        index: usize,
        status: MedicineStatus,
    ) -> MedRushResult<()>;

    /// Store a content-addressed copy of a prescription image and return its
    /// reference.
    fn upload_image(&self, patient_id: &str, image: &[u8]) -> MedRushResult<String>;

    /// Append a prescription and make its medicines the patient's current list.
    fn store_prescription(
        &self,
        patient_id: &str,
        medicines: &[MedicineRecord],
        image_ref: Option<&str>,
    ) -> MedRushResult<PrescriptionRecord>;

    /// All prescriptions for a patient, newest first.
    fn patient_prescriptions(&self, patient_id: &str) -> MedRushResult<Vec<PrescriptionRecord>>;
}

/// A locale table: translation key → display string.
pub trait Translations {
    fn lookup(&self, key: &str) -> Option<&str>;
}

impl Translations for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}
