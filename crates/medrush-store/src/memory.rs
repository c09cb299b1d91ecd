//! In-memory implementation of `PatientStore`.
//!
//! `InMemoryStore` keeps users, patients, prescriptions, and image bytes in
//! one `InMemoryState` behind `Arc<Mutex<_>>`. Cloning the store clones the
//! handle, so every clone sees the same data.
//!
//! Semantics mirror a document store:
//!
//! - user documents are merged on upsert
//! - caretaker and nurse links have set semantics
//! - prescriptions are append-only with a monotonic sequence, and the
//!   newest one also becomes the patient's current medicine list

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use medrush_contracts::{
    error::{MedRushError, MedRushResult},
    medicine::{MedicineRecord, MedicineStatus},
    user::{Patient, PrescriptionRecord, UserProfile},
};
use medrush_core::traits::PatientStore;

use crate::digest::image_ref;

// ── Internal mutable state ────────────────────────────────────────────────────

#[derive(Default)]
pub(crate) struct InMemoryState {
    pub(crate) users: HashMap<String, UserProfile>,
    /// Patients in creation order.
    pub(crate) patients: Vec<Patient>,
    /// Every stored prescription, in append order.
    pub(crate) prescriptions: Vec<PrescriptionRecord>,
    pub(crate) images: HashMap<String, Vec<u8>>,
    pub(crate) next_sequence: u64,
}

impl InMemoryState {
    fn patient_mut(&mut self, patient_id: &str) -> MedRushResult<&mut Patient> {
        self.patients
            .iter_mut()
            .find(|p| p.id == patient_id)
            .ok_or_else(|| not_found("patient", patient_id))
    }
}

fn not_found(kind: &str, id: &str) -> MedRushError {
    MedRushError::NotFound {
        kind: kind.to_string(),
        id: id.to_string(),
    }
}

fn add_unique(ids: &mut Vec<String>, id: &str) {
    if !ids.iter().any(|existing| existing == id) {
        ids.push(id.to_string());
    }
}

// ── Public store ──────────────────────────────────────────────────────────────

/// A shared, thread-safe, in-memory document store.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    pub(crate) state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MedRushResult<MutexGuard<'_, InMemoryState>> {
        self.state.lock().map_err(|e| MedRushError::StoreFailed {
            reason: format!("store state lock poisoned: {}", e),
        })
    }

    fn with_patient<T>(
        &self,
        patient_id: &str,
        f: impl FnOnce(&mut Patient) -> T,
    ) -> MedRushResult<T> {
        let mut state = self.lock()?;
        Ok(f(state.patient_mut(patient_id)?))
    }

    /// The stored profile for `uid`.
    pub fn user(&self, uid: &str) -> MedRushResult<UserProfile> {
        self.lock()?
            .users
            .get(uid)
            .cloned()
            .ok_or_else(|| not_found("user", uid))
    }

    /// The bytes stored under an image reference.
    pub fn image(&self, reference: &str) -> MedRushResult<Vec<u8>> {
        self.lock()?
            .images
            .get(reference)
            .cloned()
            .ok_or_else(|| not_found("image", reference))
    }

    /// Every patient, in creation order.
    pub fn all_patients(&self) -> MedRushResult<Vec<Patient>> {
        Ok(self.lock()?.patients.clone())
    }
}

// ── PatientStore impl ─────────────────────────────────────────────────────────

impl PatientStore for InMemoryStore {
    /// Merge `profile` into the stored user. An existing hospital name is
    /// kept when the update carries none.
    fn upsert_user(&self, profile: &UserProfile) -> MedRushResult<()> {
        let mut state = self.lock()?;
        let merged = match state.users.get(&profile.uid) {
            Some(existing) => UserProfile {
                hospital_name: profile
                    .hospital_name
                    .clone()
                    .or_else(|| existing.hospital_name.clone()),
                ..profile.clone()
            },
            None => profile.clone(),
        };
        debug!(uid = %merged.uid, role = %merged.role, "user upserted");
        state.users.insert(merged.uid.clone(), merged);
        Ok(())
    }

    fn get_or_create_patient(&self, phone: &str) -> MedRushResult<String> {
        let mut state = self.lock()?;
        if let Some(existing) = state.patients.iter().find(|p| p.phone == phone) {
            return Ok(existing.id.clone());
        }

        let id = Uuid::new_v4().to_string();
        state.patients.push(Patient {
            id: id.clone(),
            name: Patient::DEFAULT_NAME.to_string(),
            phone: phone.to_string(),
            relation: None,
            medicines: Vec::new(),
            has_caretaker: false,
            caretaker_ids: Vec::new(),
            nurse_ids: Vec::new(),
            created_at: Utc::now(),
        });
        info!(patient_id = %id, phone = %phone, "patient created");
        Ok(id)
    }

    fn patient(&self, patient_id: &str) -> MedRushResult<Patient> {
        self.with_patient(patient_id, |p| p.clone())
    }

    fn rename_patient(&self, patient_id: &str, name: &str) -> MedRushResult<()> {
        self.with_patient(patient_id, |p| p.name = name.to_string())
    }

    fn link_caretaker(
        &self,
        patient_id: &str,
        caretaker_id: &str,
        relation: Option<&str>,
    ) -> MedRushResult<()> {
        self.with_patient(patient_id, |p| {
            add_unique(&mut p.caretaker_ids, caretaker_id);
            if let Some(relation) = relation {
                p.relation = Some(relation.to_string());
            }
            p.has_caretaker = true;
        })?;
        debug!(patient_id, caretaker_id, "caretaker linked");
        Ok(())
    }

    fn link_nurse(&self, patient_id: &str, nurse_id: &str) -> MedRushResult<()> {
        self.with_patient(patient_id, |p| add_unique(&mut p.nurse_ids, nurse_id))?;
        debug!(patient_id, nurse_id, "nurse linked");
        Ok(())
    }

    fn unlink_caretaker(&self, patient_id: &str, caretaker_id: &str) -> MedRushResult<()> {
        self.with_patient(patient_id, |p| {
            p.caretaker_ids.retain(|c| c != caretaker_id);
            p.has_caretaker = !p.caretaker_ids.is_empty();
        })
    }

    fn unlink_nurse(&self, patient_id: &str, nurse_id: &str) -> MedRushResult<()> {
        self.with_patient(patient_id, |p| p.nurse_ids.retain(|n| n != nurse_id))
    }

    fn remove_patient(&self, patient_id: &str) -> MedRushResult<()> {
        let mut state = self.lock()?;
        let before = state.patients.len();
        state.patients.retain(|p| p.id != patient_id);
        if state.patients.len() == before {
            return Err(not_found("patient", patient_id));
        }
        state.prescriptions.retain(|r| r.patient_id != patient_id);
        let prefix = format!("prescriptions/{patient_id}/");
        state.images.retain(|reference, _| !reference.starts_with(&prefix));
        info!(patient_id, "patient removed");
        Ok(())
    }

    fn patients_for_caretaker(&self, caretaker_id: &str) -> MedRushResult<Vec<Patient>> {
        Ok(self
            .lock()?
            .patients
            .iter()
            .filter(|p| p.caretaker_ids.iter().any(|c| c == caretaker_id))
            .cloned()
            .collect())
    }

    fn patients_for_nurse(&self, nurse_id: &str) -> MedRushResult<Vec<Patient>> {
        Ok(self
            .lock()?
            .patients
            .iter()
            .filter(|p| p.nurse_ids.iter().any(|n| n == nurse_id))
            .cloned()
            .collect())
    }

    fn update_medicine_status(
        &self,
        patient_id: &str,
        index: usize,
        status: MedicineStatus,
    ) -> MedRushResult<()> {
        let mut state = self.lock()?;
        let patient = state.patient_mut(patient_id)?;
        let medicine = patient
            .medicines
            .get_mut(index)
            .ok_or_else(|| not_found("medicine", &index.to_string()))?;
        medicine.status = status;
        debug!(patient_id, index, status = %status, "medicine status set");
        Ok(())
    }

    fn upload_image(&self, patient_id: &str, image: &[u8]) -> MedRushResult<String> {
        let mut state = self.lock()?;
        state.patient_mut(patient_id)?;
        let reference = image_ref(patient_id, image);
        state
            .images
            .entry(reference.clone())
            .or_insert_with(|| image.to_vec());
        debug!(patient_id, reference = %reference, bytes = image.len(), "image stored");
        Ok(reference)
    }

    fn store_prescription(
        &self,
        patient_id: &str,
        medicines: &[MedicineRecord],
        image_ref: Option<&str>,
    ) -> MedRushResult<PrescriptionRecord> {
        let mut state = self.lock()?;
        state.patient_mut(patient_id)?.medicines = medicines.to_vec();

        let record = PrescriptionRecord {
            id: Uuid::new_v4().to_string(),
            patient_id: patient_id.to_string(),
            sequence: state.next_sequence,
            medicines: medicines.to_vec(),
            image_ref: image_ref.map(str::to_string),
            created_at: Utc::now(),
        };
        state.next_sequence += 1;
        state.prescriptions.push(record.clone());

        info!(
            patient_id,
            sequence = record.sequence,
            medicines = medicines.len(),
            "prescription stored"
        );
        Ok(record)
    }

    fn patient_prescriptions(&self, patient_id: &str) -> MedRushResult<Vec<PrescriptionRecord>> {
        let state = self.lock()?;
        if !state.patients.iter().any(|p| p.id == patient_id) {
            return Err(not_found("patient", patient_id));
        }
        Ok(state
            .prescriptions
            .iter()
            .rev()
            .filter(|r| r.patient_id == patient_id)
            .cloned()
            .collect())
    }
}
