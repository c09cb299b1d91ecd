//! Test doubles shared by the core test modules.

use std::sync::Mutex;

use chrono::Utc;

use medrush_contracts::{
    error::{MedRushError, MedRushResult},
    medicine::{MedicineRecord, MedicineStatus},
    user::{Patient, PrescriptionRecord, UserProfile},
};

use crate::traits::{IdentityProvider, OtpChallenge, PatientStore};

/// Accepts exactly one code. The uid is derived from the phone number.
pub struct MockIdentity {
    code: String,
}

impl MockIdentity {
    pub fn accepting(code: &str) -> Self {
        Self { code: code.to_string() }
    }
}

impl IdentityProvider for MockIdentity {
    fn send_otp(&self, phone: &str) -> MedRushResult<OtpChallenge> {
        Ok(OtpChallenge {
            phone: phone.to_string(),
            verification_id: "mock-verification".to_string(),
        })
    }

    fn verify_otp(&self, challenge: &OtpChallenge, code: &str) -> MedRushResult<String> {
        if code == self.code {
            Ok(format!("uid-{}", challenge.phone))
        } else {
            Err(MedRushError::VerificationRejected {
                phone: challenge.phone.clone(),
                reason: "invalid code".to_string(),
            })
        }
    }
}

/// A vector-backed store with no indexing.
#[derive(Default)]
pub struct MockStore {
    pub users: Mutex<Vec<UserProfile>>,
    pub patients: Mutex<Vec<Patient>>,
    pub prescriptions: Mutex<Vec<PrescriptionRecord>>,
}

fn not_found(id: &str) -> MedRushError {
    MedRushError::NotFound {
        kind: "patient".to_string(),
        id: id.to_string(),
    }
}

impl MockStore {
    fn with_patient<T>(&self, id: &str, f: impl FnOnce(&mut Patient) -> T) -> MedRushResult<T> {
        let mut patients = self.patients.lock().unwrap();
        let patient = patients.iter_mut().find(|p| p.id == id).ok_or_else(|| not_found(id))?;
        Ok(f(patient))
    }
}

impl PatientStore for MockStore {
    fn upsert_user(&self, profile: &UserProfile) -> MedRushResult<()> {
        let mut users = self.users.lock().unwrap();
        users.retain(|u| u.uid != profile.uid);
        users.push(profile.clone());
        Ok(())
    }

    fn get_or_create_patient(&self, phone: &str) -> MedRushResult<String> {
        let mut patients = self.patients.lock().unwrap();
        if let Some(p) = patients.iter().find(|p| p.phone == phone) {
            return Ok(p.id.clone());
        }
        let id = format!("p{}", patients.len());
        patients.push(Patient {
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
            if !p.caretaker_ids.iter().any(|c| c == caretaker_id) {
                p.caretaker_ids.push(caretaker_id.to_string());
            }
            if let Some(r) = relation {
                p.relation = Some(r.to_string());
            }
            p.has_caretaker = true;
        })
    }

    fn link_nurse(&self, patient_id: &str, nurse_id: &str) -> MedRushResult<()> {
        self.with_patient(patient_id, |p| {
            if !p.nurse_ids.iter().any(|n| n == nurse_id) {
                p.nurse_ids.push(nurse_id.to_string());
            }
        })
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
        let mut patients = self.patients.lock().unwrap();
        let before = patients.len();
        patients.retain(|p| p.id != patient_id);
        if patients.len() == before {
            return Err(not_found(patient_id));
        }
        Ok(())
    }

    fn patients_for_caretaker(&self, caretaker_id: &str) -> MedRushResult<Vec<Patient>> {
        let patients = self.patients.lock().unwrap();
        Ok(patients
            .iter()
            .filter(|p| p.caretaker_ids.iter().any(|c| c == caretaker_id))
            .cloned()
            .collect())
    }

    fn patients_for_nurse(&self, nurse_id: &str) -> MedRushResult<Vec<Patient>> {
        let patients = self.patients.lock().unwrap();
        Ok(patients
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
        self.with_patient(patient_id, |p| match p.medicines.get_mut(index) {
            Some(m) => {
                m.status = status;
                Ok(())
            }
            None => Err(MedRushError::NotFound {
                kind: "medicine".to_string(),
                id: index.to_string(),
            }),
        })?
    }

    fn upload_image(&self, patient_id: &str, image: &[u8]) -> MedRushResult<String> {
        Ok(format!("prescriptions/{patient_id}/{}", image.len()))
    }

    fn store_prescription(
        &self,
        patient_id: &str,
        medicines: &[MedicineRecord],
        image_ref: Option<&str>,
    ) -> MedRushResult<PrescriptionRecord> {
        self.with_patient(patient_id, |p| p.medicines = medicines.to_vec())?;
        let mut prescriptions = self.prescriptions.lock().unwrap();
        let record = PrescriptionRecord {
            id: format!("rx{}", prescriptions.len()),
            patient_id: patient_id.to_string(),
            sequence: prescriptions.len() as u64,
            medicines: medicines.to_vec(),
            image_ref: image_ref.map(str::to_string),
            created_at: Utc::now(),
        };
        prescriptions.push(record.clone());
        Ok(record)
    }

    fn patient_prescriptions(&self, patient_id: &str) -> MedRushResult<Vec<PrescriptionRecord>> {
        let prescriptions = self.prescriptions.lock().unwrap();
        Ok(prescriptions
            .iter()
            .rev()
            .filter(|r| r.patient_id == patient_id)
            .cloned()
            .collect())
    }
}
