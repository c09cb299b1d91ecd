//! Caretaker and nurse roster views.
//!
//! There is one roster implementation for both roles. The viewer's role
//! decides which link (caretaker or nurse) its operations read and write,
//! and every operation first checks the `EditRoster` capability.

use tracing::{debug, info, warn};

use medrush_contracts::{
    error::{MedRushError, MedRushResult},
    medicine::MedicineStatus,
    role::{Capability, Role},
    schedule::Schedule,
    user::{Patient, UserProfile},
};

use crate::{
    classifier::classify,
    traits::{CallOutProvider, CallOutReceipt, PatientStore},
};

/// A roster projection over the store for one caretaker or nurse.
pub struct RosterView<'a> {
    viewer: &'a UserProfile,
    store: &'a dyn PatientStore,
}

impl<'a> RosterView<'a> {
    pub fn new(viewer: &'a UserProfile, store: &'a dyn PatientStore) -> Self {
        Self { viewer, store }
    }

    pub fn viewer(&self) -> &UserProfile {
        self.viewer
    }

    fn require(&self, action: &str) -> MedRushResult<()> {
        if self.viewer.role.capabilities().has(Capability::EditRoster) {
            return Ok(());
        }
        warn!(uid = %self.viewer.uid, role = %self.viewer.role, action, "roster access denied");
        Err(MedRushError::CapabilityMissing {
            capability: Capability::EditRoster.to_string(),
            action: action.to_string(),
        })
    }

    fn linked(&self) -> MedRushResult<Vec<Patient>> {
        match self.viewer.role {
            Role::Caretaker => self.store.patients_for_caretaker(&self.viewer.uid),
            Role::Nurse => self.store.patients_for_nurse(&self.viewer.uid),
            Role::Patient => Ok(Vec::new()),
        }
    }

    /// A patient on this viewer's roster, or `NotFound`.
    fn owned(&self, patient_id: &str) -> MedRushResult<Patient> {
        self.linked()?
            .into_iter()
            .find(|p| p.id == patient_id)
            .ok_or_else(|| MedRushError::NotFound {
                kind: "patient".to_string(),
                id: patient_id.to_string(),
            })
    }

    fn link(&self, patient_id: &str, relation: Option<&str>) -> MedRushResult<()> {
        match self.viewer.role {
            Role::Caretaker => self.store.link_caretaker(patient_id, &self.viewer.uid, relation),
            Role::Nurse => self.store.link_nurse(patient_id, &self.viewer.uid),
            Role::Patient => Ok(()),
        }
    }

    /// Patients linked to the viewer, in store order.
    pub fn patients(&self) -> MedRushResult<Vec<Patient>> {
        self.require("list_patients")?;
        self.linked()
    }

    /// Patients without any caretaker. Drives the ward "no caretaker" alert.
    pub fn unattended(&self) -> MedRushResult<Vec<Patient>> {
        self.require("list_unattended")?;
        Ok(self.linked()?.into_iter().filter(|p| !p.has_caretaker).collect())
    }

    /// Link the patient with `phone`, creating a default record if needed.
    ///
    /// Linking an already linked patient changes nothing but the relation.
    pub fn link_patient(&self, relation: &str, phone: &str) -> MedRushResult<Patient> {
        self.require("link_patient")?;
        let patient_id = self.store.get_or_create_patient(phone)?;
        self.link(&patient_id, Some(relation))?;
        info!(viewer = %self.viewer.uid, patient_id = %patient_id, relation, "patient linked");
        self.store.patient(&patient_id)
    }

    /// Add a named patient to the roster.
    ///
    /// `name` only fills in a record that still has the default name; a name
    /// the patient registered themselves is kept.
    pub fn admit_patient(&self, name: &str, phone: &str) -> MedRushResult<Patient> {
        self.require("admit_patient")?;
        let patient_id = self.store.get_or_create_patient(phone)?;
        let name = name.trim();
        if !name.is_empty() && self.store.patient(&patient_id)?.name == Patient::DEFAULT_NAME {
            self.store.rename_patient(&patient_id, name)?;
        }
        self.link(&patient_id, None)?;
        info!(viewer = %self.viewer.uid, patient_id = %patient_id, "patient admitted");
        self.store.patient(&patient_id)
    }

    /// Remove the patient from this roster.
    ///
    /// The patient record itself is deleted once nobody is linked to it.
    pub fn discharge_patient(&self, patient_id: &str) -> MedRushResult<()> {
        self.require("discharge_patient")?;
        self.owned(patient_id)?;
        match self.viewer.role {
            Role::Caretaker => self.store.unlink_caretaker(patient_id, &self.viewer.uid)?,
            Role::Nurse => self.store.unlink_nurse(patient_id, &self.viewer.uid)?,
            Role::Patient => {}
        }

        let remaining = self.store.patient(patient_id)?;
        if remaining.caretaker_ids.is_empty() && remaining.nurse_ids.is_empty() {
            debug!(patient_id, "no links left, removing patient");
            self.store.remove_patient(patient_id)?;
        }
        info!(viewer = %self.viewer.uid, patient_id, "patient discharged");
        Ok(())
    }

    /// Record whether a rostered patient took a medicine.
    pub fn set_status(
        &self,
        patient_id: &str,
        medicine_index: usize,
        status: MedicineStatus,
    ) -> MedRushResult<()> {
        self.require("set_status")?;
        self.owned(patient_id)?;
        self.store.update_medicine_status(patient_id, medicine_index, status)?;
        info!(patient_id, medicine_index, status = %status, "medicine status updated");
        Ok(())
    }

    /// The time-of-day schedule of a rostered patient.
    pub fn schedule_for(&self, patient_id: &str) -> MedRushResult<Schedule> {
        self.require("view_schedule")?;
        Ok(classify(&self.owned(patient_id)?.medicines))
    }

    /// Ask the call-out provider to phone a rostered patient.
    pub fn request_call(
        &self,
        call_out: &dyn CallOutProvider,
        patient_id: &str,
    ) -> MedRushResult<CallOutReceipt> {
        self.require("request_call")?;
        let patient = self.owned(patient_id)?;
        let pending = classify(&patient.medicines).status_counts().pending;
        let message = format!(
            "Hello {}, this is a reminder from {}. You have {} medicine(s) left to take today.",
            patient.name, self.viewer.name, pending
        );
        let receipt = call_out.call_out(&patient, &message)?;
        info!(patient_id, status = %receipt.status, "reminder call requested");
        Ok(receipt)
    }
}
