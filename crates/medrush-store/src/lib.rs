//! # medrush-store
//!
//! In-memory document store for MedRush users, patients, prescriptions, and
//! prescription images.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medrush_store::InMemoryStore;
//! use medrush_core::traits::PatientStore;
//!
//! let store = InMemoryStore::new();
//! let patient_id = store.get_or_create_patient("9988776655")?;
//! let image = store.upload_image(&patient_id, &jpeg_bytes)?;
//! store.store_prescription(&patient_id, &medicines, Some(&image))?;
//! ```

pub mod digest;
pub mod memory;

pub use digest::{image_digest, image_ref};
pub use memory::InMemoryStore;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::thread;

    use medrush_contracts::{
        error::MedRushError,
        medicine::{MedicineRecord, MedicineStatus},
        role::Role,
        user::{Patient, UserProfile},
    };
    use medrush_core::traits::PatientStore;

    use crate::InMemoryStore;

    fn meds(names: &[&str]) -> Vec<MedicineRecord> {
        names
            .iter()
            .map(|n| MedicineRecord::new(*n, "10mg", "Daily", "morning"))
            .collect()
    }

    fn nurse(uid: &str, hospital: Option<&str>) -> UserProfile {
        UserProfile {
            uid: uid.to_string(),
            name: "Sister Mary".to_string(),
            phone: "9000000001".to_string(),
            role: Role::Nurse,
            hospital_name: hospital.map(str::to_string),
        }
    }

    // ── Users ─────────────────────────────────────────────────────────────────

    #[test]
    fn upsert_merges_and_keeps_hospital() {
        let store = InMemoryStore::new();
        store.upsert_user(&nurse("n1", Some("City Hospital"))).unwrap();

        let mut renamed = nurse("n1", None);
        renamed.name = "Mary".to_string();
        store.upsert_user(&renamed).unwrap();

        let user = store.user("n1").unwrap();
        assert_eq!(user.name, "Mary");
        assert_eq!(user.hospital_name.as_deref(), Some("City Hospital"));
    }

    #[test]
    fn unknown_user_is_not_found() {
        let err = InMemoryStore::new().user("ghost").unwrap_err();
        assert!(matches!(err, MedRushError::NotFound { ref kind, .. } if kind == "user"));
    }

    // ── Patients and links ────────────────────────────────────────────────────

    #[test]
    fn get_or_create_is_keyed_by_phone() {
        let store = InMemoryStore::new();
        let a = store.get_or_create_patient("9988776655").unwrap();
        let b = store.get_or_create_patient("9988776655").unwrap();
        let c = store.get_or_create_patient("1112223334").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        let patient = store.patient(&a).unwrap();
        assert_eq!(patient.name, Patient::DEFAULT_NAME);
        assert!(!patient.has_caretaker);
    }

    #[test]
    fn caretaker_link_is_idempotent() {
        let store = InMemoryStore::new();
        let pid = store.get_or_create_patient("1").unwrap();

        store.link_caretaker(&pid, "c1", Some("Father")).unwrap();
        store.link_caretaker(&pid, "c1", Some("Father")).unwrap();
        store.link_caretaker(&pid, "c2", None).unwrap();

        let patient = store.patient(&pid).unwrap();
        assert_eq!(patient.caretaker_ids, vec!["c1", "c2"]);
        assert_eq!(patient.relation.as_deref(), Some("Father"));
        assert!(patient.has_caretaker);
        assert_eq!(store.patients_for_caretaker("c1").unwrap().len(), 1);
    }

    #[test]
    fn unlinking_last_caretaker_clears_flag() {
        let store = InMemoryStore::new();
        let pid = store.get_or_create_patient("1").unwrap();
        store.link_caretaker(&pid, "c1", None).unwrap();
        store.unlink_caretaker(&pid, "c1").unwrap();

        assert!(!store.patient(&pid).unwrap().has_caretaker);
        assert!(store.patients_for_caretaker("c1").unwrap().is_empty());
    }

    #[test]
    fn nurse_roster_lists_only_linked_patients() {
        let store = InMemoryStore::new();
        let p1 = store.get_or_create_patient("1").unwrap();
        let p2 = store.get_or_create_patient("2").unwrap();
        store.link_nurse(&p1, "n1").unwrap();
        store.link_nurse(&p1, "n1").unwrap();
        store.link_nurse(&p2, "n2").unwrap();

        let roster = store.patients_for_nurse("n1").unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].id, p1);
        assert_eq!(roster[0].nurse_ids, vec!["n1"]);
    }

    #[test]
    fn link_to_unknown_patient_is_not_found() {
        let err = InMemoryStore::new().link_nurse("missing", "n1").unwrap_err();
        assert!(matches!(err, MedRushError::NotFound { .. }));
    }

    #[test]
    fn remove_patient_drops_history_and_images() {
        let store = InMemoryStore::new();
        let pid = store.get_or_create_patient("1").unwrap();
        let image = store.upload_image(&pid, b"jpeg").unwrap();
        store.store_prescription(&pid, &meds(&["A"]), Some(&image)).unwrap();

        store.remove_patient(&pid).unwrap();

        assert!(store.patient(&pid).is_err());
        assert!(store.image(&image).is_err());
        assert!(store.remove_patient(&pid).is_err());
    }

    // ── Prescriptions ─────────────────────────────────────────────────────────

    #[test]
    fn history_is_newest_first_and_current_list_replaced() {
        let store = InMemoryStore::new();
        let pid = store.get_or_create_patient("1").unwrap();

        let first = store.store_prescription(&pid, &meds(&["A", "B"]), None).unwrap();
        let second = store.store_prescription(&pid, &meds(&["C"]), None).unwrap();
        assert!(second.sequence > first.sequence);

        let history = store.patient_prescriptions(&pid).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second.id);
        assert_eq!(history[1].id, first.id);

        let current = store.patient(&pid).unwrap().medicines;
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].name, "C");
    }

    #[test]
    fn history_is_per_patient() {
        let store = InMemoryStore::new();
        let p1 = store.get_or_create_patient("1").unwrap();
        let p2 = store.get_or_create_patient("2").unwrap();
        store.store_prescription(&p1, &meds(&["A"]), None).unwrap();
        store.store_prescription(&p2, &meds(&["B"]), None).unwrap();

        let history = store.patient_prescriptions(&p2).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].medicines[0].name, "B");
    }

    #[test]
    fn status_update_touches_only_the_indexed_medicine() {
        let store = InMemoryStore::new();
        let pid = store.get_or_create_patient("1").unwrap();
        store.store_prescription(&pid, &meds(&["A", "B"]), None).unwrap();

        store.update_medicine_status(&pid, 1, MedicineStatus::Taken).unwrap();

        let medicines = store.patient(&pid).unwrap().medicines;
        assert_eq!(medicines[0].status, MedicineStatus::Pending);
        assert_eq!(medicines[1].status, MedicineStatus::Taken);
        assert!(store.update_medicine_status(&pid, 9, MedicineStatus::Missed).is_err());
    }

    #[test]
    fn image_upload_is_content_addressed() {
        let store = InMemoryStore::new();
        let pid = store.get_or_create_patient("1").unwrap();

        let a = store.upload_image(&pid, b"same bytes").unwrap();
        let b = store.upload_image(&pid, b"same bytes").unwrap();
        let c = store.upload_image(&pid, b"other bytes").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with(&format!("prescriptions/{pid}/")));
        assert_eq!(store.image(&a).unwrap(), b"same bytes".to_vec());
    }

    #[test]
    fn clones_share_state_across_threads() {
        let store = InMemoryStore::new();
        let pid = store.get_or_create_patient("1").unwrap();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = store.clone();
                let pid = pid.clone();
                thread::spawn(move || {
                    store
                        .store_prescription(&pid, &meds(&[format!("M{i}").as_str()]), None)
                        .unwrap()
                        .sequence
                })
            })
            .collect();
        let mut sequences: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        sequences.sort();

        assert_eq!(sequences, vec![0, 1, 2, 3]);
        assert_eq!(store.patient_prescriptions(&pid).unwrap().len(), 4);
    }
}
