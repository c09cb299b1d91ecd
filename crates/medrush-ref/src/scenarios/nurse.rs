//! Scenario 3: Nurse ward
//!
//! A nurse at a hospital admits ward patients and a walk-in, sees which
//! patients have no caretaker, watches the alert clear once a family member
//! links up, and discharges a patient.
//!
//! Walk-through:
//!   1. OTP login as nurse with hospital name
//!   2. Admit ward patients and an unnamed walk-in
//!   3. "No caretaker" alert lists every unattended patient
//!   4. A caretaker links one patient; the alert shrinks
//!   5. Discharge: unlinked, and deleted once nobody else holds a link

use medrush_config::AppConfig;
use medrush_contracts::{error::MedRushResult, role::Role, user::Patient};
use medrush_core::{traits::PatientStore, LoginDetails, RosterView, Session};
use medrush_store::InMemoryStore;

use crate::{
    adapters::DummyOtpIdentity,
    mock_data::{
        mixed_medicines, ward_patients, CARETAKER_NAME, CARETAKER_PHONE, HOSPITAL_NAME,
        NURSE_NAME, NURSE_PHONE, WALK_IN_PHONE,
    },
    scenarios::{banner, login},
};

fn print_alert(unattended: &[Patient]) {
    if unattended.is_empty() {
        println!("  No-caretaker alert:     none");
        return;
    }
    println!("  No-caretaker alert:     {} patient(s)", unattended.len());
    for patient in unattended {
        println!("    - {} ({})", patient.name, patient.phone);
    }
}

/// Run Scenario 3: Nurse ward.
pub fn run_scenario(config: &AppConfig) -> MedRushResult<()> {
    banner("Scenario 3: Nurse Ward");

    let store = InMemoryStore::new();
    let identity = DummyOtpIdentity::new(config.auth.dummy_otp.clone());

    let mut session = Session::new(config.call.timings());
    let nurse = login(
        &mut session,
        &identity,
        &store,
        config,
        NURSE_PHONE,
        LoginDetails::new(NURSE_NAME, Role::Nurse).with_hospital(HOSPITAL_NAME),
    )?;
    println!(
        "  Hospital:               {}",
        nurse.hospital_name.as_deref().unwrap_or("-")
    );
    println!();

    let ward = RosterView::new(&nurse, &store);

    // ── Admissions ────────────────────────────────────────────────────────────

    let mut admitted = Vec::new();
    for (name, phone) in ward_patients() {
        let patient = ward.admit_patient(name, phone)?;
        store.store_prescription(&patient.id, &mixed_medicines(), None)?;
        admitted.push(patient);
    }
    let walk_in = ward.admit_patient("", WALK_IN_PHONE)?;
    admitted.push(walk_in);
    println!("  Admitted:               {} patient(s)", admitted.len());
    for patient in ward.patients()? {
        println!(
            "    - {:<16} {}  {} medicine(s)",
            patient.name,
            patient.phone,
            patient.medicines.len()
        );
    }
    println!();

    print_alert(&ward.unattended()?);
    println!();

    // ── Family links up ───────────────────────────────────────────────────────

    let mut family_session = Session::new(config.call.timings());
    let caretaker = login(
        &mut family_session,
        &identity,
        &store,
        config,
        CARETAKER_PHONE,
        LoginDetails::new(CARETAKER_NAME, Role::Caretaker),
    )?;
    let (_, first_phone) = ward_patients()[0];
    RosterView::new(&caretaker, &store).link_patient("Son", first_phone)?;
    print_alert(&ward.unattended()?);
    println!();

    // ── Discharge ─────────────────────────────────────────────────────────────

    let first = &admitted[0];
    ward.discharge_patient(&first.id)?;
    println!(
        "  Discharged:             {} (record kept: {})",
        first.name,
        store.patient(&first.id).is_ok()
    );

    let last = &admitted[admitted.len() - 1];
    ward.discharge_patient(&last.id)?;
    println!(
        "  Discharged:             {} (record kept: {})",
        last.name,
        store.patient(&last.id).is_ok()
    );
    println!("  Ward size now:          {}", ward.patients()?.len());
    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use medrush_contracts::{error::MedRushError, user::UserProfile};

    use super::*;

    fn profile(uid: &str, role: Role) -> UserProfile {
        UserProfile {
            uid: uid.to_string(),
            name: format!("{role} {uid}"),
            phone: "9000000000".to_string(),
            role,
            hospital_name: Some(HOSPITAL_NAME.to_string()),
        }
    }

    #[test]
    fn scenario_runs_with_defaults() {
        run_scenario(&AppConfig::default()).unwrap();
    }

    #[test]
    fn walk_in_keeps_default_name_and_raises_alert() {
        let store = InMemoryStore::new();
        let nurse = profile("n1", Role::Nurse);
        let ward = RosterView::new(&nurse, &store);

        let walk_in = ward.admit_patient("  ", WALK_IN_PHONE).unwrap();

        assert_eq!(walk_in.name, Patient::DEFAULT_NAME);
        let alert = ward.unattended().unwrap();
        assert_eq!(alert.len(), 1);
        assert_eq!(alert[0].phone, WALK_IN_PHONE);
    }

    #[test]
    fn caretaker_link_clears_alert() {
        let store = InMemoryStore::new();
        let nurse = profile("n1", Role::Nurse);
        let family = profile("c1", Role::Caretaker);
        let ward = RosterView::new(&nurse, &store);
        ward.admit_patient("Meena Iyer", "9822233344").unwrap();

        RosterView::new(&family, &store)
            .link_patient("Daughter", "9822233344")
            .unwrap();

        assert!(ward.unattended().unwrap().is_empty());
        assert_eq!(ward.patients().unwrap().len(), 1);
    }

    #[test]
    fn discharge_deletes_only_unlinked_patients() {
        let store = InMemoryStore::new();
        let nurse = profile("n1", Role::Nurse);
        let family = profile("c1", Role::Caretaker);
        let ward = RosterView::new(&nurse, &store);
        let shared = ward.admit_patient("Suresh Reddy", "9811122233").unwrap();
        let alone = ward.admit_patient("Farhan Ali", "9833344455").unwrap();
        RosterView::new(&family, &store)
            .link_patient("Son", "9811122233")
            .unwrap();

        ward.discharge_patient(&shared.id).unwrap();
        ward.discharge_patient(&alone.id).unwrap();

        assert!(store.patient(&shared.id).unwrap().nurse_ids.is_empty());
        assert!(matches!(
            store.patient(&alone.id).unwrap_err(),
            MedRushError::NotFound { .. }
        ));
        assert!(ward.patients().unwrap().is_empty());
    }

    #[test]
    fn nurse_cannot_discharge_another_wards_patient() {
        let store = InMemoryStore::new();
        let mine = profile("n1", Role::Nurse);
        let theirs = profile("n2", Role::Nurse);
        let patient = RosterView::new(&theirs, &store)
            .admit_patient("Meena Iyer", "9822233344")
            .unwrap();

        let err = RosterView::new(&mine, &store)
            .discharge_patient(&patient.id)
            .unwrap_err();
        assert!(matches!(err, MedRushError::NotFound { .. }));
        assert!(store.patient(&patient.id).is_ok());
    }
}
