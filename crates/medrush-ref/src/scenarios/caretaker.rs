//! Scenario 2: Caretaker roster
//!
//! A caretaker logs in and finds the sample relative already on their
//! roster. They link a second patient by phone, mark a dose as taken, and
//! ask for a reminder call. A patient account trying the same roster is
//! refused.
//!
//! Walk-through:
//!   1. OTP login as caretaker; sample relative seeded
//!   2. Link a second patient with relation "Father"
//!   3. Per-patient schedules with status badges
//!   4. Mark the relative's medicine taken
//!   5. Request a reminder call (logged, not placed)
//!   6. A patient account is denied roster access

use medrush_config::{AppConfig, LocaleCatalog};
use medrush_contracts::{
    error::{MedRushError, MedRushResult},
    medicine::{MedicineRecord, MedicineStatus},
    role::Role,
};
use medrush_core::{
    render::{render_schedule, sections_to_text},
    traits::PatientStore,
    LoginDetails, RosterView, Session,
};
use medrush_store::InMemoryStore;

use crate::{
    adapters::{DummyOtpIdentity, LoggingCallOut},
    mock_data::{
        seed_caretaker_roster, CARETAKER_NAME, CARETAKER_PHONE, PATIENT_NAME, PATIENT_PHONE,
    },
    scenarios::{banner, login},
};

/// Run Scenario 2: Caretaker roster.
pub fn run_scenario(config: &AppConfig) -> MedRushResult<()> {
    banner("Scenario 2: Caretaker Roster");

    let catalog = LocaleCatalog::load(config)?;
    let table = catalog.table(config.language);
    let store = InMemoryStore::new();
    let identity = DummyOtpIdentity::new(config.auth.dummy_otp.clone());
    let call_out = LoggingCallOut::new();

    let mut session = Session::new(config.call.timings());
    let caretaker = login(
        &mut session,
        &identity,
        &store,
        config,
        CARETAKER_PHONE,
        LoginDetails::new(CARETAKER_NAME, Role::Caretaker),
    )?;
    let relative_id = seed_caretaker_roster(&store, &caretaker.uid)?;

    let roster = RosterView::new(&caretaker, &store);

    // ── Link a second patient ─────────────────────────────────────────────────

    let father = roster.link_patient("Father", PATIENT_PHONE)?;
    store.rename_patient(&father.id, PATIENT_NAME)?;
    store.store_prescription(
        &father.id,
        &[
            MedicineRecord::new("Amlodipine", "5mg", "Once daily", "Morning"),
            MedicineRecord::new("Atorvastatin", "10mg", "Once daily", "After dinner"),
        ],
        None,
    )?;
    println!("  Linked patient:         {} ({})", PATIENT_NAME, PATIENT_PHONE);
    println!();

    // ── Roster ────────────────────────────────────────────────────────────────

    for patient in roster.patients()? {
        println!(
            "  {} [{}], {}",
            patient.name,
            patient.relation.as_deref().unwrap_or("-"),
            patient.phone
        );
        let schedule = roster.schedule_for(&patient.id)?;
        for line in sections_to_text(&render_schedule(&schedule, table)).lines() {
            println!("    {line}");
        }
    }

    // ── Mark a dose ───────────────────────────────────────────────────────────

    roster.set_status(&relative_id, 0, MedicineStatus::Taken)?;
    let counts = roster.schedule_for(&relative_id)?.status_counts();
    println!(
        "  After marking taken:    {} taken, {} missed, {} pending",
        counts.taken, counts.missed, counts.pending
    );

    // ── Reminder call ─────────────────────────────────────────────────────────

    let receipt = roster.request_call(&call_out, &father.id)?;
    println!("  Reminder call status:   {}", receipt.status);
    println!("  Provider message:       {}", receipt.message);
    if let Some((_, message)) = call_out.requests().last() {
        println!("  Call script:            {message}");
    }
    println!();

    // ── Patient account ───────────────────────────────────────────────────────

    let mut patient_session = Session::new(config.call.timings());
    let patient = login(
        &mut patient_session,
        &identity,
        &store,
        config,
        PATIENT_PHONE,
        LoginDetails::new(PATIENT_NAME, Role::Patient),
    )?;
    match RosterView::new(&patient, &store).patients() {
        Err(MedRushError::CapabilityMissing { capability, .. }) => {
            println!("  Patient roster access:  DENIED (missing '{capability}')");
        }
        Err(err) => println!("  Patient roster access:  error: {err}"),
        Ok(_) => println!("  Patient roster access:  unexpectedly allowed"),
    }
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use medrush_contracts::user::UserProfile;

    use super::*;
    use crate::{adapters::call_out::NOT_IMPLEMENTED, mock_data::SAMPLE_RELATIVE_NAME};

    fn caretaker() -> UserProfile {
        UserProfile {
            uid: "uid-9123456780".to_string(),
            name: CARETAKER_NAME.to_string(),
            phone: CARETAKER_PHONE.to_string(),
            role: Role::Caretaker,
            hospital_name: None,
        }
    }

    #[test]
    fn scenario_runs_with_defaults() {
        run_scenario(&AppConfig::default()).unwrap();
    }

    #[test]
    fn seeded_relative_appears_with_missed_dose() {
        let store = InMemoryStore::new();
        let viewer = caretaker();
        let id = seed_caretaker_roster(&store, &viewer.uid).unwrap();

        let roster = RosterView::new(&viewer, &store);
        let patients = roster.patients().unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].name, SAMPLE_RELATIVE_NAME);
        assert_eq!(roster.schedule_for(&id).unwrap().status_counts().missed, 1);
    }

    #[test]
    fn reminder_message_counts_pending_medicines() {
        let store = InMemoryStore::new();
        let viewer = caretaker();
        let roster = RosterView::new(&viewer, &store);
        let patient = roster.link_patient("Father", PATIENT_PHONE).unwrap();
        store
            .store_prescription(
                &patient.id,
                &[
                    MedicineRecord::new("A", "1", "Daily", "Morning"),
                    MedicineRecord::new("B", "1", "Daily", "Night"),
                ],
                None,
            )
            .unwrap();
        roster.set_status(&patient.id, 0, MedicineStatus::Taken).unwrap();

        let call_out = LoggingCallOut::new();
        let receipt = roster.request_call(&call_out, &patient.id).unwrap();

        assert_eq!(receipt.status, NOT_IMPLEMENTED);
        let (patient_id, message) = call_out.requests().pop().unwrap();
        assert_eq!(patient_id, patient.id);
        assert!(message.contains("You have 1 medicine(s) left"));
        assert!(message.contains(CARETAKER_NAME));
    }

    #[test]
    fn other_caretakers_patients_are_not_found() {
        let store = InMemoryStore::new();
        let viewer = caretaker();
        let id = seed_caretaker_roster(&store, "someone-else").unwrap();

        let err = RosterView::new(&viewer, &store)
            .set_status(&id, 0, MedicineStatus::Taken)
            .unwrap_err();
        assert!(matches!(err, MedRushError::NotFound { .. }));
    }
}
