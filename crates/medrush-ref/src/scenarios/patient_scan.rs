//! Scenario 1: Patient prescription scan
//!
//! A patient logs in with the dummy OTP, photographs a prescription, and
//! gets back a time-of-day schedule in their chosen language.
//!
//! Walk-through:
//!   1. OTP login; the patient record is created and named
//!   2. Extraction (bundled fixture) → schema verifier → session
//!   3. Schedule rendered with localized headings and status badges
//!   4. Summary read aloud
//!   5. Prescription and image saved; history listed
//!   6. A failing provider shows the single error and the empty schedule

use medrush_config::{AppConfig, LocaleCatalog};
use medrush_contracts::{error::MedRushResult, role::Role};
use medrush_core::{render::sections_to_text, traits::PatientStore, LoginDetails, ScanOutcome, Session};
use medrush_store::InMemoryStore;
use medrush_verify::ExtractionSchemaVerifier;

use crate::{
    adapters::{ConsoleVoice, DummyOtpIdentity, FixtureExtractionProvider},
    mock_data::{PATIENT_NAME, PATIENT_PHONE, SAMPLE_IMAGE},
    scenarios::{banner, login},
};

/// Run Scenario 1: Patient prescription scan.
pub fn run_scenario(config: &AppConfig) -> MedRushResult<()> {
    banner("Scenario 1: Patient Prescription Scan");

    let catalog = LocaleCatalog::load(config)?;
    let store = InMemoryStore::new();
    let identity = DummyOtpIdentity::new(config.auth.dummy_otp.clone());
    let verifier = ExtractionSchemaVerifier::new();
    let voice = ConsoleVoice::new(config.voice.rate);

    let mut session = Session::new(config.call.timings());
    session.set_language(config.language);
    println!("  Language:               {}", config.language.display_name());

    login(
        &mut session,
        &identity,
        &store,
        config,
        PATIENT_PHONE,
        LoginDetails::new(PATIENT_NAME, Role::Patient),
    )?;
    println!();

    // ── Scan ──────────────────────────────────────────────────────────────────

    let provider = FixtureExtractionProvider::sample()?;
    match session.scan(&provider, &verifier, SAMPLE_IMAGE.to_vec())? {
        ScanOutcome::Applied { count } => {
            println!("  Extraction:             {count} medicine(s) verified");
        }
        ScanOutcome::Stale { sequence } => {
            println!("  Extraction:             result for scan {sequence} dropped as stale");
        }
    }
    println!("  Summary:                {}", session.summary());
    println!();

    let table = catalog.table(session.language());
    for line in sections_to_text(&session.render(table)).lines() {
        println!("  {line}");
    }

    session.read_aloud(&voice);
    println!();

    // ── Persist ───────────────────────────────────────────────────────────────

    let record = session.save_to(&store, Some(SAMPLE_IMAGE))?;
    println!(
        "  Saved prescription:     #{} with {} medicine(s)",
        record.sequence,
        record.medicines.len()
    );
    println!(
        "  Image reference:        {}",
        record.image_ref.as_deref().unwrap_or("-")
    );
    if let Some(patient_id) = session.patient_id() {
        let history = store.patient_prescriptions(patient_id)?;
        println!("  Prescription history:   {} record(s)", history.len());
    }
    println!();

    // ── Failed scan ───────────────────────────────────────────────────────────

    let broken = FixtureExtractionProvider::failing("request timed out after 30s");
    match session.scan(&broken, &verifier, SAMPLE_IMAGE.to_vec()) {
        Ok(_) => println!("  Second scan:            unexpectedly succeeded"),
        Err(err) => println!("  Second scan:            {err}"),
    }
    println!(
        "  Schedule after failure: {} medicine(s)",
        session.schedule().total()
    );
    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use medrush_contracts::{
        error::MedRushError,
        medicine::{Language, MedicineStatus},
        schedule::TimeBucket,
    };
    use serde_json::json;

    use super::*;

    fn logged_in_patient(store: &InMemoryStore) -> Session {
        let identity = DummyOtpIdentity::new("123456");
        let mut session = Session::default();
        let challenge = session.request_otp(&identity, PATIENT_PHONE).unwrap();
        session
            .login(
                &identity,
                store,
                &challenge,
                "123456",
                LoginDetails::new(PATIENT_NAME, Role::Patient),
            )
            .unwrap();
        session
    }

    #[test]
    fn scenario_runs_with_defaults() {
        run_scenario(&AppConfig::default()).unwrap();
    }

    #[test]
    fn sample_scan_fills_every_bucket() {
        let store = InMemoryStore::new();
        let mut session = logged_in_patient(&store);
        let provider = FixtureExtractionProvider::sample().unwrap();

        let outcome = session
            .scan(&provider, &ExtractionSchemaVerifier::new(), SAMPLE_IMAGE.to_vec())
            .unwrap();

        assert_eq!(outcome, ScanOutcome::Applied { count: 5 });
        let schedule = session.schedule();
        assert_eq!(schedule.bucket(TimeBucket::Morning).count(), 2);
        assert_eq!(schedule.bucket(TimeBucket::Afternoon).count(), 1);
        assert_eq!(schedule.bucket(TimeBucket::Evening).count(), 1);
        assert_eq!(schedule.bucket(TimeBucket::Other).count(), 1);
        assert!(session.ring_pending());
    }

    #[test]
    fn extracted_statuses_are_forced_to_pending() {
        let store = InMemoryStore::new();
        let mut session = logged_in_patient(&store);
        let provider = FixtureExtractionProvider::answering(json!({
            "medicines": [
                { "name": "Aspirin", "dosage": "75mg", "frequency": "Daily", "time": "Night", "status": "taken" }
            ],
            "summary": "Take aspirin at night."
        }));

        session
            .scan(&provider, &ExtractionSchemaVerifier::new(), vec![1])
            .unwrap();

        assert_eq!(session.medicines()[0].status, MedicineStatus::Pending);
    }

    #[test]
    fn malformed_answer_leaves_schedule_empty() {
        let store = InMemoryStore::new();
        let mut session = logged_in_patient(&store);
        let provider = FixtureExtractionProvider::answering(json!({
            "medicines": [{ "name": "Aspirin" }]
        }));

        let err = session
            .scan(&provider, &ExtractionSchemaVerifier::new(), vec![1])
            .unwrap_err();

        assert!(matches!(err, MedRushError::ExtractionFailed { .. }));
        assert!(session.schedule().is_empty());
        assert!(!session.ring_pending());
        assert_eq!(provider.calls(), 1);
    }

    #[test]
    fn saved_prescription_references_uploaded_image() {
        let store = InMemoryStore::new();
        let mut session = logged_in_patient(&store);
        let provider = FixtureExtractionProvider::sample().unwrap();
        session
            .scan(&provider, &ExtractionSchemaVerifier::new(), SAMPLE_IMAGE.to_vec())
            .unwrap();

        let record = session.save_to(&store, Some(SAMPLE_IMAGE)).unwrap();
        let image_ref = record.image_ref.unwrap();

        assert_eq!(store.image(&image_ref).unwrap(), SAMPLE_IMAGE.to_vec());
        let patient = store.patient(session.patient_id().unwrap()).unwrap();
        assert_eq!(patient.name, PATIENT_NAME);
        assert_eq!(patient.medicines.len(), 5);
    }

    #[test]
    fn headings_follow_session_language() {
        let store = InMemoryStore::new();
        let mut session = logged_in_patient(&store);
        session.set_language(Language::Telugu);
        let provider = FixtureExtractionProvider::sample().unwrap();
        session
            .scan(&provider, &ExtractionSchemaVerifier::new(), SAMPLE_IMAGE.to_vec())
            .unwrap();

        let catalog = LocaleCatalog::builtin().unwrap();
        let sections = session.render(catalog.table(Language::Telugu));
        assert_eq!(
            sections[0].heading,
            catalog.text(Language::Telugu, TimeBucket::Morning.label_key())
        );
        assert_eq!(sections.len(), 4);
    }
}
