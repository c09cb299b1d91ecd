//! Scenario 4: Simulated reminder call
//!
//! After a successful scan the app rings the patient with a simulated call
//! that reads the prescription summary aloud. Time is advanced by hand so
//! the run is instant; the dashboard drives the same machine off a clock.
//!
//! Walk-through:
//!   1. Scan arms the ring; nothing happens before the ring delay
//!   2. Ring → accept → speech starts with the summary
//!   3. Speech finishes → grace delay → automatic hang-up
//!   4. Test call declined; stray events ignored
//!   5. Voice failure still ends the call after the grace delay

use std::time::Duration;

use medrush_config::AppConfig;
use medrush_contracts::{error::MedRushResult, role::Role};
use medrush_core::{traits::VoiceProvider, LoginDetails, Session};
use medrush_store::InMemoryStore;
use medrush_verify::ExtractionSchemaVerifier;

use crate::{
    adapters::{
        voice::estimate_duration, ConsoleVoice, DummyOtpIdentity, FailingVoice,
        FixtureExtractionProvider,
    },
    mock_data::{PATIENT_NAME, PATIENT_PHONE, SAMPLE_IMAGE},
    scenarios::{banner, describe_transition, login},
};

fn step(session: &mut Session, label: &str, dt: Duration) {
    let fired = session.advance(dt);
    let what = if fired.is_empty() {
        format!("no change ({})", session.call_state().name())
    } else {
        fired.iter().map(describe_transition).collect::<Vec<_>>().join(", ")
    };
    println!("  +{:>5} ms {:<14} {}", dt.as_millis(), label, what);
}

fn answer(session: &mut Session, voice: &dyn VoiceProvider) {
    let accepted = session.accept_call(voice);
    println!("  accept               {}", describe_transition(&accepted));
}

/// Run Scenario 4: Simulated reminder call.
pub fn run_scenario(config: &AppConfig) -> MedRushResult<()> {
    banner("Scenario 4: Simulated Reminder Call");

    let store = InMemoryStore::new();
    let identity = DummyOtpIdentity::new(config.auth.dummy_otp.clone());
    let voice = ConsoleVoice::new(config.voice.rate);
    let timings = config.call.timings();

    let mut session = Session::new(timings);
    session.set_language(config.language);
    login(
        &mut session,
        &identity,
        &store,
        config,
        PATIENT_PHONE,
        LoginDetails::new(PATIENT_NAME, Role::Patient),
    )?;
    session.scan(
        &FixtureExtractionProvider::sample()?,
        &ExtractionSchemaVerifier::new(),
        SAMPLE_IMAGE.to_vec(),
    )?;
    println!("  Ring armed:             {}", session.ring_pending());
    println!(
        "  Ring delay / grace:     {} ms / {} ms",
        timings.ring_delay.as_millis(),
        timings.grace_delay.as_millis()
    );
    println!();

    // ── Extraction-armed call ─────────────────────────────────────────────────

    let half = timings.ring_delay / 2;
    step(&mut session, "waiting", half);
    step(&mut session, "ring delay", timings.ring_delay - half);
    answer(&mut session, &voice);

    let speech = estimate_duration(session.call_script(), config.voice.rate);
    step(&mut session, "speech", speech);
    println!(
        "  on call:             {} s elapsed",
        session.call_state().elapsed_secs()
    );
    step(&mut session, "grace", timings.grace_delay);
    println!();

    // ── Test call, declined ───────────────────────────────────────────────────

    println!("  test call            {}", describe_transition(&session.test_call()));
    println!("  test call again      {}", describe_transition(&session.test_call()));
    println!("  decline              {}", describe_transition(&session.decline_call()));
    println!("  hang up              {}", describe_transition(&session.hang_up()));
    println!();

    // ── Voice unavailable ─────────────────────────────────────────────────────

    session.test_call();
    answer(&mut session, &FailingVoice);
    step(&mut session, "grace", timings.grace_delay);
    println!();
    println!("  Final call state:       {}", session.call_state().name());
    println!();
    println!("  Scenario 4 complete.");
    println!();

    Ok(())
}
