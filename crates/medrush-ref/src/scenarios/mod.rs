//! End-to-end MedRush scenarios.
//!
//! Each scenario wires real MedRush components (session, classifier,
//! verifier, store, call machine) to the reference adapters and prints what
//! happens at every step.

pub mod call_reminder;
pub mod caretaker;
pub mod nurse;
pub mod patient_scan;

use medrush_config::AppConfig;
use medrush_contracts::{
    call::CallTransition, error::MedRushResult, user::UserProfile,
};
use medrush_core::{
    traits::{IdentityProvider, PatientStore},
    LoginDetails, Session,
};

/// Run every scenario in order.
pub fn run_all(config: &AppConfig) -> MedRushResult<()> {
    patient_scan::run_scenario(config)?;
    caretaker::run_scenario(config)?;
    nurse::run_scenario(config)?;
    call_reminder::run_scenario(config)
}

// ── Shared helpers ────────────────────────────────────────────────────────────

pub(crate) fn banner(title: &str) {
    println!("{}", "=".repeat(70));
    println!("  {title}");
    println!("{}", "=".repeat(70));
    println!();
}

/// Send an OTP, answer it with the configured code, and return the profile.
pub(crate) fn login(
    session: &mut Session,
    identity: &dyn IdentityProvider,
    store: &dyn PatientStore,
    config: &AppConfig,
    phone: &str,
    details: LoginDetails,
) -> MedRushResult<UserProfile> {
    let challenge = session.request_otp(identity, phone)?;
    println!("  OTP sent to:            {}", challenge.phone);
    let profile = session
        .login(identity, store, &challenge, &config.auth.dummy_otp, details)?
        .clone();
    println!("  Logged in:              {} ({})", profile.name, profile.role);
    Ok(profile)
}

/// One-line description of a call transition, e.g. `idle -> incoming`.
pub(crate) fn describe_transition(transition: &CallTransition) -> String {
    match transition {
        CallTransition::Moved { from, to, effects } if effects.is_empty() => {
            format!("{} -> {}", from.name(), to.name())
        }
        CallTransition::Moved { from, to, effects } => {
            format!("{} -> {} {:?}", from.name(), to.name(), effects)
        }
        CallTransition::Armed { state, event } => format!("{} ({:?} armed)", state.name(), event),
        CallTransition::Ignored { state, event } => {
            format!("{} ({:?} ignored)", state.name(), event)
        }
    }
}
