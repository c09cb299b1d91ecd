//! # medrush-core
//!
//! Schedule classification, call simulation, and session orchestration.
//!
//! This crate provides:
//! - The collaborator traits (`ExtractionProvider`, `ExtractionVerifier`,
//!   `VoiceProvider`, `CallOutProvider`, `IdentityProvider`, `PatientStore`,
//!   `Translations`)
//! - The time-of-day classifier and schedule rendering
//! - The `CallMachine` reminder-call state machine
//! - The `Session` that wires them together, and the caretaker/nurse
//!   `RosterView`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medrush_core::{Session, classifier::classify, traits::ExtractionProvider};
//! ```

pub mod badge;
pub mod call;
pub mod classifier;
pub mod render;
pub mod roster;
pub mod session;
pub mod traits;

#[cfg(test)]
mod mock;

pub use call::{CallMachine, CallTimings};
pub use roster::RosterView;
pub use session::{LoginDetails, ScanOutcome, ScanTicket, Session};
