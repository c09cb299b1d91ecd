//! # medrush-ref
//!
//! Reference runtime for MedRush: concrete adapters for every collaborator
//! trait, plus four end-to-end scenarios run against mock data.
//!
//! 1. **Patient scan**: OTP login, prescription extraction through the
//!    schema verifier, the time-of-day schedule, and persistence with the
//!    content-addressed image.
//! 2. **Caretaker roster**: the seeded relative, linking a second patient,
//!    marking doses, and a reminder call request.
//! 3. **Nurse ward**: admitting patients, the "no caretaker" alert, and
//!    discharge.
//! 4. **Call reminder**: the simulated incoming call driven from a scan
//!    through ring, accept, speech, grace delay, and hang-up.
//!
//! Only `GeminiExtractionProvider` contacts an external service. The
//! scenarios use the bundled fixture instead.

pub mod adapters;
pub mod mock_data;
pub mod scenarios;
