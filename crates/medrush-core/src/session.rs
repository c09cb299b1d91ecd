//! Session orchestration: one user's mutable state and the canonical flow.
//!
//!   login → begin_scan → [ExtractionProvider] → [ExtractionVerifier]
//!         → complete_scan → classify → ring → accept → speak → idle
//!
//! A session owns the language choice, the login gate, the current medicine
//! list and summary, the outstanding-scan marker, and the single call
//! machine. Collaborators are passed in per call so the same session can run
//! against real adapters or test doubles.
//!
//! Scans are tagged with a monotonic ticket. Only the most recently issued
//! ticket may complete; a result carrying any other ticket is dropped.

use std::time::Duration;

use tracing::{debug, info, warn};

use medrush_contracts::{
    call::{CallEffect, CallEvent, CallState, CallTransition, RingSource},
    error::{MedRushError, MedRushResult},
    extraction::{ExtractionRequest, ExtractionResult},
    medicine::{Language, MedicineRecord, MedicineStatus},
    role::{Capability, Role},
    schedule::Schedule,
    user::{Patient, PrescriptionRecord, UserProfile},
};

use crate::{
    call::{CallMachine, CallTimings},
    classifier::classify,
    render::{render_schedule, RenderedSection},
    traits::{
        ExtractionProvider, ExtractionVerifier, IdentityProvider, OtpChallenge, PatientStore,
        Playback, Translations, VoiceProvider,
    },
};

/// Spoken during a reminder call when no summary is available.
pub const FALLBACK_CALL_SCRIPT: &str =
    "Hello, this is your MedRush reminder. Please check your medicine schedule.";

/// Tag identifying one outstanding scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTicket {
    pub sequence: u64,
    /// Language the scan was requested in.
    pub language: Language,
}

/// What `complete_scan` did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The result replaced the medicine list.
    Applied { count: usize },
    /// The ticket was not the latest one; the result was discarded.
    Stale { sequence: u64 },
}

/// Profile fields collected on the login screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginDetails {
    pub name: String,
    pub role: Role,
    pub hospital_name: Option<String>,
}

impl LoginDetails {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            hospital_name: None,
        }
    }

    pub fn with_hospital(mut self, hospital: impl Into<String>) -> Self {
        self.hospital_name = Some(hospital.into());
        self
    }
}

/// One user's app state.
#[derive(Debug)]
pub struct Session {
    language: Language,
    user: Option<UserProfile>,
    /// Store id of the patient record, set when a patient logs in.
    patient_id: Option<String>,
    medicines: Vec<MedicineRecord>,
    summary: String,
    next_sequence: u64,
    pending: Option<u64>,
    call: CallMachine,
}

impl Session {
    pub fn new(timings: CallTimings) -> Self {
        Self {
            language: Language::default(),
            user: None,
            patient_id: None,
            medicines: Vec::new(),
            summary: String::new(),
            next_sequence: 0,
            pending: None,
            call: CallMachine::new(timings),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn language(&self) -> Language {
        self.language
    }

    /// Switch language. Affects scans begun afterwards and speech.
    pub fn set_language(&mut self, language: Language) {
        debug!(language = %language, "language selected");
        self.language = language;
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn patient_id(&self) -> Option<&str> {
        self.patient_id.as_deref()
    }

    pub fn medicines(&self) -> &[MedicineRecord] {
        &self.medicines
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn scan_pending(&self) -> Option<u64> {
        self.pending
    }

    // ── Login ────────────────────────────────────────────────────────────────

    pub fn request_otp(
        &self,
        identity: &dyn IdentityProvider,
        phone: &str,
    ) -> MedRushResult<OtpChallenge> {
        let challenge = identity.send_otp(phone)?;
        info!(phone = %phone, "otp sent");
        Ok(challenge)
    }

    /// Verify `code` and attach the resulting profile to the session.
    ///
    /// The profile is upserted into `store`. A patient login also resolves
    /// (or creates) the patient record for the verified phone number. Any
    /// state left by a previous user is dropped once the code is accepted.
    pub fn login(
        &mut self,
        identity: &dyn IdentityProvider,
        store: &dyn PatientStore,
        challenge: &OtpChallenge,
        code: &str,
        details: LoginDetails,
    ) -> MedRushResult<&UserProfile> {
        let uid = identity.verify_otp(challenge, code)?;
        if let Some(previous) = self.user.take() {
            info!(uid = %previous.uid, "replacing logged-in user");
        }
        self.clear_user_state();

        let profile = UserProfile {
            uid,
            name: details.name,
            phone: challenge.phone.clone(),
            role: details.role,
            hospital_name: details.hospital_name,
        };
        store.upsert_user(&profile)?;

        self.patient_id = match profile.role {
            Role::Patient => {
                let id = store.get_or_create_patient(&profile.phone)?;
                if store.patient(&id)?.name == Patient::DEFAULT_NAME && !profile.name.is_empty() {
                    store.rename_patient(&id, &profile.name)?;
                }
                Some(id)
            }
            Role::Caretaker | Role::Nurse => None,
        };

        info!(uid = %profile.uid, role = %profile.role, "user logged in");
        Ok(self.user.insert(profile))
    }

    /// Drop the user and everything derived from them.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(uid = %user.uid, "user logged out");
        }
        self.clear_user_state();
    }

    fn clear_user_state(&mut self) {
        self.patient_id = None;
        self.medicines.clear();
        self.summary.clear();
        self.pending = None;
        self.call.reset();
    }

    fn require(&self, capability: Capability, action: &str) -> MedRushResult<&UserProfile> {
        let user = self.user.as_ref().ok_or(MedRushError::NotLoggedIn)?;
        if !user.role.capabilities().has(capability) {
            warn!(uid = %user.uid, capability = %capability, action, "capability missing");
            return Err(MedRushError::CapabilityMissing {
                capability: capability.to_string(),
                action: action.to_string(),
            });
        }
        Ok(user)
    }

    // ── Scanning ─────────────────────────────────────────────────────────────

    /// Start a scan and clear the previous result.
    ///
    /// # Errors
    ///
    /// `ScanInProgress` while an earlier ticket is outstanding, plus the
    /// login and capability checks.
    pub fn begin_scan(&mut self) -> MedRushResult<ScanTicket> {
        self.require(Capability::ViewOwnSchedule, "scan_prescription")?;
        if let Some(sequence) = self.pending {
            return Err(MedRushError::ScanInProgress { sequence });
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.pending = Some(sequence);
        self.medicines.clear();
        self.summary.clear();

        debug!(sequence, language = %self.language, "scan started");
        Ok(ScanTicket {
            sequence,
            language: self.language,
        })
    }

    /// Apply the outcome of the scan identified by `ticket`.
    ///
    /// A failure leaves the schedule empty and is returned as a single
    /// `ExtractionFailed`. A success replaces the medicine list, forces every
    /// status to pending, and arms the incoming call.
    pub fn complete_scan(
        &mut self,
        ticket: ScanTicket,
        outcome: MedRushResult<ExtractionResult>,
    ) -> MedRushResult<ScanOutcome> {
        if self.pending != Some(ticket.sequence) {
            debug!(
                sequence = ticket.sequence,
                latest = ?self.pending,
                "dropping stale scan result"
            );
            return Ok(ScanOutcome::Stale { sequence: ticket.sequence });
        }
        self.pending = None;

        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                self.medicines.clear();
                self.summary.clear();
                warn!(sequence = ticket.sequence, error = %err, "scan failed");
                return Err(match err {
                    MedRushError::ExtractionFailed { reason } => {
                        MedRushError::ExtractionFailed { reason }
                    }
                    other => MedRushError::ExtractionFailed {
                        reason: other.to_string(),
                    },
                });
            }
        };

        self.medicines = result
            .medicines
            .into_iter()
            .map(|m| m.with_status(MedicineStatus::Pending))
            .collect();
        self.summary = result.summary;
        let count = self.medicines.len();
        let armed = self.call.arm_ring();

        info!(sequence = ticket.sequence, medicines = count, ring_armed = armed, "scan applied");
        Ok(ScanOutcome::Applied { count })
    }

    /// Run one complete scan: begin, extract, verify, complete.
    pub fn scan(
        &mut self,
        provider: &dyn ExtractionProvider,
        verifier: &dyn ExtractionVerifier,
        image: Vec<u8>,
    ) -> MedRushResult<ScanOutcome> {
        let ticket = self.begin_scan()?;
        let request = ExtractionRequest::new(image, ticket.language);
        let outcome = provider
            .extract(&request)
            .and_then(|raw| verifier.verify(&raw));
        self.complete_scan(ticket, outcome)
    }

    /// Persist the current medicine list for the logged-in patient.
    ///
    /// The image, when given, is uploaded first and referenced from the
    /// stored prescription.
    pub fn save_to(
        &self,
        store: &dyn PatientStore,
        image: Option<&[u8]>,
    ) -> MedRushResult<PrescriptionRecord> {
        self.require(Capability::ViewOwnSchedule, "save_prescription")?;
        let patient_id = self.patient_id.as_deref().ok_or(MedRushError::NotLoggedIn)?;
        let image_ref = image
            .map(|bytes| store.upload_image(patient_id, bytes))
            .transpose()?;
        store.store_prescription(patient_id, &self.medicines, image_ref.as_deref())
    }

    // ── Schedule ─────────────────────────────────────────────────────────────

    pub fn schedule(&self) -> Schedule {
        classify(&self.medicines)
    }

    pub fn render(&self, table: &dyn Translations) -> Vec<RenderedSection> {
        render_schedule(&self.schedule(), table)
    }

    /// Speak the summary. Returns `None` when there is nothing to read or
    /// the voice could not start.
    pub fn read_aloud(&self, voice: &dyn VoiceProvider) -> Option<Playback> {
        if self.summary.is_empty() {
            return None;
        }
        match voice.speak(&self.summary, self.language) {
            Ok(playback) => Some(playback),
            Err(err) => {
                warn!(error = %err, "read aloud failed");
                None
            }
        }
    }

    // ── Call simulation ──────────────────────────────────────────────────────

    pub fn call_state(&self) -> CallState {
        self.call.state()
    }

    pub fn ring_pending(&self) -> bool {
        self.call.ring_pending()
    }

    /// Text spoken when a call is accepted.
    pub fn call_script(&self) -> &str {
        if self.summary.is_empty() {
            FALLBACK_CALL_SCRIPT
        } else {
            &self.summary
        }
    }

    pub fn test_call(&mut self) -> CallTransition {
        self.call.handle(CallEvent::Ring(RingSource::TestCall))
    }

    /// Accept a ringing call and start speaking.
    ///
    /// A voice failure counts as immediate playback completion, so the call
    /// still ends after the grace delay.
    pub fn accept_call(&mut self, voice: &dyn VoiceProvider) -> CallTransition {
        let transition = self.call.handle(CallEvent::Accept);
        if transition.effects().contains(&CallEffect::StartSpeech) {
            let completes_after = match voice.speak(self.call_script(), self.language) {
                Ok(playback) => playback.completes_after,
                Err(err) => {
                    warn!(error = %err, "call speech failed, treating as finished");
                    Some(Duration::ZERO)
                }
            };
            self.call.speech_started(completes_after);
        }
        transition
    }

    pub fn decline_call(&mut self) -> CallTransition {
        self.call.handle(CallEvent::Decline)
    }

    pub fn hang_up(&mut self) -> CallTransition {
        self.call.handle(CallEvent::HangUp)
    }

    /// Let `dt` pass on the call timers.
    pub fn advance(&mut self, dt: Duration) -> Vec<CallTransition> {
        self.call.advance(dt)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(CallTimings::default())
    }
}
