//! Call-simulation state and events.
//!
//! The simulated reminder call cycles `Idle → Incoming → Active → Idle`.
//! The transition function itself lives in `medrush-core`; these are the
//! values it consumes and produces.

use serde::{Deserialize, Serialize};

/// Current state of the simulated reminder call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum CallState {
    #[default]
    Idle,
    /// Ringing, waiting for accept or decline.
    Incoming,
    /// Connected. `elapsed_secs` counts whole seconds since accept.
    Active { elapsed_secs: u64 },
}

impl CallState {
    pub fn is_idle(&self) -> bool {
        matches!(self, CallState::Idle)
    }

    /// Seconds on the call, zero outside `Active`.
    pub fn elapsed_secs(&self) -> u64 {
        match self {
            CallState::Active { elapsed_secs } => *elapsed_secs,
            _ => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CallState::Idle => "idle",
            CallState::Incoming => "incoming",
            CallState::Active { .. } => "active",
        }
    }
}

/// What started a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RingSource {
    /// Armed by a successful extraction, fires after the ring delay.
    Extraction,
    /// The user pressed "test call".
    TestCall,
}

/// Discrete inputs to the call state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallEvent {
    Ring(RingSource),
    Accept,
    Decline,
    HangUp,
    /// Speech playback reported completion (or failed, which counts the same).
    SpeechDone,
    /// The post-speech grace delay ran out.
    GraceElapsed,
}

/// Side effects the caller must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallEffect {
    /// Start speaking the schedule summary.
    StartSpeech,
}

/// Result of feeding one event to the machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallTransition {
    /// The event moved the machine from `from` to `to`.
    Moved {
        from: CallState,
        to: CallState,
        effects: Vec<CallEffect>,
    },
    /// The event was accepted and armed a timer without changing state.
    Armed { state: CallState, event: CallEvent },
    /// The event is not valid in the current state and was dropped.
    Ignored { state: CallState, event: CallEvent },
}

impl CallTransition {
    pub fn is_ignored(&self) -> bool {
        matches!(self, CallTransition::Ignored { .. })
    }

    pub fn effects(&self) -> &[CallEffect] {
        match self {
            CallTransition::Moved { effects, .. } => effects,
            CallTransition::Armed { .. } | CallTransition::Ignored { .. } => &[],
        }
    }
}
