//! The call-simulation state machine.
//!
//! Cycle: `Idle → Incoming → Active → Idle`. Only one call exists per
//! session. Any event that is not valid from the current state is ignored,
//! so a second ring while a call is ringing or connected does nothing.
//!
//! Time is injected through `advance()`. The machine owns three timers:
//!
//!   ring   : armed by a successful extraction, rings after `ring_delay`
//!   speech : remaining playback, fires `SpeechDone` when it runs out
//!   grace  : armed by `SpeechDone`, hangs up after `grace_delay`
//!
//! Leaving `Active` by any route stops the elapsed counter and clears the
//! speech and grace timers, so nothing leaks into the next call.

use std::time::Duration;

use tracing::{debug, info};

use medrush_contracts::call::{CallEffect, CallEvent, CallState, CallTransition, RingSource};

/// Delays used by the call simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallTimings {
    /// Pause between a successful extraction and the incoming ring.
    pub ring_delay: Duration,
    /// Pause between speech completion and the automatic hang-up.
    pub grace_delay: Duration,
}

impl Default for CallTimings {
    fn default() -> Self {
        Self {
            ring_delay: Duration::from_millis(1500),
            grace_delay: Duration::from_millis(2000),
        }
    }
}

const ONE_SECOND: Duration = Duration::from_secs(1);

/// Single-instance reminder call simulation.
#[derive(Debug, Clone)]
pub struct CallMachine {
    state: CallState,
    timings: CallTimings,
    ring_in: Option<Duration>,
    speech_left: Option<Duration>,
    grace_left: Option<Duration>,
    /// Time on the call not yet counted as a whole second.
    sub_second: Duration,
}

impl CallMachine {
    pub fn new(timings: CallTimings) -> Self {
        Self {
            state: CallState::Idle,
            timings,
            ring_in: None,
            speech_left: None,
            grace_left: None,
            sub_second: Duration::ZERO,
        }
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    pub fn timings(&self) -> CallTimings {
        self.timings
    }

    /// True while an extraction-armed ring is waiting to fire.
    pub fn ring_pending(&self) -> bool {
        self.ring_in.is_some()
    }

    /// Schedule a ring after the configured delay.
    ///
    /// Returns false, arming nothing, unless the machine is idle with no ring
    /// already pending.
    pub fn arm_ring(&mut self) -> bool {
        if !self.state.is_idle() || self.ring_in.is_some() {
            debug!(state = self.state.name(), "ring not armed: call already in progress");
            return false;
        }
        debug!(delay_ms = self.timings.ring_delay.as_millis() as u64, "ring armed");
        self.ring_in = Some(self.timings.ring_delay);
        true
    }

    /// Record that speech playback started.
    ///
    /// `completes_after = None` means no completion signal will come; the
    /// call then ends only on hang-up. A zero duration completes at once.
    pub fn speech_started(&mut self, completes_after: Option<Duration>) -> Option<CallTransition> {
        if !matches!(self.state, CallState::Active { .. }) {
            return None;
        }
        match completes_after {
            Some(d) if d.is_zero() => Some(self.handle(CallEvent::SpeechDone)),
            other => {
                self.speech_left = other;
                None
            }
        }
    }

    /// Apply one event. Invalid events are returned as `Ignored`.
    pub fn handle(&mut self, event: CallEvent) -> CallTransition {
        let from = self.state;
        let (to, effects) = match (from, event) {
            (CallState::Idle, CallEvent::Ring(source)) => {
                self.ring_in = None;
                info!(source = ?source, "reminder call ringing");
                (CallState::Incoming, vec![])
            }
            (CallState::Incoming, CallEvent::Accept) => {
                self.sub_second = Duration::ZERO;
                (CallState::Active { elapsed_secs: 0 }, vec![CallEffect::StartSpeech])
            }
            (CallState::Incoming, CallEvent::Decline) => (CallState::Idle, vec![]),
            (CallState::Active { .. }, CallEvent::SpeechDone) => {
                self.speech_left = None;
                if self.grace_left.is_none() {
                    self.grace_left = Some(self.timings.grace_delay);
                }
                return CallTransition::Armed { state: from, event };
            }
            (CallState::Active { .. }, CallEvent::HangUp | CallEvent::GraceElapsed) => {
                (CallState::Idle, vec![])
            }
            _ => {
                debug!(state = from.name(), event = ?event, "call event ignored");
                return CallTransition::Ignored { state: from, event };
            }
        };

        if matches!(from, CallState::Active { .. }) {
            self.clear_active_timers();
        }
        self.state = to;
        info!(from = from.name(), to = to.name(), event = ?event, "call transition");
        CallTransition::Moved { from, to, effects }
    }

    /// Let `dt` pass, firing any timers that run out on the way.
    ///
    /// Timers are processed in deadline order, so one long step behaves the
    /// same as many short ones.
    pub fn advance(&mut self, dt: Duration) -> Vec<CallTransition> {
        let mut fired = Vec::new();
        let mut remaining = dt;
        loop {
            let step = self
                .next_deadline()
                .map_or(remaining, |deadline| deadline.min(remaining));
            self.elapse(step);
            remaining -= step;

            if let Some(transition) = self.fire_due() {
                fired.push(transition);
                continue;
            }
            if remaining.is_zero() {
                break;
            }
        }
        fired
    }

    /// Drop any call and pending ring, returning to `Idle`.
    pub fn reset(&mut self) {
        self.ring_in = None;
        self.clear_active_timers();
        self.state = CallState::Idle;
    }

    fn clear_active_timers(&mut self) {
        self.speech_left = None;
        self.grace_left = None;
        self.sub_second = Duration::ZERO;
    }

    fn next_deadline(&self) -> Option<Duration> {
        match self.state {
            CallState::Idle => self.ring_in,
            CallState::Incoming => None,
            CallState::Active { .. } => match (self.speech_left, self.grace_left) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            },
        }
    }

    fn elapse(&mut self, step: Duration) {
        match &mut self.state {
            CallState::Idle => {
                if let Some(ring) = self.ring_in.as_mut() {
                    *ring = ring.saturating_sub(step);
                }
            }
            CallState::Incoming => {}
            CallState::Active { elapsed_secs } => {
                self.sub_second += step;
                while self.sub_second >= ONE_SECOND {
                    self.sub_second -= ONE_SECOND;
                    *elapsed_secs += 1;
                }
                for timer in [&mut self.speech_left, &mut self.grace_left] {
                    if let Some(t) = timer.as_mut() {
                        *t = t.saturating_sub(step);
                    }
                }
            }
        }
    }

    fn fire_due(&mut self) -> Option<CallTransition> {
        let due = |t: Option<Duration>| t.is_some_and(|d| d.is_zero());
        match self.state {
            CallState::Idle if due(self.ring_in) => {
                Some(self.handle(CallEvent::Ring(RingSource::Extraction)))
            }
            CallState::Active { .. } if due(self.speech_left) => {
                Some(self.handle(CallEvent::SpeechDone))
            }
            CallState::Active { .. } if due(self.grace_left) => {
                Some(self.handle(CallEvent::GraceElapsed))
            }
            _ => None,
        }
    }
}

impl Default for CallMachine {
    fn default() -> Self {
        Self::new(CallTimings::default())
    }
}
