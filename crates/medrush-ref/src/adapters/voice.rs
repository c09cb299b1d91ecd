//! Voice providers.
//!
//! `ConsoleVoice` stands in for device-local speech synthesis: it shows the
//! utterance with its speech tag and reports how long speaking it would take
//! at the configured rate. The other two are test doubles.

use std::sync::Mutex;
use std::time::Duration;

use tracing::info;

use medrush_contracts::{
    error::{MedRushError, MedRushResult},
    medicine::Language,
};
use medrush_core::traits::{Playback, VoiceProvider};

/// Words spoken per second at rate 1.0.
const WORDS_PER_SECOND: f32 = 2.5;

/// Estimated playback length of `text` at `rate`.
///
/// Empty text takes no time; anything else takes at least one second.
pub fn estimate_duration(text: &str, rate: f32) -> Duration {
    let words = text.split_whitespace().count();
    if words == 0 {
        return Duration::ZERO;
    }
    let secs = words as f32 / (WORDS_PER_SECOND * rate.max(0.1));
    Duration::from_secs_f32(secs.max(1.0))
}

/// Prints utterances instead of speaking them.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleVoice {
    rate: f32,
    print: bool,
}

impl ConsoleVoice {
    pub fn new(rate: f32) -> Self {
        Self { rate, print: true }
    }

    /// Only logs the utterance. For full-screen interfaces that own stdout.
    pub fn silent(rate: f32) -> Self {
        Self { rate, print: false }
    }
}

impl VoiceProvider for ConsoleVoice {
    fn speak(&self, text: &str, language: Language) -> MedRushResult<Playback> {
        let duration = estimate_duration(text, self.rate);
        info!(
            lang = language.speech_tag(),
            rate = self.rate,
            duration_ms = duration.as_millis() as u64,
            "speaking"
        );
        if self.print {
            println!("  [voice {}] \"{}\"", language.speech_tag(), text);
        }
        Ok(Playback::finishing_after(duration))
    }
}

/// Remembers everything it was asked to say.
#[derive(Debug, Default)]
pub struct RecordingVoice {
    spoken: Mutex<Vec<(String, Language)>>,
    playback: Playback,
}

impl RecordingVoice {
    pub fn new(playback: Playback) -> Self {
        Self {
            spoken: Mutex::new(Vec::new()),
            playback,
        }
    }

    pub fn spoken(&self) -> Vec<(String, Language)> {
        self.spoken.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl VoiceProvider for RecordingVoice {
    fn speak(&self, text: &str, language: Language) -> MedRushResult<Playback> {
        let mut spoken = self.spoken.lock().map_err(|e| MedRushError::VoiceFailed {
            reason: format!("recorder lock poisoned: {e}"),
        })?;
        spoken.push((text.to_string(), language));
        Ok(self.playback)
    }
}

/// Never manages to speak.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingVoice;

impl VoiceProvider for FailingVoice {
    fn speak(&self, _text: &str, language: Language) -> MedRushResult<Playback> {
        Err(MedRushError::VoiceFailed {
            reason: format!("no {} voice available", language.speech_tag()),
        })
    }
}
