//! Canned extraction provider for demos and tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;
use tracing::debug;

use medrush_contracts::{
    error::{MedRushError, MedRushResult},
    extraction::ExtractionRequest,
};
use medrush_core::traits::ExtractionProvider;

const SAMPLE_PRESCRIPTION: &str = include_str!("../../fixtures/sample_prescription.json");

/// Answers every request with the same JSON, or the same failure.
pub struct FixtureExtractionProvider {
    answer: Result<Value, String>,
    calls: AtomicUsize,
}

impl FixtureExtractionProvider {
    pub fn answering(answer: Value) -> Self {
        Self {
            answer: Ok(answer),
            calls: AtomicUsize::new(0),
        }
    }

    /// A provider whose every request fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            answer: Err(reason.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn from_json_str(s: &str) -> MedRushResult<Self> {
        let answer = serde_json::from_str(s).map_err(|e| MedRushError::ConfigError {
            reason: format!("fixture is not valid JSON: {e}"),
        })?;
        Ok(Self::answering(answer))
    }

    /// The bundled five-medicine sample prescription.
    pub fn sample() -> MedRushResult<Self> {
        Self::from_json_str(SAMPLE_PRESCRIPTION)
    }

    /// Number of requests served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ExtractionProvider for FixtureExtractionProvider {
    fn extract(&self, request: &ExtractionRequest) -> MedRushResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        debug!(
            language = %request.target_language,
            image_bytes = request.image.len(),
            "fixture extraction"
        );
        match &self.answer {
            Ok(answer) => Ok(answer.clone()),
            Err(reason) => Err(MedRushError::ExtractionFailed {
                reason: reason.clone(),
            }),
        }
    }
}
