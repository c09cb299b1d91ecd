//! Gemini `generateContent` extraction provider.
//!
//! Sends the prescription image inline (base64 JPEG) together with the
//! extraction prompt and a response schema, and returns the model's JSON
//! answer unverified. One attempt per scan; the reqwest client enforces the
//! configured timeout.

use std::time::Duration;

use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use medrush_config::ExtractionSettings;
use medrush_contracts::{
    error::{MedRushError, MedRushResult},
    extraction::ExtractionRequest,
    medicine::Language,
};
use medrush_core::traits::ExtractionProvider;

/// Longest slice of an error body kept in an error message.
const ERROR_BODY_LIMIT: usize = 200;

/// The instruction sent alongside the image.
pub fn extraction_prompt(language: Language) -> String {
    format!(
        "Analyze this prescription image and extract all medicines. For each medicine, \
         identify: name, dosage, frequency, and time of day. Also provide a simple one-line \
         summary sentence in {} stating \"This prescription includes what to take and when \
         to take.\" or its translation.",
        language.display_name()
    )
}

/// Response schema in the provider's OpenAPI-style dialect.
pub fn provider_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "medicines": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "dosage": { "type": "STRING" },
                        "frequency": { "type": "STRING" },
                        "time": { "type": "STRING" }
                    },
                    "required": ["name", "dosage", "frequency", "time"],
                    "propertyOrdering": ["name", "dosage", "frequency", "time"]
                }
            },
            "summary": { "type": "STRING" }
        },
        "required": ["medicines", "summary"],
        "propertyOrdering": ["medicines", "summary"]
    })
}

/// Build the `generateContent` request body for one scan.
pub fn build_request_body(request: &ExtractionRequest) -> Value {
    let image = base64::engine::general_purpose::STANDARD.encode(&request.image);
    json!({
        "contents": [{
            "parts": [
                { "inlineData": { "mimeType": "image/jpeg", "data": image } },
                { "text": extraction_prompt(request.target_language) }
            ]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": provider_response_schema()
        }
    })
}

// ── Response envelope ─────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

/// Pull the model's JSON answer out of a `generateContent` response.
///
/// The text parts of the first candidate are concatenated. An answer with no
/// text is treated as `{}`, which later verifies to an empty result.
pub fn parse_response(body: &Value) -> MedRushResult<Value> {
    let envelope: GenerateResponse =
        serde_json::from_value(body.clone()).map_err(|e| MedRushError::ExtractionFailed {
            reason: format!("unexpected response shape: {e}"),
        })?;

    let text: String = envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    let text = if text.trim().is_empty() { "{}" } else { text.trim() };

    serde_json::from_str(text).map_err(|e| MedRushError::ExtractionFailed {
        reason: format!("model answer is not valid JSON: {e}"),
    })
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(ERROR_BODY_LIMIT) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

// ── Provider ──────────────────────────────────────────────────────────────────

/// Blocking HTTP client for the Gemini API.
pub struct GeminiExtractionProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: String,
    timeout_secs: u64,
}

impl GeminiExtractionProvider {
    pub fn new(settings: &ExtractionSettings, api_key: impl Into<String>) -> MedRushResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| MedRushError::ConfigError {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: api_key.into(),
            timeout_secs: settings.timeout_secs,
        })
    }

    /// Build a provider using the key named by `settings.api_key_env`.
    pub fn from_settings(settings: &ExtractionSettings) -> MedRushResult<Self> {
        let api_key = settings.api_key()?;
        Self::new(settings, api_key)
    }

    pub fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl ExtractionProvider for GeminiExtractionProvider {
    fn extract(&self, request: &ExtractionRequest) -> MedRushResult<Value> {
        let url = self.url();
        debug!(
            model = %self.model,
            language = %request.target_language,
            image_bytes = request.image.len(),
            "sending extraction request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request_body(request))
            .send()
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    format!("request timed out after {}s", self.timeout_secs)
                } else if e.is_connect() {
                    format!("could not connect to {}", self.endpoint)
                } else {
                    e.to_string()
                };
                warn!(%reason, "extraction request failed");
                MedRushError::ExtractionFailed { reason }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(MedRushError::ExtractionFailed {
                reason: format!("provider returned HTTP {}: {}", status.as_u16(), truncate(&body)),
            });
        }

        let body: Value = response.json().map_err(|e| MedRushError::ExtractionFailed {
            reason: format!("response body is not JSON: {e}"),
        })?;
        parse_response(&body)
    }
}
