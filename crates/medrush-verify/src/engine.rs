//! Extraction output verifier.
//!
//! `ExtractionSchemaVerifier` implements `ExtractionVerifier` from
//! `medrush-core`. Verification runs in two phases:
//!
//! 1. **Structural**: the raw provider JSON is validated against
//!    [`response_schema`] with the `jsonschema` crate.
//! 2. **Semantic**: each registered medicine rule runs against every parsed
//!    record. All failures are collected before returning.
//!
//! Any failure rejects the whole output; no partial medicine list is ever
//! returned. Passing output is normalized: a missing or null `medicines`
//! becomes an empty list, a missing or null `summary` becomes "", and every
//! status is reset to pending.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use medrush_contracts::{
    error::{MedRushError, MedRushResult},
    extraction::ExtractionResult,
    medicine::{MedicineRecord, MedicineStatus},
};
use medrush_core::traits::ExtractionVerifier;

/// A per-record semantic check.
///
/// Receives the record's position and the record. Returns `Some(message)`
/// when the check fails.
pub type MedicineRuleFn = Box<dyn Fn(usize, &MedicineRecord) -> Option<String> + Send + Sync>;

/// One failed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationFailure {
    pub rule_id: String,
    pub message: String,
}

/// Outcome of checking one extraction output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub passed: bool,
    pub failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    /// All failure messages on one line.
    pub fn describe(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("[{}] {}", f.rule_id, f.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// JSON Schema of the extraction provider's answer.
///
/// Both top-level fields may be absent or null; medicine entries need all
/// four text fields.
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "medicines": {
                "type": ["array", "null"],
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "dosage": { "type": "string" },
                        "frequency": { "type": "string" },
                        "time": { "type": "string" },
                        "status": { "enum": ["pending", "taken", "missed"] }
                    },
                    "required": ["name", "dosage", "frequency", "time"]
                }
            },
            "summary": { "type": ["string", "null"] }
        }
    })
}

/// The default verifier for extraction output.
pub struct ExtractionSchemaVerifier {
    schema: Value,
    rules: Vec<(String, MedicineRuleFn)>,
}

impl ExtractionSchemaVerifier {
    /// A verifier with the response schema and the built-in
    /// `name-not-empty` rule.
    pub fn new() -> Self {
        let mut verifier = Self {
            schema: response_schema(),
            rules: Vec::new(),
        };
        verifier.register_rule(
            "name-not-empty",
            Box::new(|index, record| {
                record
                    .name
                    .trim()
                    .is_empty()
                    .then(|| format!("medicine #{index} has an empty name"))
            }),
        );
        verifier
    }

    /// Register a semantic rule under `rule_id`. Registering the same id
    /// twice replaces the previous rule.
    pub fn register_rule(&mut self, rule_id: impl Into<String>, f: MedicineRuleFn) {
        let rule_id = rule_id.into();
        self.rules.retain(|(id, _)| *id != rule_id);
        self.rules.push((rule_id, f));
    }

    /// Run both phases and return the report together with the parsed
    /// result. The result is only present when the report passed.
    pub fn check(&self, raw: &Value) -> (VerificationReport, Option<ExtractionResult>) {
        let mut failures = Vec::new();

        // ── Phase 1: JSON Schema structural validation ───────────────────────
        match jsonschema::validator_for(&self.schema) {
            Ok(validator) => {
                for error in validator.iter_errors(raw) {
                    let message =
                        format!("JSON Schema violation at {}: {}", error.instance_path, error);
                    warn!(%message, "structural validation failure");
                    failures.push(VerificationFailure {
                        rule_id: "json-schema".to_string(),
                        message,
                    });
                }
            }
            Err(e) => {
                let message = format!("invalid JSON Schema document: {e}");
                warn!(%message, "schema compilation failure");
                failures.push(VerificationFailure {
                    rule_id: "json-schema".to_string(),
                    message,
                });
            }
        }

        if !failures.is_empty() {
            return (VerificationReport { passed: false, failures }, None);
        }

        let result = match normalize(raw) {
            Ok(result) => result,
            Err(message) => {
                failures.push(VerificationFailure {
                    rule_id: "decode".to_string(),
                    message,
                });
                return (VerificationReport { passed: false, failures }, None);
            }
        };

        // ── Phase 2: Semantic rule evaluation ────────────────────────────────
        for (index, record) in result.medicines.iter().enumerate() {
            for (rule_id, rule) in &self.rules {
                if let Some(message) = rule(index, record) {
                    warn!(rule_id = %rule_id, %message, "semantic rule failed");
                    failures.push(VerificationFailure {
                        rule_id: rule_id.clone(),
                        message,
                    });
                }
            }
        }

        let passed = failures.is_empty();
        debug!(
            passed,
            medicines = result.medicines.len(),
            failure_count = failures.len(),
            "extraction verification complete"
        );
        let result = passed.then_some(result);
        (VerificationReport { passed, failures }, result)
    }
}

impl Default for ExtractionSchemaVerifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode schema-valid output into a result with defaults applied.
fn normalize(raw: &Value) -> Result<ExtractionResult, String> {
    let medicines = match raw.get("medicines") {
        None | Some(Value::Null) => Vec::new(),
        Some(list) => serde_json::from_value::<Vec<MedicineRecord>>(list.clone())
            .map_err(|e| format!("medicine list could not be decoded: {e}"))?,
    };
    let summary = raw
        .get("summary")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(ExtractionResult {
        medicines: medicines
            .into_iter()
            .map(|m| m.with_status(MedicineStatus::Pending))
            .collect(),
        summary,
    })
}

impl ExtractionVerifier for ExtractionSchemaVerifier {
    fn verify(&self, raw: &Value) -> MedRushResult<ExtractionResult> {
        match self.check(raw) {
            (_, Some(result)) => Ok(result),
            (report, None) => Err(MedRushError::VerificationFailed {
                reason: report.describe(),
            }),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn med(name: &str, time: &str) -> Value {
        json!({"name": name, "dosage": "500mg", "frequency": "Daily", "time": time})
    }

    #[test]
    fn well_formed_output_passes() {
        let raw = json!({
            "medicines": [med("Metformin", "After Breakfast"), med("Atorvastatin", "Night")],
            "summary": "This prescription includes what to take and when to take."
        });
        let result = ExtractionSchemaVerifier::new().verify(&raw).unwrap();
        assert_eq!(result.medicines.len(), 2);
        assert_eq!(result.medicines[1].time, "Night");
        assert!(result.summary.starts_with("This prescription"));
    }

    #[test]
    fn provider_supplied_status_is_reset_to_pending() {
        let mut entry = med("Metformin", "morning");
        entry["status"] = json!("taken");
        let result = ExtractionSchemaVerifier::new()
            .verify(&json!({"medicines": [entry], "summary": "s"}))
            .unwrap();
        assert_eq!(result.medicines[0].status, MedicineStatus::Pending);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let result = ExtractionSchemaVerifier::new().verify(&json!({})).unwrap();
        assert_eq!(result, ExtractionResult::default());

        let result = ExtractionSchemaVerifier::new()
            .verify(&json!({"medicines": null, "summary": null}))
            .unwrap();
        assert!(result.medicines.is_empty());
        assert_eq!(result.summary, "");
    }

    #[test]
    fn entry_missing_time_rejects_whole_output() {
        let raw = json!({
            "medicines": [
                med("Metformin", "morning"),
                {"name": "Aspirin", "dosage": "75mg", "frequency": "once"}
            ],
            "summary": "s"
        });
        let (report, result) = ExtractionSchemaVerifier::new().check(&raw);
        assert!(!report.passed);
        assert!(result.is_none(), "partial results must not be returned");
        assert!(report.failures.iter().all(|f| f.rule_id == "json-schema"));
    }

    #[test]
    fn wrong_types_are_reported() {
        let raw = json!({"medicines": "Metformin", "summary": 42});
        let (report, _) = ExtractionSchemaVerifier::new().check(&raw);
        assert_eq!(report.failures.len(), 2, "failures: {:?}", report.failures);
    }

    #[test]
    fn non_object_output_is_rejected() {
        let err = ExtractionSchemaVerifier::new()
            .verify(&json!("not json object"))
            .unwrap_err();
        assert!(matches!(err, MedRushError::VerificationFailed { .. }));
    }

    #[test]
    fn empty_names_are_all_collected() {
        let raw = json!({"medicines": [med(" ", "am"), med("Ok", "pm"), med("", "pm")]});
        let (report, result) = ExtractionSchemaVerifier::new().check(&raw);
        assert!(result.is_none());
        assert_eq!(report.failures.len(), 2);
        assert!(report.describe().contains("medicine #0"));
        assert!(report.describe().contains("medicine #2"));
    }

    #[test]
    fn custom_rule_runs_per_record() {
        let mut verifier = ExtractionSchemaVerifier::new();
        verifier.register_rule(
            "dosage-present",
            Box::new(|i, m| m.dosage.is_empty().then(|| format!("medicine #{i} has no dosage"))),
        );
        let raw = json!({"medicines": [{"name": "X", "dosage": "", "frequency": "", "time": ""}]});
        let err = verifier.verify(&raw).unwrap_err();
        assert!(err.to_string().contains("dosage-present"));
    }

    #[test]
    fn re_registering_rule_replaces_it() {
        let mut verifier = ExtractionSchemaVerifier::new();
        verifier.register_rule("name-not-empty", Box::new(|_, _| None));
        let raw = json!({"medicines": [med("", "am")]});
        assert!(verifier.verify(&raw).is_ok());
    }
}
