//! Reminder call-out provider that only logs.
//!
//! Real outbound calls are not placed. Each request is recorded and answered
//! with status `not_implemented`.

use std::sync::Mutex;

use tracing::info;

use medrush_contracts::{
    error::{MedRushError, MedRushResult},
    user::Patient,
};
use medrush_core::traits::{CallOutProvider, CallOutReceipt};

pub const NOT_IMPLEMENTED: &str = "not_implemented";

#[derive(Debug, Default)]
pub struct LoggingCallOut {
    requests: Mutex<Vec<(String, String)>>,
}

impl LoggingCallOut {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(patient_id, message)` pairs, oldest first.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl CallOutProvider for LoggingCallOut {
    fn call_out(&self, patient: &Patient, message: &str) -> MedRushResult<CallOutReceipt> {
        info!(patient_id = %patient.id, phone = %patient.phone, "reminder call requested");
        self.requests
            .lock()
            .map_err(|e| MedRushError::CallOutFailed {
                reason: format!("request log lock poisoned: {e}"),
            })?
            .push((patient.id.clone(), message.to_string()));
        Ok(CallOutReceipt {
            status: NOT_IMPLEMENTED.to_string(),
            message: format!("AI call to {} is simulated only", patient.name),
        })
    }
}
