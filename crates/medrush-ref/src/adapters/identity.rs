//! Stand-in phone verification.
//!
//! `DummyOtpIdentity` sends nothing and accepts one fixed code for every
//! phone number. Verified uids are derived from the phone number, so logging
//! in twice with the same phone resolves to the same user.

use tracing::{info, warn};

use medrush_contracts::error::{MedRushError, MedRushResult};
use medrush_core::traits::{IdentityProvider, OtpChallenge};

pub struct DummyOtpIdentity {
    code: String,
}

impl DummyOtpIdentity {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    fn verification_id(phone: &str) -> String {
        format!("dummy-{phone}")
    }
}

/// Digits only, after removing spaces, dashes and a leading `+`.
fn normalize_phone(phone: &str) -> Option<String> {
    let digits: String = phone
        .trim()
        .trim_start_matches('+')
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();
    (digits.len() >= 6 && digits.chars().all(|c| c.is_ascii_digit())).then_some(digits)
}

impl IdentityProvider for DummyOtpIdentity {
    fn send_otp(&self, phone: &str) -> MedRushResult<OtpChallenge> {
        let normalized = normalize_phone(phone).ok_or_else(|| MedRushError::VerificationRejected {
            phone: phone.to_string(),
            reason: "invalid phone number".to_string(),
        })?;
        info!(phone = %normalized, "dummy otp issued");
        Ok(OtpChallenge {
            verification_id: Self::verification_id(&normalized),
            phone: normalized,
        })
    }

    fn verify_otp(&self, challenge: &OtpChallenge, code: &str) -> MedRushResult<String> {
        let reject = |reason: &str| {
            warn!(phone = %challenge.phone, reason, "otp rejected");
            Err(MedRushError::VerificationRejected {
                phone: challenge.phone.clone(),
                reason: reason.to_string(),
            })
        };
        if challenge.verification_id != Self::verification_id(&challenge.phone) {
            return reject("unknown verification id");
        }
        if code.trim() != self.code {
            return reject("incorrect code");
        }
        Ok(format!("uid-{}", challenge.phone))
    }
}
