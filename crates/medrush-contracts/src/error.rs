//! Error types shared by every MedRush crate.
//!
//! All fallible operations return `MedRushResult<T>`. Variants carry enough
//! context for a single user-facing message; nothing in the workspace retries.

use thiserror::Error;

/// The unified error type for MedRush.
#[derive(Debug, Error)]
pub enum MedRushError {
    /// The extraction provider failed, timed out, or returned unusable data.
    ///
    /// Surfaced once per scan. The schedule is left empty.
    #[error("prescription analysis failed: {reason}")]
    ExtractionFailed { reason: String },

    /// Raw extraction output did not satisfy the response schema.
    #[error("extraction output verification failed: {reason}")]
    VerificationFailed { reason: String },

    /// Speech playback could not start or failed midway.
    ///
    /// Callers treat this as playback completion, never as a hard failure.
    #[error("voice playback failed: {reason}")]
    VoiceFailed { reason: String },

    /// A scan was requested while another one is still outstanding.
    #[error("a prescription scan is already in progress (ticket {sequence})")]
    ScanInProgress { sequence: u64 },

    /// The operation needs a verified user.
    #[error("not logged in")]
    NotLoggedIn,

    /// OTP verification was rejected by the identity provider.
    #[error("verification failed for {phone}: {reason}")]
    VerificationRejected { phone: String, reason: String },

    /// The viewer's role does not grant the capability the operation needs.
    #[error("capability '{capability}' required for action '{action}' is not granted")]
    CapabilityMissing { capability: String, action: String },

    /// A referenced record does not exist in the store.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: String, id: String },

    /// The document store could not complete a read or write.
    #[error("store operation failed: {reason}")]
    StoreFailed { reason: String },

    /// The reminder call request could not be placed.
    #[error("reminder call failed: {reason}")]
    CallOutFailed { reason: String },

    /// A user-supplied input file could not be read or parsed.
    #[error("invalid input '{path}': {reason}")]
    InvalidInput { path: String, reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenience alias used throughout the MedRush crates.
pub type MedRushResult<T> = Result<T, MedRushError>;
