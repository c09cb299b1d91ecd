//! Extraction boundary types.

use serde::{Deserialize, Serialize};

use crate::medicine::{Language, MedicineRecord};

/// Input to an extraction provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    /// Raw image bytes as captured (JPEG in practice).
    pub image: Vec<u8>,
    pub target_language: Language,
}

impl ExtractionRequest {
    pub fn new(image: Vec<u8>, target_language: Language) -> Self {
        Self { image, target_language }
    }
}

/// A verified extraction: the medicine list plus a one-line summary.
///
/// Every medicine arrives with status `Pending`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub medicines: Vec<MedicineRecord>,
    pub summary: String,
}
