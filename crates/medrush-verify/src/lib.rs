//! # medrush-verify
//!
//! Verification of raw prescription-extraction output.
//!
//! This crate provides [`engine::ExtractionSchemaVerifier`], which implements
//! the [`medrush_core::traits::ExtractionVerifier`] trait. It checks the
//! provider's JSON in two phases:
//!
//! 1. **Structural**: JSON Schema validation via the `jsonschema` crate.
//! 2. **Semantic**: per-medicine rules, `name-not-empty` by default.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use medrush_verify::engine::ExtractionSchemaVerifier;
//!
//! let mut verifier = ExtractionSchemaVerifier::new();
//! verifier.register_rule("dosage-present", Box::new(|i, m| {
//!     m.dosage.is_empty().then(|| format!("medicine #{i} has no dosage"))
//! }));
//! ```

pub mod engine;

pub use engine::{response_schema, ExtractionSchemaVerifier, VerificationReport};
