//! # medrush-contracts
//!
//! Shared types, records, and error definitions for MedRush.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions and error types.

pub mod call;
pub mod error;
pub mod extraction;
pub mod medicine;
pub mod role;
pub mod schedule;
pub mod user;
