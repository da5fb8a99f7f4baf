//! Shared utilities and common types for the referral service.
//!
//! This crate provides functionality used across all other crates:
//! - The `Envelope` success wrapper returned by services
//! - Common validation logic

pub mod envelope;
pub mod validation;

pub use envelope::Envelope;
