//! Domain layer for the referral service.
//!
//! This crate contains:
//! - Domain models (Invitation and its request/response shapes)
//! - The storage port the service depends on, with an in-memory adapter
//! - The referral service and its error type

pub mod models;
pub mod ports;
pub mod services;
