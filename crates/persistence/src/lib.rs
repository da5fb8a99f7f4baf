//! Persistence layer for the referral service.
//!
//! This crate contains:
//! - Database connection management and migrations
//! - Entity definitions (database row mappings)
//! - The PostgreSQL implementation of the invitation store

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
