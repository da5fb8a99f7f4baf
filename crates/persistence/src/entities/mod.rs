//! Database entity definitions.
//!
//! Entities map directly to database rows and are converted into domain models.

pub mod invitation;

pub use invitation::{ChannelDb, InvitationEntity, InvitationStatusDb};
