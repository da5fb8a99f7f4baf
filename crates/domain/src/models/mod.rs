//! Domain models for the referral service.

pub mod invitation;

pub use invitation::{
    AlreadyCompleted, Channel, CreateInvitationRequest, Invitation, InvitationResponse,
    InvitationStatus, InvitationStatusResponse,
};
