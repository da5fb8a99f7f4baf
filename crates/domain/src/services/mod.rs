//! Domain services for the referral service.
//!
//! Services contain business logic that operates on domain models.

pub mod referral;

pub use referral::{
    ReferralError, ReferralService, ReferralSettings, DUPLICATE_INVITATION_NOTICE,
    NO_REFERRALS_NOTICE, REFERRAL_INACTIVE_MESSAGE,
};
