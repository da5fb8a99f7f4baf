//! Referral service: invitation creation, listing and resolution.
//!
//! This is the only place where invitation business rules live. Storage is
//! reached through [`InvitationRepository`], so the service holds no
//! process-local state and can be shared freely between requests.
//!
//! Note: the existence checks in [`ReferralService::create_invitation`] and
//! [`ReferralService::resolve_referral`] are not atomic with the write that
//! follows. Two concurrent calls with the same referral code can both pass
//! the check.

use chrono::{DateTime, SubsecRound, Utc};
use shared::Envelope;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{
    Channel, CreateInvitationRequest, Invitation, InvitationResponse, InvitationStatusResponse,
};
use crate::ports::{InvitationFilter, InvitationRepository, StoreError};

/// Notice attached when an invitation for the code already exists.
pub const DUPLICATE_INVITATION_NOTICE: &str = "This invitation has already been sent";

/// Notice attached when a referrer has no invitations.
pub const NO_REFERRALS_NOTICE: &str = "You haven't referred any friends yet!";

/// Message of the error raised when resolving a completed invitation.
pub const REFERRAL_INACTIVE_MESSAGE: &str = "Referral code is no longer active";

pub const DEFAULT_EMAIL_MESSAGE: &str =
    "Hi! I'd love for you to join me. Sign up with my personal referral link:";
pub const DEFAULT_SMS_MESSAGE: &str = "Join me! Sign up with my referral link:";

/// Errors returned by the referral service.
#[derive(Debug, Error)]
pub enum ReferralError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already processed: {0}")]
    AlreadyProcessed(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Link-building settings supplied at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralSettings {
    /// Prefix the referral code is appended to, e.g. `https://dl.example.app/invite/`.
    pub referral_base_url: String,
    pub email_message: String,
    pub sms_message: String,
}

impl ReferralSettings {
    /// Settings with the default message templates.
    pub fn new(referral_base_url: impl Into<String>) -> Self {
        Self {
            referral_base_url: referral_base_url.into(),
            email_message: DEFAULT_EMAIL_MESSAGE.to_string(),
            sms_message: DEFAULT_SMS_MESSAGE.to_string(),
        }
    }
}

/// Current time at the microsecond precision PostgreSQL keeps, so stored
/// invitations read back unchanged.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[derive(Clone)]
pub struct ReferralService {
    repository: Arc<dyn InvitationRepository>,
    settings: ReferralSettings,
}

impl ReferralService {
    pub fn new(repository: Arc<dyn InvitationRepository>, settings: ReferralSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    /// Returns every stored invitation in the full response shape.
    pub async fn get_all(&self) -> Result<Envelope<Vec<InvitationResponse>>, ReferralError> {
        let invitations = self.repository.get_all().await?;
        let mapped = invitations.iter().map(InvitationResponse::from).collect();
        Ok(Envelope::success(mapped))
    }

    /// Builds the shareable message for a referral code.
    ///
    /// `email` (any case) selects the email template; every other value,
    /// including unknown channels, selects the sms template.
    pub fn generate_referral_link(&self, channel: &str, referral_code: &str) -> String {
        let share_url = format!("{}{}", self.settings.referral_base_url, referral_code);
        let message = match channel.parse::<Channel>() {
            Ok(Channel::Email) => &self.settings.email_message,
            _ => &self.settings.sms_message,
        };
        format!("{} {}", message, share_url)
    }

    /// Records a new pending invitation unless one already exists for the code.
    ///
    /// Either way the shareable link is returned. When an invitation already
    /// exists nothing is written and the link carries a duplicate notice.
    pub async fn create_invitation(
        &self,
        request: CreateInvitationRequest,
    ) -> Result<Envelope<String>, ReferralError> {
        let existing = self.find_by_referral_code(&request.referral_code).await?;
        let link = self.generate_referral_link(&request.channel, &request.referral_code);

        if let Some(existing) = existing {
            info!(
                referral_code = %request.referral_code,
                invitation_id = %existing.id,
                status = %existing.status,
                "Invitation already sent for referral code"
            );
            return Ok(Envelope::with_message(link, DUPLICATE_INVITATION_NOTICE));
        }

        let invitation = Invitation::from_request(&request, Uuid::new_v4(), now());
        let invitation = self.repository.add(invitation).await?;

        info!(
            invitation_id = %invitation.id,
            referral_code = %invitation.referral_code,
            referrer_user_id = %invitation.referrer_user_id,
            channel = %invitation.channel,
            "Invitation created"
        );

        Ok(Envelope::success(link))
    }

    /// Lists the recipients and statuses of a referrer's invitations.
    ///
    /// An empty result is still a success, annotated with a notice.
    pub async fn get_invitations(
        &self,
        user_id: &str,
    ) -> Result<Envelope<Vec<InvitationStatusResponse>>, ReferralError> {
        let invitations = self
            .repository
            .get_by_filters(&InvitationFilter::by_referrer(user_id))
            .await?;

        if invitations.is_empty() {
            return Ok(Envelope::with_message(Vec::new(), NO_REFERRALS_NOTICE));
        }

        let mapped = invitations
            .iter()
            .map(InvitationStatusResponse::from)
            .collect();
        Ok(Envelope::success(mapped))
    }

    /// Accepts a referral: moves its invitation from Pending to Completed.
    ///
    /// Fails with `NotFound` for an unknown code and `AlreadyProcessed` for an
    /// invitation that was resolved before. A rejected call writes nothing.
    pub async fn resolve_referral(&self, referral_code: &str) -> Result<(), ReferralError> {
        let mut invitation = self
            .find_by_referral_code(referral_code)
            .await?
            .ok_or_else(|| {
                ReferralError::NotFound(format!("Referral code {} not found", referral_code))
            })?;

        if invitation.complete(now()).is_err() {
            warn!(
                referral_code = %referral_code,
                invitation_id = %invitation.id,
                "Attempt to resolve an inactive referral code"
            );
            return Err(ReferralError::AlreadyProcessed(
                REFERRAL_INACTIVE_MESSAGE.to_string(),
            ));
        }

        self.repository.update(&invitation).await?;

        info!(
            referral_code = %referral_code,
            invitation_id = %invitation.id,
            referrer_user_id = %invitation.referrer_user_id,
            "Referral resolved"
        );

        Ok(())
    }

    /// First invitation stored for the code, if any.
    pub async fn find_by_referral_code(
        &self,
        referral_code: &str,
    ) -> Result<Option<Invitation>, ReferralError> {
        let matches = self
            .repository
            .get_by_filters(&InvitationFilter::by_referral_code(referral_code))
            .await?;
        Ok(matches.into_iter().next())
    }
}
