//! Invitation domain models for referrals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Delivery channel for an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Sms,
    Email,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Sms => "sms",
            Channel::Email => "email",
        }
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sms" => Ok(Channel::Sms),
            "email" => Ok(Channel::Email),
            _ => Err(format!("Invalid channel: {}", s)),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of an invitation.
///
/// The only legal transition is `Pending -> Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvitationStatus {
    Pending,
    Completed,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "Pending",
            InvitationStatus::Completed => "Completed",
        }
    }

    /// Returns true if moving from `self` to `next` is allowed.
    pub fn can_transition_to(&self, next: InvitationStatus) -> bool {
        matches!(
            (self, next),
            (InvitationStatus::Pending, InvitationStatus::Completed)
        )
    }
}

impl FromStr for InvitationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(InvitationStatus::Pending),
            "completed" => Ok(InvitationStatus::Completed),
            _ => Err(format!("Invalid invitation status: {}", s)),
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned by [`Invitation::complete`] when the invitation was already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlreadyCompleted;

/// A referral invitation sent by a user to a recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Invitation {
    pub id: Uuid,
    pub channel: Channel,
    pub recipient_name: String,
    pub recipient_contact: String,
    pub referral_code: String,
    pub status: InvitationStatus,
    pub referrer_user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Invitation {
    /// Builds a fresh pending invitation from a create request.
    ///
    /// Unrecognized channels fall back to sms, mirroring link generation.
    pub fn from_request(request: &CreateInvitationRequest, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            channel: request.channel.parse().unwrap_or(Channel::Sms),
            recipient_name: request.recipient_name.clone(),
            recipient_contact: request.recipient_contact.clone(),
            referral_code: request.referral_code.clone(),
            status: InvitationStatus::Pending,
            referrer_user_id: request.referrer_user_id.clone(),
            created_at: now,
            updated_at: None,
        }
    }

    /// Moves a pending invitation to completed and stamps `updated_at`.
    ///
    /// A completed invitation is left untouched.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<(), AlreadyCompleted> {
        if !self.status.can_transition_to(InvitationStatus::Completed) {
            return Err(AlreadyCompleted);
        }
        self.status = InvitationStatus::Completed;
        self.updated_at = Some(now);
        Ok(())
    }
}

lazy_static::lazy_static! {
    static ref REFERRAL_CODE_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9_-]{1,64}$").unwrap();
}

fn validate_channel(channel: &str) -> Result<(), ValidationError> {
    channel.parse::<Channel>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("channel");
        err.message = Some("Channel must be either sms or email".into());
        err
    })
}

/// Request to create (send) a new invitation.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateInvitationRequest {
    /// sms or email, case-insensitive.
    #[validate(custom(function = "validate_channel"))]
    pub channel: String,

    #[serde(default)]
    pub recipient_name: String,

    /// Phone number or email address of the recipient.
    #[serde(default)]
    pub recipient_contact: String,

    #[validate(regex(
        path = *REFERRAL_CODE_REGEX,
        message = "Referral code must be 1-64 letters, digits, '-' or '_'"
    ))]
    pub referral_code: String,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub referrer_user_id: String,
}

/// Full invitation view returned by the list-all operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationResponse {
    pub id: Uuid,
    pub channel: Channel,
    pub recipient_name: String,
    pub recipient_contact: String,
    pub status: InvitationStatus,
    pub referral_code: String,
    pub referrer_user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Invitation> for InvitationResponse {
    fn from(invitation: &Invitation) -> Self {
        Self {
            id: invitation.id,
            channel: invitation.channel,
            recipient_name: invitation.recipient_name.clone(),
            recipient_contact: invitation.recipient_contact.clone(),
            status: invitation.status,
            referral_code: invitation.referral_code.clone(),
            referrer_user_id: invitation.referrer_user_id.clone(),
            created_at: invitation.created_at,
            updated_at: invitation.updated_at,
        }
    }
}

/// Reduced view shown to a referrer listing their invitations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationStatusResponse {
    pub recipient_name: String,
    pub status: InvitationStatus,
}

impl From<&Invitation> for InvitationStatusResponse {
    fn from(invitation: &Invitation) -> Self {
        Self {
            recipient_name: invitation.recipient_name.clone(),
            status: invitation.status,
        }
    }
}
