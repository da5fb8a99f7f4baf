//! Invitation entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Channel, Invitation, InvitationStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for invitation_channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "invitation_channel", rename_all = "lowercase")]
pub enum ChannelDb {
    Sms,
    Email,
}

impl From<ChannelDb> for Channel {
    fn from(db: ChannelDb) -> Self {
        match db {
            ChannelDb::Sms => Channel::Sms,
            ChannelDb::Email => Channel::Email,
        }
    }
}

impl From<Channel> for ChannelDb {
    fn from(channel: Channel) -> Self {
        match channel {
            Channel::Sms => ChannelDb::Sms,
            Channel::Email => ChannelDb::Email,
        }
    }
}

/// Database enum for invitation_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "invitation_status", rename_all = "lowercase")]
pub enum InvitationStatusDb {
    Pending,
    Completed,
}

impl From<InvitationStatusDb> for InvitationStatus {
    fn from(db: InvitationStatusDb) -> Self {
        match db {
            InvitationStatusDb::Pending => InvitationStatus::Pending,
            InvitationStatusDb::Completed => InvitationStatus::Completed,
        }
    }
}

impl From<InvitationStatus> for InvitationStatusDb {
    fn from(status: InvitationStatus) -> Self {
        match status {
            InvitationStatus::Pending => InvitationStatusDb::Pending,
            InvitationStatus::Completed => InvitationStatusDb::Completed,
        }
    }
}

/// Database row mapping for the invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationEntity {
    pub id: Uuid,
    pub channel: ChannelDb,
    pub recipient_name: String,
    pub recipient_contact: String,
    pub referral_code: String,
    pub status: InvitationStatusDb,
    pub referrer_user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<InvitationEntity> for Invitation {
    fn from(entity: InvitationEntity) -> Self {
        Self {
            id: entity.id,
            channel: entity.channel.into(),
            recipient_name: entity.recipient_name,
            recipient_contact: entity.recipient_contact,
            referral_code: entity.referral_code,
            status: entity.status.into(),
            referrer_user_id: entity.referrer_user_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_conversions() {
        assert_eq!(Channel::from(ChannelDb::Sms), Channel::Sms);
        assert_eq!(Channel::from(ChannelDb::Email), Channel::Email);
        assert_eq!(ChannelDb::from(Channel::Email), ChannelDb::Email);
        assert_eq!(ChannelDb::from(Channel::Sms), ChannelDb::Sms);
    }

    #[test]
    fn test_status_conversions() {
        assert_eq!(
            InvitationStatus::from(InvitationStatusDb::Completed),
            InvitationStatus::Completed
        );
        assert_eq!(
            InvitationStatusDb::from(InvitationStatus::Pending),
            InvitationStatusDb::Pending
        );
    }

    #[test]
    fn test_entity_into_domain() {
        let now = Utc::now();
        let entity = InvitationEntity {
            id: Uuid::new_v4(),
            channel: ChannelDb::Email,
            recipient_name: "Jane".to_string(),
            recipient_contact: "jane@example.com".to_string(),
            referral_code: "ABC123".to_string(),
            status: InvitationStatusDb::Completed,
            referrer_user_id: "u1".to_string(),
            created_at: now,
            updated_at: Some(now),
        };
        let id = entity.id;

        let invitation: Invitation = entity.into();
        assert_eq!(invitation.id, id);
        assert_eq!(invitation.channel, Channel::Email);
        assert_eq!(invitation.status, InvitationStatus::Completed);
        assert_eq!(invitation.referral_code, "ABC123");
        assert_eq!(invitation.updated_at, Some(now));
    }
}
