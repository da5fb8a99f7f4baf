//! Storage ports the domain depends on.
//!
//! The referral service talks to storage only through [`InvitationRepository`].
//! Adapters live in the persistence crate (PostgreSQL) and in [`memory`].

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Channel, Invitation, InvitationStatus};

pub use memory::InMemoryInvitationRepository;

/// Errors raised by a storage adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("Row not found".into()),
            other => StoreError::Backend(Box::new(other)),
        }
    }
}

/// Equality filters over invitation fields.
///
/// A record matches when every populated field is equal. An empty filter
/// matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvitationFilter {
    pub channel: Option<Channel>,
    pub status: Option<InvitationStatus>,
    pub referral_code: Option<String>,
    pub referrer_user_id: Option<String>,
    pub recipient_contact: Option<String>,
}

impl InvitationFilter {
    pub fn by_referral_code(code: impl Into<String>) -> Self {
        Self {
            referral_code: Some(code.into()),
            ..Default::default()
        }
    }

    pub fn by_referrer(user_id: impl Into<String>) -> Self {
        Self {
            referrer_user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: InvitationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Returns true if the invitation satisfies every populated field.
    pub fn matches(&self, invitation: &Invitation) -> bool {
        self.channel.map_or(true, |c| c == invitation.channel)
            && self.status.map_or(true, |s| s == invitation.status)
            && self
                .referral_code
                .as_deref()
                .map_or(true, |c| c == invitation.referral_code)
            && self
                .referrer_user_id
                .as_deref()
                .map_or(true, |u| u == invitation.referrer_user_id)
            && self
                .recipient_contact
                .as_deref()
                .map_or(true, |r| r == invitation.recipient_contact)
    }
}

/// Typed read/write access to stored invitations. No business rules.
///
/// Listing operations return records oldest first, so the first element of a
/// filtered result is the earliest matching invitation.
#[async_trait]
pub trait InvitationRepository: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Invitation>, StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Invitation>, StoreError>;

    async fn get_by_filters(
        &self,
        filter: &InvitationFilter,
    ) -> Result<Vec<Invitation>, StoreError>;

    /// Persists a new record as given and returns the stored copy.
    /// Fails if a record with the same id already exists.
    async fn add(&self, invitation: Invitation) -> Result<Invitation, StoreError>;

    /// Overwrites the record with the same id.
    ///
    /// Fails with [`StoreError::NotFound`] if no such record exists.
    async fn update(&self, invitation: &Invitation) -> Result<(), StoreError>;

    /// Removes a record. Deleting a missing id is not an error.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn invitation(code: &str, referrer: &str) -> Invitation {
        Invitation {
            id: Uuid::new_v4(),
            channel: Channel::Sms,
            recipient_name: "Jane".to_string(),
            recipient_contact: "555-0100".to_string(),
            referral_code: code.to_string(),
            status: InvitationStatus::Pending,
            referrer_user_id: referrer.to_string(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = InvitationFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&invitation("ABC123", "u1")));
    }

    #[test]
    fn test_filter_by_referral_code() {
        let filter = InvitationFilter::by_referral_code("ABC123");
        assert!(!filter.is_empty());
        assert!(filter.matches(&invitation("ABC123", "u1")));
        assert!(!filter.matches(&invitation("abc123", "u1")));
    }

    #[test]
    fn test_filter_requires_all_fields() {
        let filter = InvitationFilter::by_referrer("u1").with_status(InvitationStatus::Completed);
        let mut inv = invitation("ABC123", "u1");
        assert!(!filter.matches(&inv));

        inv.status = InvitationStatus::Completed;
        assert!(filter.matches(&inv));

        inv.referrer_user_id = "u2".to_string();
        assert!(!filter.matches(&inv));
    }

    #[test]
    fn test_filter_channel_and_contact() {
        let filter = InvitationFilter {
            channel: Some(Channel::Email),
            recipient_contact: Some("555-0100".to_string()),
            ..Default::default()
        };
        let mut inv = invitation("ABC123", "u1");
        assert!(!filter.matches(&inv));
        inv.channel = Channel::Email;
        assert!(filter.matches(&inv));
    }

    #[test]
    fn test_store_error_from_sqlx_row_not_found() {
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::NotFound("invitation 1".to_string());
        assert_eq!(err.to_string(), "Record not found: invitation 1");
    }
}
