//! In-process invitation store.
//!
//! Backs the `memory` storage backend and the service and HTTP tests.
//! Records are kept in insertion order, which is creation order.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{InvitationFilter, InvitationRepository, StoreError};
use crate::models::Invitation;

#[derive(Debug, Clone, Default)]
pub struct InMemoryInvitationRepository {
    records: Arc<RwLock<Vec<Invitation>>>,
    /// Whether every call should fail, for exercising error paths.
    pub simulate_failure: bool,
}

impl InMemoryInvitationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given records.
    pub fn with_records(records: Vec<Invitation>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            simulate_failure: false,
        }
    }

    /// Create a store whose every operation fails.
    pub fn failing() -> Self {
        Self {
            records: Arc::default(),
            simulate_failure: true,
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.simulate_failure {
            tracing::warn!("In-memory invitation store simulating failure");
            return Err(StoreError::Backend("simulated storage failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl InvitationRepository for InMemoryInvitationRepository {
    async fn get_all(&self) -> Result<Vec<Invitation>, StoreError> {
        self.check()?;
        Ok(self.records.read().await.clone())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Invitation>, StoreError> {
        self.check()?;
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn get_by_filters(
        &self,
        filter: &InvitationFilter,
    ) -> Result<Vec<Invitation>, StoreError> {
        self.check()?;
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| filter.matches(r)).cloned().collect())
    }

    async fn add(&self, invitation: Invitation) -> Result<Invitation, StoreError> {
        self.check()?;
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id == invitation.id) {
            return Err(StoreError::Backend(
                format!("invitation {} already exists", invitation.id).into(),
            ));
        }
        records.push(invitation.clone());
        Ok(invitation)
    }

    async fn update(&self, invitation: &Invitation) -> Result<(), StoreError> {
        self.check()?;
        let mut records = self.records.write().await;
        let existing = records
            .iter_mut()
            .find(|r| r.id == invitation.id)
            .ok_or_else(|| StoreError::NotFound(format!("invitation {}", invitation.id)))?;
        *existing = invitation.clone();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.check()?;
        self.records.write().await.retain(|r| r.id != id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}
