//! Invitation repository for database operations.

use async_trait::async_trait;
use domain::models::Invitation;
use domain::ports::{InvitationFilter, InvitationRepository, StoreError};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::entities::{ChannelDb, InvitationEntity, InvitationStatusDb};
use crate::metrics::{QueryTimer, StoreQuery};

const INVITATION_COLUMNS: &str = "id, channel, recipient_name, recipient_contact, referral_code, \
     status, referrer_user_id, created_at, updated_at";

/// PostgreSQL-backed invitation store.
#[derive(Clone)]
pub struct PgInvitationRepository {
    pool: PgPool,
}

impl PgInvitationRepository {
    /// Creates a new PgInvitationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Builds the SELECT for a filter. Populated fields are ANDed together.
    fn filtered_select(filter: &InvitationFilter) -> QueryBuilder<'static, Postgres> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {} FROM invitations WHERE TRUE",
            INVITATION_COLUMNS
        ));

        if let Some(channel) = filter.channel {
            query.push(" AND channel = ").push_bind(ChannelDb::from(channel));
        }
        if let Some(status) = filter.status {
            query
                .push(" AND status = ")
                .push_bind(InvitationStatusDb::from(status));
        }
        if let Some(code) = &filter.referral_code {
            query.push(" AND referral_code = ").push_bind(code.clone());
        }
        if let Some(user_id) = &filter.referrer_user_id {
            query.push(" AND referrer_user_id = ").push_bind(user_id.clone());
        }
        if let Some(contact) = &filter.recipient_contact {
            query
                .push(" AND recipient_contact = ")
                .push_bind(contact.clone());
        }

        query.push(" ORDER BY created_at ASC, id ASC");
        query
    }
}

#[async_trait]
impl InvitationRepository for PgInvitationRepository {
    async fn get_all(&self) -> Result<Vec<Invitation>, StoreError> {
        let timer = QueryTimer::start(StoreQuery::List);
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            "SELECT {} FROM invitations ORDER BY created_at ASC, id ASC",
            INVITATION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result?.into_iter().map(Invitation::from).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Invitation>, StoreError> {
        let timer = QueryTimer::start(StoreQuery::FindById);
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            "SELECT {} FROM invitations WHERE id = $1",
            INVITATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result?.map(Invitation::from))
    }

    async fn get_by_filters(
        &self,
        filter: &InvitationFilter,
    ) -> Result<Vec<Invitation>, StoreError> {
        let timer = QueryTimer::start(StoreQuery::Filter);
        let mut query = Self::filtered_select(filter);
        let result = query
            .build_query_as::<InvitationEntity>()
            .fetch_all(&self.pool)
            .await;
        timer.finish(&result);
        Ok(result?.into_iter().map(Invitation::from).collect())
    }

    async fn add(&self, invitation: Invitation) -> Result<Invitation, StoreError> {
        let timer = QueryTimer::start(StoreQuery::Insert);
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            INSERT INTO invitations
                (id, channel, recipient_name, recipient_contact, referral_code,
                 status, referrer_user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            INVITATION_COLUMNS
        ))
        .bind(invitation.id)
        .bind(ChannelDb::from(invitation.channel))
        .bind(&invitation.recipient_name)
        .bind(&invitation.recipient_contact)
        .bind(&invitation.referral_code)
        .bind(InvitationStatusDb::from(invitation.status))
        .bind(&invitation.referrer_user_id)
        .bind(invitation.created_at)
        .bind(invitation.updated_at)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result?.into())
    }

    async fn update(&self, invitation: &Invitation) -> Result<(), StoreError> {
        let timer = QueryTimer::start(StoreQuery::Update);
        let result = sqlx::query(
            r#"
            UPDATE invitations
            SET channel = $2,
                recipient_name = $3,
                recipient_contact = $4,
                referral_code = $5,
                status = $6,
                referrer_user_id = $7,
                created_at = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(invitation.id)
        .bind(ChannelDb::from(invitation.channel))
        .bind(&invitation.recipient_name)
        .bind(&invitation.recipient_contact)
        .bind(&invitation.referral_code)
        .bind(InvitationStatusDb::from(invitation.status))
        .bind(&invitation.referrer_user_id)
        .bind(invitation.created_at)
        .bind(invitation.updated_at)
        .execute(&self.pool)
        .await;
        timer.finish(&result);

        if result?.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("invitation {}", invitation.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let timer = QueryTimer::start(StoreQuery::Delete);
        let result = sqlx::query("DELETE FROM invitations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.finish(&result);
        result?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
