use crate::domain::{
    models::access_request::{AccessRequest, IssuedInvite, RequestStatus},
    ports::AccessRequestRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresAccessRequestRepo {
    pool: PgPool,
}

impl PostgresAccessRequestRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessRequestRepository for PostgresAccessRequestRepo {
    async fn create(&self, request: &AccessRequest) -> Result<AccessRequest, AppError> {
        sqlx::query_as::<_, AccessRequest>(
            "INSERT INTO access_requests (id, name, email, phone, message, status, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
            .bind(&request.id)
            .bind(&request.name)
            .bind(&request.email)
            .bind(&request.phone)
            .bind(&request.message)
            .bind(request.status.as_str())
            .bind(request.created_at)
            .bind(request.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<AccessRequest>, AppError> {
        sqlx::query_as::<_, AccessRequest>("SELECT * FROM access_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_invite_hash(&self, token_hash: &str) -> Result<Option<AccessRequest>, AppError> {
        sqlx::query_as::<_, AccessRequest>("SELECT * FROM access_requests WHERE invite_token_hash = $1")
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, status: Option<RequestStatus>) -> Result<Vec<AccessRequest>, AppError> {
        sqlx::query_as::<_, AccessRequest>(
            "SELECT * FROM access_requests WHERE ($1::text IS NULL OR status = $1) ORDER BY created_at DESC, id DESC",
        )
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn record_approval(&self, id: &str, reviewer_id: &str, reviewed_at: DateTime<Utc>, invite: &IssuedInvite) -> Result<Option<AccessRequest>, AppError> {
        sqlx::query_as::<_, AccessRequest>(
            "UPDATE access_requests SET status = 'approved', reviewed_by = $1, reviewed_at = $2, rejection_reason = NULL,
                invite_token_hash = $3, invite_created_at = $4, invite_expires_at = $5, invite_used_at = NULL, updated_at = $2
             WHERE id = $6 AND status <> 'rejected' AND invite_used_at IS NULL
             RETURNING *",
        )
            .bind(reviewer_id)
            .bind(reviewed_at)
            .bind(&invite.token_hash)
            .bind(invite.created_at)
            .bind(invite.expires_at)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn record_rejection(&self, id: &str, reviewer_id: &str, reviewed_at: DateTime<Utc>, reason: &str) -> Result<Option<AccessRequest>, AppError> {
        sqlx::query_as::<_, AccessRequest>(
            "UPDATE access_requests SET status = 'rejected', reviewed_by = $1, reviewed_at = $2, rejection_reason = $3,
                invite_token_hash = NULL, invite_created_at = NULL, invite_expires_at = NULL, invite_used_at = NULL, updated_at = $2
             WHERE id = $4 AND status <> 'rejected' AND invite_used_at IS NULL
             RETURNING *",
        )
            .bind(reviewer_id)
            .bind(reviewed_at)
            .bind(reason)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn claim_invite(&self, id: &str, token_hash: &str, used_at: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE access_requests SET invite_used_at = $1, updated_at = $1
             WHERE id = $2 AND invite_token_hash = $3 AND status = 'approved' AND invite_used_at IS NULL",
        )
            .bind(used_at)
            .bind(id)
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() == 1)
    }

    async fn release_invite(&self, id: &str, used_at: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE access_requests SET invite_used_at = NULL, updated_at = NOW() WHERE id = $1 AND invite_used_at = $2",
        )
            .bind(id)
            .bind(used_at)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() == 1)
    }
}
