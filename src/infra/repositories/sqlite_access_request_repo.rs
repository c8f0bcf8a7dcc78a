use crate::domain::{
    models::access_request::{AccessRequest, IssuedInvite, RequestStatus},
    ports::AccessRequestRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteAccessRequestRepo {
    pool: SqlitePool,
}

impl SqliteAccessRequestRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessRequestRepository for SqliteAccessRequestRepo {
    async fn create(&self, request: &AccessRequest) -> Result<AccessRequest, AppError> {
        sqlx::query_as::<_, AccessRequest>(
            "INSERT INTO access_requests (id, name, email, phone, message, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
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
        sqlx::query_as::<_, AccessRequest>("SELECT * FROM access_requests WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_invite_hash(&self, token_hash: &str) -> Result<Option<AccessRequest>, AppError> {
        sqlx::query_as::<_, AccessRequest>("SELECT * FROM access_requests WHERE invite_token_hash = ?")
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, status: Option<RequestStatus>) -> Result<Vec<AccessRequest>, AppError> {
        let status = status.map(|s| s.as_str());
        sqlx::query_as::<_, AccessRequest>(
            "SELECT * FROM access_requests WHERE (? IS NULL OR status = ?) ORDER BY created_at DESC, id DESC",
        )
            .bind(status)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn record_approval(&self, id: &str, reviewer_id: &str, reviewed_at: DateTime<Utc>, invite: &IssuedInvite) -> Result<Option<AccessRequest>, AppError> {
        sqlx::query_as::<_, AccessRequest>(
            "UPDATE access_requests SET status = 'approved', reviewed_by = ?, reviewed_at = ?, rejection_reason = NULL,
                invite_token_hash = ?, invite_created_at = ?, invite_expires_at = ?, invite_used_at = NULL, updated_at = ?
             WHERE id = ? AND status != 'rejected' AND invite_used_at IS NULL
             RETURNING *",
        )
            .bind(reviewer_id)
            .bind(reviewed_at)
            .bind(&invite.token_hash)
            .bind(invite.created_at)
            .bind(invite.expires_at)
            .bind(reviewed_at)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn record_rejection(&self, id: &str, reviewer_id: &str, reviewed_at: DateTime<Utc>, reason: &str) -> Result<Option<AccessRequest>, AppError> {
        sqlx::query_as::<_, AccessRequest>(
            "UPDATE access_requests SET status = 'rejected', reviewed_by = ?, reviewed_at = ?, rejection_reason = ?,
                invite_token_hash = NULL, invite_created_at = NULL, invite_expires_at = NULL, invite_used_at = NULL, updated_at = ?
             WHERE id = ? AND status != 'rejected' AND invite_used_at IS NULL
             RETURNING *",
        )
            .bind(reviewer_id)
            .bind(reviewed_at)
            .bind(reason)
            .bind(reviewed_at)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn claim_invite(&self, id: &str, token_hash: &str, used_at: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE access_requests SET invite_used_at = ?, updated_at = ?
             WHERE id = ? AND invite_token_hash = ? AND status = 'approved' AND invite_used_at IS NULL",
        )
            .bind(used_at)
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
            "UPDATE access_requests SET invite_used_at = NULL, updated_at = ? WHERE id = ? AND invite_used_at = ?",
        )
            .bind(Utc::now())
            .bind(id)
            .bind(used_at)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() == 1)
    }
}
