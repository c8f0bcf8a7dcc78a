use crate::domain::models::{
    access_request::{AccessRequest, IssuedInvite, RequestStatus},
    account::Account,
    auth::RefreshTokenRecord,
    profile::Profile,
    provider::{Provider, ProviderFilter},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[async_trait]
pub trait AccessRequestRepository: Send + Sync {
    async fn create(&self, request: &AccessRequest) -> Result<AccessRequest, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<AccessRequest>, AppError>;
    async fn find_by_invite_hash(&self, token_hash: &str) -> Result<Option<AccessRequest>, AppError>;
    async fn list(&self, status: Option<RequestStatus>) -> Result<Vec<AccessRequest>, AppError>;

    /// Sets the row to approved with a fresh invite. Only applies while the
    /// row is not rejected and its invite is unconsumed; `None` otherwise.
    async fn record_approval(&self, id: &str, reviewer_id: &str, reviewed_at: DateTime<Utc>, invite: &IssuedInvite) -> Result<Option<AccessRequest>, AppError>;

    /// Sets the row to rejected and clears every invite column. Same guard as
    /// `record_approval`.
    async fn record_rejection(&self, id: &str, reviewer_id: &str, reviewed_at: DateTime<Utc>, reason: &str) -> Result<Option<AccessRequest>, AppError>;

    /// Compare-and-set: marks the invite consumed only if the hash still
    /// matches, the row is approved and nobody consumed it yet.
    async fn claim_invite(&self, id: &str, token_hash: &str, used_at: DateTime<Utc>) -> Result<bool, AppError>;

    /// Undoes a claim made with exactly `used_at`.
    async fn release_invite(&self, id: &str, used_at: DateTime<Utc>) -> Result<bool, AppError>;
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create(&self, account: &Account) -> Result<Account, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, AppError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_account(&self, account_id: &str) -> Result<Option<Profile>, AppError>;
    async fn upsert(&self, profile: &Profile) -> Result<Profile, AppError>;
    async fn list(&self) -> Result<Vec<Profile>, AppError>;
}

#[async_trait]
pub trait ProviderRepository: Send + Sync {
    async fn create(&self, provider: &Provider) -> Result<Provider, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Provider>, AppError>;
    /// Persists editable fields only; `is_active` and `created_by` are untouched.
    async fn update(&self, provider: &Provider) -> Result<Provider, AppError>;
    async fn set_active(&self, id: &str, active: bool) -> Result<Option<Provider>, AppError>;
    /// Applies the structured filters (activity, owner, category, zone); text
    /// and tag criteria are left to `ProviderFilter::admits`. Newest
    /// `updated_at` first.
    async fn list(&self, filter: &ProviderFilter) -> Result<Vec<Provider>, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;

    /// Compare-and-set on `rotated_at IS NULL`; `false` when the link was
    /// already rotated by someone else.
    async fn mark_rotated(&self, token_hash: &str, rotated_at: DateTime<Utc>) -> Result<bool, AppError>;

    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<u64, AppError>;

    /// Drops the account's expired links, rotated or not.
    async fn purge_expired(&self, account_id: &str, now: DateTime<Utc>) -> Result<u64, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}
