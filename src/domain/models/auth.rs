use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use super::profile::Role;

pub const ACCESS_TOKEN_AUDIENCE: &str = "directory-frontend";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
    pub email: String,
    pub csrf: String,
}

/// The authenticated caller as proven by a verified access token. Carries no
/// role: roles are always read from the profile store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub account_id: String,
    pub email: String,
}

/// One link of a login's rotation chain. Every refresh of the same login
/// shares `family_id` and bumps `generation_id`; a rotated link is kept with
/// `rotated_at` set so a replay of it can be recognised.
#[derive(Debug, FromRow)]
pub struct RefreshTokenRecord {
    pub token_hash: String,
    pub account_id: String,
    pub family_id: Uuid,
    pub generation_id: i32,
    pub expires_at: DateTime<Utc>,
    pub rotated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    pub fn new(token_hash: String, account_id: String, family_id: Uuid, generation_id: i32, ttl: chrono::Duration) -> Self {
        let now = Utc::now();
        Self {
            token_hash,
            account_id,
            family_id,
            generation_id,
            expires_at: now + ttl,
            rotated_at: None,
            created_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

pub struct IssuedSession {
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub csrf_token: String,
    pub user: SessionUser,
}

#[derive(Serialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}
