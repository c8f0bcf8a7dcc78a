use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use super::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            other => Err(UnknownVariant::new("request status", other)),
        }
    }
}

impl TryFrom<String> for RequestStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AccessRequest {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: RequestStatus,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    #[serde(skip_serializing)]
    pub invite_token_hash: Option<String>,
    pub invite_created_at: Option<DateTime<Utc>>,
    pub invite_expires_at: Option<DateTime<Utc>>,
    pub invite_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Why an access request cannot take a review decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewBlock {
    AlreadyRejected,
    InviteRedeemed,
}

impl AccessRequest {
    pub fn new(name: String, email: String, phone: Option<String>, message: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            phone: phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
            message: message.map(|m| m.trim().to_string()).filter(|m| !m.is_empty()),
            status: RequestStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            rejection_reason: None,
            invite_token_hash: None,
            invite_created_at: None,
            invite_expires_at: None,
            invite_used_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rejected requests are terminal and a redeemed invite locks the row.
    /// The same rule is repeated in the repositories' conditional UPDATEs.
    pub fn review_block(&self) -> Option<ReviewBlock> {
        if self.status == RequestStatus::Rejected {
            return Some(ReviewBlock::AlreadyRejected);
        }
        if self.invite_used_at.is_some() {
            return Some(ReviewBlock::InviteRedeemed);
        }
        None
    }
}

/// Hash and validity window of a freshly issued invite. The raw token never
/// lives here.
#[derive(Debug, Clone)]
pub struct IssuedInvite {
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl IssuedInvite {
    pub fn new(token_hash: String, issued_at: DateTime<Utc>, ttl_days: i64) -> Self {
        Self {
            token_hash,
            created_at: issued_at,
            expires_at: issued_at + Duration::days(ttl_days),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteRejection {
    MissingToken,
    Invalid,
    Expired,
    Used,
}

impl InviteRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteRejection::MissingToken => "missing_token",
            InviteRejection::Invalid => "invalid",
            InviteRejection::Expired => "expired",
            InviteRejection::Used => "used",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            InviteRejection::MissingToken => "Invite link is missing its token",
            InviteRejection::Invalid => "Invite link is invalid",
            InviteRejection::Expired => "Invite link has expired",
            InviteRejection::Used => "Invite link has already been used",
        }
    }
}

impl fmt::Display for InviteRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct ValidInvite {
    #[serde(skip_serializing)]
    pub request_id: String,
    pub email: String,
    pub name: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub used_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Clone)]
pub struct RedeemedInvite {
    pub account_id: String,
    pub email: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct ApprovalOutcome {
    pub request: AccessRequest,
    pub email_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
