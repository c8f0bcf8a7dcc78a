use std::sync::Arc;
use chrono::Utc;
use tracing::{info, warn};
use crate::domain::{
    models::{
        access_request::{AccessRequest, ApprovalOutcome, IssuedInvite, RequestStatus, ReviewBlock},
        auth::Identity,
        profile::Role,
    },
    ports::AccessRequestRepository,
    services::{
        access_control::AccessGate,
        invite_token::{generate_invite_token, hash_invite_token},
        notification::InviteNotifier,
    },
};
use crate::config::Config;
use crate::error::AppError;

/// Intake and admin review of access requests, including invite issuance.
pub struct AccessRequestService {
    repo: Arc<dyn AccessRequestRepository>,
    gate: Arc<AccessGate>,
    notifier: Arc<InviteNotifier>,
    config: Config,
}

impl AccessRequestService {
    pub fn new(
        repo: Arc<dyn AccessRequestRepository>,
        gate: Arc<AccessGate>,
        notifier: Arc<InviteNotifier>,
        config: Config,
    ) -> Self {
        Self { repo, gate, notifier, config }
    }

    /// Input shape is validated by the caller; this only persists.
    pub async fn submit(&self, name: String, email: String, phone: Option<String>, message: Option<String>) -> Result<AccessRequest, AppError> {
        let request = AccessRequest::new(name, email, phone, message);
        if request.name.is_empty() || request.email.is_empty() {
            return Err(AppError::Validation("Name and e-mail are required".into()));
        }

        let created = self.repo.create(&request).await?;
        info!(request_id = %created.id, "Access request submitted");
        Ok(created)
    }

    pub async fn list(&self, caller: &Identity, status: Option<RequestStatus>) -> Result<Vec<AccessRequest>, AppError> {
        self.gate.require(caller, &[Role::Admin]).await?;
        self.repo.list(status).await
    }

    pub async fn approve(&self, caller: &Identity, request_id: &str) -> Result<ApprovalOutcome, AppError> {
        let admin = self.gate.require(caller, &[Role::Admin]).await?;
        self.ensure_reviewable(request_id).await?;

        let raw_token = generate_invite_token();
        let now = Utc::now();
        let invite = IssuedInvite::new(hash_invite_token(&raw_token), now, self.config.invite_ttl_days);

        let request = self.repo.record_approval(request_id, &admin.account_id, now, &invite).await?
            .ok_or_else(|| AppError::Conflict("Access request can no longer be reviewed".into()))?;

        info!(request_id = %request.id, reviewer = %admin.account_id, "Access request approved");

        let invite_url = self.config.invite_url(&raw_token);
        match self.notifier.deliver(&request.email, &request.name, &invite_url).await {
            Ok(()) => Ok(ApprovalOutcome {
                request,
                email_sent: true,
                invite_url: None,
                warning: None,
            }),
            Err(e) => {
                warn!(request_id = %request.id, "Approval committed but invite delivery failed: {}", e);
                Ok(ApprovalOutcome {
                    request,
                    email_sent: false,
                    invite_url: Some(invite_url),
                    warning: Some("The invite e-mail could not be sent; share the link manually.".into()),
                })
            }
        }
    }

    pub async fn reject(&self, caller: &Identity, request_id: &str, reason: &str) -> Result<AccessRequest, AppError> {
        let admin = self.gate.require(caller, &[Role::Admin]).await?;

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation("A rejection reason is required".into()));
        }

        self.ensure_reviewable(request_id).await?;

        let request = self.repo.record_rejection(request_id, &admin.account_id, Utc::now(), reason).await?
            .ok_or_else(|| AppError::Conflict("Access request can no longer be reviewed".into()))?;

        info!(request_id = %request.id, reviewer = %admin.account_id, "Access request rejected");
        Ok(request)
    }

    async fn ensure_reviewable(&self, request_id: &str) -> Result<AccessRequest, AppError> {
        let request = self.repo.find_by_id(request_id).await?
            .ok_or_else(|| AppError::NotFound("Access request not found".into()))?;

        match request.review_block() {
            Some(ReviewBlock::AlreadyRejected) => Err(AppError::Conflict("Access request was already rejected".into())),
            Some(ReviewBlock::InviteRedeemed) => Err(AppError::Conflict("Invite was already redeemed".into())),
            None => Ok(request),
        }
    }
}
