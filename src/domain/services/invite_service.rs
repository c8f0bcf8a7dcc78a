use std::sync::Arc;
use chrono::{DateTime, SubsecRound, Utc};
use tracing::{error, info, warn};
use crate::domain::{
    models::{
        access_request::{InviteRejection, RedeemedInvite, RequestStatus, ValidInvite},
        profile::{Profile, Role},
    },
    ports::{AccessRequestRepository, ProfileRepository},
    services::{auth_service::AuthService, invite_token::hash_invite_token},
};
use crate::error::AppError;

/// Validation and single-use redemption of invite tokens.
///
/// Redemption claims the invite with a compare-and-set before any account is
/// created, so concurrent attempts with one token provision at most one
/// account. A failed account creation gives the claim back.
pub struct InviteService {
    requests: Arc<dyn AccessRequestRepository>,
    profiles: Arc<dyn ProfileRepository>,
    auth: Arc<AuthService>,
}

impl InviteService {
    pub fn new(
        requests: Arc<dyn AccessRequestRepository>,
        profiles: Arc<dyn ProfileRepository>,
        auth: Arc<AuthService>,
    ) -> Self {
        Self { requests, profiles, auth }
    }

    pub async fn check(&self, raw_token: &str) -> Result<ValidInvite, AppError> {
        let raw_token = raw_token.trim();
        if raw_token.is_empty() {
            return Err(AppError::InviteInvalid(InviteRejection::MissingToken));
        }

        let token_hash = hash_invite_token(raw_token);
        let request = self.requests.find_by_invite_hash(&token_hash).await?
            .filter(|r| r.status == RequestStatus::Approved)
            .ok_or(AppError::InviteInvalid(InviteRejection::Invalid))?;

        if request.invite_used_at.is_some() {
            return Err(AppError::InviteInvalid(InviteRejection::Used));
        }

        if let Some(expires_at) = request.invite_expires_at {
            if expires_at <= Utc::now() {
                return Err(AppError::InviteInvalid(InviteRejection::Expired));
            }
        }

        Ok(ValidInvite {
            request_id: request.id,
            email: request.email,
            name: request.name,
            expires_at: request.invite_expires_at,
            used_at: request.invite_used_at,
        })
    }

    pub async fn redeem(&self, raw_token: &str, password: &str) -> Result<RedeemedInvite, AppError> {
        let invite = self.check(raw_token).await?;
        AuthService::check_password_strength(password)?;

        let token_hash = hash_invite_token(raw_token.trim());
        let claimed_at = Utc::now().trunc_subsecs(6);
        if !self.requests.claim_invite(&invite.request_id, &token_hash, claimed_at).await? {
            info!(request_id = %invite.request_id, "Invite claim lost to a concurrent redemption");
            return Err(AppError::InviteInvalid(InviteRejection::Used));
        }

        let account = match self.auth.provision_account(&invite.email, password, Some(invite.name.clone())).await {
            Ok(account) => account,
            Err(e) => {
                self.release_claim(&invite.request_id, claimed_at).await?;
                return Err(e);
            }
        };

        let profile = Profile::new(account.id.clone(), account.email.clone(), account.display_name.clone(), Role::ApprovedMember);
        if let Err(e) = self.profiles.upsert(&profile).await {
            warn!(account_id = %account.id, "Could not create profile for redeemed invite: {}", e);
        }

        info!(request_id = %invite.request_id, account_id = %account.id, "Invite redeemed");
        Ok(RedeemedInvite { account_id: account.id, email: account.email })
    }

    async fn release_claim(&self, request_id: &str, claimed_at: DateTime<Utc>) -> Result<(), AppError> {
        match self.requests.release_invite(request_id, claimed_at).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                error!(request_id = %request_id, "Invite claim vanished before release");
                Ok(())
            }
            Err(e) => {
                error!(request_id = %request_id, "Invite left consumed after failed account creation: {}", e);
                Err(AppError::InternalWithMsg(format!(
                    "account creation failed and invite {} could not be released", request_id
                )))
            }
        }
    }
}
