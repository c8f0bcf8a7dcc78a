use std::sync::Arc;
use crate::domain::{
    models::{auth::Identity, profile::{Profile, Role}},
    ports::ProfileRepository,
};
use crate::error::AppError;
use tracing::warn;

/// Role gate shared by every privileged operation.
pub struct AccessGate {
    profiles: Arc<dyn ProfileRepository>,
}

impl AccessGate {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    /// Loads the caller's profile and checks its role against `allowed`.
    /// A caller without a profile counts as `Role::Unset`.
    pub async fn require(&self, caller: &Identity, allowed: &[Role]) -> Result<Profile, AppError> {
        let profile = self.profiles.find_by_account(&caller.account_id).await?;

        match profile {
            Some(profile) if allowed.contains(&profile.role) => Ok(profile),
            Some(profile) => {
                warn!(account_id = %caller.account_id, role = %profile.role, "role check failed");
                Err(AppError::Forbidden("Insufficient role".into()))
            }
            None => {
                warn!(account_id = %caller.account_id, "role check failed: no profile");
                Err(AppError::Forbidden("Insufficient role".into()))
            }
        }
    }

    pub async fn list_profiles(&self, caller: &Identity) -> Result<Vec<Profile>, AppError> {
        self.require(caller, &[Role::Admin]).await?;
        self.profiles.list().await
    }

    pub async fn role_of(&self, caller: &Identity) -> Result<Role, AppError> {
        Ok(self.profiles
            .find_by_account(&caller.account_id)
            .await?
            .map(|p| p.role)
            .unwrap_or(Role::Unset))
    }
}
