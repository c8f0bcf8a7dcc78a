use std::sync::Arc;
use tracing::info;
use crate::domain::{
    models::{
        auth::Identity,
        profile::Role,
        provider::{normalize_tags, Provider, ProviderCategory, ProviderDraft, ProviderFilter, ProviderZone},
    },
    ports::ProviderRepository,
    services::access_control::AccessGate,
};
use crate::error::AppError;

/// Raw listing fields as submitted by a client.
#[derive(Debug, Clone, Default)]
pub struct ProviderInput {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub zone: Option<String>,
    pub phone: Option<String>,
    pub tags: Vec<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DirectoryQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub zone: Option<String>,
    pub tags: Vec<String>,
}

fn clean(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_category(value: Option<String>) -> Result<Option<ProviderCategory>, AppError> {
    clean(value)
        .map(|c| c.parse::<ProviderCategory>().map_err(|e| AppError::Validation(e.to_string())))
        .transpose()
}

fn parse_zone(value: Option<String>) -> Result<Option<ProviderZone>, AppError> {
    clean(value)
        .map(|z| z.parse::<ProviderZone>().map_err(|e| AppError::Validation(e.to_string())))
        .transpose()
}

impl ProviderInput {
    pub fn into_draft(self) -> Result<ProviderDraft, AppError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Name is required".into()));
        }

        Ok(ProviderDraft {
            name,
            description: clean(self.description),
            category: parse_category(self.category)?,
            zone: parse_zone(self.zone)?,
            phone: clean(self.phone),
            tags: normalize_tags(self.tags),
            website: clean(self.website),
            facebook: clean(self.facebook),
            instagram: clean(self.instagram),
            address: clean(self.address),
        })
    }
}

impl DirectoryQuery {
    fn into_filter(self) -> Result<ProviderFilter, AppError> {
        Ok(ProviderFilter {
            active_only: false,
            created_by: None,
            query: clean(self.q),
            category: parse_category(self.category)?,
            zone: parse_zone(self.zone)?,
            tags: normalize_tags(self.tags),
        })
    }
}

pub struct ProviderService {
    repo: Arc<dyn ProviderRepository>,
    gate: Arc<AccessGate>,
}

impl ProviderService {
    pub fn new(repo: Arc<dyn ProviderRepository>, gate: Arc<AccessGate>) -> Self {
        Self { repo, gate }
    }

    pub async fn create_as_admin(&self, caller: &Identity, input: ProviderInput) -> Result<Provider, AppError> {
        self.gate.require(caller, &[Role::Admin]).await?;
        self.create(caller, input).await
    }

    pub async fn create_as_member(&self, caller: &Identity, input: ProviderInput) -> Result<Provider, AppError> {
        self.gate.require(caller, &[Role::ApprovedMember]).await?;
        self.create(caller, input).await
    }

    async fn create(&self, caller: &Identity, input: ProviderInput) -> Result<Provider, AppError> {
        let provider = Provider::new(input.into_draft()?, caller.account_id.clone());
        let created = self.repo.create(&provider).await?;
        info!(provider_id = %created.id, created_by = %caller.account_id, "Provider created (inactive)");
        Ok(created)
    }

    pub async fn update(&self, caller: &Identity, id: &str, input: ProviderInput) -> Result<Provider, AppError> {
        self.gate.require(caller, &[Role::Admin]).await?;
        let draft = input.into_draft()?;

        let mut provider = self.repo.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound("Provider not found".into()))?;
        provider.apply(draft);

        let updated = self.repo.update(&provider).await?;
        info!(provider_id = %id, "Provider updated");
        Ok(updated)
    }

    pub async fn set_active(&self, caller: &Identity, id: &str, active: bool) -> Result<Provider, AppError> {
        self.gate.require(caller, &[Role::Admin]).await?;

        let updated = self.repo.set_active(id, active).await?
            .ok_or_else(|| AppError::NotFound("Provider not found".into()))?;
        info!(provider_id = %id, active, "Provider activation changed");
        Ok(updated)
    }

    pub async fn list_admin(&self, caller: &Identity) -> Result<Vec<Provider>, AppError> {
        self.gate.require(caller, &[Role::Admin]).await?;
        self.repo.list(&ProviderFilter::default()).await
    }

    pub async fn list_mine(&self, caller: &Identity, query: DirectoryQuery) -> Result<Vec<Provider>, AppError> {
        self.gate.require(caller, &[Role::ApprovedMember]).await?;
        let mut filter = query.into_filter()?;
        filter.created_by = Some(caller.account_id.clone());
        self.search(filter).await
    }

    pub async fn list_public(&self, query: DirectoryQuery) -> Result<Vec<Provider>, AppError> {
        let mut filter = query.into_filter()?;
        filter.active_only = true;
        self.search(filter).await
    }

    async fn search(&self, filter: ProviderFilter) -> Result<Vec<Provider>, AppError> {
        let providers = self.repo.list(&filter).await?;
        Ok(providers.into_iter().filter(|p| filter.admits(p)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_requires_a_name() {
        let input = ProviderInput { name: "   ".into(), ..Default::default() };
        assert!(matches!(input.into_draft(), Err(AppError::Validation(_))));
    }

    #[test]
    fn input_rejects_unknown_zone() {
        let input = ProviderInput {
            name: "Taller".into(),
            zone: Some("Tepic".into()),
            ..Default::default()
        };
        assert!(matches!(input.into_draft(), Err(AppError::Validation(_))));
    }

    #[test]
    fn input_is_cleaned() {
        let input = ProviderInput {
            name: " Taller Mecánico ".into(),
            description: Some("  ".into()),
            category: Some("oficios".into()),
            tags: vec!["Frenos".into(), " frenos ".into()],
            ..Default::default()
        };
        let draft = input.into_draft().unwrap();
        assert_eq!(draft.name, "Taller Mecánico");
        assert!(draft.description.is_none());
        assert_eq!(draft.category, Some(ProviderCategory::Trades));
        assert_eq!(draft.tags, vec!["frenos"]);
    }
}
