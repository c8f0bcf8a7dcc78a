use std::sync::Arc;
use crate::domain::ports::{
    AccessRequestRepository, AccountRepository, AuthRepository, EmailService,
    ProfileRepository, ProviderRepository,
};
use crate::domain::services::{
    access_control::AccessGate,
    access_request_service::AccessRequestService,
    auth_service::AuthService,
    invite_service::InviteService,
    notification::InviteNotifier,
    provider_service::ProviderService,
};
use crate::config::Config;
use tera::Tera;

/// Storage adapters for one backend.
#[derive(Clone)]
pub struct Repositories {
    pub access_requests: Arc<dyn AccessRequestRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub providers: Arc<dyn ProviderRepository>,
    pub auth: Arc<dyn AuthRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub repos: Repositories,
    pub auth_service: Arc<AuthService>,
    pub access_gate: Arc<AccessGate>,
    pub access_request_service: Arc<AccessRequestService>,
    pub invite_service: Arc<InviteService>,
    pub provider_service: Arc<ProviderService>,
    pub email_service: Arc<dyn EmailService>,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn assemble(
        config: Config,
        repos: Repositories,
        email_service: Arc<dyn EmailService>,
        templates: Arc<Tera>,
    ) -> Self {
        let auth_service = Arc::new(AuthService::new(
            repos.auth.clone(),
            repos.accounts.clone(),
            config.clone(),
        ));
        let access_gate = Arc::new(AccessGate::new(repos.profiles.clone()));
        let notifier = Arc::new(InviteNotifier::new(
            email_service.clone(),
            templates.clone(),
            config.invite_ttl_days,
        ));

        let access_request_service = Arc::new(AccessRequestService::new(
            repos.access_requests.clone(),
            access_gate.clone(),
            notifier,
            config.clone(),
        ));
        let invite_service = Arc::new(InviteService::new(
            repos.access_requests.clone(),
            repos.profiles.clone(),
            auth_service.clone(),
        ));
        let provider_service = Arc::new(ProviderService::new(
            repos.providers.clone(),
            access_gate.clone(),
        ));

        Self {
            config,
            repos,
            auth_service,
            access_gate,
            access_request_service,
            invite_service,
            provider_service,
            email_service,
            templates,
        }
    }
}
