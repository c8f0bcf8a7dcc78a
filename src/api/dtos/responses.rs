use serde::Serialize;
use crate::domain::models::{access_request::ValidInvite, auth::SessionUser};

#[derive(Serialize)]
pub struct InviteCheckResponse {
    pub valid: bool,
    #[serde(flatten)]
    pub invite: ValidInvite,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

#[derive(Serialize)]
pub struct CatalogResponse {
    pub categories: Vec<&'static str>,
    pub zones: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
