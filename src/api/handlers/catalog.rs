use axum::{response::IntoResponse, Json};
use crate::api::dtos::responses::CatalogResponse;
use crate::domain::models::provider::{ProviderCategory, ProviderZone};

pub async fn get_catalog() -> impl IntoResponse {
    Json(CatalogResponse {
        categories: ProviderCategory::ALL.iter().map(|c| c.label()).collect(),
        zones: ProviderZone::ALL.iter().map(|z| z.label()).collect(),
    })
}
