use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{DirectoryParams, ProviderPayload, SetActiveRequest};
use std::sync::Arc;
use crate::error::AppError;
use validator::Validate;

pub async fn list_public(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DirectoryParams>,
) -> Result<impl IntoResponse, AppError> {
    let providers = state.provider_service.list_public(params.into()).await?;
    Ok(Json(providers))
}

pub async fn list_admin(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let providers = state.provider_service.list_admin(&caller).await?;
    Ok(Json(providers))
}

pub async fn create_admin(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<ProviderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let created = state.provider_service.create_as_admin(&caller, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_provider(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(provider_id): Path<String>,
    Json(payload): Json<ProviderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let updated = state.provider_service.update(&caller, &provider_id, payload.into()).await?;
    Ok(Json(updated))
}

pub async fn set_active(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(provider_id): Path<String>,
    Json(payload): Json<SetActiveRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.provider_service.set_active(&caller, &provider_id, payload.active).await?;
    Ok(Json(updated))
}

pub async fn list_mine(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Query(params): Query<DirectoryParams>,
) -> Result<impl IntoResponse, AppError> {
    let providers = state.provider_service.list_mine(&caller, params.into()).await?;
    Ok(Json(providers))
}

pub async fn create_mine(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<ProviderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let created = state.provider_service.create_as_member(&caller, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
