use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{AccessRequestListQuery, RejectRequest, SubmitAccessRequest};
use crate::domain::models::access_request::RequestStatus;
use std::sync::Arc;
use crate::error::AppError;
use validator::Validate;

pub async fn submit_request(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SubmitAccessRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let created = state.access_request_service
        .submit(payload.name, payload.email, payload.phone, payload.message)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_requests(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Query(query): Query<AccessRequestListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let status = query.status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<RequestStatus>())
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let requests = state.access_request_service.list(&caller, status).await?;
    Ok(Json(requests))
}

pub async fn approve_request(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(request_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.access_request_service.approve(&caller, &request_id).await?;
    Ok(Json(outcome))
}

pub async fn reject_request(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    Path(request_id): Path<String>,
    Json(payload): Json<RejectRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.access_request_service
        .reject(&caller, &request_id, &payload.reason)
        .await?;
    Ok(Json(updated))
}
