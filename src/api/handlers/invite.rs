use axum::{extract::{Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{
    requests::{InviteQuery, RedeemInviteRequest},
    responses::InviteCheckResponse,
};
use std::sync::Arc;
use crate::error::AppError;

pub async fn check_invite(
    State(state): State<Arc<AppState>>,
    Query(query): Query<InviteQuery>,
) -> Result<impl IntoResponse, AppError> {
    let token = query.token.unwrap_or_default();
    let invite = state.invite_service.check(&token).await?;

    Ok(Json(InviteCheckResponse { valid: true, invite }))
}

pub async fn redeem_invite(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RedeemInviteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let redeemed = state.invite_service.redeem(&payload.token, &payload.password).await?;
    Ok((StatusCode::CREATED, Json(redeemed)))
}
