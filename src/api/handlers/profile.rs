use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use std::sync::Arc;
use crate::error::AppError;

pub async fn list_profiles(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let profiles = state.access_gate.list_profiles(&caller).await?;
    Ok(Json(profiles))
}
