use axum::{extract::State, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{requests::LoginRequest, responses::SessionResponse};
use crate::api::extractors::{
    auth::{ACCESS_COOKIE, REFRESH_COOKIE},
    maybe_auth::MaybeAuthUser,
};
use crate::domain::models::{
    account::Account,
    auth::{AuthResponse, Identity, IssuedSession, SessionUser},
};
use std::sync::Arc;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use time::Duration;
use tracing::info;
use validator::Validate;

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(|_| AppError::Unauthorized)?;

    let account = state.auth_service.verify_credentials(&payload.email, &payload.password).await?;
    let session = state.auth_service.login(&account).await?;

    info!(account_id = %account.id, "Account logged in");
    respond_with_session(&state, &cookies, account, session).await
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let raw_token = cookies.get(REFRESH_COOKIE)
        .ok_or(AppError::Unauthorized)?
        .value()
        .to_string();

    let (account, session) = state.auth_service.refresh(&raw_token).await?;

    info!(account_id = %account.id, "Session refreshed");
    respond_with_session(&state, &cookies, account, session).await
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    if let Some(cookie) = cookies.get(REFRESH_COOKIE) {
        state.auth_service.logout(cookie.value()).await?;
    }

    cookies.remove(Cookie::build((ACCESS_COOKIE, "")).path("/").into());
    cookies.remove(Cookie::build((REFRESH_COOKIE, "")).path("/").into());

    info!("Session closed");
    Ok(StatusCode::OK)
}

pub async fn session(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(identity): MaybeAuthUser,
) -> Result<impl IntoResponse, AppError> {
    let Some(identity) = identity else {
        return Ok(Json(SessionResponse { authenticated: false, user: None }));
    };

    let role = state.access_gate.role_of(&identity).await?;
    Ok(Json(SessionResponse {
        authenticated: true,
        user: Some(SessionUser {
            id: identity.account_id,
            email: identity.email,
            role,
        }),
    }))
}

async fn respond_with_session(
    state: &AppState,
    cookies: &Cookies,
    account: Account,
    session: IssuedSession,
) -> Result<Json<AuthResponse>, AppError> {
    set_cookies(cookies, &session.access_token, &session.refresh_token);

    let role = state.access_gate.role_of(&Identity {
        account_id: account.id.clone(),
        email: account.email.clone(),
    }).await?;

    Ok(Json(AuthResponse {
        csrf_token: session.csrf_token,
        user: SessionUser {
            id: account.id,
            email: account.email,
            role,
        },
    }))
}

fn set_cookies(cookies: &Cookies, access: &str, refresh: &str) {
    let mut access_c = Cookie::new(ACCESS_COOKIE, access.to_string());
    access_c.set_http_only(true);
    access_c.set_secure(true);
    access_c.set_same_site(SameSite::Strict);
    access_c.set_path("/");
    access_c.set_max_age(Duration::minutes(15));
    cookies.add(access_c);

    let mut refresh_c = Cookie::new(REFRESH_COOKIE, refresh.to_string());
    refresh_c.set_http_only(true);
    refresh_c.set_secure(true);
    refresh_c.set_same_site(SameSite::Strict);
    refresh_c.set_path("/");
    refresh_c.set_max_age(Duration::days(7));
    cookies.add(refresh_c);
}
