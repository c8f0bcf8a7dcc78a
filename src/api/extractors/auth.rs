use axum::{
    extract::{FromRequestParts, FromRef},
    http::{request::Parts, Method},
};
use crate::state::AppState;
use crate::domain::models::auth::Identity;
use crate::error::AppError;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::Span;

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// A caller with a valid access token. State-changing requests must also
/// echo the token's CSRF value in `X-CSRF-Token`.
pub struct AuthUser(pub Identity);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = parts.extensions.get::<Cookies>()
            .ok_or(AppError::Internal)?;

        let access_token = cookies.get(ACCESS_COOKIE)
            .ok_or(AppError::Unauthorized)?
            .value()
            .to_string();

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let claims = app_state.auth_service.verify_access_token(&access_token)?;

        let method = &parts.method;
        if *method != Method::GET && *method != Method::HEAD && *method != Method::OPTIONS {
            let csrf_header_val = parts.headers.get(CSRF_HEADER)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| AppError::Forbidden("Missing CSRF token".into()))?;

            if csrf_header_val != claims.csrf {
                return Err(AppError::Forbidden("CSRF token mismatch".into()));
            }
        }

        Span::current().record("account_id", claims.sub.as_str());

        Ok(AuthUser(Identity {
            account_id: claims.sub,
            email: claims.email,
        }))
    }
}
