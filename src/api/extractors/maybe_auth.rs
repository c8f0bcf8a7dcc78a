use axum::{
    extract::{FromRequestParts, FromRef},
    http::request::Parts,
};
use crate::state::AppState;
use crate::domain::models::auth::Identity;
use crate::api::extractors::auth::ACCESS_COOKIE;
use std::convert::Infallible;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::debug;

/// Like `AuthUser`, but a missing or invalid token means "anonymous".
pub struct MaybeAuthUser(pub Option<Identity>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(cookies) = parts.extensions.get::<Cookies>() else {
            return Ok(MaybeAuthUser(None));
        };

        let Some(access_token) = cookies.get(ACCESS_COOKIE).map(|c| c.value().to_string()) else {
            return Ok(MaybeAuthUser(None));
        };

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        match app_state.auth_service.verify_access_token(&access_token) {
            Ok(claims) => Ok(MaybeAuthUser(Some(Identity {
                account_id: claims.sub,
                email: claims.email,
            }))),
            Err(_) => {
                debug!("MaybeAuth: access token rejected, treating caller as anonymous");
                Ok(MaybeAuthUser(None))
            }
        }
    }
}
