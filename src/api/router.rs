use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{access_request, auth, catalog, health, invite, profile, provider};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/session", get(auth::session))

        // Public intake & invites
        .route("/api/v1/access-requests", post(access_request::submit_request))
        .route("/api/v1/invites", get(invite::check_invite))
        .route("/api/v1/invites/redeem", post(invite::redeem_invite))

        // Admin review
        .route("/api/v1/admin/access-requests", get(access_request::list_requests))
        .route("/api/v1/admin/access-requests/{id}/approve", post(access_request::approve_request))
        .route("/api/v1/admin/access-requests/{id}/reject", post(access_request::reject_request))
        .route("/api/v1/admin/profiles", get(profile::list_profiles))

        // Directory
        .route("/api/v1/catalog", get(catalog::get_catalog))
        .route("/api/v1/providers", get(provider::list_public))
        .route("/api/v1/admin/providers", get(provider::list_admin).post(provider::create_admin))
        .route("/api/v1/admin/providers/{id}", put(provider::update_provider))
        .route("/api/v1/admin/providers/{id}/active", post(provider::set_active))
        .route("/api/v1/me/providers", get(provider::list_mine).post(provider::create_mine))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        account_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
