mod common;
use common::{cookie_value, AuthHeaders, TestApp};
use axum::http::StatusCode;
use directory_backend::domain::models::profile::Role;
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let (status, body) = app.call("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = TestApp::new().await;
    app.provision("ana@example.com", "longenough1", Some(Role::ApprovedMember)).await;

    let (status, _) = app.call("POST", "/api/v1/auth/login", Some(json!({ "email": "ana@example.com", "password": "wrong-pass" })), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.call("POST", "/api/v1/auth/login", Some(json!({ "email": "nobody@example.com", "password": "longenough1" })), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_sets_cookies_and_reports_role() {
    let app = TestApp::new().await;
    app.provision("ana@example.com", "longenough1", Some(Role::ApprovedMember)).await;

    let (status, cookies, body) = app.call_raw("POST", "/api/v1/auth/login", Some(json!({ "email": "ANA@example.com", "password": "longenough1" })), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "ana@example.com");
    assert_eq!(body["user"]["role"], "approved-member");
    assert_eq!(body["csrf_token"].as_str().unwrap().len(), 32);

    let access = cookies.iter().find(|c| c.starts_with("access_token=")).unwrap();
    assert!(access.contains("HttpOnly"));
    assert!(access.contains("Secure"));
    assert!(access.contains("SameSite=Strict"));
    assert!(cookies.iter().any(|c| c.starts_with("refresh_token=")));
}

#[tokio::test]
async fn test_session_reports_guest_and_member() {
    let app = TestApp::new().await;

    let (status, body) = app.call("GET", "/api/v1/auth/session", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], false);
    assert!(body.get("user").is_none());

    let garbage = AuthHeaders {
        access_token: "not-a-jwt".into(),
        refresh_token: String::new(),
        csrf_token: String::new(),
    };
    let (_, body) = app.call("GET", "/api/v1/auth/session", None, Some(&garbage)).await;
    assert_eq!(body["authenticated"], false);

    let admin = app.admin().await;
    let (_, body) = app.call("GET", "/api/v1/auth/session", None, Some(&admin)).await;
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["user"]["email"], "admin@example.com");
    assert_eq!(body["user"]["role"], "admin");
}

#[tokio::test]
async fn test_refresh_rotates_token() {
    let app = TestApp::new().await;
    let session = app.member("ana@example.com").await;

    let (status, cookies, body) = app.call_raw("POST", "/api/v1/auth/refresh", None, Some(&session)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["csrf_token"].is_string());
    assert!(cookies.iter().any(|c| c.starts_with("refresh_token=")));

    // the presented refresh token was consumed
    let (status, _) = app.call("POST", "/api/v1/auth/refresh", None, Some(&session)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_replayed_refresh_token_revokes_the_login() {
    let app = TestApp::new().await;
    let stolen = app.member("ana@example.com").await;
    let other_login = app.login("ana@example.com", "member-password").await;

    let (status, cookies, body) = app.call_raw("POST", "/api/v1/auth/refresh", None, Some(&stolen)).await;
    assert_eq!(status, StatusCode::OK);
    let rotated = AuthHeaders {
        access_token: cookie_value(&cookies, "access_token").unwrap(),
        refresh_token: cookie_value(&cookies, "refresh_token").unwrap(),
        csrf_token: body["csrf_token"].as_str().unwrap().to_string(),
    };

    let generations: Vec<i32> = sqlx::query_scalar("SELECT generation_id FROM refresh_tokens ORDER BY generation_id")
        .fetch_all(&app.pool).await.unwrap();
    assert_eq!(generations, vec![1, 1, 2]);

    let (status, _) = app.call("POST", "/api/v1/auth/refresh", None, Some(&stolen)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // the replay took the legitimate successor down with it
    let (status, _) = app.call("POST", "/api/v1/auth/refresh", None, Some(&rotated)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // an unrelated login of the same account survives
    let (status, _) = app.call("POST", "/api/v1/auth/refresh", None, Some(&other_login)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_purges_expired_refresh_tokens() {
    let app = TestApp::new().await;
    let first = app.member("ana@example.com").await;

    sqlx::query("UPDATE refresh_tokens SET expires_at = ?")
        .bind(chrono::Utc::now() - chrono::Duration::days(1))
        .execute(&app.pool).await.unwrap();

    let (status, _) = app.call("POST", "/api/v1/auth/refresh", None, Some(&first)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    app.login("ana@example.com", "member-password").await;
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM refresh_tokens")
        .fetch_one(&app.pool).await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let app = TestApp::new().await;
    let session = app.member("ana@example.com").await;

    let (status, cookies, _) = app.call_raw("POST", "/api/v1/auth/logout", None, Some(&session)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cookies.iter().any(|c| c.starts_with("access_token=")));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM refresh_tokens")
        .fetch_one(&app.pool).await.unwrap();
    assert_eq!(count, 0);

    let (status, _) = app.call("POST", "/api/v1/auth/refresh", None, Some(&session)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
