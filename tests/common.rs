use directory_backend::{
    api::router::create_router,
    config::Config,
    domain::{
        models::profile::{Profile, Role},
        ports::EmailService,
        services::defaults::default_templates,
    },
    error::AppError,
    infra::factory::sqlite_repositories,
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use tower::ServiceExt;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct SentMail {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
}

/// Records every message; can be switched to fail like an unreachable relay.
#[derive(Default)]
pub struct MockEmailService {
    pub sent: Mutex<Vec<SentMail>>,
    pub fail: AtomicBool,
}

#[allow(dead_code)]
impl MockEmailService {
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<SentMail> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Delivery("relay unreachable".into()));
        }
        self.sent.lock().unwrap().push(SentMail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AuthHeaders {
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
}

/// Pulls the 64-hex invite token out of a redemption link or mail body.
#[allow(dead_code)]
pub fn extract_token(text: &str) -> String {
    let start = text.find("token=").expect("no token in text") + "token=".len();
    let token: String = text[start..].chars().take_while(|c| c.is_ascii_hexdigit()).collect();
    assert_eq!(token.len(), 64, "invite token should be 64 hex chars");
    token
}

#[allow(dead_code)]
pub fn cookie_value(set_cookies: &[String], name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    set_cookies.iter()
        .find(|c| c.starts_with(&prefix))
        .map(|c| {
            let rest = &c[prefix.len()..];
            rest.split(';').next().unwrap_or_default().to_string()
        })
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub mailer: Arc<MockEmailService>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            public_base_url: "http://localhost:5173".to_string(),
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            mail_from_alias: "default".to_string(),
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            invite_ttl_days: 7,
        };

        let mailer = Arc::new(MockEmailService::default());
        let templates = Arc::new(default_templates().expect("templates"));

        let state = Arc::new(AppState::assemble(
            config,
            sqlite_repositories(pool.clone()),
            mailer.clone(),
            templates,
        ));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            mailer,
        }
    }

    /// Sends one request through the router. Returns status and JSON body
    /// (`Value::Null` when the body is empty).
    pub async fn call(&self, method: &str, uri: &str, body: Option<Value>, auth: Option<&AuthHeaders>) -> (StatusCode, Value) {
        let (status, _, json) = self.call_raw(method, uri, body, auth).await;
        (status, json)
    }

    pub async fn call_raw(&self, method: &str, uri: &str, body: Option<Value>, auth: Option<&AuthHeaders>) -> (StatusCode, Vec<String>, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(auth) = auth {
            builder = builder
                .header(header::COOKIE, format!("access_token={}; refresh_token={}", auth.access_token, auth.refresh_token))
                .header("X-CSRF-Token", &auth.csrf_token);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let cookies: Vec<String> = response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .collect();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
        };

        (status, cookies, json)
    }

    /// Creates a confirmed account, with a profile when `role` is given.
    pub async fn provision(&self, email: &str, password: &str, role: Option<Role>) -> String {
        let account = self.state.auth_service
            .provision_account(email, password, Some("Test User".into()))
            .await
            .expect("provision account");

        if let Some(role) = role {
            let profile = Profile::new(account.id.clone(), account.email.clone(), account.display_name.clone(), role);
            self.state.repos.profiles.upsert(&profile).await.expect("upsert profile");
        }
        account.id
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthHeaders {
        let payload = serde_json::json!({ "email": email, "password": password });
        let (status, cookies, body) = self.call_raw("POST", "/api/v1/auth/login", Some(payload), None).await;

        if !status.is_success() {
            panic!("Login failed in test helper: status {}", status);
        }

        AuthHeaders {
            access_token: cookie_value(&cookies, "access_token").expect("No access_token cookie returned"),
            refresh_token: cookie_value(&cookies, "refresh_token").expect("No refresh_token cookie returned"),
            csrf_token: body["csrf_token"].as_str().expect("No csrf_token in body").to_string(),
        }
    }

    pub async fn admin(&self) -> AuthHeaders {
        self.provision("admin@example.com", "admin-password", Some(Role::Admin)).await;
        self.login("admin@example.com", "admin-password").await
    }

    pub async fn member(&self, email: &str) -> AuthHeaders {
        self.provision(email, "member-password", Some(Role::ApprovedMember)).await;
        self.login(email, "member-password").await
    }

    pub async fn submit_request(&self, name: &str, email: &str) -> String {
        let payload = serde_json::json!({ "name": name, "email": email, "message": "Quiero unirme" });
        let (status, body) = self.call("POST", "/api/v1/access-requests", Some(payload), None).await;
        assert_eq!(status, StatusCode::CREATED, "submit failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    /// Approves and returns the raw token from the delivered e-mail.
    pub async fn approve(&self, admin: &AuthHeaders, request_id: &str) -> String {
        let uri = format!("/api/v1/admin/access-requests/{}/approve", request_id);
        let (status, body) = self.call("POST", &uri, None, Some(admin)).await;
        assert_eq!(status, StatusCode::OK, "approve failed: {}", body);
        assert_eq!(body["email_sent"], true);
        extract_token(&self.mailer.last().expect("no invite mail").html_body)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
