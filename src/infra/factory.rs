use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::services::defaults::default_templates;
use crate::state::{AppState, Repositories};
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::repositories::{
    postgres_access_request_repo::PostgresAccessRequestRepo, postgres_account_repo::PostgresAccountRepo,
    postgres_auth_repo::PostgresAuthRepo, postgres_profile_repo::PostgresProfileRepo,
    postgres_provider_repo::PostgresProviderRepo,
    sqlite_access_request_repo::SqliteAccessRequestRepo, sqlite_account_repo::SqliteAccountRepo,
    sqlite_auth_repo::SqliteAuthRepo, sqlite_profile_repo::SqliteProfileRepo,
    sqlite_provider_repo::SqliteProviderRepo,
};

pub fn is_postgres_url(database_url: &str) -> bool {
    database_url.starts_with("postgres://") || database_url.starts_with("postgresql://")
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
        config.mail_from_alias.clone(),
    ));

    let templates = Arc::new(default_templates().expect("Failed to load mail templates"));
    let repos = connect_repositories(&config.database_url).await;

    AppState::assemble(config.clone(), repos, email_service, templates)
}

/// Opens the configured database, runs its migrations and wires the adapters.
pub async fn connect_repositories(database_url: &str) -> Repositories {
    if is_postgres_url(database_url) {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;
        postgres_repositories(pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;
        sqlite_repositories(pool)
    }
}

pub fn sqlite_repositories(pool: SqlitePool) -> Repositories {
    Repositories {
        access_requests: Arc::new(SqliteAccessRequestRepo::new(pool.clone())),
        accounts: Arc::new(SqliteAccountRepo::new(pool.clone())),
        profiles: Arc::new(SqliteProfileRepo::new(pool.clone())),
        providers: Arc::new(SqliteProviderRepo::new(pool.clone())),
        auth: Arc::new(SqliteAuthRepo::new(pool)),
    }
}

pub fn postgres_repositories(pool: PgPool) -> Repositories {
    Repositories {
        access_requests: Arc::new(PostgresAccessRequestRepo::new(pool.clone())),
        accounts: Arc::new(PostgresAccountRepo::new(pool.clone())),
        profiles: Arc::new(PostgresProfileRepo::new(pool.clone())),
        providers: Arc::new(PostgresProviderRepo::new(pool.clone())),
        auth: Arc::new(PostgresAuthRepo::new(pool)),
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
