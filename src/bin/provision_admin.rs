//! Creates (or promotes) an administrator account.
//!
//! Usage: `provision_admin <email> <password> [display name]`, or set
//! `ADMIN_EMAIL` / `ADMIN_PASSWORD` / `ADMIN_NAME`. Needs `DATABASE_URL`.

use colored::*;
use directory_backend::{
    domain::{
        models::{account::Account, profile::{Profile, Role}},
        services::auth_service::AuthService,
    },
    error::AppError,
    infra::factory::connect_repositories,
};
use std::env;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let mut args = env::args().skip(1);
    let email = args.next().or_else(|| env::var("ADMIN_EMAIL").ok());
    let password = args.next().or_else(|| env::var("ADMIN_PASSWORD").ok());
    let display_name = args.next().or_else(|| env::var("ADMIN_NAME").ok());

    let (Some(email), Some(password)) = (email, password) else {
        eprintln!("{}", "Usage: provision_admin <email> <password> [display name]".red().bold());
        return ExitCode::FAILURE;
    };

    let Ok(database_url) = env::var("DATABASE_URL") else {
        eprintln!("{}", "DATABASE_URL must be set".red().bold());
        return ExitCode::FAILURE;
    };

    match provision(&database_url, &email, &password, display_name).await {
        Ok(profile) => {
            println!("{} {} ({})", "Administrator ready:".green().bold(), profile.email, profile.account_id);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}", "Provisioning failed:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn provision(database_url: &str, email: &str, password: &str, display_name: Option<String>) -> Result<Profile, AppError> {
    let repos = connect_repositories(database_url).await;
    let email = email.trim().to_lowercase();

    let account = match repos.accounts.find_by_email(&email).await? {
        Some(existing) => {
            println!("{}", "Account exists, promoting to admin".yellow());
            existing
        }
        None => {
            AuthService::check_password_strength(password)?;
            let hash = AuthService::hash_password(password)?;
            let account = Account::new_confirmed(email.clone(), hash, display_name.clone());
            repos.accounts.create(&account).await?
        }
    };

    let display_name = display_name.or_else(|| account.display_name.clone());
    let profile = Profile::new(account.id.clone(), account.email.clone(), display_name, Role::Admin);
    repos.profiles.upsert(&profile).await
}
