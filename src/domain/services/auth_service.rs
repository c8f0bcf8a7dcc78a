use std::sync::Arc;
use crate::domain::{
    models::{
        account::Account,
        auth::{Claims, IssuedSession, RefreshTokenRecord, ACCESS_TOKEN_AUDIENCE},
    },
    ports::{AccountRepository, AuthRepository},
};
use crate::error::AppError;
use crate::config::Config;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;
use chrono::{Utc, Duration};
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use sha2::{Sha256, Digest};
use tracing::{debug, error, info, warn};

pub const MIN_PASSWORD_LEN: usize = 8;
const REFRESH_TOKEN_DAYS: i64 = 7;

pub struct AuthService {
    repo: Arc<dyn AuthRepository>,
    accounts: Arc<dyn AccountRepository>,
    config: Config,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(repo: Arc<dyn AuthRepository>, accounts: Arc<dyn AccountRepository>, config: Config) -> Self {
        let encoding_key = EncodingKey::from_ed_pem(config.jwt_secret_key.as_bytes())
            .expect("Invalid JWT Private Key PEM");
        let decoding_key = DecodingKey::from_ed_pem(config.jwt_public_key.as_bytes())
            .expect("Invalid JWT Public Key PEM");

        Self { repo, accounts, config, encoding_key, decoding_key }
    }

    pub fn check_password_strength(password: &str) -> Result<(), AppError> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters", MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }

    pub fn hash_password(password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::InternalWithMsg(format!("password hashing failed: {}", e)))
    }

    /// Creates a pre-confirmed account. An existing e-mail maps to `Conflict`.
    pub async fn provision_account(&self, email: &str, password: &str, display_name: Option<String>) -> Result<Account, AppError> {
        Self::check_password_strength(password)?;
        let password_hash = Self::hash_password(password)?;
        let account = Account::new_confirmed(email.to_string(), password_hash, display_name);

        match self.accounts.create(&account).await {
            Ok(created) => {
                info!(account_id = %created.id, "Account provisioned");
                Ok(created)
            }
            Err(e) if e.is_unique_violation() => {
                Err(AppError::Conflict("An account with this e-mail already exists".into()))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<Account, AppError> {
        let account = self.accounts.find_by_email(&email.trim().to_lowercase()).await?
            .ok_or(AppError::Unauthorized)?;

        let parsed_hash = PasswordHash::new(&account.password_hash)
            .map_err(|_| AppError::Internal)?;

        Argon2::default().verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AppError::Unauthorized)?;

        Ok(account)
    }

    pub async fn login(&self, account: &Account) -> Result<IssuedSession, AppError> {
        let purged = self.repo.purge_expired(&account.id, Utc::now()).await?;
        if purged > 0 {
            debug!(account_id = %account.id, purged, "Expired refresh tokens purged");
        }

        let family_id = Uuid::new_v4();
        self.issue_token_pair(account, family_id, 1).await
    }

    /// Rotates a refresh token. Presenting a link that was already rotated
    /// means the chain leaked, so the whole family is revoked.
    pub async fn refresh(&self, raw_refresh_token: &str) -> Result<(Account, IssuedSession), AppError> {
        let token_hash = self.hash_token(raw_refresh_token);
        let now = Utc::now();

        let record = self.repo.find_refresh_token(&token_hash).await?
            .ok_or(AppError::Unauthorized)?;

        if record.rotated_at.is_some() || !self.repo.mark_rotated(&token_hash, now).await? {
            let revoked = self.repo.delete_refresh_family(record.family_id).await?;
            warn!(
                account_id = %record.account_id,
                family_id = %record.family_id,
                generation = record.generation_id,
                revoked,
                "Refresh token replayed; login family revoked"
            );
            return Err(AppError::Unauthorized);
        }

        if record.is_expired(now) {
            return Err(AppError::Unauthorized);
        }

        let account = self.accounts.find_by_id(&record.account_id).await?
            .ok_or(AppError::Unauthorized)?;

        let session = self.issue_token_pair(&account, record.family_id, record.generation_id + 1).await?;
        debug!(account_id = %account.id, generation = record.generation_id + 1, "Refresh token rotated");
        Ok((account, session))
    }

    /// Revokes every token rotated from the same login.
    pub async fn logout(&self, raw_refresh_token: &str) -> Result<(), AppError> {
        let token_hash = self.hash_token(raw_refresh_token);
        if let Some(record) = self.repo.find_refresh_token(&token_hash).await? {
            self.repo.delete_refresh_family(record.family_id).await?;
        }
        Ok(())
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[ACCESS_TOKEN_AUDIENCE]);
        validation.set_issuer(&[self.config.auth_issuer.as_str()]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }

    async fn issue_token_pair(&self, account: &Account, family_id: Uuid, generation_id: i32) -> Result<IssuedSession, AppError> {
        let csrf_token: String = rand::thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect();
        let now = Utc::now();
        let exp = (now + Duration::minutes(15)).timestamp() as usize;

        let claims = Claims {
            iss: self.config.auth_issuer.clone(),
            sub: account.id.clone(),
            aud: ACCESS_TOKEN_AUDIENCE.to_string(),
            exp,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            email: account.email.clone(),
            csrf: csrf_token.clone(),
        };

        let access_token = encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key)
            .map_err(|e| {
                error!("JWT encoding failed: {}", e);
                AppError::Internal
            })?;

        let refresh_token: String = rand::thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect();
        let refresh_token_hash = self.hash_token(&refresh_token);

        let refresh_record = RefreshTokenRecord::new(
            refresh_token_hash,
            account.id.clone(),
            family_id,
            generation_id,
            Duration::days(REFRESH_TOKEN_DAYS),
        );

        self.repo.create_refresh_token(&refresh_record).await?;
        Ok(IssuedSession { access_token, refresh_token, csrf_token })
    }

    pub fn hash_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}
