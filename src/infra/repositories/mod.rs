pub mod sqlite_access_request_repo;
pub mod sqlite_account_repo;
pub mod sqlite_auth_repo;
pub mod sqlite_profile_repo;
pub mod sqlite_provider_repo;

pub mod postgres_access_request_repo;
pub mod postgres_account_repo;
pub mod postgres_auth_repo;
pub mod postgres_profile_repo;
pub mod postgres_provider_repo;
