use crate::domain::{
    models::provider::{Provider, ProviderFilter},
    ports::ProviderRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresProviderRepo {
    pool: PgPool,
}

impl PostgresProviderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProviderRepository for PostgresProviderRepo {
    async fn create(&self, provider: &Provider) -> Result<Provider, AppError> {
        sqlx::query_as::<_, Provider>(
            "INSERT INTO providers (id, name, description, category, zone, phone, tags, website, facebook, instagram, address, is_active, created_by, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING *",
        )
            .bind(&provider.id)
            .bind(&provider.name)
            .bind(&provider.description)
            .bind(&provider.category)
            .bind(&provider.zone)
            .bind(&provider.phone)
            .bind(&provider.tags)
            .bind(&provider.website)
            .bind(&provider.facebook)
            .bind(&provider.instagram)
            .bind(&provider.address)
            .bind(provider.is_active)
            .bind(&provider.created_by)
            .bind(provider.created_at)
            .bind(provider.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Provider>, AppError> {
        sqlx::query_as::<_, Provider>("SELECT * FROM providers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, provider: &Provider) -> Result<Provider, AppError> {
        sqlx::query_as::<_, Provider>(
            "UPDATE providers SET name = $1, description = $2, category = $3, zone = $4, phone = $5, tags = $6,
                website = $7, facebook = $8, instagram = $9, address = $10, updated_at = $11
             WHERE id = $12
             RETURNING *",
        )
            .bind(&provider.name)
            .bind(&provider.description)
            .bind(&provider.category)
            .bind(&provider.zone)
            .bind(&provider.phone)
            .bind(&provider.tags)
            .bind(&provider.website)
            .bind(&provider.facebook)
            .bind(&provider.instagram)
            .bind(&provider.address)
            .bind(provider.updated_at)
            .bind(&provider.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Provider not found".into()))
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<Option<Provider>, AppError> {
        sqlx::query_as::<_, Provider>(
            "UPDATE providers SET is_active = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
            .bind(active)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &ProviderFilter) -> Result<Vec<Provider>, AppError> {
        sqlx::query_as::<_, Provider>(
            "SELECT * FROM providers
             WHERE (NOT $1 OR is_active)
               AND ($2::text IS NULL OR created_by = $2)
               AND ($3::text IS NULL OR category = $3)
               AND ($4::text IS NULL OR zone = $4)
             ORDER BY updated_at DESC, id",
        )
            .bind(filter.active_only)
            .bind(&filter.created_by)
            .bind(filter.category.map(|c| c.label()))
            .bind(filter.zone.map(|z| z.label()))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
