use crate::domain::{
    models::provider::{Provider, ProviderFilter},
    ports::ProviderRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteProviderRepo {
    pool: SqlitePool,
}

impl SqliteProviderRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProviderRepository for SqliteProviderRepo {
    async fn create(&self, provider: &Provider) -> Result<Provider, AppError> {
        sqlx::query_as::<_, Provider>(
            "INSERT INTO providers (id, name, description, category, zone, phone, tags, website, facebook, instagram, address, is_active, created_by, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
        sqlx::query_as::<_, Provider>("SELECT * FROM providers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, provider: &Provider) -> Result<Provider, AppError> {
        sqlx::query_as::<_, Provider>(
            "UPDATE providers SET name = ?, description = ?, category = ?, zone = ?, phone = ?, tags = ?,
                website = ?, facebook = ?, instagram = ?, address = ?, updated_at = ?
             WHERE id = ?
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
            "UPDATE providers SET is_active = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
            .bind(active)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &ProviderFilter) -> Result<Vec<Provider>, AppError> {
        let category = filter.category.map(|c| c.label());
        let zone = filter.zone.map(|z| z.label());

        sqlx::query_as::<_, Provider>(
            "SELECT * FROM providers
             WHERE (? = 0 OR is_active = 1)
               AND (? IS NULL OR created_by = ?)
               AND (? IS NULL OR category = ?)
               AND (? IS NULL OR zone = ?)
             ORDER BY updated_at DESC, id",
        )
            .bind(filter.active_only)
            .bind(&filter.created_by)
            .bind(&filter.created_by)
            .bind(category)
            .bind(category)
            .bind(zone)
            .bind(zone)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
