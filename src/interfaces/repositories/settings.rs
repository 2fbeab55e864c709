use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    entities::setting::SettingKey,
    errors::AppError,
    repositories::sqlx_repo::SqlxSettingsRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get_setting(&self, key: SettingKey) -> Result<Option<String>, AppError>;
    async fn upsert_setting(&self, key: SettingKey, value: &str) -> Result<(), AppError>;
}

impl SqlxSettingsRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxSettingsRepo { pool }
    }
}

#[async_trait]
impl SettingsRepository for SqlxSettingsRepo {
    async fn get_setting(&self, key: SettingKey) -> Result<Option<String>, AppError> {
        let value: Option<String> = sqlx::query_scalar(
            r#"SELECT value FROM admin_settings WHERE key = $1"#
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn upsert_setting(&self, key: SettingKey, value: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO admin_settings (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE SET
                value = EXCLUDED.value,
                updated_at = NOW()
            "#
        )
        .bind(key.as_str())
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
