use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    entities::analytics::{PageViewInsert, PageViewRecord, VisitorDimensions, VisitorInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxAnalyticsRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Inserts a first-time visitor or bumps `last_visit` and `total_visits`.
    async fn upsert_visitor(&self, visitor: &VisitorInsert) -> Result<(), AppError>;
    async fn insert_page_view(&self, page_view: &PageViewInsert) -> Result<(), AppError>;
    /// Sets the duration on the newest page view for the visitor and path.
    /// Returns whether a row matched.
    async fn update_latest_duration(
        &self,
        visitor_id: &str,
        page_path: &str,
        duration: Option<i32>,
    ) -> Result<bool, AppError>;
    async fn list_visitor_dimensions(&self) -> Result<Vec<VisitorDimensions>, AppError>;
    async fn list_page_views(&self) -> Result<Vec<PageViewRecord>, AppError>;
}

impl SqlxAnalyticsRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxAnalyticsRepo { pool }
    }
}

#[async_trait]
impl AnalyticsRepository for SqlxAnalyticsRepo {
    async fn upsert_visitor(&self, visitor: &VisitorInsert) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO visitors (
                visitor_id, country, city, device_type, browser, os, referrer
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (visitor_id) DO UPDATE SET
                last_visit = NOW(),
                total_visits = visitors.total_visits + 1
            "#
        )
        .bind(&visitor.visitor_id)
        .bind(&visitor.country)
        .bind(&visitor.city)
        .bind(&visitor.device_type)
        .bind(&visitor.browser)
        .bind(&visitor.os)
        .bind(&visitor.referrer)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_page_view(&self, page_view: &PageViewInsert) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO page_views (visitor_id, page_path, page_title)
            VALUES ($1, $2, $3)
            "#
        )
        .bind(&page_view.visitor_id)
        .bind(&page_view.page_path)
        .bind(&page_view.page_title)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_latest_duration(
        &self,
        visitor_id: &str,
        page_path: &str,
        duration: Option<i32>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE page_views SET duration = $3
            WHERE id = (
                SELECT id FROM page_views
                WHERE visitor_id = $1 AND page_path = $2
                ORDER BY created_at DESC
                LIMIT 1
            )
            "#
        )
        .bind(visitor_id)
        .bind(page_path)
        .bind(duration)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_visitor_dimensions(&self) -> Result<Vec<VisitorDimensions>, AppError> {
        let rows = sqlx::query_as::<_, VisitorDimensions>(
            r#"SELECT country, device_type, browser FROM visitors"#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_page_views(&self) -> Result<Vec<PageViewRecord>, AppError> {
        let rows = sqlx::query_as::<_, PageViewRecord>(
            r#"SELECT page_path, page_title, created_at FROM page_views ORDER BY created_at"#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
