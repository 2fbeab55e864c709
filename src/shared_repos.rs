use std::sync::Arc;

use sqlx::PgPool;

use crate::repositories::{
    analytics::AnalyticsRepository,
    project::ProjectRepository,
    settings::SettingsRepository,
    sqlx_repo::{SqlxAnalyticsRepo, SqlxProjectRepo, SqlxSettingsRepo},
};

/// The stores every use case is built from. Tests swap in their own.
#[derive(Clone)]
pub struct SharedRepositories {
    pub project_repo: Arc<dyn ProjectRepository>,
    pub settings_repo: Arc<dyn SettingsRepository>,
    pub analytics_repo: Arc<dyn AnalyticsRepository>,
}

impl SharedRepositories {
    pub fn postgres(pool: PgPool) -> Self {
        SharedRepositories {
            project_repo: Arc::new(SqlxProjectRepo::new(pool.clone())),
            settings_repo: Arc::new(SqlxSettingsRepo::new(pool.clone())),
            analytics_repo: Arc::new(SqlxAnalyticsRepo::new(pool)),
        }
    }
}
