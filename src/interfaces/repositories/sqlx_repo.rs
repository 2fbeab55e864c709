use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxProjectRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxSettingsRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxAnalyticsRepo {
    pub pool: PgPool,
}
