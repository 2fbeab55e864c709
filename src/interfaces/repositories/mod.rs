pub mod analytics;
pub mod project;
pub mod settings;
pub mod sqlx_repo;
