use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod graceful_shutdown;
pub mod shared_repos;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{auth, db, mail, utils};

use auth::cookies::CookiePolicy;
use mail::smtp::Mailer;
use settings::AppConfig;
use shared_repos::SharedRepositories;
use use_cases::{
    admin::AdminAuthenticator,
    analytics::AnalyticsHandler,
    contact::ContactHandler,
    gate::AccessGate,
    migration::MigrationHandler,
    projects::ProjectHandler,
    settings::SettingsHandler,
};

pub struct AppState {
    pub gate: AccessGate,
    pub admin: AdminAuthenticator,
    pub project_handler: ProjectHandler,
    pub settings_handler: SettingsHandler,
    pub migration_handler: MigrationHandler,
    pub analytics_handler: AnalyticsHandler,
    pub contact_handler: ContactHandler,
    pub cookie_policy: CookiePolicy,
}

impl AppState {
    /// `mailer` is `None` when no mail credentials are configured; the contact
    /// endpoint then answers with a server misconfiguration error.
    pub fn new(
        config: &AppConfig,
        repos: SharedRepositories,
        mailer: Option<Arc<dyn Mailer>>,
    ) -> Self {
        let recipient = config.mail_credentials().map(|creds| creds.recipient);

        AppState {
            gate: AccessGate::new(
                repos.project_repo.clone(),
                repos.settings_repo.clone(),
                config.fallback_master_password(),
            ),
            admin: AdminAuthenticator::new(config.admin_credentials()),
            project_handler: ProjectHandler::new(repos.project_repo.clone()),
            settings_handler: SettingsHandler::new(repos.settings_repo),
            migration_handler: MigrationHandler::new(repos.project_repo, &config.content_dir),
            analytics_handler: AnalyticsHandler::new(repos.analytics_repo),
            contact_handler: ContactHandler::new(mailer, recipient),
            cookie_policy: CookiePolicy { secure: config.is_production() },
        }
    }
}
