//! Per-project access control.
//!
//! Everything outside `/work/<slug>` is public. A protected project is opened
//! either by the site-wide master password (global `authToken` cookie) or by its
//! own custom password (`auth_<sanitized slug>` cookie). Sessions are the
//! cookies themselves: no server-side record exists, and changing a project's
//! protection does not revoke cookies already issued.

use std::sync::Arc;

use serde::Serialize;
use zeroize::Zeroizing;

use crate::{
    auth::{
        cookies::{project_cookie_name, CookieSource, SessionGrant, GLOBAL_COOKIE},
        password::stored_password_matches,
    },
    entities::{project::PasswordType, setting::SettingKey},
    errors::AppError,
    repositories::{project::ProjectRepository, settings::SettingsRepository},
};

const WORK_PREFIX: &str = "/work/";

/// Slug of a project-detail path: everything after the first `/work/`.
pub fn project_slug(path: &str) -> Option<&str> {
    path.strip_prefix(WORK_PREFIX).filter(|slug| !slug.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_password: Option<bool>,
}

impl AccessStatus {
    pub fn granted() -> Self {
        AccessStatus { authenticated: true, requires_password: None }
    }

    pub fn password_required() -> Self {
        AccessStatus { authenticated: false, requires_password: Some(true) }
    }
}

pub struct AccessGate {
    pub project_repo: Arc<dyn ProjectRepository>,
    pub settings_repo: Arc<dyn SettingsRepository>,
    fallback_master_password: Option<Zeroizing<String>>,
}

impl AccessGate {
    pub fn new(
        project_repo: Arc<dyn ProjectRepository>,
        settings_repo: Arc<dyn SettingsRepository>,
        fallback_master_password: Option<Zeroizing<String>>,
    ) -> Self {
        AccessGate {
            project_repo,
            settings_repo,
            fallback_master_password,
        }
    }

    /// Decides whether the cookies open `path`. Read-only.
    pub async fn check_access<C>(&self, path: &str, cookies: &C) -> Result<AccessStatus, AppError>
    where
        C: CookieSource + ?Sized,
    {
        let Some(slug) = project_slug(path) else {
            return Ok(AccessStatus::granted());
        };

        let access = match self.project_repo.get_project_access(slug).await? {
            Some(access) if access.is_protected => access,
            _ => return Ok(AccessStatus::granted()),
        };

        let cookie_name = match access.password_type {
            PasswordType::Master => GLOBAL_COOKIE.to_string(),
            PasswordType::Custom => project_cookie_name(slug),
        };

        if cookies.is_authenticated(&cookie_name) {
            Ok(AccessStatus::granted())
        } else {
            Ok(AccessStatus::password_required())
        }
    }

    /// Checks a submitted password for `path`.
    ///
    /// Returns the session to issue on success and `None` on any failure,
    /// without saying why.
    pub async fn authenticate(&self, path: &str, password: &str) -> Result<Option<SessionGrant>, AppError> {
        if let Some(slug) = project_slug(path) {
            if let Some(access) = self.project_repo.get_project_access(slug).await? {
                return match access.password_type {
                    PasswordType::Custom => {
                        let matches = access.custom_password
                            .as_deref()
                            .is_some_and(|stored| stored_password_matches(password, stored));
                        Ok(matches.then(|| SessionGrant::visitor(project_cookie_name(slug))))
                    }
                    PasswordType::Master => self.authenticate_master(password).await,
                };
            }
        }

        // Paths outside /work/ and unknown slugs fall back to the whole-site gate
        self.authenticate_master(password).await
    }

    async fn authenticate_master(&self, password: &str) -> Result<Option<SessionGrant>, AppError> {
        let Some(master) = self.effective_master_password().await? else {
            tracing::warn!("No master password is configured; rejecting page password");
            return Ok(None);
        };

        let matches = password == master.as_str();
        Ok(matches.then(|| SessionGrant::visitor(GLOBAL_COOKIE)))
    }

    /// The stored `master_password` setting, else the configured fallback.
    async fn effective_master_password(&self) -> Result<Option<Zeroizing<String>>, AppError> {
        let stored = self.settings_repo
            .get_setting(SettingKey::MasterPassword)
            .await?
            .filter(|value| !value.is_empty());

        Ok(stored.map(Zeroizing::new).or_else(|| self.fallback_master_password.clone()))
    }
}
