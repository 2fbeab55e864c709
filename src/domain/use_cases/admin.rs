use serde::{Deserialize, Serialize};

use crate::{
    auth::cookies::SessionGrant,
    errors::AppError,
    settings::AdminCredentials,
};

#[derive(Debug, Deserialize, Serialize)]
pub struct AdminLoginRequest {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

/// Checks the single shared admin credential. No user table, no lockout.
pub struct AdminAuthenticator {
    credentials: Option<AdminCredentials>,
}

impl AdminAuthenticator {
    pub fn new(credentials: Option<AdminCredentials>) -> Self {
        AdminAuthenticator { credentials }
    }

    pub fn login(&self, request: &AdminLoginRequest) -> Result<SessionGrant, AppError> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            tracing::error!("Admin login attempted without configured credentials");
            AppError::ServerMisconfiguration("Server misconfiguration".into())
        })?;

        let valid = request.username == credentials.username.as_str()
            && request.password == credentials.password.as_str();

        if !valid {
            tracing::warn!("Rejected admin login");
            return Err(AppError::Unauthorized("Invalid credentials".into()));
        }

        tracing::info!("Admin logged in");
        Ok(SessionGrant::admin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::cookies::ADMIN_COOKIE;
    use zeroize::Zeroizing;

    fn authenticator() -> AdminAuthenticator {
        AdminAuthenticator::new(Some(AdminCredentials {
            username: Zeroizing::new("admin".into()),
            password: Zeroizing::new("hunter2".into()),
        }))
    }

    fn request(username: &str, password: &str) -> AdminLoginRequest {
        AdminLoginRequest {
            username: username.into(),
            password: password.into(),
        }
    }

    #[test]
    fn exact_match_issues_admin_session() {
        let grant = authenticator().login(&request("admin", "hunter2")).unwrap();
        assert_eq!(grant.cookie_name, ADMIN_COOKIE);
        assert_eq!(grant.max_age_secs, 60 * 60 * 24);
    }

    #[test]
    fn either_field_wrong_is_the_same_error() {
        let wrong_user = authenticator().login(&request("root", "hunter2")).unwrap_err();
        let wrong_pass = authenticator().login(&request("admin", "hunter3")).unwrap_err();
        assert_eq!(wrong_user.to_string(), "Invalid credentials");
        assert_eq!(wrong_pass.to_string(), wrong_user.to_string());
    }

    #[test]
    fn missing_configuration_is_a_server_error() {
        let err = AdminAuthenticator::new(None).login(&request("admin", "hunter2")).unwrap_err();
        assert!(matches!(err, AppError::ServerMisconfiguration(_)));
    }
}
