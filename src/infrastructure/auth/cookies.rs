use actix_web::{
    cookie::{time::Duration, Cookie, SameSite},
    HttpRequest,
};

/// Value every session cookie carries. Its presence is the whole session.
pub const AUTHENTICATED: &str = "authenticated";

/// Global visitor cookie opened by the master password.
pub const GLOBAL_COOKIE: &str = "authToken";

/// Admin panel cookie.
pub const ADMIN_COOKIE: &str = "adminToken";

const PROJECT_COOKIE_PREFIX: &str = "auth_";

pub const VISITOR_SESSION_SECS: i64 = 60 * 60;
pub const ADMIN_SESSION_SECS: i64 = 60 * 60 * 24;

/// Cookie name for a project opened by its custom password.
///
/// Every character outside `[A-Za-z0-9]` becomes `_`. The mapping is lossy, so
/// slugs that differ only in replaced characters share a cookie.
pub fn project_cookie_name(slug: &str) -> String {
    let sanitized: String = slug
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{PROJECT_COOKIE_PREFIX}{sanitized}")
}

/// Read access to request cookies, so the gate can be driven without actix.
pub trait CookieSource {
    fn cookie_value(&self, name: &str) -> Option<String>;

    fn is_authenticated(&self, name: &str) -> bool {
        self.cookie_value(name).as_deref() == Some(AUTHENTICATED)
    }
}

impl CookieSource for HttpRequest {
    fn cookie_value(&self, name: &str) -> Option<String> {
        self.cookie(name).map(|c| c.value().to_string())
    }
}

impl CookieSource for std::collections::HashMap<String, String> {
    fn cookie_value(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// A session to hand back to the client. Validity is fully carried by the
/// cookie itself; nothing is recorded server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGrant {
    pub cookie_name: String,
    pub max_age_secs: i64,
}

impl SessionGrant {
    pub fn visitor(cookie_name: impl Into<String>) -> Self {
        SessionGrant {
            cookie_name: cookie_name.into(),
            max_age_secs: VISITOR_SESSION_SECS,
        }
    }

    pub fn admin() -> Self {
        SessionGrant {
            cookie_name: ADMIN_COOKIE.to_string(),
            max_age_secs: ADMIN_SESSION_SECS,
        }
    }

    pub fn into_cookie(self, policy: CookiePolicy) -> Cookie<'static> {
        session_cookie(self.cookie_name, AUTHENTICATED.to_string(), self.max_age_secs, policy)
    }
}

/// Attributes shared by every cookie the service issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
}

/// An expired, empty cookie that makes the browser drop `name`.
pub fn clearing_cookie(name: &str, policy: CookiePolicy) -> Cookie<'static> {
    session_cookie(name.to_string(), String::new(), 0, policy)
}

fn session_cookie(name: String, value: String, max_age_secs: i64, policy: CookiePolicy) -> Cookie<'static> {
    Cookie::build(name, value)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(policy.secure)
        .max_age(Duration::seconds(max_age_secs))
        .path("/")
        .finish()
}
