use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::{
    auth::cookies::{CookieSource, ADMIN_COOKIE},
    errors::AppError,
};

/// Extractor guarding admin-only handlers.
/// Returns 401 unless the request carries `adminToken=authenticated`.
/// Usage: Add `_admin: AdminSession` as a parameter to your handler function.
#[derive(Debug)]
pub struct AdminSession;

impl FromRequest for AdminSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        if req.is_authenticated(ADMIN_COOKIE) {
            ready(Ok(AdminSession))
        } else {
            tracing::warn!(path = %req.path(), "Admin cookie missing or invalid");
            ready(Err(AppError::Unauthorized("Unauthorized".into()).into()))
        }
    }
}
