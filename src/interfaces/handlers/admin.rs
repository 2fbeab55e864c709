use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    auth::cookies::{clearing_cookie, ADMIN_COOKIE},
    errors::AppError,
    use_cases::admin::AdminLoginRequest,
    AppState,
};

#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<AdminLoginRequest>,
) -> Result<impl Responder, AppError> {
    let grant = state.admin.login(&body)?;

    Ok(HttpResponse::Ok()
        .cookie(grant.into_cookie(state.cookie_policy))
        .json(serde_json::json!({ "success": true })))
}

#[instrument(skip(state))]
pub async fn logout(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok()
        .cookie(clearing_cookie(ADMIN_COOKIE, state.cookie_policy))
        .json(serde_json::json!({ "success": true }))
}
