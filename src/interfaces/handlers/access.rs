use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use tracing::instrument;

use crate::{errors::AppError, AppState};

#[derive(Debug, Deserialize)]
pub struct AuthenticateRequest {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckAuthQuery {
    #[serde(default)]
    pub path: String,
}

#[instrument(skip(state, body), fields(path = %body.path))]
pub async fn authenticate(
    state: web::Data<AppState>,
    body: web::Json<AuthenticateRequest>,
) -> Result<impl Responder, AppError> {
    let grant = state.gate
        .authenticate(&body.path, &body.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Incorrect password".into()))?;

    tracing::info!(cookie = %grant.cookie_name, "Page password accepted");

    Ok(HttpResponse::Ok()
        .cookie(grant.into_cookie(state.cookie_policy))
        .json(serde_json::json!({ "success": true })))
}

#[instrument(skip(state, req, query), fields(path = %query.path))]
pub async fn check_auth(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<CheckAuthQuery>,
) -> Result<impl Responder, AppError> {
    let status = state.gate.check_access(&query.path, &req).await?;

    let response = if status.authenticated {
        HttpResponse::Ok().json(status)
    } else {
        HttpResponse::Unauthorized().json(status)
    };
    Ok(response)
}
