use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{errors::AppError, use_cases::extractors::AdminSession, AppState};

#[instrument(skip(_admin, state))]
pub async fn migrate_projects(
    _admin: AdminSession,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let report = state.migration_handler.run().await?;

    Ok(HttpResponse::Ok().json(report))
}
