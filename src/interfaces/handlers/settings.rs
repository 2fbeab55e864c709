use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::setting::UpdateSettingRequest,
    errors::AppError,
    use_cases::extractors::AdminSession,
    AppState,
};

#[instrument(skip(_admin, state, data), fields(key = %data.key))]
pub async fn update_setting(
    _admin: AdminSession,
    state: web::Data<AppState>,
    data: web::Json<UpdateSettingRequest>,
) -> Result<impl Responder, AppError> {
    state.settings_handler
        .update_setting(data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}
