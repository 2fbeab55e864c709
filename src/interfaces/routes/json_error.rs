use actix_web::{error::JsonPayloadError, web};

use crate::errors::AppError;

/// Malformed or oversized JSON bodies answer with the regular error shape.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::from(err).into()
    }));
}

impl From<JsonPayloadError> for AppError {
    fn from(err: JsonPayloadError) -> Self {
        AppError::InvalidRequest(format!("Invalid request body: {err}"))
    }
}
