use actix_web::{http::header::HeaderMap, web, HttpRequest, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::analytics::{GeoLocation, TrackDurationRequest, TrackPageViewRequest},
    errors::AppError,
    use_cases::extractors::AdminSession,
    AppState,
};

const COUNTRY_HEADER: &str = "x-vercel-ip-country";
const CITY_HEADER: &str = "x-vercel-ip-city";

/// Geo headers set by the edge proxy, "Unknown" when absent.
fn geo_from_headers(headers: &HeaderMap) -> GeoLocation {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let fallback = GeoLocation::default();
    GeoLocation {
        country: header(COUNTRY_HEADER).unwrap_or(fallback.country),
        city: header(CITY_HEADER).unwrap_or(fallback.city),
    }
}

#[instrument(skip(req, state, data))]
pub async fn track_page_view(
    req: HttpRequest,
    state: web::Data<AppState>,
    data: web::Json<TrackPageViewRequest>,
) -> Result<impl Responder, AppError> {
    let geo = geo_from_headers(req.headers());

    state.analytics_handler
        .track_page_view(data.into_inner(), geo)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// Beacons arrive as `text/plain`, so the body is parsed by hand.
#[instrument(skip(state, body))]
pub async fn track_duration(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<impl Responder, AppError> {
    let request: TrackDurationRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::InvalidRequest(format!("Invalid request body: {e}")))?;

    state.analytics_handler.record_duration(request).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

#[instrument(skip(_admin, state))]
pub async fn get_stats(
    _admin: AdminSession,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let stats = state.analytics_handler.stats().await?;

    Ok(HttpResponse::Ok().json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn geo_defaults_to_unknown() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(geo_from_headers(req.headers()), GeoLocation::default());
    }

    #[test]
    fn geo_reads_edge_headers() {
        let req = TestRequest::default()
            .insert_header((COUNTRY_HEADER, "NG"))
            .insert_header((CITY_HEADER, "Lagos"))
            .to_http_request();

        let geo = geo_from_headers(req.headers());
        assert_eq!(geo.country, "NG");
        assert_eq!(geo.city, "Lagos");
    }
}
