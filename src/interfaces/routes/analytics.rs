use actix_web::web;

use crate::handlers::analytics;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/analytics")
            .service(
                web::resource("/track")
                    .route(web::post().to(analytics::track_page_view))
            )
            .service(
                web::resource("/duration")
                    .route(web::post().to(analytics::track_duration))
            )
            .service(
                web::resource("/stats")
                    .route(web::get().to(analytics::get_stats))
            )
    );
}
