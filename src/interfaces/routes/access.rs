use actix_web::web;

use crate::handlers::access;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/authenticate")
            .route(web::post().to(access::authenticate))
    )
    .service(
        web::resource("/check-auth")
            .route(web::get().to(access::check_auth))
    );
}
