use actix_web::web;

use crate::handlers::{admin, migration, projects, settings};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(
                web::resource("/login")
                    .route(web::post().to(admin::login))
            )
            .service(
                web::resource("/logout")
                    .route(web::post().to(admin::logout))
            )
            .service(
                web::resource("/projects")
                    .route(web::get().to(projects::list_projects))
                    .route(web::post().to(projects::create_project))
                    .route(web::put().to(projects::update_project))
                    .route(web::delete().to(projects::delete_project))
            )
            .service(
                web::resource("/settings")
                    .route(web::post().to(settings::update_setting))
            )
            .service(
                web::resource("/migrate")
                    .route(web::get().to(migration::migrate_projects))
            )
    );
}
