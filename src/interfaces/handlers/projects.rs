use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    entities::project::{NewProjectRequest, ProjectDetailResponse, UpdateProjectRequest},
    errors::AppError,
    use_cases::extractors::AdminSession,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct DeleteProjectQuery {
    pub id: Option<String>,
}

#[instrument(skip(_admin, state))]
pub async fn list_projects(
    _admin: AdminSession,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let projects = state.project_handler.list_projects().await?;

    Ok(HttpResponse::Ok().json(projects))
}

#[instrument(skip(_admin, state, data))]
pub async fn create_project(
    _admin: AdminSession,
    state: web::Data<AppState>,
    data: web::Json<NewProjectRequest>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler
        .create_project(data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(_admin, state, data), fields(id = %data.id))]
pub async fn update_project(
    _admin: AdminSession,
    state: web::Data<AppState>,
    data: web::Json<UpdateProjectRequest>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler
        .update_project(data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(_admin, state, query))]
pub async fn delete_project(
    _admin: AdminSession,
    state: web::Data<AppState>,
    query: web::Query<DeleteProjectQuery>,
) -> Result<impl Responder, AppError> {
    state.project_handler
        .delete_project(query.id.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

#[instrument(skip(state))]
pub async fn list_public_projects(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let projects = state.project_handler.list_public_projects().await?;

    Ok(HttpResponse::Ok().json(projects))
}

/// Project detail, behind the same gate the `/work/<slug>` page uses.
#[instrument(skip(req, state, slug), fields(slug = %slug))]
pub async fn get_public_project(
    req: HttpRequest,
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let path = format!("/work/{slug}");
    let status = state.gate.check_access(&path, &req).await?;
    if !status.authenticated {
        return Ok(HttpResponse::Unauthorized().json(status));
    }

    let project = state.project_handler.get_project_by_slug(&slug).await?;

    Ok(HttpResponse::Ok().json(ProjectDetailResponse::from(project)))
}
