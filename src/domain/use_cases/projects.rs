use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::project::{NewProjectRequest, Project, ProjectSummary, UpdateProjectRequest},
    errors::AppError,
    repositories::project::ProjectRepository,
};

pub struct ProjectHandler {
    pub project_repo: Arc<dyn ProjectRepository>,
}

impl ProjectHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepository>) -> Self {
        ProjectHandler { project_repo }
    }

    /// Lists every project, newest first, with all admin-visible fields
    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        self.project_repo.list_projects().await
    }

    /// Lists the public view of every project
    pub async fn list_public_projects(&self) -> Result<Vec<ProjectSummary>, AppError> {
        let projects = self.project_repo.list_projects().await?;
        Ok(projects.into_iter().map(ProjectSummary::from).collect())
    }

    pub async fn get_project_by_slug(&self, slug: &str) -> Result<Project, AppError> {
        self.project_repo
            .get_project_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }

    /// Creates a project, deriving the slug from the title when none is given
    pub async fn create_project(&self, request: NewProjectRequest) -> Result<Project, AppError> {
        request.validate()?;

        let insert = request.prepare_for_insert();
        let project = self.project_repo.create_project(&insert).await?;

        tracing::info!(slug = %project.slug, "Project created");
        Ok(project)
    }

    /// Replaces every editable field of an existing project
    pub async fn update_project(&self, request: UpdateProjectRequest) -> Result<Project, AppError> {
        request.validate()?;

        let (id, insert) = request.into_parts();
        let project = self.project_repo.update_project(&id, &insert).await?;

        tracing::info!(slug = %project.slug, "Project updated");
        Ok(project)
    }

    pub async fn delete_project(&self, id: Option<&str>) -> Result<(), AppError> {
        let id = id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::InvalidRequest("ID required".into()))?;
        let id = Uuid::parse_str(id)
            .map_err(|_| AppError::InvalidRequest("Invalid project ID".into()))?;

        self.project_repo.delete_project(&id).await?;

        tracing::info!(%id, "Project deleted");
        Ok(())
    }
}
