use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    entities::project::{Project, ProjectAccess, ProjectImport, ProjectInsert, ProjectRow},
    errors::AppError,
    repositories::sqlx_repo::SqlxProjectRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn list_projects(&self) -> Result<Vec<Project>, AppError>;
    async fn get_project_by_slug(&self, slug: &str) -> Result<Option<Project>, AppError>;
    async fn get_project_access(&self, slug: &str) -> Result<Option<ProjectAccess>, AppError>;
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError>;
    async fn update_project(&self, id: &Uuid, project: &ProjectInsert) -> Result<Project, AppError>;
    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError>;
    async fn upsert_imported_project(&self, project: &ProjectImport) -> Result<(), AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProjectAccessRow {
    is_protected: bool,
    password_type: String,
    custom_password: Option<String>,
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        sqlx::query_as::<_, ProjectRow>(
            r#"SELECT * FROM projects ORDER BY created_at DESC"#
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Project::try_from)
        .collect()
    }

    async fn get_project_by_slug(&self, slug: &str) -> Result<Option<Project>, AppError> {
        sqlx::query_as::<_, ProjectRow>(
            r#"SELECT * FROM projects WHERE slug = $1"#
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?
        .map(Project::try_from)
        .transpose()
    }

    async fn get_project_access(&self, slug: &str) -> Result<Option<ProjectAccess>, AppError> {
        let row = sqlx::query_as::<_, ProjectAccessRow>(
            r#"
            SELECT is_protected, password_type, custom_password
            FROM projects
            WHERE slug = $1
            "#
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            Ok(ProjectAccess {
                is_protected: r.is_protected,
                password_type: r.password_type.parse()?,
                custom_password: r.custom_password,
            })
        })
        .transpose()
    }

    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            INSERT INTO projects (
                slug, title, description, content, images,
                is_protected, password_type, custom_password
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#
        )
        .bind(&project.slug)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.content)
        .bind(Json(&project.images))
        .bind(project.is_protected)
        .bind(project.password_type.as_str())
        .bind(&project.custom_password)
        .fetch_one(&self.pool)
        .await?;

        Project::try_from(row)
    }

    async fn update_project(&self, id: &Uuid, project: &ProjectInsert) -> Result<Project, AppError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            UPDATE projects SET
                slug = $1,
                title = $2,
                description = $3,
                content = $4,
                images = $5,
                is_protected = $6,
                password_type = $7,
                custom_password = $8,
                updated_at = NOW()
            WHERE id = $9
            RETURNING *
            "#
        )
        .bind(&project.slug)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.content)
        .bind(Json(&project.images))
        .bind(project.is_protected)
        .bind(project.password_type.as_str())
        .bind(&project.custom_password)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

        Project::try_from(row)
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query(r#"DELETE FROM projects WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Project not found".into()));
        }

        Ok(())
    }

    async fn upsert_imported_project(&self, project: &ProjectImport) -> Result<(), AppError> {
        // Protection settings and created_at of an existing row are left alone
        sqlx::query(
            r#"
            INSERT INTO projects (
                slug, title, description, content, images,
                is_protected, password_type, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, FALSE, 'master', $6, NOW())
            ON CONFLICT (slug) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                content = EXCLUDED.content,
                images = EXCLUDED.images,
                updated_at = NOW()
            "#
        )
        .bind(&project.slug)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.content)
        .bind(Json(&project.images))
        .bind(project.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
