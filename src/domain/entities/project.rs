use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{errors::AppError, utils::markdown::safe_markdown_to_html};

// ───── Constants ──────────────────────────────────────────────────────
const MAX_TITLE_LENGTH: u64 = 200;
const MAX_SLUG_LENGTH: u64 = 120;
const MAX_ALT_LENGTH: u64 = 300;

/// Which password opens a protected project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordType {
    #[default]
    Master,
    Custom,
}

impl PasswordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordType::Master => "master",
            PasswordType::Custom => "custom",
        }
    }
}

impl fmt::Display for PasswordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PasswordType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "master" => Ok(PasswordType::Master),
            "custom" => Ok(PasswordType::Custom),
            other => Err(AppError::UpstreamFailure(format!("Unknown password type: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProjectImage {
    #[validate(length(min = 1, message = "Image source cannot be empty"))]
    pub src: String,

    #[serde(default)]
    #[validate(length(max = MAX_ALT_LENGTH))]
    pub alt: String,

    pub width: u32,
    pub height: u32,
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub images: Json<Vec<ProjectImage>>,
    pub is_protected: bool,
    pub password_type: String,
    pub custom_password: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub images: Vec<ProjectImage>,
    pub is_protected: bool,
    pub password_type: PasswordType,
    pub custom_password: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = AppError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Project {
            id: row.id,
            slug: row.slug,
            title: row.title,
            description: row.description,
            content: row.content,
            images: row.images.0,
            is_protected: row.is_protected,
            password_type: row.password_type.parse()?,
            custom_password: row.custom_password,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// The only fields the access gate reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectAccess {
    pub is_protected: bool,
    pub password_type: PasswordType,
    pub custom_password: Option<String>,
}

impl From<&Project> for ProjectAccess {
    fn from(project: &Project) -> Self {
        ProjectAccess {
            is_protected: project.is_protected,
            password_type: project.password_type,
            custom_password: project.custom_password.clone(),
        }
    }
}

/// Values written on insert and on full update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInsert {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub images: Vec<ProjectImage>,
    pub is_protected: bool,
    pub password_type: PasswordType,
    pub custom_password: Option<String>,
}

/// A project parsed from a content file by the migration importer.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectImport {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub images: Vec<ProjectImage>,
    pub created_at: DateTime<Utc>,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub images: Vec<ProjectImage>,
    pub is_protected: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Project> for ProjectSummary {
    fn from(project: Project) -> Self {
        ProjectSummary {
            id: project.id,
            slug: project.slug,
            title: project.title,
            description: project.description,
            images: project.images,
            is_protected: project.is_protected,
            created_at: project.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectDetailResponse {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub content_html: String,
    pub images: Vec<ProjectImage>,
    pub is_protected: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Project> for ProjectDetailResponse {
    fn from(project: Project) -> Self {
        ProjectDetailResponse {
            content_html: safe_markdown_to_html(&project.content),
            id: project.id,
            slug: project.slug,
            title: project.title,
            description: project.description,
            images: project.images,
            is_protected: project.is_protected,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_new_project_password"))]
pub struct NewProjectRequest {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH, message = "Title is required"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = MAX_SLUG_LENGTH), custom(function = "validate_slug"))]
    pub slug: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    #[validate(nested)]
    pub images: Vec<ProjectImage>,

    #[serde(default)]
    pub is_protected: bool,

    #[serde(default)]
    pub password_type: PasswordType,

    #[serde(default)]
    pub custom_password: Option<String>,
}

impl NewProjectRequest {
    pub fn prepare_for_insert(self) -> ProjectInsert {
        let slug = match self.slug.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => slug::slugify(&self.title),
        };

        ProjectInsert {
            custom_password: retained_custom_password(self.password_type, self.custom_password),
            slug,
            title: self.title,
            description: self.description,
            content: self.content,
            images: self.images,
            is_protected: self.is_protected,
            password_type: self.password_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_update_project_password"))]
pub struct UpdateProjectRequest {
    pub id: Uuid,

    #[validate(length(min = 1, max = MAX_TITLE_LENGTH, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, max = MAX_SLUG_LENGTH, message = "Slug is required"), custom(function = "validate_slug"))]
    pub slug: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    #[validate(nested)]
    pub images: Vec<ProjectImage>,

    #[serde(default)]
    pub is_protected: bool,

    #[serde(default)]
    pub password_type: PasswordType,

    #[serde(default)]
    pub custom_password: Option<String>,
}

impl UpdateProjectRequest {
    pub fn into_parts(self) -> (Uuid, ProjectInsert) {
        let insert = ProjectInsert {
            custom_password: retained_custom_password(self.password_type, self.custom_password),
            slug: self.slug.trim().to_string(),
            title: self.title,
            description: self.description,
            content: self.content,
            images: self.images,
            is_protected: self.is_protected,
            password_type: self.password_type,
        };
        (self.id, insert)
    }
}

/// A custom password is only kept alongside `password_type = custom`.
fn retained_custom_password(password_type: PasswordType, password: Option<String>) -> Option<String> {
    match password_type {
        PasswordType::Custom => password,
        PasswordType::Master => None,
    }
}

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.contains('/') {
        let mut error = ValidationError::new("slug_format");
        error.message = Some("Slug cannot contain '/'".into());
        return Err(error);
    }
    Ok(())
}

fn require_custom_password(
    password_type: PasswordType,
    custom_password: &Option<String>,
) -> Result<(), ValidationError> {
    let missing = custom_password.as_deref().is_none_or(str::is_empty);
    if password_type == PasswordType::Custom && missing {
        let mut error = ValidationError::new("custom_password_required");
        error.message = Some("A custom password is required when password_type is custom".into());
        return Err(error);
    }
    Ok(())
}

fn validate_new_project_password(request: &NewProjectRequest) -> Result<(), ValidationError> {
    require_custom_password(request.password_type, &request.custom_password)
}

fn validate_update_project_password(request: &UpdateProjectRequest) -> Result<(), ValidationError> {
    require_custom_password(request.password_type, &request.custom_password)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_request() -> NewProjectRequest {
        NewProjectRequest {
            title: "Design System Rebuild".into(),
            slug: None,
            description: "A case study".into(),
            content: "# Hello".into(),
            images: vec![],
            is_protected: true,
            password_type: PasswordType::Master,
            custom_password: Some("left-over".into()),
        }
    }

    #[test]
    fn missing_slug_is_derived_from_title() {
        let insert = new_request().prepare_for_insert();
        assert_eq!(insert.slug, "design-system-rebuild");
    }

    #[test]
    fn master_projects_drop_custom_password() {
        let insert = new_request().prepare_for_insert();
        assert_eq!(insert.custom_password, None);
    }

    #[test]
    fn custom_projects_require_a_password() {
        let mut request = new_request();
        request.password_type = PasswordType::Custom;
        request.custom_password = None;
        assert!(request.validate().is_err());

        request.custom_password = Some("s3cret".into());
        assert!(request.validate().is_ok());
        assert_eq!(request.prepare_for_insert().custom_password.as_deref(), Some("s3cret"));
    }

    #[test]
    fn slugs_with_slashes_are_rejected() {
        let mut request = new_request();
        request.slug = Some("a/b".into());
        assert!(request.validate().is_err());
    }

    #[test]
    fn images_without_dimensions_fail_to_parse() {
        let result: Result<ProjectImage, _> = serde_json::from_value(serde_json::json!({
            "src": "/images/cover.png"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_stored_password_type_is_rejected() {
        assert!("legacy".parse::<PasswordType>().is_err());
        assert_eq!("custom".parse::<PasswordType>().unwrap(), PasswordType::Custom);
    }

    #[test]
    fn detail_renders_sanitized_html() {
        let project = Project {
            id: Uuid::new_v4(),
            slug: "demo".into(),
            title: "Demo".into(),
            description: String::new(),
            content: "**bold** <script>alert(1)</script>".into(),
            images: vec![],
            is_protected: false,
            password_type: PasswordType::Master,
            custom_password: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let detail = ProjectDetailResponse::from(project);
        assert!(detail.content_html.contains("<strong>bold</strong>"));
        assert!(!detail.content_html.contains("<script>"));
    }
}
