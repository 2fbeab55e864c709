//! One-shot import of `*.mdx` project files into the project store.
//!
//! Each file is upserted on its own. A failing file is reported and the batch
//! moves on; nothing spans the whole import.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, Context};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::{
    entities::project::{ProjectImage, ProjectImport},
    errors::AppError,
    repositories::project::ProjectRepository,
    utils::markdown::read_front_matter_file,
};

const CONTENT_EXTENSION: &str = "mdx";

/// Header fields recognised in a project file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFrontMatter {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub published_at: Option<String>,
    #[serde(default)]
    pub images: Vec<ProjectImage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportResult {
    pub slug: String,
    pub status: ImportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MigrationReport {
    pub message: String,
    pub results: Vec<ImportResult>,
}

pub struct MigrationHandler {
    pub project_repo: Arc<dyn ProjectRepository>,
    content_dir: PathBuf,
}

impl MigrationHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepository>, content_dir: impl Into<PathBuf>) -> Self {
        MigrationHandler {
            project_repo,
            content_dir: content_dir.into(),
        }
    }

    pub async fn run(&self) -> Result<MigrationReport, AppError> {
        let files = self.content_files().await?;
        tracing::info!(count = files.len(), dir = %self.content_dir.display(), "Starting project import");

        let mut results = Vec::with_capacity(files.len());
        for (slug, path) in files {
            let result = match self.import_file(&slug, &path).await {
                Ok(()) => ImportResult { slug, status: ImportStatus::Success, error: None },
                Err(e) => {
                    let error = format!("{e:#}");
                    tracing::warn!(%slug, %error, "Project import failed");
                    ImportResult { slug, status: ImportStatus::Failed, error: Some(error) }
                }
            };
            results.push(result);
        }

        Ok(MigrationReport {
            message: "Migration completed".into(),
            results,
        })
    }

    /// `(slug, path)` for every content file, in file-name order.
    async fn content_files(&self) -> Result<Vec<(String, PathBuf)>, AppError> {
        if !fs::try_exists(&self.content_dir).await.unwrap_or(false) {
            return Err(AppError::NotFound("Projects directory not found".into()));
        }

        let mut entries = fs::read_dir(&self.content_dir)
            .await
            .map_err(|e| AppError::UpstreamFailure(format!("Failed to read projects directory: {e}")))?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::UpstreamFailure(format!("Failed to read projects directory: {e}")))?
        {
            let path = entry.path();
            match content_slug(&path) {
                Some(slug) => files.push((slug, path)),
                None => tracing::debug!(path = %path.display(), "Skipping non-project file"),
            }
        }

        files.sort_by(|a, b| a.1.file_name().cmp(&b.1.file_name()));
        Ok(files)
    }

    async fn import_file(&self, slug: &str, path: &Path) -> anyhow::Result<()> {
        let document = read_front_matter_file::<ProjectFrontMatter>(path)
            .await
            .with_context(|| format!("Could not parse {}", path.display()))?;

        let import = build_import(slug, document.metadata, document.body)?;

        self.project_repo
            .upsert_imported_project(&import)
            .await
            .map_err(|e| anyhow!("{e}"))?;

        Ok(())
    }
}

/// The file stem of a `*.mdx` file.
fn content_slug(path: &Path) -> Option<String> {
    if path.extension()?.to_str()? != CONTENT_EXTENSION {
        return None;
    }
    path.file_stem()?.to_str().map(str::to_string)
}

fn build_import(slug: &str, meta: ProjectFrontMatter, body: String) -> anyhow::Result<ProjectImport> {
    let created_at = match meta.published_at.as_deref() {
        Some(raw) => parse_published_at(raw)?,
        None => Utc::now(),
    };

    Ok(ProjectImport {
        slug: slug.to_string(),
        title: meta.title.filter(|t| !t.trim().is_empty()).unwrap_or_else(|| slug.to_string()),
        description: meta.summary.unwrap_or_default(),
        content: body,
        images: meta.images,
        created_at,
    })
}

/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
fn parse_published_at(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid publishedAt date: {raw}"))?;
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| anyhow!("Invalid publishedAt date: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::project::MockProjectRepository;

    #[test]
    fn only_mdx_files_are_content() {
        assert_eq!(content_slug(Path::new("/x/case-study.mdx")), Some("case-study".into()));
        assert_eq!(content_slug(Path::new("/x/notes.md")), None);
        assert_eq!(content_slug(Path::new("/x/README")), None);
    }

    #[test]
    fn defaults_come_from_the_slug() {
        let import = build_import("my-app", ProjectFrontMatter::default(), "body".into()).unwrap();
        assert_eq!(import.title, "my-app");
        assert_eq!(import.description, "");
        assert_eq!(import.content, "body");
    }

    #[test]
    fn published_at_accepts_dates_and_timestamps() {
        let date = parse_published_at("2024-03-01").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-03-01T00:00:00+00:00");

        let ts = parse_published_at("2024-03-01T10:30:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-01T08:30:00+00:00");

        assert!(parse_published_at("last tuesday").is_err());
    }

    #[actix_rt::test]
    async fn missing_directory_is_not_found() {
        let handler = MigrationHandler::new(
            Arc::new(MockProjectRepository::new()),
            "/definitely/not/a/real/dir",
        );
        let err = handler.run().await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), "Projects directory not found");
    }

    #[actix_rt::test]
    async fn one_bad_file_does_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a-good.mdx"), "---\ntitle: Good\n---\nHello").unwrap();
        std::fs::write(dir.path().join("b-bad.mdx"), "---\ntitle: [unclosed\n---\n").unwrap();
        std::fs::write(dir.path().join("c-skip.txt"), "ignored").unwrap();

        let mut repo = MockProjectRepository::new();
        repo.expect_upsert_imported_project()
            .withf(|import| import.slug == "a-good" && import.title == "Good")
            .times(1)
            .returning(|_| Ok(()));

        let handler = MigrationHandler::new(Arc::new(repo), dir.path());
        let report = handler.run().await.unwrap();

        assert_eq!(report.message, "Migration completed");
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].status, ImportStatus::Success);
        assert_eq!(report.results[1].slug, "b-bad");
        assert_eq!(report.results[1].status, ImportStatus::Failed);
        assert!(report.results[1].error.is_some());
    }

    #[actix_rt::test]
    async fn store_errors_are_reported_per_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.mdx"), "Just a body").unwrap();

        let mut repo = MockProjectRepository::new();
        repo.expect_upsert_imported_project()
            .returning(|_| Err(AppError::UpstreamFailure("connection reset".into())));

        let handler = MigrationHandler::new(Arc::new(repo), dir.path());
        let report = handler.run().await.unwrap();

        assert_eq!(report.results[0].status, ImportStatus::Failed);
        assert_eq!(report.results[0].error.as_deref(), Some("connection reset"));
    }
}
