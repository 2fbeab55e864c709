//! Runs the Postgres repositories against a throwaway database per test.
//! Needs `DATABASE_URL` pointing at a server the tests may create databases on.

use chrono::{TimeZone, Utc};
use portfolio_gate::{
    entities::{
        analytics::{PageViewInsert, VisitorInsert},
        project::{PasswordType, ProjectImage, ProjectImport, ProjectInsert},
        setting::SettingKey,
    },
    errors::AppError,
    repositories::{
        analytics::AnalyticsRepository,
        project::ProjectRepository,
        settings::SettingsRepository,
        sqlx_repo::{SqlxAnalyticsRepo, SqlxProjectRepo, SqlxSettingsRepo},
    },
};
use sqlx::PgPool;

fn imported(slug: &str, title: &str) -> ProjectImport {
    ProjectImport {
        slug: slug.into(),
        title: title.into(),
        description: "Imported".into(),
        content: "## Body".into(),
        images: vec![ProjectImage {
            src: "/images/cover.png".into(),
            alt: "Cover".into(),
            width: 1600,
            height: 900,
        }],
        created_at: Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap(),
    }
}

fn insert(slug: &str) -> ProjectInsert {
    ProjectInsert {
        slug: slug.into(),
        title: "Manual".into(),
        description: String::new(),
        content: String::new(),
        images: Vec::new(),
        is_protected: false,
        password_type: PasswordType::Master,
        custom_password: None,
    }
}

fn visitor(id: &str) -> VisitorInsert {
    VisitorInsert {
        visitor_id: id.into(),
        country: "NG".into(),
        city: "Lagos".into(),
        device_type: Some("desktop".into()),
        browser: Some("Firefox".into()),
        os: Some("Linux".into()),
        referrer: None,
    }
}

fn page_view(visitor_id: &str, path: &str) -> PageViewInsert {
    PageViewInsert {
        visitor_id: visitor_id.into(),
        page_path: Some(path.into()),
        page_title: Some("About".into()),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn reimport_updates_content_and_keeps_protection(pool: PgPool) {
    let repo = SqlxProjectRepo::new(pool);

    repo.upsert_imported_project(&imported("checkout", "Checkout")).await.unwrap();
    let original = repo.get_project_by_slug("checkout").await.unwrap().unwrap();
    assert!(!original.is_protected);
    assert_eq!(original.password_type, PasswordType::Master);

    let mut protected = insert("checkout");
    protected.title = original.title.clone();
    protected.is_protected = true;
    protected.password_type = PasswordType::Custom;
    protected.custom_password = Some("letmein".into());
    repo.update_project(&original.id, &protected).await.unwrap();

    let mut rerun = imported("checkout", "Checkout v2");
    rerun.created_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    repo.upsert_imported_project(&rerun).await.unwrap();

    let projects = repo.list_projects().await.unwrap();
    assert_eq!(projects.len(), 1);

    let project = &projects[0];
    assert_eq!(project.id, original.id);
    assert_eq!(project.title, "Checkout v2");
    assert_eq!(project.images.len(), 1);
    assert!(project.is_protected);
    assert_eq!(project.password_type, PasswordType::Custom);
    assert_eq!(project.custom_password.as_deref(), Some("letmein"));
    assert_eq!(project.created_at, original.created_at);
}

#[sqlx::test(migrations = "./migrations")]
async fn project_access_reads_protection_fields(pool: PgPool) {
    let repo = SqlxProjectRepo::new(pool);
    let mut project = insert("secret");
    project.is_protected = true;
    project.password_type = PasswordType::Custom;
    project.custom_password = Some("letmein".into());
    repo.create_project(&project).await.unwrap();

    let access = repo.get_project_access("secret").await.unwrap().unwrap();
    assert!(access.is_protected);
    assert_eq!(access.password_type, PasswordType::Custom);
    assert_eq!(access.custom_password.as_deref(), Some("letmein"));

    assert!(repo.get_project_access("missing").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_slug_is_a_conflict(pool: PgPool) {
    let repo = SqlxProjectRepo::new(pool);
    repo.create_project(&insert("taken")).await.unwrap();

    let err = repo.create_project(&insert("taken")).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_an_unknown_project_is_not_found(pool: PgPool) {
    let repo = SqlxProjectRepo::new(pool);
    let created = repo.create_project(&insert("short-lived")).await.unwrap();

    repo.delete_project(&created.id).await.unwrap();
    let err = repo.delete_project(&created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn repeat_visitor_is_counted_once(pool: PgPool) {
    let repo = SqlxAnalyticsRepo::new(pool.clone());

    repo.upsert_visitor(&visitor("v1")).await.unwrap();
    repo.upsert_visitor(&visitor("v1")).await.unwrap();

    let total_visits: i32 = sqlx::query_scalar("SELECT total_visits FROM visitors WHERE visitor_id = $1")
        .bind("v1")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(total_visits, 2);
    assert_eq!(repo.list_visitor_dimensions().await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn duration_lands_on_the_newest_matching_view(pool: PgPool) {
    let repo = SqlxAnalyticsRepo::new(pool.clone());

    repo.insert_page_view(&page_view("v1", "/about")).await.unwrap();
    sqlx::query("UPDATE page_views SET created_at = NOW() - INTERVAL '1 hour'")
        .execute(&pool)
        .await
        .unwrap();
    repo.insert_page_view(&page_view("v1", "/about")).await.unwrap();
    repo.insert_page_view(&page_view("v2", "/about")).await.unwrap();

    assert!(repo.update_latest_duration("v1", "/about", Some(42)).await.unwrap());

    let durations: Vec<Option<i32>> = sqlx::query_scalar(
        "SELECT duration FROM page_views WHERE visitor_id = $1 ORDER BY created_at",
    )
    .bind("v1")
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(durations, vec![None, Some(42)]);

    let other: Option<i32> = sqlx::query_scalar("SELECT duration FROM page_views WHERE visitor_id = $1")
        .bind("v2")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(other, None);

    assert!(!repo.update_latest_duration("ghost", "/about", Some(5)).await.unwrap());
    assert_eq!(repo.list_page_views().await.unwrap().len(), 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn settings_upsert_overwrites_in_place(pool: PgPool) {
    let repo = SqlxSettingsRepo::new(pool.clone());
    assert!(repo.get_setting(SettingKey::MasterPassword).await.unwrap().is_none());

    repo.upsert_setting(SettingKey::MasterPassword, "first").await.unwrap();
    repo.upsert_setting(SettingKey::MasterPassword, "second").await.unwrap();

    assert_eq!(
        repo.get_setting(SettingKey::MasterPassword).await.unwrap().as_deref(),
        Some("second")
    );
    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_settings")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}
