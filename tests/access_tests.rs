
use portfolio_gate::entities::project::PasswordType;
use reqwest::StatusCode;
use serde_json::Value;
use test_utils::*;

#[actix_rt::test]
async fn pages_outside_work_are_public() {
    let app = TestApp::spawn().await;

    let response = app.check_auth("/about", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["authenticated"], true);
}

#[actix_rt::test]
async fn unprotected_and_unknown_projects_are_public() {
    let app = TestApp::spawn().await;
    app.seed_project("open-project", false, PasswordType::Custom, Some("pw"));

    assert_eq!(app.check_auth("/work/open-project", None).await.status(), StatusCode::OK);
    assert_eq!(app.check_auth("/work/no-such-project", None).await.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn protected_project_without_cookie_requires_password() {
    let app = TestApp::spawn().await;
    app.seed_project("gated", true, PasswordType::Master, None);

    let response = app.check_auth("/work/gated", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["authenticated"], false);
    assert_eq!(body["requiresPassword"], true);
}

#[actix_rt::test]
async fn master_password_issues_the_global_cookie() {
    let app = TestApp::spawn().await;
    app.seed_project("gated", true, PasswordType::Master, None);

    let response = app.authenticate("/work/gated", FALLBACK_MASTER).await;

    assert_eq!(response.status(), StatusCode::OK);
    let header = set_cookie_header(&response, "authToken").expect("authToken not set");
    assert!(header.starts_with("authToken=authenticated"));
    assert!(header.contains("HttpOnly"));
    assert!(header.contains("SameSite=Strict"));
    assert!(header.contains("Path=/"));
    assert!(header.contains("Max-Age=3600"));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);

    let check = app.check_auth("/work/gated", Some("authToken=authenticated")).await;
    assert_eq!(check.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn custom_password_issues_only_the_project_cookie() {
    let app = TestApp::spawn().await;
    app.seed_project("my-project!v2", true, PasswordType::Custom, Some("letmein"));

    let response = app.authenticate("/work/my-project!v2", "letmein").await;

    assert_eq!(response.status(), StatusCode::OK);
    let names = set_cookie_names(&response);
    assert_eq!(names, vec!["auth_my_project_v2".to_string()]);
    assert!(!names.contains(&"authToken".to_string()));
}

#[actix_rt::test]
async fn global_cookie_does_not_open_custom_projects() {
    let app = TestApp::spawn().await;
    app.seed_project("secret", true, PasswordType::Custom, Some("letmein"));

    let global = app.check_auth("/work/secret", Some("authToken=authenticated")).await;
    assert_eq!(global.status(), StatusCode::UNAUTHORIZED);

    let scoped = app.check_auth("/work/secret", Some("auth_secret=authenticated")).await;
    assert_eq!(scoped.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn wrong_password_sets_no_cookie() {
    let app = TestApp::spawn().await;
    app.seed_project("gated", true, PasswordType::Master, None);
    app.seed_project("secret", true, PasswordType::Custom, Some("letmein"));

    for (path, password) in [
        ("/work/gated", "nope"),
        ("/work/secret", "nope"),
        ("/work/secret", FALLBACK_MASTER),
        ("/", "nope"),
    ] {
        let response = app.authenticate(path, password).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{path}");
        assert!(set_cookie_names(&response).is_empty(), "{path}");

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Incorrect password");
    }
}

#[actix_rt::test]
async fn non_work_paths_fall_back_to_the_master_password() {
    let app = TestApp::spawn().await;

    let response = app.authenticate("/", FALLBACK_MASTER).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(set_cookie_names(&response), vec!["authToken".to_string()]);
}

#[actix_rt::test]
async fn stored_master_password_replaces_the_fallback() {
    let app = TestApp::spawn().await;
    app.seed_project("gated", true, PasswordType::Master, None);
    let admin = app.admin_cookie().await;

    let response = app.client
        .post(app.url("/api/admin/settings"))
        .header("Cookie", &admin)
        .json(&serde_json::json!({ "key": "master_password", "value": "rotated" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(app.authenticate("/work/gated", "rotated").await.status(), StatusCode::OK);
    assert_eq!(
        app.authenticate("/work/gated", FALLBACK_MASTER).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_rt::test]
async fn clearing_the_stored_master_password_restores_the_fallback() {
    let app = TestApp::spawn().await;
    app.seed_project("gated", true, PasswordType::Master, None);
    let admin = app.admin_cookie().await;

    let response = app.client
        .post(app.url("/api/admin/settings"))
        .header("Cookie", &admin)
        .json(&serde_json::json!({ "key": "master_password", "value": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        app.settings.values.lock().unwrap().get("master_password").map(String::as_str),
        Some("")
    );

    assert_eq!(app.authenticate("/work/gated", FALLBACK_MASTER).await.status(), StatusCode::OK);
    assert_eq!(app.authenticate("/work/gated", "").await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn public_project_detail_is_gated() {
    let app = TestApp::spawn().await;
    app.seed_project("gated", true, PasswordType::Master, None);

    let denied = app.client.get(app.url("/api/projects/gated")).send().await.unwrap();
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

    let allowed = app.client
        .get(app.url("/api/projects/gated"))
        .header("Cookie", "authToken=authenticated")
        .send()
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);

    let body: Value = allowed.json().await.unwrap();
    assert_eq!(body["slug"], "gated");
    assert!(body["content_html"].as_str().unwrap().contains("<h1>gated</h1>"));
    assert!(body.get("custom_password").is_none());
}

#[actix_rt::test]
async fn public_listing_never_exposes_passwords() {
    let app = TestApp::spawn().await;
    app.seed_project("secret", true, PasswordType::Custom, Some("letmein"));

    let response = app.client.get(app.url("/api/projects")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.unwrap();
    assert!(body.contains("\"slug\":\"secret\""));
    assert!(!body.contains("letmein"));
}

#[actix_rt::test]
async fn unknown_public_project_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app.client.get(app.url("/api/projects/missing")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
