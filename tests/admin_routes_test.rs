mod common;

use admin_console::routes::FORM_BODY_LIMIT;
use admin_console::FieldValue;
use axum::http::{header, StatusCode};
use common::{app, get, log_in, post, post_form, send, MemoryDatabase};
use std::sync::Arc;

fn seeded() -> Arc<MemoryDatabase> {
    Arc::new(
        MemoryDatabase::new()
            .with_record(1, post("Hello <world>", 3, true))
            .with_record(2, post("Draft", 0, false)),
    )
}

#[tokio::test]
async fn anonymous_requests_redirect_to_index() {
    let db = seeded();
    let router = app(db.clone());
    for uri in ["/admin/posts", "/admin/posts/edit", "/admin/posts/edit/1", "/admin/logout"] {
        let resp = send(router.clone(), get(uri, None)).await;
        assert_eq!(resp.status, StatusCode::FOUND, "{}", uri);
        assert_eq!(resp.location.as_deref(), Some("/admin"), "{}", uri);
    }
    assert!(db.statements().is_empty());
}

#[tokio::test]
async fn anonymous_index_shows_login_form() {
    let resp = send(app(seeded()), get("/admin", None)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains(r#"name="password""#));
    assert!(!resp.body.contains("Log out"));
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let resp = send(
        app(seeded()),
        post_form("/admin", None, &[("username", "admin"), ("password", "nope")]),
    )
    .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert!(resp.cookie.is_none());
    assert!(resp.body.contains("Wrong username or password."));
}

#[tokio::test]
async fn login_then_dashboard_and_list() {
    let db = seeded();
    let router = app(db.clone());
    let cookie = log_in(router.clone()).await;

    let index = send(router.clone(), get("/admin", Some(&cookie))).await;
    assert_eq!(index.status, StatusCode::OK);
    assert!(index.body.contains("Content"));
    assert!(index.body.contains(r#"href="/admin/posts""#));

    let list = send(router.clone(), get("/admin/posts", Some(&cookie))).await;
    assert_eq!(list.status, StatusCode::OK);
    assert!(list.body.contains("Hello &lt;world&gt;"));
    assert!(list.body.contains(r#"href="/admin/posts/edit/2""#));
    assert!(list.body.contains("glyphicon-ok"));
}

#[tokio::test]
async fn unknown_model_is_not_found() {
    let db = seeded();
    let router = app(db.clone());
    let cookie = log_in(router.clone()).await;
    let resp = send(router, get("/admin/widgets", Some(&cookie))).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn edit_form_missing_or_bad_id_is_not_found() {
    let db = seeded();
    let router = app(db.clone());
    let cookie = log_in(router.clone()).await;
    let missing = send(router.clone(), get("/admin/posts/edit/99", Some(&cookie))).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    let bad = send(router, get("/admin/posts/edit/abc", Some(&cookie))).await;
    assert_eq!(bad.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn edit_form_shows_stored_values() {
    let db = seeded();
    let router = app(db.clone());
    let cookie = log_in(router.clone()).await;
    let resp = send(router, get("/admin/posts/edit/2", Some(&cookie))).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains(r#"value="Draft""#));
    assert!(resp.body.contains(r#"action="/admin/posts/edit/2""#));
}

#[tokio::test]
async fn save_and_continue_goes_to_new_record() {
    let db = seeded();
    let router = app(db.clone());
    let cookie = log_in(router.clone()).await;
    let resp = send(
        router.clone(),
        post_form(
            "/admin/posts/edit",
            Some(&cookie),
            &[("title", "Fresh"), ("views", "7"), ("published", "on")],
        ),
    )
    .await;
    assert_eq!(resp.status, StatusCode::FOUND);
    assert_eq!(resp.location.as_deref(), Some("/admin/posts/edit/3"));
    assert_eq!(db.record(3), Some(post("Fresh", 7, true)));
}

#[tokio::test]
async fn save_with_done_returns_to_list() {
    let db = seeded();
    let router = app(db.clone());
    let cookie = log_in(router.clone()).await;
    let resp = send(
        router.clone(),
        post_form(
            "/admin/posts/edit/2",
            Some(&cookie),
            &[("title", "Published"), ("views", "1"), ("published", "true"), ("done", "true")],
        ),
    )
    .await;
    assert_eq!(resp.status, StatusCode::FOUND);
    assert_eq!(resp.location.as_deref(), Some("/admin/posts"));
    assert_eq!(db.record(2), Some(post("Published", 1, true)));
}

#[tokio::test]
async fn invalid_submission_rerenders_with_input() {
    let db = seeded();
    let router = app(db.clone());
    let cookie = log_in(router.clone()).await;
    let before = db.statements().len();
    let resp = send(
        router.clone(),
        post_form(
            "/admin/posts/edit/1",
            Some(&cookie),
            &[("title", "Kept title"), ("views", "-4"), ("published", "on")],
        ),
    )
    .await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.body.contains("Please correct the errors below."));
    assert!(resp.body.contains("must be at least 0"));
    assert!(resp.body.contains(r#"value="Kept title""#));
    assert!(resp.body.contains(r#"value="-4""#));
    assert_eq!(db.statements().len(), before);
    assert_eq!(db.record(1).unwrap()[0], FieldValue::Text("Hello <world>".into()));
}

#[tokio::test]
async fn logout_ends_session() {
    let db = seeded();
    let router = app(db.clone());
    let cookie = log_in(router.clone()).await;
    let out = send(router.clone(), get("/admin/logout", Some(&cookie))).await;
    assert_eq!(out.status, StatusCode::FOUND);
    assert_eq!(out.location.as_deref(), Some("/admin"));

    let after = send(router, get("/admin/posts", Some(&cookie))).await;
    assert_eq!(after.status, StatusCode::FOUND);
}

#[tokio::test]
async fn health_is_public() {
    let resp = send(app(seeded()), get("/health", None)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains(r#""status":"ok""#));
}

#[tokio::test]
async fn ready_reports_database_failure() {
    let resp = send(app(Arc::new(MemoryDatabase::failing())), get("/ready", None)).await;
    assert_eq!(resp.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn ready_and_version_describe_the_admin() {
    let router = app(seeded());
    let ready = send(router.clone(), get("/ready", None)).await;
    assert_eq!(ready.status, StatusCode::OK);
    assert!(ready.body.contains(r#""models":1"#));

    let version = send(router, get("/version", None)).await;
    assert!(version.body.contains(r#""name":"admin-console""#));
    assert!(version.body.contains(r#""title":"Test Admin""#));
}

#[tokio::test]
async fn oversized_form_is_rejected_before_saving() {
    let db = seeded();
    let router = app(db.clone());
    let cookie = log_in(router.clone()).await;
    let before = db.statements().len();

    let title = "x".repeat(FORM_BODY_LIMIT);
    let mut req = post_form("/admin/posts/edit", Some(&cookie), &[("title", title.as_str())]);
    let len = serde_urlencoded::to_string([("title", title.as_str())]).unwrap().len();
    req.headers_mut()
        .insert(header::CONTENT_LENGTH, len.to_string().parse().unwrap());

    let resp = send(router, req).await;
    assert_eq!(resp.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(db.statements().len(), before);
}
