//! Shared fixtures: an in-memory `Database` that understands the statements the
//! SQL builder produces, a sample registry, and request helpers.

#![allow(dead_code)]

use admin_console::{
    admin_routes, common_routes, parse_models, resolve, AdminRegistry, AdminSettings, AdminState,
    AppError, CredentialAuthenticator, Database, FieldValue, HtmlRenderer, Rows,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// One table keyed by id. Interprets SELECT / INSERT / UPDATE by their leading
/// keyword and parameter layout, and records every statement it receives.
#[derive(Default)]
pub struct MemoryDatabase {
    records: Mutex<BTreeMap<i64, Vec<FieldValue>>>,
    log: Mutex<Vec<(String, Vec<FieldValue>)>>,
    fail: bool,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        MemoryDatabase {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_record(self, id: i64, values: Vec<FieldValue>) -> Self {
        self.records.lock().unwrap().insert(id, values);
        self
    }

    pub fn record(&self, id: i64) -> Option<Vec<FieldValue>> {
        self.records.lock().unwrap().get(&id).cloned()
    }

    pub fn statements(&self) -> Vec<(String, Vec<FieldValue>)> {
        self.log.lock().unwrap().clone()
    }

    fn record_call(&self, sql: &str, params: &[FieldValue]) -> Result<(), AppError> {
        self.log
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
        if self.fail {
            return Err(AppError::Db(sqlx::Error::Protocol("connection reset".into())));
        }
        Ok(())
    }
}

fn with_id(id: i64, values: &[FieldValue]) -> Vec<FieldValue> {
    std::iter::once(FieldValue::Int(id))
        .chain(values.iter().cloned())
        .collect()
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn execute(&self, sql: &str, params: &[FieldValue]) -> Result<u64, AppError> {
        self.record_call(sql, params)?;
        if sql.starts_with("UPDATE") {
            let (id, values) = params.split_last().expect("update binds the id last");
            let id = id.as_i64().expect("integer id");
            let mut records = self.records.lock().unwrap();
            return Ok(match records.get_mut(&id) {
                Some(r) => {
                    *r = values.to_vec();
                    1
                }
                None => 0,
            });
        }
        Ok(0)
    }

    async fn query(&self, sql: &str, params: &[FieldValue]) -> Result<Rows, AppError> {
        self.record_call(sql, params)?;
        let mut records = self.records.lock().unwrap();
        if sql.starts_with("INSERT") {
            let id = records.keys().next_back().copied().unwrap_or(0) + 1;
            records.insert(id, params.to_vec());
            return Ok(vec![vec![FieldValue::Int(id)]]);
        }
        if sql.starts_with("SELECT 1") {
            return Ok(vec![vec![FieldValue::Int(1)]]);
        }
        if sql.contains("WHERE") {
            let id = params[0].as_i64().expect("integer id");
            return Ok(records
                .get(&id)
                .map(|r| vec![with_id(id, r)])
                .unwrap_or_default());
        }
        Ok(records.iter().map(|(id, r)| with_id(*id, r)).collect())
    }
}

pub const MODELS: &str = r#"{
    "groups": [{
        "name": "Content",
        "models": [{
            "name": "Post",
            "slug": "posts",
            "table": "posts",
            "list_columns": ["title", "published"],
            "fields": [
                {"name": "title", "kind": "text", "required": true, "max_length": 100},
                {"name": "views", "kind": "integer", "min": 0},
                {"name": "published", "kind": "boolean"}
            ]
        }]
    }]
}"#;

pub fn registry() -> AdminRegistry {
    resolve(&parse_models(MODELS).unwrap()).unwrap()
}

pub fn post(title: &str, views: i64, published: bool) -> Vec<FieldValue> {
    vec![
        FieldValue::Text(title.into()),
        FieldValue::Int(views),
        FieldValue::Bool(published),
    ]
}

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "s3cret";

pub fn settings() -> AdminSettings {
    AdminSettings {
        title: "Test Admin".into(),
        base_path: "/admin".into(),
        username: USERNAME.into(),
        password: PASSWORD.into(),
        request_timeout: Duration::from_secs(5),
        ..AdminSettings::default()
    }
}

pub fn state(db: Arc<MemoryDatabase>) -> AdminState {
    let settings = settings();
    AdminState {
        auth: Arc::new(CredentialAuthenticator::new(
            &settings.username,
            &settings.password,
            settings.index_path(),
        )
        .with_session_ttl(settings.session_ttl)),
        settings: Arc::new(settings),
        registry: Arc::new(registry()),
        db,
        renderer: Arc::new(HtmlRenderer),
    }
}

/// Admin nested under /admin plus the common routes at the root.
pub fn app(db: Arc<MemoryDatabase>) -> Router {
    let state = state(db);
    Router::new()
        .merge(common_routes(state.clone()))
        .nest("/admin", admin_routes(state))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub cookie: Option<String>,
    pub body: String,
}

pub async fn send(app: Router, req: Request<Body>) -> TestResponse {
    let resp = app.oneshot(req).await.expect("router is infallible");
    let status = resp.status();
    let location = resp
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().split(';').next().unwrap().to_string());
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    TestResponse {
        status,
        location,
        cookie,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut b = Request::builder().method(Method::GET).uri(uri);
    if let Some(c) = cookie {
        b = b.header(header::COOKIE, c);
    }
    b.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, cookie: Option<&str>, fields: &[(&str, &str)]) -> Request<Body> {
    let mut b = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(c) = cookie {
        b = b.header(header::COOKIE, c);
    }
    let body = serde_urlencoded::to_string(fields).unwrap();
    b.body(Body::from(body)).unwrap()
}

/// Log in and return the session cookie ("name=value").
pub async fn log_in(app: Router) -> String {
    let resp = send(
        app,
        post_form("/admin", None, &[("username", USERNAME), ("password", PASSWORD)]),
    )
    .await;
    assert_eq!(resp.status, StatusCode::FOUND);
    resp.cookie.expect("session cookie")
}
