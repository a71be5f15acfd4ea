//! Index page: login form for anonymous users, model dashboard otherwise.

use crate::error::{found, AppError};
use crate::render::Context;
use crate::state::AdminState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

fn login_page(state: &AdminState, failed: bool) -> Result<Html<String>, AppError> {
    let mut ctx = Context::new();
    ctx.insert("anonymous".into(), Value::Bool(true));
    ctx.insert("failed".into(), Value::Bool(failed));
    state.render("login.html", ctx)
}

pub async fn index(
    State(state): State<AdminState>,
    jar: CookieJar,
) -> Result<Html<String>, AppError> {
    if !state.auth.is_logged_in(&jar) {
        return login_page(&state, false);
    }
    let mut ctx = Context::new();
    ctx.insert("groups".into(), json!(state.registry.groups()));
    state.render("index.html", ctx)
}

pub async fn login(
    State(state): State<AdminState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let index = state.settings.index_path();
    if state.auth.is_logged_in(&jar) {
        return Ok(found(&index));
    }
    let (jar, ok) = state.auth.log_in(jar, &form.username, &form.password);
    if ok {
        return Ok((jar, found(&index)).into_response());
    }
    let page = login_page(&state, true)?;
    Ok((StatusCode::UNAUTHORIZED, page).into_response())
}

pub async fn logout(State(state): State<AdminState>, jar: CookieJar) -> Response {
    let jar = state.auth.log_out(jar);
    (jar, found(&state.settings.index_path())).into_response()
}
