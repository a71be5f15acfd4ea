//! Admin routes behind the login gate. Nest the returned router under the
//! configured base path; redirects are built from `AdminSettings::base_path`.

use crate::error::AppError;
use crate::handlers::{edit_form, index, list, login, logout, new_form, save_existing, save_new};
use crate::state::AdminState;
use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Largest accepted request body. Admin forms are a handful of short fields.
pub const FORM_BODY_LIMIT: usize = 64 * 1024;

/// Anonymous callers may only reach the index path; everything else redirects there.
pub fn check_access(logged_in: bool, path: &str, index_path: &str) -> Result<(), AppError> {
    if logged_in || path == "/" || path.is_empty() {
        Ok(())
    } else {
        Err(AppError::AuthRequired {
            location: index_path.to_string(),
        })
    }
}

async fn login_gate(
    State(state): State<AdminState>,
    jar: CookieJar,
    req: Request,
    next: Next,
) -> Response {
    let logged_in = state.auth.is_logged_in(&jar);
    if let Err(e) = check_access(logged_in, req.uri().path(), &state.settings.index_path()) {
        tracing::debug!(path = %req.uri().path(), "anonymous request redirected to index");
        return e.into_response();
    }
    next.run(req).await
}

pub fn admin_routes(state: AdminState) -> Router {
    let timeout = state.settings.request_timeout;
    Router::new()
        .route("/", get(index).post(login))
        .route("/logout", get(logout))
        .route("/:slug", get(list))
        .route("/:slug/edit", get(new_form).post(save_new))
        .route("/:slug/edit/:id", get(edit_form).post(save_existing))
        .route_layer(middleware::from_fn_with_state(state.clone(), login_gate))
        .layer(RequestBodyLimitLayer::new(FORM_BODY_LIMIT))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
