//! Shared state for all admin routes. Everything here is immutable after startup.

use crate::auth::Authenticator;
use crate::config::AdminSettings;
use crate::db::Database;
use crate::error::AppError;
use crate::registry::AdminRegistry;
use crate::render::{Context, Renderer};
use axum::response::Html;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct AdminState {
    pub settings: Arc<AdminSettings>,
    pub registry: Arc<AdminRegistry>,
    pub db: Arc<dyn Database>,
    pub auth: Arc<dyn Authenticator>,
    pub renderer: Arc<dyn Renderer>,
}

impl AdminState {
    /// Render a page with the common keys (`title`, `path`, `anonymous`) filled in.
    pub fn render(&self, template: &str, mut ctx: Context) -> Result<Html<String>, AppError> {
        ctx.insert("title".into(), Value::String(self.settings.title.clone()));
        ctx.insert("path".into(), Value::String(self.settings.base_path.clone()));
        ctx.entry("anonymous").or_insert(Value::Bool(false));
        self.renderer.render(template, &ctx).map(Html)
    }
}
