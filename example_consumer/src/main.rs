//! Example consumer: serves the admin for the models in `ADMIN_MODELS`.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Requires `ADMIN_PASSWORD`; see `.env.example` for the other variables.

use admin_console::{
    admin_routes, common_routes, load_from_path, logging, resolve, AdminSettings, AdminState,
    CredentialAuthenticator, HtmlRenderer, PgDatabase,
};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    logging::init("admin_console=info,example_consumer=info");

    let settings = AdminSettings::from_env()?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await?;

    let config = load_from_path(&settings.models_path).await?;
    let registry = resolve(&config)?;
    tracing::info!(models = registry.len(), path = %settings.models_path, "models loaded");

    let state = AdminState {
        auth: Arc::new(CredentialAuthenticator::new(
            settings.username.clone(),
            settings.password.clone(),
            settings.index_path(),
        )
        .with_session_ttl(settings.session_ttl)),
        db: Arc::new(PgDatabase::new(pool)),
        registry: Arc::new(registry),
        renderer: Arc::new(HtmlRenderer),
        settings: Arc::new(settings),
    };

    let admin = admin_routes(state.clone());
    let app = if state.settings.base_path.is_empty() {
        common_routes(state.clone()).merge(admin)
    } else {
        common_routes(state.clone()).nest(&state.settings.base_path, admin)
    };

    let listener = TcpListener::bind(&state.settings.bind_addr).await?;
    tracing::info!(
        "admin listening on http://{}{}",
        listener.local_addr()?,
        state.settings.index_path()
    );
    axum::serve(listener, app).await?;
    Ok(())
}
