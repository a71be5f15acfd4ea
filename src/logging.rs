//! Tracing subscriber setup for binaries embedding the admin.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber. `RUST_LOG` wins; otherwise `default_directive` (e.g. "admin_console=info").
pub fn init(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
