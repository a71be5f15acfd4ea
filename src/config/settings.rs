//! Process settings read from the environment.

use crate::error::ConfigError;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AdminSettings {
    /// Shown in the page header and `<title>`.
    pub title: String,
    /// Mount point of the admin router, "" for the root. Redirects are built from it.
    pub base_path: String,
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: String,
    pub username: String,
    pub password: String,
    pub models_path: String,
    pub request_timeout: Duration,
    /// How long a login stays valid.
    pub session_ttl: Duration,
}

impl Default for AdminSettings {
    fn default() -> Self {
        AdminSettings {
            title: "Admin".into(),
            base_path: "/admin".into(),
            database_url: "postgres://localhost/admin".into(),
            max_connections: 5,
            bind_addr: "127.0.0.1:3000".into(),
            username: "admin".into(),
            password: String::new(),
            models_path: "models.json".into(),
            request_timeout: Duration::from_secs(30),
            session_ttl: Duration::from_secs(12 * 60 * 60),
        }
    }
}

impl AdminSettings {
    /// Read `ADMIN_*` / `DATABASE_*` variables; `ADMIN_PASSWORD` is required.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let d = AdminSettings::default();
        let password = get("ADMIN_PASSWORD")
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ConfigError::Validation("ADMIN_PASSWORD must be set".into()))?;
        let timeout_secs = parse_num("ADMIN_REQUEST_TIMEOUT_SECS", get("ADMIN_REQUEST_TIMEOUT_SECS"), 30u64)?;
        let session_secs = parse_num("ADMIN_SESSION_TTL_SECS", get("ADMIN_SESSION_TTL_SECS"), d.session_ttl.as_secs())?;
        Ok(AdminSettings {
            title: get("ADMIN_TITLE").unwrap_or(d.title),
            base_path: normalize_base_path(&get("ADMIN_BASE_PATH").unwrap_or(d.base_path)),
            database_url: get("DATABASE_URL").unwrap_or(d.database_url),
            max_connections: parse_num("DATABASE_MAX_CONNECTIONS", get("DATABASE_MAX_CONNECTIONS"), d.max_connections)?,
            bind_addr: get("ADMIN_BIND").unwrap_or(d.bind_addr),
            username: get("ADMIN_USERNAME").unwrap_or(d.username),
            password,
            models_path: get("ADMIN_MODELS").unwrap_or(d.models_path),
            request_timeout: Duration::from_secs(timeout_secs),
            session_ttl: Duration::from_secs(session_secs),
        })
    }

    /// Absolute URL of the index page (login / dashboard).
    pub fn index_path(&self) -> String {
        if self.base_path.is_empty() {
            "/".into()
        } else {
            self.base_path.clone()
        }
    }

    /// Absolute URL under the admin, e.g. `url("/posts/edit/3")`.
    pub fn url(&self, rest: &str) -> String {
        format!("{}{}", self.base_path, rest)
    }
}

fn parse_num<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(s) => s
            .trim()
            .parse()
            .map_err(|_| ConfigError::Load(format!("{} is not a number: '{}'", key, s))),
    }
}

/// "/admin/" and "admin" both become "/admin"; "/" becomes "".
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
