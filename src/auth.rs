//! Authenticator collaborator: login state lives in a session cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use subtle::ConstantTimeEq;

pub const SESSION_COOKIE: &str = "admin_session";

/// Lifetime of a session when none is configured.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);

pub trait Authenticator: Send + Sync {
    fn is_logged_in(&self, jar: &CookieJar) -> bool;

    /// On success the returned jar carries the session cookie.
    fn log_in(&self, jar: CookieJar, username: &str, password: &str) -> (CookieJar, bool);

    fn log_out(&self, jar: CookieJar) -> CookieJar;
}

/// Single configured account; sessions are random tokens held in memory
/// with their issue time, valid for `session_ttl`.
pub struct CredentialAuthenticator {
    username: String,
    password: String,
    cookie_path: String,
    session_ttl: Duration,
    sessions: RwLock<HashMap<String, Instant>>,
}

impl CredentialAuthenticator {
    pub fn new(username: impl Into<String>, password: impl Into<String>, cookie_path: impl Into<String>) -> Self {
        CredentialAuthenticator {
            username: username.into(),
            password: password.into(),
            cookie_path: cookie_path.into(),
            session_ttl: DEFAULT_SESSION_TTL,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Forget every session older than the ttl.
    fn purge_expired(&self, sessions: &mut HashMap<String, Instant>) {
        let before = sessions.len();
        sessions.retain(|_, issued| issued.elapsed() < self.session_ttl);
        if sessions.len() < before {
            tracing::debug!(expired = before - sessions.len(), "admin sessions expired");
        }
    }

    fn credentials_match(&self, username: &str, password: &str) -> bool {
        let user_ok = self.username.as_bytes().ct_eq(username.as_bytes());
        let pass_ok = self.password.as_bytes().ct_eq(password.as_bytes());
        bool::from(user_ok & pass_ok)
    }
}

impl Authenticator for CredentialAuthenticator {
    fn is_logged_in(&self, jar: &CookieJar) -> bool {
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return false;
        };
        match self.sessions.write() {
            Ok(mut s) => {
                self.purge_expired(&mut s);
                s.contains_key(cookie.value())
            }
            Err(_) => false,
        }
    }

    fn log_in(&self, jar: CookieJar, username: &str, password: &str) -> (CookieJar, bool) {
        if !self.credentials_match(username, password) {
            tracing::warn!(username = %username, "rejected admin login");
            return (jar, false);
        }
        let token = uuid::Uuid::new_v4().to_string();
        match self.sessions.write() {
            Ok(mut s) => {
                self.purge_expired(&mut s);
                s.insert(token.clone(), Instant::now());
            }
            Err(_) => {
                tracing::error!("session store lock poisoned");
                return (jar, false);
            }
        }
        tracing::info!(username = %username, "admin logged in");
        let cookie = Cookie::build((SESSION_COOKIE, token))
            .path(self.cookie_path.clone())
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();
        (jar.add(cookie), true)
    }

    fn log_out(&self, jar: CookieJar) -> CookieJar {
        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            if let Ok(mut s) = self.sessions.write() {
                s.remove(cookie.value());
            }
        }
        jar.remove(Cookie::build(SESSION_COOKIE).path(self.cookie_path.clone()))
    }
}
