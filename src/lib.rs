//! Admin console: metadata-driven list views, edit forms, validation and persistence.

pub mod auth;
pub mod case;
pub mod config;
pub mod db;
pub mod error;
pub mod fields;
pub mod handlers;
pub mod logging;
pub mod model;
pub mod registry;
pub mod render;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;

pub use auth::{Authenticator, CredentialAuthenticator};
pub use config::{load_from_path, parse_models, resolve, AdminSettings, ModelsConfig};
pub use db::{Database, PgDatabase, Rows};
pub use error::{AppError, ConfigError, FieldError, ValidationErrors};
pub use fields::{BaseField, Field, InvalidInput};
pub use model::Model;
pub use registry::AdminRegistry;
pub use render::{HtmlRenderer, Renderer};
pub use routes::{admin_routes, common_routes};
pub use service::CrudEngine;
pub use sql::FieldValue;
pub use state::AdminState;
