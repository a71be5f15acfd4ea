mod admin;
mod common;

pub use admin::{admin_routes, check_access, FORM_BODY_LIMIT};
pub use common::common_routes;
