//! HTTP handlers for the index/login page and per-model admin views.

pub mod index;
pub mod model;
pub use index::*;
pub use model::*;
