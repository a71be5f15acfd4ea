pub mod types;
pub mod loader;
pub mod validator;
pub mod settings;

pub use types::*;
pub use loader::*;
pub use validator::*;
pub use settings::*;
