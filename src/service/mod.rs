//! CrudEngine: generic CRUD over models using the safe SQL builder.

mod crud;
pub use crud::{CrudEngine, EditForm, ListRow};
