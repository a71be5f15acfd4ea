//! Model descriptor: table, ordered fields and list columns. Pure data, no I/O.

use crate::case::{is_identifier, to_snake_case};
use crate::error::{ConfigError, ValidationErrors};
use crate::fields::Field;
use crate::sql::FieldValue;
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Write};
use std::sync::Arc;

/// Name of the implicit identity column. Never declared as a field.
pub const ID_COLUMN: &str = "id";

#[derive(Clone)]
pub struct ModelField {
    pub name: String,
    pub column: String,
    pub field: Arc<dyn Field>,
}

/// One persisted entity. Field order defines both SQL column order and form layout.
#[derive(Clone)]
pub struct Model {
    name: String,
    slug: String,
    table_name: String,
    fields: Vec<ModelField>,
    list_columns: Vec<String>,
}

impl Model {
    pub fn builder(name: impl Into<String>, table_name: impl Into<String>) -> ModelBuilder {
        ModelBuilder {
            name: name.into(),
            slug: None,
            table_name: table_name.into(),
            fields: Vec::new(),
            list_columns: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn fields(&self) -> &[ModelField] {
        &self.fields
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Persisted columns, same order as `field_names`.
    pub fn table_columns(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.column.as_str()).collect()
    }

    /// Field names shown in the list view, in display order.
    pub fn list_columns(&self) -> &[String] {
        &self.list_columns
    }

    pub fn field_by_name(&self, name: &str) -> Option<&ModelField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Write the whole form: one control per field in declared order, packed
    /// into grid rows. `values` is `None` for a new record.
    pub fn render_form(
        &self,
        out: &mut String,
        values: Option<&[FieldValue]>,
        errors: Option<&ValidationErrors>,
    ) -> fmt::Result {
        let mut used: u8 = 0;
        let mut open = false;
        for (i, mf) in self.fields.iter().enumerate() {
            let width = mf.field.base().width.clamp(1, 12);
            let start_row = !open || used + width > 12;
            if start_row {
                if open {
                    out.write_str("</div>\n")?;
                }
                out.write_str("<div class=\"row\">\n")?;
                open = true;
                used = 0;
            }
            used += width;
            let value = values.and_then(|v| v.get(i));
            let error = errors.and_then(|e| e.message_for(&mf.name));
            mf.field.render(out, value, error, start_row)?;
        }
        if open {
            out.write_str("</div>\n")?;
        }
        Ok(())
    }

    /// Raw submission as per-field text values, for re-rendering a rejected form.
    pub fn submitted_values(&self, form: &HashMap<String, String>) -> Vec<FieldValue> {
        self.fields
            .iter()
            .map(|f| FieldValue::Text(form.get(&f.name).cloned().unwrap_or_default()))
            .collect()
    }
}

pub struct ModelBuilder {
    name: String,
    slug: Option<String>,
    table_name: String,
    fields: Vec<(Arc<dyn Field>, Option<String>)>,
    list_columns: Vec<String>,
}

impl ModelBuilder {
    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn field(self, field: impl Field + 'static) -> Self {
        self.field_arc(Arc::new(field), None)
    }

    /// Field persisted under an explicit column name.
    pub fn column(self, field: impl Field + 'static, column: impl Into<String>) -> Self {
        self.field_arc(Arc::new(field), Some(column.into()))
    }

    pub fn field_arc(mut self, field: Arc<dyn Field>, column: Option<String>) -> Self {
        self.fields.push((field, column));
        self
    }

    pub fn list_columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.list_columns = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<Model, ConfigError> {
        if !self.table_name.split('.').all(is_identifier) {
            return Err(ConfigError::InvalidIdentifier(self.table_name));
        }
        if self.fields.is_empty() {
            return Err(ConfigError::Validation(format!(
                "model {} has no fields",
                self.name
            )));
        }
        let slug = self.slug.unwrap_or_else(|| to_snake_case(&self.name));
        if slug.is_empty() || !slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(ConfigError::Validation(format!("invalid slug '{}'", slug)));
        }

        let mut names = HashSet::new();
        let mut columns = HashSet::new();
        let mut fields = Vec::with_capacity(self.fields.len());
        for (field, column) in self.fields {
            let name = field.base().name.clone();
            let column = column.unwrap_or_else(|| to_snake_case(&name));
            if !is_identifier(&column) {
                return Err(ConfigError::InvalidIdentifier(column));
            }
            if column == ID_COLUMN {
                return Err(ConfigError::Validation(format!(
                    "model {}: '{}' is the implicit identity column",
                    self.name, ID_COLUMN
                )));
            }
            if !names.insert(name.clone()) {
                return Err(ConfigError::Duplicate { kind: "field", name });
            }
            if !columns.insert(column.clone()) {
                return Err(ConfigError::Duplicate {
                    kind: "column",
                    name: column,
                });
            }
            fields.push(ModelField {
                name,
                column,
                field,
            });
        }

        let list_columns = if self.list_columns.is_empty() {
            vec![fields[0].name.clone()]
        } else {
            for col in &self.list_columns {
                if !names.contains(col) {
                    return Err(ConfigError::MissingReference {
                        kind: "list column",
                        id: col.clone(),
                    });
                }
            }
            self.list_columns
        };

        Ok(Model {
            name: self.name,
            slug,
            table_name: self.table_name,
            fields,
            list_columns,
        })
    }
}
