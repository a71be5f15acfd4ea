//! Builds parameterized SELECT, INSERT and UPDATE statements from a model.

use crate::error::AppError;
use crate::model::{Model, ID_COLUMN};
use crate::sql::FieldValue;

/// Quote identifier for PostgreSQL (safe: only from model config).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Table name, schema-qualified when the model names one ("app.posts").
fn qualified_table(table: &str) -> String {
    table.split('.').map(quoted).collect::<Vec<_>>().join(".")
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<FieldValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: FieldValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// Identity column followed by every persisted column, in declared order.
/// Each column is cast to its field's type (e.g. numeric as float8) so rows
/// decode into exactly the values the fields produce.
fn select_column_list(model: &Model) -> String {
    std::iter::once(format!("{}::int8", quoted(ID_COLUMN)))
        .chain(
            model
                .fields()
                .iter()
                .map(|f| format!("{}::{}", quoted(&f.column), f.field.sql_type())),
        )
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT every row, ordered by id. Row cell 0 is the id, then one cell per field.
pub fn select_list(model: &Model) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_column_list(model),
        qualified_table(model.table_name()),
        quoted(ID_COLUMN)
    );
    q
}

/// SELECT one row by id; id bound as `$1`.
pub fn select_by_id(model: &Model, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(FieldValue::Int(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        select_column_list(model),
        qualified_table(model.table_name()),
        quoted(ID_COLUMN),
        n
    );
    q
}

fn check_arity(model: &Model, values: &[FieldValue]) -> Result<(), AppError> {
    let expected = model.fields().len();
    if values.len() != expected {
        return Err(AppError::Statement(format!(
            "{}: {} values for {} columns",
            model.name(),
            values.len(),
            expected
        )));
    }
    Ok(())
}

/// INSERT naming every column in declared order, one placeholder per column.
/// Returns the new id.
pub fn insert(model: &Model, values: Vec<FieldValue>) -> Result<QueryBuf, AppError> {
    check_arity(model, &values)?;
    let mut q = QueryBuf::new();
    let cols: Vec<String> = model.table_columns().into_iter().map(quoted).collect();
    let placeholders: Vec<String> = values
        .into_iter()
        .map(|v| format!("${}", q.push_param(v)))
        .collect();
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        qualified_table(model.table_name()),
        cols.join(", "),
        placeholders.join(", "),
        quoted(ID_COLUMN)
    );
    Ok(q)
}

/// UPDATE setting every column in declared order; the id is the last parameter.
pub fn update(model: &Model, id: i64, values: Vec<FieldValue>) -> Result<QueryBuf, AppError> {
    check_arity(model, &values)?;
    let mut q = QueryBuf::new();
    let sets: Vec<String> = model
        .table_columns()
        .into_iter()
        .zip(values)
        .map(|(col, v)| format!("{} = ${}", quoted(col), q.push_param(v)))
        .collect();
    let id_param = q.push_param(FieldValue::Int(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${}",
        qualified_table(model.table_name()),
        sets.join(", "),
        quoted(ID_COLUMN),
        id_param
    );
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{BaseField, BooleanField, FloatField, IntegerField, TextField};

    fn abc() -> Model {
        Model::builder("Thing", "app.things")
            .field(TextField::new(BaseField::new("a")))
            .field(TextField::new(BaseField::new("b")))
            .field(TextField::new(BaseField::new("c")))
            .build()
            .unwrap()
    }

    fn vals() -> Vec<FieldValue> {
        vec![
            FieldValue::Text("1".into()),
            FieldValue::Int(2),
            FieldValue::Bool(true),
        ]
    }

    #[test]
    fn insert_names_every_column_in_order() {
        let q = insert(&abc(), vals()).unwrap();
        assert_eq!(
            q.sql,
            r#"INSERT INTO "app"."things" ("a", "b", "c") VALUES ($1, $2, $3) RETURNING "id""#
        );
        assert_eq!(q.params, vals());
    }

    #[test]
    fn update_binds_id_last() {
        let q = update(&abc(), 7, vals()).unwrap();
        assert_eq!(
            q.sql,
            r#"UPDATE "app"."things" SET "a" = $1, "b" = $2, "c" = $3 WHERE "id" = $4"#
        );
        assert_eq!(q.params.len(), 4);
        assert_eq!(q.params[3], FieldValue::Int(7));
        assert!(!q.sql.contains('7'));
    }

    #[test]
    fn selects() {
        let m = abc();
        assert_eq!(
            select_list(&m).sql,
            r#"SELECT "id"::int8, "a"::text, "b"::text, "c"::text FROM "app"."things" ORDER BY "id""#
        );
        let q = select_by_id(&m, 42);
        assert_eq!(
            q.sql,
            r#"SELECT "id"::int8, "a"::text, "b"::text, "c"::text FROM "app"."things" WHERE "id" = $1"#
        );
        assert_eq!(q.params, vec![FieldValue::Int(42)]);
    }

    #[test]
    fn select_casts_each_column_to_its_field_type() {
        let m = Model::builder("Product", "products")
            .field(FloatField::new(BaseField::new("price")))
            .field(IntegerField::new(BaseField::new("stock")))
            .column(BooleanField::new(BaseField::new("visible")), "is_visible")
            .build()
            .unwrap();
        assert_eq!(
            select_list(&m).sql,
            r#"SELECT "id"::int8, "price"::float8, "stock"::int8, "is_visible"::bool FROM "products" ORDER BY "id""#
        );
    }

    #[test]
    fn arity_mismatch_is_a_statement_error() {
        let err = insert(&abc(), vec![FieldValue::Null]).unwrap_err();
        assert!(matches!(err, AppError::Statement(_)));
    }

    #[test]
    fn quoting_doubles_embedded_quotes() {
        assert_eq!(quoted(r#"we"ird"#), r#""we""ird""#);
    }
}
