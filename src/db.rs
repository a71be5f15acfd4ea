//! Database collaborator: the engine only issues "execute" and "query" with bound parameters.

use crate::error::AppError;
use crate::sql::FieldValue;
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// Rows are positional: cell `i` is column `i` of the statement's select list.
pub type Rows = Vec<Vec<FieldValue>>;

#[async_trait]
pub trait Database: Send + Sync {
    /// Run a statement; returns rows affected.
    async fn execute(&self, sql: &str, params: &[FieldValue]) -> Result<u64, AppError>;

    async fn query(&self, sql: &str, params: &[FieldValue]) -> Result<Rows, AppError>;

    /// Round trip used by the readiness check.
    async fn ping(&self) -> Result<(), AppError> {
        self.query("SELECT 1", &[]).await.map(|_| ())
    }
}

/// [`Database`] over a sqlx PostgreSQL pool. Each call is a single auto-committed statement.
#[derive(Clone)]
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    pub fn new(pool: PgPool) -> Self {
        PgDatabase { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Database for PgDatabase {
    async fn execute(&self, sql: &str, params: &[FieldValue]) -> Result<u64, AppError> {
        tracing::debug!(sql = %sql, params = ?params, "execute");
        let mut query = sqlx::query(sql);
        for p in params {
            query = query.bind(p.clone());
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn query(&self, sql: &str, params: &[FieldValue]) -> Result<Rows, AppError> {
        tracing::debug!(sql = %sql, params = ?params, "query");
        let mut query = sqlx::query(sql);
        for p in params {
            query = query.bind(p.clone());
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(row_values).collect()
    }
}

fn row_values(row: &PgRow) -> Result<Vec<FieldValue>, AppError> {
    (0..row.len()).map(|i| cell_value(row, i)).collect()
}

/// Decode one cell by its PostgreSQL type. Selects cast every column to its
/// field's type, so a type outside this list is a statement error, never `Null`.
fn cell_value(row: &PgRow, i: usize) -> Result<FieldValue, AppError> {
    let raw = row.try_get_raw(i)?;
    if raw.is_null() {
        return Ok(FieldValue::Null);
    }
    let ty = raw.type_info().name().to_string();
    let value = match ty.as_str() {
        "INT8" => FieldValue::Int(row.try_get::<i64, _>(i)?),
        "INT4" => FieldValue::Int(row.try_get::<i32, _>(i)?.into()),
        "INT2" => FieldValue::Int(row.try_get::<i16, _>(i)?.into()),
        "BOOL" => FieldValue::Bool(row.try_get::<bool, _>(i)?),
        "FLOAT8" => FieldValue::Float(row.try_get::<f64, _>(i)?),
        "FLOAT4" => FieldValue::Float(row.try_get::<f32, _>(i)?.into()),
        "DATE" => FieldValue::Date(row.try_get::<chrono::NaiveDate, _>(i)?),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => FieldValue::Text(row.try_get::<String, _>(i)?),
        other => {
            return Err(AppError::Statement(format!(
                "column {} has unsupported type {}",
                row.column(i).name(),
                other
            )))
        }
    };
    Ok(value)
}
