//! Typed values produced by fields and bound to PostgreSQL statements.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::types::Oid;
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

/// A single typed cell. Each variant binds as its own PostgreSQL type, so a
/// statement never needs casts in its text.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl FieldValue {
    /// Canonical string used in `value="..."` attributes; `Null` is empty.
    pub fn form_string(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Int(n) => n.to_string(),
            FieldValue::Float(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl<'q> Encode<'q, Postgres> for FieldValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            FieldValue::Null => <Option<i32> as Encode<Postgres>>::encode_by_ref(&None, buf)?,
            FieldValue::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf)?,
            FieldValue::Int(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            FieldValue::Float(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            FieldValue::Text(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)?
            }
            FieldValue::Date(d) => <NaiveDate as Encode<Postgres>>::encode_by_ref(d, buf)?,
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            // Oid 0 leaves the parameter type to the server, so NULL fits any column.
            FieldValue::Null => PgTypeInfo::with_oid(Oid(0)),
            FieldValue::Bool(_) => PgTypeInfo::with_name("BOOL"),
            FieldValue::Int(_) => PgTypeInfo::with_name("INT8"),
            FieldValue::Float(_) => PgTypeInfo::with_name("FLOAT8"),
            FieldValue::Text(_) => PgTypeInfo::with_name("TEXT"),
            FieldValue::Date(_) => PgTypeInfo::with_name("DATE"),
        })
    }
}

impl sqlx::Type<Postgres> for FieldValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}
