//! Generic list / fetch / form / save over any registered model.

use crate::db::Database;
use crate::error::{AppError, FieldError, ValidationErrors};
use crate::model::Model;
use crate::sql::{insert, select_by_id, select_list, update, FieldValue};
use std::collections::HashMap;

/// One list-view row: the id plus every field value in declared order.
#[derive(Clone, Debug, PartialEq)]
pub struct ListRow {
    pub id: i64,
    pub values: Vec<FieldValue>,
}

/// Rendered edit form plus the id it posts back to (0 for a new record).
#[derive(Clone, Debug)]
pub struct EditForm {
    pub id: i64,
    pub html: String,
}

pub struct CrudEngine;

impl CrudEngine {
    /// Every row of the model's table, ordered by id.
    pub async fn list(db: &dyn Database, model: &Model) -> Result<Vec<ListRow>, AppError> {
        let q = select_list(model);
        let rows = db.query(&q.sql, &q.params).await?;
        rows.into_iter().map(|r| split_row(model, r)).collect()
    }

    /// Read-only HTML cells for the model's list columns, in list-column order.
    pub fn list_cells(model: &Model, row: &ListRow) -> Vec<String> {
        model
            .list_columns()
            .iter()
            .filter_map(|name| {
                let i = model.position(name)?;
                let value = row.values.get(i).unwrap_or(&FieldValue::Null);
                Some(model.fields()[i].field.render_read_only(value))
            })
            .collect()
    }

    /// Ids arrive as URL text; anything that is not an integer is simply not found.
    pub fn parse_id(raw: &str) -> Result<i64, AppError> {
        raw.parse()
            .map_err(|_| AppError::NotFound(format!("record {}", raw)))
    }

    /// Field values of one record, identity column stripped.
    pub async fn fetch(
        db: &dyn Database,
        model: &Model,
        id: i64,
    ) -> Result<Vec<FieldValue>, AppError> {
        let q = select_by_id(model, id);
        let row = db
            .query(&q.sql, &q.params)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("{} {}", model.slug(), id)))?;
        Ok(split_row(model, row)?.values)
    }

    /// Form for a new record (`values` = None) or an existing one.
    pub fn edit_form(
        model: &Model,
        id: i64,
        values: Option<&[FieldValue]>,
        errors: Option<&ValidationErrors>,
    ) -> Result<EditForm, AppError> {
        let mut html = String::new();
        model
            .render_form(&mut html, values, errors)
            .map_err(|e| AppError::Render(format!("form for {}: {}", model.name(), e)))?;
        Ok(EditForm { id, html })
    }

    /// Validate every field in declared order. Absent keys count as empty input.
    pub fn validate_form(
        model: &Model,
        form: &HashMap<String, String>,
    ) -> Result<Vec<FieldValue>, ValidationErrors> {
        let mut values = Vec::with_capacity(model.fields().len());
        let mut errors = ValidationErrors::default();
        for mf in model.fields() {
            let raw = form.get(&mf.name).map(String::as_str).unwrap_or("");
            match mf.field.validate(raw) {
                Ok(v) => values.push(v),
                Err(e) => errors.push(FieldError {
                    field: mf.name.clone(),
                    raw: raw.to_string(),
                    message: e.to_string(),
                }),
            }
        }
        if errors.is_empty() {
            Ok(values)
        } else {
            Err(errors)
        }
    }

    /// Insert when `id == 0`, otherwise update that row. Nothing is executed
    /// unless every field validates. Returns the id of the saved record.
    pub async fn save(
        db: &dyn Database,
        model: &Model,
        id: i64,
        form: &HashMap<String, String>,
    ) -> Result<i64, AppError> {
        let values = Self::validate_form(model, form).map_err(AppError::Validation)?;

        let saved_id = if id == 0 {
            let q = insert(model, values)?;
            let rows = db.query(&q.sql, &q.params).await?;
            rows.first()
                .and_then(|r| r.first())
                .and_then(FieldValue::as_i64)
                .ok_or_else(|| {
                    AppError::Statement(format!("insert into {} returned no id", model.table_name()))
                })?
        } else {
            let q = update(model, id, values)?;
            let affected = db.execute(&q.sql, &q.params).await?;
            if affected == 0 {
                return Err(AppError::NotFound(format!("{} {}", model.slug(), id)));
            }
            id
        };
        tracing::info!(model = %model.slug(), id = saved_id, created = id == 0, "record saved");
        Ok(saved_id)
    }
}

/// Split a selected row into id + field values; the shape is fixed by the select list.
fn split_row(model: &Model, row: Vec<FieldValue>) -> Result<ListRow, AppError> {
    let expected = model.fields().len() + 1;
    if row.len() != expected {
        return Err(AppError::Statement(format!(
            "{}: row has {} cells, expected {}",
            model.table_name(),
            row.len(),
            expected
        )));
    }
    let mut cells = row.into_iter();
    let id = cells
        .next()
        .and_then(|c| c.as_i64())
        .ok_or_else(|| AppError::Statement(format!("{}: row without integer id", model.table_name())))?;
    Ok(ListRow {
        id,
        values: cells.collect(),
    })
}
