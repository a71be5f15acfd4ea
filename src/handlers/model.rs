//! Per-model handlers: list view, new/edit forms, save.

use crate::error::{found, AppError};
use crate::model::Model;
use crate::render::Context;
use crate::service::{CrudEngine, EditForm};
use crate::state::AdminState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

fn model_for(state: &AdminState, slug: &str) -> Result<Arc<Model>, AppError> {
    state
        .registry
        .model(slug)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("model {}", slug)))
}

fn edit_page(
    state: &AdminState,
    model: &Model,
    form: EditForm,
    has_errors: bool,
) -> Result<Html<String>, AppError> {
    let mut ctx = Context::new();
    ctx.insert("id".into(), json!(form.id));
    ctx.insert("name".into(), json!(model.name()));
    ctx.insert("slug".into(), json!(model.slug()));
    ctx.insert("form".into(), Value::String(form.html));
    ctx.insert("errors".into(), Value::Bool(has_errors));
    state.render("edit.html", ctx)
}

pub async fn list(
    State(state): State<AdminState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let model = model_for(&state, &slug)?;
    let rows = CrudEngine::list(state.db.as_ref(), &model).await?;

    let columns: Vec<Value> = model
        .list_columns()
        .iter()
        .filter_map(|name| model.field_by_name(name))
        .map(|f| json!({ "name": f.name, "label": f.field.base().label }))
        .collect();
    let results: Vec<Value> = rows
        .iter()
        .map(|r| json!({ "id": r.id, "cells": CrudEngine::list_cells(&model, r) }))
        .collect();

    let mut ctx = Context::new();
    ctx.insert("name".into(), json!(model.name()));
    ctx.insert("slug".into(), json!(model.slug()));
    ctx.insert("columns".into(), Value::Array(columns));
    ctx.insert("results".into(), Value::Array(results));
    state.render("list.html", ctx)
}

pub async fn new_form(
    State(state): State<AdminState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let model = model_for(&state, &slug)?;
    let form = CrudEngine::edit_form(&model, 0, None, None)?;
    edit_page(&state, &model, form, false)
}

pub async fn edit_form(
    State(state): State<AdminState>,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Html<String>, AppError> {
    let model = model_for(&state, &slug)?;
    let id = CrudEngine::parse_id(&id)?;
    let values = CrudEngine::fetch(state.db.as_ref(), &model, id).await?;
    let form = CrudEngine::edit_form(&model, id, Some(&values), None)?;
    edit_page(&state, &model, form, false)
}

pub async fn save_new(
    State(state): State<AdminState>,
    Path(slug): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let model = model_for(&state, &slug)?;
    save(&state, &model, 0, form).await
}

pub async fn save_existing(
    State(state): State<AdminState>,
    Path((slug, id)): Path<(String, String)>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let model = model_for(&state, &slug)?;
    let id = CrudEngine::parse_id(&id)?;
    save(&state, &model, id, form).await
}

/// Save, then go back to the list when the client sent `done=true`, else to
/// the saved record's form. Validation failures re-render the submitted form.
async fn save(
    state: &AdminState,
    model: &Model,
    id: i64,
    form: HashMap<String, String>,
) -> Result<Response, AppError> {
    match CrudEngine::save(state.db.as_ref(), model, id, &form).await {
        Ok(saved) => {
            let target = if form.get("done").map(String::as_str) == Some("true") {
                state.settings.url(&format!("/{}", model.slug()))
            } else {
                state.settings.url(&format!("/{}/edit/{}", model.slug(), saved))
            };
            Ok(found(&target))
        }
        Err(AppError::Validation(errors)) => {
            tracing::debug!(model = %model.slug(), %errors, "form rejected");
            let submitted = model.submitted_values(&form);
            let page = CrudEngine::edit_form(model, id, Some(&submitted), Some(&errors))?;
            let html = edit_page(state, model, page, true)?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, html).into_response())
        }
        Err(e) => Err(e),
    }
}
