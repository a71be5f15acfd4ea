//! Renderer collaborator: executes a named page template against a context map.
//!
//! Context values under `form` and `results[].cells` are HTML produced by
//! fields (already escaped); everything else is escaped here.

use crate::error::AppError;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use serde_json::{Map, Value};
use std::fmt::Write;

pub type Context = Map<String, Value>;

pub trait Renderer: Send + Sync {
    fn render(&self, template: &str, ctx: &Context) -> Result<String, AppError>;
}

/// Built-in bootstrap pages: `login.html`, `index.html`, `list.html`, `edit.html`.
#[derive(Clone, Debug, Default)]
pub struct HtmlRenderer;

fn s<'a>(ctx: &'a Context, key: &str) -> &'a str {
    ctx.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Index URL: the mount point itself, or "/" when mounted at the root.
fn home(ctx: &Context) -> &str {
    match s(ctx, "path") {
        "" => "/",
        p => p,
    }
}

fn items<'a>(v: Option<&'a Value>) -> &'a [Value] {
    v.and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

impl Renderer for HtmlRenderer {
    fn render(&self, template: &str, ctx: &Context) -> Result<String, AppError> {
        let body = match template {
            "login.html" => login(ctx),
            "index.html" => index(ctx),
            "list.html" => list(ctx),
            "edit.html" => edit(ctx),
            other => return Err(AppError::Render(format!("unknown template {}", other))),
        }
        .map_err(|e| AppError::Render(format!("{}: {}", template, e)))?;
        layout(ctx, &body).map_err(|e| AppError::Render(format!("{}: {}", template, e)))
    }
}

fn layout(ctx: &Context, body: &str) -> Result<String, std::fmt::Error> {
    let title = s(ctx, "title");
    let path = s(ctx, "path");
    let anonymous = ctx.get("anonymous").and_then(Value::as_bool).unwrap_or(false);
    let mut out = String::new();
    writeln!(out, "<!DOCTYPE html>\n<html>\n<head>")?;
    writeln!(out, r#"<meta charset="utf-8"><title>{}</title>"#, text(title))?;
    writeln!(
        out,
        r#"<link rel="stylesheet" href="https://maxcdn.bootstrapcdn.com/bootstrap/3.3.7/css/bootstrap.min.css">"#
    )?;
    writeln!(out, "</head>\n<body>")?;
    writeln!(out, r#"<nav class="navbar navbar-default"><div class="container">"#)?;
    writeln!(
        out,
        r#"<a class="navbar-brand" href="{}">{}</a>"#,
        attr(home(ctx)),
        text(title)
    )?;
    if !anonymous {
        writeln!(
            out,
            r#"<a class="btn btn-default navbar-btn navbar-right" href="{}/logout">Log out</a>"#,
            attr(path)
        )?;
    }
    writeln!(out, "</div></nav>")?;
    writeln!(out, r#"<div class="container">"#)?;
    out.push_str(body);
    writeln!(out, "</div>\n</body>\n</html>")?;
    Ok(out)
}

fn login(ctx: &Context) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        r#"<form method="post" action="{}" class="col-sm-4 col-sm-offset-4">"#,
        attr(home(ctx))
    )?;
    if ctx.get("failed").and_then(Value::as_bool).unwrap_or(false) {
        writeln!(out, r#"<div class="alert alert-danger">Wrong username or password.</div>"#)?;
    }
    writeln!(out, r#"<div class="form-group"><label for="username">Username</label><input id="username" name="username" class="form-control"></div>"#)?;
    writeln!(out, r#"<div class="form-group"><label for="password">Password</label><input id="password" name="password" type="password" class="form-control"></div>"#)?;
    writeln!(out, r#"<button type="submit" class="btn btn-primary">Log in</button>"#)?;
    writeln!(out, "</form>")?;
    Ok(out)
}

fn index(ctx: &Context) -> Result<String, std::fmt::Error> {
    let path = s(ctx, "path");
    let mut out = String::new();
    for group in items(ctx.get("groups")) {
        let name = group.get("name").and_then(Value::as_str).unwrap_or("");
        writeln!(out, r#"<div class="panel panel-default">"#)?;
        writeln!(out, r#"<div class="panel-heading">{}</div>"#, text(name))?;
        writeln!(out, r#"<div class="list-group">"#)?;
        for m in items(group.get("models")) {
            let slug = m.get("slug").and_then(Value::as_str).unwrap_or("");
            let mname = m.get("name").and_then(Value::as_str).unwrap_or(slug);
            writeln!(
                out,
                r#"<a class="list-group-item" href="{}/{}">{}</a>"#,
                attr(path),
                attr(slug),
                text(mname)
            )?;
        }
        writeln!(out, "</div></div>")?;
    }
    Ok(out)
}

fn list(ctx: &Context) -> Result<String, std::fmt::Error> {
    let path = s(ctx, "path");
    let slug = s(ctx, "slug");
    let mut out = String::new();
    writeln!(
        out,
        r#"<h2>{} <a class="btn btn-primary pull-right" href="{}/{}/edit">Add</a></h2>"#,
        text(s(ctx, "name")),
        attr(path),
        attr(slug)
    )?;
    writeln!(out, r#"<table class="table table-striped">"#)?;
    out.push_str("<thead><tr>");
    for col in items(ctx.get("columns")) {
        let label = col
            .get("label")
            .or_else(|| col.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("");
        write!(out, "<th>{}</th>", text(label))?;
    }
    writeln!(out, "</tr></thead>\n<tbody>")?;
    for row in items(ctx.get("results")) {
        let id = row.get("id").and_then(Value::as_i64).unwrap_or(0);
        out.push_str("<tr>");
        for (i, cell) in items(row.get("cells")).iter().enumerate() {
            let html = cell.as_str().unwrap_or("");
            if i == 0 {
                write!(out, r#"<td><a href="{}/{}/edit/{}">{}</a></td>"#, attr(path), attr(slug), id, html)?;
            } else {
                write!(out, "<td>{}</td>", html)?;
            }
        }
        writeln!(out, "</tr>")?;
    }
    writeln!(out, "</tbody>\n</table>")?;
    Ok(out)
}

fn edit(ctx: &Context) -> Result<String, std::fmt::Error> {
    let path = s(ctx, "path");
    let slug = s(ctx, "slug");
    let id = ctx.get("id").and_then(Value::as_i64).unwrap_or(0);
    let action = if id == 0 {
        format!("{}/{}/edit", path, slug)
    } else {
        format!("{}/{}/edit/{}", path, slug, id)
    };
    let mut out = String::new();
    writeln!(
        out,
        "<h2>{} {}</h2>",
        if id == 0 { "New" } else { "Edit" },
        text(s(ctx, "name"))
    )?;
    if ctx.get("errors").and_then(Value::as_bool).unwrap_or(false) {
        writeln!(out, r#"<div class="alert alert-danger">Please correct the errors below.</div>"#)?;
    }
    writeln!(out, r#"<form method="post" action="{}">"#, attr(&action))?;
    out.push_str(s(ctx, "form"));
    writeln!(out, r#"<div class="row"><div class="col-sm-12">"#)?;
    writeln!(out, r#"<button type="submit" class="btn btn-default">Save and continue editing</button>"#)?;
    writeln!(out, r#"<button type="submit" name="done" value="true" class="btn btn-primary">Save</button>"#)?;
    writeln!(
        out,
        r#"<a class="btn btn-link" href="{}/{}">Cancel</a>"#,
        attr(path),
        attr(slug)
    )?;
    writeln!(out, "</div></div>\n</form>")?;
    Ok(out)
}
