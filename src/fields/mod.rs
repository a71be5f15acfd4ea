//! Field type system: each kind renders its own control, validates submitted
//! text into a typed value, and renders stored values read-only for list views.

mod boolean;
mod choice;
mod date;
mod float;
mod integer;
mod text;

pub use boolean::BooleanField;
pub use choice::ChoiceField;
pub use date::DateField;
pub use float::FloatField;
pub use integer::IntegerField;
pub use text::TextField;

use crate::case::to_label;
use crate::sql::FieldValue;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt;
use thiserror::Error;

/// Why a submitted string was rejected by a field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("this field is required")]
    Required,
    #[error("not a boolean")]
    NotABoolean,
    #[error("not an integer")]
    NotAnInteger,
    #[error("not a number")]
    NotANumber,
    #[error("must be at least {0}")]
    TooSmall(String),
    #[error("must be at most {0}")]
    TooLarge(String),
    #[error("must be at most {0} characters")]
    TooLong(usize),
    #[error("does not match the required pattern")]
    PatternMismatch,
    #[error("not a date (expected YYYY-MM-DD)")]
    NotADate,
    #[error("not one of the allowed choices")]
    UnknownChoice,
}

/// A typed, self-describing unit of input and output for one model attribute.
///
/// Implementations hold configuration only. `validate` is total: every input
/// string maps to a value or an [`InvalidInput`], never to a silent default.
pub trait Field: Send + Sync {
    /// Configuration shared by every kind (name, label, required, default, width).
    fn base(&self) -> &BaseField;

    /// Write an editable control bound to the field's name. `value` is the
    /// stored or re-submitted value (`None` for a new record), `error` a prior
    /// validation message to show inline.
    fn render(
        &self,
        out: &mut dyn fmt::Write,
        value: Option<&FieldValue>,
        error: Option<&str>,
        start_row: bool,
    ) -> fmt::Result;

    fn validate(&self, raw: &str) -> Result<FieldValue, InvalidInput>;

    /// Presentation-only HTML for list views.
    fn render_read_only(&self, value: &FieldValue) -> String;

    /// PostgreSQL type the column is read as. Selects cast to it, so `numeric`
    /// or `varchar` columns decode into the value this field validates to.
    fn sql_type(&self) -> &'static str;
}

#[derive(Clone, Debug)]
pub struct BaseField {
    pub name: String,
    pub label: String,
    pub required: bool,
    /// Raw default shown in the form of a new record; checked against `validate` at load time.
    pub default: Option<String>,
    /// Bootstrap grid columns, 1..=12.
    pub width: u8,
    pub help: Option<String>,
}

impl BaseField {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        BaseField {
            label: to_label(&name),
            name,
            required: false,
            default: None,
            width: 12,
            help: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, raw: impl Into<String>) -> Self {
        self.default = Some(raw.into());
        self
    }

    pub fn width(mut self, width: u8) -> Self {
        self.width = width;
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Text to place in the control: the given value, else the default for new records.
    pub fn input_text(&self, value: Option<&FieldValue>) -> String {
        match value {
            Some(v) => v.form_string(),
            None => self.default.clone().unwrap_or_default(),
        }
    }

    /// Escaped name, usable as both `id` and `name` attributes.
    pub fn attr_name(&self) -> String {
        encode_double_quoted_attribute(&self.name).into_owned()
    }

    /// Wrap a control in the form-group markup shared by every field kind.
    pub fn base_render(
        &self,
        out: &mut dyn fmt::Write,
        control: &str,
        error: Option<&str>,
        start_row: bool,
    ) -> fmt::Result {
        let mut classes = format!("form-group col-sm-{}", self.width.clamp(1, 12));
        if start_row {
            classes.push_str(" row-start");
        }
        if error.is_some() {
            classes.push_str(" has-error");
        }
        writeln!(out, r#"<div class="{}">"#, classes)?;
        writeln!(
            out,
            r#"  <label class="control-label" for="{}">{}{}</label>"#,
            self.attr_name(),
            encode_text(&self.label),
            if self.required { " *" } else { "" }
        )?;
        writeln!(out, "  {}", control.trim())?;
        if let Some(err) = error {
            writeln!(out, r#"  <span class="help-block">{}</span>"#, encode_text(err))?;
        }
        if let Some(help) = &self.help {
            writeln!(out, r#"  <p class="help-block">{}</p>"#, encode_text(help))?;
        }
        writeln!(out, "</div>")
    }
}

/// Empty-input policy shared by the scalar kinds: required fails, optional is `Null`.
fn empty_input(base: &BaseField) -> Result<FieldValue, InvalidInput> {
    if base.required {
        Err(InvalidInput::Required)
    } else {
        Ok(FieldValue::Null)
    }
}

/// Read-only text of a plain value; `Null` renders as nothing.
fn escaped_display(value: &FieldValue) -> String {
    encode_text(&value.form_string()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_render_surfaces_error_and_escapes() {
        let base = BaseField::new("title").label("<Title>").required().width(6);
        let mut out = String::new();
        base.base_render(&mut out, "<input>", Some("bad & wrong"), true)
            .unwrap();
        assert!(out.contains(r#"class="form-group col-sm-6 row-start has-error""#));
        assert!(out.contains("&lt;Title&gt; *"));
        assert!(out.contains("bad &amp; wrong"));
    }

    #[test]
    fn input_text_prefers_value_over_default() {
        let base = BaseField::new("n").default_value("5");
        assert_eq!(base.input_text(None), "5");
        assert_eq!(base.input_text(Some(&FieldValue::Int(9))), "9");
        assert_eq!(BaseField::new("n").input_text(None), "");
    }

    #[test]
    fn label_defaults_from_name() {
        assert_eq!(BaseField::new("published_at").label, "Published at");
    }
}
