use super::{BaseField, Field, InvalidInput};
use crate::sql::FieldValue;
use std::fmt;

/// Checkbox-backed boolean. An unchecked box submits nothing, so empty input is `false`.
#[derive(Clone, Debug)]
pub struct BooleanField {
    base: BaseField,
}

impl BooleanField {
    pub fn new(base: BaseField) -> Self {
        BooleanField { base }
    }
}

/// Boolean literal spellings; anything unrecognised is an error, not `false`.
pub(crate) fn parse_bool(raw: &str) -> Result<bool, InvalidInput> {
    let s = raw.trim();
    if s.is_empty() {
        return Ok(false);
    }
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "on" | "yes" => Ok(true),
        "false" | "f" | "0" | "off" | "no" => Ok(false),
        _ => Err(InvalidInput::NotABoolean),
    }
}

fn is_checked(value: &FieldValue) -> bool {
    match value {
        FieldValue::Bool(b) => *b,
        FieldValue::Int(n) => *n == 1,
        FieldValue::Text(s) => parse_bool(s).unwrap_or(false),
        _ => false,
    }
}

impl Field for BooleanField {
    fn base(&self) -> &BaseField {
        &self.base
    }

    fn render(
        &self,
        out: &mut dyn fmt::Write,
        value: Option<&FieldValue>,
        error: Option<&str>,
        start_row: bool,
    ) -> fmt::Result {
        let checked = match value {
            Some(v) => is_checked(v),
            None => self
                .base
                .default
                .as_deref()
                .map(|d| parse_bool(d).unwrap_or(false))
                .unwrap_or(false),
        };
        let name = self.base.attr_name();
        let control = format!(
            r#"<input id="{name}" name="{name}" type="checkbox" value="true" class="form-control"{}>"#,
            if checked { " checked" } else { "" }
        );
        self.base.base_render(out, &control, error, start_row)
    }

    fn validate(&self, raw: &str) -> Result<FieldValue, InvalidInput> {
        parse_bool(raw).map(FieldValue::Bool)
    }

    fn sql_type(&self) -> &'static str {
        "bool"
    }

    fn render_read_only(&self, value: &FieldValue) -> String {
        let glyph = match value {
            FieldValue::Bool(true) | FieldValue::Int(1) => "text-success glyphicon-ok",
            _ => "text-danger glyphicon-remove",
        };
        format!(r#"<span class="glyphicon {}"></span>"#, glyph)
    }
}
