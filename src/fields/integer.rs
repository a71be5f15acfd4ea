use super::{empty_input, BaseField, Field, InvalidInput};
use crate::sql::FieldValue;
use html_escape::encode_double_quoted_attribute;
use std::fmt;

#[derive(Clone, Debug)]
pub struct IntegerField {
    base: BaseField,
    min: Option<i64>,
    max: Option<i64>,
}

impl IntegerField {
    pub fn new(base: BaseField) -> Self {
        IntegerField {
            base,
            min: None,
            max: None,
        }
    }

    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }
}

impl Field for IntegerField {
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
        let name = self.base.attr_name();
        let mut bounds = String::new();
        if let Some(min) = self.min {
            bounds.push_str(&format!(r#" min="{}""#, min));
        }
        if let Some(max) = self.max {
            bounds.push_str(&format!(r#" max="{}""#, max));
        }
        let control = format!(
            r#"<input id="{name}" name="{name}" type="number" step="1" class="form-control" value="{}"{bounds}>"#,
            encode_double_quoted_attribute(&self.base.input_text(value))
        );
        self.base.base_render(out, &control, error, start_row)
    }

    fn validate(&self, raw: &str) -> Result<FieldValue, InvalidInput> {
        let s = raw.trim();
        if s.is_empty() {
            return empty_input(&self.base);
        }
        let n: i64 = s.parse().map_err(|_| InvalidInput::NotAnInteger)?;
        if let Some(min) = self.min {
            if n < min {
                return Err(InvalidInput::TooSmall(min.to_string()));
            }
        }
        if let Some(max) = self.max {
            if n > max {
                return Err(InvalidInput::TooLarge(max.to_string()));
            }
        }
        Ok(FieldValue::Int(n))
    }

    fn sql_type(&self) -> &'static str {
        "int8"
    }

    fn render_read_only(&self, value: &FieldValue) -> String {
        super::escaped_display(value)
    }
}
