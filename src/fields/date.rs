use super::{empty_input, BaseField, Field, InvalidInput};
use crate::sql::FieldValue;
use chrono::NaiveDate;
use html_escape::encode_double_quoted_attribute;
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar date without time zone, submitted as `YYYY-MM-DD`.
#[derive(Clone, Debug)]
pub struct DateField {
    base: BaseField,
}

impl DateField {
    pub fn new(base: BaseField) -> Self {
        DateField { base }
    }
}

impl Field for DateField {
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
        let control = format!(
            r#"<input id="{name}" name="{name}" type="date" class="form-control" value="{}">"#,
            encode_double_quoted_attribute(&self.base.input_text(value))
        );
        self.base.base_render(out, &control, error, start_row)
    }

    fn validate(&self, raw: &str) -> Result<FieldValue, InvalidInput> {
        let s = raw.trim();
        if s.is_empty() {
            return empty_input(&self.base);
        }
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(FieldValue::Date)
            .map_err(|_| InvalidInput::NotADate)
    }

    fn sql_type(&self) -> &'static str {
        "date"
    }

    fn render_read_only(&self, value: &FieldValue) -> String {
        match value {
            FieldValue::Date(d) => d.format(DATE_FORMAT).to_string(),
            other => super::escaped_display(other),
        }
    }
}
