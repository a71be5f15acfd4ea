use super::{empty_input, BaseField, Field, InvalidInput};
use crate::sql::FieldValue;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt;

/// One stored value out of a fixed list, rendered as a `<select>`.
#[derive(Clone, Debug)]
pub struct ChoiceField {
    base: BaseField,
    /// (stored value, display label) in display order.
    options: Vec<(String, String)>,
}

impl ChoiceField {
    pub fn new(base: BaseField, options: Vec<(String, String)>) -> Self {
        ChoiceField { base, options }
    }

    pub fn options(&self) -> &[(String, String)] {
        &self.options
    }

    fn label_for(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, l)| l.as_str())
    }
}

impl Field for ChoiceField {
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
        let current = self.base.input_text(value);
        let mut control = format!(r#"<select id="{name}" name="{name}" class="form-control">"#);
        if !self.base.required {
            control.push_str(r#"<option value="">---</option>"#);
        }
        for (v, label) in &self.options {
            control.push_str(&format!(
                r#"<option value="{}"{}>{}</option>"#,
                encode_double_quoted_attribute(v),
                if *v == current { " selected" } else { "" },
                encode_text(label)
            ));
        }
        control.push_str("</select>");
        self.base.base_render(out, &control, error, start_row)
    }

    fn validate(&self, raw: &str) -> Result<FieldValue, InvalidInput> {
        if raw.is_empty() {
            return empty_input(&self.base);
        }
        if self.label_for(raw).is_some() {
            Ok(FieldValue::Text(raw.to_string()))
        } else {
            Err(InvalidInput::UnknownChoice)
        }
    }

    fn sql_type(&self) -> &'static str {
        "text"
    }

    fn render_read_only(&self, value: &FieldValue) -> String {
        let stored = value.form_string();
        let shown = self.label_for(&stored).unwrap_or(&stored);
        encode_text(shown).into_owned()
    }
}
