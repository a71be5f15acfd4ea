use super::{BaseField, Field, InvalidInput};
use crate::sql::FieldValue;
use html_escape::{encode_double_quoted_attribute, encode_text};
use regex::Regex;
use std::fmt;

#[derive(Clone, Debug)]
pub struct TextField {
    base: BaseField,
    max_length: Option<usize>,
    pattern: Option<Regex>,
    multiline: bool,
}

impl TextField {
    pub fn new(base: BaseField) -> Self {
        TextField {
            base,
            max_length: None,
            pattern: None,
            multiline: false,
        }
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Anchored implicitly: the whole input must match.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Regex::new(&format!("^(?:{})$", pattern))?);
        Ok(self)
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }
}

impl Field for TextField {
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
        let text = self.base.input_text(value);
        let maxlength = self
            .max_length
            .map(|n| format!(r#" maxlength="{}""#, n))
            .unwrap_or_default();
        let control = if self.multiline {
            format!(
                r#"<textarea id="{name}" name="{name}" class="form-control" rows="5"{maxlength}>{}</textarea>"#,
                encode_text(&text)
            )
        } else {
            format!(
                r#"<input id="{name}" name="{name}" type="text" class="form-control" value="{}"{maxlength}>"#,
                encode_double_quoted_attribute(&text)
            )
        };
        self.base.base_render(out, &control, error, start_row)
    }

    /// Surrounding whitespace is never stored; length and pattern apply to the trimmed text.
    fn validate(&self, raw: &str) -> Result<FieldValue, InvalidInput> {
        let s = raw.trim();
        if s.is_empty() {
            if self.base.required {
                return Err(InvalidInput::Required);
            }
            return Ok(FieldValue::Text(String::new()));
        }
        if let Some(max) = self.max_length {
            if s.chars().count() > max {
                return Err(InvalidInput::TooLong(max));
            }
        }
        if let Some(re) = &self.pattern {
            if !re.is_match(s) {
                return Err(InvalidInput::PatternMismatch);
            }
        }
        Ok(FieldValue::Text(s.to_string()))
    }

    fn sql_type(&self) -> &'static str {
        "text"
    }

    fn render_read_only(&self, value: &FieldValue) -> String {
        super::escaped_display(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank() {
        let f = TextField::new(BaseField::new("title").required());
        assert_eq!(f.validate("   "), Err(InvalidInput::Required));
        assert_eq!(f.validate("Hello"), Ok(FieldValue::Text("Hello".into())));
    }

    #[test]
    fn optional_blank_is_empty_text() {
        let f = TextField::new(BaseField::new("subtitle"));
        assert_eq!(f.validate(""), Ok(FieldValue::Text(String::new())));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let f = TextField::new(BaseField::new("subtitle")).max_length(3);
        assert_eq!(f.validate("   "), Ok(FieldValue::Text(String::new())));
        assert_eq!(f.validate("  abc \n"), Ok(FieldValue::Text("abc".into())));
        assert_eq!(f.validate(" a b "), Ok(FieldValue::Text("a b".into())));
    }

    #[test]
    fn length_counts_chars() {
        let f = TextField::new(BaseField::new("code")).max_length(3);
        assert_eq!(f.validate("äöü"), Ok(FieldValue::Text("äöü".into())));
        assert_eq!(f.validate("abcd"), Err(InvalidInput::TooLong(3)));
    }

    #[test]
    fn pattern_must_match_whole_input() {
        let f = TextField::new(BaseField::new("sku"))
            .pattern("[A-Z]{3}-[0-9]+")
            .unwrap();
        assert!(f.validate("ABC-12").is_ok());
        assert_eq!(f.validate("xABC-12"), Err(InvalidInput::PatternMismatch));
    }

    #[test]
    fn render_escapes_submitted_text() {
        let f = TextField::new(BaseField::new("title"));
        let mut out = String::new();
        f.render(
            &mut out,
            Some(&FieldValue::Text(r#""><script>"#.into())),
            None,
            true,
        )
        .unwrap();
        assert!(out.contains("&quot;"));
        assert!(!out.contains(r#""><script>"#));
    }

    #[test]
    fn multiline_renders_textarea() {
        let f = TextField::new(BaseField::new("body")).multiline();
        let mut out = String::new();
        f.render(&mut out, Some(&FieldValue::Text("a < b".into())), None, false)
            .unwrap();
        assert!(out.contains("<textarea"));
        assert!(out.contains("a &lt; b</textarea>"));
    }
}
