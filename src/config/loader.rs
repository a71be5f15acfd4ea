//! Load the models JSON and resolve it into an [`AdminRegistry`].

use crate::config::{validate, FieldConfig, FieldKindConfig, ModelsConfig};
use crate::error::ConfigError;
use crate::fields::{
    BaseField, BooleanField, ChoiceField, DateField, Field, FloatField, IntegerField, TextField,
};
use crate::model::Model;
use crate::registry::AdminRegistry;
use std::path::Path;
use std::sync::Arc;

pub fn parse_models(json: &str) -> Result<ModelsConfig, ConfigError> {
    serde_json::from_str(json).map_err(|e| ConfigError::Load(e.to_string()))
}

pub async fn load_from_path(path: impl AsRef<Path>) -> Result<ModelsConfig, ConfigError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    parse_models(&text)
}

/// Build the registry from config (validates first).
pub fn resolve(config: &ModelsConfig) -> Result<AdminRegistry, ConfigError> {
    validate(config)?;
    let mut builder = AdminRegistry::builder();
    for group in &config.groups {
        let mut models = Vec::with_capacity(group.models.len());
        for mc in &group.models {
            let mut mb = Model::builder(&mc.name, &mc.table);
            if let Some(slug) = &mc.slug {
                mb = mb.slug(slug);
            }
            for fc in &mc.fields {
                mb = mb.field_arc(build_field(fc)?, fc.column.clone());
            }
            if !mc.list_columns.is_empty() {
                mb = mb.list_columns(mc.list_columns.iter().cloned());
            }
            models.push(mb.build()?);
        }
        tracing::debug!(group = %group.name, models = models.len(), "resolved model group");
        builder = builder.group(&group.name, models);
    }
    builder.build()
}

fn default_raw(name: &str, v: &serde_json::Value) -> Result<String, ConfigError> {
    match v {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(ConfigError::Validation(format!(
            "{}: default must be a string, number or boolean; got {}",
            name, other
        ))),
    }
}

pub fn build_field(fc: &FieldConfig) -> Result<Arc<dyn Field>, ConfigError> {
    let mut base = BaseField::new(&fc.name);
    if let Some(label) = &fc.label {
        base = base.label(label);
    }
    if fc.required {
        base = base.required();
    }
    if let Some(w) = fc.width {
        base = base.width(w);
    }
    if let Some(help) = &fc.help {
        base = base.help(help);
    }
    if let Some(d) = &fc.default {
        base = base.default_value(default_raw(&fc.name, d)?);
    }

    let field: Arc<dyn Field> = match &fc.kind {
        FieldKindConfig::Boolean => Arc::new(BooleanField::new(base)),
        FieldKindConfig::Text {
            max_length,
            pattern,
            multiline,
        } => {
            let mut f = TextField::new(base);
            if let Some(max) = max_length {
                f = f.max_length(*max);
            }
            if let Some(p) = pattern {
                f = f.pattern(p).map_err(|e| {
                    ConfigError::Validation(format!("{}: invalid pattern: {}", fc.name, e))
                })?;
            }
            if *multiline {
                f = f.multiline();
            }
            Arc::new(f)
        }
        FieldKindConfig::Integer { min, max } => {
            let mut f = IntegerField::new(base);
            if let Some(min) = min {
                f = f.min(*min);
            }
            if let Some(max) = max {
                f = f.max(*max);
            }
            Arc::new(f)
        }
        FieldKindConfig::Float { min, max } => {
            let mut f = FloatField::new(base);
            if let Some(min) = min {
                f = f.min(*min);
            }
            if let Some(max) = max {
                f = f.max(*max);
            }
            Arc::new(f)
        }
        FieldKindConfig::Date => Arc::new(DateField::new(base)),
        FieldKindConfig::Choice { options } => Arc::new(ChoiceField::new(
            base,
            options
                .iter()
                .map(|o| (o.value.clone(), o.label.clone().unwrap_or_else(|| o.value.clone())))
                .collect(),
        )),
    };

    if let Some(raw) = &field.base().default {
        field.validate(raw).map_err(|e| {
            ConfigError::Validation(format!("{}: default '{}' rejected: {}", fc.name, raw, e))
        })?;
    }
    Ok(field)
}
