//! Config validation: uniqueness, references and per-kind constraints.

use crate::case::{is_identifier, to_snake_case};
use crate::config::{FieldKindConfig, ModelConfig, ModelsConfig};
use crate::error::ConfigError;
use crate::model::ID_COLUMN;
use std::collections::HashSet;

pub fn validate(config: &ModelsConfig) -> Result<(), ConfigError> {
    if config.groups.iter().all(|g| g.models.is_empty()) {
        return Err(ConfigError::Validation("at least one model required".into()));
    }
    let mut slugs = HashSet::new();
    for group in &config.groups {
        for model in &group.models {
            let slug = model
                .slug
                .clone()
                .unwrap_or_else(|| to_snake_case(&model.name));
            if !slugs.insert(slug.clone()) {
                return Err(ConfigError::Duplicate {
                    kind: "slug",
                    name: slug,
                });
            }
            validate_model(model)?;
        }
    }
    Ok(())
}

fn validate_model(model: &ModelConfig) -> Result<(), ConfigError> {
    if !model.table.split('.').all(is_identifier) {
        return Err(ConfigError::InvalidIdentifier(model.table.clone()));
    }
    if model.fields.is_empty() {
        return Err(ConfigError::Validation(format!(
            "model {} has no fields",
            model.name
        )));
    }

    let mut names = HashSet::new();
    for f in &model.fields {
        if !names.insert(f.name.as_str()) {
            return Err(ConfigError::Duplicate {
                kind: "field",
                name: format!("{}.{}", model.name, f.name),
            });
        }
        let column = f.column.clone().unwrap_or_else(|| to_snake_case(&f.name));
        if !is_identifier(&column) {
            return Err(ConfigError::InvalidIdentifier(column));
        }
        if column == ID_COLUMN {
            return Err(ConfigError::Validation(format!(
                "{}.{}: '{}' is the implicit identity column",
                model.name, f.name, ID_COLUMN
            )));
        }
        if let Some(w) = f.width {
            if !(1..=12).contains(&w) {
                return Err(ConfigError::Validation(format!(
                    "{}.{}: width must be 1..=12, got {}",
                    model.name, f.name, w
                )));
            }
        }
        validate_kind(&model.name, &f.name, &f.kind)?;
    }

    for col in &model.list_columns {
        if !names.contains(col.as_str()) {
            return Err(ConfigError::MissingReference {
                kind: "list column",
                id: format!("{}.{}", model.name, col),
            });
        }
    }
    Ok(())
}

fn validate_kind(model: &str, field: &str, kind: &FieldKindConfig) -> Result<(), ConfigError> {
    let bad = |msg: &str| ConfigError::Validation(format!("{}.{}: {}", model, field, msg));
    match kind {
        FieldKindConfig::Integer {
            min: Some(min),
            max: Some(max),
        } if min > max => Err(bad("min exceeds max")),
        FieldKindConfig::Float {
            min: Some(min),
            max: Some(max),
        } if min > max => Err(bad("min exceeds max")),
        FieldKindConfig::Choice { options } => {
            if options.is_empty() {
                return Err(bad("choice needs at least one option"));
            }
            let mut values = HashSet::new();
            for o in options {
                if o.value.is_empty() {
                    return Err(bad("choice values must be non-empty"));
                }
                if !values.insert(o.value.as_str()) {
                    return Err(bad("duplicate choice value"));
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
