//! Slug → model mapping, built once at startup and read-only afterwards.

use crate::error::ConfigError;
use crate::model::Model;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Admin paths that a model slug would shadow.
const RESERVED_SLUGS: &[&str] = &["logout"];

/// Dashboard entry for one model.
#[derive(Clone, Debug, Serialize)]
pub struct ModelLink {
    pub name: String,
    pub slug: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ModelGroup {
    pub name: String,
    pub models: Vec<ModelLink>,
}

#[derive(Clone, Default)]
pub struct AdminRegistry {
    models: HashMap<String, Arc<Model>>,
    groups: Vec<ModelGroup>,
}

impl AdminRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn model(&self, slug: &str) -> Option<&Arc<Model>> {
        self.models.get(slug)
    }

    pub fn groups(&self) -> &[ModelGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[derive(Default)]
pub struct RegistryBuilder {
    groups: Vec<(String, Vec<Model>)>,
}

impl RegistryBuilder {
    pub fn group(mut self, name: impl Into<String>, models: Vec<Model>) -> Self {
        self.groups.push((name.into(), models));
        self
    }

    pub fn build(self) -> Result<AdminRegistry, ConfigError> {
        let mut registry = AdminRegistry::default();
        for (name, models) in self.groups {
            let mut links = Vec::with_capacity(models.len());
            for model in models {
                let slug = model.slug().to_string();
                if RESERVED_SLUGS.contains(&slug.as_str()) {
                    return Err(ConfigError::Validation(format!("slug '{}' is reserved", slug)));
                }
                if registry.models.contains_key(&slug) {
                    return Err(ConfigError::Duplicate {
                        kind: "slug",
                        name: slug,
                    });
                }
                links.push(ModelLink {
                    name: model.name().to_string(),
                    slug: slug.clone(),
                });
                registry.models.insert(slug, Arc::new(model));
            }
            registry.groups.push(ModelGroup {
                name,
                models: links,
            });
        }
        Ok(registry)
    }
}
