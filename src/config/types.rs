//! Raw config types matching the models JSON file.

use serde::{Deserialize, Serialize};

/// All model groups in one struct for in-memory loading.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModelsConfig {
    pub groups: Vec<GroupConfig>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    pub models: Vec<ModelConfig>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    /// URL segment; defaults to the snake-cased model name.
    #[serde(default)]
    pub slug: Option<String>,
    pub table: String,
    pub fields: Vec<FieldConfig>,
    #[serde(default)]
    pub list_columns: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// String, number or boolean; checked against the field's own validation.
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub width: Option<u8>,
    #[serde(default)]
    pub help: Option<String>,
    #[serde(flatten)]
    pub kind: FieldKindConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKindConfig {
    Boolean,
    Text {
        #[serde(default)]
        max_length: Option<usize>,
        #[serde(default)]
        pattern: Option<String>,
        #[serde(default)]
        multiline: bool,
    },
    Integer {
        #[serde(default)]
        min: Option<i64>,
        #[serde(default)]
        max: Option<i64>,
    },
    Float {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    Date,
    Choice {
        options: Vec<ChoiceOption>,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    #[serde(default)]
    pub label: Option<String>,
}
