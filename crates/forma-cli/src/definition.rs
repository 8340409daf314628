//! Form definition files.
//!
//! A definition is a TOML document describing the fields of one form:
//!
//! ```toml
//! name = "signup"
//! initial_value_policy = "truthy-fallback"
//!
//! [initial_values.user]
//! name = "Ann"
//!
//! [[fields]]
//! path = "user.name"
//! default = ""
//! rules = [{ kind = "required" }]
//! ```
//!
//! Values files fed to `submit`/`reset` are plain JSON documents shaped like
//! the submitted values.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use forma_bind::{BindError, DEFAULT_VALUE_PROP, FieldOptions, FormItem, RuleSpec};
use forma_core::{FormConfig, FormError, FormService};
use forma_model::{FieldPath, Value, get_at_path};

use crate::logging::redact_value;

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse form definition {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse values file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("field {path} is defined more than once")]
    DuplicateField { path: FieldPath },

    #[error("invalid rule on field {path}: {source}")]
    Rule {
        path: FieldPath,
        #[source]
        source: BindError,
    },

    #[error(transparent)]
    Form(#[from] FormError),
}

impl DefinitionError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn default_value_prop() -> String {
    DEFAULT_VALUE_PROP.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub path: FieldPath,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default = "default_value_prop")]
    pub value_prop_name: String,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub config: FormConfig,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl FormDefinition {
    pub fn from_toml_str(input: &str, origin: &Path) -> Result<Self, DefinitionError> {
        toml::from_str(input).map_err(|source| DefinitionError::Toml {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, DefinitionError> {
        let text = fs::read_to_string(path).map_err(|e| DefinitionError::io(path, e))?;
        let definition = Self::from_toml_str(&text, path)?;
        debug!(
            path = %path.display(),
            fields = definition.fields.len(),
            "loaded form definition"
        );
        Ok(definition)
    }

    /// Display name: the `name` key, or `"form"`.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("form")
    }

    /// Create a service and register every field, in file order.
    pub fn build(&self) -> Result<LoadedForm, DefinitionError> {
        let mut seen = HashSet::new();
        let mut service = FormService::new(self.config.clone());
        let mut items = Vec::with_capacity(self.fields.len());

        for field in &self.fields {
            if !seen.insert(field.path.clone()) {
                return Err(DefinitionError::DuplicateField {
                    path: field.path.clone(),
                });
            }
            let mut options = FieldOptions::new(field.path.clone())
                .with_value_prop_name(field.value_prop_name.clone());
            if let Some(default) = &field.default {
                options = options.with_default_value(default.clone());
            }
            for rule_spec in &field.rules {
                let rule = rule_spec.build().map_err(|source| DefinitionError::Rule {
                    path: field.path.clone(),
                    source,
                })?;
                options = options.with_rule(rule);
            }
            items.push(FormItem::register(&mut service, options));
        }

        Ok(LoadedForm { service, items })
    }
}

/// A definition turned into a live service with one bound item per field.
#[derive(Debug)]
pub struct LoadedForm {
    pub service: FormService,
    pub items: Vec<FormItem>,
}

impl LoadedForm {
    /// Feed the value found at each field's path in `values` through the
    /// field's change handler. Fields without a value are left alone.
    pub fn apply_values(&mut self, values: &Value) -> Result<usize, DefinitionError> {
        let mut applied = 0;
        for item in &self.items {
            let Some(value) = get_at_path(values, item.path()) else {
                continue;
            };
            debug!(
                path = %item.path(),
                value = %redact_value(value),
                "applying value"
            );
            item.on_change(&mut self.service, value.clone())?;
            applied += 1;
        }
        Ok(applied)
    }
}

pub fn load_values(path: &Path) -> Result<Value, DefinitionError> {
    let text = fs::read_to_string(path).map_err(|e| DefinitionError::io(path, e))?;
    serde_json::from_str(&text).map_err(|source| DefinitionError::Json {
        path: path.to_path_buf(),
        source,
    })
}
