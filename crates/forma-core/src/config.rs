use serde::{Deserialize, Serialize};
use serde_json::Map;

use forma_model::Value;

/// How `get_item_initial_value` decides that an initial value is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InitialValuePolicy {
    /// Falsy initial values (`0`, `""`, `false`, `null`) fall back to the
    /// field's default value.
    #[default]
    TruthyFallback,
    /// Only a missing entry falls back to the default value.
    StrictAbsence,
}

/// Form-level configuration supplied at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Nested initial values, addressed by field path.
    pub initial_values: Value,
    pub initial_value_policy: InitialValuePolicy,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            initial_values: Value::Object(Map::new()),
            initial_value_policy: InitialValuePolicy::default(),
        }
    }
}

impl FormConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_initial_values(mut self, initial_values: Value) -> Self {
        self.initial_values = initial_values;
        self
    }

    #[must_use]
    pub fn with_initial_value_policy(mut self, policy: InitialValuePolicy) -> Self {
        self.initial_value_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_with_defaults() {
        let config: FormConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, FormConfig::default());

        let config: FormConfig = serde_json::from_value(json!({
            "initial_values": {"age": 0},
            "initial_value_policy": "strict-absence",
        }))
        .unwrap();
        assert_eq!(config.initial_value_policy, InitialValuePolicy::StrictAbsence);
        assert_eq!(config.initial_values, json!({"age": 0}));
    }
}
