//! Built-in field rules.
//!
//! The store only sees a field's `validate` capability. Rules are one way for
//! a binding to implement it: each rule maps a value to at most one message.

use std::fmt;
use std::rc::Rc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use forma_model::Value;

use crate::error::{BindError, Result};

pub const REQUIRED_MESSAGE: &str = "This field is required";

pub type RuleFn = Rc<dyn Fn(&Value) -> Option<String>>;

#[derive(Clone)]
pub enum Rule {
    /// Rejects `null`, empty strings and empty arrays. `false` and `0` pass.
    Required { message: String },
    /// Applies to scalars; `null` and `""` pass so that `Required` decides
    /// about emptiness.
    Pattern { regex: Regex, message: String },
    Custom(RuleFn),
}

impl Rule {
    pub fn required() -> Self {
        Rule::Required {
            message: REQUIRED_MESSAGE.to_string(),
        }
    }

    pub fn required_with(message: impl Into<String>) -> Self {
        Rule::Required {
            message: message.into(),
        }
    }

    pub fn pattern(pattern: &str, message: Option<String>) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| BindError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let message = message.unwrap_or_else(|| format!("Value does not match {pattern}"));
        Ok(Rule::Pattern { regex, message })
    }

    pub fn custom<F>(check: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + 'static,
    {
        Rule::Custom(Rc::new(check))
    }

    /// The failure message for `value`, or `None` if it passes.
    pub fn check(&self, value: &Value) -> Option<String> {
        match self {
            Rule::Required { message } => is_empty(value).then(|| message.clone()),
            Rule::Pattern { regex, message } => {
                let matched = match value {
                    Value::Null => true,
                    Value::String(text) => text.is_empty() || regex.is_match(text),
                    Value::Bool(_) | Value::Number(_) => regex.is_match(&value.to_string()),
                    Value::Array(_) | Value::Object(_) => false,
                };
                (!matched).then(|| message.clone())
            }
            Rule::Custom(check) => check(value),
        }
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => false,
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required { message } => f
                .debug_struct("Required")
                .field("message", message)
                .finish(),
            Rule::Pattern { regex, message } => f
                .debug_struct("Pattern")
                .field("regex", &regex.as_str())
                .field("message", message)
                .finish(),
            Rule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Declarative form of the built-in rules, as found in form definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RuleSpec {
    Required {
        #[serde(default)]
        message: Option<String>,
    },
    Pattern {
        pattern: String,
        #[serde(default)]
        message: Option<String>,
    },
}

impl RuleSpec {
    pub fn build(&self) -> Result<Rule> {
        match self {
            RuleSpec::Required { message } => Ok(match message {
                Some(message) => Rule::required_with(message.clone()),
                None => Rule::required(),
            }),
            RuleSpec::Pattern { pattern, message } => Rule::pattern(pattern, message.clone()),
        }
    }
}

/// Run `rules` in order and collect every failure message.
pub fn run_rules(rules: &[Rule], value: &Value) -> Vec<String> {
    rules.iter().filter_map(|rule| rule.check(value)).collect()
}
