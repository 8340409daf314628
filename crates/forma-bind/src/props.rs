//! Props handed back to the rendering layer.

use std::rc::Rc;

use serde::Serialize;
use serde_json::Map;
use tracing::warn;

use forma_model::Value;

/// Name of the prop that carries the value unless a field says otherwise.
pub const DEFAULT_VALUE_PROP: &str = "value";

/// Turns a field's errors into whatever props the rendered element expects.
pub type ErrorPropsFn = Rc<dyn Fn(&[String]) -> Map<String, Value>>;

/// Pass-through error props: `{ "errors": [...] }`.
pub fn default_error_props(errors: &[String]) -> Map<String, Value> {
    let mut props = Map::new();
    props.insert(
        "errors".to_string(),
        Value::Array(errors.iter().cloned().map(Value::String).collect()),
    );
    props
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldProps {
    pub value_prop_name: String,
    pub value: Value,
    pub error_props: Map<String, Value>,
}

impl FieldProps {
    /// Flat prop bag: the value under its prop name, then the error props.
    /// Error props win on a name clash.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert(self.value_prop_name.clone(), self.value.clone());
        props.extend(self.error_props.clone());
        props
    }
}

/// Pick the one target a field can be wired to.
///
/// Extra targets are dropped with a warning; only the first is kept.
pub fn wire_first<T>(targets: impl IntoIterator<Item = T>) -> Option<T> {
    let mut targets = targets.into_iter();
    let first = targets.next()?;
    let dropped = targets.count();
    if dropped > 0 {
        warn!(dropped, "a field accepts only one target; extra targets were dropped");
    }
    Some(first)
}
