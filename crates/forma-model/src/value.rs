//! Field values and nested value trees.
//!
//! Field values are plain JSON values. `Null` doubles as "no value", so an
//! unset field and an explicitly cleared one look the same to the store.

use serde_json::Map;

use crate::error::Result;
use crate::path::{FieldPath, Segment, check_index};

pub type Value = serde_json::Value;

/// Loose truthiness as used by form hosts: `null`, `false`, zero, and the
/// empty string are falsy; every array and object is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Identity-style comparison.
///
/// Scalars compare by value. Arrays and objects never compare equal, since
/// two structured values held in different places are different instances.
pub fn same_value(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Array(_) | Value::Object(_), _) => false,
        (_, Value::Array(_) | Value::Object(_)) => false,
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        _ => left == right,
    }
}

/// Read the value stored at `path`, if every step exists.
pub fn get_at_path<'a>(root: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.segments() {
        current = match (current, segment) {
            (Value::Object(map), Segment::Key(key)) => map.get(key)?,
            (Value::Object(map), Segment::Index(index)) => map.get(&index.to_string())?,
            (Value::Array(items), Segment::Index(index)) => items.get(*index)?,
            (Value::Array(items), Segment::Key(key)) => items.get(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Write `value` at `path`, creating intermediate containers as needed.
///
/// A key creates an object and an index creates an array padded with nulls.
/// Scalars standing where a container is needed are replaced.
///
/// Fails without writing anything past the offending segment when an index
/// exceeds [`MAX_INDEX`](crate::path::MAX_INDEX).
pub fn set_at_path(root: &mut Value, path: &FieldPath, value: Value) -> Result<()> {
    let mut current = root;
    for segment in path.segments() {
        current = child_slot(current, segment)?;
    }
    *current = value;
    Ok(())
}

fn child_slot<'a>(parent: &'a mut Value, segment: &Segment) -> Result<&'a mut Value> {
    if let Segment::Index(index) = segment {
        check_index(*index)?;
    }
    if let (Value::Array(items), Segment::Key(key)) = (&*parent, segment) {
        if key.parse::<usize>().is_err() {
            let converted: Map<String, Value> = items
                .iter()
                .enumerate()
                .map(|(idx, item)| (idx.to_string(), item.clone()))
                .collect();
            *parent = Value::Object(converted);
        }
    }
    if !matches!(parent, Value::Array(_) | Value::Object(_)) {
        *parent = match segment {
            Segment::Key(_) => Value::Object(Map::new()),
            Segment::Index(_) => Value::Array(Vec::new()),
        };
    }

    match parent {
        Value::Object(map) => {
            let key = match segment {
                Segment::Key(key) => key.clone(),
                Segment::Index(index) => index.to_string(),
            };
            Ok(map.entry(key).or_insert(Value::Null))
        }
        Value::Array(items) => {
            let index = match segment {
                Segment::Index(index) => *index,
                Segment::Key(key) => key.parse::<usize>().unwrap_or(items.len()),
            };
            let index = check_index(index)?;
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            Ok(&mut items[index])
        }
        _ => unreachable!("parent was coerced into a container above"),
    }
}
