//! Built-in transforms for routes declared in config files.
//!
//! Config files cannot carry closures, so each `[[routes.query]]` entry
//! names one of these behaviours and the dotted `target` it operates on.

use serde_json::{Map, Value};

use crate::config::{QueryTransformConfig, TransformAction};
use crate::dispatch::error::BoxError;
use crate::query::pipeline::QueryTransform;

/// Build the transform described by a config entry.
pub fn from_config(config: &QueryTransformConfig) -> QueryTransform {
    let target = config.target.clone();
    match config.action {
        TransformAction::Offset => offset(&config.name, target),
        TransformAction::Limit => limit(&config.name, target),
        TransformAction::Filter => filter(&config.name, target, config.key.clone().unwrap_or_default()),
        TransformAction::Set => set(&config.name, target),
    }
}

/// Drop the first `n` elements of the array at `target`.
pub fn offset(name: &str, target: String) -> QueryTransform {
    let param = name.to_string();
    QueryTransform::new(name, move |result, value| {
        let Some(n) = parse_count(&param, value) else {
            return Ok(());
        };
        let items = array_at(result, &target)?;
        let n = n.min(items.len());
        items.drain(..n);
        Ok(())
    })
}

/// Keep at most `n` elements of the array at `target`.
pub fn limit(name: &str, target: String) -> QueryTransform {
    let param = name.to_string();
    QueryTransform::new(name, move |result, value| {
        let Some(n) = parse_count(&param, value) else {
            return Ok(());
        };
        array_at(result, &target)?.truncate(n);
        Ok(())
    })
}

/// Keep items of the array at `target` whose `key` field equals the value.
pub fn filter(name: &str, target: String, key: String) -> QueryTransform {
    QueryTransform::new(name, move |result, value| {
        let Some(expected) = value else {
            return Ok(());
        };
        array_at(result, &target)?.retain(|item| {
            item.get(&key)
                .map(|field| field_matches(field, expected))
                .unwrap_or(false)
        });
        Ok(())
    })
}

/// Write the value as a string at `target`, creating objects along the way.
pub fn set(name: &str, target: String) -> QueryTransform {
    QueryTransform::new(name, move |result, value| {
        let Some(value) = value else {
            return Ok(());
        };
        set_path(result, &target, Value::String(value.to_string()))
    })
}

fn parse_count(param: &str, value: Option<&str>) -> Option<usize> {
    let raw = value?;
    match raw.trim().parse::<usize>() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::debug!(param = %param, value = %raw, "Ignoring non-numeric query value");
            None
        }
    }
}

fn field_matches(field: &Value, expected: &str) -> bool {
    match field {
        Value::String(s) => s == expected,
        other => other.to_string() == expected,
    }
}

/// JSON pointer for a dotted path; the empty path is the root.
fn pointer(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    path.split('.')
        .map(|segment| format!("/{}", segment.replace('~', "~0").replace('/', "~1")))
        .collect()
}

fn array_at<'a>(result: &'a mut Value, target: &str) -> Result<&'a mut Vec<Value>, BoxError> {
    result
        .pointer_mut(&pointer(target))
        .and_then(Value::as_array_mut)
        .ok_or_else(|| format!("query target '{target}' is not an array").into())
}

fn set_path(root: &mut Value, path: &str, value: Value) -> Result<(), BoxError> {
    if path.is_empty() {
        *root = value;
        return Ok(());
    }

    let mut current = root;
    for segment in path.split('.') {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        current = match current {
            Value::Object(map) => map.entry(segment).or_insert(Value::Null),
            _ => return Err(format!("query target '{path}' is not inside an object").into()),
        };
    }
    *current = value;
    Ok(())
}
