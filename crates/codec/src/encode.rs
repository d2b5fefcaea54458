//! Value model to wire form.

use kshape_core::{FieldPath, Object, Value};
use serde_json::Value as Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodeError {
    /// JSON and YAML have no representation for NaN or infinities.
    #[error("non-finite number at {path}")]
    NonFinite { path: FieldPath },
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Canonical JSON tree: keys sorted, enums as wire strings, times in RFC 3339.
pub(crate) fn object_to_json(obj: &Object, path: &FieldPath) -> Result<Json, EncodeError> {
    let mut map = serde_json::Map::new();
    for (k, v) in obj.iter() {
        map.insert(k.clone(), value_to_json(v, &path.child(k))?);
    }
    Ok(Json::Object(map))
}

fn value_to_json(v: &Value, path: &FieldPath) -> Result<Json, EncodeError> {
    Ok(match v {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::from(*i),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(Json::Number)
            .ok_or_else(|| EncodeError::NonFinite { path: path.clone() })?,
        Value::String(s) => Json::String(s.clone()),
        Value::Enum(e) => Json::String(e.as_str().to_string()),
        Value::Quantity(q) => Json::String(q.as_str().to_string()),
        Value::Time(t) => Json::String(t.to_rfc3339()),
        Value::MicroTime(t) => Json::String(t.to_rfc3339()),
        Value::List(items) => Json::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, it)| value_to_json(it, &path.index(i)))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Object(o) => object_to_json(o, path)?,
        Value::Raw(raw) => raw.clone(),
    })
}
