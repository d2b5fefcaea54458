//! Structural decoding of parsed documents against a schema.

use kshape_core::object::{API_VERSION, KIND};
use kshape_core::{FieldPath, MalformedEncodingError, MicroTime, Object, Quantity, Time, Value};
use kshape_schema::{FieldType, ObjectSchema};
use serde_json::Value as Json;

/// True when `v` has more than `max` nodes. Stops walking once the budget is spent.
pub(crate) fn json_node_budget_exceeded(v: &Json, max: usize) -> bool {
    fn walk(v: &Json, cur: &mut usize, max: usize) {
        if *cur > max { return; }
        *cur += 1;
        match v {
            Json::Object(map) => {
                for vv in map.values() {
                    if *cur > max { break; }
                    walk(vv, cur, max);
                }
            }
            Json::Array(arr) => {
                for vv in arr.iter() {
                    if *cur > max { break; }
                    walk(vv, cur, max);
                }
            }
            _ => {}
        }
    }
    let mut cur = 0usize;
    walk(v, &mut cur, max);
    cur > max
}

/// `apiVersion` and `kind` as declared by the document. Present but non-string is malformed.
pub(crate) fn discriminators(doc: &serde_json::Map<String, Json>) -> Result<(Option<&str>, Option<&str>), MalformedEncodingError> {
    Ok((discriminator(doc, API_VERSION)?, discriminator(doc, KIND)?))
}

fn discriminator<'a>(doc: &'a serde_json::Map<String, Json>, key: &str) -> Result<Option<&'a str>, MalformedEncodingError> {
    match doc.get(key) {
        None | Some(Json::Null) => Ok(None),
        Some(Json::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(MalformedEncodingError::new(
            FieldPath::root().child(key),
            format!("expected string, got {}", json_type(other)),
        )),
    }
}

/// Decode the fields of one object. Fields the schema does not declare are kept raw.
pub(crate) fn decode_object(
    map: serde_json::Map<String, Json>,
    schema: &ObjectSchema,
    path: &FieldPath,
) -> Result<Object, MalformedEncodingError> {
    let mut out = Object::new();
    for (k, v) in map.into_iter() {
        let value = match schema.get(&k) {
            Some(f) => decode_value(v, &f.ty, &path.child(&k))?,
            None => Value::Raw(v),
        };
        out.insert(k, value);
    }
    Ok(out)
}

fn decode_value(v: Json, ty: &FieldType, path: &FieldPath) -> Result<Value, MalformedEncodingError> {
    if v.is_null() {
        return Ok(Value::Null);
    }
    let mismatch = |v: &Json| MalformedEncodingError::new(path.clone(), format!("expected {}, got {}", ty.name(), json_type(v)));
    match ty {
        FieldType::Any => Ok(Value::Raw(v)),
        FieldType::Bool => v.as_bool().map(Value::Bool).ok_or_else(|| mismatch(&v)),
        FieldType::Int32 => {
            let i = v.as_i64().ok_or_else(|| mismatch(&v))?;
            if i32::try_from(i).is_err() {
                return Err(MalformedEncodingError::new(path.clone(), format!("{} is out of int32 range", i)));
            }
            Ok(Value::Int(i))
        }
        FieldType::Int64 => v.as_i64().map(Value::Int).ok_or_else(|| mismatch(&v)),
        FieldType::Float => v.as_f64().map(Value::Float).ok_or_else(|| mismatch(&v)),
        FieldType::String => match v {
            Json::String(s) => Ok(Value::String(s)),
            other => Err(mismatch(&other)),
        },
        // Non-members stay plain strings so the validator can name the closed set.
        FieldType::Enum(spec) => match v {
            Json::String(s) => Ok(spec.member(&s).map(Value::Enum).unwrap_or(Value::String(s))),
            other => Err(mismatch(&other)),
        },
        FieldType::Quantity => {
            let text = match &v {
                Json::String(s) => s.clone(),
                Json::Number(n) => n.to_string(),
                other => return Err(mismatch(other)),
            };
            text.parse::<Quantity>()
                .map(Value::Quantity)
                .map_err(|e| MalformedEncodingError::new(path.clone(), e.to_string()))
        }
        FieldType::Time => match &v {
            Json::String(s) => s
                .parse::<Time>()
                .map(Value::Time)
                .map_err(|e| MalformedEncodingError::new(path.clone(), e.to_string())),
            other => Err(mismatch(other)),
        },
        FieldType::MicroTime => match &v {
            Json::String(s) => s
                .parse::<MicroTime>()
                .map(Value::MicroTime)
                .map_err(|e| MalformedEncodingError::new(path.clone(), e.to_string())),
            other => Err(mismatch(other)),
        },
        FieldType::Object(schema) => match v {
            Json::Object(map) => decode_object(map, schema, path).map(Value::Object),
            other => Err(mismatch(&other)),
        },
        FieldType::List(inner) => match v {
            Json::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, it)| decode_value(it, inner, &path.index(i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            other => Err(mismatch(&other)),
        },
        FieldType::Map(inner) => match v {
            Json::Object(map) => {
                let mut out = Object::new();
                for (k, it) in map.into_iter() {
                    let value = decode_value(it, inner, &path.key(&k))?;
                    out.insert(k, value);
                }
                Ok(Value::Object(out))
            }
            other => Err(mismatch(&other)),
        },
    }
}

pub(crate) fn json_type(v: &Json) -> &'static str {
    match v {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "list",
        Json::Object(_) => "object",
    }
}
