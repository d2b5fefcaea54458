//! Validator.
//!
//! Field checks run in descriptor order and never short-circuit: for each field,
//! required presence, type, cardinality, enum membership, then length, format and
//! range, then the field's nested values. Cross-field rules of an object run after
//! all of its fields. Discriminator checks come first.

use std::time::Instant;

use kshape_core::object::{API_VERSION, ITEMS, KIND};
use kshape_core::{FieldError, FieldErrorKind, FieldPath, Object, ResourceKind, ResourceObject, ValidationError, Value};
use kshape_schema::{FieldDescriptor, FieldType, ObjectSchema, SchemaDescriptor};
use metrics::{counter, histogram};
use tracing::debug;

/// Check `obj` against `descriptor`. All defects are collected into one
/// [`ValidationError`], in a deterministic order.
pub fn validate(obj: &ResourceObject, descriptor: &SchemaDescriptor) -> Result<(), ValidationError> {
    let t0 = Instant::now();
    counter!("kshape_validate_total", 1u64);

    let mut out = Vec::new();
    check_discriminators(obj, descriptor, &mut out);
    check_object(obj.fields(), descriptor.root(), &FieldPath::root(), &mut out);

    histogram!("kshape_validate_ms", t0.elapsed().as_secs_f64() * 1000.0);
    if !out.is_empty() {
        counter!("kshape_validate_failed", 1u64);
        debug!(gvk = %descriptor.kind(), errors = out.len(), "validation failed");
    }
    ValidationError::new(out).into_result()
}

fn check_discriminators(obj: &ResourceObject, descriptor: &SchemaDescriptor, out: &mut Vec<FieldError>) {
    let expected = descriptor.kind();
    if obj.kind() != expected {
        out.push(FieldError::new(
            FieldPath::root(),
            FieldErrorKind::DiscriminatorMismatch,
            format!("object was resolved as {}, schema is {}", obj.kind(), expected),
        ));
    }
    check_declared(obj.fields(), expected, &FieldPath::root(), out);

    if let Some(item_kind) = descriptor.item_kind() {
        if let Some(items) = obj.get(ITEMS).and_then(Value::as_list) {
            for (i, item) in items.iter().enumerate() {
                if let Some(fields) = item.as_object() {
                    check_declared(fields, item_kind, &FieldPath::root().child(ITEMS).index(i), out);
                }
            }
        }
    }
}

/// Self-declared `apiVersion`/`kind` must agree with `expected` when present.
fn check_declared(fields: &Object, expected: &ResourceKind, path: &FieldPath, out: &mut Vec<FieldError>) {
    let api_version = expected.api_version();
    if let Some(declared) = fields.get(API_VERSION).and_then(Value::as_str) {
        if declared != api_version {
            out.push(FieldError::new(
                path.child(API_VERSION),
                FieldErrorKind::DiscriminatorMismatch,
                format!("declared {:?}, expected {:?}", declared, api_version),
            ));
        }
    }
    if let Some(declared) = fields.get(KIND).and_then(Value::as_str) {
        if declared != expected.kind {
            out.push(FieldError::new(
                path.child(KIND),
                FieldErrorKind::DiscriminatorMismatch,
                format!("declared {:?}, expected {:?}", declared, expected.kind),
            ));
        }
    }
}

fn check_object(fields: &Object, schema: &ObjectSchema, path: &FieldPath, out: &mut Vec<FieldError>) {
    for f in schema.fields.iter() {
        let p = path.child(&f.name);
        match fields.get(&f.name) {
            None | Some(Value::Null) => {
                if f.required {
                    out.push(FieldError::new(p, FieldErrorKind::Required, "required field is missing"));
                }
            }
            Some(v) => check_field(v, f, &p, out),
        }
    }
    for rule in schema.rules.iter() {
        rule.check(fields, path, out);
    }
}

fn check_field(v: &Value, f: &FieldDescriptor, p: &FieldPath, out: &mut Vec<FieldError>) {
    if !f.ty.accepts(v) {
        out.push(type_error(v, &f.ty, p));
        return;
    }

    if let Some(card) = f.cardinality {
        let n = match v {
            Value::List(items) => Some(items.len()),
            Value::Object(entries) => Some(entries.len()),
            _ => None,
        };
        if let Some(n) = n {
            if !card.check(n) {
                out.push(FieldError::new(
                    p.clone(),
                    FieldErrorKind::Cardinality,
                    format!("has {} entries, must have {}", n, card),
                ));
            }
        }
    }

    check_enum(v, &f.ty, p, out);

    if let Some(s) = v.as_str() {
        if let Some(max) = f.max_length {
            if s.len() > max {
                out.push(FieldError::new(
                    p.clone(),
                    FieldErrorKind::Length,
                    format!("must be at most {} bytes, got {}", max, s.len()),
                ));
            }
        }
        if let Some(format) = f.format {
            if !format.check(s) {
                out.push(FieldError::new(p.clone(), FieldErrorKind::Format, format!("{:?} is not a valid {}", s, format)));
            }
        }
    }

    if let (Some(range), Some(i)) = (f.range, v.as_i64()) {
        if !range.contains(i) {
            out.push(FieldError::new(
                p.clone(),
                FieldErrorKind::Range,
                format!("{} is outside [{}, {}]", i, range.min, range.max),
            ));
        }
    }

    check_nested(v, &f.ty, p, out);
}

/// Elements of lists and maps: no presence or bounds of their own.
fn check_element(v: &Value, ty: &FieldType, p: &FieldPath, out: &mut Vec<FieldError>) {
    if !ty.accepts(v) {
        out.push(type_error(v, ty, p));
        return;
    }
    check_enum(v, ty, p, out);
    check_nested(v, ty, p, out);
}

fn check_nested(v: &Value, ty: &FieldType, p: &FieldPath, out: &mut Vec<FieldError>) {
    match (ty, v) {
        (FieldType::Object(schema), Value::Object(fields)) => check_object(fields, schema, p, out),
        (FieldType::List(inner), Value::List(items)) => {
            for (i, it) in items.iter().enumerate() {
                check_element(it, inner, &p.index(i), out);
            }
        }
        (FieldType::Map(inner), Value::Object(entries)) => {
            for (k, it) in entries.iter() {
                check_element(it, inner, &p.key(k), out);
            }
        }
        _ => {}
    }
}

fn check_enum(v: &Value, ty: &FieldType, p: &FieldPath, out: &mut Vec<FieldError>) {
    let FieldType::Enum(spec) = ty else { return };
    if let Value::String(s) = v {
        if !spec.contains(s) {
            out.push(FieldError::new(p.clone(), FieldErrorKind::Enum, format!("{:?} is not one of {}", s, spec)));
        }
    }
}

fn type_error(v: &Value, ty: &FieldType, p: &FieldPath) -> FieldError {
    FieldError::new(p.clone(), FieldErrorKind::Type, format!("expected {}, got {}", ty.name(), v.type_name()))
}
