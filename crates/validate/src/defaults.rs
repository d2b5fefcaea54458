//! Defaulting engine.

use kshape_core::{Object, ResourceObject, Value};
use kshape_schema::{FieldType, ObjectSchema, SchemaDescriptor};
use tracing::trace;

/// Fill every absent field that declares a default, at any depth. Explicit values,
/// including `false`, `0` and `""`, are kept; an explicit `null` counts as absent.
/// Plain strings in enum fields that name a member are tagged as that member;
/// tagging is not counted. Returns the number of defaults written. A second call
/// always returns 0.
pub fn apply_defaults(obj: &mut ResourceObject, descriptor: &SchemaDescriptor) -> usize {
    let n = default_object(obj.fields_mut(), descriptor.root());
    if n > 0 {
        trace!(gvk = %descriptor.kind(), defaults = n, "applied defaults");
    }
    n
}

fn default_object(fields: &mut Object, schema: &ObjectSchema) -> usize {
    let mut n = 0;
    for f in schema.fields.iter() {
        if let Some(default) = &f.default {
            let unset = matches!(fields.get(&f.name), None | Some(Value::Null));
            if unset {
                fields.insert(f.name.clone(), default.clone());
                n += 1;
            }
        }
        if let Some(v) = fields.get_mut(&f.name) {
            n += default_value(v, &f.ty);
        }
    }
    n
}

fn default_value(v: &mut Value, ty: &FieldType) -> usize {
    match (ty, v) {
        (FieldType::Object(schema), Value::Object(o)) => default_object(o, schema),
        (FieldType::List(inner), Value::List(items)) => items.iter_mut().map(|it| default_value(it, inner)).sum(),
        (FieldType::Map(inner), Value::Object(entries)) => {
            entries.values_mut().map(|it| default_value(it, inner)).sum()
        }
        (FieldType::Enum(spec), v) => {
            let tagged = match v {
                Value::String(s) => spec.member(s),
                _ => None,
            };
            if let Some(e) = tagged {
                *v = Value::Enum(e);
            }
            0
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kshape_core::{ClosedEnum, PreemptionPolicy, Protocol, TolerationOperator};
    use kshape_schema::builtin;

    fn object(pairs: Vec<(&str, Value)>) -> Value {
        Value::Object(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    fn slice_with_ports(ports: Vec<Value>) -> ResourceObject {
        let ep = object(vec![
            ("addresses", Value::List(vec!["10.0.0.1".into()])),
            ("conditions", object(vec![("ready", Value::Bool(false))])),
        ]);
        ResourceObject::new(builtin::endpoint_slice_kind())
            .with("addressType", "IPv4")
            .with("endpoints", Value::List(vec![ep]))
            .with("ports", Value::List(ports))
    }

    #[test]
    fn port_defaults_fill_only_absent_fields() {
        let d = builtin::discovery::endpoint_slice();
        let mut obj = slice_with_ports(vec![
            object(vec![("port", Value::Int(80))]),
            object(vec![("name", "metrics".into()), ("protocol", "UDP".into())]),
            object(vec![("name", Value::Null), ("protocol", Value::Null)]),
        ]);
        assert_eq!(apply_defaults(&mut obj, &d), 4);

        assert_eq!(obj.lookup("ports[0].protocol"), Some(&Protocol::Tcp.to_value()));
        assert_eq!(obj.lookup("ports[0].name").and_then(Value::as_str), Some(""));
        assert_eq!(obj.lookup("ports[1].protocol").and_then(Value::as_str), Some("UDP"));
        assert_eq!(obj.lookup("ports[1].name").and_then(Value::as_str), Some("metrics"));
        assert_eq!(obj.lookup("ports[2].protocol"), Some(&Protocol::Tcp.to_value()));
    }

    #[test]
    fn falsy_values_are_not_overwritten() {
        let d = builtin::discovery::endpoint_slice();
        let mut obj = slice_with_ports(vec![]);
        apply_defaults(&mut obj, &d);
        assert_eq!(obj.lookup("endpoints[0].conditions.ready"), Some(&Value::Bool(false)));
        assert_eq!(obj.lookup("endpoints[0].conditions.serving"), None);
    }

    #[test]
    fn defaulting_is_idempotent() {
        let d = builtin::discovery::endpoint_slice();
        let mut once = slice_with_ports(vec![object(vec![("port", Value::Int(443))])]);
        apply_defaults(&mut once, &d);
        let mut twice = once.clone();
        assert_eq!(apply_defaults(&mut twice, &d), 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn nested_defaults_reach_tolerations_and_top_level_fields() {
        let pc = builtin::scheduling::priority_class();
        let mut obj = ResourceObject::new(builtin::priority_class_kind()).with("value", Value::Int(1000));
        apply_defaults(&mut obj, &pc);
        assert_eq!(obj.get("preemptionPolicy"), Some(&PreemptionPolicy::PreemptLowerPriority.to_value()));

        let rc = builtin::node::runtime_class();
        let tol = object(vec![("key", "gpu".into())]);
        let mut obj = ResourceObject::new(builtin::runtime_class_kind())
            .with("handler", "runc")
            .with("scheduling", object(vec![("tolerations", Value::List(vec![tol]))]));
        assert_eq!(apply_defaults(&mut obj, &rc), 1);
        assert_eq!(obj.lookup("scheduling.tolerations[0].operator"), Some(&TolerationOperator::Equal.to_value()));
    }

    #[test]
    fn member_strings_are_tagged_without_counting() {
        let d = builtin::discovery::endpoint_slice();
        let mut obj = ResourceObject::new(builtin::endpoint_slice_kind())
            .with("addressType", "IPv4")
            .with("ports", Value::List(vec![object(vec![("name", "dns".into()), ("protocol", "UDP".into())])]));
        assert_eq!(apply_defaults(&mut obj, &d), 0);
        assert!(matches!(obj.get("addressType"), Some(Value::Enum(_))));
        assert!(matches!(obj.lookup("ports[0].protocol"), Some(Value::Enum(_))));

        let mut odd = ResourceObject::new(builtin::endpoint_slice_kind()).with("addressType", "IPv7");
        apply_defaults(&mut odd, &d);
        assert_eq!(odd.get("addressType"), Some(&Value::String("IPv7".into())));
    }

    #[test]
    fn absent_containers_are_not_created() {
        let d = builtin::discovery::endpoint_slice();
        let mut obj = ResourceObject::new(builtin::endpoint_slice_kind()).with("addressType", "IPv6");
        assert_eq!(apply_defaults(&mut obj, &d), 0);
        assert!(!obj.is_present("ports"));
    }
}
