use kshape_codec::Codec;
use kshape_core::{DecodeError, FieldErrorKind, Object, ResourceObject, Value};
use kshape_registry::Registry;
use kshape_schema::builtin;
use kshape_validate::{apply_defaults, validate};

#[test]
fn ready_false_survives_decode_default_and_encode() -> anyhow::Result<()> {
    let reg = Registry::with_builtins();
    let input = br#"{
        "apiVersion": "discovery.k8s.io/v1",
        "kind": "EndpointSlice",
        "addressType": "IPv4",
        "endpoints": [{ "addresses": ["10.0.0.1"], "conditions": { "ready": false } }],
        "ports": [{ "port": 8080 }]
    }"#;
    let mut obj = Codec::json().decode(input, &reg)?;
    let d = reg.get(obj.kind())?;
    apply_defaults(&mut obj, &d);
    validate(&obj, &d)?;

    let out: serde_json::Value = serde_json::from_slice(&Codec::json().encode(&obj)?)?;
    assert_eq!(out["endpoints"][0]["conditions"], serde_json::json!({ "ready": false }));
    assert_eq!(out["ports"][0], serde_json::json!({ "name": "", "port": 8080, "protocol": "TCP" }));
    Ok(())
}

#[test]
fn mismatched_discriminators_by_resolution_path() -> anyhow::Result<()> {
    let reg = Registry::with_builtins();
    let input = br#"{"apiVersion":"events.k8s.io/v1","kind":"RuntimeClass","handler":"runc"}"#;

    // Resolved from its own discriminators: no such kind.
    match Codec::json().decode(input, &reg) {
        Err(DecodeError::UnknownKind(e)) => assert_eq!(e.kind.as_deref(), Some("RuntimeClass")),
        other => panic!("expected unknown kind, got {:?}", other),
    }

    // Resolved out-of-band: decodes, then the validator flags the apiVersion.
    let expected = builtin::runtime_class_kind();
    let obj = Codec::json().decode_as(input, &reg, &expected)?;
    assert_eq!(obj.kind(), &expected);
    let err = validate(&obj, &*reg.get(&expected)?).unwrap_err();
    assert_eq!(err.len(), 1);
    assert!(err.has("apiVersion", FieldErrorKind::DiscriminatorMismatch));
    Ok(())
}

#[test]
fn decoded_events_validate_times_and_series() -> anyhow::Result<()> {
    let reg = Registry::with_builtins();
    let ok = br#"{"apiVersion":"events.k8s.io/v1","kind":"Event","eventTime":"2024-01-01T00:00:00.000001Z","series":{"count":3,"lastObservedTime":"2024-01-01T00:10:00Z"}}"#;
    let obj = Codec::json().decode(ok, &reg)?;
    validate(&obj, &*reg.get(obj.kind())?)?;

    let missing = br#"{"apiVersion":"events.k8s.io/v1","kind":"Event","series":{"count":3}}"#;
    let obj = Codec::json().decode(missing, &reg)?;
    let err = validate(&obj, &*reg.get(obj.kind())?).unwrap_err();
    let paths: Vec<String> = err.iter().map(|e| e.path.to_string()).collect();
    assert_eq!(paths, vec!["eventTime", "series.lastObservedTime"]);
    Ok(())
}

#[test]
fn decoded_quantities_satisfy_overhead_schema() -> anyhow::Result<()> {
    let reg = Registry::with_builtins();
    let input = b"apiVersion: node.k8s.io/v1\nkind: RuntimeClass\nhandler: kata\noverhead:\n  podFixed:\n    cpu: 250m\n    memory: 160Mi\n";
    let mut obj = Codec::yaml().decode(input, &reg)?;
    let d = reg.get(obj.kind())?;
    assert_eq!(apply_defaults(&mut obj, &d), 0);
    validate(&obj, &d)?;
    assert!(matches!(obj.lookup("overhead.podFixed"), Some(Value::Object(m)) if m.len() == 2));
    Ok(())
}

#[test]
fn objects_built_in_memory_round_trip() -> anyhow::Result<()> {
    let reg = Registry::with_builtins();
    let ep: Object = [("addresses".to_string(), Value::List(vec!["10.0.0.1".into()]))].into_iter().collect();
    let built = ResourceObject::new(builtin::endpoint_slice_kind())
        .with("addressType", "IPv4")
        .with("endpoints", Value::List(vec![Value::Object(ep)]))
        .with_discriminators();
    let d = reg.get(built.kind())?;
    validate(&built, &d)?;

    let back = Codec::json().decode(&Codec::json().encode(&built)?, &reg)?;
    assert!(matches!(back.get("addressType"), Some(Value::Enum(_))));
    assert_eq!(back, built);

    let mut defaulted = built.clone();
    apply_defaults(&mut defaulted, &d);
    assert!(matches!(defaulted.get("addressType"), Some(Value::Enum(_))));
    assert_eq!(defaulted, back);
    Ok(())
}
