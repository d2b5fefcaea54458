//! kshape codec: decodes JSON/YAML documents into [`ResourceObject`]s using the
//! registry's schemas, and encodes them back in canonical form.
//!
//! Decoding resolves the schema from `apiVersion`/`kind` (or an expected kind given
//! by the caller), then converts each declared field structurally. It never applies
//! defaults and never validates.

#![forbid(unsafe_code)]

mod config;
mod decode;
mod encode;

use kshape_core::{DecodeError, FieldPath, MalformedEncodingError, ResourceKind, ResourceList, ResourceObject};
use kshape_registry::Registry;
use metrics::counter;
use serde::Deserialize;
use serde_json::Value as Json;
use tracing::debug;

pub use config::{CodecConfig, DEFAULT_MAX_DOC_BYTES, DEFAULT_MAX_DOC_NODES};
pub use encode::EncodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// JSON when the first non-whitespace byte opens an object or array, else YAML.
    pub fn sniff(bytes: &[u8]) -> Format {
        match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') | Some(b'[') => Format::Json,
            _ => Format::Yaml,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    format: Format,
    config: CodecConfig,
}

impl Default for Codec {
    fn default() -> Self { Self::json() }
}

impl Codec {
    pub fn new(format: Format, config: CodecConfig) -> Self { Self { format, config } }

    pub fn json() -> Self { Self::new(Format::Json, CodecConfig::default()) }

    pub fn yaml() -> Self { Self::new(Format::Yaml, CodecConfig::default()) }

    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    pub fn format(&self) -> Format { self.format }

    pub fn config(&self) -> &CodecConfig { &self.config }

    /// Canonical encoding: sorted keys, wire strings for enums, RFC 3339 times.
    /// Discriminators are written only if the object carries them.
    pub fn encode(&self, obj: &ResourceObject) -> Result<Vec<u8>, EncodeError> {
        counter!("kshape_encode_total", 1u64);
        let json = encode::object_to_json(obj.fields(), &FieldPath::root())?;
        let bytes = match self.format {
            Format::Json if self.config.pretty => serde_json::to_vec_pretty(&json)?,
            Format::Json => serde_json::to_vec(&json)?,
            Format::Yaml => serde_yaml::to_string(&json)?.into_bytes(),
        };
        Ok(bytes)
    }

    /// Encode a list wrapper. The wrapper's own `apiVersion` and `kind` are always written.
    pub fn encode_list(&self, list: &ResourceList) -> Result<Vec<u8>, EncodeError> {
        self.encode(&list.clone().into_object().with_discriminators())
    }

    /// Decode a document that names its own `apiVersion` and `kind`.
    pub fn decode(&self, bytes: &[u8], registry: &Registry) -> Result<ResourceObject, DecodeError> {
        self.observe(self.parse(bytes).map_err(DecodeError::from).and_then(|doc| self.decode_doc(doc, registry, None)))
    }

    /// Decode with the kind supplied out-of-band. Self-declared discriminators are
    /// kept as fields and checked later by the validator.
    pub fn decode_as(&self, bytes: &[u8], registry: &Registry, expected: &ResourceKind) -> Result<ResourceObject, DecodeError> {
        self.observe(
            self.parse(bytes)
                .map_err(DecodeError::from)
                .and_then(|doc| self.decode_doc(doc, registry, Some(expected))),
        )
    }

    /// Decode a `<Kind>List` document and split it into items tagged `item_kind`.
    /// A document declaring any other `apiVersion` or `kind` is malformed.
    pub fn decode_list(&self, bytes: &[u8], registry: &Registry, item_kind: &ResourceKind) -> Result<ResourceList, DecodeError> {
        let obj = self.decode_as(bytes, registry, &item_kind.list_kind())?;
        Ok(ResourceList::from_object(obj, item_kind)?)
    }

    /// Decode every document of a stream. YAML streams may hold several `---`
    /// separated documents; documents that are empty or `null` are skipped. Each document succeeds or
    /// fails on its own. The byte limit applies to the whole stream.
    pub fn decode_all(&self, bytes: &[u8], registry: &Registry) -> Vec<Result<ResourceObject, DecodeError>> {
        if self.format == Format::Json {
            return vec![self.decode(bytes, registry)];
        }
        if let Err(e) = self.check_size(bytes) {
            return vec![self.observe(Err(e.into()))];
        }
        let mut out = Vec::new();
        for doc in serde_yaml::Deserializer::from_slice(bytes) {
            let parsed = serde_yaml::Value::deserialize(doc)
                .map_err(|e| MalformedEncodingError::at_root(format!("invalid YAML: {}", e)))
                .and_then(yaml_to_json);
            match parsed {
                Ok(Json::Null) => continue,
                Ok(json) => out.push(self.observe(self.decode_doc(json, registry, None))),
                Err(e) => {
                    // The parser cannot resynchronize after a syntax error.
                    out.push(self.observe(Err(e.into())));
                    break;
                }
            }
        }
        out
    }

    fn observe(&self, r: Result<ResourceObject, DecodeError>) -> Result<ResourceObject, DecodeError> {
        counter!("kshape_decode_total", 1u64);
        if let Err(e) = &r {
            counter!("kshape_decode_err", 1u64);
            debug!(error = %e, "decode failed");
        }
        r
    }

    fn check_size(&self, bytes: &[u8]) -> Result<(), MalformedEncodingError> {
        if bytes.len() > self.config.max_bytes {
            return Err(MalformedEncodingError::at_root(format!(
                "document too large ({} bytes, limit {})",
                bytes.len(),
                self.config.max_bytes
            )));
        }
        Ok(())
    }

    fn parse(&self, bytes: &[u8]) -> Result<Json, MalformedEncodingError> {
        self.check_size(bytes)?;
        match self.format {
            Format::Json => {
                serde_json::from_slice(bytes).map_err(|e| MalformedEncodingError::at_root(format!("invalid JSON: {}", e)))
            }
            Format::Yaml => serde_yaml::from_slice::<serde_yaml::Value>(bytes)
                .map_err(|e| MalformedEncodingError::at_root(format!("invalid YAML: {}", e)))
                .and_then(yaml_to_json),
        }
    }

    fn decode_doc(&self, doc: Json, registry: &Registry, expected: Option<&ResourceKind>) -> Result<ResourceObject, DecodeError> {
        if decode::json_node_budget_exceeded(&doc, self.config.max_nodes) {
            return Err(MalformedEncodingError::at_root(format!(
                "document too complex (>{} nodes)",
                self.config.max_nodes
            ))
            .into());
        }
        let map = match doc {
            Json::Object(map) => map,
            other => {
                return Err(MalformedEncodingError::at_root(format!(
                    "expected object at top level, got {}",
                    decode::json_type(&other)
                ))
                .into())
            }
        };
        let descriptor = {
            let (api_version, kind) = decode::discriminators(&map)?;
            registry.resolve_discriminator(api_version, kind, expected)?
        };
        let fields = decode::decode_object(map, descriptor.root(), &FieldPath::root())?;
        Ok(ResourceObject::from_fields(descriptor.kind().clone(), fields))
    }
}

fn yaml_to_json(v: serde_yaml::Value) -> Result<Json, MalformedEncodingError> {
    serde_json::to_value(v).map_err(|e| MalformedEncodingError::at_root(format!("YAML is not representable as JSON: {}", e)))
}

/// [`Codec::encode`] with the default JSON codec.
pub fn encode(obj: &ResourceObject) -> Result<Vec<u8>, EncodeError> { Codec::json().encode(obj) }

/// [`Codec::decode`] with the format sniffed from `bytes`.
pub fn decode(bytes: &[u8], registry: &Registry) -> Result<ResourceObject, DecodeError> {
    Codec::new(Format::sniff(bytes), CodecConfig::default()).decode(bytes, registry)
}

/// [`Codec::decode_as`] with the format sniffed from `bytes`.
pub fn decode_as(bytes: &[u8], registry: &Registry, expected: &ResourceKind) -> Result<ResourceObject, DecodeError> {
    Codec::new(Format::sniff(bytes), CodecConfig::default()).decode_as(bytes, registry, expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kshape_core::{ClosedEnum, PreemptionPolicy, UnknownKindError, Value};
    use kshape_schema::builtin;

    const PRIORITY: &str = r#"{"apiVersion":"scheduling.k8s.io/v1","kind":"PriorityClass","metadata":{"name":"high"},"value":1000000,"globalDefault":false}"#;

    #[test]
    fn decodes_by_declared_discriminators() {
        let reg = Registry::with_builtins();
        let obj = Codec::json().decode(PRIORITY.as_bytes(), &reg).unwrap();
        assert_eq!(obj.kind(), &builtin::priority_class_kind());
        assert_eq!(obj.get("value"), Some(&Value::Int(1_000_000)));
        assert_eq!(obj.get("globalDefault"), Some(&Value::Bool(false)));
        assert_eq!(obj.name(), Some("high"));
        assert!(!obj.is_present("preemptionPolicy"));
    }

    #[test]
    fn unresolvable_discriminators_are_unknown_kind() {
        let reg = Registry::with_builtins();
        let missing = Codec::json().decode(br#"{"value": 1}"#, &reg).unwrap_err();
        assert_eq!(missing, DecodeError::UnknownKind(UnknownKindError::new(None, None)));

        let wrong = Codec::json().decode(br#"{"apiVersion":"events.k8s.io/v1","kind":"RuntimeClass"}"#, &reg).unwrap_err();
        assert_eq!(
            wrong,
            DecodeError::UnknownKind(UnknownKindError::new(Some("events.k8s.io/v1"), Some("RuntimeClass")))
        );
    }

    #[test]
    fn decode_as_uses_expected_kind() {
        let reg = Registry::with_builtins();
        let obj = Codec::json().decode_as(br#"{"value": 7}"#, &reg, &builtin::priority_class_kind()).unwrap();
        assert_eq!(obj.kind(), &builtin::priority_class_kind());
        assert!(!obj.is_present("apiVersion"));

        let unknown = ResourceKind::new("example.io", "v1", "Widget");
        assert!(matches!(
            Codec::json().decode_as(b"{}", &reg, &unknown),
            Err(DecodeError::UnknownKind(_))
        ));
    }

    #[test]
    fn malformed_inputs() {
        let reg = Registry::with_builtins();
        let codec = Codec::json();
        for input in [&b"{not json"[..], b"[1, 2]", b"\"text\"", b""] {
            assert!(matches!(codec.decode(input, &reg), Err(DecodeError::Malformed(_))), "{:?}", input);
        }
        let err = codec
            .decode(br#"{"apiVersion":"scheduling.k8s.io/v1","kind":"PriorityClass","value":"high"}"#, &reg)
            .unwrap_err();
        match err {
            DecodeError::Malformed(m) => assert_eq!(m.path.to_string(), "value"),
            other => panic!("unexpected: {}", other),
        }
    }

    #[test]
    fn limits_are_enforced() {
        let reg = Registry::with_builtins();
        let small = Codec::json().with_config(CodecConfig::default().with_max_bytes(16));
        assert!(matches!(small.decode(PRIORITY.as_bytes(), &reg), Err(DecodeError::Malformed(_))));

        let shallow = Codec::json().with_config(CodecConfig::default().with_max_nodes(4));
        assert!(matches!(shallow.decode(PRIORITY.as_bytes(), &reg), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn yaml_documents_decode_like_json() {
        let reg = Registry::with_builtins();
        let yaml = "apiVersion: scheduling.k8s.io/v1\nkind: PriorityClass\nmetadata:\n  name: high\nvalue: 1000000\nglobalDefault: false\n";
        let from_yaml = Codec::yaml().decode(yaml.as_bytes(), &reg).unwrap();
        let from_json = Codec::json().decode(PRIORITY.as_bytes(), &reg).unwrap();
        assert_eq!(from_yaml, from_json);
        assert_eq!(decode(yaml.as_bytes(), &reg).unwrap(), from_json);
    }

    #[test]
    fn yaml_streams_decode_per_document() {
        let reg = Registry::with_builtins();
        let stream = "\
apiVersion: scheduling.k8s.io/v1
kind: PriorityClass
value: 10
preemptionPolicy: Never
---
apiVersion: example.io/v1
kind: Widget
---
apiVersion: node.k8s.io/v1
kind: RuntimeClass
handler: runc
";
        let out = Codec::yaml().decode_all(stream.as_bytes(), &reg);
        assert_eq!(out.len(), 3);
        let first = out[0].as_ref().unwrap();
        assert_eq!(first.get("preemptionPolicy"), Some(&PreemptionPolicy::Never.to_value()));
        assert!(matches!(out[1], Err(DecodeError::UnknownKind(_))));
        assert_eq!(out[2].as_ref().unwrap().kind(), &builtin::runtime_class_kind());
    }

    #[test]
    fn encoding_is_canonical() {
        let reg = Registry::with_builtins();
        let obj = Codec::json().decode(PRIORITY.as_bytes(), &reg).unwrap();
        let out = String::from_utf8(encode(&obj).unwrap()).unwrap();
        assert_eq!(
            out,
            r#"{"apiVersion":"scheduling.k8s.io/v1","globalDefault":false,"kind":"PriorityClass","metadata":{"name":"high"},"value":1000000}"#
        );
        let pretty = Codec::json().with_config(CodecConfig::default().with_pretty(true)).encode(&obj).unwrap();
        assert!(String::from_utf8(pretty).unwrap().contains("\n  \"apiVersion\""));
    }

    #[test]
    fn sniffing() {
        assert_eq!(Format::sniff(b"  \n{\"a\":1}"), Format::Json);
        assert_eq!(Format::sniff(b"[]"), Format::Json);
        assert_eq!(Format::sniff(b"a: 1"), Format::Yaml);
        assert_eq!(Format::sniff(b""), Format::Yaml);
    }
}
