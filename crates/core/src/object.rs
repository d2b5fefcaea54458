//! Decoded resource instances and their list wrappers.

use crate::error::MalformedEncodingError;
use crate::gvk::ResourceKind;
use crate::path::FieldPath;
use crate::value::{Object, Value};

pub const API_VERSION: &str = "apiVersion";
pub const KIND: &str = "kind";
pub const METADATA: &str = "metadata";
pub const ITEMS: &str = "items";

/// A resource instance: its fields, tagged with the kind it was resolved as.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceObject {
    kind: ResourceKind,
    fields: Object,
}

impl ResourceObject {
    pub fn new(kind: ResourceKind) -> Self { Self { kind, fields: Object::new() } }

    pub fn from_fields(kind: ResourceKind, fields: Object) -> Self { Self { kind, fields } }

    pub fn kind(&self) -> &ResourceKind { &self.kind }

    pub fn fields(&self) -> &Object { &self.fields }

    pub fn fields_mut(&mut self) -> &mut Object { &mut self.fields }

    pub fn into_fields(self) -> Object { self.fields }

    pub fn get(&self, name: &str) -> Option<&Value> { self.fields.get(name) }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> { self.fields.get_mut(name) }

    pub fn is_present(&self, name: &str) -> bool { self.fields.contains_key(name) }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.to_string(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> { self.fields.remove(name) }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Write `apiVersion` and `kind` from the tagged kind.
    pub fn with_discriminators(mut self) -> Self {
        let api_version = self.kind.api_version();
        let kind = self.kind.kind.clone();
        self.set(API_VERSION, api_version);
        self.set(KIND, kind);
        self
    }

    /// Self-declared `apiVersion`, when present and a string.
    pub fn declared_api_version(&self) -> Option<&str> { self.get(API_VERSION).and_then(Value::as_str) }

    /// Self-declared `kind`, when present and a string.
    pub fn declared_kind(&self) -> Option<&str> { self.get(KIND).and_then(Value::as_str) }

    pub fn name(&self) -> Option<&str> { self.lookup("metadata.name").and_then(Value::as_str) }

    pub fn namespace(&self) -> Option<&str> { self.lookup("metadata.namespace").and_then(Value::as_str) }

    /// Follow a dotted path with optional `[index]` per segment, e.g. `endpoints[0].conditions.ready`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segs = path.split('.');
        let first = segs.next()?;
        let (key, idx) = split_index(first)?;
        let mut cur = self.fields.get(key)?;
        if let Some(i) = idx {
            cur = cur.as_list()?.get(i)?;
        }
        for seg in segs {
            let (key, idx) = split_index(seg)?;
            cur = cur.get(key)?;
            if let Some(i) = idx {
                cur = cur.as_list()?.get(i)?;
            }
        }
        Some(cur)
    }
}

fn split_index(seg: &str) -> Option<(&str, Option<usize>)> {
    if seg.is_empty() { return None; }
    match seg.find('[') {
        Some(brk) => {
            let inner = seg.get(brk + 1..)?.strip_suffix(']')?;
            Some((&seg[..brk], Some(inner.parse().ok()?)))
        }
        None => Some((seg, None)),
    }
}

/// `{apiVersion, kind: "<Kind>List", metadata, items}` with every item tagged as `item_kind`.
/// Wrapper fields other than the discriminators, `metadata` and a well-formed
/// `items` list are kept in `extra`, including an explicit `items: null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceList {
    pub item_kind: ResourceKind,
    pub metadata: Option<Value>,
    pub items: Vec<ResourceObject>,
    pub extra: Object,
}

impl ResourceList {
    pub fn new(item_kind: ResourceKind) -> Self {
        Self { item_kind, metadata: None, items: Vec::new(), extra: Object::new() }
    }

    pub fn push(&mut self, item: ResourceObject) { self.items.push(item) }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Wrap into a single object tagged with the list kind. Discriminators are not added.
    /// A carried `items: null` is written back only while the list has no items.
    pub fn into_object(self) -> ResourceObject {
        let mut out = ResourceObject::from_fields(self.item_kind.list_kind(), self.extra);
        if let Some(meta) = self.metadata {
            out.set(METADATA, meta);
        }
        if !self.items.is_empty() || !out.is_present(ITEMS) {
            let items = self.items.into_iter().map(|i| Value::Object(i.into_fields())).collect::<Vec<_>>();
            out.set(ITEMS, Value::List(items));
        }
        out
    }

    /// Split a list-kind object into its items. Fails if `obj` is not tagged
    /// `<item_kind>List`, declares a different `apiVersion` or `kind`, or `items`
    /// holds non-objects.
    pub fn from_object(obj: ResourceObject, item_kind: &ResourceKind) -> Result<Self, MalformedEncodingError> {
        let list_kind = item_kind.list_kind();
        if obj.kind() != &list_kind {
            return Err(MalformedEncodingError::at_root(format!("{} is not a list of {}", obj.kind(), item_kind)));
        }
        check_declared(&obj, API_VERSION, &list_kind.api_version())?;
        check_declared(&obj, KIND, &list_kind.kind)?;

        let mut fields = obj.into_fields();
        fields.remove(API_VERSION);
        fields.remove(KIND);
        let metadata = fields.remove(METADATA);
        let raw_items = match fields.remove(ITEMS) {
            Some(Value::List(items)) => items,
            None => Vec::new(),
            Some(Value::Null) => {
                fields.insert(ITEMS.to_string(), Value::Null);
                Vec::new()
            }
            Some(other) => {
                return Err(MalformedEncodingError::new(
                    FieldPath::root().child(ITEMS),
                    format!("expected list, got {}", other.type_name()),
                ))
            }
        };
        let mut items = Vec::with_capacity(raw_items.len());
        for (i, it) in raw_items.into_iter().enumerate() {
            match it {
                Value::Object(o) => items.push(ResourceObject::from_fields(item_kind.clone(), o)),
                other => {
                    return Err(MalformedEncodingError::new(
                        FieldPath::root().child(ITEMS).index(i),
                        format!("expected object, got {}", other.type_name()),
                    ))
                }
            }
        }
        Ok(Self { item_kind: item_kind.clone(), metadata, items, extra: fields })
    }
}

/// An absent or null discriminator is fine; anything else must equal `expected`.
fn check_declared(obj: &ResourceObject, name: &str, expected: &str) -> Result<(), MalformedEncodingError> {
    match obj.get(name) {
        None | Some(Value::Null) => Ok(()),
        Some(v) if v.as_str() == Some(expected) => Ok(()),
        Some(v) => Err(MalformedEncodingError::new(
            FieldPath::root().child(name),
            format!("list document declares {} {}, expected {:?}", name, describe(v), expected),
        )),
    }
}

fn describe(v: &Value) -> String {
    match v.as_str() {
        Some(s) => format!("{:?}", s),
        None => v.type_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice_kind() -> ResourceKind { ResourceKind::new("discovery.k8s.io", "v1", "EndpointSlice") }

    #[test]
    fn lookup_follows_fields_and_indices() {
        let mut cond = Object::new();
        cond.insert("ready".into(), Value::Bool(false));
        let mut ep = Object::new();
        ep.insert("addresses".into(), Value::List(vec!["10.0.0.1".into()]));
        ep.insert("conditions".into(), Value::Object(cond));
        let mut meta = Object::new();
        meta.insert("name".into(), "web-abc".into());
        let obj = ResourceObject::new(slice_kind())
            .with("endpoints", Value::List(vec![Value::Object(ep)]))
            .with("metadata", Value::Object(meta));

        assert_eq!(obj.lookup("endpoints[0].conditions.ready"), Some(&Value::Bool(false)));
        assert_eq!(obj.lookup("endpoints[0].addresses[0]").and_then(Value::as_str), Some("10.0.0.1"));
        assert_eq!(obj.lookup("endpoints[1]"), None);
        assert_eq!(obj.lookup("endpoints[x]"), None);
        assert_eq!(obj.name(), Some("web-abc"));
        assert_eq!(obj.namespace(), None);
    }

    #[test]
    fn discriminators_are_opt_in() {
        let bare = ResourceObject::new(slice_kind());
        assert!(!bare.is_present(API_VERSION));
        let stamped = bare.with_discriminators();
        assert_eq!(stamped.declared_api_version(), Some("discovery.k8s.io/v1"));
        assert_eq!(stamped.declared_kind(), Some("EndpointSlice"));
    }

    #[test]
    fn list_wrapper_round_trips_items() {
        let mut list = ResourceList::new(slice_kind());
        list.push(ResourceObject::new(slice_kind()).with("addressType", "IPv4"));
        list.push(ResourceObject::new(slice_kind()).with("addressType", "IPv6"));
        let obj = list.clone().into_object();
        assert_eq!(obj.kind().kind, "EndpointSliceList");
        let back = ResourceList::from_object(obj, &slice_kind()).unwrap();
        assert_eq!(back, list);
        assert!(back.items.iter().all(|i| i.kind() == &slice_kind()));

        let wrong = ResourceObject::new(slice_kind());
        assert!(ResourceList::from_object(wrong, &slice_kind()).is_err());
    }

    #[test]
    fn list_wrapper_rejects_foreign_discriminators() {
        let list_kind = slice_kind().list_kind();
        let singular = ResourceObject::new(list_kind.clone())
            .with(API_VERSION, "discovery.k8s.io/v1")
            .with(KIND, "EndpointSlice")
            .with("addressType", "IPv4");
        let err = ResourceList::from_object(singular, &slice_kind()).unwrap_err();
        assert_eq!(err.path.to_string(), "kind");

        let other_version = ResourceObject::new(list_kind.clone()).with(API_VERSION, "discovery.k8s.io/v1beta1");
        assert!(ResourceList::from_object(other_version, &slice_kind()).is_err());

        let declared = ResourceObject::new(list_kind).with_discriminators();
        assert!(ResourceList::from_object(declared, &slice_kind()).is_ok());
    }

    #[test]
    fn list_wrapper_keeps_extra_fields_and_null_items() {
        let obj = ResourceObject::new(slice_kind().list_kind())
            .with("items", Value::Null)
            .with("x-extra", 1i64);
        let list = ResourceList::from_object(obj.clone(), &slice_kind()).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.extra.get("x-extra"), Some(&Value::Int(1)));
        assert_eq!(list.clone().into_object(), obj);

        let mut filled = list;
        filled.push(ResourceObject::new(slice_kind()).with("addressType", "FQDN"));
        let out = filled.into_object();
        assert!(matches!(out.get("items"), Some(Value::List(items)) if items.len() == 1));
    }
}
