//! Built-in resource schemas.
//!
//! Each submodule mirrors one API group/version. Nested types are shared within a
//! group through `Arc<ObjectSchema>`; they are not registered on their own.

use kshape_core::ResourceKind;

use crate::descriptor::SchemaDescriptor;

pub mod discovery;
pub mod events;
pub mod meta;
pub mod node;
pub mod refs;
pub mod scheduling;

pub const DISCOVERY_GROUP: &str = "discovery.k8s.io";
pub const EVENTS_GROUP: &str = "events.k8s.io";
pub const NODE_GROUP: &str = "node.k8s.io";
pub const SCHEDULING_GROUP: &str = "scheduling.k8s.io";

pub fn endpoint_slice_kind() -> ResourceKind { ResourceKind::new(DISCOVERY_GROUP, "v1", "EndpointSlice") }

pub fn event_kind() -> ResourceKind { ResourceKind::new(EVENTS_GROUP, "v1", "Event") }

pub fn runtime_class_kind() -> ResourceKind { ResourceKind::new(NODE_GROUP, "v1", "RuntimeClass") }

pub fn priority_class_kind() -> ResourceKind { ResourceKind::new(SCHEDULING_GROUP, "v1", "PriorityClass") }

/// Singular descriptor for a built-in kind. List kinds are derived by the registry.
pub fn descriptor_for(group: &str, version: &str, kind: &str) -> Option<SchemaDescriptor> {
    match (group, version, kind) {
        (DISCOVERY_GROUP, "v1", "EndpointSlice") => Some(discovery::endpoint_slice()),
        (EVENTS_GROUP, "v1", "Event") => Some(events::event()),
        (NODE_GROUP, "v1", "RuntimeClass") => Some(node::runtime_class()),
        (SCHEDULING_GROUP, "v1", "PriorityClass") => Some(scheduling::priority_class()),
        _ => None,
    }
}

/// All built-in singular descriptors.
pub fn all() -> Vec<SchemaDescriptor> {
    vec![discovery::endpoint_slice(), events::event(), node::runtime_class(), scheduling::priority_class()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_lookup_is_exact() {
        for d in all() {
            let k = d.kind().clone();
            let again = descriptor_for(&k.group, &k.version, &k.kind).expect("builtin resolves");
            assert_eq!(again.kind(), &k);
        }
        assert!(descriptor_for(DISCOVERY_GROUP, "v1beta1", "EndpointSlice").is_none());
        assert!(descriptor_for(EVENTS_GROUP, "v1", "event").is_none());
        assert!(descriptor_for(EVENTS_GROUP, "v1", "RuntimeClass").is_none());
    }

    #[test]
    fn describe_flattens_nested_fields() {
        let rows = discovery::endpoint_slice().describe();
        let find = |p: &str| rows.iter().find(|r| r.path == p).unwrap_or_else(|| panic!("{} not described", p));

        let at = find("addressType");
        assert!(at.required);
        assert_eq!(at.allowed.as_deref(), Some(&["IPv4", "IPv6", "FQDN"][..]));
        assert_eq!(find("endpoints").cardinality.as_deref(), Some("at most 1000"));
        assert_eq!(find("endpoints.*.addresses").cardinality.as_deref(), Some("between 1 and 100"));
        assert_eq!(find("endpoints.*.conditions.ready").ty, "boolean");
        assert_eq!(find("ports.*.protocol").default.as_deref(), Some("TCP"));
        assert_eq!(find("metadata.labels").ty, "map<string, string>");

        let row = serde_json::to_value(find("ports.*.port")).unwrap();
        assert_eq!(row, serde_json::json!({ "path": "ports.*.port", "type": "int32", "required": false }));
    }

    #[test]
    fn every_builtin_declares_discriminators_and_metadata() {
        for d in all() {
            for name in ["apiVersion", "kind", "metadata"] {
                let f = d.field(name).unwrap_or_else(|| panic!("{} missing on {}", name, d.kind()));
                assert!(!f.required);
            }
        }
    }
}
