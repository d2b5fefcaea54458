//! Cross-field rules attached to built-in object schemas.

use kshape_core::format::{is_dns1123_subdomain, is_ipv4, is_ipv6};
use kshape_core::{AddressType, ClosedEnum, FieldError, FieldErrorKind, FieldPath, Object, TolerationOperator, Value};
use rustc_hash::FxHashMap;

use crate::descriptor::ObjectRule;

/// Every `endpoints[*].addresses[*]` must be of the slice's `addressType`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointAddressTypeRule;

impl EndpointAddressTypeRule {
    fn conforms(ty: AddressType, addr: &str) -> bool {
        match ty {
            AddressType::IPv4 => is_ipv4(addr),
            AddressType::IPv6 => is_ipv6(addr),
            AddressType::Fqdn => is_dns1123_subdomain(addr),
        }
    }
}

impl ObjectRule for EndpointAddressTypeRule {
    fn name(&self) -> &'static str { "endpoint-address-type" }

    fn check(&self, obj: &Object, path: &FieldPath, out: &mut Vec<FieldError>) {
        // Missing or unknown addressType is already reported by field checks.
        let Some(ty) = obj.get("addressType").and_then(AddressType::from_value) else { return };
        let Some(endpoints) = obj.get("endpoints").and_then(Value::as_list) else { return };
        for (i, ep) in endpoints.iter().enumerate() {
            let Some(addresses) = ep.get("addresses").and_then(Value::as_list) else { continue };
            for (j, addr) in addresses.iter().enumerate() {
                let Some(addr) = addr.as_str() else { continue };
                if !Self::conforms(ty, addr) {
                    out.push(FieldError::new(
                        path.child("endpoints").index(i).child("addresses").index(j),
                        FieldErrorKind::CrossField,
                        format!("{:?} is not a valid {} address (slice addressType is {})", addr, ty, ty),
                    ));
                }
            }
        }
    }
}

/// Port names within a slice are unique. An absent name counts as `""`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniquePortNamesRule;

impl ObjectRule for UniquePortNamesRule {
    fn name(&self) -> &'static str { "unique-port-names" }

    fn check(&self, obj: &Object, path: &FieldPath, out: &mut Vec<FieldError>) {
        let Some(ports) = obj.get("ports").and_then(Value::as_list) else { return };
        let mut seen: FxHashMap<&str, usize> = FxHashMap::default();
        for (i, port) in ports.iter().enumerate() {
            let Some(port) = port.as_object() else { continue };
            let name = match port.get("name") {
                None | Some(Value::Null) => "",
                Some(v) => match v.as_str() {
                    Some(s) => s,
                    None => continue,
                },
            };
            if let Some(first) = seen.get(name) {
                out.push(FieldError::new(
                    path.child("ports").index(i).child("name"),
                    FieldErrorKind::CrossField,
                    format!("duplicate port name {:?} (first used by ports[{}])", name, first),
                ));
            } else {
                seen.insert(name, i);
            }
        }
    }
}

/// `operator: Exists` tolerates any value, so `value` must be empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct TolerationValueRule;

impl ObjectRule for TolerationValueRule {
    fn name(&self) -> &'static str { "toleration-exists-value" }

    fn check(&self, obj: &Object, path: &FieldPath, out: &mut Vec<FieldError>) {
        let op = obj.get("operator").and_then(TolerationOperator::from_value);
        if op != Some(TolerationOperator::Exists) { return; }
        if let Some(value) = obj.get("value").and_then(Value::as_str) {
            if !value.is_empty() {
                out.push(FieldError::new(
                    path.child("value"),
                    FieldErrorKind::CrossField,
                    "value must be empty when operator is Exists",
                ));
            }
        }
    }
}
