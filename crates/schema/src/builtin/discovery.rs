//! discovery.k8s.io/v1: EndpointSlice and its nested types.

use std::sync::Arc;

use kshape_core::{AddressType, ClosedEnum, Protocol, StringFormat};

use super::{endpoint_slice_kind, refs};
use crate::descriptor::{Cardinality, FieldDescriptor, FieldType, ObjectSchema, SchemaDescriptor};
use crate::rules::{EndpointAddressTypeRule, UniquePortNamesRule};

pub const MAX_ENDPOINTS: usize = 1000;
pub const MAX_PORTS: usize = 100;
pub const MIN_ADDRESSES: usize = 1;
pub const MAX_ADDRESSES: usize = 100;

pub fn endpoint_conditions() -> Arc<ObjectSchema> {
    ObjectSchema::new("EndpointConditions")
        .field(FieldDescriptor::optional("ready", FieldType::Bool))
        .field(FieldDescriptor::optional("serving", FieldType::Bool))
        .field(FieldDescriptor::optional("terminating", FieldType::Bool))
        .into_arc()
}

pub fn for_zone() -> Arc<ObjectSchema> {
    ObjectSchema::new("ForZone")
        .field(FieldDescriptor::required("name", FieldType::String))
        .into_arc()
}

pub fn endpoint_hints() -> Arc<ObjectSchema> {
    ObjectSchema::new("EndpointHints")
        .field(FieldDescriptor::optional("forZones", FieldType::list(FieldType::Object(for_zone()))))
        .into_arc()
}

pub fn endpoint() -> Arc<ObjectSchema> {
    ObjectSchema::new("Endpoint")
        .field(
            FieldDescriptor::required("addresses", FieldType::list(FieldType::String))
                .with_cardinality(Cardinality::between(MIN_ADDRESSES, MAX_ADDRESSES)),
        )
        .field(FieldDescriptor::optional("conditions", FieldType::Object(endpoint_conditions())))
        .field(FieldDescriptor::optional("deprecatedTopology", FieldType::map(FieldType::String)))
        .field(FieldDescriptor::optional("hints", FieldType::Object(endpoint_hints())))
        .field(FieldDescriptor::optional("hostname", FieldType::String).with_format(StringFormat::Dns1123Label))
        .field(FieldDescriptor::optional("nodeName", FieldType::String))
        .field(FieldDescriptor::optional("targetRef", FieldType::Object(refs::object_reference())))
        .field(FieldDescriptor::optional("zone", FieldType::String))
        .into_arc()
}

pub fn endpoint_port() -> Arc<ObjectSchema> {
    ObjectSchema::new("EndpointPort")
        .field(FieldDescriptor::optional("appProtocol", FieldType::String))
        .field(
            FieldDescriptor::optional("name", FieldType::String)
                .with_format(StringFormat::Dns1123LabelOrEmpty)
                .with_default(""),
        )
        .field(FieldDescriptor::optional("port", FieldType::Int32).with_range(1, 65535))
        .field(
            FieldDescriptor::optional("protocol", FieldType::Enum(Protocol::spec()))
                .with_default(Protocol::Tcp.to_value()),
        )
        .into_arc()
}

pub fn endpoint_slice() -> SchemaDescriptor {
    let root = ObjectSchema::resource("EndpointSlice")
        .field(FieldDescriptor::required("addressType", FieldType::Enum(AddressType::spec())))
        .field(
            FieldDescriptor::required("endpoints", FieldType::list(FieldType::Object(endpoint())))
                .with_cardinality(Cardinality::at_most(MAX_ENDPOINTS)),
        )
        .field(
            FieldDescriptor::optional("ports", FieldType::list(FieldType::Object(endpoint_port())))
                .with_cardinality(Cardinality::at_most(MAX_PORTS)),
        )
        .rule(EndpointAddressTypeRule)
        .rule(UniquePortNamesRule);
    SchemaDescriptor::new(endpoint_slice_kind(), root)
}
