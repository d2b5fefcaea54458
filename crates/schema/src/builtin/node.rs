//! node.k8s.io/v1: RuntimeClass, Overhead, Scheduling.

use std::sync::Arc;

use kshape_core::StringFormat;

use super::{refs, runtime_class_kind};
use crate::descriptor::{FieldDescriptor, FieldType, ObjectSchema, SchemaDescriptor};

pub fn overhead() -> Arc<ObjectSchema> {
    ObjectSchema::new("Overhead")
        .field(FieldDescriptor::optional("podFixed", FieldType::map(FieldType::Quantity)))
        .into_arc()
}

pub fn scheduling() -> Arc<ObjectSchema> {
    ObjectSchema::new("Scheduling")
        .field(FieldDescriptor::optional("nodeSelector", FieldType::map(FieldType::String)))
        .field(FieldDescriptor::optional("tolerations", FieldType::list(FieldType::Object(refs::toleration()))))
        .into_arc()
}

pub fn runtime_class() -> SchemaDescriptor {
    let root = ObjectSchema::resource("RuntimeClass")
        .field(FieldDescriptor::required("handler", FieldType::String).with_format(StringFormat::Dns1123Label))
        .field(FieldDescriptor::optional("overhead", FieldType::Object(overhead())))
        .field(FieldDescriptor::optional("scheduling", FieldType::Object(scheduling())));
    SchemaDescriptor::new(runtime_class_kind(), root)
}
