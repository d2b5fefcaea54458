//! core/v1 fragments referenced by other groups.

use std::sync::Arc;

use kshape_core::{ClosedEnum, TaintEffect, TolerationOperator};

use crate::descriptor::{FieldDescriptor, FieldType, ObjectSchema};
use crate::rules::TolerationValueRule;

pub fn object_reference() -> Arc<ObjectSchema> {
    ObjectSchema::new("ObjectReference")
        .field(FieldDescriptor::optional("apiVersion", FieldType::String))
        .field(FieldDescriptor::optional("fieldPath", FieldType::String))
        .field(FieldDescriptor::optional("kind", FieldType::String))
        .field(FieldDescriptor::optional("name", FieldType::String))
        .field(FieldDescriptor::optional("namespace", FieldType::String))
        .field(FieldDescriptor::optional("resourceVersion", FieldType::String))
        .field(FieldDescriptor::optional("uid", FieldType::String))
        .into_arc()
}

pub fn event_source() -> Arc<ObjectSchema> {
    ObjectSchema::new("EventSource")
        .field(FieldDescriptor::optional("component", FieldType::String))
        .field(FieldDescriptor::optional("host", FieldType::String))
        .into_arc()
}

pub fn toleration() -> Arc<ObjectSchema> {
    ObjectSchema::new("Toleration")
        .field(FieldDescriptor::optional("effect", FieldType::Enum(TaintEffect::spec())))
        .field(FieldDescriptor::optional("key", FieldType::String))
        .field(
            FieldDescriptor::optional("operator", FieldType::Enum(TolerationOperator::spec()))
                .with_default(TolerationOperator::Equal.to_value()),
        )
        .field(FieldDescriptor::optional("tolerationSeconds", FieldType::Int64))
        .field(FieldDescriptor::optional("value", FieldType::String))
        .rule(TolerationValueRule)
        .into_arc()
}
