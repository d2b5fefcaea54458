//! ObjectMeta and ListMeta. Only the commonly inspected fields are declared;
//! everything else (ownerReferences, managedFields, ...) passes through as-is.

use std::sync::Arc;

use crate::descriptor::{FieldDescriptor, FieldType, ObjectSchema};

pub fn object_meta() -> Arc<ObjectSchema> {
    ObjectSchema::new("ObjectMeta")
        .field(FieldDescriptor::optional("annotations", FieldType::map(FieldType::String)))
        .field(FieldDescriptor::optional("creationTimestamp", FieldType::Time))
        .field(FieldDescriptor::optional("deletionGracePeriodSeconds", FieldType::Int64))
        .field(FieldDescriptor::optional("deletionTimestamp", FieldType::Time))
        .field(FieldDescriptor::optional("finalizers", FieldType::list(FieldType::String)))
        .field(FieldDescriptor::optional("generateName", FieldType::String))
        .field(FieldDescriptor::optional("generation", FieldType::Int64))
        .field(FieldDescriptor::optional("labels", FieldType::map(FieldType::String)))
        .field(FieldDescriptor::optional("name", FieldType::String))
        .field(FieldDescriptor::optional("namespace", FieldType::String))
        .field(FieldDescriptor::optional("resourceVersion", FieldType::String))
        .field(FieldDescriptor::optional("uid", FieldType::String))
        .into_arc()
}

pub fn list_meta() -> Arc<ObjectSchema> {
    ObjectSchema::new("ListMeta")
        .field(FieldDescriptor::optional("continue", FieldType::String))
        .field(FieldDescriptor::optional("remainingItemCount", FieldType::Int64))
        .field(FieldDescriptor::optional("resourceVersion", FieldType::String))
        .field(FieldDescriptor::optional("selfLink", FieldType::String))
        .into_arc()
}
