//! scheduling.k8s.io/v1: PriorityClass.

use kshape_core::{ClosedEnum, PreemptionPolicy};

use super::priority_class_kind;
use crate::descriptor::{FieldDescriptor, FieldType, ObjectSchema, SchemaDescriptor};

pub fn priority_class() -> SchemaDescriptor {
    let root = ObjectSchema::resource("PriorityClass")
        .field(FieldDescriptor::optional("description", FieldType::String))
        .field(FieldDescriptor::optional("globalDefault", FieldType::Bool))
        .field(
            FieldDescriptor::optional("preemptionPolicy", FieldType::Enum(PreemptionPolicy::spec()))
                .with_default(PreemptionPolicy::PreemptLowerPriority.to_value()),
        )
        .field(FieldDescriptor::required("value", FieldType::Int32));
    SchemaDescriptor::new(priority_class_kind(), root)
}
