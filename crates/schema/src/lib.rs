//! kshape schema: introspectable descriptors for resource kinds, plus the built-in
//! discovery/v1, events/v1, node/v1 and scheduling/v1 schemas.

#![forbid(unsafe_code)]

pub mod builtin;
pub mod descriptor;
pub mod rules;

pub use descriptor::{
    Cardinality, FieldDescriptor, FieldSummary, FieldType, IntRange, ObjectRule, ObjectSchema, SchemaDescriptor, Shape,
};
