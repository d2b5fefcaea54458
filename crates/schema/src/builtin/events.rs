//! events.k8s.io/v1: Event and EventSeries.

use std::sync::Arc;

use super::{event_kind, refs};
use crate::descriptor::{FieldDescriptor, FieldType, ObjectSchema, SchemaDescriptor};

pub const MAX_SHORT_TEXT: usize = 128;
pub const MAX_NOTE_BYTES: usize = 1024;

pub fn event_series() -> Arc<ObjectSchema> {
    ObjectSchema::new("EventSeries")
        .field(FieldDescriptor::required("count", FieldType::Int32))
        .field(FieldDescriptor::required("lastObservedTime", FieldType::MicroTime))
        .into_arc()
}

pub fn event() -> SchemaDescriptor {
    let root = ObjectSchema::resource("Event")
        .field(FieldDescriptor::optional("action", FieldType::String).with_max_length(MAX_SHORT_TEXT))
        .field(FieldDescriptor::optional("deprecatedCount", FieldType::Int32))
        .field(FieldDescriptor::optional("deprecatedFirstTimestamp", FieldType::Time))
        .field(FieldDescriptor::optional("deprecatedLastTimestamp", FieldType::Time))
        .field(FieldDescriptor::optional("deprecatedSource", FieldType::Object(refs::event_source())))
        .field(FieldDescriptor::required("eventTime", FieldType::MicroTime))
        .field(FieldDescriptor::optional("note", FieldType::String).with_max_length(MAX_NOTE_BYTES))
        .field(FieldDescriptor::optional("reason", FieldType::String).with_max_length(MAX_SHORT_TEXT))
        .field(FieldDescriptor::optional("regarding", FieldType::Object(refs::object_reference())))
        .field(FieldDescriptor::optional("related", FieldType::Object(refs::object_reference())))
        .field(FieldDescriptor::optional("reportingController", FieldType::String))
        .field(FieldDescriptor::optional("reportingInstance", FieldType::String).with_max_length(MAX_SHORT_TEXT))
        .field(FieldDescriptor::optional("series", FieldType::Object(event_series())))
        // Normal and Warning today; the set is open.
        .field(FieldDescriptor::optional("type", FieldType::String));
    SchemaDescriptor::new(event_kind(), root)
}
