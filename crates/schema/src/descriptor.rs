//! Schema descriptors: field names, types, optionality, bounds and defaults.

use std::fmt;
use std::sync::Arc;

use kshape_core::object::{API_VERSION, ITEMS, KIND, METADATA};
use kshape_core::{EnumSpec, FieldError, FieldPath, Object, ResourceKind, StringFormat, Value};
use serde::Serialize;
use tracing::debug;

use crate::builtin::meta;

/// Declared type of a field.
#[derive(Debug, Clone)]
pub enum FieldType {
    Bool,
    Int32,
    Int64,
    Float,
    String,
    /// String restricted to a closed set.
    Enum(&'static EnumSpec),
    Quantity,
    Time,
    MicroTime,
    Object(Arc<ObjectSchema>),
    List(Box<FieldType>),
    /// Map of string to T.
    Map(Box<FieldType>),
    /// Opaque; any value is accepted and passed through.
    Any,
}

impl FieldType {
    pub fn list(inner: FieldType) -> Self { FieldType::List(Box::new(inner)) }

    pub fn map(inner: FieldType) -> Self { FieldType::Map(Box::new(inner)) }

    pub fn object(schema: Arc<ObjectSchema>) -> Self { FieldType::Object(schema) }

    pub fn name(&self) -> String {
        match self {
            FieldType::Bool => "boolean".into(),
            FieldType::Int32 => "int32".into(),
            FieldType::Int64 => "int64".into(),
            FieldType::Float => "number".into(),
            FieldType::String => "string".into(),
            FieldType::Enum(spec) => format!("enum {}", spec.name),
            FieldType::Quantity => "quantity".into(),
            FieldType::Time => "time".into(),
            FieldType::MicroTime => "micro-time".into(),
            FieldType::Object(s) => s.name.clone(),
            FieldType::List(inner) => format!("list<{}>", inner.name()),
            FieldType::Map(inner) => format!("map<string, {}>", inner.name()),
            FieldType::Any => "any".into(),
        }
    }

    /// Shallow type conformance. Enum fields accept plain strings here;
    /// membership is a separate check.
    pub fn accepts(&self, v: &Value) -> bool {
        match (self, v) {
            (FieldType::Any, _) => true,
            (FieldType::Bool, Value::Bool(_)) => true,
            (FieldType::Int32, Value::Int(i)) => i32::try_from(*i).is_ok(),
            (FieldType::Int64, Value::Int(_)) => true,
            (FieldType::Float, Value::Float(_) | Value::Int(_)) => true,
            (FieldType::String, Value::String(_)) => true,
            (FieldType::Enum(spec), Value::Enum(e)) => e.spec() == *spec,
            (FieldType::Enum(_), Value::String(_)) => true,
            (FieldType::Quantity, Value::Quantity(_)) => true,
            (FieldType::Time, Value::Time(_)) => true,
            (FieldType::MicroTime, Value::MicroTime(_)) => true,
            (FieldType::Object(_), Value::Object(_)) => true,
            (FieldType::List(_), Value::List(_)) => true,
            (FieldType::Map(_), Value::Object(_)) => true,
            _ => false,
        }
    }
}

/// Allowed number of entries in a list or map field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cardinality {
    pub min: usize,
    pub max: Option<usize>,
}

impl Cardinality {
    pub const fn at_most(max: usize) -> Self { Self { min: 0, max: Some(max) } }

    pub const fn between(min: usize, max: usize) -> Self { Self { min, max: Some(max) } }

    pub fn check(&self, n: usize) -> bool {
        n >= self.min && self.max.map(|m| n <= m).unwrap_or(true)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (0, Some(max)) => write!(f, "at most {}", max),
            (min, Some(max)) => write!(f, "between {} and {}", min, max),
            (min, None) => write!(f, "at least {}", min),
        }
    }
}

/// Inclusive integer bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

impl IntRange {
    pub fn contains(&self, v: i64) -> bool { v >= self.min && v <= self.max }
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Wire name, used verbatim by the codec.
    pub name: String,
    pub ty: FieldType,
    pub required: bool,
    pub cardinality: Option<Cardinality>,
    pub max_length: Option<usize>,
    pub format: Option<StringFormat>,
    pub range: Option<IntRange>,
    pub default: Option<Value>,
}

impl FieldDescriptor {
    fn new(name: &str, ty: FieldType, required: bool) -> Self {
        Self {
            name: name.to_string(),
            ty,
            required,
            cardinality: None,
            max_length: None,
            format: None,
            range: None,
            default: None,
        }
    }

    pub fn optional(name: &str, ty: FieldType) -> Self { Self::new(name, ty, false) }

    pub fn required(name: &str, ty: FieldType) -> Self { Self::new(name, ty, true) }

    pub fn with_cardinality(mut self, c: Cardinality) -> Self {
        self.cardinality = Some(c);
        self
    }

    pub fn with_max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn with_format(mut self, f: StringFormat) -> Self {
        self.format = Some(f);
        self
    }

    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        self.range = Some(IntRange { min, max });
        self
    }

    pub fn with_default(mut self, v: impl Into<Value>) -> Self {
        self.default = Some(v.into());
        self
    }

    /// Closed set declared for this field, if any.
    pub fn enum_spec(&self) -> Option<&'static EnumSpec> {
        match self.ty {
            FieldType::Enum(spec) => Some(spec),
            _ => None,
        }
    }
}

/// Constraint spanning several fields of one object.
pub trait ObjectRule: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Append defects to `out`. `path` locates `obj` within the resource.
    fn check(&self, obj: &Object, path: &FieldPath, out: &mut Vec<FieldError>);
}

/// Fields and cross-field rules of one object type (a resource root or a nested type).
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    pub rules: Vec<Arc<dyn ObjectRule>>,
}

impl ObjectSchema {
    pub fn new(name: &str) -> Self { Self { name: name.to_string(), fields: Vec::new(), rules: Vec::new() } }

    /// Root of a resource kind: `apiVersion`, `kind` and `metadata` are pre-declared.
    pub fn resource(name: &str) -> Self {
        Self::new(name)
            .field(FieldDescriptor::optional(API_VERSION, FieldType::String))
            .field(FieldDescriptor::optional(KIND, FieldType::String))
            .field(FieldDescriptor::optional(METADATA, FieldType::object(meta::object_meta())))
    }

    pub fn field(mut self, f: FieldDescriptor) -> Self {
        self.fields.push(f);
        self
    }

    pub fn rule(mut self, r: impl ObjectRule + 'static) -> Self {
        self.rules.push(Arc::new(r));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> { self.fields.iter().find(|f| f.name == name) }

    pub fn into_arc(self) -> Arc<ObjectSchema> { Arc::new(self) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Single,
    /// List wrapper whose `items` are all of `item`.
    List { item: ResourceKind },
}

/// Complete schema of one registered kind.
#[derive(Debug, Clone)]
pub struct SchemaDescriptor {
    kind: ResourceKind,
    shape: Shape,
    root: Arc<ObjectSchema>,
}

impl SchemaDescriptor {
    pub fn new(kind: ResourceKind, root: ObjectSchema) -> Self {
        Self { kind, shape: Shape::Single, root: Arc::new(root) }
    }

    /// Derive the `<Kind>List` descriptor for a singular kind.
    pub fn list_of(item: &SchemaDescriptor) -> Self {
        let kind = item.kind.list_kind();
        debug!(gvk = %kind, "deriving list schema");
        let root = ObjectSchema::new(&kind.kind)
            .field(FieldDescriptor::optional(API_VERSION, FieldType::String))
            .field(FieldDescriptor::optional(KIND, FieldType::String))
            .field(FieldDescriptor::optional(METADATA, FieldType::object(meta::list_meta())))
            .field(FieldDescriptor::required(ITEMS, FieldType::list(FieldType::Object(item.root.clone()))));
        Self { kind, shape: Shape::List { item: item.kind.clone() }, root: Arc::new(root) }
    }

    /// Same schema under a different kind. List item kinds are kept.
    pub fn with_kind(mut self, kind: ResourceKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn kind(&self) -> &ResourceKind { &self.kind }

    pub fn shape(&self) -> &Shape { &self.shape }

    pub fn is_list(&self) -> bool { matches!(self.shape, Shape::List { .. }) }

    pub fn item_kind(&self) -> Option<&ResourceKind> {
        match &self.shape {
            Shape::List { item } => Some(item),
            Shape::Single => None,
        }
    }

    pub fn root(&self) -> &ObjectSchema { &self.root }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> { self.root.get(name) }

    /// Flattened view of every declared field, depth first, for introspection.
    pub fn describe(&self) -> Vec<FieldSummary> {
        let mut out = Vec::new();
        describe_object(&self.root, &FieldPath::root(), 0, &mut out);
        out
    }
}

/// One row of [`SchemaDescriptor::describe`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSummary {
    pub path: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

// Schemas are trees today; the bound only guards against self-referencing ones.
const MAX_DESCRIBE_DEPTH: usize = 8;

fn describe_object(schema: &ObjectSchema, path: &FieldPath, depth: usize, out: &mut Vec<FieldSummary>) {
    if depth > MAX_DESCRIBE_DEPTH { return; }
    for f in schema.fields.iter() {
        let p = path.child(&f.name);
        out.push(FieldSummary {
            path: p.to_string(),
            ty: f.ty.name(),
            required: f.required,
            cardinality: f.cardinality.map(|c| c.to_string()),
            allowed: f.enum_spec().map(|s| s.variants.to_vec()),
            default: f.default.as_ref().and_then(|d| d.as_str().map(str::to_string)),
        });
        let mut ty = &f.ty;
        let mut nested = p;
        loop {
            match ty {
                FieldType::List(inner) => { ty = inner.as_ref(); nested = nested.child("*"); }
                FieldType::Map(inner) => { ty = inner.as_ref(); nested = nested.child("*"); }
                _ => break,
            }
        }
        if let FieldType::Object(s) = ty {
            describe_object(s, &nested, depth + 1, out);
        }
    }
}
