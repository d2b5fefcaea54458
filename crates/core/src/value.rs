//! Dynamic value model for decoded resource objects.
//!
//! Presence is carried by key presence in an [`Object`]: an absent key and a key
//! holding `false`/`0`/`""` are different states and stay different through
//! defaulting and encoding.

use std::collections::BTreeMap;
use std::fmt;

use crate::primitives::{MicroTime, Quantity, Time};

/// String-keyed fields of an object, or the entries of a map-of-T field.
pub type Object = BTreeMap<String, Value>;

/// Equality treats an enum member and a plain string with the same wire text as
/// equal, so objects built in memory compare equal to their decoded form.
#[derive(Debug, Clone)]
pub enum Value {
    /// Explicit `null` on the wire. Present, but treated as unset by defaulting and validation.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Member of a closed string set.
    Enum(EnumValue),
    Quantity(Quantity),
    Time(Time),
    MicroTime(MicroTime),
    List(Vec<Value>),
    Object(Object),
    /// Field unknown to the schema, carried through untouched.
    Raw(serde_json::Value),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "number",
            Value::String(_) => "string",
            Value::Enum(_) => "enum",
            Value::Quantity(_) => "quantity",
            Value::Time(_) => "time",
            Value::MicroTime(_) => "micro-time",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Raw(_) => "raw",
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }

    pub fn as_bool(&self) -> Option<bool> {
        match self { Value::Bool(b) => Some(*b), _ => None }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self { Value::Int(i) => Some(*i), _ => None }
    }

    /// String view of strings and enum members.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            Value::Enum(e) => Some(e.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self { Value::List(items) => Some(items.as_slice()), _ => None }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self { Value::List(items) => Some(items), _ => None }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self { Value::Object(o) => Some(o), _ => None }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self { Value::Object(o) => Some(o), _ => None }
    }

    /// Look up a field of an object value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|o| o.get(key))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Enum(e), Value::String(s)) | (Value::String(s), Value::Enum(e)) => e.as_str() == s,
            (Value::Quantity(a), Value::Quantity(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::MicroTime(a), Value::MicroTime(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Raw(a), Value::Raw(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self { Value::Bool(v) }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self { Value::Int(v) }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self { Value::Int(v as i64) }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self { Value::Float(v) }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self { Value::String(v.to_string()) }
}

impl From<String> for Value {
    fn from(v: String) -> Self { Value::String(v) }
}

impl From<EnumValue> for Value {
    fn from(v: EnumValue) -> Self { Value::Enum(v) }
}

impl From<Quantity> for Value {
    fn from(v: Quantity) -> Self { Value::Quantity(v) }
}

impl From<Time> for Value {
    fn from(v: Time) -> Self { Value::Time(v) }
}

impl From<MicroTime> for Value {
    fn from(v: MicroTime) -> Self { Value::MicroTime(v) }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self { Value::List(v) }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self { Value::Object(v) }
}

/// A closed set of wire strings, e.g. `{IPv4, IPv6, FQDN}`.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumSpec {
    pub name: &'static str,
    pub variants: &'static [&'static str],
}

impl EnumSpec {
    pub const fn new(name: &'static str, variants: &'static [&'static str]) -> Self {
        Self { name, variants }
    }

    pub fn position(&self, s: &str) -> Option<usize> {
        self.variants.iter().position(|v| *v == s)
    }

    pub fn contains(&self, s: &str) -> bool { self.position(s).is_some() }

    /// Tag `s` as a member of this set. Case-sensitive.
    pub fn member(&'static self, s: &str) -> Option<EnumValue> {
        self.position(s).map(|index| EnumValue { spec: self, index })
    }
}

impl fmt::Display for EnumSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.variants.join(", "))
    }
}

/// A tagged member of an [`EnumSpec`]. Only the codec turns it back into a string.
#[derive(Debug, Clone, Copy)]
pub struct EnumValue {
    spec: &'static EnumSpec,
    index: usize,
}

impl EnumValue {
    pub(crate) fn at(spec: &'static EnumSpec, index: usize) -> Self {
        debug_assert!(index < spec.variants.len());
        Self { spec, index }
    }

    pub fn spec(&self) -> &'static EnumSpec { self.spec }

    pub fn index(&self) -> usize { self.index }

    pub fn as_str(&self) -> &'static str { self.spec.variants[self.index] }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.spec == other.spec
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
