//! Error taxonomy: registry misuse, unresolvable discriminators, malformed wire
//! input, and aggregated field-level validation defects.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::gvk::ResourceKind;
use crate::path::FieldPath;

/// The `apiVersion`/`kind` pair could not be resolved to a registered schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown kind: apiVersion={}, kind={}", show(.api_version), show(.kind))]
pub struct UnknownKindError {
    pub api_version: Option<String>,
    pub kind: Option<String>,
}

fn show(v: &Option<String>) -> String {
    match v {
        Some(s) => format!("{:?}", s),
        None => "<missing>".to_string(),
    }
}

impl UnknownKindError {
    pub fn new(api_version: Option<&str>, kind: Option<&str>) -> Self {
        Self { api_version: api_version.map(str::to_string), kind: kind.map(str::to_string) }
    }

    pub fn for_kind(kind: &ResourceKind) -> Self {
        Self { api_version: Some(kind.api_version()), kind: Some(kind.kind.clone()) }
    }
}

/// A kind was registered twice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("kind {0} is already registered")]
pub struct DuplicateKindError(pub ResourceKind);

/// Wire input does not have the structural shape the schema expects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed encoding at {path}: {reason}")]
pub struct MalformedEncodingError {
    pub path: FieldPath,
    pub reason: String,
}

impl MalformedEncodingError {
    pub fn new(path: FieldPath, reason: impl Into<String>) -> Self {
        Self { path, reason: reason.into() }
    }

    pub fn at_root(reason: impl Into<String>) -> Self { Self::new(FieldPath::root(), reason) }
}

/// Failure of a single decode call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error(transparent)]
    UnknownKind(#[from] UnknownKindError),
    #[error(transparent)]
    Malformed(#[from] MalformedEncodingError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldErrorKind {
    Required,
    Type,
    Cardinality,
    Enum,
    Length,
    Format,
    Range,
    CrossField,
    DiscriminatorMismatch,
}

impl FieldErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldErrorKind::Required => "required",
            FieldErrorKind::Type => "type",
            FieldErrorKind::Cardinality => "cardinality",
            FieldErrorKind::Enum => "enum",
            FieldErrorKind::Length => "length",
            FieldErrorKind::Format => "format",
            FieldErrorKind::Range => "range",
            FieldErrorKind::CrossField => "cross-field",
            FieldErrorKind::DiscriminatorMismatch => "discriminator-mismatch",
        }
    }
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// One defect found by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: FieldPath,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(path: FieldPath, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self { path, kind, message: message.into() }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.path, self.kind, self.message)
    }
}

/// All field defects of one object, in the order they were found.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Error)]
#[error("validation failed with {} error(s): {}", .errors.len(), summarize(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ")
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self { Self { errors } }

    pub fn is_empty(&self) -> bool { self.errors.is_empty() }

    pub fn len(&self) -> usize { self.errors.len() }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> { self.errors.iter() }

    /// Errors whose rendered path equals `path`.
    pub fn at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |e| e.path.to_string() == path)
    }

    pub fn has(&self, path: &str, kind: FieldErrorKind) -> bool {
        self.at(path).any(|e| e.kind == kind)
    }

    /// `Ok(())` when no errors were collected.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() { Ok(()) } else { Err(self) }
    }
}
