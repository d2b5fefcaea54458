//! kshape pipeline façade (in-process).
//!
//! Chains the pieces the way callers normally need them: the registry resolves a
//! schema, the codec decodes, defaults are applied, the validator checks, and the
//! codec emits canonical output.

#![forbid(unsafe_code)]

use std::time::Instant;

use metrics::histogram;
use thiserror::Error;
use tracing::{debug, info};

pub use kshape_codec::{Codec, CodecConfig, EncodeError, Format};
pub use kshape_core::prelude::*;
pub use kshape_core::{DuplicateKindError, MalformedEncodingError, UnknownKindError};
pub use kshape_registry::{Registry, SharedRegistry};
pub use kshape_schema::{builtin, FieldDescriptor, FieldType, ObjectSchema, SchemaDescriptor};
pub use kshape_validate::{apply_defaults, validate};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// A decoded and defaulted object with its validation outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Admission {
    pub object: ResourceObject,
    pub defaults_applied: usize,
    pub validation: Result<(), ValidationError>,
}

impl Admission {
    pub fn is_valid(&self) -> bool { self.validation.is_ok() }

    pub fn into_result(self) -> Result<ResourceObject, ValidationError> { self.validation.map(|()| self.object) }
}

/// Per-document outcomes of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub results: Vec<Result<Admission, DecodeError>>,
}

impl BatchReport {
    pub fn len(&self) -> usize { self.results.len() }

    pub fn is_empty(&self) -> bool { self.results.is_empty() }

    /// Decoded and valid.
    pub fn admitted(&self) -> usize { self.results.iter().filter(|r| matches!(r, Ok(a) if a.is_valid())).count() }

    /// Decoded but failed validation.
    pub fn rejected(&self) -> usize { self.results.iter().filter(|r| matches!(r, Ok(a) if !a.is_valid())).count() }

    /// Could not be decoded.
    pub fn failed(&self) -> usize { self.results.iter().filter(|r| r.is_err()).count() }
}

pub struct Pipeline {
    registry: SharedRegistry,
    codec: Codec,
}

impl Pipeline {
    pub fn new(registry: SharedRegistry, codec: Codec) -> Self { Self { registry, codec } }

    /// Built-in kinds, JSON codec configured from the environment.
    pub fn with_builtins() -> Self {
        Self::new(SharedRegistry::default(), Codec::json().with_config(CodecConfig::from_env()))
    }

    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    pub fn registry(&self) -> &SharedRegistry { &self.registry }

    pub fn codec(&self) -> &Codec { &self.codec }

    pub fn register(&self, kind: ResourceKind, descriptor: SchemaDescriptor) -> Result<(), DuplicateKindError> {
        self.registry.register(kind, descriptor)
    }

    /// Decode by the document's own discriminators, default, then validate.
    pub fn admit(&self, bytes: &[u8]) -> Result<Admission, DecodeError> {
        let reg = self.registry.load();
        let obj = self.codec.decode(bytes, &reg)?;
        self.finish(obj, &reg)
    }

    /// Same as [`admit`](Self::admit) with the kind supplied out-of-band.
    pub fn admit_as(&self, bytes: &[u8], expected: &ResourceKind) -> Result<Admission, DecodeError> {
        let reg = self.registry.load();
        let obj = self.codec.decode_as(bytes, &reg, expected)?;
        self.finish(obj, &reg)
    }

    /// Admit every document of a (possibly multi-document YAML) stream.
    pub fn admit_all(&self, bytes: &[u8]) -> BatchReport {
        let t0 = Instant::now();
        let reg = self.registry.load();
        let results = self
            .codec
            .decode_all(bytes, &reg)
            .into_iter()
            .map(|r| r.and_then(|obj| self.finish(obj, &reg)))
            .collect();
        self.report(BatchReport { results }, t0)
    }

    /// Admit documents independently: one document's failure never affects another.
    pub fn process_batch<D: AsRef<[u8]>>(&self, docs: &[D]) -> BatchReport {
        let t0 = Instant::now();
        let results = docs.iter().map(|d| self.admit(d.as_ref())).collect();
        self.report(BatchReport { results }, t0)
    }

    /// Decode, default and validate, then re-encode. Invalid objects are not encoded.
    pub fn canonicalize(&self, bytes: &[u8]) -> Result<Vec<u8>, PipelineError> {
        let obj = self.admit(bytes)?.into_result()?;
        Ok(self.codec.encode(&obj)?)
    }

    fn finish(&self, mut obj: ResourceObject, reg: &Registry) -> Result<Admission, DecodeError> {
        let descriptor = reg.get(obj.kind())?;
        let defaults_applied = apply_defaults(&mut obj, &descriptor);
        let validation = validate(&obj, &descriptor);
        if let Err(e) = &validation {
            debug!(gvk = %descriptor.kind(), name = obj.name().unwrap_or("-"), errors = e.len(), "object rejected");
        }
        Ok(Admission { object: obj, defaults_applied, validation })
    }

    fn report(&self, report: BatchReport, t0: Instant) -> BatchReport {
        let (admitted, rejected, failed) = (report.admitted(), report.rejected(), report.failed());
        histogram!("kshape_batch_ms", t0.elapsed().as_secs_f64() * 1000.0);
        info!(docs = report.len(), admitted, rejected, failed, "batch processed");
        report
    }
}

impl Default for Pipeline {
    fn default() -> Self { Self::with_builtins() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admission_keeps_object_when_invalid() {
        let p = Pipeline::new(SharedRegistry::default(), Codec::json());
        let a = p
            .admit(br#"{"apiVersion":"scheduling.k8s.io/v1","kind":"PriorityClass","metadata":{"name":"x"}}"#)
            .unwrap();
        assert!(!a.is_valid());
        assert_eq!(a.defaults_applied, 1);
        assert_eq!(a.object.name(), Some("x"));
        let err = a.into_result().unwrap_err();
        assert!(err.has("value", FieldErrorKind::Required));
    }

    #[test]
    fn canonicalize_applies_defaults_and_sorts_keys() {
        let p = Pipeline::new(SharedRegistry::default(), Codec::json());
        let out = p.canonicalize(br#"{"value":5,"kind":"PriorityClass","apiVersion":"scheduling.k8s.io/v1"}"#).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"{"apiVersion":"scheduling.k8s.io/v1","kind":"PriorityClass","preemptionPolicy":"PreemptLowerPriority","value":5}"#
        );
        assert!(matches!(
            p.canonicalize(br#"{"kind":"PriorityClass","apiVersion":"scheduling.k8s.io/v1"}"#),
            Err(PipelineError::Validation(_))
        ));
        assert!(matches!(p.canonicalize(b"{"), Err(PipelineError::Decode(_))));
    }
}
