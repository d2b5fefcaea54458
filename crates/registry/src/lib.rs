//! kshape registry: maps `(group, version, kind)` to schema descriptors and resolves
//! wire discriminators.
//!
//! [`Registry`] is plain data: build it, then share it read-only. [`SharedRegistry`]
//! adds registration after startup: one writer at a time publishes a new snapshot,
//! readers load the current snapshot without locking.

#![forbid(unsafe_code)]

use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use kshape_core::{DuplicateKindError, ResourceKind, UnknownKindError};
use kshape_schema::{builtin, SchemaDescriptor};
use metrics::counter;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct Registry {
    by_kind: FxHashMap<ResourceKind, Arc<SchemaDescriptor>>,
}

impl Registry {
    pub fn new() -> Self { Self::default() }

    /// Registry holding EndpointSlice, Event, RuntimeClass, PriorityClass and their lists.
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        for d in builtin::all() {
            let kind = d.kind().clone();
            if let Err(e) = reg.register(kind, d) {
                warn!(error = %e, "skipping builtin schema");
            }
        }
        reg
    }

    pub fn len(&self) -> usize { self.by_kind.len() }

    pub fn is_empty(&self) -> bool { self.by_kind.is_empty() }

    pub fn contains(&self, kind: &ResourceKind) -> bool { self.by_kind.contains_key(kind) }

    /// Register `descriptor` under `kind`. A singular descriptor also registers its
    /// `<Kind>List` wrapper. Nothing is inserted if either key is taken.
    pub fn register(&mut self, kind: ResourceKind, descriptor: SchemaDescriptor) -> Result<(), DuplicateKindError> {
        let descriptor = descriptor.with_kind(kind.clone());
        let list = if descriptor.is_list() { None } else { Some(SchemaDescriptor::list_of(&descriptor)) };

        if self.by_kind.contains_key(&kind) {
            warn!(gvk = %kind, "duplicate registration");
            return Err(DuplicateKindError(kind));
        }
        if let Some(list) = &list {
            if self.by_kind.contains_key(list.kind()) {
                warn!(gvk = %list.kind(), "duplicate registration of derived list kind");
                return Err(DuplicateKindError(list.kind().clone()));
            }
        }

        debug!(gvk = %kind, list = descriptor.is_list(), "registered schema");
        self.by_kind.insert(kind, Arc::new(descriptor));
        if let Some(list) = list {
            debug!(gvk = %list.kind(), "registered list schema");
            self.by_kind.insert(list.kind().clone(), Arc::new(list));
        }
        counter!("kshape_registry_register_total", 1u64);
        Ok(())
    }

    /// Resolve wire discriminators. Exact, case-sensitive match only.
    pub fn resolve(&self, api_version: &str, kind: &str) -> Result<Arc<SchemaDescriptor>, UnknownKindError> {
        ResourceKind::from_discriminator(api_version, kind)
            .and_then(|k| self.by_kind.get(&k).cloned())
            .ok_or_else(|| UnknownKindError::new(Some(api_version), Some(kind)))
    }

    /// Resolve a kind supplied out-of-band.
    pub fn get(&self, kind: &ResourceKind) -> Result<Arc<SchemaDescriptor>, UnknownKindError> {
        self.by_kind.get(kind).cloned().ok_or_else(|| UnknownKindError::for_kind(kind))
    }

    /// Pick the schema for an incoming object. An `expected` kind always wins;
    /// otherwise both discriminators must be present and registered.
    pub fn resolve_discriminator(
        &self,
        api_version: Option<&str>,
        kind: Option<&str>,
        expected: Option<&ResourceKind>,
    ) -> Result<Arc<SchemaDescriptor>, UnknownKindError> {
        match (expected, api_version, kind) {
            (Some(expected), _, _) => self.get(expected),
            (None, Some(av), Some(k)) => self.resolve(av, k),
            (None, av, k) => Err(UnknownKindError::new(av, k)),
        }
    }

    /// Registered kinds in `(group, version, kind)` order.
    pub fn kinds(&self) -> Vec<ResourceKind> {
        let mut out: Vec<ResourceKind> = self.by_kind.keys().cloned().collect();
        out.sort();
        out
    }
}

/// Registry that accepts registrations while being read.
pub struct SharedRegistry {
    snap: ArcSwap<Registry>,
    writer: Mutex<()>,
}

impl SharedRegistry {
    pub fn new(initial: Registry) -> Self {
        Self { snap: ArcSwap::from_pointee(initial), writer: Mutex::new(()) }
    }

    /// Current snapshot. Later registrations do not affect a loaded snapshot.
    pub fn load(&self) -> Arc<Registry> { self.snap.load_full() }

    pub fn resolve(&self, api_version: &str, kind: &str) -> Result<Arc<SchemaDescriptor>, UnknownKindError> {
        self.snap.load().resolve(api_version, kind)
    }

    pub fn get(&self, kind: &ResourceKind) -> Result<Arc<SchemaDescriptor>, UnknownKindError> {
        self.snap.load().get(kind)
    }

    /// Copy-on-write registration; concurrent writers are serialized.
    pub fn register(&self, kind: ResourceKind, descriptor: SchemaDescriptor) -> Result<(), DuplicateKindError> {
        let _guard = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut next = Registry::clone(&self.snap.load());
        next.register(kind, descriptor)?;
        self.snap.store(Arc::new(next));
        Ok(())
    }
}

impl Default for SharedRegistry {
    fn default() -> Self { Self::new(Registry::with_builtins()) }
}

impl From<Registry> for SharedRegistry {
    fn from(r: Registry) -> Self { Self::new(r) }
}
