//! Group/Version/Kind identity of a resource schema.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifies a schema: `(group, version, kind)`. The core group is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl ResourceKind {
    pub fn new(group: impl Into<String>, version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self { group: group.into(), version: version.into(), kind: kind.into() }
    }

    /// Wire `apiVersion` form: `group/version`, or just `version` for the core group.
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    /// Key form used in logs and lookups: `group/version/Kind` or `version/Kind`.
    pub fn gvk_key(&self) -> String {
        if self.group.is_empty() {
            format!("{}/{}", self.version, self.kind)
        } else {
            format!("{}/{}/{}", self.group, self.version, self.kind)
        }
    }

    /// Split an `apiVersion` string into `(group, version)`.
    /// Returns None for empty parts or more than one `/`.
    pub fn split_api_version(api_version: &str) -> Option<(&str, &str)> {
        let parts: Vec<_> = api_version.split('/').collect();
        match parts.as_slice() {
            [version] if !version.is_empty() => Some(("", *version)),
            [group, version] if !group.is_empty() && !version.is_empty() => Some((*group, *version)),
            _ => None,
        }
    }

    /// Build a kind from wire discriminators. No normalization is applied.
    pub fn from_discriminator(api_version: &str, kind: &str) -> Option<Self> {
        if kind.is_empty() { return None; }
        let (group, version) = Self::split_api_version(api_version)?;
        Some(Self::new(group, version, kind))
    }

    /// True when the wire discriminators name exactly this kind.
    pub fn matches(&self, api_version: &str, kind: &str) -> bool {
        self.kind == kind && self.api_version() == api_version
    }

    /// The conventional list wrapper kind: same group/version, `<Kind>List`.
    pub fn list_kind(&self) -> Self {
        Self::new(self.group.clone(), self.version.clone(), format!("{}List", self.kind))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.gvk_key())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    /// Parse a key like `v1/ConfigMap` or `discovery.k8s.io/v1/EndpointSlice`.
    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let parts: Vec<_> = key.split('/').collect();
        let out = match parts.as_slice() {
            [version, kind] => Self::new("", *version, *kind),
            [group, version, kind] => Self::new(*group, *version, *kind),
            _ => return Err(format!("invalid gvk key: {} (expect v1/Kind or group/v1/Kind)", key)),
        };
        if out.version.is_empty() || out.kind.is_empty() {
            return Err(format!("invalid gvk key: {}", key));
        }
        Ok(out)
    }
}
