//! String format checks used by schema fields and cross-field rules.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use once_cell::sync::Lazy;
use regex::Regex;

static DNS1123_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("dns label pattern compiles"));

static DNS1123_SUBDOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("dns subdomain pattern compiles")
});

pub const DNS1123_LABEL_MAX_LEN: usize = 63;
pub const DNS1123_SUBDOMAIN_MAX_LEN: usize = 253;

/// RFC 1123 label: lowercase alphanumerics and '-', at most 63 characters.
pub fn is_dns1123_label(s: &str) -> bool {
    s.len() <= DNS1123_LABEL_MAX_LEN && DNS1123_LABEL_RE.is_match(s)
}

/// RFC 1123 subdomain: dot-separated labels, at most 253 characters.
pub fn is_dns1123_subdomain(s: &str) -> bool {
    s.len() <= DNS1123_SUBDOMAIN_MAX_LEN && DNS1123_SUBDOMAIN_RE.is_match(s)
}

pub fn is_ipv4(s: &str) -> bool { s.parse::<Ipv4Addr>().is_ok() }

pub fn is_ipv6(s: &str) -> bool { s.parse::<Ipv6Addr>().is_ok() }

/// Declared format of a string field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    Dns1123Label,
    /// Empty string, or an RFC 1123 label.
    Dns1123LabelOrEmpty,
    Dns1123Subdomain,
}

impl StringFormat {
    pub fn check(self, s: &str) -> bool {
        match self {
            StringFormat::Dns1123Label => is_dns1123_label(s),
            StringFormat::Dns1123LabelOrEmpty => s.is_empty() || is_dns1123_label(s),
            StringFormat::Dns1123Subdomain => is_dns1123_subdomain(s),
        }
    }
}

impl fmt::Display for StringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StringFormat::Dns1123Label => "an RFC 1123 label",
            StringFormat::Dns1123LabelOrEmpty => "empty or an RFC 1123 label",
            StringFormat::Dns1123Subdomain => "an RFC 1123 subdomain",
        })
    }
}
