//! Closed string sets used by the built-in resources, as Rust enums.
//!
//! Each enum is backed by a static [`EnumSpec`] so schemas can declare the set and
//! decoded values can carry a tagged [`EnumValue`] instead of free-form text.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{EnumSpec, EnumValue, Value};

/// A Rust enum mirroring a closed wire string set. Variant order matches `spec().variants`.
pub trait ClosedEnum: Sized + Copy + 'static {
    fn spec() -> &'static EnumSpec;
    fn all() -> &'static [Self];
    fn index(self) -> usize;

    fn as_str(self) -> &'static str { Self::spec().variants[self.index()] }

    fn parse(s: &str) -> Option<Self> {
        Self::spec().position(s).and_then(|i| Self::all().get(i).copied())
    }

    fn to_value(self) -> Value { Value::Enum(EnumValue::at(Self::spec(), self.index())) }

    /// Accepts both tagged members and plain strings.
    fn from_value(v: &Value) -> Option<Self> { v.as_str().and_then(Self::parse) }
}

pub static ADDRESS_TYPE: EnumSpec = EnumSpec::new("AddressType", &["IPv4", "IPv6", "FQDN"]);
pub static PROTOCOL: EnumSpec = EnumSpec::new("Protocol", &["TCP", "UDP", "SCTP"]);
pub static PREEMPTION_POLICY: EnumSpec = EnumSpec::new("PreemptionPolicy", &["Never", "PreemptLowerPriority"]);
pub static TOLERATION_OPERATOR: EnumSpec = EnumSpec::new("TolerationOperator", &["Exists", "Equal"]);
pub static TAINT_EFFECT: EnumSpec = EnumSpec::new("TaintEffect", &["NoSchedule", "PreferNoSchedule", "NoExecute"]);

/// Type of address carried by an EndpointSlice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressType {
    IPv4,
    IPv6,
    #[serde(rename = "FQDN")]
    Fqdn,
}

impl ClosedEnum for AddressType {
    fn spec() -> &'static EnumSpec { &ADDRESS_TYPE }
    fn all() -> &'static [Self] { &[AddressType::IPv4, AddressType::IPv6, AddressType::Fqdn] }
    fn index(self) -> usize { self as usize }
}

/// IP protocol of an endpoint port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Tcp,
    Udp,
    Sctp,
}

impl ClosedEnum for Protocol {
    fn spec() -> &'static EnumSpec { &PROTOCOL }
    fn all() -> &'static [Self] { &[Protocol::Tcp, Protocol::Udp, Protocol::Sctp] }
    fn index(self) -> usize { self as usize }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreemptionPolicy {
    Never,
    PreemptLowerPriority,
}

impl ClosedEnum for PreemptionPolicy {
    fn spec() -> &'static EnumSpec { &PREEMPTION_POLICY }
    fn all() -> &'static [Self] { &[PreemptionPolicy::Never, PreemptionPolicy::PreemptLowerPriority] }
    fn index(self) -> usize { self as usize }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TolerationOperator {
    Exists,
    Equal,
}

impl ClosedEnum for TolerationOperator {
    fn spec() -> &'static EnumSpec { &TOLERATION_OPERATOR }
    fn all() -> &'static [Self] { &[TolerationOperator::Exists, TolerationOperator::Equal] }
    fn index(self) -> usize { self as usize }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaintEffect {
    NoSchedule,
    PreferNoSchedule,
    NoExecute,
}

impl ClosedEnum for TaintEffect {
    fn spec() -> &'static EnumSpec { &TAINT_EFFECT }
    fn all() -> &'static [Self] { &[TaintEffect::NoSchedule, TaintEffect::PreferNoSchedule, TaintEffect::NoExecute] }
    fn index(self) -> usize { self as usize }
}

macro_rules! display_via_spec {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
        })*
    };
}

display_via_spec!(AddressType, Protocol, PreemptionPolicy, TolerationOperator, TaintEffect);
