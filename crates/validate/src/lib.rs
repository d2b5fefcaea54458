//! kshape validate: fills declared defaults and checks decoded objects against
//! their schema descriptors.
//!
//! Both passes are synchronous and work on caller-owned objects. Defaulting never
//! validates; validation never mutates.

#![forbid(unsafe_code)]

pub mod checks;
pub mod defaults;

pub use checks::validate;
pub use defaults::apply_defaults;
