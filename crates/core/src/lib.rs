//! kshape core types: resource kinds, the dynamic value model, primitives and errors.

#![forbid(unsafe_code)]

pub mod enums;
pub mod error;
pub mod format;
pub mod gvk;
pub mod object;
pub mod path;
pub mod primitives;
pub mod value;

pub use enums::{AddressType, ClosedEnum, PreemptionPolicy, Protocol, TaintEffect, TolerationOperator};
pub use error::{
    DecodeError, DuplicateKindError, FieldError, FieldErrorKind, MalformedEncodingError, UnknownKindError,
    ValidationError,
};
pub use format::StringFormat;
pub use gvk::ResourceKind;
pub use object::{ResourceList, ResourceObject};
pub use path::{FieldPath, PathSeg};
pub use primitives::{MicroTime, PrimitiveError, Quantity, Time};
pub use value::{EnumSpec, EnumValue, Object, Value};

pub mod prelude {
    pub use super::{
        ClosedEnum, DecodeError, FieldError, FieldErrorKind, FieldPath, Object, ResourceKind, ResourceList,
        ResourceObject, ValidationError, Value,
    };
}
