//! Core data model definitions shared across jmsit crates.
#![allow(missing_docs)]

pub mod domain;
pub mod error;
pub mod headers;
pub mod hints;
pub mod message_kind;
pub mod value_type;
pub mod values;

pub use domain::{DisabledValue, DomainEntry, HeaderDomain, TypeDomain};
pub use error::{ModelError, Result as ModelResult};
pub use headers::{
    FieldMap, HeaderName, MessageHeaders, MessageProperties, TypedValue,
};
pub use hints::{DECODE_HINTS_VERSION, DecodeHint, DecodeHints};
pub use message_kind::MessageKind;
pub use value_type::{Literal, ValueType};
pub use values::{TestValues, ValueCounts};
