//! Primitive codec registry for wirebind.
//!
//! Every supported value type exposes up to four named operations:
//! - write a value into a buffer at an offset, returning bytes written
//! - compute the encoded byte size of a value
//! - read a value from a buffer at an offset (scalar)
//! - read a value from a buffer at an offset given an explicit length (bounded)
//!
//! Operations are keyed by ([`ValueType`], [`OperationKind`]) and carry a
//! name, so callers can pick between several encodings of the same type.

pub mod config;
pub mod error;
pub mod operation;
pub mod primitives;
pub mod registry;
pub mod value_type;
pub mod varint;

pub use config::{ByteOrder, RegistryConfig};
pub use error::{CodecError, CodecResolutionError, Result};
pub use operation::{
    CodecOperation, OperationKind, ReadBoundedFn, ReadScalarFn, SizeOfFn, WriteFn,
};
pub use primitives::{DEFAULT_SIZE_OF, DEFAULT_WRITE};
pub use registry::{CodecRegistry, OperationInfo};
pub use value_type::ValueType;
