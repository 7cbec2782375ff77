//! Entity serialization over compiled accessors.
//!
//! A message is the concatenation of a host type's members in locator order:
//! - implicit-length members are written with their codec as-is
//! - prefixed members carry a little-endian length before their bytes
//!
//! Each host type is compiled once, on first use or at [`EntitySerializer::register`].

pub mod config;
pub mod error;
pub mod serializer;

pub use config::{EntityConfig, LengthPrefix, DEFAULT_MAX_MESSAGE};
pub use error::{EntityError, Result};
pub use serializer::EntitySerializer;
