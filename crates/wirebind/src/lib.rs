//! Binary serialization through compiled member accessors.
//!
//! Each (host type, member) pair is bound once to direct getter/setter
//! callables and to the codec operations for the member's value type. The
//! result is reused for every instance of that type, with no per-call lookup.
//!
//! # Crate Structure
//!
//! - [`codec`]: named primitive encode/decode operations keyed by value type and operation kind
//! - [`accessor`]: member descriptors, binders, the accessor compiler and its build-once cache
//! - [`entity`]: sequences a type's compiled accessors into a message

/// Re-export codec types.
pub mod codec {
    pub use wirebind_codec::*;
}

/// Re-export accessor types.
pub mod accessor {
    pub use wirebind_accessor::*;
}

/// Re-export entity serializer types.
pub mod entity {
    pub use wirebind_entity::*;
}
