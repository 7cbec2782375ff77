//! Accessor compilation for wirebind.
//!
//! This is the core layer. For every (host type, member) pair it binds the
//! member's getter/setter and the codec operations for the member's value
//! type once, then composes them into four callables:
//! - size of the member's encoding
//! - write the member into a buffer
//! - decode a scalar value and assign it to the member
//! - decode a length-bounded value and assign it to the member
//!
//! Compiled sets are cached for the lifetime of the [`AccessorCache`] and
//! never rebuilt.

pub mod access;
pub mod cache;
pub mod compiler;
pub mod error;
pub mod invoke;
pub mod member;

pub use access::{bind_getter, bind_setter, require_access, Access};
pub use cache::{AccessorCache, AccessorKey, AccessorTable};
pub use compiler::{
    AccessorCompiler, BoundedAssigningReader, CompiledAccessorSet, ScalarAssigningReader,
    SerializeWriter, SizeGetter,
};
pub use error::{BindingError, CompileError, Result};
pub use invoke::{
    bind_reader_bounded, bind_reader_scalar, bind_size_of, bind_writer, CodecBinding,
};
pub use member::{
    CodecSelection, Getter, LengthMode, MemberDescriptor, MemberKind, MemberLocator, Setter,
};
pub use wirebind_codec::CodecResolutionError;
