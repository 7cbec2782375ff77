//! Codec invocation binding.
//!
//! Resolves a codec operation for a value type against the registry and
//! recovers it as a directly callable, typed function.

use std::fmt;

use wirebind_codec::{
    CodecRegistry, CodecResolutionError, OperationKind, ReadBoundedFn, ReadScalarFn, SizeOfFn,
    ValueType, WriteFn,
};

/// A codec operation resolved for one value type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecBinding {
    value_type: ValueType,
    kind: OperationKind,
    name: String,
}

impl CodecBinding {
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Name of the operation that was bound.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for CodecBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind, self.name)
    }
}

/// Bind the named write operation for `T`.
pub fn bind_writer<T: 'static>(
    registry: &CodecRegistry,
    name: &str,
) -> Result<WriteFn<T>, CodecResolutionError> {
    resolve::<T, WriteFn<T>>(registry, OperationKind::Write, Some(name)).map(|(f, _)| f)
}

/// Bind the named size operation for `T`.
pub fn bind_size_of<T: 'static>(
    registry: &CodecRegistry,
    name: &str,
) -> Result<SizeOfFn<T>, CodecResolutionError> {
    resolve::<T, SizeOfFn<T>>(registry, OperationKind::SizeOf, Some(name)).map(|(f, _)| f)
}

/// Bind a scalar reader for `T`, by name or, when `name` is `None`, by shape.
pub fn bind_reader_scalar<T: 'static>(
    registry: &CodecRegistry,
    name: Option<&str>,
) -> Result<ReadScalarFn<T>, CodecResolutionError> {
    resolve::<T, ReadScalarFn<T>>(registry, OperationKind::ReadScalar, name).map(|(f, _)| f)
}

/// Bind a bounded reader for `T`, by name or, when `name` is `None`, by shape.
pub fn bind_reader_bounded<T: 'static>(
    registry: &CodecRegistry,
    name: Option<&str>,
) -> Result<ReadBoundedFn<T>, CodecResolutionError> {
    resolve::<T, ReadBoundedFn<T>>(registry, OperationKind::ReadBounded, name).map(|(f, _)| f)
}

/// Resolve an operation of `kind` for `T` and recover it as `F`.
pub(crate) fn resolve<T, F>(
    registry: &CodecRegistry,
    kind: OperationKind,
    name: Option<&str>,
) -> Result<(F, CodecBinding), CodecResolutionError>
where
    T: 'static,
    F: Clone + 'static,
{
    let value_type = ValueType::of::<T>();
    let op = registry.lookup(value_type, kind, name)?;
    let call = op
        .downcast::<F>()
        .ok_or_else(|| CodecResolutionError::SignatureMismatch {
            value_type: value_type.name(),
            name: op.name().to_string(),
            kind,
        })?;
    tracing::trace!(
        value_type = value_type.name(),
        %kind,
        name = op.name(),
        "codec operation bound"
    );
    Ok((
        call,
        CodecBinding {
            value_type,
            kind,
            name: op.name().to_string(),
        },
    ))
}

/// Like [`resolve`], for a reader the member can do without.
///
/// An absent or ambiguous reader resolved by shape yields `None`. A reader
/// requested by name must exist.
pub(crate) fn resolve_optional<T, F>(
    registry: &CodecRegistry,
    kind: OperationKind,
    name: Option<&str>,
) -> Result<Option<(F, CodecBinding)>, CodecResolutionError>
where
    T: 'static,
    F: Clone + 'static,
{
    match resolve::<T, F>(registry, kind, name) {
        Ok(bound) => Ok(Some(bound)),
        Err(CodecResolutionError::NotFound { .. } | CodecResolutionError::Ambiguous { .. })
            if name.is_none() =>
        {
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
