use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::value_type::ValueType;

/// Writes a value into `buffer` at `offset`, returning the number of bytes written.
pub type WriteFn<T> = Arc<dyn Fn(&T, &mut [u8], usize) -> usize + Send + Sync>;

/// Computes the number of bytes the paired writer produces for a value.
pub type SizeOfFn<T> = Arc<dyn Fn(&T) -> usize + Send + Sync>;

/// Reads a value whose encoded length is implied by its type.
pub type ReadScalarFn<T> = Arc<dyn Fn(&[u8], usize) -> T + Send + Sync>;

/// Reads a value occupying exactly `length` bytes at `offset`.
pub type ReadBoundedFn<T> = Arc<dyn Fn(&[u8], usize, usize) -> T + Send + Sync>;

/// The calling shape a codec operation satisfies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationKind {
    /// `(value, buffer, offset) -> bytes written`
    Write,
    /// `(value) -> byte count`
    SizeOf,
    /// `(buffer, offset) -> value`
    ReadScalar,
    /// `(buffer, offset, length) -> value`
    ReadBounded,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Write,
        OperationKind::SizeOf,
        OperationKind::ReadScalar,
        OperationKind::ReadBounded,
    ];

    /// Number of parameters the operation takes.
    pub fn arity(self) -> usize {
        match self {
            OperationKind::Write => 3,
            OperationKind::SizeOf => 1,
            OperationKind::ReadScalar => 2,
            OperationKind::ReadBounded => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Write => "write",
            OperationKind::SizeOf => "size_of",
            OperationKind::ReadScalar => "read_scalar",
            OperationKind::ReadBounded => "read_bounded",
        }
    }

    pub fn signature(self) -> &'static str {
        match self {
            OperationKind::Write => "(value, buffer, offset) -> usize",
            OperationKind::SizeOf => "(value) -> usize",
            OperationKind::ReadScalar => "(buffer, offset) -> value",
            OperationKind::ReadBounded => "(buffer, offset, length) -> value",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered, type-erased codec operation.
///
/// The erased payload is one of [`WriteFn`], [`SizeOfFn`], [`ReadScalarFn`]
/// or [`ReadBoundedFn`] for the operation's value type, according to its kind.
#[derive(Clone)]
pub struct CodecOperation {
    value_type: ValueType,
    kind: OperationKind,
    name: Cow<'static, str>,
    op: Arc<dyn Any + Send + Sync>,
}

impl CodecOperation {
    pub(crate) fn new<F>(
        value_type: ValueType,
        kind: OperationKind,
        name: Cow<'static, str>,
        op: F,
    ) -> Self
    where
        F: Any + Send + Sync,
    {
        Self {
            value_type,
            kind,
            name,
            op: Arc::new(op),
        }
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Recover the typed callable. Returns `None` when `F` is not the stored shape.
    pub fn downcast<F>(&self) -> Option<F>
    where
        F: Clone + 'static,
    {
        self.op.downcast_ref::<F>().cloned()
    }
}

impl fmt::Debug for CodecOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecOperation")
            .field("value_type", &self.value_type)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_matches_signature() {
        for kind in OperationKind::ALL {
            let params = kind.signature().split("->").next().unwrap_or_default();
            assert_eq!(params.matches(',').count() + 1, kind.arity(), "{kind}");
        }
    }

    #[test]
    fn downcast_recovers_only_the_stored_shape() {
        let size: SizeOfFn<u32> = Arc::new(|_: &u32| 4);
        let op = CodecOperation::new(
            ValueType::of::<u32>(),
            OperationKind::SizeOf,
            Cow::Borrowed("GetByteCount"),
            size,
        );

        let recovered = op.downcast::<SizeOfFn<u32>>().unwrap();
        assert_eq!(recovered(&7), 4);
        assert!(op.downcast::<SizeOfFn<u64>>().is_none());
        assert!(op.downcast::<WriteFn<u32>>().is_none());
    }
}
