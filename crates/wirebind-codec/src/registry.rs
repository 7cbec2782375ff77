use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::RegistryConfig;
use crate::error::{CodecError, CodecResolutionError, Result};
use crate::operation::{
    CodecOperation, OperationKind, ReadBoundedFn, ReadScalarFn, SizeOfFn, WriteFn,
};
use crate::primitives;
use crate::value_type::ValueType;

/// Listing entry describing one registered operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationInfo {
    pub value_type: ValueType,
    pub kind: OperationKind,
    pub name: String,
}

/// Named codec operations keyed by value type and operation kind.
///
/// The registry decides whether a requested operation is legal; callers
/// never match free-form names against signatures themselves.
pub struct CodecRegistry {
    operations: HashMap<(ValueType, OperationKind), Vec<CodecOperation>>,
    config: RegistryConfig,
}

impl CodecRegistry {
    /// Create a registry with the default primitive codecs.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a registry with the default primitive codecs for an explicit config.
    pub fn with_config(config: RegistryConfig) -> Self {
        let mut registry = Self {
            operations: HashMap::new(),
            config,
        };
        primitives::install(&mut registry, config.byte_order);
        if config.varint {
            primitives::install_varint(&mut registry);
        }
        tracing::debug!(
            operations = registry.len(),
            byte_order = ?config.byte_order,
            varint = config.varint,
            "codec registry built"
        );
        registry
    }

    /// Create a registry without any operations.
    pub fn empty() -> Self {
        Self {
            operations: HashMap::new(),
            config: RegistryConfig::default(),
        }
    }

    /// Register a write operation for `T`.
    pub fn register_writer<T, F>(&mut self, name: impl Into<Cow<'static, str>>, f: F) -> Result<()>
    where
        T: 'static,
        F: Fn(&T, &mut [u8], usize) -> usize + Send + Sync + 'static,
    {
        let op: WriteFn<T> = Arc::new(f);
        self.insert(ValueType::of::<T>(), OperationKind::Write, name.into(), op)
    }

    /// Register a size operation for `T`.
    pub fn register_size_of<T, F>(&mut self, name: impl Into<Cow<'static, str>>, f: F) -> Result<()>
    where
        T: 'static,
        F: Fn(&T) -> usize + Send + Sync + 'static,
    {
        let op: SizeOfFn<T> = Arc::new(f);
        self.insert(ValueType::of::<T>(), OperationKind::SizeOf, name.into(), op)
    }

    /// Register a scalar read operation for `T`.
    pub fn register_reader_scalar<T, F>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        f: F,
    ) -> Result<()>
    where
        T: 'static,
        F: Fn(&[u8], usize) -> T + Send + Sync + 'static,
    {
        let op: ReadScalarFn<T> = Arc::new(f);
        self.insert(ValueType::of::<T>(), OperationKind::ReadScalar, name.into(), op)
    }

    /// Register a bounded read operation for `T`.
    pub fn register_reader_bounded<T, F>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        f: F,
    ) -> Result<()>
    where
        T: 'static,
        F: Fn(&[u8], usize, usize) -> T + Send + Sync + 'static,
    {
        let op: ReadBoundedFn<T> = Arc::new(f);
        self.insert(ValueType::of::<T>(), OperationKind::ReadBounded, name.into(), op)
    }

    fn insert<F>(
        &mut self,
        value_type: ValueType,
        kind: OperationKind,
        name: Cow<'static, str>,
        op: F,
    ) -> Result<()>
    where
        F: std::any::Any + Send + Sync,
    {
        let entries = self.operations.entry((value_type, kind)).or_default();
        if entries.iter().any(|entry| entry.name() == name) {
            return Err(CodecError::Duplicate {
                value_type: value_type.name(),
                kind,
                name: name.into_owned(),
            });
        }
        entries.push(CodecOperation::new(value_type, kind, name, op));
        Ok(())
    }

    /// Add a built-in operation. Built-in names never collide.
    pub(crate) fn define<F>(&mut self, value_type: ValueType, kind: OperationKind, name: &'static str, op: F)
    where
        F: std::any::Any + Send + Sync,
    {
        self.operations
            .entry((value_type, kind))
            .or_default()
            .push(CodecOperation::new(value_type, kind, Cow::Borrowed(name), op));
    }

    /// Resolve one operation.
    ///
    /// With a name, the operation must exist under exactly that kind; a name
    /// registered only under other kinds is a shape mismatch. Without a name,
    /// the type must offer exactly one operation of the kind.
    pub fn lookup(
        &self,
        value_type: ValueType,
        kind: OperationKind,
        name: Option<&str>,
    ) -> std::result::Result<&CodecOperation, CodecResolutionError> {
        let candidates = self
            .operations
            .get(&(value_type, kind))
            .map(Vec::as_slice)
            .unwrap_or_default();

        match name {
            Some(name) => {
                if let Some(op) = candidates.iter().find(|op| op.name() == name) {
                    return Ok(op);
                }
                let found: Vec<OperationKind> = OperationKind::ALL
                    .into_iter()
                    .filter(|other| *other != kind)
                    .filter(|other| {
                        self.operations
                            .get(&(value_type, *other))
                            .is_some_and(|ops| ops.iter().any(|op| op.name() == name))
                    })
                    .collect();
                if found.is_empty() {
                    Err(CodecResolutionError::NotFound {
                        value_type: value_type.name(),
                        kind,
                        name: Some(name.to_string()),
                    })
                } else {
                    Err(CodecResolutionError::ShapeMismatch {
                        value_type: value_type.name(),
                        name: name.to_string(),
                        expected: kind,
                        found,
                    })
                }
            }
            None => match candidates {
                [] => Err(CodecResolutionError::NotFound {
                    value_type: value_type.name(),
                    kind,
                    name: None,
                }),
                [op] => Ok(op),
                many => Err(CodecResolutionError::Ambiguous {
                    value_type: value_type.name(),
                    kind,
                    candidates: many.iter().map(|op| op.name().to_string()).collect(),
                }),
            },
        }
    }

    /// Whether `T` has at least one operation of `kind`.
    pub fn supports<T: 'static>(&self, kind: OperationKind) -> bool {
        self.operations
            .get(&(ValueType::of::<T>(), kind))
            .is_some_and(|ops| !ops.is_empty())
    }

    /// All registered operations, sorted by type name, kind, then name.
    pub fn operations(&self) -> Vec<OperationInfo> {
        let mut infos: Vec<OperationInfo> = self
            .operations
            .values()
            .flatten()
            .map(|op| OperationInfo {
                value_type: op.value_type(),
                kind: op.kind(),
                name: op.name().to_string(),
            })
            .collect();
        infos.sort_by(|a, b| {
            a.value_type
                .name()
                .cmp(b.value_type.name())
                .then(a.kind.cmp(&b.kind))
                .then_with(|| a.name.cmp(&b.name))
        });
        infos
    }

    /// Number of registered operations.
    pub fn len(&self) -> usize {
        self.operations.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}
