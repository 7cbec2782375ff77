use std::any::type_name;
use std::sync::Arc;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use wirebind_accessor::{
    require_access, Access, AccessorCache, AccessorTable, CompileError, CompiledAccessorSet,
    LengthMode, MemberLocator,
};
use wirebind_codec::{CodecRegistry, OperationKind};

use crate::config::{EntityConfig, LengthPrefix};
use crate::error::{EntityError, Result};

/// Serializes host types member by member through their compiled accessors.
///
/// Message layout, for members in locator order:
/// ```text
/// ┌────────────────────┬──────────────────────────┬─────┐
/// │ implicit member    │ prefixed member          │ ... │
/// │ (codec bytes)      │ len (2B/4B LE) + bytes   │     │
/// └────────────────────┴──────────────────────────┴─────┘
/// ```
#[derive(Debug)]
pub struct EntitySerializer {
    cache: AccessorCache,
    config: EntityConfig,
}

impl EntitySerializer {
    pub fn new(registry: Arc<CodecRegistry>) -> Self {
        Self::with_config(registry, EntityConfig::default())
    }

    pub fn with_config(registry: Arc<CodecRegistry>, config: EntityConfig) -> Self {
        Self {
            cache: AccessorCache::new(registry),
            config,
        }
    }

    pub fn config(&self) -> &EntityConfig {
        &self.config
    }

    /// The accessor cache backing this serializer.
    pub fn cache(&self) -> &AccessorCache {
        &self.cache
    }

    /// Compile every member of `H` ahead of first use.
    ///
    /// Every member must be both readable and writable. On failure nothing
    /// about `H` is cached and the next attempt starts over.
    pub fn register<H: MemberLocator>(&self) -> Result<()> {
        self.table::<H>().map(|_| ())
    }

    pub fn is_registered<H: 'static>(&self) -> bool {
        self.cache.has_table::<H>()
    }

    /// Encoded size of `value`, length prefixes included.
    pub fn size_of<H: MemberLocator>(&self, value: &H) -> Result<usize> {
        let table = self.table::<H>()?;
        self.measure(&table, value)
    }

    /// Encode `value` into a new buffer sized exactly for it.
    pub fn serialize<H: MemberLocator>(&self, value: &H) -> Result<Bytes> {
        let table = self.table::<H>()?;
        let total = self.measure(&table, value)?;
        self.check_message_size(total)?;

        let mut buf = BytesMut::zeroed(total);
        let written = self.encode(&table, value, &mut buf, 0)?;
        debug_assert_eq!(written, total);
        tracing::trace!(host = type_name::<H>(), size = total, "entity serialized");
        Ok(buf.freeze())
    }

    /// Encode `value` into `buffer` at `offset`; returns bytes written.
    pub fn serialize_into<H: MemberLocator>(
        &self,
        value: &H,
        buffer: &mut [u8],
        offset: usize,
    ) -> Result<usize> {
        let table = self.table::<H>()?;
        let total = self.measure(&table, value)?;
        self.check_message_size(total)?;

        let available = buffer.len().saturating_sub(offset);
        if total > available {
            return Err(EntityError::BufferTooSmall {
                needed: total,
                available,
            });
        }
        self.encode(&table, value, buffer, offset)
    }

    /// Decode members from `buffer` at `offset` into `target`; returns bytes consumed.
    ///
    /// Scalar members advance by the re-measured size of the decoded value.
    /// A default instance of `H` gives the fewest bytes each scalar member can
    /// occupy, which is checked before decoding so short input is reported as
    /// [`EntityError::Truncated`].
    ///
    /// Input is assumed to be canonically encoded. A non-canonical scalar
    /// encoding still decodes, but is re-measured at its canonical size, so
    /// the offset drifts without error: the over-long varint `[0x80, 0x00]`
    /// decodes to `0` yet advances one byte, and every later member is read
    /// from the wrong position.
    pub fn deserialize_into<H: MemberLocator + Default>(
        &self,
        target: &mut H,
        buffer: &[u8],
        offset: usize,
    ) -> Result<usize> {
        let table = self.table::<H>()?;
        let probe = H::default();
        let prefix = self.config.length_prefix;
        let mut pos = offset;

        for set in table.iter() {
            let available = buffer.len().saturating_sub(pos);
            match set.length_mode() {
                LengthMode::Implicit => {
                    let least = member_size(set, &probe)?;
                    if least > available {
                        return Err(truncated(set, least, available));
                    }
                    set.read_scalar(target, buffer, pos)
                        .ok_or_else(|| missing(set, OperationKind::ReadScalar))?;
                    let consumed = member_size(set, target)?;
                    if consumed > available {
                        return Err(truncated(set, consumed, available));
                    }
                    pos += consumed;
                }
                LengthMode::Prefixed => {
                    if prefix.width() > available {
                        return Err(truncated(set, prefix.width(), available));
                    }
                    let len = read_prefix(prefix, &buffer[pos..]);
                    pos += prefix.width();
                    let available = available - prefix.width();
                    if len > available {
                        return Err(truncated(set, len, available));
                    }
                    set.read_bounded(target, buffer, pos, len)
                        .ok_or_else(|| missing(set, OperationKind::ReadBounded))?;
                    pos += len;
                }
            }
        }

        tracing::trace!(
            host = type_name::<H>(),
            consumed = pos - offset,
            "entity deserialized"
        );
        Ok(pos - offset)
    }

    /// Decode a new `H` from the start of `buffer`.
    pub fn deserialize<H: MemberLocator + Default>(&self, buffer: &[u8]) -> Result<H> {
        let mut value = H::default();
        self.deserialize_into(&mut value, buffer, 0)?;
        Ok(value)
    }

    fn table<H: MemberLocator>(&self) -> Result<Arc<AccessorTable<H>>> {
        if self.cache.has_table::<H>() {
            return Ok(self.cache.table::<H>()?);
        }

        for member in H::members() {
            require_access(&member, Access::ReadWrite).map_err(CompileError::from)?;
        }
        let table = self.cache.table::<H>()?;
        tracing::debug!(
            host = type_name::<H>(),
            members = table.len(),
            "entity registered"
        );
        Ok(table)
    }

    fn measure<H>(&self, table: &AccessorTable<H>, value: &H) -> Result<usize> {
        let prefix = self.config.length_prefix;
        let mut total = 0;
        for set in table.iter() {
            let size = member_size(set, value)?;
            if set.length_mode() == LengthMode::Prefixed {
                check_prefix(prefix, set, size)?;
                total += prefix.width();
            }
            total += size;
        }
        Ok(total)
    }

    /// Caller has checked that `buffer` holds the whole message at `offset`.
    fn encode<H>(
        &self,
        table: &AccessorTable<H>,
        value: &H,
        buffer: &mut [u8],
        offset: usize,
    ) -> Result<usize> {
        let prefix = self.config.length_prefix;
        let mut pos = offset;

        for set in table.iter() {
            let size = member_size(set, value)?;
            if set.length_mode() == LengthMode::Prefixed {
                check_prefix(prefix, set, size)?;
                write_prefix(prefix, &mut buffer[pos..], size);
                pos += prefix.width();
            }
            let written = set
                .write(value, buffer, pos)
                .ok_or_else(|| missing(set, OperationKind::Write))?;
            if written != size {
                return Err(EntityError::SizeMismatch {
                    member: set.member().to_string(),
                    measured: size,
                    written,
                });
            }
            pos += written;
        }
        Ok(pos - offset)
    }

    fn check_message_size(&self, size: usize) -> Result<()> {
        if size > self.config.max_message_size {
            return Err(EntityError::MessageTooLarge {
                size,
                max: self.config.max_message_size,
            });
        }
        Ok(())
    }
}

impl Default for EntitySerializer {
    fn default() -> Self {
        Self::new(Arc::new(CodecRegistry::new()))
    }
}

fn member_size<H>(set: &CompiledAccessorSet<H>, value: &H) -> Result<usize> {
    set.size_of(value)
        .ok_or_else(|| missing(set, OperationKind::SizeOf))
}

fn check_prefix<H>(prefix: LengthPrefix, set: &CompiledAccessorSet<H>, len: usize) -> Result<()> {
    if len > prefix.max_len() {
        return Err(EntityError::LengthOverflow {
            member: set.member().to_string(),
            len,
            max: prefix.max_len(),
        });
    }
    Ok(())
}

fn write_prefix(prefix: LengthPrefix, mut dst: &mut [u8], len: usize) {
    match prefix {
        LengthPrefix::U16 => dst.put_u16_le(len as u16),
        LengthPrefix::U32 => dst.put_u32_le(len as u32),
    }
}

fn read_prefix(prefix: LengthPrefix, mut src: &[u8]) -> usize {
    match prefix {
        LengthPrefix::U16 => src.get_u16_le() as usize,
        LengthPrefix::U32 => src.get_u32_le() as usize,
    }
}

fn missing<H>(set: &CompiledAccessorSet<H>, kind: OperationKind) -> EntityError {
    EntityError::MissingAccessor {
        member: set.member().to_string(),
        kind,
    }
}

fn truncated<H>(set: &CompiledAccessorSet<H>, needed: usize, available: usize) -> EntityError {
    EntityError::Truncated {
        member: set.member().to_string(),
        needed,
        available,
    }
}
