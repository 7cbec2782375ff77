use std::any::type_name;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use wirebind_codec::{
    CodecRegistry, CodecResolutionError, OperationKind, ReadBoundedFn, ReadScalarFn, SizeOfFn,
    ValueType, WriteFn,
};

use crate::access::{bind_getter, bind_setter};
use crate::error::{BindingError, CompileError, Result};
use crate::invoke::{resolve, resolve_optional, CodecBinding};
use crate::member::{Getter, LengthMode, MemberDescriptor, Setter};

/// Encoded size of a member of `H`.
pub type SizeGetter<H> = Arc<dyn Fn(&H) -> usize + Send + Sync>;

/// Writes a member of `H` into a buffer at an offset, returning bytes written.
pub type SerializeWriter<H> = Arc<dyn Fn(&H, &mut [u8], usize) -> usize + Send + Sync>;

/// Decodes a value at an offset and assigns it to a member of `H`.
pub type ScalarAssigningReader<H> = Arc<dyn Fn(&mut H, &[u8], usize) + Send + Sync>;

/// Decodes `length` bytes at an offset and assigns the value to a member of `H`.
pub type BoundedAssigningReader<H> = Arc<dyn Fn(&mut H, &[u8], usize, usize) + Send + Sync>;

/// The compiled callables for one member of `H`.
///
/// Immutable once built. Invoking any callable touches only the instance
/// and buffer passed in, so a set can be shared across threads freely.
/// Buffer bounds are not checked here; a short buffer surfaces from the
/// codec operation itself.
pub struct CompiledAccessorSet<H> {
    member: Cow<'static, str>,
    value_type: ValueType,
    length: LengthMode,
    bindings: Vec<CodecBinding>,
    size_of: Option<SizeGetter<H>>,
    write: Option<SerializeWriter<H>>,
    read_scalar: Option<ScalarAssigningReader<H>>,
    read_bounded: Option<BoundedAssigningReader<H>>,
}

impl<H> CompiledAccessorSet<H> {
    pub fn member(&self) -> &str {
        &self.member
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn length_mode(&self) -> LengthMode {
        self.length
    }

    /// The codec operations this set was compiled against.
    pub fn bindings(&self) -> &[CodecBinding] {
        &self.bindings
    }

    /// Whether the member could be read when compiled.
    pub fn is_readable(&self) -> bool {
        self.write.is_some()
    }

    /// Whether the member could be assigned when compiled.
    pub fn is_writable(&self) -> bool {
        match self.length {
            LengthMode::Implicit => self.read_scalar.is_some(),
            LengthMode::Prefixed => self.read_bounded.is_some(),
        }
    }

    pub fn has(&self, kind: OperationKind) -> bool {
        match kind {
            OperationKind::Write => self.write.is_some(),
            OperationKind::SizeOf => self.size_of.is_some(),
            OperationKind::ReadScalar => self.read_scalar.is_some(),
            OperationKind::ReadBounded => self.read_bounded.is_some(),
        }
    }

    pub fn size_getter(&self) -> Option<&SizeGetter<H>> {
        self.size_of.as_ref()
    }

    pub fn serialize_writer(&self) -> Option<&SerializeWriter<H>> {
        self.write.as_ref()
    }

    pub fn scalar_reader(&self) -> Option<&ScalarAssigningReader<H>> {
        self.read_scalar.as_ref()
    }

    pub fn bounded_reader(&self) -> Option<&BoundedAssigningReader<H>> {
        self.read_bounded.as_ref()
    }

    /// Encoded size of the member's current value.
    pub fn size_of(&self, instance: &H) -> Option<usize> {
        self.size_of.as_ref().map(|size_of| size_of(instance))
    }

    /// Write the member's current value at `offset`; returns bytes written.
    pub fn write(&self, instance: &H, buffer: &mut [u8], offset: usize) -> Option<usize> {
        self.write
            .as_ref()
            .map(|write| write(instance, buffer, offset))
    }

    /// Decode a scalar at `offset` into the member.
    pub fn read_scalar(&self, instance: &mut H, buffer: &[u8], offset: usize) -> Option<()> {
        self.read_scalar
            .as_ref()
            .map(|read| read(instance, buffer, offset))
    }

    /// Decode `length` bytes at `offset` into the member.
    pub fn read_bounded(
        &self,
        instance: &mut H,
        buffer: &[u8],
        offset: usize,
        length: usize,
    ) -> Option<()> {
        self.read_bounded
            .as_ref()
            .map(|read| read(instance, buffer, offset, length))
    }
}

impl<H> fmt::Debug for CompiledAccessorSet<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledAccessorSet")
            .field("member", &self.member)
            .field("value_type", &self.value_type)
            .field("length", &self.length)
            .field("bindings", &self.bindings)
            .finish()
    }
}

/// Compiles member descriptors into [`CompiledAccessorSet`]s.
///
/// Compilation resolves member access and codec operations once; nothing is
/// resolved again when the compiled callables run.
#[derive(Clone)]
pub struct AccessorCompiler {
    registry: Arc<CodecRegistry>,
}

impl AccessorCompiler {
    pub fn new(registry: Arc<CodecRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    /// Compile every operation the member's capabilities allow.
    ///
    /// A readable member must bind its write and size operations. A writable
    /// member must bind the reader its [`LengthMode`] calls for; the other
    /// reader is bound only when the registry offers one unambiguously.
    pub fn compile<H: 'static>(&self, member: &MemberDescriptor<H>) -> Result<CompiledAccessorSet<H>> {
        (member.compile_entry())(self, member)
    }

    /// Compile with a caller-asserted value type.
    ///
    /// Fails with [`BindingError::TypeMismatch`] when `T` is not the member's declared type.
    pub fn compile_typed<H, T>(&self, member: &MemberDescriptor<H>) -> Result<CompiledAccessorSet<H>>
    where
        H: 'static,
        T: Clone + Send + Sync + 'static,
    {
        if !member.value_type().is::<T>() {
            return Err(BindingError::TypeMismatch {
                host: type_name::<H>(),
                member: member.name().to_string(),
                declared: member.value_type().name(),
                requested: type_name::<T>(),
            }
            .into());
        }
        compile_member::<H, T>(self, member)
    }
}

impl fmt::Debug for AccessorCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorCompiler")
            .field("operations", &self.registry.len())
            .finish()
    }
}

/// Monomorphized compile path for a member declared as `T`.
pub(crate) fn compile_member<H, T>(
    compiler: &AccessorCompiler,
    member: &MemberDescriptor<H>,
) -> Result<CompiledAccessorSet<H>>
where
    H: 'static,
    T: Clone + Send + Sync + 'static,
{
    let registry = compiler.registry();
    let selection = member.codec();
    let codec_error = |source: CodecResolutionError| CompileError::Codec {
        host: type_name::<H>(),
        member: member.name().to_string(),
        source,
    };
    let mut bindings = Vec::with_capacity(4);

    let (size_of, write) = if member.is_readable() {
        let get = bind_getter::<H, T>(member)?;
        let (encode, write_binding) =
            resolve::<T, WriteFn<T>>(registry, OperationKind::Write, Some(&selection.write))
                .map_err(codec_error)?;
        let (measure, size_binding) =
            resolve::<T, SizeOfFn<T>>(registry, OperationKind::SizeOf, Some(&selection.size_of))
                .map_err(codec_error)?;
        bindings.push(write_binding);
        bindings.push(size_binding);
        (
            Some(compose_size_getter(Arc::clone(&get), measure)),
            Some(compose_serialize_writer(get, encode)),
        )
    } else {
        (None, None)
    };

    let (read_scalar, read_bounded) = if member.is_writable() {
        let set = bind_setter::<H, T>(member)?;
        let scalar_name = selection.read_scalar.as_deref();
        let bounded_name = selection.read_bounded.as_deref();
        let (scalar, bounded) = match selection.length {
            LengthMode::Implicit => (
                Some(
                    resolve::<T, ReadScalarFn<T>>(registry, OperationKind::ReadScalar, scalar_name)
                        .map_err(codec_error)?,
                ),
                resolve_optional::<T, ReadBoundedFn<T>>(
                    registry,
                    OperationKind::ReadBounded,
                    bounded_name,
                )
                .map_err(codec_error)?,
            ),
            LengthMode::Prefixed => (
                resolve_optional::<T, ReadScalarFn<T>>(
                    registry,
                    OperationKind::ReadScalar,
                    scalar_name,
                )
                .map_err(codec_error)?,
                Some(
                    resolve::<T, ReadBoundedFn<T>>(
                        registry,
                        OperationKind::ReadBounded,
                        bounded_name,
                    )
                    .map_err(codec_error)?,
                ),
            ),
        };
        let scalar = scalar.map(|(decode, binding)| {
            bindings.push(binding);
            compose_scalar_reader(Arc::clone(&set), decode)
        });
        let bounded = bounded.map(|(decode, binding)| {
            bindings.push(binding);
            compose_bounded_reader(Arc::clone(&set), decode)
        });
        (scalar, bounded)
    } else {
        (None, None)
    };

    tracing::debug!(
        host = type_name::<H>(),
        member = member.name(),
        value_type = member.value_type().name(),
        operations = bindings.len(),
        "member accessors compiled"
    );

    Ok(CompiledAccessorSet {
        member: member.name_cow().clone(),
        value_type: member.value_type(),
        length: selection.length,
        bindings,
        size_of,
        write,
        read_scalar,
        read_bounded,
    })
}

fn compose_size_getter<H, T>(get: Getter<H, T>, measure: SizeOfFn<T>) -> SizeGetter<H>
where
    H: 'static,
    T: Clone + 'static,
{
    Arc::new(move |instance: &H| {
        let value = get(instance);
        measure(&*value)
    })
}

fn compose_serialize_writer<H, T>(get: Getter<H, T>, encode: WriteFn<T>) -> SerializeWriter<H>
where
    H: 'static,
    T: Clone + 'static,
{
    Arc::new(move |instance: &H, buffer: &mut [u8], offset: usize| {
        let value = get(instance);
        encode(&*value, buffer, offset)
    })
}

fn compose_scalar_reader<H, T>(set: Setter<H, T>, decode: ReadScalarFn<T>) -> ScalarAssigningReader<H>
where
    H: 'static,
    T: 'static,
{
    Arc::new(move |instance: &mut H, buffer: &[u8], offset: usize| {
        set(instance, decode(buffer, offset))
    })
}

fn compose_bounded_reader<H, T>(
    set: Setter<H, T>,
    decode: ReadBoundedFn<T>,
) -> BoundedAssigningReader<H>
where
    H: 'static,
    T: 'static,
{
    Arc::new(
        move |instance: &mut H, buffer: &[u8], offset: usize, length: usize| {
            set(instance, decode(buffer, offset, length))
        },
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wirebind_codec::{ByteOrder, RegistryConfig, DEFAULT_SIZE_OF};

    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Packet {
        code: i32,
        ratio: f32,
        body: Vec<u8>,
        title: String,
        elapsed: Duration,
        hops: u64,
        checksum: u16,
    }

    fn code() -> MemberDescriptor<Packet> {
        MemberDescriptor::field("code", |p: &Packet| &p.code, |p: &mut Packet, v| p.code = v)
    }

    fn body() -> MemberDescriptor<Packet> {
        MemberDescriptor::field("body", |p: &Packet| &p.body, |p: &mut Packet, v| p.body = v)
            .prefixed()
    }

    fn elapsed_ms() -> MemberDescriptor<Packet> {
        MemberDescriptor::property(
            "elapsed_ms",
            |p: &Packet| p.elapsed.as_millis() as u64,
            |p: &mut Packet, v: u64| p.elapsed = Duration::from_millis(v),
        )
    }

    fn compiler() -> AccessorCompiler {
        AccessorCompiler::new(Arc::new(CodecRegistry::new()))
    }

    #[derive(Debug, Default)]
    struct Slot<T> {
        value: T,
    }

    fn slot<T: Clone + Send + Sync + 'static>() -> MemberDescriptor<Slot<T>> {
        MemberDescriptor::field(
            "value",
            |s: &Slot<T>| &s.value,
            |s: &mut Slot<T>, v: T| s.value = v,
        )
    }

    /// Write `value` at offset 3, check the encoded bytes, and read it back.
    fn round_trip<T: Default>(set: &CompiledAccessorSet<Slot<T>>, value: T, expected: &[u8]) -> T {
        let slot = Slot { value };
        assert_eq!(set.size_of(&slot), Some(expected.len()));

        let mut buf = vec![0xaa; expected.len() + 3];
        assert_eq!(set.write(&slot, &mut buf, 3), Some(expected.len()));
        assert_eq!(buf[..3], [0xaa; 3]);
        assert_eq!(&buf[3..], expected);

        let mut decoded = Slot::default();
        assert_eq!(set.read_scalar(&mut decoded, &buf, 3), Some(()));
        decoded.value
    }

    macro_rules! round_trip_each {
        ($compiler:expr, $order:expr, $($ty:ty => [$($value:expr),+ $(,)?];)+) => {$(
            let set = $compiler.compile(&slot::<$ty>()).unwrap();
            for value in [$($value),+] {
                let value: $ty = value;
                let expected = match $order {
                    ByteOrder::Little => value.to_le_bytes(),
                    ByteOrder::Big => value.to_be_bytes(),
                };
                assert_eq!(expected.len(), std::mem::size_of::<$ty>());
                let decoded = round_trip(&set, value, &expected);
                assert_eq!(
                    decoded.to_ne_bytes(),
                    value.to_ne_bytes(),
                    "{} {:?} in {:?}",
                    stringify!($ty),
                    value,
                    $order
                );
            }
        )+};
    }

    #[test]
    fn int32_member_end_to_end() {
        let set = compiler().compile(&code()).unwrap();

        for value in [0, -1, 0x11223344, i32::MIN, i32::MAX] {
            let packet = Packet {
                code: value,
                ..Packet::default()
            };
            assert_eq!(set.size_of(&packet), Some(4));

            let mut buf = [0u8; 4];
            assert_eq!(set.write(&packet, &mut buf, 0), Some(4));
            assert_eq!(buf, value.to_le_bytes());

            let mut decoded = Packet::default();
            assert_eq!(set.read_scalar(&mut decoded, &buf, 0), Some(()));
            assert_eq!(decoded.code, value);
        }

        let packet = Packet {
            code: 0x11223344,
            ..Packet::default()
        };
        let mut buf = [0u8; 4];
        set.write(&packet, &mut buf, 0);
        assert_eq!(buf, [0x44, 0x33, 0x22, 0x11]);

        let packet = Packet {
            code: -1,
            ..Packet::default()
        };
        set.write(&packet, &mut buf, 0);
        assert_eq!(buf, [0xff; 4]);
    }

    #[test]
    fn fixed_width_types_round_trip_in_both_byte_orders() {
        for order in [ByteOrder::Little, ByteOrder::Big] {
            let compiler = AccessorCompiler::new(Arc::new(CodecRegistry::with_config(
                RegistryConfig {
                    byte_order: order,
                    ..RegistryConfig::default()
                },
            )));

            round_trip_each!(compiler, order,
                u8 => [u8::MIN, 0x5a, u8::MAX];
                i8 => [i8::MIN, -1, 0, i8::MAX];
                u16 => [u16::MIN, 0x1234, u16::MAX];
                i16 => [i16::MIN, -1, 0, i16::MAX];
                u32 => [u32::MIN, 0x1234_5678, u32::MAX];
                i32 => [i32::MIN, -1, 0, i32::MAX];
                u64 => [u64::MIN, 0x0102_0304_0506_0708, u64::MAX];
                i64 => [i64::MIN, -1, 0, i64::MAX];
                u128 => [u128::MIN, 1 << 100, u128::MAX];
                i128 => [i128::MIN, -1, 0, i128::MAX];
                f32 => [f32::MIN, -0.0, 0.0, f32::MAX, f32::INFINITY, f32::NEG_INFINITY, f32::NAN];
                f64 => [f64::MIN, -0.0, 0.0, f64::MAX, f64::INFINITY, f64::NEG_INFINITY, f64::NAN];
            );

            let set = compiler.compile(&slot::<bool>()).unwrap();
            for value in [false, true] {
                assert_eq!(round_trip(&set, value, &[u8::from(value)]), value);
            }
        }
    }

    #[test]
    fn write_respects_offset() {
        let set = compiler().compile(&code()).unwrap();
        let packet = Packet {
            code: 0x01020304,
            ..Packet::default()
        };
        let mut buf = [0xaa; 7];
        assert_eq!(set.write(&packet, &mut buf, 3), Some(4));
        assert_eq!(buf, [0xaa, 0xaa, 0xaa, 0x04, 0x03, 0x02, 0x01]);

        let mut decoded = Packet::default();
        set.read_scalar(&mut decoded, &buf, 3);
        assert_eq!(decoded.code, 0x01020304);
    }

    #[test]
    fn fixed_members_get_only_the_scalar_reader() {
        let set = compiler().compile(&code()).unwrap();
        assert!(set.has(OperationKind::Write));
        assert!(set.has(OperationKind::SizeOf));
        assert!(set.has(OperationKind::ReadScalar));
        assert!(!set.has(OperationKind::ReadBounded));
        assert!(set.is_readable());
        assert!(set.is_writable());
        let names: Vec<String> = set.bindings().iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            vec!["write=GetBytes", "size_of=GetByteCount", "read_scalar=ToInt32"]
        );
    }

    #[test]
    fn prefixed_member_uses_bounded_reader() {
        let set = compiler().compile(&body()).unwrap();
        assert!(!set.has(OperationKind::ReadScalar));
        assert!(set.has(OperationKind::ReadBounded));
        assert_eq!(set.length_mode(), LengthMode::Prefixed);

        let packet = Packet {
            body: vec![1, 2, 3, 4, 5],
            ..Packet::default()
        };
        let size = set.size_of(&packet).unwrap();
        let mut buf = vec![0u8; size + 2];
        assert_eq!(set.write(&packet, &mut buf, 2), Some(size));

        let mut decoded = Packet::default();
        set.read_bounded(&mut decoded, &buf, 2, size);
        assert_eq!(decoded.body, packet.body);

        set.read_bounded(&mut decoded, &buf, 2, 0);
        assert!(decoded.body.is_empty());
    }

    #[test]
    fn prefixed_member_without_bounded_codec_fails() {
        let ratio = MemberDescriptor::field(
            "ratio",
            |p: &Packet| &p.ratio,
            |p: &mut Packet, v| p.ratio = v,
        )
        .prefixed();
        let err = compiler().compile(&ratio).unwrap_err();
        assert!(matches!(
            err.codec(),
            Some(CodecResolutionError::NotFound {
                kind: OperationKind::ReadBounded,
                ..
            })
        ));
    }

    #[test]
    fn computed_property_round_trips() {
        let set = compiler().compile(&elapsed_ms()).unwrap();
        let packet = Packet {
            elapsed: Duration::from_millis(1_500),
            ..Packet::default()
        };
        let mut buf = [0u8; 8];
        assert_eq!(set.write(&packet, &mut buf, 0), Some(8));
        let mut decoded = Packet::default();
        set.read_scalar(&mut decoded, &buf, 0);
        assert_eq!(decoded.elapsed, Duration::from_millis(1_500));
    }

    #[test]
    fn variable_length_codec_size_tracks_every_value() {
        let registry = CodecRegistry::with_config(RegistryConfig {
            varint: true,
            ..RegistryConfig::default()
        });
        let compiler = AccessorCompiler::new(Arc::new(registry));
        let hops = MemberDescriptor::field("hops", |p: &Packet| &p.hops, |p: &mut Packet, v| {
            p.hops = v
        })
        .with_writer("GetVarBytes")
        .with_size_of("GetVarByteCount")
        .with_scalar_reader("ReadVarUInt64");
        let set = compiler.compile(&hops).unwrap();

        let mut packet = Packet::default();
        let mut previous = 0;
        for value in [0u64, 1, 127, 128, 1 << 20, u64::MAX] {
            packet.hops = value;
            let size = set.size_of(&packet).unwrap();
            assert!(size >= previous);
            previous = size;

            let mut buf = [0u8; 10];
            assert_eq!(set.write(&packet, &mut buf, 0), Some(size));
            let mut decoded = Packet::default();
            set.read_scalar(&mut decoded, &buf, 0);
            assert_eq!(decoded.hops, value);
        }
        assert_eq!(previous, 10);
    }

    #[test]
    fn ambiguous_reader_must_be_named() {
        let registry = CodecRegistry::with_config(RegistryConfig {
            varint: true,
            ..RegistryConfig::default()
        });
        let compiler = AccessorCompiler::new(Arc::new(registry));
        let hops = MemberDescriptor::field("hops", |p: &Packet| &p.hops, |p: &mut Packet, v| {
            p.hops = v
        });
        let err = compiler.compile(&hops).unwrap_err();
        assert!(matches!(
            err.codec(),
            Some(CodecResolutionError::Ambiguous { .. })
        ));
    }

    #[test]
    fn unknown_writer_name_fails_at_compile_time() {
        let checksum = MemberDescriptor::field(
            "checksum",
            |p: &Packet| &p.checksum,
            |p: &mut Packet, v| p.checksum = v,
        )
        .with_writer("GetBytesReversed");
        let err = compiler().compile(&checksum).unwrap_err();
        match err {
            CompileError::Codec { member, source, .. } => {
                assert_eq!(member, "checksum");
                assert!(matches!(source, CodecResolutionError::NotFound { .. }));
            }
            other => panic!("expected codec error, got {other}"),
        }
    }

    #[test]
    fn size_name_under_write_kind_is_rejected() {
        let checksum = MemberDescriptor::field(
            "checksum",
            |p: &Packet| &p.checksum,
            |p: &mut Packet, v| p.checksum = v,
        )
        .with_writer(DEFAULT_SIZE_OF);
        let err = compiler().compile(&checksum).unwrap_err();
        assert!(matches!(
            err.codec(),
            Some(CodecResolutionError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn read_only_member_compiles_without_readers() {
        let title = MemberDescriptor::read_only_field("title", |p: &Packet| &p.title);
        let set = compiler().compile(&title).unwrap();
        assert!(set.is_readable());
        assert!(!set.is_writable());
        assert!(set.scalar_reader().is_none());
        assert!(set.bounded_reader().is_none());

        let mut decoded = Packet::default();
        assert_eq!(set.read_bounded(&mut decoded, b"abc", 0, 3), None);
    }

    #[test]
    fn write_only_member_compiles_without_writer() {
        let reset = MemberDescriptor::write_only("reset", |p: &mut Packet, v: bool| {
            if v {
                *p = Packet::default();
            }
        });
        let set = compiler().compile(&reset).unwrap();
        assert!(!set.is_readable());
        assert!(set.size_getter().is_none());
        assert!(set.serialize_writer().is_none());

        let mut packet = Packet {
            code: 5,
            ..Packet::default()
        };
        set.read_scalar(&mut packet, &[1], 0);
        assert_eq!(packet, Packet::default());
    }

    #[test]
    fn compile_typed_rejects_wrong_type() {
        let compiler = compiler();
        assert!(compiler.compile_typed::<Packet, i32>(&code()).is_ok());
        let err = compiler
            .compile_typed::<Packet, u32>(&code())
            .unwrap_err();
        assert!(matches!(
            err.binding(),
            Some(BindingError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn compiling_twice_yields_equivalent_sets() {
        let compiler = compiler();
        let first = compiler.compile(&body()).unwrap();
        let second = compiler.compile(&body()).unwrap();

        let packet = Packet {
            body: b"same bytes".to_vec(),
            ..Packet::default()
        };
        assert_eq!(first.size_of(&packet), second.size_of(&packet));

        let mut a = vec![0u8; 10];
        let mut b = vec![0u8; 10];
        first.write(&packet, &mut a, 0);
        second.write(&packet, &mut b, 0);
        assert_eq!(a, b);
        assert_eq!(first.bindings(), second.bindings());
    }

    #[test]
    fn compiled_set_is_shareable_across_threads() {
        let set = Arc::new(compiler().compile(&code()).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let set = Arc::clone(&set);
                std::thread::spawn(move || {
                    let packet = Packet {
                        code: i,
                        ..Packet::default()
                    };
                    let mut buf = [0u8; 4];
                    set.write(&packet, &mut buf, 0);
                    let mut decoded = Packet::default();
                    set.read_scalar(&mut decoded, &buf, 0);
                    decoded.code
                })
            })
            .collect();
        let mut results: Vec<i32> = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect();
        results.sort_unstable();
        assert_eq!(results, vec![0, 1, 2, 3]);
    }
}
