use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use wirebind_codec::{ValueType, DEFAULT_SIZE_OF, DEFAULT_WRITE};

use crate::compiler::{compile_member, AccessorCompiler, CompiledAccessorSet};
use crate::error::Result;

/// Reads a member. Fields hand out a borrow, computed properties an owned value.
pub type Getter<H, T> = Arc<dyn for<'a> Fn(&'a H) -> Cow<'a, T> + Send + Sync>;

/// Assigns a decoded value to a member.
pub type Setter<H, T> = Arc<dyn Fn(&mut H, T) + Send + Sync>;

type CompileEntry<H> = fn(&AccessorCompiler, &MemberDescriptor<H>) -> Result<CompiledAccessorSet<H>>;

/// Whether a member is stored or computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Property,
}

/// How the decoded length of a member is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LengthMode {
    /// Implied by the value type; decoded with the scalar reader.
    #[default]
    Implicit,
    /// Carried out of band; decoded with the bounded reader.
    Prefixed,
}

/// Codec operation names a member is compiled against.
///
/// `write` and `size_of` default to `GetBytes` / `GetByteCount`. Readers
/// without a name are resolved by shape: the value type must offer exactly
/// one reader of that kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodecSelection {
    pub write: Cow<'static, str>,
    pub size_of: Cow<'static, str>,
    pub read_scalar: Option<Cow<'static, str>>,
    pub read_bounded: Option<Cow<'static, str>>,
    pub length: LengthMode,
}

impl Default for CodecSelection {
    fn default() -> Self {
        Self {
            write: Cow::Borrowed(DEFAULT_WRITE),
            size_of: Cow::Borrowed(DEFAULT_SIZE_OF),
            read_scalar: None,
            read_bounded: None,
            length: LengthMode::Implicit,
        }
    }
}

/// Typed getter/setter pair, stored erased inside a [`MemberDescriptor`].
pub(crate) struct TypedAccess<H, T: Clone + 'static> {
    pub(crate) getter: Option<Getter<H, T>>,
    pub(crate) setter: Option<Setter<H, T>>,
}

/// One serializable property or field of a host type `H`.
///
/// Produced once by a [`MemberLocator`]; treated as an opaque identity plus
/// capability plus value type by everything downstream. The descriptor also
/// carries the compile entry point monomorphized for its value type, so a
/// list of descriptors with different value types can be compiled without
/// any runtime type dispatch.
pub struct MemberDescriptor<H> {
    name: Cow<'static, str>,
    value_type: ValueType,
    kind: MemberKind,
    readable: bool,
    writable: bool,
    codec: CodecSelection,
    access: Arc<dyn Any + Send + Sync>,
    compile: CompileEntry<H>,
}

fn getter<H, T, F>(f: F) -> Getter<H, T>
where
    T: Clone,
    F: for<'a> Fn(&'a H) -> Cow<'a, T> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn setter<H, T, F>(f: F) -> Setter<H, T>
where
    F: Fn(&mut H, T) + Send + Sync + 'static,
{
    Arc::new(f)
}

impl<H: 'static> MemberDescriptor<H> {
    /// A stored field with both read and write access.
    pub fn field<T, G, S>(name: impl Into<Cow<'static, str>>, get: G, set: S) -> Self
    where
        T: Clone + Send + Sync + 'static,
        G: for<'a> Fn(&'a H) -> &'a T + Send + Sync + 'static,
        S: Fn(&mut H, T) + Send + Sync + 'static,
    {
        Self::from_parts::<T>(
            name.into(),
            MemberKind::Field,
            Some(getter(move |host: &H| Cow::Borrowed(get(host)))),
            Some(setter(set)),
        )
    }

    /// A stored field that can only be read.
    pub fn read_only_field<T, G>(name: impl Into<Cow<'static, str>>, get: G) -> Self
    where
        T: Clone + Send + Sync + 'static,
        G: for<'a> Fn(&'a H) -> &'a T + Send + Sync + 'static,
    {
        Self::from_parts::<T>(
            name.into(),
            MemberKind::Field,
            Some(getter(move |host: &H| Cow::Borrowed(get(host)))),
            None,
        )
    }

    /// A computed member with both read and write access.
    pub fn property<T, G, S>(name: impl Into<Cow<'static, str>>, get: G, set: S) -> Self
    where
        T: Clone + Send + Sync + 'static,
        G: Fn(&H) -> T + Send + Sync + 'static,
        S: Fn(&mut H, T) + Send + Sync + 'static,
    {
        Self::from_parts::<T>(
            name.into(),
            MemberKind::Property,
            Some(getter(move |host: &H| Cow::Owned(get(host)))),
            Some(setter(set)),
        )
    }

    /// A computed member that can only be read.
    pub fn read_only_property<T, G>(name: impl Into<Cow<'static, str>>, get: G) -> Self
    where
        T: Clone + Send + Sync + 'static,
        G: Fn(&H) -> T + Send + Sync + 'static,
    {
        Self::from_parts::<T>(
            name.into(),
            MemberKind::Property,
            Some(getter(move |host: &H| Cow::Owned(get(host)))),
            None,
        )
    }

    /// A member that can only be assigned.
    pub fn write_only<T, S>(name: impl Into<Cow<'static, str>>, set: S) -> Self
    where
        T: Clone + Send + Sync + 'static,
        S: Fn(&mut H, T) + Send + Sync + 'static,
    {
        Self::from_parts::<T>(name.into(), MemberKind::Property, None, Some(setter(set)))
    }

    fn from_parts<T>(
        name: Cow<'static, str>,
        kind: MemberKind,
        getter: Option<Getter<H, T>>,
        setter: Option<Setter<H, T>>,
    ) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        Self {
            name,
            value_type: ValueType::of::<T>(),
            kind,
            readable: getter.is_some(),
            writable: setter.is_some(),
            codec: CodecSelection::default(),
            access: Arc::new(TypedAccess { getter, setter }),
            compile: compile_member::<H, T>,
        }
    }

    /// Use a non-default write operation.
    pub fn with_writer(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.codec.write = name.into();
        self
    }

    /// Use a non-default size operation.
    pub fn with_size_of(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.codec.size_of = name.into();
        self
    }

    /// Name the scalar reader instead of resolving it by shape.
    pub fn with_scalar_reader(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.codec.read_scalar = Some(name.into());
        self
    }

    /// Name the bounded reader instead of resolving it by shape.
    pub fn with_bounded_reader(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.codec.read_bounded = Some(name.into());
        self
    }

    /// Decode with the bounded reader; the length travels out of band.
    pub fn prefixed(mut self) -> Self {
        self.codec.length = LengthMode::Prefixed;
        self
    }

    /// Replace the whole codec selection.
    pub fn with_codec(mut self, codec: CodecSelection) -> Self {
        self.codec = codec;
        self
    }
}

impl<H> MemberDescriptor<H> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn is_readable(&self) -> bool {
        self.readable
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn codec(&self) -> &CodecSelection {
        &self.codec
    }

    pub fn length_mode(&self) -> LengthMode {
        self.codec.length
    }

    pub(crate) fn name_cow(&self) -> &Cow<'static, str> {
        &self.name
    }

    pub(crate) fn compile_entry(&self) -> CompileEntry<H> {
        self.compile
    }
}

impl<H: 'static> MemberDescriptor<H> {
    /// The typed access pair, if `T` is the declared value type.
    pub(crate) fn typed_access<T: Clone + 'static>(&self) -> Option<&TypedAccess<H, T>> {
        self.access.downcast_ref::<TypedAccess<H, T>>()
    }
}

impl<H> Clone for MemberDescriptor<H> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            value_type: self.value_type,
            kind: self.kind,
            readable: self.readable,
            writable: self.writable,
            codec: self.codec.clone(),
            access: Arc::clone(&self.access),
            compile: self.compile,
        }
    }
}

impl<H> fmt::Debug for MemberDescriptor<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("kind", &self.kind)
            .field("readable", &self.readable)
            .field("writable", &self.writable)
            .field("codec", &self.codec)
            .finish()
    }
}

/// Supplies the ordered serializable members of a host type.
pub trait MemberLocator: Sized + 'static {
    fn members() -> Vec<MemberDescriptor<Self>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sample {
        count: u32,
        label: String,
        scale: f32,
    }

    impl MemberLocator for Sample {
        fn members() -> Vec<MemberDescriptor<Self>> {
            vec![
                MemberDescriptor::field("count", |s: &Sample| &s.count, |s: &mut Sample, v| {
                    s.count = v
                }),
                MemberDescriptor::read_only_field("label", |s: &Sample| &s.label).prefixed(),
                MemberDescriptor::property(
                    "percent",
                    |s: &Sample| (s.scale * 100.0) as u8,
                    |s: &mut Sample, v: u8| s.scale = f32::from(v) / 100.0,
                ),
                MemberDescriptor::write_only("reset", |s: &mut Sample, v: bool| {
                    if v {
                        s.count = 0;
                    }
                }),
            ]
        }
    }

    #[test]
    fn capabilities_follow_supplied_accessors() {
        let members = Sample::members();
        let caps: Vec<(&str, bool, bool)> = members
            .iter()
            .map(|m| (m.name(), m.is_readable(), m.is_writable()))
            .collect();
        assert_eq!(
            caps,
            vec![
                ("count", true, true),
                ("label", true, false),
                ("percent", true, true),
                ("reset", false, true),
            ]
        );
    }

    #[test]
    fn declared_value_types_are_recorded() {
        let members = Sample::members();
        assert!(members[0].value_type().is::<u32>());
        assert!(members[1].value_type().is::<String>());
        assert!(members[2].value_type().is::<u8>());
        assert!(members[3].value_type().is::<bool>());
        assert_eq!(members[0].kind(), MemberKind::Field);
        assert_eq!(members[2].kind(), MemberKind::Property);
    }

    #[test]
    fn codec_selection_defaults_and_overrides() {
        let members = Sample::members();
        assert_eq!(members[0].codec(), &CodecSelection::default());
        assert_eq!(members[0].codec().write, "GetBytes");
        assert_eq!(members[0].codec().size_of, "GetByteCount");
        assert_eq!(members[1].length_mode(), LengthMode::Prefixed);

        let custom = members[0]
            .clone()
            .with_writer("GetVarBytes")
            .with_size_of("GetVarByteCount")
            .with_scalar_reader("ReadVarUInt32");
        assert_eq!(custom.codec().write, "GetVarBytes");
        assert_eq!(custom.codec().read_scalar.as_deref(), Some("ReadVarUInt32"));
        assert_eq!(custom.length_mode(), LengthMode::Implicit);
    }

    #[test]
    fn typed_access_requires_the_declared_type() {
        let members = Sample::members();
        assert!(members[0].typed_access::<u32>().is_some());
        assert!(members[0].typed_access::<u64>().is_none());

        let access = members[2].typed_access::<u8>().unwrap();
        let mut sample = Sample {
            scale: 0.25,
            ..Sample::default()
        };
        let get = access.getter.as_ref().unwrap();
        assert_eq!(*get(&sample), 25);
        let set = access.setter.as_ref().unwrap();
        set(&mut sample, 50);
        assert_eq!(sample.scale, 0.5);
    }
}
