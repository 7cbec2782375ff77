//! Default codecs for primitive value types.
//!
//! Naming follows the usual binary-converter convention: every type writes
//! with `GetBytes`, sizes with `GetByteCount`, and reads with `To<TypeName>`.
//! Fixed-width values panic when the buffer is too short; bounds checking is
//! left to the caller.

use std::sync::Arc;

use bytes::{Buf, BufMut};

use crate::config::ByteOrder;
use crate::operation::{OperationKind, ReadBoundedFn, ReadScalarFn, SizeOfFn, WriteFn};
use crate::registry::CodecRegistry;
use crate::value_type::ValueType;
use crate::varint;

/// Conventional name of the write operation.
pub const DEFAULT_WRITE: &str = "GetBytes";

/// Conventional name of the size operation.
pub const DEFAULT_SIZE_OF: &str = "GetByteCount";

/// Name of the variable-length write operation.
pub const VARINT_WRITE: &str = "GetVarBytes";

/// Name of the variable-length size operation.
pub const VARINT_SIZE_OF: &str = "GetVarByteCount";

fn define_writer<T: 'static>(
    registry: &mut CodecRegistry,
    name: &'static str,
    f: impl Fn(&T, &mut [u8], usize) -> usize + Send + Sync + 'static,
) {
    let op: WriteFn<T> = Arc::new(f);
    registry.define(ValueType::of::<T>(), OperationKind::Write, name, op);
}

fn define_size_of<T: 'static>(
    registry: &mut CodecRegistry,
    name: &'static str,
    f: impl Fn(&T) -> usize + Send + Sync + 'static,
) {
    let op: SizeOfFn<T> = Arc::new(f);
    registry.define(ValueType::of::<T>(), OperationKind::SizeOf, name, op);
}

fn define_reader_scalar<T: 'static>(
    registry: &mut CodecRegistry,
    name: &'static str,
    f: impl Fn(&[u8], usize) -> T + Send + Sync + 'static,
) {
    let op: ReadScalarFn<T> = Arc::new(f);
    registry.define(ValueType::of::<T>(), OperationKind::ReadScalar, name, op);
}

fn define_reader_bounded<T: 'static>(
    registry: &mut CodecRegistry,
    name: &'static str,
    f: impl Fn(&[u8], usize, usize) -> T + Send + Sync + 'static,
) {
    let op: ReadBoundedFn<T> = Arc::new(f);
    registry.define(ValueType::of::<T>(), OperationKind::ReadBounded, name, op);
}

macro_rules! fixed {
    ($registry:expr, $order:expr, $ty:ty, $reader:literal, $put_be:ident, $put_le:ident, $get_be:ident, $get_le:ident) => {{
        const WIDTH: usize = std::mem::size_of::<$ty>();
        define_size_of::<$ty>($registry, DEFAULT_SIZE_OF, |_: &$ty| WIDTH);
        match $order {
            ByteOrder::Little => {
                define_writer::<$ty>($registry, DEFAULT_WRITE, |value: &$ty, buf: &mut [u8], offset: usize| {
                    (&mut buf[offset..]).$put_le(*value);
                    WIDTH
                });
                define_reader_scalar::<$ty>($registry, $reader, |buf: &[u8], offset: usize| {
                    (&buf[offset..]).$get_le()
                });
            }
            ByteOrder::Big => {
                define_writer::<$ty>($registry, DEFAULT_WRITE, |value: &$ty, buf: &mut [u8], offset: usize| {
                    (&mut buf[offset..]).$put_be(*value);
                    WIDTH
                });
                define_reader_scalar::<$ty>($registry, $reader, |buf: &[u8], offset: usize| {
                    (&buf[offset..]).$get_be()
                });
            }
        }
    }};
}

macro_rules! varint {
    ($registry:expr, $ty:ty, $reader:literal) => {{
        define_size_of::<$ty>($registry, VARINT_SIZE_OF, |value: &$ty| {
            varint::encoded_len(u64::from(*value))
        });
        define_writer::<$ty>($registry, VARINT_WRITE, |value: &$ty, buf: &mut [u8], offset: usize| {
            varint::encode(u64::from(*value), buf, offset)
        });
        define_reader_scalar::<$ty>($registry, $reader, |buf: &[u8], offset: usize| {
            varint::decode(buf, offset) as $ty
        });
    }};
}

/// Register the default primitive codecs.
pub(crate) fn install(registry: &mut CodecRegistry, order: ByteOrder) {
    define_size_of::<bool>(registry, DEFAULT_SIZE_OF, |_: &bool| 1);
    define_writer::<bool>(registry, DEFAULT_WRITE, |value: &bool, buf: &mut [u8], offset: usize| {
        buf[offset] = u8::from(*value);
        1
    });
    define_reader_scalar::<bool>(registry, "ToBoolean", |buf: &[u8], offset: usize| {
        buf[offset] != 0
    });

    fixed!(registry, order, u8, "ToByte", put_u8, put_u8, get_u8, get_u8);
    fixed!(registry, order, i8, "ToSByte", put_i8, put_i8, get_i8, get_i8);
    fixed!(registry, order, u16, "ToUInt16", put_u16, put_u16_le, get_u16, get_u16_le);
    fixed!(registry, order, i16, "ToInt16", put_i16, put_i16_le, get_i16, get_i16_le);
    fixed!(registry, order, u32, "ToUInt32", put_u32, put_u32_le, get_u32, get_u32_le);
    fixed!(registry, order, i32, "ToInt32", put_i32, put_i32_le, get_i32, get_i32_le);
    fixed!(registry, order, u64, "ToUInt64", put_u64, put_u64_le, get_u64, get_u64_le);
    fixed!(registry, order, i64, "ToInt64", put_i64, put_i64_le, get_i64, get_i64_le);
    fixed!(registry, order, u128, "ToUInt128", put_u128, put_u128_le, get_u128, get_u128_le);
    fixed!(registry, order, i128, "ToInt128", put_i128, put_i128_le, get_i128, get_i128_le);
    fixed!(registry, order, f32, "ToSingle", put_f32, put_f32_le, get_f32, get_f32_le);
    fixed!(registry, order, f64, "ToDouble", put_f64, put_f64_le, get_f64, get_f64_le);

    define_size_of::<Vec<u8>>(registry, DEFAULT_SIZE_OF, |value: &Vec<u8>| value.len());
    define_writer::<Vec<u8>>(
        registry,
        DEFAULT_WRITE,
        |value: &Vec<u8>, buf: &mut [u8], offset: usize| {
            buf[offset..offset + value.len()].copy_from_slice(value);
            value.len()
        },
    );
    define_reader_bounded::<Vec<u8>>(
        registry,
        "ToArray",
        |buf: &[u8], offset: usize, length: usize| buf[offset..offset + length].to_vec(),
    );

    define_size_of::<String>(registry, DEFAULT_SIZE_OF, |value: &String| value.len());
    define_writer::<String>(
        registry,
        DEFAULT_WRITE,
        |value: &String, buf: &mut [u8], offset: usize| {
            buf[offset..offset + value.len()].copy_from_slice(value.as_bytes());
            value.len()
        },
    );
    define_reader_bounded::<String>(
        registry,
        "GetString",
        |buf: &[u8], offset: usize, length: usize| {
            String::from_utf8_lossy(&buf[offset..offset + length]).into_owned()
        },
    );
}

/// Register LEB128 codecs for unsigned integers wider than a byte.
pub(crate) fn install_varint(registry: &mut CodecRegistry) {
    varint!(registry, u16, "ReadVarUInt16");
    varint!(registry, u32, "ReadVarUInt32");
    varint!(registry, u64, "ReadVarUInt64");
}
