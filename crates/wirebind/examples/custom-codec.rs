//! Registers codec operations for a new value type and serializes a host type that uses it.
//!
//! Run with:
//!   cargo run --example custom-codec

use std::net::Ipv4Addr;
use std::sync::Arc;

use wirebind::accessor::{MemberDescriptor, MemberLocator};
use wirebind::codec::{CodecRegistry, RegistryConfig, DEFAULT_SIZE_OF, DEFAULT_WRITE};
use wirebind::entity::EntitySerializer;

#[derive(Debug, Clone, PartialEq)]
struct Route {
    dest: Ipv4Addr,
    hops: u32,
    label: String,
}

impl Default for Route {
    fn default() -> Self {
        Self {
            dest: Ipv4Addr::UNSPECIFIED,
            hops: 0,
            label: String::new(),
        }
    }
}

impl MemberLocator for Route {
    fn members() -> Vec<MemberDescriptor<Self>> {
        vec![
            MemberDescriptor::field("dest", |r: &Route| &r.dest, |r: &mut Route, v| r.dest = v),
            MemberDescriptor::field("hops", |r: &Route| &r.hops, |r: &mut Route, v| r.hops = v)
                .with_writer("GetVarBytes")
                .with_size_of("GetVarByteCount")
                .with_scalar_reader("ReadVarUInt32"),
            MemberDescriptor::field("label", |r: &Route| &r.label, |r: &mut Route, v| {
                r.label = v
            })
            .prefixed(),
        ]
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = CodecRegistry::with_config(RegistryConfig {
        varint: true,
        ..RegistryConfig::default()
    });

    // Network byte order, regardless of the registry's byte order.
    registry.register_size_of::<Ipv4Addr, _>(DEFAULT_SIZE_OF, |_: &Ipv4Addr| 4)?;
    registry.register_writer::<Ipv4Addr, _>(
        DEFAULT_WRITE,
        |addr: &Ipv4Addr, buf: &mut [u8], offset: usize| {
            buf[offset..offset + 4].copy_from_slice(&addr.octets());
            4
        },
    )?;
    registry.register_reader_scalar::<Ipv4Addr, _>("ToIpv4", |buf: &[u8], offset: usize| {
        Ipv4Addr::new(buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3])
    })?;

    let serializer = EntitySerializer::new(Arc::new(registry));
    serializer.register::<Route>()?;

    let route = Route {
        dest: Ipv4Addr::new(10, 0, 0, 1),
        hops: 300,
        label: "uplink".to_string(),
    };
    let bytes = serializer.serialize(&route)?;
    eprintln!("Encoded {} bytes: {:02x?}", bytes.len(), bytes.as_ref());

    let decoded: Route = serializer.deserialize(&bytes)?;
    eprintln!("Decoded {decoded:?}");
    assert_eq!(decoded, route);

    Ok(())
}
