use std::time::Duration;

use clap::ValueEnum;
use wirebind::accessor::{MemberDescriptor, MemberLocator};

/// Built-in host types the CLI can inspect and round-trip.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Sample {
    /// Fixed-width scalar members only.
    Reading,
    /// Prefixed string and bytes members plus a computed property.
    Record,
}

impl Sample {
    pub fn name(self) -> &'static str {
        match self {
            Sample::Reading => "reading",
            Sample::Record => "record",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reading {
    pub sensor: u16,
    pub celsius: f32,
    pub pressure: f64,
    pub healthy: bool,
    pub sequence: u64,
}

impl Reading {
    pub fn sample() -> Self {
        Self {
            sensor: 0x0a0b,
            celsius: 21.5,
            pressure: 101_325.0,
            healthy: true,
            sequence: 0x1122_3344_5566_7788,
        }
    }
}

impl MemberLocator for Reading {
    fn members() -> Vec<MemberDescriptor<Self>> {
        vec![
            MemberDescriptor::field("sensor", |r: &Reading| &r.sensor, |r: &mut Reading, v| {
                r.sensor = v
            }),
            MemberDescriptor::field("celsius", |r: &Reading| &r.celsius, |r: &mut Reading, v| {
                r.celsius = v
            }),
            MemberDescriptor::field(
                "pressure",
                |r: &Reading| &r.pressure,
                |r: &mut Reading, v| r.pressure = v,
            ),
            MemberDescriptor::field("healthy", |r: &Reading| &r.healthy, |r: &mut Reading, v| {
                r.healthy = v
            }),
            MemberDescriptor::field(
                "sequence",
                |r: &Reading| &r.sequence,
                |r: &mut Reading, v| r.sequence = v,
            ),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub id: i64,
    pub name: String,
    pub payload: Vec<u8>,
    pub created: Duration,
    pub flags: u8,
}

impl Record {
    pub fn sample() -> Self {
        Self {
            id: -42,
            name: "wirebind".to_string(),
            payload: vec![0xde, 0xad, 0xbe, 0xef],
            created: Duration::from_millis(1_700_000_000_000),
            flags: 0b0000_0101,
        }
    }
}

impl MemberLocator for Record {
    fn members() -> Vec<MemberDescriptor<Self>> {
        vec![
            MemberDescriptor::field("id", |r: &Record| &r.id, |r: &mut Record, v| r.id = v),
            MemberDescriptor::field("name", |r: &Record| &r.name, |r: &mut Record, v| r.name = v)
                .prefixed(),
            MemberDescriptor::field("payload", |r: &Record| &r.payload, |r: &mut Record, v| {
                r.payload = v
            })
            .prefixed(),
            MemberDescriptor::property(
                "created_ms",
                |r: &Record| r.created.as_millis() as u64,
                |r: &mut Record, v: u64| r.created = Duration::from_millis(v),
            ),
            MemberDescriptor::field("flags", |r: &Record| &r.flags, |r: &mut Record, v| {
                r.flags = v
            }),
        ]
    }
}
