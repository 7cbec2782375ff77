use std::fmt;

use serde::Serialize;
use wirebind::accessor::MemberLocator;
use wirebind::codec::CodecRegistry;
use wirebind::entity::{EntityConfig, EntitySerializer};

use crate::cmd::{registry_config, RoundtripArgs};
use crate::exit::{entity_error, CliError, CliResult, FAILURE, SUCCESS};
use crate::output::{hex, print_json, print_table, OutputFormat};
use crate::samples::{Reading, Record, Sample};

#[derive(Serialize)]
struct RoundtripOutput {
    sample: &'static str,
    size: usize,
    consumed: usize,
    hex: String,
    verified: bool,
}

pub fn run(args: RoundtripArgs, format: OutputFormat) -> CliResult<i32> {
    let registry = CodecRegistry::with_config(registry_config(args.big_endian, false));
    let config = EntityConfig {
        length_prefix: args.prefix.into(),
        ..EntityConfig::default()
    };
    let serializer = EntitySerializer::with_config(registry.into(), config);

    let output = match args.sample {
        Sample::Reading => roundtrip(&serializer, args.sample, &Reading::sample())?,
        Sample::Record => roundtrip(&serializer, args.sample, &Record::sample())?,
    };

    match format {
        OutputFormat::Json => print_json(&output),
        OutputFormat::Table => print_table(
            &["SAMPLE", "SIZE", "CONSUMED", "VERIFIED", "HEX"],
            vec![vec![
                output.sample.to_string(),
                output.size.to_string(),
                output.consumed.to_string(),
                output.verified.to_string(),
                output.hex.clone(),
            ]],
        ),
        OutputFormat::Pretty => {
            println!(
                "{} size={} consumed={} verified={}",
                output.sample, output.size, output.consumed, output.verified
            );
            println!("{}", output.hex);
        }
    }

    if !output.verified {
        return Err(CliError::new(
            FAILURE,
            format!("{}: decoded value differs from the original", output.sample),
        ));
    }
    Ok(SUCCESS)
}

fn roundtrip<H>(serializer: &EntitySerializer, sample: Sample, value: &H) -> CliResult<RoundtripOutput>
where
    H: MemberLocator + Default + PartialEq + fmt::Debug,
{
    let bytes = serializer
        .serialize(value)
        .map_err(|err| entity_error(&format!("encode {}", sample.name()), err))?;

    let mut decoded = H::default();
    let consumed = serializer
        .deserialize_into(&mut decoded, &bytes, 0)
        .map_err(|err| entity_error(&format!("decode {}", sample.name()), err))?;

    let verified = consumed == bytes.len() && decoded == *value;
    if verified {
        tracing::info!(sample = sample.name(), size = bytes.len(), "roundtrip verified");
    } else {
        tracing::warn!(
            sample = sample.name(),
            ?decoded,
            expected = ?value,
            "roundtrip mismatch"
        );
    }

    Ok(RoundtripOutput {
        sample: sample.name(),
        size: bytes.len(),
        consumed,
        hex: hex(&bytes),
        verified,
    })
}
