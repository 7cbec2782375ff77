use serde::Serialize;
use wirebind::accessor::{LengthMode, MemberKind, MemberLocator};
use wirebind::codec::CodecRegistry;
use wirebind::entity::EntitySerializer;

use crate::cmd::{registry_config, InspectArgs};
use crate::exit::{entity_error, CliResult, SUCCESS};
use crate::output::{print_json, print_table, OutputFormat};
use crate::samples::{Reading, Record, Sample};

#[derive(Serialize)]
struct MemberRow {
    name: String,
    value_type: String,
    kind: &'static str,
    access: &'static str,
    length: &'static str,
    size: Option<usize>,
    operations: Vec<String>,
}

#[derive(Serialize)]
struct InspectOutput {
    sample: &'static str,
    encoded_size: usize,
    members: Vec<MemberRow>,
}

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let registry = CodecRegistry::with_config(registry_config(args.big_endian, false));
    let serializer = EntitySerializer::new(registry.into());

    let output = match args.sample {
        Sample::Reading => describe(&serializer, args.sample, &Reading::sample())?,
        Sample::Record => describe(&serializer, args.sample, &Record::sample())?,
    };

    match format {
        OutputFormat::Json => print_json(&output),
        OutputFormat::Table => print_table(
            &["MEMBER", "TYPE", "KIND", "ACCESS", "LENGTH", "SIZE", "OPERATIONS"],
            output
                .members
                .iter()
                .map(|m| {
                    vec![
                        m.name.clone(),
                        m.value_type.clone(),
                        m.kind.to_string(),
                        m.access.to_string(),
                        m.length.to_string(),
                        m.size.map_or_else(|| "-".to_string(), |s| s.to_string()),
                        m.operations.join(", "),
                    ]
                })
                .collect(),
        ),
        OutputFormat::Pretty => {
            println!("{} ({} bytes encoded)", output.sample, output.encoded_size);
            for m in &output.members {
                println!(
                    "  {} : {} [{} {} {}] {}",
                    m.name,
                    m.value_type,
                    m.kind,
                    m.access,
                    m.length,
                    m.operations.join(" ")
                );
            }
        }
    }

    Ok(SUCCESS)
}

fn describe<H: MemberLocator>(
    serializer: &EntitySerializer,
    sample: Sample,
    value: &H,
) -> CliResult<InspectOutput> {
    let context = format!("compile {}", sample.name());
    serializer
        .register::<H>()
        .map_err(|err| entity_error(&context, err))?;
    let encoded_size = serializer
        .size_of(value)
        .map_err(|err| entity_error(&context, err))?;
    let table = serializer
        .cache()
        .table::<H>()
        .map_err(|err| entity_error(&context, err.into()))?;

    let members = H::members()
        .iter()
        .zip(table.iter())
        .map(|(member, set)| MemberRow {
            name: set.member().to_string(),
            value_type: set.value_type().short_name(),
            kind: match member.kind() {
                MemberKind::Field => "field",
                MemberKind::Property => "property",
            },
            access: match (set.is_readable(), set.is_writable()) {
                (true, true) => "rw",
                (true, false) => "r",
                (false, true) => "w",
                (false, false) => "-",
            },
            length: match set.length_mode() {
                LengthMode::Implicit => "implicit",
                LengthMode::Prefixed => "prefixed",
            },
            size: set.size_of(value),
            operations: set.bindings().iter().map(ToString::to_string).collect(),
        })
        .collect();

    Ok(InspectOutput {
        sample: sample.name(),
        encoded_size,
        members,
    })
}
