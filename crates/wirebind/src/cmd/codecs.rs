use serde::Serialize;
use wirebind::codec::{ByteOrder, CodecRegistry};

use crate::cmd::{registry_config, CodecsArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_json, print_table, OutputFormat};

#[derive(Serialize)]
struct OperationRow {
    value_type: String,
    kind: &'static str,
    name: String,
    signature: &'static str,
}

#[derive(Serialize)]
struct CodecsOutput {
    byte_order: &'static str,
    varint: bool,
    count: usize,
    operations: Vec<OperationRow>,
}

pub fn run(args: CodecsArgs, format: OutputFormat) -> CliResult<i32> {
    let config = registry_config(args.big_endian, args.varint);
    let registry = CodecRegistry::with_config(config);

    let operations: Vec<OperationRow> = registry
        .operations()
        .into_iter()
        .map(|op| OperationRow {
            value_type: op.value_type.short_name(),
            kind: op.kind.as_str(),
            name: op.name,
            signature: op.kind.signature(),
        })
        .collect();

    let output = CodecsOutput {
        byte_order: match config.byte_order {
            ByteOrder::Little => "little",
            ByteOrder::Big => "big",
        },
        varint: config.varint,
        count: operations.len(),
        operations,
    };

    match format {
        OutputFormat::Json => print_json(&output),
        OutputFormat::Table => print_table(
            &["TYPE", "KIND", "NAME", "SIGNATURE"],
            output
                .operations
                .iter()
                .map(|op| {
                    vec![
                        op.value_type.clone(),
                        op.kind.to_string(),
                        op.name.clone(),
                        op.signature.to_string(),
                    ]
                })
                .collect(),
        ),
        OutputFormat::Pretty => {
            println!(
                "byte_order={} varint={} operations={}",
                output.byte_order, output.varint, output.count
            );
            for op in &output.operations {
                println!("  {:<10} {:<13} {}", op.value_type, op.kind, op.name);
            }
        }
    }

    Ok(SUCCESS)
}
