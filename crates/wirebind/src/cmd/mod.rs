use clap::{Args, Subcommand, ValueEnum};
use wirebind::codec::{ByteOrder, RegistryConfig};
use wirebind::entity::LengthPrefix;

use crate::exit::CliResult;
use crate::output::OutputFormat;
use crate::samples::Sample;

pub mod codecs;
pub mod inspect;
pub mod roundtrip;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show version information.
    Version(VersionArgs),
    /// List the operations of a codec registry.
    Codecs(CodecsArgs),
    /// Compile a sample type and show its member accessors.
    Inspect(InspectArgs),
    /// Serialize a sample instance, decode it again and verify.
    Roundtrip(RoundtripArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Version(args) => version::run(args),
        Command::Codecs(args) => codecs::run(args, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Roundtrip(args) => roundtrip::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug)]
pub struct CodecsArgs {
    /// Include LEB128 variable-length codecs.
    #[arg(long)]
    pub varint: bool,
    /// Build fixed-width codecs most significant byte first.
    #[arg(long)]
    pub big_endian: bool,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Sample type to compile.
    #[arg(value_enum)]
    pub sample: Sample,
    /// Build fixed-width codecs most significant byte first.
    #[arg(long)]
    pub big_endian: bool,
}

#[derive(Args, Debug)]
pub struct RoundtripArgs {
    /// Sample type to serialize.
    #[arg(value_enum)]
    pub sample: Sample,
    /// Build fixed-width codecs most significant byte first.
    #[arg(long)]
    pub big_endian: bool,
    /// Length prefix width for prefixed members.
    #[arg(long, value_enum, default_value = "u32")]
    pub prefix: PrefixArg,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PrefixArg {
    U16,
    U32,
}

impl From<PrefixArg> for LengthPrefix {
    fn from(arg: PrefixArg) -> Self {
        match arg {
            PrefixArg::U16 => LengthPrefix::U16,
            PrefixArg::U32 => LengthPrefix::U32,
        }
    }
}

pub fn registry_config(big_endian: bool, varint: bool) -> RegistryConfig {
    RegistryConfig {
        byte_order: if big_endian {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        },
        varint,
    }
}
