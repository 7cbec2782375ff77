mod cmd;
mod exit;
mod logging;
mod output;
mod samples;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "wirebind", version, about = "Compiled-accessor serialization CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "info",
        env = "WIREBIND_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::Sample;

    #[test]
    fn parses_roundtrip_subcommand() {
        let cli = Cli::try_parse_from(["wirebind", "roundtrip", "record", "--prefix", "u16"])
            .expect("roundtrip args should parse");
        match cli.command {
            Command::Roundtrip(args) => {
                assert_eq!(args.sample, Sample::Record);
                assert!(!args.big_endian);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_codecs_flags() {
        let cli = Cli::try_parse_from(["wirebind", "codecs", "--varint", "--big-endian"])
            .expect("codecs args should parse");
        assert!(matches!(
            cli.command,
            Command::Codecs(ref args) if args.varint && args.big_endian
        ));
    }

    #[test]
    fn rejects_unknown_sample() {
        let err = Cli::try_parse_from(["wirebind", "inspect", "ledger"])
            .expect_err("unknown sample should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
