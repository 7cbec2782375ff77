use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Crates whose events follow `--log-level`; everything else stays at `warn`.
const CRATES: [&str; 4] = [
    "wirebind",
    "wirebind_codec",
    "wirebind_accessor",
    "wirebind_entity",
];

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Filter directives applying `level` to the wirebind crates only.
///
/// Compile and cache events come from `wirebind_accessor` at `debug` and
/// `trace`, serializer events from `wirebind_entity`.
pub fn directives(level: LogLevel) -> String {
    let level = level.as_directive();
    let mut out = String::from("warn");
    for name in CRATES {
        out.push(',');
        out.push_str(name);
        out.push('=');
        out.push_str(level);
    }
    out
}

/// Install the stderr subscriber. `RUST_LOG` overrides `--log-level` when set.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(level)));

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(matches!(level, LogLevel::Debug | LogLevel::Trace));

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_scope_level_to_wirebind_crates() {
        assert_eq!(
            directives(LogLevel::Debug),
            "warn,wirebind=debug,wirebind_codec=debug,wirebind_accessor=debug,wirebind_entity=debug"
        );
    }

    #[test]
    fn directives_parse_as_env_filter() {
        for level in [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ] {
            let filter = EnvFilter::try_new(directives(level)).unwrap();
            let rendered = filter.to_string();
            assert!(
                rendered.contains(&format!("wirebind_accessor={}", level.as_directive())),
                "{rendered}"
            );
        }
    }
}
