use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Targets match by prefix, so this also covers `lazyenv_bind` and
/// `lazyenv_schema`. Dependencies such as `jsonschema` stay quiet.
const LOG_TARGET: &str = "lazyenv";

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

fn targets(level: LogLevel) -> Targets {
    Targets::new().with_target(LOG_TARGET, LevelFilter::from(level))
}

/// Install a stderr subscriber for lazyenv's own events. Stdout is reserved
/// for command output, and events never carry variable values.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false);
    let registry = tracing_subscriber::registry().with(targets(level));

    let _ = match format {
        LogFormat::Text => registry.with(layer).try_init(),
        LogFormat::Json => registry.with(layer.json()).try_init(),
    };
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::*;

    #[test]
    fn only_lazyenv_crates_are_logged() {
        let targets = targets(LogLevel::Debug);

        assert!(targets.would_enable("lazyenv_bind::target", &Level::DEBUG));
        assert!(targets.would_enable("lazyenv_schema::json", &Level::INFO));
        assert!(!targets.would_enable("lazyenv_bind::field", &Level::TRACE));
        assert!(!targets.would_enable("jsonschema::validator", &Level::ERROR));
    }

    #[test]
    fn off_disables_everything() {
        assert!(!targets(LogLevel::Off).would_enable("lazyenv", &Level::ERROR));
    }
}
