//! Tracing subscriber initialization with structured logging.
//!
//! # Usage
//!
//! ```no_run
//! use chatlog_types::config::LogFormat;
//!
//! // Human-readable lines, `info` unless RUST_LOG says otherwise
//! chatlog_observe::tracing_setup::init_tracing(LogFormat::Pretty, "info").unwrap();
//! ```

use chatlog_types::config::LogFormat;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the global tracing subscriber.
///
/// - Installs a `fmt` layer with target visibility and span close timing,
///   rendered as human-readable lines or as one JSON object per event.
/// - Respects `RUST_LOG`; falls back to `default_filter` when it is unset or
///   invalid.
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set.
pub fn init_tracing(
    format: LogFormat,
    default_filter: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))?;

    match format {
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_span_events(FmtSpan::CLOSE);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_span_events(FmtSpan::CLOSE);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}

/// Map the CLI's `-v` count and `--quiet` flag to a default filter directive.
pub fn default_filter(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        assert_eq!(default_filter(0, false), "info");
        assert_eq!(default_filter(1, false), "debug");
        assert_eq!(default_filter(5, false), "trace");
        assert_eq!(default_filter(3, true), "error");
    }

    #[test]
    fn test_init_twice_is_an_error() {
        // The first call may fail if another test installed a subscriber; the
        // second call must fail either way.
        let _ = init_tracing(LogFormat::Json, "warn");
        assert!(init_tracing(LogFormat::Pretty, "warn").is_err());
    }
}
