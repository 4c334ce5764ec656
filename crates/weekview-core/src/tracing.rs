//! Tracing setup for weekview.
//!
//! Every host of the week-view engine installs its subscriber through
//! [`init_tracing`]. The CLI wants terse lines on stderr, a request-serving
//! host embedding the engine usually wants JSON lines for a collector.
//!
//! ```ignore
//! use weekview_core::tracing::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::cli(args.debug))?;
//! ```
//!
//! `RUST_LOG` always wins over the configured level.

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Errors from installing the global subscriber.
#[derive(Debug, Error)]
pub enum TracingError {
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("invalid log filter directive: {0}")]
    Directive(#[from] tracing_subscriber::filter::ParseError),
}

/// Line format of emitted log records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// Multi-line, human-readable
    #[default]
    Pretty,
    /// One line per record
    Compact,
    /// JSON lines, for hosts that ship logs to a collector
    Json,
}

/// How [`init_tracing`] builds the subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Level for the weekview crates when `RUST_LOG` is unset.
    pub level: Level,
    pub format: TracingOutputFormat,
    /// Print source file and line.
    pub show_location: bool,
    /// Print the module path of each record.
    pub show_target: bool,
    pub show_time: bool,
    /// Emit a record when a span opens and closes.
    pub span_events: bool,
    /// A full filter directive, replacing `level` when set.
    pub directive: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingOutputFormat::Pretty,
            show_location: false,
            show_target: true,
            show_time: true,
            span_events: false,
            directive: None,
        }
    }
}

impl TracingConfig {
    /// The `weekview` binary: warnings only, or everything with `--debug`.
    #[must_use]
    pub fn cli(debug: bool) -> Self {
        if debug {
            Self::cli_debug()
        } else {
            Self {
                level: Level::WARN,
                format: TracingOutputFormat::Compact,
                show_target: false,
                show_time: false,
                ..Self::default()
            }
        }
    }

    /// Compact debug output with source locations.
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            level: Level::DEBUG,
            format: TracingOutputFormat::Compact,
            show_location: true,
            show_time: false,
            ..Self::default()
        }
    }

    /// JSON lines with span open/close records, for a request-serving host.
    #[must_use]
    pub fn service() -> Self {
        Self {
            format: TracingOutputFormat::Json,
            show_location: true,
            span_events: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Replaces the level with a full directive such as `weekview_providers=trace`.
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directive = Some(directive.into());
        self
    }

    fn filter(&self) -> Result<EnvFilter, TracingError> {
        if let Some(ref directive) = self.directive {
            return Ok(EnvFilter::try_new(directive)?);
        }
        Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(self.level))))
    }

    fn layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let span_events = if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let base = fmt::layer()
            .with_writer(std::io::stderr)
            .with_file(self.show_location)
            .with_line_number(self.show_location)
            .with_target(self.show_target)
            .with_span_events(span_events);

        match (self.format, self.show_time) {
            (TracingOutputFormat::Pretty, true) => base.pretty().boxed(),
            (TracingOutputFormat::Pretty, false) => base.pretty().without_time().boxed(),
            (TracingOutputFormat::Compact, true) => base.compact().boxed(),
            (TracingOutputFormat::Compact, false) => base.compact().without_time().boxed(),
            (TracingOutputFormat::Json, true) => base.json().boxed(),
            (TracingOutputFormat::Json, false) => base.json().without_time().boxed(),
        }
    }
}

/// Installs the global subscriber. Call once, before any work is done.
///
/// # Errors
///
/// Fails if a subscriber is already installed or `directive` does not parse.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let filter = config.filter()?;
    let subscriber = tracing_subscriber::registry()
        .with(config.layer())
        .with(filter);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Log targets of the workspace crates.
const WEEKVIEW_TARGETS: &[&str] = &[
    "weekview",
    "weekview_core",
    "weekview_providers",
    "weekview_client",
];

/// `level` for every weekview crate, nothing from dependencies.
fn default_directive(level: Level) -> String {
    WEEKVIEW_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    mod presets {
        use super::*;

        #[test]
        fn quiet_cli() {
            let config = TracingConfig::cli(false);
            assert_eq!(config.level, Level::WARN);
            assert_eq!(config.format, TracingOutputFormat::Compact);
            assert!(!config.show_time);
            assert!(!config.show_target);
        }

        #[test]
        fn debug_cli() {
            let config = TracingConfig::cli(true);
            assert_eq!(config, TracingConfig::cli_debug());
            assert_eq!(config.level, Level::DEBUG);
            assert!(config.show_location);
        }

        #[test]
        fn service_logs_json_spans() {
            let config = TracingConfig::service();
            assert_eq!(config.level, Level::INFO);
            assert_eq!(config.format, TracingOutputFormat::Json);
            assert!(config.span_events);
            assert!(config.show_time);
        }
    }

    mod filters {
        use super::*;

        #[test]
        fn default_directive_names_every_crate() {
            let directive = default_directive(Level::DEBUG);
            for target in WEEKVIEW_TARGETS {
                assert!(directive.contains(&format!("{}=DEBUG", target)));
            }
            assert!(EnvFilter::try_new(&directive).is_ok());
        }

        #[test]
        fn explicit_directive_is_used() {
            let config = TracingConfig::default().with_directive("weekview_providers=trace");
            assert!(config.filter().is_ok());
        }

        #[test]
        fn bad_directive_is_rejected() {
            let config = TracingConfig::default().with_directive("weekview=[");
            assert!(matches!(config.filter(), Err(TracingError::Directive(_))));
        }
    }

    #[test]
    fn builders() {
        let config = TracingConfig::default()
            .with_level(Level::TRACE)
            .with_format(TracingOutputFormat::Json);
        assert_eq!(config.level, Level::TRACE);
        assert_eq!(config.format, TracingOutputFormat::Json);
        assert!(config.directive.is_none());
    }
}
