//! Logging subsystem initialization.
//!
//! # Data Flow
//! ```text
//! LoggingConfig (formatters, handlers, loggers, root)
//!     → one fmt layer per handler, with its own writer and format
//!     → per-layer filter = handler level + logger→handler bindings
//!     → tracing_subscriber registry, installed globally
//! ```
//!
//! # Design Decisions
//! - Each handler is an independent layer; a record can reach several
//! - Logger names map to target prefixes; the longest declared prefix
//!   claims a record
//! - propagate = false stops a claimed record from reaching handlers it
//!   is not explicitly bound to

use std::io;

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::filter::{filter_fn, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::config::schema::{
    ConsoleStream, FormatterConfig, FormatterStyle, HandlerSink, LoggingConfig,
};
use crate::logging::rotate::RotatingWriter;

/// Errors raised while building the logging tree.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file for handler '{name}': {source}")]
    OpenHandler {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("handler '{handler}' references unknown formatter '{formatter}'")]
    UnknownFormatter { handler: String, formatter: String },

    #[error("failed to install global subscriber: {0}")]
    Init(#[from] TryInitError),
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Build and globally install the subscriber described by `config`.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let layers = build_layers(config)?;
    tracing_subscriber::registry().with(layers).try_init()?;
    Ok(())
}

/// Build one filtered fmt layer per declared handler.
pub fn build_layers(config: &LoggingConfig) -> Result<Vec<BoxedLayer>, LoggingError> {
    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(config.handlers.len());

    for handler in &config.handlers {
        let formatter =
            config
                .formatter(&handler.formatter)
                .ok_or_else(|| LoggingError::UnknownFormatter {
                    handler: handler.name.clone(),
                    formatter: handler.formatter.clone(),
                })?;

        let layer: BoxedLayer = match &handler.sink {
            HandlerSink::Console { stream } => match stream {
                ConsoleStream::Stdout => {
                    fmt_layer(io::stdout as fn() -> io::Stdout, formatter, true)
                }
                ConsoleStream::Stderr => {
                    fmt_layer(io::stderr as fn() -> io::Stderr, formatter, true)
                }
            },
            HandlerSink::File {
                path,
                max_bytes,
                backup_count,
            } => {
                let writer = RotatingWriter::open(path, *max_bytes, *backup_count).map_err(
                    |source| LoggingError::OpenHandler {
                        name: handler.name.clone(),
                        source,
                    },
                )?;
                fmt_layer(writer, formatter, false)
            }
        };

        let bindings = HandlerBindings::from_config(config, &handler.name);
        let filtered = layer.with_filter(filter_fn(move |metadata| {
            bindings.enabled(metadata.target(), *metadata.level())
        }));
        layers.push(Box::new(filtered) as BoxedLayer);
    }

    Ok(layers)
}

fn fmt_layer<W>(writer: W, formatter: &FormatterConfig, ansi: bool) -> BoxedLayer
where
    W: for<'a> tracing_subscriber::fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    let base = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(formatter.show_target)
        .with_ansi(ansi);

    match (formatter.style, formatter.show_time) {
        (FormatterStyle::Full, true) => Box::new(base),
        (FormatterStyle::Full, false) => Box::new(base.without_time()),
        (FormatterStyle::Compact, true) => Box::new(base.compact()),
        (FormatterStyle::Compact, false) => Box::new(base.compact().without_time()),
        (FormatterStyle::Json, true) => Box::new(base.json()),
        (FormatterStyle::Json, false) => Box::new(base.json().without_time()),
    }
}

/// Resolved routing for a single handler: which records it accepts.
#[derive(Debug)]
struct HandlerBindings {
    handler_level: LevelFilter,
    root_bound: bool,
    root_level: LevelFilter,
    loggers: Vec<LoggerBinding>,
}

#[derive(Debug)]
struct LoggerBinding {
    prefix: String,
    level: LevelFilter,
    bound: bool,
    propagate: bool,
}

impl HandlerBindings {
    fn from_config(config: &LoggingConfig, handler_name: &str) -> Self {
        let handler_level = config
            .handler(handler_name)
            .map(|h| h.level.to_filter())
            .unwrap_or(LevelFilter::OFF);

        let mut loggers: Vec<LoggerBinding> = config
            .loggers
            .iter()
            .map(|logger| LoggerBinding {
                prefix: logger.name.clone(),
                level: logger.level.to_filter(),
                bound: logger.handlers.iter().any(|h| h == handler_name),
                propagate: logger.propagate,
            })
            .collect();
        // Longest prefix first so the most specific logger claims a record.
        loggers.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));

        Self {
            handler_level,
            root_bound: config.root.handlers.iter().any(|h| h == handler_name),
            root_level: config.root.level.to_filter(),
            loggers,
        }
    }

    fn enabled(&self, target: &str, level: Level) -> bool {
        let level = LevelFilter::from_level(level);
        if level > self.handler_level {
            return false;
        }

        let claimed = self
            .loggers
            .iter()
            .find(|l| target == l.prefix || target.starts_with(&format!("{}::", l.prefix)));

        match claimed {
            Some(logger) => {
                if level > logger.level {
                    return false;
                }
                if logger.bound {
                    return true;
                }
                logger.propagate && self.root_bound && level <= self.root_level
            }
            None => self.root_bound && level <= self.root_level,
        }
    }
}

/// Console-only logging for tests, honoring `RUST_LOG`.
///
/// Call at the top of a test; repeated calls are no-ops.
pub fn init_test_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init();
    });
}
