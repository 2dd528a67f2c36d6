//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the toolkit.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the toolkit.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ToolkitConfig {
    /// Logging declaration (formatters, handlers, loggers).
    pub logging: LoggingConfig,

    /// Pipeline matrix and step definitions.
    pub pipeline: PipelineConfig,

    /// Spectral analysis defaults.
    pub analysis: AnalysisConfig,
}

/// Logging configuration: a static formatter → handler → logger tree.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Named output formats.
    pub formatters: Vec<FormatterConfig>,

    /// Named sinks (console stream, rotating file).
    pub handlers: Vec<HandlerConfig>,

    /// Named loggers bound to one or more handlers.
    pub loggers: Vec<LoggerConfig>,

    /// The root logger; records not claimed by a named logger land here.
    pub root: RootLoggerConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            formatters: vec![FormatterConfig::default()],
            handlers: vec![
                HandlerConfig {
                    name: "console".to_string(),
                    level: LogLevel::Debug,
                    formatter: "standard".to_string(),
                    sink: HandlerSink::Console {
                        stream: ConsoleStream::Stdout,
                    },
                },
                HandlerConfig {
                    name: "file".to_string(),
                    level: LogLevel::Info,
                    formatter: "standard".to_string(),
                    sink: HandlerSink::File {
                        path: "info.log".to_string(),
                        max_bytes: default_max_bytes(),
                        backup_count: default_backup_count(),
                    },
                },
            ],
            loggers: Vec::new(),
            root: RootLoggerConfig::default(),
        }
    }
}

impl LoggingConfig {
    /// Look up a handler by name.
    pub fn handler(&self, name: &str) -> Option<&HandlerConfig> {
        self.handlers.iter().find(|h| h.name == name)
    }

    /// Look up a formatter by name.
    pub fn formatter(&self, name: &str) -> Option<&FormatterConfig> {
        self.formatters.iter().find(|f| f.name == name)
    }
}

/// A named output format.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// Formatter identifier referenced by handlers.
    pub name: String,

    /// Rendering style.
    pub style: FormatterStyle,

    /// Include the emitting module path in each record.
    pub show_target: bool,

    /// Include a timestamp in each record.
    pub show_time: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            name: "standard".to_string(),
            style: FormatterStyle::Compact,
            show_target: true,
            show_time: true,
        }
    }
}

/// Rendering style for a formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatterStyle {
    /// Multi-line human-readable output.
    Full,
    /// Single-line output.
    Compact,
    /// Structured JSON, one object per record.
    Json,
}

/// A named sink with its own severity threshold.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HandlerConfig {
    /// Handler identifier referenced by loggers.
    pub name: String,

    /// Minimum severity this handler emits.
    #[serde(default = "default_handler_level")]
    pub level: LogLevel,

    /// Formatter name to render records with.
    #[serde(default = "default_formatter_name")]
    pub formatter: String,

    /// Where records go.
    #[serde(flatten)]
    pub sink: HandlerSink,
}

fn default_handler_level() -> LogLevel {
    LogLevel::Info
}

fn default_formatter_name() -> String {
    "standard".to_string()
}

/// Sink kind and its kind-specific settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HandlerSink {
    /// Write to a process stream.
    Console {
        #[serde(default)]
        stream: ConsoleStream,
    },

    /// Write to a size-capped rotating file, UTF-8 encoded.
    File {
        path: String,

        /// Rotate once the active file would exceed this size.
        #[serde(default = "default_max_bytes")]
        max_bytes: u64,

        /// Number of rolled-over backups to retain.
        #[serde(default = "default_backup_count")]
        backup_count: u32,
    },
}

fn default_max_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_backup_count() -> u32 {
    10
}

/// Process stream for a console handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleStream {
    #[default]
    Stdout,
    Stderr,
}

/// A named logger bound to specific handlers.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggerConfig {
    /// Module-path prefix this logger claims (e.g. "spectool::pipeline").
    pub name: String,

    /// Minimum severity for this logger.
    #[serde(default = "default_handler_level")]
    pub level: LogLevel,

    /// Handlers this logger emits to.
    pub handlers: Vec<String>,

    /// When false, records claimed by this logger do not also reach
    /// the root logger's handlers.
    #[serde(default = "default_propagate")]
    pub propagate: bool,
}

fn default_propagate() -> bool {
    true
}

/// The root logger configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RootLoggerConfig {
    /// Minimum severity for unclaimed records.
    pub level: LogLevel,

    /// Handlers the root logger fans out to.
    pub handlers: Vec<String>,
}

impl Default for RootLoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Debug,
            handlers: vec!["console".to_string(), "file".to_string()],
        }
    }
}

/// Severity levels, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert to a tracing level filter.
    pub fn to_filter(self) -> tracing_subscriber::filter::LevelFilter {
        use tracing_subscriber::filter::LevelFilter;
        match self {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Pipeline configuration: the build matrix and its step lists.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// The (os × runtime-version) matrix.
    pub matrix: MatrixConfig,

    /// Static environment exported to every step.
    pub env: BTreeMap<String, String>,

    /// Environment variable name carrying the cell's OS.
    pub os_var: String,

    /// Environment variable name carrying the cell's runtime version.
    pub runtime_var: String,

    /// Shell used to run each command (invoked as `<shell> -c <command>`).
    pub shell: String,

    /// Dependency installation commands, run first.
    pub install: Vec<String>,

    /// Test commands, run after a fully green install list.
    pub test: Vec<String>,

    /// Publish step, gated on green tests and a credential.
    pub publish: PublishConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            matrix: MatrixConfig::default(),
            env: BTreeMap::new(),
            os_var: "PIPELINE_OS".to_string(),
            runtime_var: "PIPELINE_RUNTIME".to_string(),
            shell: "sh".to_string(),
            install: Vec::new(),
            test: Vec::new(),
            publish: PublishConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// True when any step list is declared.
    pub fn has_steps(&self) -> bool {
        !self.install.is_empty() || !self.test.is_empty() || !self.publish.commands.is_empty()
    }
}

/// Matrix axes. Cells are the cross-product in declaration order.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// Operating systems, outer axis.
    pub os: Vec<String>,

    /// Runtime versions, inner axis.
    pub versions: Vec<String>,
}

/// Publish step configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Commands to run when publishing is unlocked.
    pub commands: Vec<String>,

    /// Environment variable that must be present and non-empty
    /// for publishing to run.
    pub token_var: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            token_var: "PUBLISH_TOKEN".to_string(),
        }
    }
}

/// Spectral analysis defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Wavelength lookup tolerance.
    pub tolerance: f64,

    /// Field delimiter for observations files.
    pub delimiter: char,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.5,
            delimiter: ',',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logging_tree() {
        let config = LoggingConfig::default();
        // Console at debug, rotating file at info, root fans out to both.
        assert_eq!(config.root.handlers.len(), 2);
        let console = config.handler("console").unwrap();
        assert_eq!(console.level, LogLevel::Debug);
        let file = config.handler("file").unwrap();
        assert_eq!(file.level, LogLevel::Info);
        match &file.sink {
            HandlerSink::File {
                path,
                max_bytes,
                backup_count,
            } => {
                assert_eq!(path, "info.log");
                assert_eq!(*max_bytes, 10 * 1024 * 1024);
                assert_eq!(*backup_count, 10);
            }
            other => panic!("expected file sink, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_config_loads() {
        let config: ToolkitConfig = toml::from_str("").unwrap();
        assert!(config.pipeline.matrix.os.is_empty());
        assert_eq!(config.analysis.tolerance, 0.5);
    }

    #[test]
    fn test_handler_sink_tagging() {
        let toml_src = r#"
            [[logging.handlers]]
            name = "errors"
            kind = "file"
            path = "errors.log"
            level = "error"
        "#;
        let config: ToolkitConfig = toml::from_str(toml_src).unwrap();
        let handler = config.logging.handler("errors").unwrap();
        assert_eq!(handler.level, LogLevel::Error);
        match &handler.sink {
            HandlerSink::File { max_bytes, .. } => assert_eq!(*max_bytes, 10 * 1024 * 1024),
            other => panic!("expected file sink, got {:?}", other),
        }
    }

    #[test]
    fn test_pipeline_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.os_var, "PIPELINE_OS");
        assert_eq!(config.runtime_var, "PIPELINE_RUNTIME");
        assert_eq!(config.publish.token_var, "PUBLISH_TOKEN");
        assert!(!config.has_steps());
    }
}
