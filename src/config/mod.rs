//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ToolkitConfig (validated, immutable)
//!     → shared with logging setup and the pipeline runner
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; it is parsed exactly once at startup
//! - All fields have defaults so an empty file still loads
//! - Validation separates syntactic (serde) from semantic checks
//! - Validation reports every error, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::AnalysisConfig;
pub use schema::LoggingConfig;
pub use schema::PipelineConfig;
pub use schema::ToolkitConfig;
