//! Logging subsystem.
//!
//! # Data Flow
//! ```text
//! LoggingConfig (parsed once at startup)
//!     → setup.rs (formatter/handler/logger tree → subscriber layers)
//!     → rotate.rs (size-capped rotating file sink)
//!
//! Records:
//!     named logger claims by target prefix
//!     → bound handlers, plus root handlers when propagation is on
//! ```
//!
//! # Design Decisions
//! - One fmt layer per handler so each sink keeps its own level and format
//! - Size-based rotation with bounded backups; no external log daemon
//! - Configuration is declarative; no runtime mutation of the tree

pub mod rotate;
pub mod setup;

pub use rotate::RotatingWriter;
pub use setup::{build_layers, init_logging, init_test_logging, LoggingError};
