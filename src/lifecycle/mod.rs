//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Validate → Install logging → Run pipeline / command
//!
//! Cancellation (shutdown.rs):
//!     Ctrl-C → Cancellation::trigger
//!     → running step is killed, remaining cells reported as skipped
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Cancellation is cooperative: the runner observes it between and
//!   during steps, never mid-report

pub mod shutdown;

pub use shutdown::Cancellation;
