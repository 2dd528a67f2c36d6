//! Pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! PipelineConfig
//!     → matrix.rs (axes → cross-product of cells)
//!     → runner.rs (per cell: install → test → gated publish)
//!     → report.rs (step records → cell outcomes → run summary)
//! ```
//!
//! # Design Decisions
//! - The failure policy is the platform default and nothing more: a
//!   non-zero exit aborts the remaining steps of that cell
//! - Publishing runs at most once per cell, only after green tests,
//!   only with a credential present

pub mod matrix;
pub mod report;
pub mod runner;

pub use matrix::{expand, Cell};
pub use report::{CellOutcome, CellReport, PublishStatus, RunSummary};
pub use runner::{PipelineRunner, RunnerError};
