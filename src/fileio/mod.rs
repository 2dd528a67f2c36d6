//! File IO subsystem.
//!
//! # Data Flow
//! ```text
//! observations file (delimited, UTF-8)
//!     → observations.rs (header split: id | metadata | wavelengths)
//!     → SpectraFrame
//!     → observations.rs (frame → delimited text) on the way out
//!
//! scratch.rs: unique working directories for intermediate products
//! ```
//!
//! # Design Decisions
//! - Header columns that parse as numbers are wavelengths, the rest is
//!   ancillary metadata; `id` leads the row
//! - Malformed rows are errors naming the offending line, never skips

pub mod observations;
pub mod scratch;

pub use observations::{
    format_observations, parse_observations, read_observations, write_observations,
    ObservationsError,
};
pub use scratch::{create_scratch_dir, remove_scratch_dir};
