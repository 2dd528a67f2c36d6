//! Spectral analysis subsystem.
//!
//! # Data Flow
//! ```text
//! observations on disk
//!     → fileio (delimited table → SpectraFrame)
//!     → frame.rs (metadata / wavelength column views, row access)
//!     → spectrum.rs (single observation, tolerance-indexed)
//!     → continuum.rs (continuum estimate divided out)
//!     → bands.rs (band lookup, monotonicity, illumination checks)
//! ```
//!
//! # Design Decisions
//! - Wavelength axes are plain `f64` slices; lookups go through a
//!   nearest-index search bounded by a tolerance (default 0.5)
//! - Corrections never divide by a zero continuum; those samples
//!   come back as zero
//! - Frames are immutable; corrections produce new frames

pub mod bands;
pub mod continuum;
pub mod frame;
pub mod spectrum;

pub use bands::Illumination;
pub use continuum::{correct, ContinuumMethod, Correction};
pub use frame::{Observation, SpectraFrame};
pub use spectrum::Spectrum;

use thiserror::Error;

/// Default wavelength lookup tolerance, matching the analysis config.
pub const DEFAULT_TOLERANCE: f64 = 0.5;

/// Errors from spectral data handling and corrections.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpectralError {
    #[error("wavelength axis has {axis} samples but values have {values}")]
    LengthMismatch { axis: usize, values: usize },

    #[error("need at least {needed} samples, got {got}")]
    TooFewSamples { needed: usize, got: usize },

    #[error("continuum nodes need at least 2 wavelengths, got {got}")]
    TooFewNodes { got: usize },

    #[error("continuum nodes out of order: {first} then {second}")]
    UnorderedNodes { first: f64, second: f64 },

    #[error("no samples within the window around anchor {anchor}")]
    EmptyWindow { anchor: f64 },

    #[error("continuum fit is degenerate (coincident fit points)")]
    DegenerateFit,

    #[error("duplicate observation id '{0}'")]
    DuplicateId(String),

    #[error("incidence angle {0} is outside 0..=180")]
    IncidenceOutOfRange(f64),
}
