//! Spectral analysis toolkit for planetary point-spectral data.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌────────────────────────────────────────────────┐
//!                 │                   SPECTOOL                     │
//!                 │                                                │
//!  config file    │  ┌─────────┐     ┌──────────┐    ┌──────────┐  │
//!  ───────────────┼─▶│ config  │────▶│ logging  │    │ pipeline │  │
//!                 │  │ loader  │     │ handlers │    │  runner  │  │
//!                 │  └─────────┘     └──────────┘    └────┬─────┘  │
//!                 │                                       │        │
//!  observations   │  ┌─────────┐     ┌──────────┐         ▼        │
//!  ───────────────┼─▶│ fileio  │────▶│ spectral │    cell reports  │
//!                 │  │         │     │ frames + │    run summary   │
//!                 │  └─────────┘     │ continuum│                  │
//!                 │                  └──────────┘                  │
//!                 └────────────────────────────────────────────────┘
//! ```
//!
//! The pipeline runner reproduces the build-matrix contract: one
//! sequential script per (os, runtime) cell, stop on first failure,
//! publish gated on green tests plus a credential. The spectral side
//! carries the analysis core: tolerance-indexed frames and continuum
//! corrections.

// Core subsystems
pub mod config;
pub mod fileio;
pub mod spectral;

// Orchestration
pub mod pipeline;

// Cross-cutting concerns
pub mod lifecycle;
pub mod logging;
pub mod utils;

pub use config::ToolkitConfig;
pub use lifecycle::Cancellation;
pub use pipeline::{PipelineRunner, RunSummary};
pub use spectral::{SpectraFrame, Spectrum};
