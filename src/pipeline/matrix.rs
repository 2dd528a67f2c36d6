//! Build-matrix expansion.
//!
//! # Responsibilities
//! - Expand the (os × runtime-version) axes into concrete cells
//! - Preserve declaration order (os outer, versions inner)
//!
//! # Design Decisions
//! - Expansion is eager; matrices are small by construction
//! - A cell is plain data so reports can carry it verbatim

use serde::{Deserialize, Serialize};

use crate::config::schema::MatrixConfig;

/// One concrete (os, runtime-version) combination.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Cell {
    pub os: String,
    pub runtime: String,
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.os, self.runtime)
    }
}

/// Expand the declared axes into the full cross-product.
pub fn expand(matrix: &MatrixConfig) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(matrix.os.len() * matrix.versions.len());
    for os in &matrix.os {
        for runtime in &matrix.versions {
            cells.push(Cell {
                os: os.clone(),
                runtime: runtime.clone(),
            });
        }
    }
    cells
}
