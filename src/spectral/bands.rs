//! Band lookup and axis checks.

use crate::spectral::SpectralError;

/// Index of the element nearest to `target`. Ties resolve to the first.
pub fn nearest_index(values: &[f64], target: f64) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .min_by(|a, b| (a.1 - target).abs().total_cmp(&(b.1 - target).abs()))
        .map(|(i, _)| i)
}

/// Map wavelength values onto band indices, preserving input order.
///
/// Indices are 0-based into the axis. Instrument labels conventionally
/// number bands from 1, so add one when emitting band numbers for them.
/// An empty axis yields an empty mapping.
pub fn band_numbers(wavelengths: &[f64], targets: &[f64]) -> Vec<usize> {
    targets
        .iter()
        .filter_map(|t| nearest_index(wavelengths, *t))
        .collect()
}

/// True when `values` is strictly monotonically increasing.
pub fn is_monotonic(values: &[f64]) -> bool {
    piecewise_monotonic(values).iter().all(|m| *m)
}

/// Elementwise monotonicity: the first element is vacuously true, each
/// following element is compared against its predecessor.
pub fn piecewise_monotonic(values: &[f64]) -> Vec<bool> {
    let mut result = Vec::with_capacity(values.len());
    if values.is_empty() {
        return result;
    }
    result.push(true);
    result.extend(values.windows(2).map(|pair| pair[0] < pair[1]));
    result
}

/// True when every required band is present in the image's band set.
pub fn has_bands(bands: &[usize], required: &[usize]) -> bool {
    required.iter().all(|r| bands.contains(r))
}

/// Illumination regime derived from an incidence angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Illumination {
    Day,
    Night,
}

impl Illumination {
    /// Classify an incidence angle in degrees.
    ///
    /// Angles in `[0, 90)` are day, `[90, 180]` are night; anything
    /// else is out of range.
    pub fn from_incidence(incidence: f64) -> Result<Self, SpectralError> {
        if (95.0..=180.0).contains(&incidence) {
            Ok(Illumination::Night)
        } else if (90.0..95.0).contains(&incidence) {
            Ok(Illumination::Night)
        } else if (85.0..90.0).contains(&incidence) {
            Ok(Illumination::Day)
        } else if (0.0..85.0).contains(&incidence) {
            Ok(Illumination::Day)
        } else {
            Err(SpectralError::IncidenceOutOfRange(incidence))
        }
    }
}
