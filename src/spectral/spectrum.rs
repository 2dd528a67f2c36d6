//! A single tolerance-indexed spectrum.

use serde::{Deserialize, Serialize};

use crate::spectral::bands::nearest_index;
use crate::spectral::continuum::{correct, ContinuumMethod, Correction};
use crate::spectral::{SpectralError, DEFAULT_TOLERANCE};

/// A 1-D reflectance series keyed by wavelength.
///
/// Lookups by wavelength resolve to the nearest sample and succeed only
/// within the configured tolerance, so floating-point axis labels work
/// as indices.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Spectrum {
    wavelengths: Vec<f64>,
    values: Vec<f64>,
    tolerance: f64,
}

impl Spectrum {
    /// Build a spectrum with the default lookup tolerance.
    pub fn new(wavelengths: Vec<f64>, values: Vec<f64>) -> Result<Self, SpectralError> {
        if wavelengths.len() != values.len() {
            return Err(SpectralError::LengthMismatch {
                axis: wavelengths.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            wavelengths,
            values,
            tolerance: DEFAULT_TOLERANCE,
        })
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Reflectance at `wavelength`, if a sample lies within tolerance.
    pub fn value_at(&self, wavelength: f64) -> Option<f64> {
        let idx = nearest_index(&self.wavelengths, wavelength)?;
        if (self.wavelengths[idx] - wavelength).abs() <= self.tolerance {
            Some(self.values[idx])
        } else {
            None
        }
    }

    /// Subset covering the inclusive wavelength range `[lo, hi]`.
    ///
    /// Keeps the tolerance; the axis subset keeps its order.
    pub fn slice(&self, lo: f64, hi: f64) -> Spectrum {
        let mut wavelengths = Vec::new();
        let mut values = Vec::new();
        for (wv, v) in self.wavelengths.iter().zip(&self.values) {
            if (lo..=hi).contains(wv) {
                wavelengths.push(*wv);
                values.push(*v);
            }
        }
        Spectrum {
            wavelengths,
            values,
            tolerance: self.tolerance,
        }
    }

    /// Divide out the continuum, yielding the corrected spectrum and
    /// the continuum it removed.
    pub fn continuum_correct(
        &self,
        method: &ContinuumMethod,
    ) -> Result<(Spectrum, Correction), SpectralError> {
        let correction = correct(method, &self.wavelengths, &self.values)?;
        let axis =
            self.wavelengths[correction.offset..correction.offset + correction.corrected.len()]
                .to_vec();
        let corrected = Spectrum {
            wavelengths: axis,
            values: correction.corrected.clone(),
            tolerance: self.tolerance,
        };
        Ok((corrected, correction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum() -> Spectrum {
        Spectrum::new(vec![512.6, 518.4, 524.7, 530.4], vec![0.11, 0.12, 0.14, 0.13]).unwrap()
    }

    #[test]
    fn test_value_at_within_tolerance() {
        let s = spectrum();
        assert_eq!(s.value_at(512.6), Some(0.11));
        assert_eq!(s.value_at(512.3), Some(0.11));
        // Nearest sample is 0.7 away, beyond the default 0.5.
        assert_eq!(s.value_at(513.3), None);
    }

    #[test]
    fn test_tolerance_is_adjustable() {
        let s = spectrum().with_tolerance(2.0);
        assert_eq!(s.value_at(513.3), Some(0.11));
        let strict = s.with_tolerance(0.0);
        assert_eq!(strict.value_at(518.4), Some(0.12));
        assert_eq!(strict.value_at(518.5), None);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = Spectrum::new(vec![1.0, 2.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, SpectralError::LengthMismatch { .. }));
    }

    #[test]
    fn test_slice_keeps_range_and_tolerance() {
        let s = spectrum().with_tolerance(1.0);
        let sub = s.slice(518.0, 525.0);
        assert_eq!(sub.wavelengths(), &[518.4, 524.7]);
        assert_eq!(sub.values(), &[0.12, 0.14]);
        assert_eq!(sub.tolerance(), 1.0);
    }

    #[test]
    fn test_continuum_correct_aligns_axis() {
        let s = Spectrum::new(vec![1.0, 2.0, 3.0, 4.0], vec![2.0, 2.0, 2.0, 2.0]).unwrap();
        let method = ContinuumMethod::Linear {
            nodes: Some(vec![2.0, 4.0]),
        };
        let (corrected, correction) = s.continuum_correct(&method).unwrap();
        assert_eq!(correction.offset, 1);
        assert_eq!(corrected.wavelengths(), &[2.0, 3.0, 4.0]);
        assert!(corrected.values().iter().all(|v| (*v - 1.0).abs() < 1e-9));
    }
}
