//! Frames of spectra sharing one wavelength axis.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::spectral::bands::nearest_index;
use crate::spectral::continuum::{correct, ContinuumMethod};
use crate::spectral::spectrum::Spectrum;
use crate::spectral::{SpectralError, DEFAULT_TOLERANCE};

/// One observation: an id, its ancillary metadata, and its reflectance
/// values along the frame's shared wavelength axis.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Observation {
    pub id: String,
    pub metadata: BTreeMap<String, String>,
    pub values: Vec<f64>,
}

/// A collection of spectra over a shared wavelength axis.
///
/// Wavelength columns and metadata columns are separable: `spectra`
/// views the numeric block, `meta` the ancillary block.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SpectraFrame {
    wavelengths: Vec<f64>,
    observations: Vec<Observation>,
    tolerance: f64,
}

impl SpectraFrame {
    /// Build a frame, checking row lengths and id uniqueness.
    pub fn new(
        wavelengths: Vec<f64>,
        observations: Vec<Observation>,
    ) -> Result<Self, SpectralError> {
        let mut seen = BTreeSet::new();
        for obs in &observations {
            if obs.values.len() != wavelengths.len() {
                return Err(SpectralError::LengthMismatch {
                    axis: wavelengths.len(),
                    values: obs.values.len(),
                });
            }
            if !seen.insert(obs.id.as_str()) {
                return Err(SpectralError::DuplicateId(obs.id.clone()));
            }
        }
        Ok(Self {
            wavelengths,
            observations,
            tolerance: DEFAULT_TOLERANCE,
        })
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Observation by id.
    pub fn get(&self, id: &str) -> Option<&Observation> {
        self.observations.iter().find(|o| o.id == id)
    }

    /// One observation as a standalone spectrum.
    pub fn spectrum(&self, id: &str) -> Option<Spectrum> {
        let obs = self.get(id)?;
        Spectrum::new(self.wavelengths.clone(), obs.values.clone())
            .ok()
            .map(|s| s.with_tolerance(self.tolerance))
    }

    /// Every metadata key present in any observation.
    pub fn metadata_keys(&self) -> BTreeSet<String> {
        self.observations
            .iter()
            .flat_map(|o| o.metadata.keys().cloned())
            .collect()
    }

    /// Metadata view: (id, metadata) per observation.
    pub fn meta(&self) -> Vec<(&str, &BTreeMap<String, String>)> {
        self.observations
            .iter()
            .map(|o| (o.id.as_str(), &o.metadata))
            .collect()
    }

    /// Numeric view: (id, values) per observation.
    pub fn spectra(&self) -> Vec<(&str, &[f64])> {
        self.observations
            .iter()
            .map(|o| (o.id.as_str(), o.values.as_slice()))
            .collect()
    }

    /// The reflectance column for one wavelength, within tolerance.
    pub fn column(&self, wavelength: f64) -> Option<Vec<f64>> {
        let idx = nearest_index(&self.wavelengths, wavelength)?;
        if (self.wavelengths[idx] - wavelength).abs() > self.tolerance {
            return None;
        }
        Some(self.observations.iter().map(|o| o.values[idx]).collect())
    }

    /// Apply a continuum correction row-wise, producing a new frame.
    ///
    /// Metadata carries over; the axis shrinks to the corrected span
    /// when the method covers only part of it.
    pub fn continuum_correct(&self, method: &ContinuumMethod) -> Result<SpectraFrame, SpectralError> {
        let mut corrected_rows = Vec::with_capacity(self.observations.len());
        let mut span: Option<(usize, usize)> = None;

        for obs in &self.observations {
            let correction = correct(method, &self.wavelengths, &obs.values)?;
            let this_span = (correction.offset, correction.corrected.len());
            match span {
                None => span = Some(this_span),
                // Same axis and method, so the span is identical per row.
                Some(s) => debug_assert_eq!(s, this_span),
            }
            corrected_rows.push(Observation {
                id: obs.id.clone(),
                metadata: obs.metadata.clone(),
                values: correction.corrected,
            });
        }

        let (offset, len) = span.unwrap_or((0, 0));
        let axis = self.wavelengths[offset..offset + len].to_vec();
        Ok(SpectraFrame {
            wavelengths: axis,
            observations: corrected_rows,
            tolerance: self.tolerance,
        })
    }
}
