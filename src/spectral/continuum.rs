//! Continuum correction algorithms.
//!
//! # Responsibilities
//! - Estimate the continuum (background slope) of a reflectance spectrum
//! - Divide it out, leaving the absorption features
//!
//! # Design Decisions
//! - Three estimators: piecewise linear between nodes, least-squares
//!   regression over the full range, and a windowed quadratic through
//!   local maxima (Horgan)
//! - A zero continuum sample yields a zero corrected sample instead of
//!   propagating infinities
//! - Linear correction reports its `offset` because nodes may cover only
//!   part of the wavelength axis

use crate::spectral::bands::nearest_index;
use crate::spectral::SpectralError;

/// A continuum estimate and the values divided by it.
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    /// Index into the wavelength axis where this correction starts.
    pub offset: usize,
    /// Reflectance divided by the continuum.
    pub corrected: Vec<f64>,
    /// The estimated continuum itself.
    pub continuum: Vec<f64>,
}

/// Continuum estimator selection, for callers that take it as data.
#[derive(Debug, Clone, PartialEq)]
pub enum ContinuumMethod {
    /// Piecewise linear between wavelength nodes. `None` means the
    /// endpoints of the axis.
    Linear { nodes: Option<Vec<f64>> },
    /// Least-squares line over the whole axis.
    Regression,
    /// Quadratic through windowed local maxima around three anchors.
    Horgan { anchors: [f64; 3], window: f64 },
}

/// Apply the selected estimator.
pub fn correct(
    method: &ContinuumMethod,
    wavelengths: &[f64],
    values: &[f64],
) -> Result<Correction, SpectralError> {
    match method {
        ContinuumMethod::Linear { nodes } => match nodes {
            Some(nodes) => linear_correction(wavelengths, values, nodes),
            None => {
                if wavelengths.len() < 2 {
                    return Err(SpectralError::TooFewSamples {
                        needed: 2,
                        got: wavelengths.len(),
                    });
                }
                let span = [wavelengths[0], wavelengths[wavelengths.len() - 1]];
                linear_correction(wavelengths, values, &span)
            }
        },
        ContinuumMethod::Regression => regression_correction(wavelengths, values),
        ContinuumMethod::Horgan { anchors, window } => {
            horgan_correction(wavelengths, values, *anchors, *window)
        }
    }
}

fn check_lengths(wavelengths: &[f64], values: &[f64]) -> Result<(), SpectralError> {
    if wavelengths.len() != values.len() {
        return Err(SpectralError::LengthMismatch {
            axis: wavelengths.len(),
            values: values.len(),
        });
    }
    if wavelengths.len() < 2 {
        return Err(SpectralError::TooFewSamples {
            needed: 2,
            got: wavelengths.len(),
        });
    }
    Ok(())
}

fn divide(value: f64, continuum: f64) -> f64 {
    if continuum == 0.0 {
        0.0
    } else {
        value / continuum
    }
}

/// Piecewise linear continuum between consecutive `nodes`.
///
/// Each node snaps to the nearest wavelength sample; the continuum over
/// a node pair is the line through the reflectance at its endpoints. A
/// pair of coincident nodes contributes a zero-filled segment.
pub fn linear_correction(
    wavelengths: &[f64],
    values: &[f64],
    nodes: &[f64],
) -> Result<Correction, SpectralError> {
    check_lengths(wavelengths, values)?;
    if nodes.len() < 2 {
        return Err(SpectralError::TooFewNodes { got: nodes.len() });
    }

    let mut node_idx = Vec::with_capacity(nodes.len());
    for node in nodes {
        let idx = nearest_index(wavelengths, *node).ok_or(SpectralError::TooFewSamples {
            needed: 2,
            got: wavelengths.len(),
        })?;
        node_idx.push(idx);
    }

    // The whole snapped sequence must be non-decreasing before any
    // segment is filled; the buffers are sized by first and last node.
    for (pair, idx) in nodes.windows(2).zip(node_idx.windows(2)) {
        if idx[1] < idx[0] {
            return Err(SpectralError::UnorderedNodes {
                first: pair[0],
                second: pair[1],
            });
        }
    }

    let offset = node_idx[0];
    let end = node_idx[node_idx.len() - 1];
    let len = end.saturating_sub(offset) + 1;
    let mut corrected = vec![0.0; len];
    let mut continuum = vec![0.0; len];

    for idx in node_idx.windows(2) {
        let (wv1, wv2) = (wavelengths[idx[0]], wavelengths[idx[1]]);
        let (i1, i2) = (idx[0], idx[1]);
        if wv1 == wv2 {
            // Coincident nodes: zero-filled segment.
            continue;
        }
        let y1 = values[i1];
        let y2 = values[i2];
        let m = (y2 - y1) / (wv2 - wv1);
        let b = y1 - m * wv1;
        for i in i1..=i2 {
            let y = m * wavelengths[i] + b;
            continuum[i - offset] = y;
            corrected[i - offset] = divide(values[i], y);
        }
    }

    Ok(Correction {
        offset,
        corrected,
        continuum,
    })
}

/// Least-squares line over the whole axis, divided out.
pub fn regression_correction(
    wavelengths: &[f64],
    values: &[f64],
) -> Result<Correction, SpectralError> {
    check_lengths(wavelengths, values)?;

    let n = wavelengths.len() as f64;
    let mean_x = wavelengths.iter().sum::<f64>() / n;
    let mean_y = values.iter().sum::<f64>() / n;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in wavelengths.iter().zip(values) {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }
    if sxx == 0.0 {
        return Err(SpectralError::DegenerateFit);
    }
    let m = sxy / sxx;
    let b = mean_y - m * mean_x;

    let continuum: Vec<f64> = wavelengths.iter().map(|x| m * x + b).collect();
    let corrected = values
        .iter()
        .zip(&continuum)
        .map(|(v, c)| divide(*v, *c))
        .collect();
    Ok(Correction {
        offset: 0,
        corrected,
        continuum,
    })
}

/// Horgan correction: quadratic continuum through the local reflectance
/// maxima inside windows around three anchor wavelengths.
pub fn horgan_correction(
    wavelengths: &[f64],
    values: &[f64],
    anchors: [f64; 3],
    window: f64,
) -> Result<Correction, SpectralError> {
    check_lengths(wavelengths, values)?;

    let mut xs = [0.0; 3];
    let mut ys = [0.0; 3];
    for (k, anchor) in anchors.iter().enumerate() {
        let peak = window_peak(wavelengths, values, *anchor, window)
            .ok_or(SpectralError::EmptyWindow { anchor: *anchor })?;
        xs[k] = wavelengths[peak];
        ys[k] = values[peak];
    }

    let coeffs = quadratic_through(xs, ys)?;
    let continuum: Vec<f64> = wavelengths
        .iter()
        .map(|x| coeffs[0] * x * x + coeffs[1] * x + coeffs[2])
        .collect();
    let corrected = values
        .iter()
        .zip(&continuum)
        .map(|(v, c)| divide(*v, *c))
        .collect();
    Ok(Correction {
        offset: 0,
        corrected,
        continuum,
    })
}

/// Index of the maximum reflectance inside `|wavelength - anchor| < window`.
fn window_peak(wavelengths: &[f64], values: &[f64], anchor: f64, window: f64) -> Option<usize> {
    wavelengths
        .iter()
        .enumerate()
        .filter(|(_, wv)| (**wv - anchor).abs() < window)
        .max_by(|a, b| values[a.0].total_cmp(&values[b.0]))
        .map(|(i, _)| i)
}

/// Coefficients (a, b, c) of the parabola through three points,
/// by Cramer's rule on the Vandermonde system.
fn quadratic_through(xs: [f64; 3], ys: [f64; 3]) -> Result<[f64; 3], SpectralError> {
    let [x0, x1, x2] = xs;
    let det = (x0 - x1) * (x0 - x2) * (x1 - x2);
    if det == 0.0 {
        return Err(SpectralError::DegenerateFit);
    }
    let a = (ys[0] * (x1 - x2) - ys[1] * (x0 - x2) + ys[2] * (x0 - x1)) / det;
    let b = (-ys[0] * (x1 * x1 - x2 * x2) + ys[1] * (x0 * x0 - x2 * x2)
        - ys[2] * (x0 * x0 - x1 * x1))
        / det;
    let c = (ys[0] * x1 * x2 * (x1 - x2) - ys[1] * x0 * x2 * (x0 - x2)
        + ys[2] * x0 * x1 * (x0 - x1))
        / det;
    Ok([a, b, c])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_linear_flat_spectrum_corrects_to_one() {
        let wv = vec![1.0, 2.0, 3.0, 4.0];
        let values = vec![5.0, 5.0, 5.0, 5.0];
        let result = linear_correction(&wv, &values, &[1.0, 4.0]).unwrap();
        assert_eq!(result.offset, 0);
        assert!(result.corrected.iter().all(|v| close(*v, 1.0)));
        assert!(result.continuum.iter().all(|v| close(*v, 5.0)));
    }

    #[test]
    fn test_linear_removes_slope() {
        // A pure slope is its own continuum.
        let wv = vec![0.0, 1.0, 2.0, 3.0];
        let values = vec![1.0, 2.0, 3.0, 4.0];
        let result = linear_correction(&wv, &values, &[0.0, 3.0]).unwrap();
        assert!(result.corrected.iter().all(|v| close(*v, 1.0)));
    }

    #[test]
    fn test_linear_partial_span_reports_offset() {
        let wv = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let values = vec![2.0, 2.0, 2.0, 2.0, 2.0];
        let result = linear_correction(&wv, &values, &[2.0, 4.0]).unwrap();
        assert_eq!(result.offset, 1);
        assert_eq!(result.corrected.len(), 3);
    }

    #[test]
    fn test_linear_coincident_nodes_zero_fill() {
        let wv = vec![1.0, 2.0, 3.0];
        let values = vec![1.0, 1.0, 1.0];
        let result = linear_correction(&wv, &values, &[2.0, 2.0]).unwrap();
        assert_eq!(result.corrected, vec![0.0]);
        assert_eq!(result.continuum, vec![0.0]);
    }

    #[test]
    fn test_linear_unordered_nodes_rejected() {
        // A later node snapping to an earlier sample must error, even
        // when the pair lies past the buffer spanned by first and last.
        let wv = vec![1.0, 2.0, 3.0, 4.0];
        let values = vec![1.0, 1.0, 1.0, 1.0];
        let err = linear_correction(&wv, &values, &[1.0, 3.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            SpectralError::UnorderedNodes {
                first,
                second
            } if first == 3.0 && second == 2.0
        ));
    }

    #[test]
    fn test_too_few_samples_rejected() {
        let err = regression_correction(&[1.0], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            SpectralError::TooFewSamples { needed: 2, got: 1 }
        ));
        let err = linear_correction(&[], &[], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            SpectralError::TooFewSamples { needed: 2, got: 0 }
        ));
    }

    #[test]
    fn test_linear_needs_two_nodes() {
        let wv = vec![1.0, 2.0];
        let err = linear_correction(&wv, &[1.0, 1.0], &[1.0]).unwrap_err();
        assert!(matches!(err, SpectralError::TooFewNodes { got: 1 }));
    }

    #[test]
    fn test_regression_recovers_line() {
        let wv: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let values: Vec<f64> = wv.iter().map(|x| 2.0 * x + 1.0).collect();
        let result = regression_correction(&wv, &values).unwrap();
        assert!(result.corrected.iter().all(|v| close(*v, 1.0)));
        assert!(close(result.continuum[0], 1.0));
        assert!(close(result.continuum[9], 19.0));
    }

    #[test]
    fn test_regression_constant_axis_is_degenerate() {
        let err = regression_correction(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, SpectralError::DegenerateFit));
    }

    #[test]
    fn test_horgan_parabolic_continuum() {
        // Reflectance exactly on a parabola: the fit through the window
        // maxima recovers it and corrects to one.
        let wv: Vec<f64> = (0..21).map(|i| i as f64 * 0.1).collect();
        let values: Vec<f64> = wv.iter().map(|x| 1.0 + x * (2.0 - x)).collect();
        let result = horgan_correction(&wv, &values, [0.2, 1.0, 1.8], 0.15).unwrap();
        assert!(result.corrected.iter().all(|v| close(*v, 1.0)));
    }

    #[test]
    fn test_horgan_empty_window() {
        let wv = vec![1.0, 2.0, 3.0];
        let err = horgan_correction(&wv, &[1.0, 1.0, 1.0], [10.0, 2.0, 3.0], 0.1).unwrap_err();
        assert!(matches!(err, SpectralError::EmptyWindow { .. }));
    }

    #[test]
    fn test_horgan_coincident_peaks_degenerate() {
        // Both windows resolve to the same sample.
        let wv = vec![1.0, 2.0, 3.0];
        let err = horgan_correction(&wv, &[1.0, 5.0, 1.0], [2.0, 2.0, 2.0], 0.5).unwrap_err();
        assert!(matches!(err, SpectralError::DegenerateFit));
    }

    #[test]
    fn test_method_dispatch_default_nodes() {
        let wv = vec![1.0, 2.0, 3.0];
        let values = vec![4.0, 4.0, 4.0];
        let method = ContinuumMethod::Linear { nodes: None };
        let result = correct(&method, &wv, &values).unwrap();
        assert_eq!(result.corrected.len(), 3);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = regression_correction(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            SpectralError::LengthMismatch { axis: 2, values: 1 }
        ));
    }
}
