//! Delimited observations tables.
//!
//! One row per observation: an `id` column, any number of metadata
//! columns, and one numeric column per wavelength. The header names the
//! columns; a header cell that parses as a number is a wavelength.

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

use crate::spectral::frame::{Observation, SpectraFrame};
use crate::spectral::SpectralError;

#[derive(Debug, Error)]
pub enum ObservationsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("observations file is empty")]
    Empty,

    #[error("first header column must be 'id', found '{0}'")]
    MissingIdColumn(String),

    #[error("header declares no wavelength columns")]
    NoWavelengths,

    #[error("line {line}: expected {expected} fields, got {got}")]
    RaggedRow {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("line {line}, column '{column}': '{value}' is not a number")]
    BadValue {
        line: usize,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Frame(#[from] SpectralError),
}

enum Column {
    Meta(String),
    Wavelength(f64),
}

/// Read and parse an observations file into a frame.
pub fn read_observations(
    path: impl AsRef<Path>,
    delimiter: char,
) -> Result<SpectraFrame, ObservationsError> {
    let content = std::fs::read_to_string(path)?;
    parse_observations(&content, delimiter)
}

/// Parse delimited observations text into a frame.
pub fn parse_observations(
    content: &str,
    delimiter: char,
) -> Result<SpectraFrame, ObservationsError> {
    let mut lines = content.lines().enumerate();
    let (_, header) = lines.next().ok_or(ObservationsError::Empty)?;

    let mut fields = header.split(delimiter).map(str::trim);
    let id_column = fields.next().unwrap_or("");
    if id_column != "id" {
        return Err(ObservationsError::MissingIdColumn(id_column.to_string()));
    }

    let columns: Vec<Column> = fields
        .map(|name| match name.parse::<f64>() {
            Ok(wv) => Column::Wavelength(wv),
            Err(_) => Column::Meta(name.to_string()),
        })
        .collect();
    let wavelengths: Vec<f64> = columns
        .iter()
        .filter_map(|c| match c {
            Column::Wavelength(wv) => Some(*wv),
            Column::Meta(_) => None,
        })
        .collect();
    if wavelengths.is_empty() {
        return Err(ObservationsError::NoWavelengths);
    }

    let mut observations = Vec::new();
    for (index, row) in lines {
        if row.trim().is_empty() {
            continue;
        }
        let line = index + 1;
        let cells: Vec<&str> = row.split(delimiter).map(str::trim).collect();
        if cells.len() != columns.len() + 1 {
            return Err(ObservationsError::RaggedRow {
                line,
                expected: columns.len() + 1,
                got: cells.len(),
            });
        }

        let id = cells[0].to_string();
        let mut metadata = BTreeMap::new();
        let mut values = Vec::with_capacity(wavelengths.len());
        for (cell, column) in cells[1..].iter().zip(&columns) {
            match column {
                Column::Meta(name) => {
                    metadata.insert(name.clone(), cell.to_string());
                }
                Column::Wavelength(wv) => {
                    let value =
                        cell.parse::<f64>()
                            .map_err(|_| ObservationsError::BadValue {
                                line,
                                column: format!("{}", wv),
                                value: cell.to_string(),
                            })?;
                    values.push(value);
                }
            }
        }
        observations.push(Observation {
            id,
            metadata,
            values,
        });
    }

    Ok(SpectraFrame::new(wavelengths, observations)?)
}

/// Serialize a frame back to delimited text.
///
/// Metadata columns come first (sorted by name, union over rows), then
/// the wavelength columns in axis order. Missing metadata cells are
/// left empty.
pub fn format_observations(frame: &SpectraFrame, delimiter: char) -> String {
    let meta_keys: Vec<String> = frame.metadata_keys().into_iter().collect();

    let mut out = String::from("id");
    for key in &meta_keys {
        out.push(delimiter);
        out.push_str(key);
    }
    for wv in frame.wavelengths() {
        out.push(delimiter);
        out.push_str(&wv.to_string());
    }
    out.push('\n');

    for obs in frame.observations() {
        out.push_str(&obs.id);
        for key in &meta_keys {
            out.push(delimiter);
            if let Some(value) = obs.metadata.get(key) {
                out.push_str(value);
            }
        }
        for value in &obs.values {
            out.push(delimiter);
            out.push_str(&value.to_string());
        }
        out.push('\n');
    }
    out
}

/// Write a frame to disk as delimited text.
pub fn write_observations(
    frame: &SpectraFrame,
    path: impl AsRef<Path>,
    delimiter: char,
) -> Result<(), ObservationsError> {
    std::fs::write(path, format_observations(frame, delimiter))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
id,site,incidence,512.6,518.4,524.7
sp001,mare,42.0,0.11,0.12,0.14
sp002,highland,97.5,0.31,0.30,0.29
";

    #[test]
    fn test_parse_splits_meta_and_wavelengths() {
        let frame = parse_observations(SAMPLE, ',').unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.wavelengths(), &[512.6, 518.4, 524.7]);
        let obs = frame.get("sp001").unwrap();
        assert_eq!(obs.metadata.get("site"), Some(&"mare".to_string()));
        assert_eq!(obs.values, vec![0.11, 0.12, 0.14]);
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let content = format!("{}\n\n", SAMPLE);
        let frame = parse_observations(&content, ',').unwrap();
        assert_eq!(frame.len(), 2);
    }

    #[test]
    fn test_ragged_row_names_line() {
        let content = "id,512.6\nsp001,0.1\nsp002\n";
        let err = parse_observations(content, ',').unwrap_err();
        match err {
            ObservationsError::RaggedRow { line, expected, got } => {
                assert_eq!(line, 3);
                assert_eq!(expected, 2);
                assert_eq!(got, 1);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_bad_value_names_line_and_column() {
        let content = "id,512.6\nsp001,oops\n";
        let err = parse_observations(content, ',').unwrap_err();
        match err {
            ObservationsError::BadValue { line, column, value } => {
                assert_eq!(line, 2);
                assert_eq!(column, "512.6");
                assert_eq!(value, "oops");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let content = "id,512.6\nsp001,0.1\nsp001,0.2\n";
        let err = parse_observations(content, ',').unwrap_err();
        assert!(matches!(
            err,
            ObservationsError::Frame(SpectralError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_header_must_lead_with_id() {
        let err = parse_observations("name,512.6\nx,0.1\n", ',').unwrap_err();
        assert!(matches!(err, ObservationsError::MissingIdColumn(_)));
    }

    #[test]
    fn test_no_wavelength_columns() {
        let err = parse_observations("id,site\nsp001,mare\n", ',').unwrap_err();
        assert!(matches!(err, ObservationsError::NoWavelengths));
    }

    #[test]
    fn test_empty_file() {
        let err = parse_observations("", ',').unwrap_err();
        assert!(matches!(err, ObservationsError::Empty));
    }

    #[test]
    fn test_format_then_parse_preserves_frame() {
        let frame = parse_observations(SAMPLE, ',').unwrap();
        let rendered = format_observations(&frame, ';');
        let reparsed = parse_observations(&rendered, ';').unwrap();
        assert_eq!(reparsed, frame);
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obs.csv");
        let frame = parse_observations(SAMPLE, ',').unwrap();
        write_observations(&frame, &path, ',').unwrap();
        let read_back = read_observations(&path, ',').unwrap();
        assert_eq!(read_back, frame);
    }
}
