//! flightlog: reader and playback core for CSV flight logs.
//!
//! A log is a header-delimited CSV with at least the columns `time`, `x`,
//! `y` and `altitude`. `time` is in milliseconds; `x`/`y`/`altitude` are
//! world-space coordinates with altitude on the vertical (Z) axis.
//!
//! Numeric fields are parsed permissively: a cell that fails to parse
//! becomes `NaN` instead of failing the whole load, and rows with a
//! non-finite coordinate are dropped later by [`FlightPath::from_samples`].
//! Structural problems (unreadable file, malformed CSV, missing column)
//! abort the load with a [`LogError`].
//!
//! Playback state lives in [`playback::Playback`], a session object driven
//! by explicit timestamps so it can be tested without a display clock.

pub mod path;
pub mod playback;

pub use path::{Aabb, FlightPath, TimeRule};
pub use playback::{Phase, Playback, Transform};

use glam::DVec3;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One timestamped position observation from the log.
///
/// Any field may be `NaN` when the source cell was not numeric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Timestamp in milliseconds. Expected non-decreasing, but the reader
    /// does not enforce it; degenerate segments are handled at playback.
    pub time_ms: f64,
    pub x: f64,
    pub y: f64,
    pub altitude: f64,
}

impl Sample {
    /// World-space position of this sample, altitude on Z.
    #[inline]
    pub fn position(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.altitude)
    }

    /// True when all three coordinates are finite numbers.
    ///
    /// `time_ms` intentionally does not participate; see [`TimeRule`].
    #[inline]
    pub fn has_finite_position(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.altitude.is_finite()
    }
}

/// Errors that abandon a log load. Row-level bad numbers are not errors;
/// they become `NaN` samples and are filtered out of the path.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to read log source: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("log is missing required column '{0}'")]
    MissingColumn(&'static str),
}

const REQUIRED_COLUMNS: [&str; 4] = ["time", "x", "y", "altitude"];

/// Reads and parses a log file from disk.
pub fn read_file(path: &Path) -> Result<Vec<Sample>, LogError> {
    read_csv(File::open(path)?)
}

/// Parses a log from any reader. The first row must be a header naming at
/// least the four required columns; extra columns are ignored.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Sample>, LogError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut cols = [0usize; 4];
    for (slot, name) in cols.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or(LogError::MissingColumn(name))?;
    }

    let mut samples = Vec::new();
    for record in rdr.records() {
        let record = record?;
        samples.push(Sample {
            time_ms: field_as_f64(&record, cols[0]),
            x: field_as_f64(&record, cols[1]),
            y: field_as_f64(&record, cols[2]),
            altitude: field_as_f64(&record, cols[3]),
        });
    }

    log::debug!("parsed {} log rows", samples.len());
    Ok(samples)
}

/// Permissive numeric parse: absent or non-numeric cells become `NaN`.
fn field_as_f64(record: &csv::StringRecord, idx: usize) -> f64 {
    record
        .get(idx)
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Vec<Sample>, LogError> {
        read_csv(text.as_bytes())
    }

    #[test]
    fn parses_well_formed_log() {
        let samples = parse("time,x,y,altitude\n0,0,0,0\n1000,100,0,0\n").unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].time_ms, 1000.0);
        assert_eq!(samples[1].position(), DVec3::new(100.0, 0.0, 0.0));
    }

    #[test]
    fn extra_columns_and_header_case_are_tolerated() {
        let samples = parse("Time,heading,X,Y,Altitude\n5,270,1,2,3\n").unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].time_ms, 5.0);
        assert_eq!(samples[0].position(), DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn non_numeric_cell_becomes_nan_not_error() {
        let samples = parse("time,x,y,altitude\n1,abc,2,3\n").unwrap();
        assert_eq!(samples.len(), 1);
        assert!(samples[0].x.is_nan());
        assert!(!samples[0].has_finite_position());
    }

    #[test]
    fn short_row_yields_nan_for_missing_cells() {
        let samples = parse("time,x,y,altitude\n1,2\n").unwrap();
        assert_eq!(samples.len(), 1);
        assert!(samples[0].y.is_nan());
        assert!(samples[0].altitude.is_nan());
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let err = parse("time,x,y\n1,2,3\n").unwrap_err();
        assert!(matches!(err, LogError::MissingColumn("altitude")));
    }

    #[test]
    fn whitespace_around_cells_is_trimmed() {
        let samples = parse("time, x, y, altitude\n10, 1.5 , -2.5, 300\n").unwrap();
        assert_eq!(samples[0].x, 1.5);
        assert_eq!(samples[0].y, -2.5);
    }
}
