//! Catalog file I/O.
//!
//! The catalog is CSV with header `Origin Time,Latitude,Longitude,Magnitude,Depth`.
//! Header cells are trimmed on read, so a space after each comma is accepted.
//! Depth may be empty.

use gr_common::SeismicEvent;
use gr_math::{CatalogError, MagnitudeCatalog};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const COL_ORIGIN_TIME: &str = "Origin Time";
pub const COL_LATITUDE: &str = "Latitude";
pub const COL_LONGITUDE: &str = "Longitude";
pub const COL_MAGNITUDE: &str = "Magnitude";
pub const COL_DEPTH: &str = "Depth";

/// Column order of written catalogs.
pub const HEADER: [&str; 5] = [
    COL_ORIGIN_TIME,
    COL_LATITUDE,
    COL_LONGITUDE,
    COL_MAGNITUDE,
    COL_DEPTH,
];

#[derive(Debug, Error)]
pub enum CatalogFileError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing column {0:?}")]
    MissingColumn(&'static str),

    /// `row` is 1-based over data rows (the header is not counted).
    #[error("row {row}: {column} is not a number: {value:?}")]
    InvalidField {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: magnitude is not a finite number: {value:?}")]
    MalformedMagnitude { row: usize, value: String },
}

impl CatalogFileError {
    /// Convert to the unified error.
    pub fn to_common(&self) -> gr_common::Error {
        match self {
            CatalogFileError::Io { .. } => gr_common::Error::CatalogFile(self.to_string()),
            CatalogFileError::Csv(e) if e.is_io_error() => {
                gr_common::Error::CatalogFile(self.to_string())
            }
            CatalogFileError::Csv(_)
            | CatalogFileError::MissingColumn(_)
            | CatalogFileError::InvalidField { .. } => {
                gr_common::Error::InvalidCatalog(self.to_string())
            }
            CatalogFileError::MalformedMagnitude { row, value } => {
                gr_common::Error::MalformedMagnitude {
                    row: *row,
                    value: value.clone(),
                }
            }
        }
    }
}

struct Columns {
    origin_time: usize,
    latitude: usize,
    longitude: usize,
    magnitude: usize,
    depth: Option<usize>,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, CatalogFileError> {
        let find = |name: &'static str| headers.iter().position(|h| h == name);
        let require =
            |name: &'static str| find(name).ok_or(CatalogFileError::MissingColumn(name));
        Ok(Columns {
            origin_time: require(COL_ORIGIN_TIME)?,
            latitude: require(COL_LATITUDE)?,
            longitude: require(COL_LONGITUDE)?,
            magnitude: require(COL_MAGNITUDE)?,
            depth: find(COL_DEPTH),
        })
    }
}

fn parse_number(
    record: &csv::StringRecord,
    index: usize,
    row: usize,
    column: &'static str,
) -> Result<f64, CatalogFileError> {
    let raw = record.get(index).unwrap_or("");
    raw.parse::<f64>()
        .map_err(|_| CatalogFileError::InvalidField {
            row,
            column,
            value: raw.to_string(),
        })
}

/// Read events from any CSV source.
pub fn read_events<R: Read>(source: R) -> Result<Vec<SeismicEvent>, CatalogFileError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    let columns = Columns::locate(reader.headers()?)?;

    let mut events = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = i + 1;

        let raw_mag = record.get(columns.magnitude).unwrap_or("");
        let magnitude = match raw_mag.parse::<f64>() {
            Ok(m) if m.is_finite() => m,
            _ => {
                return Err(CatalogFileError::MalformedMagnitude {
                    row,
                    value: raw_mag.to_string(),
                })
            }
        };

        let depth_km = match columns.depth {
            Some(idx) if !record.get(idx).unwrap_or("").is_empty() => {
                Some(parse_number(&record, idx, row, COL_DEPTH)?)
            }
            _ => None,
        };

        events.push(SeismicEvent {
            origin_time: record.get(columns.origin_time).unwrap_or("").to_string(),
            latitude: parse_number(&record, columns.latitude, row, COL_LATITUDE)?,
            longitude: parse_number(&record, columns.longitude, row, COL_LONGITUDE)?,
            magnitude,
            depth_km,
        });
    }

    Ok(events)
}

/// Read a catalog file.
pub fn read_catalog(path: &Path) -> Result<Vec<SeismicEvent>, CatalogFileError> {
    let file = std::fs::File::open(path).map_err(|source| CatalogFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_events(std::io::BufReader::new(file))
}

/// Shortest round-trip decimal, with `.0` kept on integral values.
pub fn format_decimal(value: f64) -> String {
    format!("{:?}", value)
}

/// Write events as CSV to any sink.
pub fn write_events<W: Write>(sink: W, events: &[SeismicEvent]) -> Result<(), CatalogFileError> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(HEADER)?;
    for event in events {
        writer.write_record([
            event.origin_time.clone(),
            format_decimal(event.latitude),
            format_decimal(event.longitude),
            format_decimal(event.magnitude),
            event.depth_km.map(format_decimal).unwrap_or_default(),
        ])?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write a catalog file, replacing any existing file.
pub fn write_catalog(path: &Path, events: &[SeismicEvent]) -> Result<(), CatalogFileError> {
    let file = std::fs::File::create(path).map_err(|source| CatalogFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_events(std::io::BufWriter::new(file), events)
}

/// Magnitudes of `events`, in order.
pub fn magnitudes(events: &[SeismicEvent]) -> Result<MagnitudeCatalog, CatalogError> {
    MagnitudeCatalog::new(events.iter().map(|e| e.magnitude).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Origin Time, Latitude, Longitude, Magnitude, Depth
2012-03-04T05:06:07.890000Z, 30.5, 79.25, 3.4, 10.0
2013-01-01T00:00:00Z, 31.0, 78.0, 4.0,
";

    #[test]
    fn reads_padded_header_and_null_depth() {
        let events = read_events(SAMPLE.as_bytes()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].origin_time, "2012-03-04T05:06:07.890000Z");
        assert_eq!(events[0].magnitude, 3.4);
        assert_eq!(events[0].depth_km, Some(10.0));
        assert_eq!(events[1].depth_km, None);
    }

    #[test]
    fn writes_canonical_text() {
        let events = read_events(SAMPLE.as_bytes()).unwrap();
        let mut out = Vec::new();
        write_events(&mut out, &events).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Origin Time,Latitude,Longitude,Magnitude,Depth\n\
             2012-03-04T05:06:07.890000Z,30.5,79.25,3.4,10.0\n\
             2013-01-01T00:00:00Z,31.0,78.0,4.0,\n"
        );
    }

    #[test]
    fn written_catalog_reads_back_identically() {
        let events = read_events(SAMPLE.as_bytes()).unwrap();
        let mut out = Vec::new();
        write_events(&mut out, &events).unwrap();
        assert_eq!(read_events(out.as_slice()).unwrap(), events);
    }

    #[test]
    fn written_catalog_file_reads_back_identically() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("catalog.csv");
        let events = read_events(SAMPLE.as_bytes()).unwrap();

        write_catalog(&path, &events).unwrap();
        assert_eq!(read_catalog(&path).unwrap(), events);

        // Rewriting replaces the previous contents.
        write_catalog(&path, &events[..1]).unwrap();
        assert_eq!(read_catalog(&path).unwrap(), events[..1].to_vec());
    }

    #[test]
    fn write_catalog_into_missing_dir_is_io_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("absent").join("catalog.csv");
        let err = write_catalog(&path, &[]).unwrap_err();
        assert!(matches!(err, CatalogFileError::Io { .. }));
    }

    #[test]
    fn missing_magnitude_column() {
        let err = read_events("Origin Time,Latitude,Longitude,Depth\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogFileError::MissingColumn("Magnitude")));
    }

    #[test]
    fn malformed_magnitude_reports_row() {
        let text = "Origin Time,Latitude,Longitude,Magnitude,Depth\n\
                    t0,30,79,3.1,5\n\
                    t1,30,79,n/a,5\n";
        let err = read_events(text.as_bytes()).unwrap_err();
        match &err {
            CatalogFileError::MalformedMagnitude { row, value } => {
                assert_eq!(*row, 2);
                assert_eq!(value, "n/a");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.to_common().code(), 22);
    }

    #[test]
    fn non_finite_magnitude_is_malformed() {
        let text = "Origin Time,Latitude,Longitude,Magnitude,Depth\nt0,30,79,NaN,5\n";
        assert!(matches!(
            read_events(text.as_bytes()),
            Err(CatalogFileError::MalformedMagnitude { row: 1, .. })
        ));
    }

    #[test]
    fn bad_latitude_reports_column() {
        let text = "Origin Time,Latitude,Longitude,Magnitude,Depth\nt0,north,79,3.0,5\n";
        let err = read_events(text.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            CatalogFileError::InvalidField {
                row: 1,
                column: "Latitude",
                ..
            }
        ));
        assert_eq!(err.to_common().code(), 20);
    }

    #[test]
    fn magnitudes_preserve_order() {
        let events = read_events(SAMPLE.as_bytes()).unwrap();
        assert_eq!(magnitudes(&events).unwrap().as_slice(), &[3.4, 4.0]);
    }

    #[test]
    fn format_decimal_keeps_point_zero() {
        assert_eq!(format_decimal(3.0), "3.0");
        assert_eq!(format_decimal(79.25), "79.25");
        assert_eq!(format_decimal(-0.5), "-0.5");
    }
}
