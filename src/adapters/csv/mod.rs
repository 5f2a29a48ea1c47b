//! CSV adapter: Implementation of RecordSource.
//!
//! Reads the health-monitoring export with the `csv` crate and deserializes
//! each row through serde. The header row is validated before any data row
//! is parsed so a missing column is reported by name.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use ::csv::{ReaderBuilder, Trim};

use crate::domain::RawHealthRecord;
use crate::ports::RecordSource;

/// Columns every dataset must provide. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "PatientID",
    "Age",
    "Gender",
    "HeartRate",
    "RespiratoryRate",
    "BodyTemperature",
    "OxygenSaturation",
    "BloodPressure",
    "ActivityLevel",
];

/// Error type for dataset loading.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("Missing expected column: {0}")]
    MissingColumn(&'static str),

    #[error("Invalid row at line {line}: {message}")]
    Row { line: u64, message: String },
}

/// CSV file record source.
#[derive(Debug, Clone)]
pub struct CsvRecordSource {
    path: PathBuf,
}

impl CsvRecordSource {
    /// Create a source for the given file. Nothing is read until
    /// [`RecordSource::load_records`] is called.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for CsvRecordSource {
    type Error = DatasetError;

    fn load_records(&self) -> Result<Vec<RawHealthRecord>, Self::Error> {
        let file = File::open(&self.path).map_err(|source| DatasetError::Open {
            path: self.path.clone(),
            source,
        })?;
        let records = read_records(file)?;
        tracing::debug!("Read {} rows from {}", records.len(), self.path.display());
        Ok(records)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parse health records from any CSV reader with a header row.
///
/// # Errors
/// Returns error on a missing column, a row that does not deserialize, or
/// malformed CSV.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RawHealthRecord>, DatasetError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .copied()
        .find(|column| !headers.iter().any(|h| h == *column))
    {
        return Err(DatasetError::MissingColumn(missing));
    }

    let mut records = Vec::new();
    for result in rdr.deserialize::<RawHealthRecord>() {
        records.push(result.map_err(row_error)?);
    }
    Ok(records)
}

fn row_error(err: ::csv::Error) -> DatasetError {
    match err.position() {
        Some(pos) => DatasetError::Row {
            line: pos.line(),
            message: match err.kind() {
                ::csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
                _ => err.to_string(),
            },
        },
        None => DatasetError::Csv(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "PatientID,Age,Gender,HeartRate,BloodPressure,RespiratoryRate,BodyTemperature,ActivityLevel,OxygenSaturation";

    #[test]
    fn test_read_records_with_missing_values() {
        let data = format!(
            "{HEADER}\n1,69,Male,60,130/85,15,98.3,walking,\n2,32,Female,61,115/75,20,NaN,resting,95.0\n"
        );
        let records = read_records(data.as_bytes()).expect("Should read");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].patient_id, "1");
        assert_eq!(records[0].body_temperature, Some(98.3));
        assert_eq!(records[0].oxygen_saturation, None);
        assert_eq!(records[1].body_temperature, None);
        assert_eq!(records[1].blood_pressure, "115/75");
    }

    #[test]
    fn test_blank_category_reads_as_missing() {
        let data = format!(
            "{HEADER}\n1,69,Male,60,130/85,15,98.3,walking,97\n2,32,,61,115/75,20,98.0,,95.0\n3,40,Female,70,120/80,16,98.1,resting,96\n"
        );
        let records = read_records(data.as_bytes()).expect("Should read");

        let genders: Vec<Option<&str>> = records.iter().map(|r| r.gender.as_deref()).collect();
        assert_eq!(genders, vec![Some("Male"), None, Some("Female")]);
        assert_eq!(records[1].activity_level, None);
    }

    #[test]
    fn test_missing_column() {
        let data = "PatientID,Age,Gender,HeartRate\n1,69,Male,60\n";
        let err = read_records(data.as_bytes()).expect_err("Should fail");
        assert!(matches!(err, DatasetError::MissingColumn("RespiratoryRate")));
    }

    #[test]
    fn test_invalid_integer_reports_line() {
        let data = format!("{HEADER}\n1,69,Male,60,130/85,15,98.3,walking,97\n2,old,Female,61,115/75,20,98.0,resting,95.0\n");
        let err = read_records(data.as_bytes()).expect_err("Should fail");
        assert!(matches!(err, DatasetError::Row { .. }), "{err}");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Should create temp file");
        writeln!(file, "{HEADER}").expect("Should write");
        writeln!(file, "7,45,Female,72,120/80,16,36.9,running,98.5").expect("Should write");

        let source = CsvRecordSource::new(file.path());
        let records = source.load_records().expect("Should load");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].activity_level.as_deref(), Some("running"));
    }

    #[test]
    fn test_absent_file() {
        let source = CsvRecordSource::new("/nonexistent/healthmonitoring.csv");
        assert!(matches!(
            source.load_records(),
            Err(DatasetError::Open { .. })
        ));
    }
}
