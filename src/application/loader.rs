//! Dataset loading and median imputation.

use std::collections::HashSet;
use std::sync::Arc;

use crate::adapters::DatasetError;
use crate::application::stats;
use crate::domain::{HealthRecord, HealthTable, RawHealthRecord};
use crate::ports::RecordSource;
use crate::VitalboardError;

/// What the imputation step did to the freshly loaded rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImputationSummary {
    pub rows: usize,
    /// Median of the observed body temperatures before filling
    pub body_temperature_median: f64,
    pub body_temperature_filled: usize,
    /// Median of the observed oxygen saturations before filling
    pub oxygen_saturation_median: f64,
    pub oxygen_saturation_filled: usize,
}

/// Fill missing body temperature and oxygen saturation readings with the
/// median of each column's observed values.
///
/// Both medians are computed from the original rows before any value is
/// filled in.
///
/// # Errors
/// Returns error if the rows are empty, a PatientID repeats, or a column has
/// no observed value at all.
pub fn impute_medians(
    raw: Vec<RawHealthRecord>,
) -> Result<(HealthTable, ImputationSummary), VitalboardError> {
    if raw.is_empty() {
        return Err(VitalboardError::EmptyDataset);
    }

    {
        let mut seen = HashSet::with_capacity(raw.len());
        for record in &raw {
            if !seen.insert(record.patient_id.as_str()) {
                return Err(VitalboardError::DuplicatePatientId(record.patient_id.clone()));
            }
        }
    }

    let observed_temps: Vec<f64> = raw.iter().filter_map(|r| r.body_temperature).collect();
    let observed_spo2: Vec<f64> = raw.iter().filter_map(|r| r.oxygen_saturation).collect();

    let temp_median =
        stats::median(&observed_temps).ok_or(VitalboardError::NoObservations("BodyTemperature"))?;
    let spo2_median = stats::median(&observed_spo2)
        .ok_or(VitalboardError::NoObservations("OxygenSaturation"))?;

    let summary = ImputationSummary {
        rows: raw.len(),
        body_temperature_median: temp_median,
        body_temperature_filled: raw.len() - observed_temps.len(),
        oxygen_saturation_median: spo2_median,
        oxygen_saturation_filled: raw.len() - observed_spo2.len(),
    };

    let records = raw
        .into_iter()
        .map(|r| HealthRecord::from_raw(r, temp_median, spo2_median))
        .collect();

    Ok((HealthTable::new(records), summary))
}

/// Loads and imputes the dataset from a record source.
///
/// Nothing is cached: every call reads the source again.
pub struct DatasetLoader<S>
where
    S: RecordSource,
{
    source: Arc<S>,
}

impl<S> DatasetLoader<S>
where
    S: RecordSource,
    S::Error: Into<DatasetError>,
{
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Description of the underlying source.
    #[must_use]
    pub fn source_name(&self) -> String {
        self.source.describe()
    }

    /// Read every record and fill missing measurements.
    ///
    /// # Errors
    /// Returns error if the source fails or imputation is impossible.
    pub fn load(&self) -> Result<(HealthTable, ImputationSummary), VitalboardError> {
        let raw = self
            .source
            .load_records()
            .map_err(|e| VitalboardError::Dataset(e.into()))?;

        let (table, summary) = impute_medians(raw)?;

        tracing::info!(
            "Loaded {} records from {} (filled {} BodyTemperature with {:.2}, {} OxygenSaturation with {:.2})",
            summary.rows,
            self.source.describe(),
            summary.body_temperature_filled,
            summary.body_temperature_median,
            summary.oxygen_saturation_filled,
            summary.oxygen_saturation_median,
        );

        Ok((table, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, temp: Option<f64>, spo2: Option<f64>) -> RawHealthRecord {
        RawHealthRecord {
            patient_id: id.to_string(),
            age: 50,
            gender: Some("Male".to_string()),
            heart_rate: 75,
            respiratory_rate: 16,
            body_temperature: temp,
            oxygen_saturation: spo2,
            blood_pressure: "125/82".to_string(),
            activity_level: Some("walking".to_string()),
        }
    }

    struct FixedSource(Vec<RawHealthRecord>);

    impl RecordSource for FixedSource {
        type Error = DatasetError;

        fn load_records(&self) -> Result<Vec<RawHealthRecord>, Self::Error> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "fixture".to_string()
        }
    }

    #[test]
    fn test_imputes_pre_fill_median() {
        let rows = vec![
            raw("1", Some(36.5), Some(97.0)),
            raw("2", None, Some(99.0)),
            raw("3", Some(37.0), None),
            raw("4", None, Some(95.0)),
            raw("5", Some(36.8), Some(96.0)),
        ];
        let (table, summary) = impute_medians(rows).expect("Should impute");

        assert!((summary.body_temperature_median - 36.8).abs() < 1e-9);
        assert_eq!(summary.body_temperature_filled, 2);
        assert!((summary.oxygen_saturation_median - 96.5).abs() < 1e-9);
        assert_eq!(summary.oxygen_saturation_filled, 1);

        let temps: Vec<f64> = table.records().iter().map(|r| r.body_temperature).collect();
        assert_eq!(temps, vec![36.5, 36.8, 37.0, 36.8, 36.8]);
        assert!((table.records()[2].oxygen_saturation - 96.5).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_patient_id() {
        let rows = vec![raw("1", Some(36.5), Some(97.0)), raw("1", Some(36.6), Some(98.0))];
        assert!(matches!(
            impute_medians(rows),
            Err(VitalboardError::DuplicatePatientId(id)) if id == "1"
        ));
    }

    #[test]
    fn test_all_missing_column() {
        let rows = vec![raw("1", None, Some(97.0)), raw("2", None, Some(98.0))];
        assert!(matches!(
            impute_medians(rows),
            Err(VitalboardError::NoObservations("BodyTemperature"))
        ));
    }

    #[test]
    fn test_empty_dataset() {
        assert!(matches!(impute_medians(Vec::new()), Err(VitalboardError::EmptyDataset)));
    }

    #[test]
    fn test_loader_reads_source() {
        let loader = DatasetLoader::new(Arc::new(FixedSource(vec![
            raw("a", Some(36.0), None),
            raw("b", Some(37.0), Some(98.0)),
        ])));
        let (table, summary) = loader.load().expect("Should load");
        assert_eq!(table.len(), 2);
        assert_eq!(summary.oxygen_saturation_filled, 1);
        assert_eq!(loader.source_name(), "fixture");
    }
}
