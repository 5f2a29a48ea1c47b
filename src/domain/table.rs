//! In-memory table of completed health records.

use super::record::{BloodPressure, BloodPressureError, HealthRecord};

/// Numeric columns that take part in describe, histograms and correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericColumn {
    Age,
    HeartRate,
    RespiratoryRate,
    BodyTemperature,
    OxygenSaturation,
}

impl NumericColumn {
    /// Column order used by every report.
    pub const ALL: [Self; 5] = [
        Self::Age,
        Self::HeartRate,
        Self::RespiratoryRate,
        Self::BodyTemperature,
        Self::OxygenSaturation,
    ];

    /// Header name in the source file.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::HeartRate => "HeartRate",
            Self::RespiratoryRate => "RespiratoryRate",
            Self::BodyTemperature => "BodyTemperature",
            Self::OxygenSaturation => "OxygenSaturation",
        }
    }

    /// Human readable name for chart titles.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::HeartRate => "Heart Rate",
            Self::RespiratoryRate => "Respiratory Rate",
            Self::BodyTemperature => "Body Temperature",
            Self::OxygenSaturation => "Oxygen Saturation",
        }
    }

    #[must_use]
    pub fn value(self, record: &HealthRecord) -> f64 {
        match self {
            Self::Age => f64::from(record.age),
            Self::HeartRate => f64::from(record.heart_rate),
            Self::RespiratoryRate => f64::from(record.respiratory_rate),
            Self::BodyTemperature => record.body_temperature,
            Self::OxygenSaturation => record.oxygen_saturation,
        }
    }
}

/// The materialised dataset for one rendering pass.
///
/// Systolic/diastolic columns only exist after
/// [`HealthTable::split_blood_pressure`] has run.
#[derive(Debug, Clone, Default)]
pub struct HealthTable {
    records: Vec<HealthRecord>,
    blood_pressure: Option<Vec<BloodPressure>>,
}

impl HealthTable {
    #[must_use]
    pub fn new(records: Vec<HealthRecord>) -> Self {
        Self {
            records,
            blood_pressure: None,
        }
    }

    #[must_use]
    pub fn records(&self) -> &[HealthRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All values of a numeric column in row order.
    #[must_use]
    pub fn column(&self, column: NumericColumn) -> Vec<f64> {
        self.records.iter().map(|r| column.value(r)).collect()
    }

    /// Split a numeric column by a categorical key.
    ///
    /// Groups are returned in order of first appearance. Rows whose key is
    /// missing belong to no group.
    pub fn group_by<K>(&self, key: K, column: NumericColumn) -> Vec<(String, Vec<f64>)>
    where
        K: Fn(&HealthRecord) -> Option<&str>,
    {
        let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
        for record in &self.records {
            let Some(label) = key(record) else {
                continue;
            };
            let value = column.value(record);
            match groups.iter_mut().find(|(l, _)| l == label) {
                Some((_, values)) => values.push(value),
                None => groups.push((label.to_string(), vec![value])),
            }
        }
        groups
    }

    /// Parse every BloodPressure reading into systolic/diastolic columns and
    /// keep them on the table.
    ///
    /// Fails on the first malformed reading; the table is left unchanged.
    ///
    /// # Errors
    /// Returns the parse error of the first malformed reading.
    pub fn split_blood_pressure(&mut self) -> Result<&[BloodPressure], BloodPressureError> {
        if self.blood_pressure.is_none() {
            let parsed = self
                .records
                .iter()
                .map(|r| r.blood_pressure.parse::<BloodPressure>())
                .collect::<Result<Vec<_>, _>>()?;
            self.blood_pressure = Some(parsed);
        }
        Ok(self.blood_pressure.as_deref().unwrap_or_default())
    }

    /// Derived blood pressure columns, if already split.
    #[must_use]
    pub fn blood_pressure(&self) -> Option<&[BloodPressure]> {
        self.blood_pressure.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, gender: Option<&str>, hr: u32, bp: &str) -> HealthRecord {
        HealthRecord {
            patient_id: id.to_string(),
            age: 30,
            gender: gender.map(str::to_string),
            heart_rate: hr,
            respiratory_rate: 14,
            body_temperature: 36.6,
            oxygen_saturation: 98.0,
            blood_pressure: bp.to_string(),
            activity_level: Some("resting".to_string()),
        }
    }

    #[test]
    fn test_group_by_keeps_first_appearance_order() {
        let table = HealthTable::new(vec![
            record("1", Some("Male"), 70, "120/80"),
            record("2", Some("Female"), 80, "120/80"),
            record("3", Some("Male"), 90, "120/80"),
        ]);
        let groups = table.group_by(|r| r.gender.as_deref(), NumericColumn::HeartRate);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Male");
        assert_eq!(groups[0].1, vec![70.0, 90.0]);
        assert_eq!(groups[1].0, "Female");
    }

    #[test]
    fn test_group_by_skips_missing_keys() {
        let table = HealthTable::new(vec![
            record("1", Some("Male"), 70, "120/80"),
            record("2", None, 80, "120/80"),
            record("3", Some("Female"), 90, "120/80"),
        ]);
        let groups = table.group_by(|r| r.gender.as_deref(), NumericColumn::HeartRate);
        let labels: Vec<&str> = groups.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Male", "Female"]);
        assert_eq!(groups.iter().map(|(_, v)| v.len()).sum::<usize>(), 2);
    }

    #[test]
    fn test_split_blood_pressure_adds_columns() {
        let mut table = HealthTable::new(vec![
            record("1", Some("Male"), 70, "120/80"),
            record("2", Some("Female"), 80, "140/90"),
        ]);
        assert!(table.blood_pressure().is_none());

        let split = table.split_blood_pressure().expect("Should split");
        assert_eq!(split[1], BloodPressure { systolic: 140, diastolic: 90 });
        assert_eq!(table.blood_pressure().map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_split_blood_pressure_failure_leaves_table() {
        let mut table = HealthTable::new(vec![
            record("1", Some("Male"), 70, "120/80"),
            record("2", Some("Female"), 80, "11080"),
        ]);
        assert!(table.split_blood_pressure().is_err());
        assert!(table.blood_pressure().is_none());
    }
}
