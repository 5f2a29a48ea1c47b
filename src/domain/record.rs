//! Per-patient health records.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Tokens treated as a missing measurement.
const MISSING_TOKENS: [&str; 7] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL"];

/// One row as it appears in the source, before imputation.
///
/// Body temperature and oxygen saturation may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHealthRecord {
    #[serde(rename = "PatientID")]
    pub patient_id: String,

    #[serde(rename = "Age")]
    pub age: u32,

    /// `None` when the cell holds a missing-value token
    #[serde(rename = "Gender", deserialize_with = "optional_category")]
    pub gender: Option<String>,

    /// Beats per minute
    #[serde(rename = "HeartRate")]
    pub heart_rate: u32,

    /// Breaths per minute
    #[serde(rename = "RespiratoryRate")]
    pub respiratory_rate: u32,

    /// Degrees Celsius
    #[serde(rename = "BodyTemperature", deserialize_with = "optional_measurement")]
    pub body_temperature: Option<f64>,

    /// Percent
    #[serde(rename = "OxygenSaturation", deserialize_with = "optional_measurement")]
    pub oxygen_saturation: Option<f64>,

    /// Unparsed "SYS/DIA" reading
    #[serde(rename = "BloodPressure")]
    pub blood_pressure: String,

    #[serde(rename = "ActivityLevel", deserialize_with = "optional_category")]
    pub activity_level: Option<String>,
}

/// A complete row after missing measurements have been filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthRecord {
    pub patient_id: String,
    pub age: u32,
    pub gender: Option<String>,
    pub heart_rate: u32,
    pub respiratory_rate: u32,
    pub body_temperature: f64,
    pub oxygen_saturation: f64,
    pub blood_pressure: String,
    pub activity_level: Option<String>,
}

impl HealthRecord {
    /// Complete a raw record, substituting the given fill values for
    /// missing measurements.
    #[must_use]
    pub fn from_raw(raw: RawHealthRecord, body_temperature_fill: f64, oxygen_fill: f64) -> Self {
        Self {
            patient_id: raw.patient_id,
            age: raw.age,
            gender: raw.gender,
            heart_rate: raw.heart_rate,
            respiratory_rate: raw.respiratory_rate,
            body_temperature: raw.body_temperature.unwrap_or(body_temperature_fill),
            oxygen_saturation: raw.oxygen_saturation.unwrap_or(oxygen_fill),
            blood_pressure: raw.blood_pressure,
            activity_level: raw.activity_level,
        }
    }
}

/// Parse a floating point measurement, mapping missing-value tokens and NaN
/// to `None`.
///
/// # Errors
/// Returns the float parse error for anything else that is not a number.
pub fn parse_measurement(raw: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let trimmed = raw.trim();
    if MISSING_TOKENS.contains(&trimmed) {
        return Ok(None);
    }
    let value = trimmed.parse::<f64>()?;
    Ok(if value.is_nan() { None } else { Some(value) })
}

fn optional_measurement<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_measurement(&raw)
        .map_err(|e| serde::de::Error::custom(format!("invalid measurement {raw:?}: {e}")))
}

/// Map a categorical cell to `None` when it holds a missing-value token.
#[must_use]
pub fn parse_category(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!MISSING_TOKENS.contains(&trimmed)).then(|| trimmed.to_string())
}

fn optional_category<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(parse_category(&raw))
}

/// Errors from splitting a "SYS/DIA" blood pressure reading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BloodPressureError {
    #[error("reading {0:?} has no '/' separator")]
    MissingSeparator(String),

    #[error("reading {0:?} has more than one '/' separator")]
    TooManyParts(String),

    #[error("reading {reading:?} has non-integer component {component:?}")]
    InvalidComponent { reading: String, component: String },
}

/// Systolic/diastolic pair in mmHg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: i32,
    pub diastolic: i32,
}

impl FromStr for BloodPressure {
    type Err = BloodPressureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        let (Some(sys), Some(dia)) = (parts.next(), parts.next()) else {
            return Err(BloodPressureError::MissingSeparator(s.to_string()));
        };
        if parts.next().is_some() {
            return Err(BloodPressureError::TooManyParts(s.to_string()));
        }

        let component = |part: &str| {
            part.trim()
                .parse::<i32>()
                .map_err(|_| BloodPressureError::InvalidComponent {
                    reading: s.to_string(),
                    component: part.to_string(),
                })
        };

        Ok(Self {
            systolic: component(sys)?,
            diastolic: component(dia)?,
        })
    }
}
