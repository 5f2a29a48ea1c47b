//! # Vitalboard
//!
//! Terminal dashboard over a per-patient health-monitoring dataset.
//!
//! The dataset is read from CSV, missing body temperature and oxygen
//! saturation readings are filled with their column medians, and one of six
//! canned analyses is rendered on demand.
//!
//! ## Architecture
//!
//! - `domain`: records, the in-memory table, the analysis selector
//! - `ports`: trait for where records come from
//! - `adapters`: CSV source and log sanitization
//! - `application`: loading/imputation, statistics, the six analyses
//! - `tui`: terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use config::DashboardConfig;
pub use domain::{AnalysisOption, HealthRecord, HealthTable};

/// Result type for Vitalboard operations
pub type Result<T> = std::result::Result<T, VitalboardError>;

/// Main error type for Vitalboard
#[derive(Debug, thiserror::Error)]
pub enum VitalboardError {
    #[error("Dataset could not be loaded: {0}")]
    Dataset(#[from] adapters::DatasetError),

    #[error("Blood pressure parse failed: {0}")]
    BloodPressure(#[from] domain::BloodPressureError),

    #[error("Duplicate PatientID {0}")]
    DuplicatePatientId(String),

    #[error("Column {0} has no observed values to compute a median from")]
    NoObservations(&'static str),

    #[error("Dataset is empty")]
    EmptyDataset,
}
