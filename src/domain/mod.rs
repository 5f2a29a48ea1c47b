//! Domain layer: Core types for the health-monitoring dataset.
//!
//! Pure Rust types with no I/O. Records are serde-deserializable so any
//! tabular source can produce them.

mod analysis;
mod record;
mod table;

pub use analysis::{AnalysisOption, UnknownAnalysis};
pub use record::{
    parse_category, parse_measurement, BloodPressure, BloodPressureError, HealthRecord, RawHealthRecord,
};
pub use table::{HealthTable, NumericColumn};
