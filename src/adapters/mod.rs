//! Adapters layer: Concrete implementations of ports.
//!
//! - `csv`: CSV file source for health records
//! - `sanitize`: redaction of patient data in logs

pub mod csv;
pub mod sanitize;

// Re-export dataset error for lib.rs
pub use self::csv::DatasetError;
