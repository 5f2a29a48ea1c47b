//! Record source port: where raw health records come from.
//!
//! The dashboard re-reads its source on every interaction, so
//! implementations should not cache.

use crate::domain::RawHealthRecord;

/// Trait for loading the raw (pre-imputation) dataset.
pub trait RecordSource: Send + Sync {
    /// Error type for load operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load every record in source order.
    ///
    /// # Errors
    /// Returns error if the source is absent, unreadable, or malformed.
    fn load_records(&self) -> Result<Vec<RawHealthRecord>, Self::Error>;

    /// Short description of the source for log lines and the status bar.
    fn describe(&self) -> String;
}
