//! Application layer: Use cases and services.
//!
//! Loads the dataset through a [`RecordSource`](crate::ports::RecordSource),
//! fills missing measurements, and computes the six dashboard analyses.

mod analytics;
mod loader;
pub mod stats;

pub use analytics::{
    analyze, AnalysisOutcome, AnalysisReport, AnalyticsService, BloodPressureReport,
    CorrelationReport, DistributionPlot, GenderReport, GroupedBoxPlot, MetricsByGenderReport,
    SummaryReport,
};
pub use loader::{impute_medians, DatasetLoader, ImputationSummary};
