//! The fixed set of analyses the dashboard can render.

use std::fmt;
use std::str::FromStr;

/// One of the six mutually exclusive dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnalysisOption {
    #[default]
    SummaryStatistics,
    GenderDistribution,
    CorrelationMatrix,
    HeartRateByActivityLevel,
    BloodPressureDistribution,
    HealthMetricsByGender,
}

/// Returned when a string names none of the six options.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown analysis option {0:?}")]
pub struct UnknownAnalysis(pub String);

impl AnalysisOption {
    /// All options in selector order.
    pub const ALL: [Self; 6] = [
        Self::SummaryStatistics,
        Self::GenderDistribution,
        Self::CorrelationMatrix,
        Self::HeartRateByActivityLevel,
        Self::BloodPressureDistribution,
        Self::HealthMetricsByGender,
    ];

    /// Label shown in the selector.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SummaryStatistics => "Summary Statistics",
            Self::GenderDistribution => "Gender Distribution",
            Self::CorrelationMatrix => "Correlation Matrix",
            Self::HeartRateByActivityLevel => "Heart Rate by Activity Level",
            Self::BloodPressureDistribution => "Blood Pressure Distribution",
            Self::HealthMetricsByGender => "Health Metrics by Gender",
        }
    }

    /// Zero-based position in [`Self::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|&o| o == self)
            .unwrap_or_default()
    }

    /// Option at a zero-based position, if any.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Next option, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous option, wrapping around.
    #[must_use]
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for AnalysisOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AnalysisOption {
    type Err = UnknownAnalysis;

    /// Accepts the exact label (case-insensitive) or a 1-based index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(Self::from_index)
                .ok_or_else(|| UnknownAnalysis(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|o| o.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownAnalysis(s.to_string()))
    }
}
