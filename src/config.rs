//! Runtime configuration.
//!
//! There are no command-line flags. Everything has a default and can be
//! overridden through the environment:
//! - `VITALBOARD_DATA_PATH`: dataset location (default `healthmonitoring.csv`)
//! - `VITALBOARD_LOG_MODE`: `auto`, `file` or `stdout`
//! - `VITALBOARD_LOG_FILE`: log file used in file mode
//! - `VITALBOARD_INITIAL_ANALYSIS`: option label or 1-6 index shown at start-up

use std::path::PathBuf;

use crate::domain::AnalysisOption;

pub const DEFAULT_DATA_PATH: &str = "healthmonitoring.csv";
pub const DEFAULT_LOG_FILE: &str = "vitalboard.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal, stdout otherwise.
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "file" => Some(Self::File),
            "stdout" => Some(Self::Stdout),
            _ => None,
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    pub initial_analysis: AnalysisOption,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            initial_analysis: AnalysisOption::default(),
        }
    }
}

impl DashboardConfig {
    /// Load overrides from the process environment (best-effort).
    #[must_use]
    pub fn from_env_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// Invalid values are ignored with a warning; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("VITALBOARD_DATA_PATH") {
            cfg.data_path = PathBuf::from(v.trim());
        }

        if let Some(v) = get("VITALBOARD_LOG_MODE") {
            match LogMode::parse(&v) {
                Some(mode) => cfg.log_mode = mode,
                None => tracing::warn!("Ignoring unknown VITALBOARD_LOG_MODE {v:?}"),
            }
        }

        if let Some(v) = get("VITALBOARD_LOG_FILE") {
            cfg.log_file = PathBuf::from(v.trim());
        }

        if let Some(v) = get("VITALBOARD_INITIAL_ANALYSIS") {
            match v.parse::<AnalysisOption>() {
                Ok(option) => cfg.initial_analysis = option,
                Err(e) => tracing::warn!("Ignoring VITALBOARD_INITIAL_ANALYSIS: {e}"),
            }
        }

        cfg
    }
}
