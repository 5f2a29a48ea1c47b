//! TUI module: Terminal User Interface using Ratatui.
//!
//! One screen: an analysis dropdown above the selected report.

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::DashboardTheme;
