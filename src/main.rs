//! Vitalboard: health monitoring dashboard.
//!
//! Main entry point for the terminal application.

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vitalboard::adapters::sanitize::SanitizingMakeWriter;
use vitalboard::tui::App;
use vitalboard::DashboardConfig;

fn main() -> Result<()> {
    let config = DashboardConfig::from_env_or_default();

    // Logging to the terminal would corrupt the alternate screen, so an
    // interactive session logs to a file unless told otherwise.
    let interactive = std::io::stdout().is_terminal();

    let (writer, _guard) = if config.log_mode.use_file(interactive) {
        if let Some(parent) = config.log_file.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    // Warnings about ignored overrides fire during parsing; parse again now
    // that they have somewhere to go.
    let config = DashboardConfig::from_env_or_default();

    tracing::info!("Starting Vitalboard with {}", config.data_path.display());

    let mut app = App::with_config(config)?;
    app.run()?;

    tracing::info!("Vitalboard shutdown complete.");
    Ok(())
}
