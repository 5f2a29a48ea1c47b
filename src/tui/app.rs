//! Main TUI application state machine.
//!
//! Handles:
//! - Analysis selection through the dropdown or number keys
//! - Reloading the dataset for every selection
//! - Rendering the active report or the load error

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use crate::adapters::csv::CsvRecordSource;
use crate::application::{AnalysisOutcome, AnalyticsService};
use crate::config::DashboardConfig;
use crate::domain::AnalysisOption;

use super::ui::{
    render_error, render_footer, render_status, render_title,
    selector::{render_dropdown, render_selector, SelectorState},
    views::render_report,
};

/// What the content area currently shows.
#[derive(Debug, Default)]
enum ViewState {
    #[default]
    Empty,
    Ready(Box<AnalysisOutcome>),
    Error {
        option: AnalysisOption,
        message: String,
    },
}

/// Main application state
pub struct App {
    /// Whether the app should quit
    should_quit: bool,

    /// Dataset-backed analytics
    service: AnalyticsService<CsvRecordSource>,

    /// Display name of the data file, shown when no outcome is available
    source: String,

    selector: SelectorState,

    view: ViewState,
}

impl App {
    /// Create an application for an explicit configuration and run the
    /// initial analysis.
    ///
    /// Load failures are not returned; they are shown in the content area.
    ///
    /// # Errors
    /// Reserved for setup failures outside the dataset.
    pub fn with_config(config: DashboardConfig) -> Result<Self> {
        let source = Arc::new(CsvRecordSource::new(config.data_path.clone()));
        let mut app = Self {
            should_quit: false,
            source: config.data_path.display().to_string(),
            service: AnalyticsService::new(source),
            selector: SelectorState::new(config.initial_analysis),
            view: ViewState::Empty,
        };
        app.select(config.initial_analysis);
        Ok(app)
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Draw the whole dashboard into one frame.
    pub fn draw(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(f.area());

        render_title(f, chunks[0]);

        match &self.view {
            ViewState::Ready(outcome) => {
                render_status(f, chunks[1], &outcome.source, Some(&outcome.imputation));
                render_report(f, chunks[3], &outcome.report);
            }
            ViewState::Error { option, message } => {
                render_status(f, chunks[1], &self.source, None);
                render_error(f, chunks[3], *option, message);
            }
            ViewState::Empty => render_status(f, chunks[1], &self.source, None),
        }

        render_selector(f, chunks[2], &self.selector);
        render_footer(f, chunks[4], self.selector.open);

        // Drawn last so the list overlays the report.
        render_dropdown(f, chunks[2], &self.selector);
    }

    /// Whether a quit key has been pressed.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Option currently displayed.
    #[must_use]
    pub fn current(&self) -> AnalysisOption {
        self.selector.current
    }

    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.selector.open {
            self.handle_dropdown_key(key);
        } else {
            self.handle_dashboard_key(key);
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Char(' ') => self.selector.open(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.select(self.selector.current),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char(c) => {
                if let Some(option) = digit_option(c) {
                    self.select(option);
                }
            }
            _ => {}
        }
    }

    fn handle_dropdown_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.selector.close(),
            KeyCode::Up => self.selector.highlight_prev(),
            KeyCode::Down | KeyCode::Tab => self.selector.highlight_next(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let option = self.selector.confirm();
                self.select(option);
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char(c) => {
                if let Some(option) = digit_option(c) {
                    self.select(option);
                }
            }
            _ => {}
        }
    }

    /// Reload the data file and render `option`.
    fn select(&mut self, option: AnalysisOption) {
        self.selector.select(option);

        self.view = match self.service.run(option) {
            Ok(outcome) => ViewState::Ready(Box::new(outcome)),
            Err(e) => {
                tracing::error!("Failed to render {option}: {e}");
                ViewState::Error {
                    option,
                    message: e.to_string(),
                }
            }
        };
    }
}

fn digit_option(c: char) -> Option<AnalysisOption> {
    let index = c.to_digit(10)? as usize;
    AnalysisOption::from_index(index.checked_sub(1)?)
}
