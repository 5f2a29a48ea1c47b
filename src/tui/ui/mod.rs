//! UI module: View components for the TUI.

pub mod charts;
pub mod selector;
pub mod views;

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::application::ImputationSummary;
use crate::domain::AnalysisOption;
use crate::tui::styles::DashboardTheme;

pub fn render_title(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", DashboardTheme::text()),
        Span::styled("Health Monitoring Dashboard", DashboardTheme::title()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(DashboardTheme::border()),
    );

    f.render_widget(header, area);
}

/// Dataset line: source, row count, and what imputation filled.
pub fn render_status(f: &mut Frame, area: Rect, source: &str, summary: Option<&ImputationSummary>) {
    let mut spans = vec![
        Span::styled(" Data: ", DashboardTheme::text_secondary()),
        Span::styled(source.to_string(), DashboardTheme::text()),
    ];
    if let Some(s) = summary {
        spans.extend([
            Span::styled(format!("  {} rows", s.rows), DashboardTheme::text()),
            Span::styled("  │ BodyTemperature: ", DashboardTheme::text_secondary()),
            Span::styled(
                format!("{} filled with {:.2}", s.body_temperature_filled, s.body_temperature_median),
                DashboardTheme::text_muted(),
            ),
            Span::styled("  │ OxygenSaturation: ", DashboardTheme::text_secondary()),
            Span::styled(
                format!("{} filled with {:.2}", s.oxygen_saturation_filled, s.oxygen_saturation_median),
                DashboardTheme::text_muted(),
            ),
        ]);
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Shown in place of the charts when an analysis could not be rendered.
pub fn render_error(f: &mut Frame, area: Rect, option: AnalysisOption, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("! Cannot render {option}"),
            DashboardTheme::danger(),
        )),
        Line::from(""),
        Line::from(Span::styled(message, DashboardTheme::text())),
        Line::from(""),
        Line::from(Span::styled(
            "Correct the data file and press [R] to retry.",
            DashboardTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(DashboardTheme::danger()),
    );

    f.render_widget(content, area);
}

pub fn render_footer(f: &mut Frame, area: Rect, dropdown_open: bool) {
    let content = if dropdown_open {
        Line::from(vec![
            Span::styled("[↑/↓] ", DashboardTheme::key_hint()),
            Span::styled("Move ", DashboardTheme::key_desc()),
            Span::styled("[Enter] ", DashboardTheme::key_hint()),
            Span::styled("Select ", DashboardTheme::key_desc()),
            Span::styled("[Esc] ", DashboardTheme::key_hint()),
            Span::styled("Close", DashboardTheme::key_desc()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[Enter] ", DashboardTheme::key_hint()),
            Span::styled("Choose analysis ", DashboardTheme::key_desc()),
            Span::styled("[1-6] ", DashboardTheme::key_hint()),
            Span::styled("Jump ", DashboardTheme::key_desc()),
            Span::styled("[R] ", DashboardTheme::key_hint()),
            Span::styled("Reload ", DashboardTheme::key_desc()),
            Span::styled("[Q] ", DashboardTheme::key_hint()),
            Span::styled("Quit", DashboardTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(DashboardTheme::border()),
    );

    f.render_widget(footer, area);
}
