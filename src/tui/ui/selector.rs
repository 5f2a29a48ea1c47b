//! Analysis selector: a single-select dropdown over the six options.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::domain::AnalysisOption;
use crate::tui::styles::DashboardTheme;

/// Dropdown state. `current` is what is rendered; `highlighted` is what
/// Enter would pick while the list is open.
#[derive(Debug, Clone, Default)]
pub struct SelectorState {
    pub current: AnalysisOption,
    pub highlighted: AnalysisOption,
    pub open: bool,
}

impl SelectorState {
    #[must_use]
    pub fn new(current: AnalysisOption) -> Self {
        Self {
            current,
            highlighted: current,
            open: false,
        }
    }

    pub fn open(&mut self) {
        self.highlighted = self.current;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn highlight_next(&mut self) {
        self.highlighted = self.highlighted.next();
    }

    pub fn highlight_prev(&mut self) {
        self.highlighted = self.highlighted.prev();
    }

    /// Close the list and make the highlighted option current.
    pub fn confirm(&mut self) -> AnalysisOption {
        self.open = false;
        self.current = self.highlighted;
        self.current
    }

    /// Select directly, closing the list if open.
    pub fn select(&mut self, option: AnalysisOption) {
        self.current = option;
        self.highlighted = option;
        self.open = false;
    }
}

/// Render the collapsed control showing the current option.
pub fn render_selector(f: &mut Frame, area: Rect, state: &SelectorState) {
    let arrow = if state.open { "▲" } else { "▼" };
    let border = if state.open {
        DashboardTheme::border_focused()
    } else {
        DashboardTheme::border()
    };

    let control = Paragraph::new(Line::from(vec![
        Span::styled(" ", DashboardTheme::text()),
        Span::styled(state.current.label(), DashboardTheme::title()),
        Span::styled(format!(" {arrow}"), DashboardTheme::key_hint()),
    ]))
    .block(
        Block::default()
            .title(Span::styled(
                " Select an analysis option ",
                DashboardTheme::text_secondary(),
            ))
            .borders(Borders::ALL)
            .border_style(border),
    );

    f.render_widget(control, area);
}

/// Render the open option list just below the control.
pub fn render_dropdown(f: &mut Frame, anchor: Rect, state: &SelectorState) {
    if !state.open {
        return;
    }

    let items: Vec<ListItem> = AnalysisOption::ALL
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let style = if *option == state.highlighted {
                DashboardTheme::selected()
            } else {
                DashboardTheme::text()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", i + 1), DashboardTheme::key_hint()),
                Span::styled(option.label(), style),
            ]))
        })
        .collect();

    let height = AnalysisOption::ALL.len() as u16 + 2;
    let popup = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(height), Constraint::Min(0)])
        .split(Rect {
            x: anchor.x,
            y: anchor.y + anchor.height,
            width: anchor.width.min(44),
            height: height.min(f.area().height.saturating_sub(anchor.y + anchor.height)),
        })[0];

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(DashboardTheme::border_focused()),
    );

    f.render_widget(Clear, popup);
    f.render_widget(list, popup);
}
