//! One layout per analysis report.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Row, Table, Wrap},
    Frame,
};

use super::charts::{
    fmt_stat, panel, render_box_plot, render_describe_table, render_distributions,
    render_heatmap, render_pie, Series,
};
use crate::application::{
    AnalysisReport, BloodPressureReport, GenderReport, MetricsByGenderReport, SummaryReport,
};
use crate::tui::styles::DashboardTheme;

/// Render a report and its notes into `area`.
pub fn render_report(f: &mut Frame, area: Rect, report: &AnalysisReport) {
    let notes = report.notes();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(notes.len() as u16 + 2),
        ])
        .split(area);

    match report {
        AnalysisReport::Summary(r) => render_summary(f, chunks[0], r),
        AnalysisReport::Gender(r) => render_gender(f, chunks[0], r),
        AnalysisReport::Correlation(r) => render_heatmap(f, chunks[0], r),
        AnalysisReport::HeartRateByActivity(plot) => render_box_plot(f, chunks[0], plot),
        AnalysisReport::BloodPressure(r) => render_blood_pressure(f, chunks[0], r),
        AnalysisReport::MetricsByGender(r) => render_metrics_by_gender(f, chunks[0], r),
    }

    render_notes(f, chunks[1], &notes);
}

fn render_notes(f: &mut Frame, area: Rect, notes: &[String]) {
    let lines: Vec<Line> = notes
        .iter()
        .map(|n| Line::from(Span::styled(n.as_str(), DashboardTheme::text_secondary())))
        .collect();
    let p = Paragraph::new(lines)
        .block(panel("Notes"))
        .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}

fn render_summary(f: &mut Frame, area: Rect, report: &SummaryReport) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(12), Constraint::Min(0)])
        .split(area);

    render_describe_table(f, chunks[0], &report.describe);

    // 3x2 grid; the sixth cell stays empty.
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(chunks[1]);
    let cells: Vec<Rect> = rows
        .iter()
        .flat_map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, 2); 2])
                .split(*row)
                .to_vec()
        })
        .collect();

    for (plot, cell) in report.distributions.iter().zip(cells) {
        render_distributions(
            f,
            cell,
            &plot.title,
            "",
            &[Series {
                plot,
                color: DashboardTheme::SERIES,
                label: None,
            }],
        );
    }
}

fn render_gender(f: &mut Frame, area: Rect, report: &GenderReport) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let percentages = report.percentages();
    let rows = report
        .counts
        .iter()
        .zip(&percentages)
        .map(|((label, count), (_, pct))| {
            Row::new(vec![label.clone(), count.to_string(), format!("{pct:.1}%")])
                .style(DashboardTheme::text())
        })
        .chain(std::iter::once(
            Row::new(vec![
                "Total".to_string(),
                report.total().to_string(),
                fmt_stat(percentages.iter().map(|(_, p)| p).sum(), 1) + "%",
            ])
            .style(DashboardTheme::text_secondary()),
        ));

    let table = Table::new(
        rows,
        [
            Constraint::Min(10),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(Row::new(vec!["Gender", "Count", "Share"]).style(DashboardTheme::subtitle()))
    .block(panel("Gender Counts"));
    f.render_widget(table, chunks[0]);

    render_pie(f, chunks[1], "Gender Distribution", &percentages);
}

fn render_blood_pressure(f: &mut Frame, area: Rect, report: &BloodPressureReport) {
    render_distributions(
        f,
        area,
        "Blood Pressure Distribution",
        "Blood Pressure (mmHg)",
        &[
            Series {
                plot: &report.systolic,
                color: DashboardTheme::SYSTOLIC,
                label: Some("Systolic"),
            },
            Series {
                plot: &report.diastolic,
                color: DashboardTheme::DIASTOLIC,
                label: Some("Diastolic"),
            },
        ],
    );
}

fn render_metrics_by_gender(f: &mut Frame, area: Rect, report: &MetricsByGenderReport) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2); 2])
        .split(area);

    render_box_plot(f, chunks[0], &report.heart_rate);
    render_box_plot(f, chunks[1], &report.oxygen_saturation);
}
