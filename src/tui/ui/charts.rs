//! Chart widgets shared by the analysis views.
//!
//! Histograms and density curves use `Chart`; box plots and the pie chart
//! are painted on a `Canvas`; the describe table and the heatmap are tables.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points, Rectangle},
        Axis, Block, Borders, Cell, Chart, Dataset, GraphType, LegendPosition, Row, Table,
    },
    Frame,
};

use crate::application::stats::Describe;
use crate::application::{CorrelationReport, DistributionPlot, GroupedBoxPlot};
use crate::domain::NumericColumn;
use crate::tui::styles::DashboardTheme;

/// Bar samples drawn across each histogram bin.
const BAR_SAMPLES_PER_BIN: usize = 4;

/// Pie sampling grid resolution per axis.
const PIE_GRID: usize = 120;

pub fn panel(title: &str) -> Block<'static> {
    Block::default()
        .title(Span::styled(format!(" {title} "), DashboardTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(DashboardTheme::border())
}

/// Format a statistic; NaN prints as `NaN`.
#[must_use]
pub fn fmt_stat(value: f64, precision: usize) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.precision$}")
    }
}

fn axis_labels(lo: f64, hi: f64) -> Vec<Span<'static>> {
    let precision = if hi - lo < 10.0 { 1 } else { 0 };
    [lo, (lo + hi) / 2.0, hi]
        .into_iter()
        .map(|v| Span::styled(fmt_stat(v, precision), DashboardTheme::axis()))
        .collect()
}

fn bar_points(plot: &DistributionPlot) -> Vec<(f64, f64)> {
    let h = &plot.histogram;
    let mut points = Vec::with_capacity(h.counts.len() * BAR_SAMPLES_PER_BIN);
    for (i, &count) in h.counts.iter().enumerate() {
        let (lo, hi) = (h.edges[i], h.edges[i + 1]);
        let step = (hi - lo) / BAR_SAMPLES_PER_BIN as f64;
        for s in 0..BAR_SAMPLES_PER_BIN {
            points.push((lo + step * (s as f64 + 0.5), count as f64));
        }
    }
    points
}

/// One histogram series with its density overlay.
pub struct Series<'a> {
    pub plot: &'a DistributionPlot,
    pub color: Color,
    /// Legend entry; `None` hides the legend for this series
    pub label: Option<&'a str>,
}

/// Render one or more histograms with density curves on shared axes.
pub fn render_distributions(
    f: &mut Frame,
    area: Rect,
    title: &str,
    x_title: &str,
    series: &[Series<'_>],
) {
    if series.is_empty() {
        return;
    }

    let bars: Vec<Vec<(f64, f64)>> = series.iter().map(|s| bar_points(s.plot)).collect();
    let outlines: Vec<Vec<(f64, f64)>> = series.iter().map(|s| s.plot.histogram.outline()).collect();

    let (mut x_lo, mut x_hi, mut y_hi) = (f64::INFINITY, f64::NEG_INFINITY, 1.0_f64);
    for s in series {
        let (lo, hi) = s.plot.x_range();
        x_lo = x_lo.min(lo);
        x_hi = x_hi.max(hi);
        y_hi = y_hi.max(s.plot.y_max());
    }
    y_hi *= 1.05;

    let mut datasets = Vec::with_capacity(series.len() * 3);
    for (i, s) in series.iter().enumerate() {
        let style = Style::default().fg(s.color);
        let mut bar = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Bar)
            .style(style)
            .data(&bars[i]);
        if let Some(label) = s.label {
            bar = bar.name(label.to_string());
        }
        datasets.push(bar);
        datasets.push(
            Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(style)
                .data(&outlines[i]),
        );
        if !s.plot.density.is_empty() {
            let curve_color = if series.len() == 1 {
                DashboardTheme::DENSITY
            } else {
                s.color
            };
            datasets.push(
                Dataset::default()
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(curve_color))
                    .data(&s.plot.density),
            );
        }
    }

    let show_legend = series.iter().any(|s| s.label.is_some());
    let chart = Chart::new(datasets)
        .block(panel(title))
        .x_axis(
            Axis::default()
                .title(Span::styled(x_title.to_string(), DashboardTheme::text_muted()))
                .style(DashboardTheme::axis())
                .bounds([x_lo, x_hi])
                .labels(axis_labels(x_lo, x_hi)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Count", DashboardTheme::text_muted()))
                .style(DashboardTheme::axis())
                .bounds([0.0, y_hi])
                .labels(axis_labels(0.0, y_hi)),
        )
        .legend_position(show_legend.then_some(LegendPosition::TopRight))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));

    f.render_widget(chart, area);
}

/// Render grouped box plots: box at the quartiles, median bar, whiskers
/// at 1.5 IQR, and outliers as points.
pub fn render_box_plot(f: &mut Frame, area: Rect, plot: &GroupedBoxPlot) {
    let (lo, hi) = plot.extent();
    if !lo.is_finite() || !hi.is_finite() {
        f.render_widget(panel(&plot.title), area);
        return;
    }
    let pad = ((hi - lo) * 0.1).max(1.0);
    let (y_lo, y_hi) = (lo - pad, hi + pad);
    let groups = plot.groups.len() as f64;

    let outliers: Vec<Vec<(f64, f64)>> = plot
        .groups
        .iter()
        .enumerate()
        .map(|(i, (_, b))| b.outliers.iter().map(|&o| (i as f64 + 0.5, o)).collect())
        .collect();

    let block = panel(&plot.title).title_bottom(Span::styled(
        format!(" x: {} │ y: {} ", plot.x_label, plot.y_label),
        DashboardTheme::text_muted(),
    ));

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, groups])
        .y_bounds([y_lo, y_hi])
        .paint(|ctx| {
            for (i, (label, b)) in plot.groups.iter().enumerate() {
                let color = DashboardTheme::GROUPS[i % DashboardTheme::GROUPS.len()];
                let center = i as f64 + 0.5;
                let half = 0.3;
                let cap = half / 2.0;

                ctx.draw(&Rectangle {
                    x: center - half,
                    y: b.q1,
                    width: half * 2.0,
                    height: b.iqr(),
                    color,
                });
                ctx.draw(&CanvasLine {
                    x1: center - half,
                    y1: b.median,
                    x2: center + half,
                    y2: b.median,
                    color: DashboardTheme::TEXT_PRIMARY,
                });
                for (from, to) in [(b.q1, b.lower_whisker), (b.q3, b.upper_whisker)] {
                    ctx.draw(&CanvasLine {
                        x1: center,
                        y1: from,
                        x2: center,
                        y2: to,
                        color,
                    });
                    ctx.draw(&CanvasLine {
                        x1: center - cap,
                        y1: to,
                        x2: center + cap,
                        y2: to,
                        color,
                    });
                }
                ctx.draw(&Points {
                    coords: &outliers[i],
                    color,
                });
                ctx.print(
                    center - half,
                    y_lo,
                    Span::styled(label.clone(), DashboardTheme::text()),
                );
            }
            ctx.layer();
            for v in [lo, (lo + hi) / 2.0, hi] {
                ctx.print(0.0, v, Span::styled(fmt_stat(v, 1), DashboardTheme::axis()));
            }
        });

    f.render_widget(canvas, area);
}

/// Slice index for a point at `angle_deg`, with slices laid out
/// counter-clockwise from 90 degrees.
fn slice_at(angle_deg: f64, cumulative: &[f64]) -> usize {
    let rel = (angle_deg - 90.0).rem_euclid(360.0) / 360.0;
    cumulative
        .iter()
        .position(|&end| rel < end)
        .unwrap_or(cumulative.len().saturating_sub(1))
}

/// Render a pie chart of (label, percent) slices.
pub fn render_pie(f: &mut Frame, area: Rect, title: &str, slices: &[(String, f64)]) {
    let total: f64 = slices.iter().map(|(_, p)| p).sum();
    if slices.is_empty() || total <= 0.0 {
        f.render_widget(panel(title), area);
        return;
    }

    let mut cumulative = Vec::with_capacity(slices.len());
    let mut acc = 0.0;
    for (_, pct) in slices {
        acc += pct / total;
        cumulative.push(acc);
    }

    let mut filled: Vec<Vec<(f64, f64)>> = vec![Vec::new(); slices.len()];
    let step = 2.0 / PIE_GRID as f64;
    for gx in 0..=PIE_GRID {
        for gy in 0..=PIE_GRID {
            let (x, y) = (-1.0 + step * gx as f64, -1.0 + step * gy as f64);
            if x * x + y * y > 1.0 {
                continue;
            }
            let idx = slice_at(y.atan2(x).to_degrees(), &cumulative);
            filled[idx].push((x, y));
        }
    }

    let labels: Vec<(f64, f64, String, f64)> = slices
        .iter()
        .enumerate()
        .map(|(i, (label, pct))| {
            let start = if i == 0 { 0.0 } else { cumulative[i - 1] };
            let mid = (90.0 + (start + cumulative[i]) / 2.0 * 360.0).to_radians();
            (mid.cos(), mid.sin(), label.clone(), *pct)
        })
        .collect();

    let canvas = Canvas::default()
        .block(panel(title))
        .marker(Marker::Braille)
        .x_bounds([-1.4, 1.4])
        .y_bounds([-1.4, 1.4])
        .paint(|ctx| {
            for (i, coords) in filled.iter().enumerate() {
                ctx.draw(&Points {
                    coords,
                    color: DashboardTheme::pie_slice(i, filled.len()),
                });
            }
            ctx.layer();
            for (cx, cy, label, pct) in &labels {
                ctx.print(
                    cx * 0.5 - 0.15,
                    cy * 0.5,
                    Span::styled(format!("{pct:.1}%"), Style::default().fg(DashboardTheme::BG_DARK)),
                );
                ctx.print(
                    cx * 1.15 - 0.15,
                    cy * 1.15,
                    Span::styled(label.clone(), DashboardTheme::text()),
                );
            }
        });

    f.render_widget(canvas, area);
}

/// Describe table: one row per statistic, one column per numeric field.
pub fn render_describe_table(f: &mut Frame, area: Rect, rows: &[(NumericColumn, Describe)]) {
    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(rows.iter().map(|(c, _)| Cell::from(c.name()))),
    )
    .style(DashboardTheme::subtitle());

    let body = Describe::LABELS.iter().enumerate().map(|(stat, label)| {
        let precision = if stat == 0 { 0 } else { 2 };
        Row::new(
            std::iter::once(Cell::from(*label).style(DashboardTheme::text_secondary())).chain(
                rows.iter()
                    .map(|(_, d)| Cell::from(fmt_stat(d.values()[stat], precision))),
            ),
        )
        .style(DashboardTheme::text())
    });

    let widths = std::iter::once(Constraint::Length(6))
        .chain(rows.iter().map(|_| Constraint::Min(10)));

    let table = Table::new(body, widths)
        .header(header)
        .block(panel("Summary Statistics"))
        .column_spacing(1);
    f.render_widget(table, area);
}

/// Annotated correlation heatmap.
pub fn render_heatmap(f: &mut Frame, area: Rect, report: &CorrelationReport) {
    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(report.columns.iter().map(|c| Cell::from(c.name()))),
    )
    .style(DashboardTheme::subtitle());

    let body = report.columns.iter().zip(&report.matrix).map(|(column, row)| {
        Row::new(
            std::iter::once(Cell::from(column.name()).style(DashboardTheme::text_secondary()))
                .chain(row.iter().map(|&r| {
                    Cell::from(format!(" {}", fmt_stat(r, 2))).style(
                        Style::default()
                            .bg(DashboardTheme::coolwarm(r))
                            .fg(DashboardTheme::coolwarm_text(r)),
                    )
                })),
        )
        .height(2)
    });

    let widths = std::iter::once(Constraint::Length(17))
        .chain(report.columns.iter().map(|_| Constraint::Length(17)));

    let table = Table::new(body, widths)
        .header(header)
        .block(panel("Correlation Matrix"))
        .column_spacing(0);
    f.render_widget(table, area);
}
