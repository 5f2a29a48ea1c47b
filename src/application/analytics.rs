//! Analytics service: the six dashboard analyses.
//!
//! Each analysis is a plain function of the loaded table that returns a
//! report value; the TUI turns reports into charts. Only the blood pressure
//! analysis touches the table, adding the derived systolic/diastolic columns.

use std::sync::Arc;

use crate::adapters::DatasetError;
use crate::application::loader::{DatasetLoader, ImputationSummary};
use crate::application::stats::{self, BinRule, BoxStats, Describe, Histogram};
use crate::domain::{AnalysisOption, HealthRecord, HealthTable, NumericColumn};
use crate::ports::RecordSource;
use crate::VitalboardError;

/// Number of points the density curves are evaluated at.
const DENSITY_POINTS: usize = 200;

/// Correlations below this magnitude are reported as "close to zero".
const WEAK_CORRELATION: f64 = 0.3;

/// Histogram with a density curve scaled to bar height.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionPlot {
    pub title: String,
    pub histogram: Histogram,
    /// (x, expected count per bin); empty when the data has no spread
    pub density: Vec<(f64, f64)>,
}

impl DistributionPlot {
    fn new(title: impl Into<String>, values: &[f64], rule: BinRule) -> Option<Self> {
        let histogram = stats::histogram(values, rule)?;
        let scale = values.len() as f64 * histogram.bin_width();
        let density = stats::gaussian_kde(values, DENSITY_POINTS)
            .into_iter()
            .map(|(x, d)| (x, d * scale))
            .collect();
        Some(Self {
            title: title.into(),
            histogram,
            density,
        })
    }

    /// Highest y value of either bars or curve.
    #[must_use]
    pub fn y_max(&self) -> f64 {
        self.density
            .iter()
            .map(|&(_, y)| y)
            .fold(self.histogram.max_count() as f64, f64::max)
    }

    #[must_use]
    pub fn x_range(&self) -> (f64, f64) {
        let edges = &self.histogram.edges;
        (edges[0], edges[edges.len() - 1])
    }
}

/// Summary Statistics: describe table plus five distributions.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    pub describe: Vec<(NumericColumn, Describe)>,
    /// Age, HeartRate, RespiratoryRate, BodyTemperature, OxygenSaturation
    pub distributions: Vec<DistributionPlot>,
}

/// Gender Distribution: value counts, most frequent first.
#[derive(Debug, Clone, PartialEq)]
pub struct GenderReport {
    pub counts: Vec<(String, usize)>,
}

impl GenderReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    /// Share of each value in percent; sums to 100.
    #[must_use]
    pub fn percentages(&self) -> Vec<(String, f64)> {
        let total = self.total() as f64;
        self.counts
            .iter()
            .map(|(label, n)| (label.clone(), *n as f64 / total * 100.0))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationReport {
    pub columns: Vec<NumericColumn>,
    pub matrix: Vec<Vec<f64>>,
}

impl CorrelationReport {
    /// Off-diagonal pair with the largest absolute coefficient.
    #[must_use]
    pub fn strongest_pair(&self) -> Option<(NumericColumn, NumericColumn, f64)> {
        let mut best: Option<(NumericColumn, NumericColumn, f64)> = None;
        for (i, row) in self.matrix.iter().enumerate() {
            for (j, &r) in row.iter().enumerate().skip(i + 1) {
                if r.is_nan() {
                    continue;
                }
                if best.map_or(true, |(_, _, b)| r.abs() > b.abs()) {
                    best = Some((self.columns[i], self.columns[j], r));
                }
            }
        }
        best
    }
}

/// Box plots of one numeric column split by a category.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedBoxPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Groups in order of first appearance
    pub groups: Vec<(String, BoxStats)>,
}

impl GroupedBoxPlot {
    fn new<K>(
        table: &HealthTable,
        key: K,
        column: NumericColumn,
        title: &str,
        x_label: &str,
        y_label: &str,
    ) -> Self
    where
        K: Fn(&HealthRecord) -> Option<&str>,
    {
        let groups = table
            .group_by(key, column)
            .into_iter()
            .filter_map(|(label, values)| stats::box_stats(&values).map(|b| (label, b)))
            .collect();
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            groups,
        }
    }

    /// Lowest and highest drawn value across all groups.
    #[must_use]
    pub fn extent(&self) -> (f64, f64) {
        self.groups
            .iter()
            .map(|(_, b)| b.extent())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (l, h)| {
                (lo.min(l), hi.max(h))
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BloodPressureReport {
    pub systolic: DistributionPlot,
    pub diastolic: DistributionPlot,
    pub systolic_std: f64,
    pub diastolic_std: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsByGenderReport {
    pub heart_rate: GroupedBoxPlot,
    pub oxygen_saturation: GroupedBoxPlot,
}

/// Result of one analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisReport {
    Summary(SummaryReport),
    Gender(GenderReport),
    Correlation(CorrelationReport),
    HeartRateByActivity(GroupedBoxPlot),
    BloodPressure(BloodPressureReport),
    MetricsByGender(MetricsByGenderReport),
}

impl AnalysisReport {
    #[must_use]
    pub fn option(&self) -> AnalysisOption {
        match self {
            Self::Summary(_) => AnalysisOption::SummaryStatistics,
            Self::Gender(_) => AnalysisOption::GenderDistribution,
            Self::Correlation(_) => AnalysisOption::CorrelationMatrix,
            Self::HeartRateByActivity(_) => AnalysisOption::HeartRateByActivityLevel,
            Self::BloodPressure(_) => AnalysisOption::BloodPressureDistribution,
            Self::MetricsByGender(_) => AnalysisOption::HealthMetricsByGender,
        }
    }

    /// Explanatory text shown under the charts.
    #[must_use]
    pub fn notes(&self) -> Vec<String> {
        match self {
            Self::Summary(_) => vec![
                "Distributions of the numeric features after median imputation.".to_string(),
            ],
            Self::Gender(report) => gender_notes(report),
            Self::Correlation(report) => correlation_notes(report),
            Self::HeartRateByActivity(plot) => {
                let mut notes = median_notes(plot, "bpm");
                notes.push(
                    "Boxes span the interquartile range; points beyond the whiskers lie more than 1.5 IQR from the box."
                        .to_string(),
                );
                notes
            }
            Self::BloodPressure(report) => {
                let spread = if report.systolic_std > report.diastolic_std {
                    "broader"
                } else {
                    "narrower"
                };
                vec![
                    format!(
                        "Systolic readings (std {:.1} mmHg) are spread {spread} than diastolic readings (std {:.1} mmHg).",
                        report.systolic_std, report.diastolic_std
                    ),
                    "A systolic reading around 120 mmHg with a diastolic reading around 80 mmHg is considered normal."
                        .to_string(),
                ]
            }
            Self::MetricsByGender(report) => {
                let mut notes = median_notes(&report.heart_rate, "bpm");
                notes.extend(median_notes(&report.oxygen_saturation, "%"));
                notes
            }
        }
    }
}

fn gender_notes(report: &GenderReport) -> Vec<String> {
    match report.percentages().first() {
        Some((label, pct)) if *pct > 50.0 => {
            vec![format!("{label} comprising a majority at {pct:.1}%.")]
        }
        Some(_) => vec!["No single gender forms a majority.".to_string()],
        None => Vec::new(),
    }
}

fn correlation_notes(report: &CorrelationReport) -> Vec<String> {
    match report.strongest_pair() {
        Some((_, _, r)) if r.abs() < WEAK_CORRELATION => vec![
            "The correlation matrix shows no strong correlations between the variables, as all the values are close to zero."
                .to_string(),
        ],
        Some((a, b, r)) => vec![format!(
            "Strongest relationship: {} and {} (r = {r:.2}).",
            a.title(),
            b.title()
        )],
        None => vec!["Correlations are undefined for columns without variance.".to_string()],
    }
}

fn median_notes(plot: &GroupedBoxPlot, unit: &str) -> Vec<String> {
    let medians: Vec<String> = plot
        .groups
        .iter()
        .map(|(label, b)| format!("{label} {:.1} {unit}", b.median))
        .collect();
    let outliers: usize = plot.groups.iter().map(|(_, b)| b.outliers.len()).sum();
    vec![format!(
        "{}: medians {}; {outliers} outlier(s).",
        plot.title,
        medians.join(", ")
    )]
}

fn summary_statistics(table: &HealthTable) -> Result<SummaryReport, VitalboardError> {
    let mut describe = Vec::with_capacity(NumericColumn::ALL.len());
    let mut distributions = Vec::with_capacity(NumericColumn::ALL.len());

    for column in NumericColumn::ALL {
        let values = table.column(column);
        let d = stats::describe(&values).ok_or(VitalboardError::EmptyDataset)?;
        describe.push((column, d));

        let bins = match column {
            NumericColumn::OxygenSaturation => 10,
            _ => 20,
        };
        let plot = DistributionPlot::new(
            format!("{} Distribution", column.title()),
            &values,
            BinRule::Count(bins),
        )
        .ok_or(VitalboardError::EmptyDataset)?;
        distributions.push(plot);
    }

    Ok(SummaryReport {
        describe,
        distributions,
    })
}

fn gender_distribution(table: &HealthTable) -> GenderReport {
    GenderReport {
        counts: stats::value_counts(table.records().iter().map(|r| r.gender.as_deref())),
    }
}

fn correlation_matrix(table: &HealthTable) -> CorrelationReport {
    let columns = NumericColumn::ALL.to_vec();
    let data: Vec<Vec<f64>> = columns.iter().map(|&c| table.column(c)).collect();
    CorrelationReport {
        matrix: stats::correlation_matrix(&data),
        columns,
    }
}

fn heart_rate_by_activity(table: &HealthTable) -> GroupedBoxPlot {
    GroupedBoxPlot::new(
        table,
        |r| r.activity_level.as_deref(),
        NumericColumn::HeartRate,
        "Heart Rate by Activity Level",
        "Activity Level",
        "Heart Rate (beats per minute)",
    )
}

fn blood_pressure_distribution(
    table: &mut HealthTable,
) -> Result<BloodPressureReport, VitalboardError> {
    let readings = table.split_blood_pressure()?;
    let systolic: Vec<f64> = readings.iter().map(|bp| f64::from(bp.systolic)).collect();
    let diastolic: Vec<f64> = readings.iter().map(|bp| f64::from(bp.diastolic)).collect();

    Ok(BloodPressureReport {
        systolic: DistributionPlot::new("Systolic", &systolic, BinRule::Auto)
            .ok_or(VitalboardError::EmptyDataset)?,
        diastolic: DistributionPlot::new("Diastolic", &diastolic, BinRule::Auto)
            .ok_or(VitalboardError::EmptyDataset)?,
        systolic_std: stats::sample_std(&systolic).unwrap_or(f64::NAN),
        diastolic_std: stats::sample_std(&diastolic).unwrap_or(f64::NAN),
    })
}

fn health_metrics_by_gender(table: &HealthTable) -> MetricsByGenderReport {
    MetricsByGenderReport {
        heart_rate: GroupedBoxPlot::new(
            table,
            |r| r.gender.as_deref(),
            NumericColumn::HeartRate,
            "Heart Rate by Gender",
            "Gender",
            "Heart Rate (beats per minute)",
        ),
        oxygen_saturation: GroupedBoxPlot::new(
            table,
            |r| r.gender.as_deref(),
            NumericColumn::OxygenSaturation,
            "Oxygen Saturation by Gender",
            "Gender",
            "Oxygen Saturation (%)",
        ),
    }
}

/// Run one analysis against an already loaded table.
///
/// # Errors
/// Returns error if the table is empty or, for the blood pressure analysis,
/// a reading is malformed.
pub fn analyze(
    option: AnalysisOption,
    table: &mut HealthTable,
) -> Result<AnalysisReport, VitalboardError> {
    if table.is_empty() {
        return Err(VitalboardError::EmptyDataset);
    }
    let report = match option {
        AnalysisOption::SummaryStatistics => AnalysisReport::Summary(summary_statistics(table)?),
        AnalysisOption::GenderDistribution => AnalysisReport::Gender(gender_distribution(table)),
        AnalysisOption::CorrelationMatrix => AnalysisReport::Correlation(correlation_matrix(table)),
        AnalysisOption::HeartRateByActivityLevel => {
            AnalysisReport::HeartRateByActivity(heart_rate_by_activity(table))
        }
        AnalysisOption::BloodPressureDistribution => {
            AnalysisReport::BloodPressure(blood_pressure_distribution(table)?)
        }
        AnalysisOption::HealthMetricsByGender => {
            AnalysisReport::MetricsByGender(health_metrics_by_gender(table))
        }
    };
    Ok(report)
}

/// A finished analysis together with what the loader did.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub report: AnalysisReport,
    pub imputation: ImputationSummary,
    pub source: String,
}

/// Service for running dashboard analyses against a record source.
pub struct AnalyticsService<S>
where
    S: RecordSource,
{
    loader: DatasetLoader<S>,
}

impl<S> AnalyticsService<S>
where
    S: RecordSource,
    S::Error: Into<DatasetError>,
{
    /// Create a new analytics service.
    pub fn new(source: Arc<S>) -> Self {
        Self {
            loader: DatasetLoader::new(source),
        }
    }

    /// Reload the dataset and run the selected analysis.
    ///
    /// Every call starts from a fresh read of the source.
    ///
    /// # Errors
    /// Returns error if loading, imputation, or the analysis fails.
    pub fn run(&self, option: AnalysisOption) -> Result<AnalysisOutcome, VitalboardError> {
        let (mut table, imputation) = self.loader.load()?;
        let report = analyze(option, &mut table)?;

        tracing::info!("Rendered {option} over {} records", table.len());

        Ok(AnalysisOutcome {
            report,
            imputation,
            source: self.loader.source_name(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawHealthRecord;

    fn record(id: u32, gender: &str, hr: u32, spo2: f64, bp: &str, activity: &str) -> HealthRecord {
        HealthRecord {
            patient_id: id.to_string(),
            age: 20 + id * 3,
            gender: Some(gender.to_string()),
            heart_rate: hr,
            respiratory_rate: 12 + id % 7,
            body_temperature: 36.0 + f64::from(id % 10) / 10.0,
            oxygen_saturation: spo2,
            blood_pressure: bp.to_string(),
            activity_level: Some(activity.to_string()),
        }
    }

    fn sample_table() -> HealthTable {
        let activities = ["resting", "walking", "running"];
        let records = (0..30)
            .map(|i| {
                let gender = if i % 5 < 3 { "Male" } else { "Female" };
                let bp = format!("{}/{}", 110 + (i * 7) % 40, 70 + (i * 3) % 20);
                record(
                    i,
                    gender,
                    60 + (i * 11) % 50,
                    94.0 + f64::from((i * 13) % 6),
                    &bp,
                    activities[(i % 3) as usize],
                )
            })
            .collect();
        HealthTable::new(records)
    }

    #[test]
    fn test_every_option_produces_its_report() {
        for option in AnalysisOption::ALL {
            let mut table = sample_table();
            let report = analyze(option, &mut table).expect("Should analyze");
            assert_eq!(report.option(), option);
            assert!(!report.notes().is_empty());
        }
    }

    #[test]
    fn test_summary_statistics_shape() {
        let mut table = sample_table();
        let AnalysisReport::Summary(report) =
            analyze(AnalysisOption::SummaryStatistics, &mut table).expect("Should analyze")
        else {
            panic!("wrong report");
        };
        assert_eq!(report.describe.len(), 5);
        assert_eq!(report.distributions.len(), 5);
        assert_eq!(report.distributions[0].histogram.counts.len(), 20);
        assert_eq!(report.distributions[4].histogram.counts.len(), 10);
        assert!(report.describe.iter().all(|(_, d)| d.count == 30));
    }

    #[test]
    fn test_gender_percentages_sum_to_100() {
        let mut table = sample_table();
        let AnalysisReport::Gender(report) =
            analyze(AnalysisOption::GenderDistribution, &mut table).expect("Should analyze")
        else {
            panic!("wrong report");
        };
        assert_eq!(report.counts[0], ("Male".to_string(), 18));
        let sum: f64 = report.percentages().iter().map(|(_, p)| p).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert_eq!(gender_notes(&report)[0], "Male comprising a majority at 60.0%.");
    }

    #[test]
    fn test_blank_gender_is_not_a_category() {
        let mut records = sample_table().records().to_vec();
        records.truncate(4);
        records[1].gender = None;
        let mut table = HealthTable::new(records);

        let AnalysisReport::Gender(report) =
            analyze(AnalysisOption::GenderDistribution, &mut table).expect("Should analyze")
        else {
            panic!("wrong report");
        };
        assert_eq!(
            report.counts,
            vec![("Male".to_string(), 2), ("Female".to_string(), 1)]
        );
        let sum: f64 = report.percentages().iter().map(|(_, p)| p).sum();
        assert!((sum - 100.0).abs() < 1e-9);

        let AnalysisReport::MetricsByGender(metrics) =
            analyze(AnalysisOption::HealthMetricsByGender, &mut table).expect("Should analyze")
        else {
            panic!("wrong report");
        };
        assert!(metrics.heart_rate.groups.iter().all(|(label, _)| !label.is_empty()));
        assert_eq!(
            metrics.heart_rate.groups.iter().map(|(_, b)| b.count).sum::<usize>(),
            3
        );
    }

    #[test]
    fn test_correlation_matrix_properties() {
        let mut table = sample_table();
        let AnalysisReport::Correlation(report) =
            analyze(AnalysisOption::CorrelationMatrix, &mut table).expect("Should analyze")
        else {
            panic!("wrong report");
        };
        for i in 0..5 {
            assert_eq!(report.matrix[i][i], 1.0);
            for j in 0..5 {
                assert_eq!(report.matrix[i][j], report.matrix[j][i]);
            }
        }
    }

    #[test]
    fn test_heart_rate_groups_follow_data_order() {
        let mut table = sample_table();
        let AnalysisReport::HeartRateByActivity(plot) =
            analyze(AnalysisOption::HeartRateByActivityLevel, &mut table).expect("Should analyze")
        else {
            panic!("wrong report");
        };
        let labels: Vec<_> = plot.groups.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, ["resting", "walking", "running"]);
        assert!(plot.groups.iter().all(|(_, b)| b.count == 10));
    }

    #[test]
    fn test_blood_pressure_adds_columns() {
        let mut table = sample_table();
        assert!(table.blood_pressure().is_none());
        analyze(AnalysisOption::BloodPressureDistribution, &mut table).expect("Should analyze");
        let split = table.blood_pressure().expect("Should have split columns");
        assert_eq!(split[0].systolic, 110);
        assert_eq!(split[0].diastolic, 70);
    }

    #[test]
    fn test_blood_pressure_malformed_reading() {
        let mut records = sample_table().records().to_vec();
        records[4].blood_pressure = "11080".to_string();
        let mut table = HealthTable::new(records);

        let err = analyze(AnalysisOption::BloodPressureDistribution, &mut table)
            .expect_err("Should fail");
        assert!(matches!(err, VitalboardError::BloodPressure(_)));

        // Other analyses do not look at the reading.
        assert!(analyze(AnalysisOption::HealthMetricsByGender, &mut table).is_ok());
    }

    #[test]
    fn test_density_scaled_to_counts() {
        let values: Vec<f64> = (0..200).map(|i| f64::from(i % 40)).collect();
        let plot = DistributionPlot::new("x", &values, BinRule::Count(20)).expect("Should plot");
        let peak = plot.density.iter().map(|&(_, y)| y).fold(0.0, f64::max);
        // Uniform data: about 10 per bin.
        assert!(peak > 5.0 && peak < 15.0, "peak {peak}");
    }

    struct FixedSource(Vec<RawHealthRecord>);

    impl RecordSource for FixedSource {
        type Error = DatasetError;

        fn load_records(&self) -> Result<Vec<RawHealthRecord>, Self::Error> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "fixture".to_string()
        }
    }

    #[test]
    fn test_service_reloads_each_run() {
        let raw: Vec<RawHealthRecord> = sample_table()
            .records()
            .iter()
            .map(|r| RawHealthRecord {
                patient_id: r.patient_id.clone(),
                age: r.age,
                gender: r.gender.clone(),
                heart_rate: r.heart_rate,
                respiratory_rate: r.respiratory_rate,
                body_temperature: Some(r.body_temperature).filter(|_| r.age % 2 == 0),
                oxygen_saturation: Some(r.oxygen_saturation),
                blood_pressure: r.blood_pressure.clone(),
                activity_level: r.activity_level.clone(),
            })
            .collect();
        let service = AnalyticsService::new(Arc::new(FixedSource(raw)));

        let first = service
            .run(AnalysisOption::BloodPressureDistribution)
            .expect("Should run");
        let second = service
            .run(AnalysisOption::BloodPressureDistribution)
            .expect("Should run");
        assert_eq!(first.report, second.report);
        assert_eq!(first.imputation.body_temperature_filled, 15);
        assert_eq!(first.source, "fixture");
    }
}
