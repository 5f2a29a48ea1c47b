//! Property-based tests for vitalboard using proptest
//!
//! These cover the loader and statistics invariants over random inputs.

use proptest::prelude::*;
use vitalboard::application::{impute_medians, stats, GenderReport};
use vitalboard::domain::{BloodPressure, RawHealthRecord};

fn measurement_strategy(low: f64, high: f64) -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        1 => Just(None),
        3 => (low..high).prop_map(Some),
    ]
}

/// Rows of (temperature, saturation) with at least one observed value per column.
fn readings_strategy() -> impl Strategy<Value = Vec<(Option<f64>, Option<f64>)>> {
    prop::collection::vec(
        (measurement_strategy(35.0, 40.0), measurement_strategy(85.0, 100.0)),
        1..60,
    )
    .prop_filter("each column needs an observation", |rows| {
        rows.iter().any(|(t, _)| t.is_some()) && rows.iter().any(|(_, s)| s.is_some())
    })
}

fn raw_record(id: usize, temp: Option<f64>, spo2: Option<f64>) -> RawHealthRecord {
    RawHealthRecord {
        patient_id: id.to_string(),
        age: 40,
        gender: Some(if id % 2 == 0 { "Male" } else { "Female" }.to_string()),
        heart_rate: 72,
        respiratory_rate: 16,
        body_temperature: temp,
        oxygen_saturation: spo2,
        blood_pressure: "120/80".to_string(),
        activity_level: Some("resting".to_string()),
    }
}

proptest! {
    #[test]
    fn imputation_fills_every_gap_with_the_observed_median(rows in readings_strategy()) {
        let observed_temps: Vec<f64> = rows.iter().filter_map(|(t, _)| *t).collect();
        let observed_spo2: Vec<f64> = rows.iter().filter_map(|(_, s)| *s).collect();
        let temp_median = stats::median(&observed_temps).expect("Should have a temperature");
        let spo2_median = stats::median(&observed_spo2).expect("Should have a saturation");

        let raw: Vec<RawHealthRecord> = rows
            .iter()
            .enumerate()
            .map(|(i, (t, s))| raw_record(i, *t, *s))
            .collect();

        let (table, summary) = impute_medians(raw).expect("Should impute");

        prop_assert_eq!(table.len(), rows.len());
        prop_assert_eq!(summary.body_temperature_filled, rows.len() - observed_temps.len());
        prop_assert_eq!(summary.oxygen_saturation_filled, rows.len() - observed_spo2.len());

        for (record, (t, s)) in table.records().iter().zip(&rows) {
            prop_assert!(record.body_temperature.is_finite());
            prop_assert!(record.oxygen_saturation.is_finite());
            prop_assert_eq!(record.body_temperature, t.unwrap_or(temp_median));
            prop_assert_eq!(record.oxygen_saturation, s.unwrap_or(spo2_median));
        }
    }

    #[test]
    fn gender_percentages_sum_to_one_hundred(genders in prop::collection::vec(
        prop_oneof![Just("Male"), Just("Female"), Just("Other")],
        1..200,
    )) {
        let report = GenderReport { counts: stats::value_counts(genders.iter().map(|g| Some(*g))) };
        let total: f64 = report.percentages().iter().map(|(_, p)| p).sum();

        prop_assert_eq!(report.total(), genders.len());
        prop_assert!((total - 100.0).abs() < 1e-9);
        prop_assert!(report.counts.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal(
        columns in prop::collection::vec(prop::collection::vec(-1000.0f64..1000.0, 8), 2..6)
            .prop_filter("columns need spread", |cols| {
                cols.iter().all(|c| stats::sample_std(c).is_some_and(|s| s > 1e-6))
            })
    ) {
        let matrix = stats::correlation_matrix(&columns);

        for i in 0..columns.len() {
            prop_assert!((matrix[i][i] - 1.0).abs() < 1e-12);
            for j in 0..columns.len() {
                prop_assert_eq!(matrix[i][j].to_bits(), matrix[j][i].to_bits());
                prop_assert!((-1.0..=1.0).contains(&matrix[i][j]));
            }
        }
    }

    #[test]
    fn blood_pressure_reading_splits_into_components(sys in 60i32..250, dia in 30i32..160) {
        let parsed: BloodPressure = format!("{sys}/{dia}").parse().expect("Should parse");
        prop_assert_eq!(parsed.systolic, sys);
        prop_assert_eq!(parsed.diastolic, dia);
    }

    #[test]
    fn blood_pressure_without_separator_is_rejected(reading in "[0-9 ]{0,8}") {
        prop_assert!(reading.parse::<BloodPressure>().is_err());
    }
}
