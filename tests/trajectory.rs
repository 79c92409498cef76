use anyhow::Result;
use kira_growthqc::engine::GrowthEngine;
use kira_growthqc::forecast::Forecaster;
use kira_growthqc::forecast::drift::DriftForecaster;
use kira_growthqc::forecast::scaler::StandardScaler;
use kira_growthqc::measure::{ChildProfile, FeatureRow, MeasurementWindow, Sex};
use kira_growthqc::reference::{Indicator, load_builtin_v1};
use kira_growthqc::scores::Category;
use kira_growthqc::scores::trajectory::{forecast_ages, historical_ages};

struct Constant(FeatureRow);

impl Forecaster for Constant {
    fn name(&self) -> &'static str {
        "constant"
    }

    fn predict(&self, _input: &[FeatureRow]) -> Result<Vec<FeatureRow>> {
        Ok(vec![self.0; 6])
    }
}

fn plausible_window() -> MeasurementWindow {
    let rows: Vec<FeatureRow> = (0..12)
        .map(|i| {
            let i = i as f64;
            [76.0 + 0.9 * i, 9.5 + 0.2 * i, 15.0 + 0.05 * i]
        })
        .collect();
    MeasurementWindow::from_rows(&rows).unwrap()
}

fn drift_engine() -> GrowthEngine {
    GrowthEngine::new(
        Box::new(DriftForecaster::new()),
        Box::new(StandardScaler::identity()),
        load_builtin_v1().unwrap(),
    )
}

#[test]
fn age_axes() {
    assert_eq!(historical_ages(24), (13..=24).collect::<Vec<_>>());
    assert_eq!(forecast_ages(24), (25..=30).collect::<Vec<_>>());
    assert_eq!(historical_ages(12), (1..=12).collect::<Vec<_>>());
}

#[test]
fn twenty_four_month_male_end_to_end() {
    let engine = drift_engine();
    let profile = ChildProfile::new("Budi", Sex::Male, 24).unwrap();
    let report = engine.assess(&plausible_window(), &profile).unwrap();

    assert_eq!(report.historical_ages, (13..=24).collect::<Vec<_>>());
    assert_eq!(report.forecast_ages, (25..=30).collect::<Vec<_>>());
    assert_eq!(report.combined_ages(), (13..=30).collect::<Vec<_>>());
    assert_eq!(report.points.len(), 6);
    for (i, p) in report.points.iter().enumerate() {
        assert_eq!(p.point.age_months, 25 + i as u32);
        let order: Vec<Indicator> = p.classifications.iter().map(|c| c.indicator).collect();
        assert_eq!(order, Indicator::ALL.to_vec());
    }
    assert_eq!(report.actual.height_cm, plausible_window().heights());
    assert_eq!(report.outlook().len(), 3);
}

#[test]
fn forecast_ages_beyond_table_use_last_reference_row() {
    let engine = drift_engine();
    let table = load_builtin_v1().unwrap();
    let profile = ChildProfile::new("Budi", Sex::Male, 24).unwrap();
    let report = engine.assess(&plausible_window(), &profile).unwrap();

    for indicator in Indicator::ALL {
        let last = table.lookup(Sex::Male, indicator, 24).unwrap();
        for p in &report.points {
            let c = p.classification(indicator).unwrap();
            assert_eq!(c.reference_median, last.median);
            let expected = (p.point.value(indicator) - last.median) / (last.median - last.minus_2sd);
            assert_eq!(c.z_score, expected);
        }
    }

    assert_eq!(report.reference_curves.len(), 3);
    for curve in &report.reference_curves {
        assert_eq!(curve.ages, (13..=30).collect::<Vec<_>>());
        let last = table.lookup(Sex::Male, curve.indicator, 24).unwrap();
        assert!(curve.median[11..].iter().all(|&m| m == last.median));
        assert!(curve.minus_2sd[11..].iter().all(|&m| m == last.minus_2sd));
        let age_13 = table.lookup(Sex::Male, curve.indicator, 13).unwrap();
        assert_eq!(curve.median[0], age_13.median);
    }
}

#[test]
fn low_forecast_from_tall_window_is_severe() {
    let rows = vec![[150.0, 12.0, 15.0]; 12];
    let window = MeasurementWindow::from_rows(&rows).unwrap();
    // Decodes to 45 cm / 12 kg / 15 cm regardless of input.
    let engine = GrowthEngine::new(
        Box::new(Constant([-3.0, 0.0, 0.0])),
        Box::new(StandardScaler::new([60.0, 12.0, 15.0], [5.0, 1.0, 1.0]).unwrap()),
        load_builtin_v1().unwrap(),
    );
    let profile = ChildProfile::new("Budi", Sex::Male, 24).unwrap();
    let report = engine.assess(&window, &profile).unwrap();

    for p in &report.points {
        assert!((p.point.height_cm - 45.0).abs() < 1e-9);
        let c = p.classification(Indicator::Height).unwrap();
        assert!(c.z_score < -3.0);
        assert_eq!(c.category, Category::Severe);
    }
}

#[test]
fn summarize_is_deterministic() {
    let engine = drift_engine();
    let window = plausible_window();
    let profile = ChildProfile::new("Sari", Sex::Female, 30).unwrap();
    let points = engine.forecast(&window, &profile).unwrap();

    let a = engine.summarize(&window, &profile, &points).unwrap();
    let b = engine.summarize(&window, &profile, &points).unwrap();
    assert_eq!(a, b);
    for (pa, pb) in a.points.iter().zip(&b.points) {
        for (ca, cb) in pa.classifications.iter().zip(&pb.classifications) {
            assert_eq!(ca.z_score.to_bits(), cb.z_score.to_bits());
        }
    }
}
