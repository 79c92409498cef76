use anyhow::Result;
use kira_growthqc::engine::GrowthEngine;
use kira_growthqc::forecast::Forecaster;
use kira_growthqc::forecast::scaler::StandardScaler;
use kira_growthqc::measure::{ChildProfile, FeatureRow, MeasurementWindow, Sex};
use kira_growthqc::reference::{Indicator, load_builtin_v1};
use kira_growthqc::scores::risk::compute_risk_flags;

/// Replays a fixed 6-month forecast in raw units.
struct Scripted(Vec<FeatureRow>);

impl Forecaster for Scripted {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn predict(&self, _input: &[FeatureRow]) -> Result<Vec<FeatureRow>> {
        Ok(self.0.clone())
    }
}

fn report_for(forecast: Vec<FeatureRow>) -> kira_growthqc::scores::TrajectoryReport {
    let engine = GrowthEngine::new(
        Box::new(Scripted(forecast)),
        Box::new(StandardScaler::identity()),
        load_builtin_v1().unwrap(),
    );
    let window = MeasurementWindow::from_rows(&vec![[85.0, 12.0, 15.5]; 12]).unwrap();
    let profile = ChildProfile::new("Budi", Sex::Male, 24).unwrap();
    engine.assess(&window, &profile).unwrap()
}

#[test]
fn healthy_forecast_fires_nothing() {
    let report = report_for(vec![[88.0, 12.2, 15.8]; 6]);
    let flags = compute_risk_flags(&report);
    let names: Vec<&str> = flags.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["stunting", "underweight", "wasting"]);
    assert!(flags.iter().all(|f| !f.fired));
    assert!(flags[0].details.as_deref().unwrap().starts_with("min_z="));
    assert_eq!(flags[0].threshold, "height_z < -2");
}

#[test]
fn stunting_fires_on_first_low_month() {
    // Male 24-month height: median 87.8, -2SD 81.7 (one-sided SD 6.1).
    let mut forecast = vec![[88.0, 12.2, 15.8]; 6];
    forecast[3][0] = 70.0;
    forecast[5][0] = 60.0;
    let flags = compute_risk_flags(&report_for(forecast));

    let stunting = &flags[0];
    assert_eq!(stunting.indicator, Indicator::Height);
    assert!(stunting.fired);
    let details = stunting.details.as_deref().unwrap();
    assert!(details.starts_with("first_month=4, age_months=28"), "{}", details);
    assert!(!flags[1].fired);
    assert!(!flags[2].fired);
}

#[test]
fn threshold_is_strict() {
    let table = load_builtin_v1().unwrap();
    let e = table.lookup(Sex::Male, Indicator::Weight, 24).unwrap();
    let just_above = e.median - 1.99 * (e.median - e.minus_2sd);
    let flags = compute_risk_flags(&report_for(vec![[88.0, just_above, 15.8]; 6]));
    let underweight = &flags[1];
    assert!(!underweight.fired);
}
