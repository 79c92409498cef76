use std::fs;
use std::sync::Arc;

use kira_growthqc::ctx::{Ctx, ProfileRequest};
use kira_growthqc::engine::GrowthEngine;
use kira_growthqc::forecast::drift::DriftForecaster;
use kira_growthqc::forecast::scaler::StandardScaler;
use kira_growthqc::io::tsv_writer::write_tsv;
use kira_growthqc::measure::Sex;
use kira_growthqc::pipeline::Pipeline;
use kira_growthqc::reference::load_builtin_v1;
use tempfile::TempDir;

#[test]
fn tsv_has_one_row_per_forecast_month() {
    let tmp = TempDir::new().unwrap();
    let engine = GrowthEngine::new(
        Box::new(DriftForecaster::new()),
        Box::new(StandardScaler::identity()),
        load_builtin_v1().unwrap(),
    );
    let mut ctx = Ctx::new(
        None,
        tmp.path().to_path_buf(),
        Some(Arc::new(engine)),
        false,
        true,
        "0.0.0-test",
    );
    ctx.raw_rows = Some(vec![[82.0, 11.0, 15.5]; 12]);
    ctx.request = Some(ProfileRequest {
        name: "Budi".to_string(),
        sex: Sex::Male,
        age_months: 20,
    });
    Pipeline::assessment().run(&mut ctx).unwrap();

    let text = fs::read_to_string(tmp.path().join("growthqc.tsv")).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 7);

    let header: Vec<&str> = lines[0].split('\t').collect();
    assert_eq!(header.len(), 14);
    assert_eq!(&header[..6], &["month", "age_months", "height_cm", "height_z", "height_status", "height_median"]);
    assert_eq!(header[13], "muac_median");

    for (i, line) in lines[1..].iter().enumerate() {
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields.len(), 14);
        assert_eq!(fields[0], (i + 1).to_string());
        assert_eq!(fields[1], (21 + i).to_string());
        assert_eq!(fields[2], "82.000000");
    }
}

#[test]
fn tsv_requires_trajectory() {
    let tmp = TempDir::new().unwrap();
    let ctx = Ctx::new(None, tmp.path().to_path_buf(), None, false, true, "0.0.0-test");
    assert!(write_tsv(&tmp.path().join("growthqc.tsv"), &ctx).is_err());
}
