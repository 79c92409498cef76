use std::path::PathBuf;
use std::sync::Arc;

use kira_growthqc::batch::{BatchOptions, assess_cohort, format_outcome};
use kira_growthqc::engine::{EngineConfig, GrowthEngine};
use kira_growthqc::io::cohort::CohortChild;
use kira_growthqc::measure::Sex;
use tempfile::TempDir;

fn child(id: &str, sex: Sex, age: u32, height: f64) -> CohortChild {
    CohortChild {
        child_id: id.to_string(),
        name: id.to_uppercase(),
        sex,
        age_months: age,
        rows: vec![[height, 11.0, 15.5]; 12],
    }
}

fn options(out: PathBuf, json: bool) -> BatchOptions {
    BatchOptions {
        out_dir: out,
        write_json: json,
        write_tsv: false,
        threads: 2,
        tool_version: "0.0.0-test".to_string(),
    }
}

#[test]
fn outcomes_keep_cohort_order_and_isolate_failures() {
    let tmp = TempDir::new().unwrap();
    let engine = Arc::new(GrowthEngine::load(&EngineConfig::default()).unwrap());
    let children = vec![
        child("a", Sex::Male, 24, 86.0),
        child("b", Sex::Female, 30, 200.0),
        child("c", Sex::Female, 6, 70.0),
        child("d", Sex::Male, 18, 60.0),
    ];
    let outcomes = assess_cohort(engine, &children, &options(tmp.path().to_path_buf(), true)).unwrap();

    let ids: Vec<&str> = outcomes.iter().map(|o| o.child_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d"]);
    assert!(outcomes[0].result.is_ok());
    assert!(outcomes[1].result.is_err());
    assert!(outcomes[2].result.is_err());
    let stunted = outcomes[3].result.as_ref().unwrap();
    assert_eq!(stunted.fired_flags, vec!["stunting".to_string()]);

    assert!(tmp.path().join("a").join("growthqc.json").exists());
    assert!(!tmp.path().join("b").join("growthqc.json").exists());
}

#[test]
fn child_ids_are_sanitized_for_directories() {
    let tmp = TempDir::new().unwrap();
    let engine = Arc::new(GrowthEngine::load(&EngineConfig::default()).unwrap());
    let children = vec![child("ward 3/bed 7", Sex::Male, 24, 86.0)];
    let outcomes = assess_cohort(engine, &children, &options(tmp.path().to_path_buf(), true)).unwrap();
    assert!(outcomes[0].result.is_ok());
    assert!(tmp.path().join("ward_3_bed_7").join("growthqc.json").exists());
}

#[test]
fn colliding_directory_names_get_a_suffix() {
    let tmp = TempDir::new().unwrap();
    let engine = Arc::new(GrowthEngine::load(&EngineConfig::default()).unwrap());
    let children = vec![
        child("a/1", Sex::Male, 24, 86.0),
        child("a_1", Sex::Male, 24, 86.0),
        child("a 1", Sex::Male, 24, 86.0),
    ];
    let outcomes = assess_cohort(engine, &children, &options(tmp.path().to_path_buf(), true)).unwrap();
    assert!(outcomes.iter().all(|o| o.result.is_ok()));

    for (dir, name) in [("a_1", "A/1"), ("a_1-2", "A_1"), ("a_1-3", "A 1")] {
        let text = std::fs::read_to_string(tmp.path().join(dir).join("growthqc.json")).unwrap();
        let report: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(report["child"]["name"], name, "{}", dir);
    }
}

#[test]
fn outcome_lines() {
    let tmp = TempDir::new().unwrap();
    let engine = Arc::new(GrowthEngine::load(&EngineConfig::default()).unwrap());
    let children = vec![
        child("a", Sex::Male, 24, 86.0),
        child("b", Sex::Male, 24, 200.0),
    ];
    let outcomes = assess_cohort(engine, &children, &options(tmp.path().to_path_buf(), false)).unwrap();
    assert_eq!(
        format_outcome(&outcomes[0]),
        "a\tok\theight=normal weight=normal muac=normal\tflags=none"
    );
    let failed = format_outcome(&outcomes[1]);
    assert!(failed.starts_with("b\tfailed\t"));
    assert!(failed.contains("height_cm"));
}
