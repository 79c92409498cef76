use std::fs;

use kira_growthqc::engine::{EngineConfig, ForecasterKind, GrowthEngine};
use kira_growthqc::error::GrowthError;
use kira_growthqc::forecast::lstm::{DenseWeights, LstmLayerWeights, LstmWeights};
use kira_growthqc::measure::{ChildProfile, MeasurementWindow, Sex};
use tempfile::TempDir;

fn write_model(path: &std::path::Path) {
    let weights = LstmWeights {
        horizon: 6,
        lstm: vec![LstmLayerWeights {
            kernel: vec![vec![0.0; 8]; 3],
            recurrent_kernel: vec![vec![0.0; 8]; 2],
            bias: vec![0.0; 8],
        }],
        dense: DenseWeights {
            kernel: vec![vec![0.0; 3]; 2],
            bias: vec![0.0; 3],
        },
    };
    fs::write(path, serde_json::to_string(&weights).unwrap()).unwrap();
}

fn config_err(cfg: &EngineConfig) -> GrowthError {
    match GrowthEngine::load(cfg) {
        Ok(_) => panic!("engine unexpectedly loaded"),
        Err(e) => e,
    }
}

#[test]
fn default_config_loads_drift() {
    let engine = GrowthEngine::load(&EngineConfig::default()).unwrap();
    assert_eq!(engine.forecaster_name(), "drift");
    assert_eq!(engine.reference().source, "built-in v1");
}

#[test]
fn lstm_requires_scaler_and_model() {
    let tmp = TempDir::new().unwrap();
    let scaler = tmp.path().join("scaler.json");
    fs::write(
        &scaler,
        r#"{"kind": "standard", "mean": [80, 10, 15], "scale": [5, 1, 1]}"#,
    )
    .unwrap();

    let no_scaler = EngineConfig {
        forecaster: ForecasterKind::Lstm,
        ..EngineConfig::default()
    };
    assert!(matches!(config_err(&no_scaler), GrowthError::Configuration(_)));

    let no_model = EngineConfig {
        forecaster: ForecasterKind::Lstm,
        scaler_path: Some(scaler.clone()),
        ..EngineConfig::default()
    };
    assert!(matches!(config_err(&no_model), GrowthError::Configuration(_)));

    let model = tmp.path().join("model.json");
    write_model(&model);
    let engine = GrowthEngine::load(&EngineConfig {
        forecaster: ForecasterKind::Lstm,
        model_path: Some(model),
        scaler_path: Some(scaler),
        reference_path: None,
    })
    .unwrap();
    assert_eq!(engine.forecaster_name(), "lstm");

    // Zero weights decode to the scaler mean.
    let window = MeasurementWindow::from_rows(&vec![[82.0, 11.0, 15.0]; 12]).unwrap();
    let profile = ChildProfile::new("Budi", Sex::Male, 24).unwrap();
    let points = engine.forecast(&window, &profile).unwrap();
    assert_eq!(points[0].as_row(), [80.0, 10.0, 15.0]);
}

#[test]
fn missing_collaborators_are_configuration_errors() {
    let missing = EngineConfig {
        reference_path: Some("/nonexistent/reference.tsv".into()),
        ..EngineConfig::default()
    };
    assert!(matches!(config_err(&missing), GrowthError::Configuration(_)));

    let missing_scaler = EngineConfig {
        scaler_path: Some("/nonexistent/scaler.json".into()),
        ..EngineConfig::default()
    };
    assert!(matches!(config_err(&missing_scaler), GrowthError::Configuration(_)));
}
