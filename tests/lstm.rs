use std::fs;

use kira_growthqc::error::GrowthError;
use kira_growthqc::forecast::Forecaster;
use kira_growthqc::forecast::lstm::{DenseWeights, LstmForecaster, LstmLayerWeights, LstmWeights};
use tempfile::TempDir;

fn zeros(rows: usize, cols: usize) -> Vec<Vec<f64>> {
    vec![vec![0.0; cols]; rows]
}

fn zero_weights(units: &[usize]) -> LstmWeights {
    let mut input_dim = 3;
    let mut lstm = Vec::new();
    for &u in units {
        lstm.push(LstmLayerWeights {
            kernel: zeros(input_dim, 4 * u),
            recurrent_kernel: zeros(u, 4 * u),
            bias: vec![0.0; 4 * u],
        });
        input_dim = u;
    }
    LstmWeights {
        horizon: 6,
        lstm,
        dense: DenseWeights {
            kernel: zeros(input_dim, 3),
            bias: vec![0.5, -1.0, 2.0],
        },
    }
}

#[test]
fn zero_weights_emit_dense_bias() {
    let model = LstmForecaster::from_weights(zero_weights(&[4, 2])).unwrap();
    assert_eq!(model.layer_units(), vec![4, 2]);
    let out = model.predict(&vec![[1.0, 2.0, 3.0]; 12]).unwrap();
    assert_eq!(out, vec![[0.5, -1.0, 2.0]; 6]);
}

#[test]
fn single_unit_cell_matches_hand_computation() {
    // Saturated gates: the cell state is the latest candidate, h = tanh(tanh(x)).
    let mut w = zero_weights(&[1]);
    w.lstm[0].kernel = vec![vec![0.0, 0.0, 1.0, 0.0], vec![0.0; 4], vec![0.0; 4]];
    w.lstm[0].bias = vec![50.0, -50.0, 0.0, 50.0];
    w.dense.kernel = vec![vec![1.0, 0.0, 0.0]];
    w.dense.bias = vec![0.0; 3];
    let model = LstmForecaster::from_weights(w).unwrap();

    let input: Vec<[f64; 3]> = (0..12).map(|i| [i as f64 * 0.1, 0.0, 0.0]).collect();
    let out = model.predict(&input).unwrap();
    for (step, row) in out.iter().enumerate() {
        let x = (6 + step) as f64 * 0.1;
        let expected = x.tanh().tanh();
        assert!((row[0] - expected).abs() < 1e-9, "step {}", step);
        assert_eq!(row[1], 0.0);
    }
}

#[test]
fn predict_rejects_wrong_window_length() {
    let model = LstmForecaster::from_weights(zero_weights(&[2])).unwrap();
    assert!(model.predict(&vec![[0.0; 3]; 11]).is_err());
}

#[test]
fn malformed_shapes_are_configuration_errors() {
    let mut w = zero_weights(&[2]);
    w.lstm[0].kernel = zeros(2, 8);
    assert!(matches!(
        LstmForecaster::from_weights(w).unwrap_err(),
        GrowthError::Configuration(_)
    ));

    let mut w = zero_weights(&[2]);
    w.lstm[0].bias = vec![0.0; 6];
    assert!(LstmForecaster::from_weights(w).is_err());

    let mut w = zero_weights(&[2]);
    w.dense.bias = vec![0.0; 2];
    assert!(LstmForecaster::from_weights(w).is_err());

    let mut w = zero_weights(&[2]);
    w.horizon = 12;
    assert!(LstmForecaster::from_weights(w).is_err());

    let mut w = zero_weights(&[2]);
    w.lstm.clear();
    assert!(LstmForecaster::from_weights(w).is_err());

    let mut w = zero_weights(&[2]);
    w.lstm[0].recurrent_kernel[1][3] = f64::NAN;
    let err = LstmForecaster::from_weights(w).unwrap_err();
    assert!(err.to_string().contains("non-finite"));
}

#[test]
fn load_reads_json_weights() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("model.json");
    let mut value = serde_json::to_value(zero_weights(&[3])).unwrap();
    value.as_object_mut().unwrap().remove("horizon");
    fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();

    let model = LstmForecaster::load(&path).unwrap();
    assert_eq!(model.layer_units(), vec![3]);
    assert_eq!(model.name(), "lstm");

    fs::write(&path, "{\"lstm\": []").unwrap();
    assert!(matches!(
        LstmForecaster::load(&path).unwrap_err(),
        GrowthError::Configuration(_)
    ));
}
