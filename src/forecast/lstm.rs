//! Inference-only stacked LSTM.
//!
//! Topology: LSTM layers returning full sequences, the last `horizon` time
//! steps kept, then a dense layer applied per step. Weights use the Keras
//! layout (`kernel[in][4u]`, `recurrent_kernel[u][4u]`, `bias[4u]`, gates
//! ordered i, f, c, o). Dropout is a training-time layer and is absent here.

use std::path::Path;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::error::{GrowthError, GrowthResult};
use crate::forecast::{FORECAST_HORIZON, Forecaster};
use crate::measure::{FEATURES, FeatureRow, WINDOW_LEN};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LstmLayerWeights {
    pub kernel: Vec<Vec<f64>>,
    pub recurrent_kernel: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseWeights {
    pub kernel: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LstmWeights {
    #[serde(default = "default_horizon")]
    pub horizon: usize,
    pub lstm: Vec<LstmLayerWeights>,
    pub dense: DenseWeights,
}

fn default_horizon() -> usize {
    FORECAST_HORIZON
}

#[derive(Debug, Clone)]
struct LstmLayer {
    units: usize,
    kernel: Vec<Vec<f64>>,
    recurrent: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

impl LstmLayer {
    fn run(&self, seq: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let u = self.units;
        let mut h = vec![0.0f64; u];
        let mut c = vec![0.0f64; u];
        let mut out = Vec::with_capacity(seq.len());
        for x in seq {
            let mut z = self.bias.clone();
            for (xi, row) in x.iter().zip(&self.kernel) {
                for (zj, w) in z.iter_mut().zip(row) {
                    *zj += xi * w;
                }
            }
            for (hi, row) in h.iter().zip(&self.recurrent) {
                for (zj, w) in z.iter_mut().zip(row) {
                    *zj += hi * w;
                }
            }
            for j in 0..u {
                let i_gate = sigmoid(z[j]);
                let f_gate = sigmoid(z[u + j]);
                let cand = z[2 * u + j].tanh();
                let o_gate = sigmoid(z[3 * u + j]);
                c[j] = f_gate * c[j] + i_gate * cand;
                h[j] = o_gate * c[j].tanh();
            }
            out.push(h.clone());
        }
        out
    }
}

#[derive(Debug, Clone)]
pub struct LstmForecaster {
    layers: Vec<LstmLayer>,
    dense_kernel: Vec<Vec<f64>>,
    dense_bias: Vec<f64>,
    horizon: usize,
}

impl LstmForecaster {
    pub fn load(path: &Path) -> GrowthResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GrowthError::configuration(format!("failed to read model {}: {}", path.display(), e))
        })?;
        let weights: LstmWeights = serde_json::from_str(&content).map_err(|e| {
            GrowthError::configuration(format!("invalid model weights {}: {}", path.display(), e))
        })?;
        Self::from_weights(weights)
    }

    pub fn from_weights(weights: LstmWeights) -> GrowthResult<Self> {
        if weights.lstm.is_empty() {
            return Err(shape_err("at least one LSTM layer is required"));
        }
        if weights.horizon != FORECAST_HORIZON {
            return Err(shape_err(&format!(
                "horizon {} does not match forecast horizon {}",
                weights.horizon, FORECAST_HORIZON
            )));
        }

        let mut layers = Vec::with_capacity(weights.lstm.len());
        let mut input_dim = FEATURES;
        for (idx, l) in weights.lstm.into_iter().enumerate() {
            let units = l.bias.len() / 4;
            if units == 0 || l.bias.len() != 4 * units {
                return Err(shape_err(&format!(
                    "lstm[{}] bias length {} is not a positive multiple of 4",
                    idx,
                    l.bias.len()
                )));
            }
            check_matrix(&l.kernel, input_dim, 4 * units, &format!("lstm[{}].kernel", idx))?;
            check_matrix(
                &l.recurrent_kernel,
                units,
                4 * units,
                &format!("lstm[{}].recurrent_kernel", idx),
            )?;
            layers.push(LstmLayer {
                units,
                kernel: l.kernel,
                recurrent: l.recurrent_kernel,
                bias: l.bias,
            });
            input_dim = units;
        }

        check_matrix(&weights.dense.kernel, input_dim, FEATURES, "dense.kernel")?;
        if weights.dense.bias.len() != FEATURES {
            return Err(shape_err(&format!(
                "dense.bias length {} != {}",
                weights.dense.bias.len(),
                FEATURES
            )));
        }

        Ok(Self {
            layers,
            dense_kernel: weights.dense.kernel,
            dense_bias: weights.dense.bias,
            horizon: weights.horizon,
        })
    }

    pub fn layer_units(&self) -> Vec<usize> {
        self.layers.iter().map(|l| l.units).collect()
    }
}

impl Forecaster for LstmForecaster {
    fn name(&self) -> &'static str {
        "lstm"
    }

    fn predict(&self, input: &[FeatureRow]) -> Result<Vec<FeatureRow>> {
        if input.len() != WINDOW_LEN {
            bail!("expected {} input steps, got {}", WINDOW_LEN, input.len());
        }
        let mut seq: Vec<Vec<f64>> = input.iter().map(|r| r.to_vec()).collect();
        for layer in &self.layers {
            seq = layer.run(&seq);
        }

        let tail = &seq[seq.len() - self.horizon..];
        let mut out = Vec::with_capacity(self.horizon);
        for h in tail {
            let mut row = [0.0f64; FEATURES];
            for (k, slot) in row.iter_mut().enumerate() {
                let mut acc = self.dense_bias[k];
                for (hi, w) in h.iter().zip(&self.dense_kernel) {
                    acc += hi * w[k];
                }
                *slot = acc;
            }
            out.push(row);
        }
        Ok(out)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn check_matrix(m: &[Vec<f64>], rows: usize, cols: usize, name: &str) -> GrowthResult<()> {
    if m.len() != rows {
        return Err(shape_err(&format!("{} has {} rows, expected {}", name, m.len(), rows)));
    }
    if let Some((i, r)) = m.iter().enumerate().find(|(_, r)| r.len() != cols) {
        return Err(shape_err(&format!(
            "{} row {} has {} columns, expected {}",
            name,
            i,
            r.len(),
            cols
        )));
    }
    if m.iter().flatten().any(|v| !v.is_finite()) {
        return Err(shape_err(&format!("{} contains non-finite weights", name)));
    }
    Ok(())
}

fn shape_err(msg: &str) -> GrowthError {
    GrowthError::configuration(format!("lstm weights: {}", msg))
}
