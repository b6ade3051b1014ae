//! Triad regressor head
//!
//! Small MLP mapping `[embedding | features]` to three logits. The softmax of
//! the logits is the raw triad handed to [`TriadValue::from_raw`].
//!
//! Checkpoints are safetensors files with four f32 tensors:
//! - `hidden.weight` (hidden, input), `hidden.bias` (hidden)
//! - `out.weight` (3, hidden), `out.bias` (3)
//!
//! [`TriadValue::from_raw`]: crate::triad::TriadValue::from_raw

use anyhow::{bail, Context, Result};
use safetensors::tensor::{Dtype, TensorView};
use safetensors::SafeTensors;
use std::collections::HashMap;
use std::path::Path;

const HIDDEN_WEIGHT: &str = "hidden.weight";
const HIDDEN_BIAS: &str = "hidden.bias";
const OUT_WEIGHT: &str = "out.weight";
const OUT_BIAS: &str = "out.bias";

/// Number of triad logits
pub const TRIAD_OUTPUTS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct TriadRegressor {
    input_dim: usize,
    hidden_dim: usize,
    /// Row-major (hidden_dim, input_dim)
    hidden_weight: Vec<f32>,
    hidden_bias: Vec<f32>,
    /// Row-major (3, hidden_dim)
    out_weight: Vec<f32>,
    out_bias: Vec<f32>,
}

impl TriadRegressor {
    pub fn from_parts(
        input_dim: usize,
        hidden_dim: usize,
        hidden_weight: Vec<f32>,
        hidden_bias: Vec<f32>,
        out_weight: Vec<f32>,
        out_bias: Vec<f32>,
    ) -> Result<Self> {
        if input_dim == 0 || hidden_dim == 0 {
            bail!("Regressor dimensions must be positive");
        }
        check_len(HIDDEN_WEIGHT, &hidden_weight, hidden_dim * input_dim)?;
        check_len(HIDDEN_BIAS, &hidden_bias, hidden_dim)?;
        check_len(OUT_WEIGHT, &out_weight, TRIAD_OUTPUTS * hidden_dim)?;
        check_len(OUT_BIAS, &out_bias, TRIAD_OUTPUTS)?;

        Ok(Self {
            input_dim,
            hidden_dim,
            hidden_weight,
            hidden_bias,
            out_weight,
            out_bias,
        })
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn hidden_dim(&self) -> usize {
        self.hidden_dim
    }

    /// Forward pass: softmax probabilities over (∆, ∞, Θ)
    pub fn predict(&self, input: &[f32]) -> Result<[f64; 3]> {
        if input.len() != self.input_dim {
            bail!(
                "Regressor expects {} inputs, got {}",
                self.input_dim,
                input.len()
            );
        }

        let hidden: Vec<f32> = self
            .hidden_weight
            .chunks_exact(self.input_dim)
            .zip(&self.hidden_bias)
            .map(|(row, b)| (dot(row, input) + b).max(0.0))
            .collect();

        let mut logits = [0.0f64; TRIAD_OUTPUTS];
        for (i, (row, b)) in self
            .out_weight
            .chunks_exact(self.hidden_dim)
            .zip(&self.out_bias)
            .enumerate()
        {
            logits[i] = (dot(row, &hidden) + b) as f64;
        }

        Ok(softmax(logits))
    }

    /// Save parameters as a safetensors checkpoint
    pub fn save(&self, path: &Path) -> Result<()> {
        let tensors = [
            (HIDDEN_WEIGHT, vec![self.hidden_dim, self.input_dim], to_bytes(&self.hidden_weight)),
            (HIDDEN_BIAS, vec![self.hidden_dim], to_bytes(&self.hidden_bias)),
            (OUT_WEIGHT, vec![TRIAD_OUTPUTS, self.hidden_dim], to_bytes(&self.out_weight)),
            (OUT_BIAS, vec![TRIAD_OUTPUTS], to_bytes(&self.out_bias)),
        ];

        let mut views = Vec::with_capacity(tensors.len());
        for (name, shape, bytes) in &tensors {
            let view = TensorView::new(Dtype::F32, shape.clone(), bytes)
                .with_context(|| format!("Invalid tensor: {}", name))?;
            views.push((*name, view));
        }

        let metadata = HashMap::from([("format".to_string(), "numtriad-regressor".to_string())]);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        safetensors::serialize_to_file(views, &Some(metadata), path)
            .with_context(|| format!("Failed to write checkpoint: {}", path.display()))?;

        Ok(())
    }

    /// Load parameters from a safetensors checkpoint
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read checkpoint: {}", path.display()))?;
        let tensors = SafeTensors::deserialize(&bytes).context("Failed to parse safetensors")?;

        let (hidden_shape, hidden_weight) = read_f32(&tensors, HIDDEN_WEIGHT)?;
        let (_, hidden_bias) = read_f32(&tensors, HIDDEN_BIAS)?;
        let (_, out_weight) = read_f32(&tensors, OUT_WEIGHT)?;
        let (_, out_bias) = read_f32(&tensors, OUT_BIAS)?;

        if hidden_shape.len() != 2 {
            bail!("{} must be 2-dimensional, got {:?}", HIDDEN_WEIGHT, hidden_shape);
        }

        Self::from_parts(
            hidden_shape[1],
            hidden_shape[0],
            hidden_weight,
            hidden_bias,
            out_weight,
            out_bias,
        )
    }
}

fn check_len(name: &str, values: &[f32], expected: usize) -> Result<()> {
    if values.len() != expected {
        bail!(
            "Tensor {} has {} values, expected {}",
            name,
            values.len(),
            expected
        );
    }
    Ok(())
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn softmax(logits: [f64; 3]) -> [f64; 3] {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps = logits.map(|l| (l - max).exp());
    let sum: f64 = exps.iter().sum();
    exps.map(|e| e / sum)
}

fn to_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn read_f32(tensors: &SafeTensors, name: &str) -> Result<(Vec<usize>, Vec<f32>)> {
    let tensor = tensors
        .tensor(name)
        .with_context(|| format!("Missing tensor: {}", name))?;

    if tensor.dtype() != Dtype::F32 {
        bail!("Tensor {} must be F32, got {:?}", name, tensor.dtype());
    }

    let values = tensor
        .data()
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    Ok((tensor.shape().to_vec(), values))
}

/// Deterministic small regressor for tests
#[cfg(test)]
pub(crate) fn test_regressor(input_dim: usize, hidden_dim: usize) -> TriadRegressor {
    let wave = |n: usize, seed: usize| -> Vec<f32> {
        (0..n)
            .map(|i| (((i * 7 + seed * 13) % 17) as f32 - 8.0) / 10.0)
            .collect()
    };

    TriadRegressor::from_parts(
        input_dim,
        hidden_dim,
        wave(hidden_dim * input_dim, 1),
        wave(hidden_dim, 2),
        wave(TRIAD_OUTPUTS * hidden_dim, 3),
        wave(TRIAD_OUTPUTS, 4),
    )
    .unwrap()
}
