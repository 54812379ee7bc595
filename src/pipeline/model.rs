//! L2-regularized logistic regression and the persisted model artifact
//!
//! Fitting uses Newton's method (IRLS) on standardized features; the learned
//! coefficients are mapped back to the raw feature scale so scoring needs no
//! preprocessing beyond schema alignment.

use anyhow::{Context, Result};
use chrono::Utc;
use faer::prelude::*;
use faer::Mat;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::encoding::align_to_schema;
use super::error::PipelineError;

/// Default iteration cap for the Newton solver
pub const DEFAULT_MAX_ITER: usize = 1000;

/// Default inverse regularization strength (larger = weaker penalty)
pub const DEFAULT_C: f64 = 1.0;

/// Stop when the largest parameter update falls below this value
const CONVERGENCE_TOL: f64 = 1e-8;

/// Hyperparameters for [`train_model`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainConfig {
    pub max_iter: usize,
    /// Inverse L2 regularization strength
    pub c: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            max_iter: DEFAULT_MAX_ITER,
            c: DEFAULT_C,
        }
    }
}

/// Facts about the training run stored alongside the parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Timestamp of the training run (ISO 8601 format)
    pub trained_at: String,
    /// churnlens version that produced the artifact
    pub churnlens_version: String,
    pub training_rows: usize,
    pub iterations: usize,
    pub converged: bool,
    pub regularization_c: f64,
}

/// A fitted churn classifier and the exact feature schema it expects.
///
/// Immutable once trained; scoring only reads it, so one instance can be
/// shared by reference between any number of callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    /// Post-encoding feature columns, in the order the coefficients use
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub metadata: ModelMetadata,
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Read every column of a fully numeric table as `f64` column vectors
pub fn frame_to_columns(df: &DataFrame) -> Result<Vec<Vec<f64>>> {
    df.get_columns()
        .iter()
        .map(|col| -> Result<Vec<f64>> {
            let name = col.name().as_str();
            let cast = col.cast(&DataType::Float64).map_err(|e| {
                PipelineError::schema(format!("feature '{}' is not numeric: {}", name, e))
            })?;
            let values: Vec<Option<f64>> = cast.f64()?.into_iter().collect();
            values
                .into_iter()
                .collect::<Option<Vec<f64>>>()
                .ok_or_else(|| {
                    anyhow::Error::from(PipelineError::schema(format!(
                        "feature '{}' contains null values",
                        name
                    )))
                })
        })
        .collect()
}

/// Column mean and standard deviation; constant columns get a scale of 1
fn standardization(column: &[f64]) -> (f64, f64) {
    let n = column.len() as f64;
    let mean = column.iter().sum::<f64>() / n;
    let var = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = var.sqrt();
    if std > 1e-12 {
        (mean, std)
    } else {
        (mean, 1.0)
    }
}

/// Fit a logistic regression on an encoded feature table.
///
/// `y_train` must hold 0/1 labels, one per row. The returned model records
/// the column order of `x_train` as its feature schema. Hitting `max_iter`
/// before convergence is not an error; it is reported in the metadata.
pub fn train_model(x_train: &DataFrame, y_train: &[i32], config: &TrainConfig) -> Result<TrainedModel> {
    let n = x_train.height();
    let p = x_train.width();

    if n == 0 {
        return Err(PipelineError::data_quality("training set has no rows").into());
    }
    if p == 0 {
        return Err(PipelineError::schema("training set has no feature columns").into());
    }
    if y_train.len() != n {
        anyhow::bail!(
            "label count ({}) does not match training rows ({})",
            y_train.len(),
            n
        );
    }
    if config.c <= 0.0 || !config.c.is_finite() {
        anyhow::bail!("regularization C must be a positive number, got {}", config.c);
    }

    let feature_names: Vec<String> = x_train
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let columns = frame_to_columns(x_train)?;
    let scales: Vec<(f64, f64)> = columns.iter().map(|c| standardization(c)).collect();

    // Design matrix: intercept column followed by standardized features
    let k = p + 1;
    let design = Mat::from_fn(n, k, |i, j| {
        if j == 0 {
            1.0
        } else {
            let (mean, std) = scales[j - 1];
            (columns[j - 1][i] - mean) / std
        }
    });
    let y: Vec<f64> = y_train.iter().map(|&v| f64::from(v)).collect();
    let lambda = 1.0 / config.c;

    let mut beta = Mat::<f64>::zeros(k, 1);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;

        let eta = &design * &beta;
        let mu: Vec<f64> = (0..n).map(|i| sigmoid(eta[(i, 0)])).collect();

        // Gradient of the penalized log-likelihood (intercept is not penalized)
        let residual = Mat::from_fn(n, 1, |i, _| y[i] - mu[i]);
        let mut gradient = design.transpose() * &residual;
        for j in 1..k {
            gradient[(j, 0)] -= lambda * beta[(j, 0)];
        }

        // Negative Hessian: X' W X + lambda * I
        let weighted = Mat::from_fn(n, k, |i, j| design[(i, j)] * (mu[i] * (1.0 - mu[i])).sqrt());
        let mut hessian = weighted.transpose() * &weighted;
        for j in 1..k {
            hessian[(j, j)] += lambda;
        }

        let step = hessian.partial_piv_lu().solve(&gradient);

        let mut max_step = 0.0f64;
        for j in 0..k {
            let delta = step[(j, 0)];
            if !delta.is_finite() {
                return Err(PipelineError::data_quality(
                    "logistic regression diverged; check the features for extreme values",
                )
                .into());
            }
            beta[(j, 0)] += delta;
            max_step = max_step.max(delta.abs());
        }

        if max_step < CONVERGENCE_TOL {
            converged = true;
            break;
        }
    }

    // Undo the standardization
    let coefficients: Vec<f64> = (0..p).map(|j| beta[(j + 1, 0)] / scales[j].1).collect();
    let intercept = beta[(0, 0)]
        - coefficients
            .iter()
            .zip(scales.iter())
            .map(|(coef, (mean, _))| coef * mean)
            .sum::<f64>();

    let model = TrainedModel {
        feature_names,
        coefficients,
        intercept,
        metadata: ModelMetadata {
            trained_at: Utc::now().to_rfc3339(),
            churnlens_version: env!("CARGO_PKG_VERSION").to_string(),
            training_rows: n,
            iterations,
            converged,
            regularization_c: config.c,
        },
    };
    model.validate()?;

    Ok(model)
}

impl TrainedModel {
    /// Check that the schema and parameters form a usable contract
    pub fn validate(&self) -> Result<()> {
        if self.feature_names.is_empty() {
            return Err(PipelineError::model_contract("feature schema is empty").into());
        }
        if self.coefficients.len() != self.feature_names.len() {
            return Err(PipelineError::model_contract(format!(
                "{} coefficient(s) for {} feature(s)",
                self.coefficients.len(),
                self.feature_names.len()
            ))
            .into());
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self
            .feature_names
            .iter()
            .find(|name| !seen.insert(name.as_str()))
        {
            return Err(PipelineError::model_contract(format!(
                "feature '{}' appears more than once in the schema",
                dup
            ))
            .into());
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(PipelineError::model_contract("model parameters are not finite").into());
        }
        Ok(())
    }

    /// Probability of churn for one row already in schema order
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(PipelineError::model_contract(format!(
                "row has {} value(s), model expects {}",
                row.len(),
                self.coefficients.len()
            ))
            .into());
        }
        let z = self.intercept
            + row
                .iter()
                .zip(self.coefficients.iter())
                .map(|(x, w)| x * w)
                .sum::<f64>();
        Ok(sigmoid(z))
    }

    /// Churn probabilities for every row of an encoded table.
    ///
    /// The table is aligned to the model schema first, so missing indicator
    /// columns count as zero and unknown columns are ignored.
    pub fn predict_proba(&self, features: &DataFrame) -> Result<Vec<f64>> {
        self.validate()?;
        let aligned = align_to_schema(features, &self.feature_names)?;
        let columns = frame_to_columns(&aligned)?;

        (0..aligned.height())
            .map(|i| {
                let row: Vec<f64> = columns.iter().map(|c| c[i]).collect();
                self.predict_row(&row)
            })
            .collect()
    }

    /// Write the model as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize model")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write model to {}", path.display()))?;
        Ok(())
    }

    /// Read and validate a model written by [`TrainedModel::save`]
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model file: {}", path.display()))?;
        let model: TrainedModel = serde_json::from_str(&json).map_err(|e| {
            PipelineError::model_contract(format!(
                "{} is not a valid model artifact: {}",
                path.display(),
                e
            ))
        })?;
        model.validate()?;
        Ok(model)
    }
}
