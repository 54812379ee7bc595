//! Evaluation metrics export

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{EvaluationMetrics, TrainedModel, RANDOM_SEED, TEST_SIZE};

/// Metadata about the training run
#[derive(Serialize)]
pub struct EvaluationMetadata {
    /// Timestamp of the export (ISO 8601 format)
    pub timestamp: String,
    /// churnlens version
    pub churnlens_version: String,
    /// Input dataset path
    pub input_file: String,
    /// Model artifact path
    pub model_file: String,
    pub train_rows: usize,
    pub test_rows: usize,
    pub test_size: f64,
    pub random_seed: u64,
    pub iterations: usize,
    pub converged: bool,
    pub regularization_c: f64,
}

/// Complete evaluation export
#[derive(Serialize)]
pub struct EvaluationExport<'a> {
    pub metadata: EvaluationMetadata,
    pub metrics: &'a EvaluationMetrics,
    /// Feature schema the model was trained on
    pub feature_names: &'a [String],
}

/// Parameters for the evaluation export
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub model_file: &'a str,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Export evaluation metrics to a JSON file
pub fn export_evaluation(
    metrics: &EvaluationMetrics,
    model: &TrainedModel,
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let export = EvaluationExport {
        metadata: EvaluationMetadata {
            timestamp: Utc::now().to_rfc3339(),
            churnlens_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
            model_file: params.model_file.to_string(),
            train_rows: params.train_rows,
            test_rows: params.test_rows,
            test_size: TEST_SIZE,
            random_seed: RANDOM_SEED,
            iterations: model.metadata.iterations,
            converged: model.metadata.converged,
            regularization_c: model.metadata.regularization_c,
        },
        metrics,
        feature_names: &model.feature_names,
    };

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize evaluation metrics to JSON")?;

    std::fs::write(output_path, json).with_context(|| {
        format!(
            "Failed to write evaluation metrics to {}",
            output_path.display()
        )
    })?;

    Ok(())
}
