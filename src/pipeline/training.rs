//! Training data preparation: label extraction, encoding and splitting

use anyhow::Result;
use polars::prelude::*;

use super::columns::{optional_f64_values, CHURN};
use super::encoding::one_hot_encode;
use super::error::PipelineError;
use super::split::{stratified_split, RANDOM_SEED, TEST_SIZE};

/// Tolerance for floating point comparison when checking binary 0/1 labels
const TOLERANCE: f64 = 1e-9;

/// Encoded features and labels for both partitions
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: DataFrame,
    pub x_test: DataFrame,
    pub y_train: Vec<i32>,
    pub y_test: Vec<i32>,
}

impl TrainTestSplit {
    /// Post-encoding feature names, in model order
    pub fn feature_names(&self) -> Vec<String> {
        self.x_train
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

/// Ensure a table still has rows after cleaning
pub fn ensure_not_empty(df: &DataFrame, stage: &str) -> Result<()> {
    if df.height() == 0 {
        return Err(PipelineError::data_quality(format!(
            "no rows remain after {}; every record had a missing value",
            stage
        ))
        .into());
    }
    Ok(())
}

/// Extract the churn column as 0/1 labels
pub fn extract_labels(df: &DataFrame) -> Result<Vec<i32>> {
    optional_f64_values(df, CHURN)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            Some(v) if v.abs() < TOLERANCE => Ok(0),
            Some(v) if (v - 1.0).abs() < TOLERANCE => Ok(1),
            Some(v) => Err(anyhow::Error::from(PipelineError::schema(format!(
                "column '{}' must be binary 0/1, found {} at row {}",
                CHURN, v, row
            )))),
            None => Err(anyhow::Error::from(PipelineError::schema(format!(
                "column '{}' has a missing value at row {}",
                CHURN, row
            )))),
        })
        .collect()
}

fn take_rows(df: &DataFrame, indices: &[usize]) -> Result<DataFrame> {
    let idx: Vec<IdxSize> = indices.iter().map(|&i| i as IdxSize).collect();
    Ok(df.take(&IdxCa::from_vec("idx".into(), idx))?)
}

/// Prepare an enriched table for training.
///
/// Separates `churn` as the label, one-hot encodes the remaining categorical
/// columns with the first level dropped, and performs the fixed 25% stratified
/// hold-out split with seed 42.
pub fn prepare_data(df: &DataFrame) -> Result<TrainTestSplit> {
    ensure_not_empty(df, "cleaning")?;

    let labels = extract_labels(df)?;
    let features = df.drop(CHURN)?;
    let encoded = one_hot_encode(&features, true)?;

    if encoded.width() == 0 {
        return Err(PipelineError::schema("no feature columns besides 'churn'").into());
    }

    let split = stratified_split(&labels, TEST_SIZE, RANDOM_SEED)?;

    Ok(TrainTestSplit {
        x_train: take_rows(&encoded, &split.train)?,
        x_test: take_rows(&encoded, &split.test)?,
        y_train: split.train.iter().map(|&i| labels[i]).collect(),
        y_test: split.test.iter().map(|&i| labels[i]).collect(),
    })
}
