//! Error types raised by the churn pipeline stages.
//!
//! Library functions return `anyhow::Result` and raise these variants for the
//! failure modes callers are expected to tell apart. Use
//! `err.downcast_ref::<PipelineError>()` to inspect them.

use thiserror::Error;

/// Deterministic pipeline failures. None of these are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// A required column is missing, has an unusable type, or holds
    /// unexpected nulls.
    #[error("Schema error: {0}")]
    Schema(String),

    /// The data itself cannot support the requested stage (e.g. zero rows left
    /// after cleaning, or a class too small to split).
    #[error("Data quality error: {0}")]
    DataQuality(String),

    /// The trained model's schema or parameters cannot be reconciled with an
    /// input, or produced an out-of-contract probability.
    #[error("Model contract error: {0}")]
    ModelContract(String),
}

impl PipelineError {
    pub fn schema(message: impl Into<String>) -> Self {
        PipelineError::Schema(message.into())
    }

    pub fn data_quality(message: impl Into<String>) -> Self {
        PipelineError::DataQuality(message.into())
    }

    pub fn model_contract(message: impl Into<String>) -> Self {
        PipelineError::ModelContract(message.into())
    }
}
