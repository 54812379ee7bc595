//! Read-only dashboard context
//!
//! Loads the processed dataset and trained model exactly once; every handler
//! then borrows the same context. Nothing here mutates after construction.

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use crate::pipeline::columns::{
    optional_f64_values, optional_string_values, require_column, CHURN, CLV, RETENTION_PRIORITY,
    RISK_SEGMENT,
};
use crate::pipeline::{load_dataset, score_with_tier, ScoringInput, ScoringOutcome, TrainedModel};

/// Segment label counted as high risk in the KPI cards
pub const HIGH_RISK_SEGMENT: &str = "High Risk";

/// Priority label counted as critical in the KPI cards
pub const CRITICAL_PRIORITY: &str = "Critical Priority";

/// Headline numbers shown at the top of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardKpis {
    pub total_customers: usize,
    /// Percentage of churned customers, rounded to two decimals
    pub churn_rate_pct: f64,
    /// `None` when the dataset has no `risk_segment` column
    pub high_risk_customers: Option<usize>,
    /// `None` when the dataset has no `retention_priority` column
    pub critical_priority_customers: Option<usize>,
    /// `None` when the dataset has no `clv` column
    pub average_clv: Option<f64>,
}

/// Dataset and model shared by all dashboard handlers
#[derive(Debug, Clone)]
pub struct DashboardContext {
    dataset: DataFrame,
    model: TrainedModel,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl DashboardContext {
    /// Build a context from already loaded parts
    pub fn new(dataset: DataFrame, model: TrainedModel) -> Result<Self> {
        model.validate()?;
        require_column(&dataset, CHURN)?;
        Ok(Self { dataset, model })
    }

    /// Load the processed dataset and the model artifact once
    pub fn load(data_path: &Path, model_path: &Path) -> Result<Self> {
        let dataset = load_dataset(data_path, 10000)?
            .collect()
            .with_context(|| format!("Failed to read dataset: {}", data_path.display()))?;
        let model = TrainedModel::load(model_path)?;
        Self::new(dataset, model)
    }

    pub fn dataset(&self) -> &DataFrame {
        &self.dataset
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    fn count_equal(&self, column: &str, value: &str) -> Result<Option<usize>> {
        if self.dataset.get_column_index(column).is_none() {
            return Ok(None);
        }
        let values = optional_string_values(&self.dataset, column)?;
        Ok(Some(
            values
                .iter()
                .filter(|v| v.as_deref() == Some(value))
                .count(),
        ))
    }

    /// Compute the headline KPIs
    pub fn kpis(&self) -> Result<DashboardKpis> {
        let churn: Vec<f64> = optional_f64_values(&self.dataset, CHURN)?
            .into_iter()
            .flatten()
            .collect();
        let churn_rate_pct = if churn.is_empty() {
            0.0
        } else {
            round2(churn.iter().sum::<f64>() / churn.len() as f64 * 100.0)
        };

        let average_clv = if self.dataset.get_column_index(CLV).is_some() {
            let clv: Vec<f64> = optional_f64_values(&self.dataset, CLV)?
                .into_iter()
                .flatten()
                .collect();
            (!clv.is_empty()).then(|| round2(clv.iter().sum::<f64>() / clv.len() as f64))
        } else {
            None
        };

        Ok(DashboardKpis {
            total_customers: self.dataset.height(),
            churn_rate_pct,
            high_risk_customers: self.count_equal(RISK_SEGMENT, HIGH_RISK_SEGMENT)?,
            critical_priority_customers: self.count_equal(RETENTION_PRIORITY, CRITICAL_PRIORITY)?,
            average_clv,
        })
    }

    /// Value counts of a column, most frequent first (ties by value)
    pub fn distribution(&self, column: &str) -> Result<Vec<(String, usize)>> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for value in optional_string_values(&self.dataset, column)?.into_iter().flatten() {
            *counts.entry(value).or_default() += 1;
        }
        let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(sorted)
    }

    /// Distinct values of a column in first-seen order
    pub fn unique_values(&self, column: &str) -> Result<Vec<String>> {
        let mut seen: Vec<String> = Vec::new();
        for value in optional_string_values(&self.dataset, column)?.into_iter().flatten() {
            if !seen.contains(&value) {
                seen.push(value);
            }
        }
        Ok(seen)
    }

    /// Rows whose risk segment and retention priority are both selected.
    ///
    /// An empty selection means "all values" for that column.
    pub fn filter_segments(&self, risk: &[String], priority: &[String]) -> Result<DataFrame> {
        let risk_values = optional_string_values(&self.dataset, RISK_SEGMENT)?;
        let priority_values = optional_string_values(&self.dataset, RETENTION_PRIORITY)?;

        let selected = |choices: &[String], value: &Option<String>| {
            choices.is_empty()
                || value
                    .as_ref()
                    .map(|v| choices.contains(v))
                    .unwrap_or(false)
        };

        let mask: BooleanChunked = risk_values
            .iter()
            .zip(priority_values.iter())
            .map(|(r, p)| Some(selected(risk, r) && selected(priority, p)))
            .collect();

        Ok(self.dataset.filter(&mask)?)
    }

    /// CLV values sorted ascending, for the CLV curve
    pub fn sorted_clv(&self) -> Result<Vec<f64>> {
        let mut clv: Vec<f64> = optional_f64_values(&self.dataset, CLV)?
            .into_iter()
            .flatten()
            .collect();
        clv.sort_by(|a, b| a.total_cmp(b));
        Ok(clv)
    }

    /// Score a submitted form against the loaded model
    pub fn score(&self, input: &ScoringInput) -> Result<ScoringOutcome> {
        score_with_tier(input, &self.model)
    }
}
