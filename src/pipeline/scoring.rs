//! Single-customer churn scoring against a trained model
//!
//! The scoring input carries only the nine base attributes. Derived features
//! used in training are not recomputed here; their schema columns
//! are filled with zero during alignment.

use anyhow::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::columns::*;
use super::encoding::{align_to_schema, one_hot_encode};
use super::error::PipelineError;
use super::model::{frame_to_columns, TrainedModel};

/// Probability at or above which a customer is high risk
pub const HIGH_RISK_THRESHOLD: f64 = 0.60;

/// Probability at or above which a customer is medium risk
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.30;

/// One ad hoc customer record submitted for scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringInput {
    pub age: u32,
    pub tenure: u32,
    pub balance: f64,
    pub num_products: u32,
    pub is_active_member: bool,
    pub has_credit_card: bool,
    pub satisfaction_score: u32,
    pub complain: bool,
    pub estimated_salary: f64,
}

impl ScoringInput {
    /// Build a one-row table using the canonical column names
    pub fn to_frame(&self) -> Result<DataFrame> {
        let frame = df! {
            AGE => [i64::from(self.age)],
            TENURE => [i64::from(self.tenure)],
            BALANCE => [self.balance],
            NUM_PRODUCTS => [i64::from(self.num_products)],
            IS_ACTIVE_MEMBER => [i64::from(self.is_active_member)],
            HAS_CREDIT_CARD => [i64::from(self.has_credit_card)],
            SATISFACTION_SCORE => [i64::from(self.satisfaction_score)],
            COMPLAIN => [i64::from(self.complain)],
            ESTIMATED_SALARY => [self.estimated_salary],
        }?;
        Ok(frame)
    }
}

/// Three-tier churn risk label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Tier for a churn probability; lower bounds are inclusive
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_RISK_THRESHOLD {
            RiskTier::High
        } else if probability >= MEDIUM_RISK_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    /// Recommended follow-up shown next to the tier
    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskTier::High => "Immediate retention action recommended",
            RiskTier::Medium => "Monitor closely",
            RiskTier::Low => "Customer likely to stay",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::Low => write!(f, "Low"),
            RiskTier::Medium => write!(f, "Medium"),
            RiskTier::High => write!(f, "High"),
        }
    }
}

/// Probability and tier returned to the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringOutcome {
    pub probability: f64,
    pub tier: RiskTier,
}

/// Encode a scoring input and align it to the model's schema
pub fn encode_input(input: &ScoringInput, model: &TrainedModel) -> Result<DataFrame> {
    model.validate()?;
    let encoded = one_hot_encode(&input.to_frame()?, false)?;
    align_to_schema(&encoded, &model.feature_names)
}

/// Churn probability for a single customer
pub fn score(input: &ScoringInput, model: &TrainedModel) -> Result<f64> {
    let aligned = encode_input(input, model)?;
    let row: Vec<f64> = frame_to_columns(&aligned)?
        .into_iter()
        .map(|column| column[0])
        .collect();

    let probability = model.predict_row(&row)?;
    if !(0.0..=1.0).contains(&probability) {
        return Err(PipelineError::model_contract(format!(
            "churn probability {} is outside [0, 1]",
            probability
        ))
        .into());
    }
    Ok(probability)
}

/// Churn probability together with its risk tier
pub fn score_with_tier(input: &ScoringInput, model: &TrainedModel) -> Result<ScoringOutcome> {
    let probability = score(input, model)?;
    Ok(ScoringOutcome {
        probability,
        tier: RiskTier::from_probability(probability),
    })
}
