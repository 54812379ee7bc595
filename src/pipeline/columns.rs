//! Canonical column names and typed column access helpers

use anyhow::Result;
use polars::prelude::*;

use super::error::PipelineError;

pub const AGE: &str = "age";
pub const TENURE: &str = "tenure";
pub const BALANCE: &str = "balance";
pub const NUM_PRODUCTS: &str = "numofproducts";
pub const HAS_CREDIT_CARD: &str = "has_credit_card";
pub const IS_ACTIVE_MEMBER: &str = "is_active_member";
pub const SATISFACTION_SCORE: &str = "satisfaction_score";
pub const COMPLAIN: &str = "complain";
pub const ESTIMATED_SALARY: &str = "estimatedsalary";

/// Outcome column (1 = churned)
pub const CHURN: &str = "churn";

pub const AGE_GROUP: &str = "age_group";
pub const TENURE_GROUP: &str = "tenure_group";
pub const HIGH_BALANCE_FLAG: &str = "high_balance_flag";
pub const ENGAGEMENT_SCORE: &str = "engagement_score";
pub const LOW_SATISFACTION_FLAG: &str = "low_satisfaction_flag";
pub const SINGLE_PRODUCT_FLAG: &str = "single_product_flag";

/// Upstream segmentation columns read by the dashboard
pub const RISK_SEGMENT: &str = "risk_segment";
pub const RETENTION_PRIORITY: &str = "retention_priority";
pub const CLV: &str = "clv";

/// The nine base attributes accepted by the scoring surface, in form order
pub const BASE_FEATURES: [&str; 9] = [
    AGE,
    TENURE,
    BALANCE,
    NUM_PRODUCTS,
    IS_ACTIVE_MEMBER,
    HAS_CREDIT_CARD,
    SATISFACTION_SCORE,
    COMPLAIN,
    ESTIMATED_SALARY,
];

/// Columns added by feature engineering, in output order
pub const DERIVED_FEATURES: [&str; 6] = [
    AGE_GROUP,
    TENURE_GROUP,
    HIGH_BALANCE_FLAG,
    ENGAGEMENT_SCORE,
    LOW_SATISFACTION_FLAG,
    SINGLE_PRODUCT_FLAG,
];

/// Check whether a DataFrame has a column with the given name
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Fetch a column, raising a schema error when it is absent
pub fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    if !has_column(df, name) {
        let available: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        return Err(PipelineError::schema(format!(
            "required column '{}' not found. Available columns: {:?}",
            name, available
        ))
        .into());
    }
    Ok(df.column(name)?)
}

/// Read a column as `f64` values, keeping nulls
pub fn optional_f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let col = require_column(df, name)?;
    let cast = col.cast(&DataType::Float64).map_err(|e| {
        PipelineError::schema(format!("column '{}' is not numeric: {}", name, e))
    })?;
    Ok(cast.f64()?.into_iter().collect())
}

/// Read a column as `f64` values, raising a schema error on any null
pub fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let values = optional_f64_values(df, name)?;
    let null_count = values.iter().filter(|v| v.is_none()).count();
    if null_count > 0 {
        return Err(PipelineError::schema(format!(
            "column '{}' contains {} null value(s); clean the table first",
            name, null_count
        ))
        .into());
    }
    Ok(values.into_iter().flatten().collect())
}

/// Read a column as strings, keeping nulls
pub fn optional_string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let col = require_column(df, name)?;
    let cast = col.cast(&DataType::String)?;
    Ok(cast
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect())
}
