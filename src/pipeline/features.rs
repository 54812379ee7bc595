//! Feature engineering on cleaned customer tables
//!
//! Adds two binned categoricals and four integer flags/scores. Breakpoints are
//! fixed; only `high_balance_flag` depends on the table it is computed on.

use anyhow::Result;
use polars::prelude::*;

use super::columns::*;

/// Age bin edges; bins are `(lower, upper]`
pub const AGE_EDGES: [f64; 5] = [0.0, 30.0, 45.0, 60.0, 100.0];
pub static AGE_LABELS: [&str; 4] = ["Young", "Mid-Age", "Senior", "Elder"];

/// Tenure bin edges (years); bins are `(lower, upper]`
pub const TENURE_EDGES: [f64; 5] = [0.0, 2.0, 5.0, 10.0, 50.0];
pub static TENURE_LABELS: [&str; 4] = ["New", "Early", "Established", "Loyal"];

/// Satisfaction scores at or below this value are flagged as low
const LOW_SATISFACTION_MAX: f64 = 2.0;

/// Assign a value to a right-closed bin.
///
/// `edges` has one more entry than `labels`. A value equal to a shared edge
/// falls into the lower bin; the first edge itself is excluded. Returns `None`
/// for values outside every bin.
pub fn assign_bin(value: f64, edges: &[f64], labels: &[&'static str]) -> Option<&'static str> {
    edges
        .windows(2)
        .zip(labels.iter())
        .find(|(edge, _)| value > edge[0] && value <= edge[1])
        .map(|(_, label)| *label)
}

/// Declared level order for the binned categorical columns
pub fn category_levels(column: &str) -> Option<&'static [&'static str]> {
    match column {
        AGE_GROUP => Some(&AGE_LABELS[..]),
        TENURE_GROUP => Some(&TENURE_LABELS[..]),
        _ => None,
    }
}

/// Median of a slice (mean of the two middle values for even lengths)
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

fn flag(condition: bool) -> i32 {
    i32::from(condition)
}

/// Add the six derived feature columns to a cleaned table.
///
/// Row count and order are preserved and no existing column is removed.
/// `high_balance_flag` compares against the median balance of `df` itself, so
/// the same balance may be flagged differently in different subsets.
///
/// Returns a schema error when a required base column is missing or contains
/// nulls.
pub fn add_features(df: &DataFrame) -> Result<DataFrame> {
    let age = f64_values(df, AGE)?;
    let tenure = f64_values(df, TENURE)?;
    let balance = f64_values(df, BALANCE)?;
    let active = f64_values(df, IS_ACTIVE_MEMBER)?;
    let credit_card = f64_values(df, HAS_CREDIT_CARD)?;
    let complain = f64_values(df, COMPLAIN)?;
    let satisfaction = f64_values(df, SATISFACTION_SCORE)?;
    let products = f64_values(df, NUM_PRODUCTS)?;

    let age_group: Vec<Option<&str>> = age
        .iter()
        .map(|&v| assign_bin(v, &AGE_EDGES, &AGE_LABELS))
        .collect();

    let tenure_group: Vec<Option<&str>> = tenure
        .iter()
        .map(|&v| assign_bin(v, &TENURE_EDGES, &TENURE_LABELS))
        .collect();

    let high_balance: Vec<i32> = match median(&balance) {
        Some(threshold) => balance.iter().map(|&b| flag(b > threshold)).collect(),
        None => Vec::new(),
    };

    let engagement: Vec<i32> = active
        .iter()
        .zip(credit_card.iter())
        .zip(complain.iter())
        .map(|((&a, &c), &k)| flag(a != 0.0) + flag(c != 0.0) + flag(k == 0.0))
        .collect();

    let low_satisfaction: Vec<i32> = satisfaction
        .iter()
        .map(|&s| flag(s <= LOW_SATISFACTION_MAX))
        .collect();

    let single_product: Vec<i32> = products.iter().map(|&p| flag(p == 1.0)).collect();

    let mut out = df.clone();
    out.with_column(Column::new(AGE_GROUP.into(), age_group))?;
    out.with_column(Column::new(TENURE_GROUP.into(), tenure_group))?;
    out.with_column(Column::new(HIGH_BALANCE_FLAG.into(), high_balance))?;
    out.with_column(Column::new(ENGAGEMENT_SCORE.into(), engagement))?;
    out.with_column(Column::new(LOW_SATISFACTION_FLAG.into(), low_satisfaction))?;
    out.with_column(Column::new(SINGLE_PRODUCT_FLAG.into(), single_product))?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_bin_boundaries() {
        assert_eq!(assign_bin(30.0, &AGE_EDGES, &AGE_LABELS), Some("Young"));
        assert_eq!(assign_bin(31.0, &AGE_EDGES, &AGE_LABELS), Some("Mid-Age"));
        assert_eq!(assign_bin(45.0, &AGE_EDGES, &AGE_LABELS), Some("Mid-Age"));
        assert_eq!(assign_bin(60.0, &AGE_EDGES, &AGE_LABELS), Some("Senior"));
        assert_eq!(assign_bin(100.0, &AGE_EDGES, &AGE_LABELS), Some("Elder"));
    }

    #[test]
    fn test_values_outside_bins_are_unlabeled() {
        // First edge is exclusive
        assert_eq!(assign_bin(0.0, &TENURE_EDGES, &TENURE_LABELS), None);
        assert_eq!(assign_bin(101.0, &AGE_EDGES, &AGE_LABELS), None);
        assert_eq!(assign_bin(-1.0, &AGE_EDGES, &AGE_LABELS), None);
    }

    #[test]
    fn test_tenure_bins() {
        assert_eq!(assign_bin(1.0, &TENURE_EDGES, &TENURE_LABELS), Some("New"));
        assert_eq!(assign_bin(2.0, &TENURE_EDGES, &TENURE_LABELS), Some("New"));
        assert_eq!(assign_bin(3.0, &TENURE_EDGES, &TENURE_LABELS), Some("Early"));
        assert_eq!(assign_bin(10.0, &TENURE_EDGES, &TENURE_LABELS), Some("Established"));
        assert_eq!(assign_bin(11.0, &TENURE_EDGES, &TENURE_LABELS), Some("Loyal"));
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_category_levels() {
        assert_eq!(category_levels(AGE_GROUP), Some(&AGE_LABELS[..]));
        assert_eq!(category_levels(TENURE_GROUP), Some(&TENURE_LABELS[..]));
        assert_eq!(category_levels("geography"), None);
    }
}
