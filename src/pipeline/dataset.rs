//! Raw-to-processed dataset construction

use anyhow::Result;
use polars::prelude::*;

use super::cleaner::{canonical_column_name, clean};
use super::features::add_features;
use super::training::ensure_not_empty;

/// Drop user-excluded columns (e.g. identifiers) before processing.
///
/// Names are matched after normalization, so `CustomerId` and `customerid`
/// refer to the same column. Unknown names are ignored.
pub fn drop_excluded_columns(df: &DataFrame, excluded: &[String]) -> DataFrame {
    let excluded: Vec<String> = excluded.iter().map(|c| canonical_column_name(c)).collect();
    let to_drop: Vec<String> = df
        .get_column_names()
        .iter()
        .filter(|name| excluded.contains(&canonical_column_name(name.as_str())))
        .map(|name| name.to_string())
        .collect();
    df.drop_many(&to_drop)
}

/// Requested exclusions that match no column of `available`.
///
/// Matching uses the same normalization as [`drop_excluded_columns`].
pub fn unknown_columns(available: &[String], excluded: &[String]) -> Vec<String> {
    let available: Vec<String> = available.iter().map(|c| canonical_column_name(c)).collect();
    excluded
        .iter()
        .filter(|name| !available.contains(&canonical_column_name(name)))
        .cloned()
        .collect()
}

/// Clean a raw table and add the derived features.
///
/// Fails with a data quality error when cleaning leaves no rows.
pub fn build_dataset(raw: &DataFrame) -> Result<DataFrame> {
    let cleaned = clean(raw)?;
    ensure_not_empty(&cleaned, "dropping incomplete rows")?;
    add_features(&cleaned)
}
