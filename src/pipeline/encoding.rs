//! One-hot encoding and feature schema alignment
//!
//! Training encodes with the first level of each categorical dropped; scoring
//! keeps every level and then aligns to the model's schema.

use anyhow::Result;
use polars::prelude::*;
use std::collections::BTreeSet;

use super::columns::optional_string_values;
use super::error::PipelineError;
use super::features::category_levels;

/// Whether a column is treated as categorical by the encoder
fn is_categorical(dtype: &DataType) -> bool {
    matches!(dtype, DataType::String | DataType::Categorical(_, _))
}

/// Name of the indicator column for one level of a categorical
pub fn dummy_column_name(column: &str, level: &str) -> String {
    format!("{}_{}", column, level)
}

/// Levels of a categorical column, in encoding order.
///
/// Binned columns use their declared order and always emit every level;
/// other columns use their sorted distinct non-null values.
fn levels_for(column: &str, values: &[Option<String>]) -> Vec<String> {
    if let Some(levels) = category_levels(column) {
        return levels.iter().map(|l| l.to_string()).collect();
    }
    values
        .iter()
        .flatten()
        .cloned()
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// One-hot encode every categorical column of a table.
///
/// Non-categorical columns are kept in their original order, followed by the
/// indicator columns (`{column}_{level}`, 0/1) of each categorical in column
/// order. A null category encodes as all zeros. With `drop_first` the first
/// level of each categorical is omitted as the reference category.
pub fn one_hot_encode(df: &DataFrame, drop_first: bool) -> Result<DataFrame> {
    let mut kept: Vec<Column> = Vec::new();
    let mut dummies: Vec<Column> = Vec::new();

    for col in df.get_columns() {
        if !is_categorical(col.dtype()) {
            kept.push(col.clone());
            continue;
        }

        let name = col.name().as_str();
        let values = optional_string_values(df, name)?;
        let levels = levels_for(name, &values);
        let skip = usize::from(drop_first);

        for level in levels.iter().skip(skip) {
            let indicator: Vec<i32> = values
                .iter()
                .map(|v| i32::from(v.as_deref() == Some(level.as_str())))
                .collect();
            dummies.push(Column::new(dummy_column_name(name, level).into(), indicator));
        }
    }

    kept.extend(dummies);
    Ok(DataFrame::new(kept)?)
}

/// Align an encoded table to an ordered feature schema.
///
/// Every schema column absent from `encoded` is inserted filled with zeros;
/// the result contains exactly the schema columns, in schema order, as
/// `Float64`. Columns not in the schema are discarded.
pub fn align_to_schema(encoded: &DataFrame, schema: &[String]) -> Result<DataFrame> {
    if schema.is_empty() {
        return Err(PipelineError::model_contract("feature schema is empty").into());
    }

    let height = encoded.height();
    let columns: Vec<Column> = schema
        .iter()
        .map(|name| match encoded.get_column_index(name) {
            Some(idx) => encoded.get_columns()[idx]
                .cast(&DataType::Float64)
                .map_err(|e| {
                    anyhow::Error::from(PipelineError::model_contract(format!(
                        "column '{}' cannot be used as a numeric feature: {}",
                        name, e
                    )))
                }),
            None => Ok(Column::new(name.as_str().into(), vec![0.0f64; height])),
        })
        .collect::<Result<Vec<Column>>>()?;

    Ok(DataFrame::new(columns)?)
}
