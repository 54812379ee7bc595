//! Raw table cleaning: column name normalization, legacy renames, and
//! removal of incomplete rows.

use anyhow::Result;
use polars::prelude::*;
use std::collections::HashSet;

use super::error::PipelineError;

/// Legacy source column names and their canonical replacements
pub const LEGACY_RENAMES: &[(&str, &str)] = &[
    ("exited", "churn"),
    ("hascrcard", "has_credit_card"),
    ("isactivemember", "is_active_member"),
];

/// Normalize a single column name: trim, lowercase, spaces to underscores
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Map a normalized column name through the legacy rename table
pub fn canonical_column_name(name: &str) -> String {
    let normalized = normalize_column_name(name);
    LEGACY_RENAMES
        .iter()
        .find(|(legacy, _)| *legacy == normalized)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(normalized)
}

/// Replace `NaN` with null in a float column; other columns are returned as is
fn nan_to_null(col: &Column) -> Result<Column> {
    let name = col.name().clone();
    let out = match col.dtype() {
        DataType::Float64 => col
            .f64()?
            .iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect::<Float64Chunked>()
            .with_name(name)
            .into_column(),
        DataType::Float32 => col
            .f32()?
            .iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect::<Float32Chunked>()
            .with_name(name)
            .into_column(),
        _ => col.clone(),
    };
    Ok(out)
}

/// Clean a raw customer table.
///
/// Normalizes and renames every column, then drops every row that has a null
/// or a float `NaN` in any column. The input is left untouched. Column presence is not
/// validated here; downstream stages raise a schema error for missing columns.
///
/// Running `clean` on its own output returns an identical table.
pub fn clean(raw: &DataFrame) -> Result<DataFrame> {
    let names: Vec<String> = raw
        .get_column_names()
        .iter()
        .map(|name| canonical_column_name(name.as_str()))
        .collect();

    let mut seen = HashSet::new();
    for name in &names {
        if !seen.insert(name.as_str()) {
            return Err(PipelineError::schema(format!(
                "column name '{}' occurs more than once after normalization",
                name
            ))
            .into());
        }
    }

    let columns = raw
        .get_columns()
        .iter()
        .map(nan_to_null)
        .collect::<Result<Vec<Column>>>()?;
    let mut df = DataFrame::new(columns)?;
    df.set_column_names(names)?;

    Ok(df.drop_nulls::<String>(None)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name("  Satisfaction Score "), "satisfaction_score");
        assert_eq!(normalize_column_name("NumOfProducts"), "numofproducts");
        assert_eq!(normalize_column_name("Card  Type"), "card__type");
        assert_eq!(normalize_column_name("already_clean"), "already_clean");
    }

    #[test]
    fn test_canonical_column_name_applies_renames() {
        assert_eq!(canonical_column_name("Exited"), "churn");
        assert_eq!(canonical_column_name("HasCrCard"), "has_credit_card");
        assert_eq!(canonical_column_name(" IsActiveMember"), "is_active_member");
        assert_eq!(canonical_column_name("Balance"), "balance");
        assert_eq!(canonical_column_name("churn"), "churn");
    }

    #[test]
    fn test_clean_rejects_colliding_names() {
        let df = df! {
            "Exited" => [0i32, 1],
            "churn" => [0i32, 1],
        }
        .unwrap();

        let err = clean(&df).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::Schema(_))
        ));
    }
}
