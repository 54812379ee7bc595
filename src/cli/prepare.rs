//! `prepare` subcommand: raw customer file to processed feature table

use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use super::args::processed_path;
use crate::pipeline::columns::DERIVED_FEATURES;
use crate::pipeline::{
    build_dataset, drop_excluded_columns, get_column_names, load_dataset_with_progress,
    save_dataset, unknown_columns,
};
use crate::utils::{
    create_spinner, display_path, finish_with_success, print_banner, print_completion,
    print_config, print_info, print_stat, print_step_header, print_step_time, print_success,
    print_warning,
};

/// Warn about `--drop-columns` entries that are not in the input header
pub(crate) fn check_drop_columns(input: &Path, drop_columns: &[String]) -> Result<()> {
    if drop_columns.is_empty() {
        return Ok(());
    }
    let header = get_column_names(input)?;
    let unknown = unknown_columns(&header, drop_columns);
    if !unknown.is_empty() {
        print_warning(&format!(
            "Ignoring unknown column(s) in --drop-columns: {}",
            unknown.join(", ")
        ));
    }
    Ok(())
}

/// Clean a raw dataset, add the derived features and write the result
pub fn run_prepare(
    input: &Path,
    output: Option<&Path>,
    drop_columns: &[String],
    infer_schema_length: usize,
) -> Result<()> {
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| processed_path(input));

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        "PREPARE",
        &[
            ("Input", display_path(input, 40)),
            ("Output", display_path(&output_path, 40)),
            (
                "Excluded",
                if drop_columns.is_empty() {
                    "none".to_string()
                } else {
                    drop_columns.join(", ")
                },
            ),
        ],
    );

    check_drop_columns(input, drop_columns)?;

    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let (raw, rows, cols, memory_mb) = load_dataset_with_progress(input, infer_schema_length)?;
    print_stat("Rows", rows);
    print_stat("Columns", cols);
    print_stat("Estimated memory", format!("{:.2} MB", memory_mb));
    print_step_time(step_start.elapsed());

    print_step_header(2, "Clean and Engineer Features");
    let step_start = Instant::now();
    let raw = drop_excluded_columns(&raw, drop_columns);
    let spinner = create_spinner("Normalizing columns and dropping incomplete rows...");
    let mut processed = build_dataset(&raw)?;
    finish_with_success(&spinner, "Features engineered");

    let dropped = rows - processed.height();
    if dropped == 0 {
        print_info("No incomplete rows found");
    } else {
        print_stat("Rows dropped for missing values", dropped);
    }
    print_stat("Derived features added", DERIVED_FEATURES.len());
    print_step_time(step_start.elapsed());

    print_step_header(3, "Save Results");
    let step_start = Instant::now();
    let spinner = create_spinner("Writing output file...");
    save_dataset(&mut processed, &output_path)?;
    finish_with_success(&spinner, &format!("Saved to {}", output_path.display()));
    print_step_time(step_start.elapsed());

    print_success(&format!(
        "{} rows x {} columns ready for training",
        processed.height(),
        processed.width()
    ));
    print_completion("Dataset prepared");
    Ok(())
}
