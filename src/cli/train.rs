//! `train` subcommand: fit, evaluate and persist the churn classifier

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;

use super::args::model_path;
use super::prepare::check_drop_columns;
use super::prompts::confirm_overwrite;
use crate::pipeline::{
    drop_excluded_columns, evaluate_model, load_dataset_with_progress, prepare_data, train_model,
    TrainConfig,
};
use crate::report::{export_evaluation, ExportParams, TrainingSummary};
use crate::utils::{
    create_spinner, display_path, finish_with_success, finish_with_warning, print_banner,
    print_completion, print_config, print_info, print_stat, print_step_header, print_step_time,
    print_success, print_warning,
};

/// Everything the `train` subcommand needs besides the input path
#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub output: Option<PathBuf>,
    pub metrics_output: Option<PathBuf>,
    pub config: TrainConfig,
    pub drop_columns: Vec<String>,
    pub no_confirm: bool,
    pub infer_schema_length: usize,
}

/// Train on a processed dataset, report held-out metrics and save the model
pub fn run_train(input: &Path, options: &TrainOptions) -> Result<()> {
    let output_path = options
        .output
        .clone()
        .unwrap_or_else(|| model_path(input));

    if output_path.exists() && !options.no_confirm && !confirm_overwrite(&output_path)? {
        println!("Cancelled by user.");
        return Ok(());
    }

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        "TRAIN",
        &[
            ("Input", display_path(input, 40)),
            ("Model", display_path(&output_path, 40)),
            ("Max iterations", options.config.max_iter.to_string()),
            ("Regularization C", format!("{}", options.config.c)),
        ],
    );

    check_drop_columns(input, &options.drop_columns)?;

    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let (df, rows, cols, memory_mb) =
        load_dataset_with_progress(input, options.infer_schema_length)?;
    print_stat("Rows", rows);
    print_stat("Columns", cols);
    print_stat("Estimated memory", format!("{:.2} MB", memory_mb));
    let df = drop_excluded_columns(&df, &options.drop_columns);
    let mut summary = TrainingSummary::new(rows);
    let load_elapsed = step_start.elapsed();
    summary.set_load_time(load_elapsed);
    print_step_time(load_elapsed);

    print_step_header(2, "Encode and Split");
    let step_start = Instant::now();
    let spinner = create_spinner("Encoding categorical features...");
    let split = prepare_data(&df)?;
    finish_with_success(&spinner, "Stratified split complete");
    print_stat("Encoded features", split.x_train.width());
    print_stat("Train rows", split.y_train.len());
    print_stat("Test rows", split.y_test.len());
    summary.set_split(split.y_train.len(), split.y_test.len());
    print_step_time(step_start.elapsed());

    print_step_header(3, "Train Model");
    let step_start = Instant::now();
    let spinner = create_spinner("Fitting logistic regression...");
    let model = train_model(&split.x_train, &split.y_train, &options.config)?;
    if model.metadata.converged {
        finish_with_success(
            &spinner,
            &format!("Converged after {} iteration(s)", model.metadata.iterations),
        );
    } else {
        finish_with_warning(
            &spinner,
            &format!(
                "Stopped at the iteration limit ({}) before converging",
                model.metadata.iterations
            ),
        );
        print_warning("Consider raising --max-iter or lowering --regularization");
    }
    let train_elapsed = step_start.elapsed();
    summary.set_train_time(train_elapsed);
    summary.set_model(&model);
    print_step_time(train_elapsed);

    print_step_header(4, "Evaluate");
    let step_start = Instant::now();
    let metrics = evaluate_model(&model, &split.x_test, &split.y_test)?;
    print_stat("Accuracy", format!("{:.4}", metrics.accuracy));
    print_stat("ROC-AUC", format!("{:.4}", metrics.roc_auc));
    print_step_time(step_start.elapsed());

    print_step_header(5, "Save Results");
    let step_start = Instant::now();
    model.save(&output_path)?;
    print_success(&format!("Model saved to {}", output_path.display()));

    match &options.metrics_output {
        Some(metrics_path) => {
            let input_file = input.display().to_string();
            let model_file = output_path.display().to_string();
            export_evaluation(
                &metrics,
                &model,
                metrics_path,
                &ExportParams {
                    input_file: &input_file,
                    model_file: &model_file,
                    train_rows: split.y_train.len(),
                    test_rows: split.y_test.len(),
                },
            )?;
            print_success(&format!("Metrics saved to {}", metrics_path.display()));
        }
        None => print_info("Metrics export skipped (use --metrics-output to enable)"),
    }
    print_step_time(step_start.elapsed());

    summary.set_metrics(metrics);
    summary.display();

    print_completion("Training complete");
    Ok(())
}
