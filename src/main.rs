//! churnlens: Customer Churn CLI Tool
//!
//! Prepares customer datasets, trains the churn classifier and scores
//! individual customers from the command line.

use anyhow::Result;
use clap::Parser;

use churnlens::cli::{run_prepare, run_score, run_summary, run_train, Cli, Commands, TrainOptions};
use churnlens::pipeline::TrainConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Prepare {
            input,
            output,
            drop_columns,
            infer_schema_length,
        } => run_prepare(&input, output.as_deref(), &drop_columns, infer_schema_length),
        Commands::Train {
            input,
            output,
            metrics_output,
            max_iter,
            regularization,
            drop_columns,
            no_confirm,
            infer_schema_length,
        } => run_train(
            &input,
            &TrainOptions {
                output,
                metrics_output,
                config: TrainConfig {
                    max_iter,
                    c: regularization,
                },
                drop_columns,
                no_confirm,
                infer_schema_length,
            },
        ),
        Commands::Score(args) => run_score(&args),
        Commands::Summary {
            data,
            model,
            risk,
            priority,
            rows,
        } => run_summary(&data, &model, &risk, &priority, rows),
    }
}
