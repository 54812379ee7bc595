//! CLI module - argument parsing, interactive prompts and subcommand runners

mod args;
mod prepare;
mod prompts;
mod score;
mod summary;
mod train;

pub use args::{derive_output_path, model_path, processed_path, Cli, Commands, ScoreArgs};
pub use prepare::run_prepare;
pub use prompts::*;
pub use score::run_score;
pub use summary::run_summary;
pub use train::{run_train, TrainOptions};
