//! Command-line argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::pipeline::{ScoringInput, DEFAULT_C, DEFAULT_MAX_ITER};

/// churnlens - Customer churn feature engineering, training and scoring
#[derive(Parser, Debug)]
#[command(name = "churnlens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean a raw customer file and add the derived churn features
    Prepare {
        /// Input file path (CSV or Parquet)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (CSV or Parquet, determined by extension).
        /// Defaults to input directory with '_processed' suffix.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Columns to drop before processing (comma-separated), e.g. identifiers
        #[arg(long, value_delimiter = ',')]
        drop_columns: Vec<String>,

        /// Number of rows to use for schema inference (CSV only).
        /// Use 0 for full table scan.
        #[arg(long, default_value = "10000")]
        infer_schema_length: usize,
    },

    /// Train the churn classifier on a processed dataset
    Train {
        /// Processed dataset path (CSV or Parquet)
        #[arg(short, long)]
        input: PathBuf,

        /// Model artifact path (JSON).
        /// Defaults to input directory with '_model.json' suffix.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write held-out evaluation metrics to this JSON file
        #[arg(long)]
        metrics_output: Option<PathBuf>,

        /// Maximum solver iterations
        #[arg(long, default_value_t = DEFAULT_MAX_ITER)]
        max_iter: usize,

        /// Inverse L2 regularization strength (larger = weaker penalty)
        #[arg(long, default_value_t = DEFAULT_C, value_parser = validate_regularization)]
        regularization: f64,

        /// Columns to exclude from the features (comma-separated)
        #[arg(long, value_delimiter = ',')]
        drop_columns: Vec<String>,

        /// Overwrite an existing model artifact without asking
        #[arg(long, default_value = "false")]
        no_confirm: bool,

        /// Number of rows to use for schema inference (CSV only)
        #[arg(long, default_value = "10000")]
        infer_schema_length: usize,
    },

    /// Score a single customer against a trained model
    Score(ScoreArgs),

    /// Show dashboard KPIs, segment distributions and filtered customers
    Summary {
        /// Processed dataset path (CSV or Parquet)
        #[arg(short, long)]
        data: PathBuf,

        /// Model artifact path (JSON)
        #[arg(short, long)]
        model: PathBuf,

        /// Risk segments to keep (comma-separated). Default: all
        #[arg(long, value_delimiter = ',')]
        risk: Vec<String>,

        /// Retention priorities to keep (comma-separated). Default: all
        #[arg(long, value_delimiter = ',')]
        priority: Vec<String>,

        /// Number of filtered rows to print
        #[arg(long, default_value = "20")]
        rows: usize,
    },
}

/// The scoring form: nine base attributes with their accepted ranges
#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    /// Model artifact path (JSON)
    #[arg(short, long)]
    pub model: PathBuf,

    /// Age in years (18-80)
    #[arg(long, default_value = "35", value_parser = clap::value_parser!(u32).range(18..=80))]
    pub age: u32,

    /// Tenure in years (0-10)
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u32).range(0..=10))]
    pub tenure: u32,

    /// Account balance (0-300000)
    #[arg(long, default_value = "50000", value_parser = validate_balance)]
    pub balance: f64,

    /// Number of products (1-4)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=4))]
    pub num_products: u32,

    /// Active member (0 or 1)
    #[arg(long, default_value = "0", value_parser = parse_flag, action = clap::ArgAction::Set)]
    pub is_active_member: bool,

    /// Has credit card (0 or 1)
    #[arg(long, default_value = "0", value_parser = parse_flag, action = clap::ArgAction::Set)]
    pub has_credit_card: bool,

    /// Satisfaction score (1-5)
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..=5))]
    pub satisfaction_score: u32,

    /// Has complaint (0 or 1)
    #[arg(long, default_value = "0", value_parser = parse_flag, action = clap::ArgAction::Set)]
    pub complain: bool,

    /// Estimated salary (0-200000)
    #[arg(long, default_value = "60000", value_parser = validate_salary)]
    pub estimated_salary: f64,
}

impl ScoreArgs {
    pub fn to_input(&self) -> ScoringInput {
        ScoringInput {
            age: self.age,
            tenure: self.tenure,
            balance: self.balance,
            num_products: self.num_products,
            is_active_member: self.is_active_member,
            has_credit_card: self.has_credit_card,
            satisfaction_score: self.satisfaction_score,
            complain: self.complain,
            estimated_salary: self.estimated_salary,
        }
    }
}

/// Derive a sibling output path: `<dir>/<stem><suffix>`
pub fn derive_output_path(input: &Path, suffix: &str) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    parent.join(format!("{}{}", stem, suffix))
}

/// Default processed dataset path, keeping the input's format
pub fn processed_path(input: &Path) -> PathBuf {
    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("csv");
    derive_output_path(input, &format!("_processed.{}", extension))
}

/// Default model artifact path
pub fn model_path(input: &Path) -> PathBuf {
    derive_output_path(input, "_model.json")
}

fn validate_range(s: &str, name: &str, min: f64, max: f64) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(min..=max).contains(&value) {
        Err(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        ))
    } else {
        Ok(value)
    }
}

/// Validator for the balance field
fn validate_balance(s: &str) -> Result<f64, String> {
    validate_range(s, "balance", 0.0, 300_000.0)
}

/// Validator for the estimated salary field
fn validate_salary(s: &str) -> Result<f64, String> {
    validate_range(s, "estimated_salary", 0.0, 200_000.0)
}

/// Validator for the regularization parameter
fn validate_regularization(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(format!("regularization must be positive, got {}", value))
    }
}

/// Parser for 0/1 form flags
fn parse_flag(s: &str) -> Result<bool, String> {
    match s.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(format!("expected 0 or 1, got '{}'", other)),
    }
}
