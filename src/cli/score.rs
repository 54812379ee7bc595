//! `score` subcommand: churn probability for a single customer

use anyhow::Result;
use console::style;

use super::args::ScoreArgs;
use crate::pipeline::{score_with_tier, RiskTier, TrainedModel};
use crate::utils::print_info;

/// Score the customer described by the form arguments
pub fn run_score(args: &ScoreArgs) -> Result<()> {
    let model = TrainedModel::load(&args.model)?;
    let outcome = score_with_tier(&args.to_input(), &model)?;

    let tier = match outcome.tier {
        RiskTier::High => style(outcome.tier.to_string()).red().bold(),
        RiskTier::Medium => style(outcome.tier.to_string()).yellow().bold(),
        RiskTier::Low => style(outcome.tier.to_string()).green().bold(),
    };

    println!();
    println!(
        "    Churn Probability: {}",
        style(format!("{:.2}%", outcome.probability * 100.0)).bold()
    );
    println!("    Risk: {}", tier);
    print_info(outcome.tier.recommendation());
    println!();
    Ok(())
}
