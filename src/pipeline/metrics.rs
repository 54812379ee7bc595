//! Binary classification metrics on the held-out partition

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;

use super::model::TrainedModel;

/// Probability at or above which a customer is predicted to churn
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Evaluation results for a trained model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub roc_auc: f64,
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
    /// Number of evaluated rows
    pub support: usize,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Area under the ROC curve via the Mann-Whitney U statistic.
///
/// Tied scores share their average rank. Returns 0.5 when either class is
/// absent.
pub fn roc_auc(scores: &[f64], labels: &[i32]) -> f64 {
    let mut pairs: Vec<(f64, i32)> = scores.iter().copied().zip(labels.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let positives = pairs.iter().filter(|(_, l)| *l == 1).count();
    let negatives = pairs.len() - positives;
    if positives == 0 || negatives == 0 {
        return 0.5;
    }

    let mut rank_sum_pos = 0.0;
    let mut i = 0;
    while i < pairs.len() {
        let mut j = i;
        while j < pairs.len() && pairs[j].0 == pairs[i].0 {
            j += 1;
        }
        // Ranks are 1-based; a tie group spanning i..j shares the mean rank
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        let group_positives = pairs[i..j].iter().filter(|(_, l)| *l == 1).count();
        rank_sum_pos += avg_rank * group_positives as f64;
        i = j;
    }

    let pos = positives as f64;
    let u = rank_sum_pos - pos * (pos + 1.0) / 2.0;
    (u / (pos * negatives as f64)).clamp(0.0, 1.0)
}

/// Compute metrics from predicted probabilities and true 0/1 labels
pub fn compute_metrics(probabilities: &[f64], labels: &[i32]) -> EvaluationMetrics {
    let (mut tp, mut fp, mut tn, mut fn_) = (0, 0, 0, 0);
    for (&p, &label) in probabilities.iter().zip(labels.iter()) {
        match (p >= DECISION_THRESHOLD, label == 1) {
            (true, true) => tp += 1,
            (true, false) => fp += 1,
            (false, false) => tn += 1,
            (false, true) => fn_ += 1,
        }
    }

    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    EvaluationMetrics {
        accuracy: ratio(tp + tn, labels.len()),
        precision,
        recall,
        f1,
        roc_auc: roc_auc(probabilities, labels),
        true_positives: tp,
        false_positives: fp,
        true_negatives: tn,
        false_negatives: fn_,
        support: labels.len(),
    }
}

/// Score the held-out features and compare against their labels
pub fn evaluate_model(
    model: &TrainedModel,
    x_test: &DataFrame,
    y_test: &[i32],
) -> Result<EvaluationMetrics> {
    if x_test.height() != y_test.len() {
        anyhow::bail!(
            "label count ({}) does not match test rows ({})",
            y_test.len(),
            x_test.height()
        );
    }
    let probabilities = model.predict_proba(x_test)?;
    Ok(compute_metrics(&probabilities, y_test))
}
