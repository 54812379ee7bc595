//! Training summary report

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use std::time::Duration;

use crate::pipeline::{EvaluationMetrics, TrainedModel};

/// Number of strongest coefficients listed under the summary table
const TOP_COEFFICIENTS: usize = 10;

/// Summary of a training run
#[derive(Debug, Default)]
pub struct TrainingSummary {
    pub rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub features: usize,
    pub iterations: usize,
    pub converged: bool,
    pub metrics: Option<EvaluationMetrics>,
    pub load_time: Duration,
    pub train_time: Duration,
    /// (feature, coefficient) sorted by absolute coefficient, descending
    pub top_coefficients: Vec<(String, f64)>,
}

impl TrainingSummary {
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    pub fn set_split(&mut self, train_rows: usize, test_rows: usize) {
        self.train_rows = train_rows;
        self.test_rows = test_rows;
    }

    pub fn set_model(&mut self, model: &TrainedModel) {
        self.features = model.feature_names.len();
        self.iterations = model.metadata.iterations;
        self.converged = model.metadata.converged;

        let mut ranked: Vec<(String, f64)> = model
            .feature_names
            .iter()
            .cloned()
            .zip(model.coefficients.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
        ranked.truncate(TOP_COEFFICIENTS);
        self.top_coefficients = ranked;
    }

    pub fn set_metrics(&mut self, metrics: EvaluationMetrics) {
        self.metrics = Some(metrics);
    }

    pub fn set_load_time(&mut self, elapsed: Duration) {
        self.load_time = elapsed;
    }

    pub fn set_train_time(&mut self, elapsed: Duration) {
        self.train_time = elapsed;
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("TRAINING SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Rows"), Cell::new(self.rows)]);
        table.add_row(vec![
            Cell::new("✂️  Train / Test"),
            Cell::new(format!("{} / {}", self.train_rows, self.test_rows)),
        ]);
        table.add_row(vec![Cell::new("🧮 Encoded Features"), Cell::new(self.features)]);
        table.add_row(vec![
            Cell::new("🔁 Iterations"),
            Cell::new(self.iterations).fg(if self.converged {
                Color::White
            } else {
                Color::Red
            }),
        ]);

        if let Some(m) = &self.metrics {
            let auc_color = if m.roc_auc >= 0.8 {
                Color::Green
            } else if m.roc_auc >= 0.7 {
                Color::Yellow
            } else {
                Color::Red
            };
            table.add_row(vec![Cell::new("🎯 Accuracy"), Cell::new(format!("{:.4}", m.accuracy))]);
            table.add_row(vec![Cell::new("🔍 Precision"), Cell::new(format!("{:.4}", m.precision))]);
            table.add_row(vec![Cell::new("📡 Recall"), Cell::new(format!("{:.4}", m.recall))]);
            table.add_row(vec![Cell::new("⚖️  F1"), Cell::new(format!("{:.4}", m.f1))]);
            table.add_row(vec![
                Cell::new("📈 ROC-AUC"),
                Cell::new(format!("{:.4}", m.roc_auc))
                    .fg(auc_color)
                    .add_attribute(Attribute::Bold),
            ]);
        }

        table.add_row(vec![
            Cell::new("⏱  Load / Train"),
            Cell::new(format!(
                "{:.2}s / {:.2}s",
                self.load_time.as_secs_f64(),
                self.train_time.as_secs_f64()
            )),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.top_coefficients.is_empty() {
            println!();
            println!(
                "    {} {}",
                style("📝").cyan(),
                style("STRONGEST COEFFICIENTS").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());
            for (feature, coef) in &self.top_coefficients {
                let value = format!("{:+.6}", coef);
                let styled = if *coef > 0.0 {
                    style(value).red()
                } else {
                    style(value).green()
                };
                println!("        {} {:<32} {}", style("•").dim(), feature, styled);
            }
        }
    }
}
