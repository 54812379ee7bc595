//! `summary` subcommand: terminal view of the dashboard

use std::path::Path;

use anyhow::Result;

use crate::dashboard::DashboardContext;
use crate::pipeline::columns::{has_column, CLV, RETENTION_PRIORITY, RISK_SEGMENT};
use crate::pipeline::median;
use crate::report::{display_distribution, display_kpis};
use crate::utils::{print_info, print_stat, print_step_header};

/// Load the dashboard context once and print its views
pub fn run_summary(
    data: &Path,
    model: &Path,
    risk: &[String],
    priority: &[String],
    rows: usize,
) -> Result<()> {
    let context = DashboardContext::load(data, model)?;
    let dataset = context.dataset();

    display_kpis(&context.kpis()?);

    for (column, title) in [
        (RISK_SEGMENT, "RISK SEGMENTS"),
        (RETENTION_PRIORITY, "RETENTION PRIORITY"),
    ] {
        if has_column(dataset, column) {
            display_distribution(title, &context.distribution(column)?);
        } else {
            print_info(&format!("Column '{}' not present; view skipped", column));
        }
    }

    // Steps are numbered in the order they are printed
    let mut step = 0u8;

    if has_column(dataset, CLV) {
        let clv = context.sorted_clv()?;
        if let (Some(min), Some(max), Some(mid)) = (clv.first(), clv.last(), median(&clv)) {
            step += 1;
            print_step_header(step, "CLV Curve");
            print_stat("Customers", clv.len());
            print_stat("Min", format!("{:.2}", min));
            print_stat("Median", format!("{:.2}", mid));
            print_stat("Max", format!("{:.2}", max));
        }
    }

    if has_column(dataset, RISK_SEGMENT) && has_column(dataset, RETENTION_PRIORITY) {
        let filtered = context.filter_segments(risk, priority)?;
        step += 1;
        print_step_header(step, "Filtered Customers");
        print_stat("Matching rows", filtered.height());
        if filtered.height() == 0 {
            print_info(&format!(
                "Available risk segments: {}",
                context.unique_values(RISK_SEGMENT)?.join(", ")
            ));
            print_info(&format!(
                "Available priorities: {}",
                context.unique_values(RETENTION_PRIORITY)?.join(", ")
            ));
        } else {
            println!("{}", filtered.head(Some(rows)));
        }
    }

    Ok(())
}
