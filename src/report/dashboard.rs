//! Terminal rendition of the dashboard views

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::dashboard::DashboardKpis;

fn print_section(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn optional_count(value: Option<usize>) -> Cell {
    match value {
        Some(n) => Cell::new(n).fg(if n > 0 { Color::Red } else { Color::White }),
        None => Cell::new("n/a").fg(Color::DarkGrey),
    }
}

/// Display the KPI cards
pub fn display_kpis(kpis: &DashboardKpis) {
    print_section("📌", "KEY METRICS");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("👥 Total Customers"),
        Cell::new(kpis.total_customers),
    ]);
    table.add_row(vec![
        Cell::new("📉 Churn Rate (%)"),
        Cell::new(format!("{:.2}", kpis.churn_rate_pct)).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("🔥 High Risk Customers"),
        optional_count(kpis.high_risk_customers),
    ]);
    table.add_row(vec![
        Cell::new("🚨 Critical Priority Customers"),
        optional_count(kpis.critical_priority_customers),
    ]);
    table.add_row(vec![
        Cell::new("💰 Average CLV"),
        match kpis.average_clv {
            Some(clv) => Cell::new(format!("{:.2}", clv)).fg(Color::Green),
            None => Cell::new("n/a").fg(Color::DarkGrey),
        },
    ]);

    print_indented(&table);
}

/// Display value counts as a table with a proportional bar
pub fn display_distribution(title: &str, counts: &[(String, usize)]) {
    print_section("📈", title);

    let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(0);
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Value").add_attribute(Attribute::Bold),
        Cell::new("Count").add_attribute(Attribute::Bold),
        Cell::new("").add_attribute(Attribute::Bold),
    ]);
    for (value, count) in counts {
        let width = if max == 0 { 0 } else { count * 30 / max };
        table.add_row(vec![
            Cell::new(value),
            Cell::new(count),
            Cell::new("█".repeat(width)).fg(Color::Cyan),
        ]);
    }

    print_indented(&table);
}
