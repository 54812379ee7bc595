//! Tests for the read-only dashboard context

use churnlens::dashboard::*;
use churnlens::pipeline::*;
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn dashboard_dataframe() -> DataFrame {
    df! {
        "customerid" => [1i64, 2, 3, 4, 5, 6],
        "churn" => [1i64, 0, 0, 1, 0, 0],
        "risk_segment" => ["High Risk", "Low Risk", "Medium Risk", "High Risk", "Low Risk", "Low Risk"],
        "retention_priority" => [
            "Critical Priority",
            "Low Priority",
            "Medium Priority",
            "High Priority",
            "Low Priority",
            "Critical Priority",
        ],
        "clv" => [1200.0f64, 300.0, 850.5, 40.0, 999.5, 610.0],
    }
    .unwrap()
}

fn simple_model() -> TrainedModel {
    TrainedModel {
        feature_names: vec!["age".to_string(), "complain".to_string()],
        coefficients: vec![0.02, 2.0],
        intercept: -1.5,
        metadata: ModelMetadata {
            trained_at: "2026-01-01T00:00:00+00:00".to_string(),
            churnlens_version: "test".to_string(),
            training_rows: 6,
            iterations: 5,
            converged: true,
            regularization_c: 1.0,
        },
    }
}

fn context() -> DashboardContext {
    DashboardContext::new(dashboard_dataframe(), simple_model()).unwrap()
}

#[test]
fn test_kpis() {
    let kpis = context().kpis().unwrap();

    assert_eq!(kpis.total_customers, 6);
    assert_eq!(kpis.churn_rate_pct, 33.33);
    assert_eq!(kpis.high_risk_customers, Some(2));
    assert_eq!(kpis.critical_priority_customers, Some(2));
    assert_eq!(kpis.average_clv, Some(666.67));
}

#[test]
fn test_kpis_without_segment_columns() {
    let df = dashboard_dataframe()
        .drop_many(["risk_segment", "retention_priority", "clv"]);
    let kpis = DashboardContext::new(df, simple_model()).unwrap().kpis().unwrap();

    assert_eq!(kpis.high_risk_customers, None);
    assert_eq!(kpis.critical_priority_customers, None);
    assert_eq!(kpis.average_clv, None);
}

#[test]
fn test_context_requires_churn_and_valid_model() {
    let df = dashboard_dataframe().drop("churn").unwrap();
    let err = DashboardContext::new(df, simple_model()).unwrap_err();
    assert_pipeline_error(&err, |e| matches!(e, PipelineError::Schema(_)));

    let mut broken = simple_model();
    broken.coefficients.pop();
    let err = DashboardContext::new(dashboard_dataframe(), broken).unwrap_err();
    assert_pipeline_error(&err, |e| matches!(e, PipelineError::ModelContract(_)));
}

#[test]
fn test_distribution_orders_by_count() {
    let distribution = context().distribution("risk_segment").unwrap();

    assert_eq!(
        distribution,
        vec![
            ("Low Risk".to_string(), 3),
            ("High Risk".to_string(), 2),
            ("Medium Risk".to_string(), 1),
        ]
    );
}

#[test]
fn test_unique_values_keep_first_seen_order() {
    let values = context().unique_values("retention_priority").unwrap();

    assert_eq!(
        values,
        vec!["Critical Priority", "Low Priority", "Medium Priority", "High Priority"]
    );
}

#[test]
fn test_filter_segments() {
    let ctx = context();

    let all = ctx.filter_segments(&[], &[]).unwrap();
    assert_eq!(all.height(), 6, "Empty selections keep every row");

    let high = ctx.filter_segments(&["High Risk".to_string()], &[]).unwrap();
    assert_eq!(high.height(), 2);

    let both = ctx
        .filter_segments(&["Low Risk".to_string()], &["Critical Priority".to_string()])
        .unwrap();
    let ids: Vec<i64> = both
        .column("customerid")
        .unwrap()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(ids, vec![6]);

    let none = ctx.filter_segments(&["Unknown".to_string()], &[]).unwrap();
    assert_eq!(none.height(), 0);
}

#[test]
fn test_sorted_clv() {
    let clv = context().sorted_clv().unwrap();
    assert_eq!(clv, vec![40.0, 300.0, 610.0, 850.5, 999.5, 1200.0]);
}

#[test]
fn test_context_scoring_uses_loaded_model() {
    let ctx = context();
    let input = ScoringInput {
        age: 50,
        tenure: 4,
        balance: 0.0,
        num_products: 1,
        is_active_member: false,
        has_credit_card: false,
        satisfaction_score: 2,
        complain: true,
        estimated_salary: 40000.0,
    };

    let outcome = ctx.score(&input).unwrap();
    let z: f64 = -1.5 + 0.02 * 50.0 + 2.0;
    assert!((outcome.probability - 1.0 / (1.0 + (-z).exp())).abs() < 1e-12);
    assert_eq!(outcome.tier, RiskTier::High);
}

#[test]
fn test_context_load_from_files() {
    let mut df = dashboard_dataframe();
    let (temp_dir, csv_path) = create_temp_csv(&mut df);
    let model_path = temp_dir.path().join("model.json");
    simple_model().save(&model_path).unwrap();

    let ctx = DashboardContext::load(&csv_path, &model_path).unwrap();
    assert_eq!(ctx.dataset().height(), 6);
    assert_eq!(ctx.model().feature_names, simple_model().feature_names);
}
