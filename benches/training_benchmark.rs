//! Benchmarks for feature engineering, training and single-customer scoring
//!
//! Run with: cargo bench --bench training_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use polars::prelude::*;
use rand::prelude::*;
use rand::SeedableRng;

use churnlens::pipeline::{
    add_features, prepare_data, score, train_model, ScoringInput, TrainConfig,
};

/// Generate a cleaned customer table with a churn signal in age and complaints
fn generate_customers(n_rows: usize, seed: u64) -> DataFrame {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let churn: Vec<i64> = (0..n_rows)
        .map(|_| i64::from(rng.gen::<f64>() > 0.8))
        .collect();
    let age: Vec<i64> = churn
        .iter()
        .map(|&c| if c == 1 { rng.gen_range(35..=80) } else { rng.gen_range(18..=60) })
        .collect();
    let complain: Vec<i64> = churn
        .iter()
        .map(|&c| i64::from(rng.gen_bool(if c == 1 { 0.6 } else { 0.1 })))
        .collect();

    df! {
        "age" => age,
        "tenure" => (0..n_rows).map(|_| rng.gen_range(0i64..=10)).collect::<Vec<_>>(),
        "balance" => (0..n_rows).map(|_| rng.gen::<f64>() * 250_000.0).collect::<Vec<_>>(),
        "numofproducts" => (0..n_rows).map(|_| rng.gen_range(1i64..=4)).collect::<Vec<_>>(),
        "has_credit_card" => (0..n_rows).map(|_| i64::from(rng.gen_bool(0.7))).collect::<Vec<_>>(),
        "is_active_member" => (0..n_rows).map(|_| i64::from(rng.gen_bool(0.5))).collect::<Vec<_>>(),
        "satisfaction_score" => (0..n_rows).map(|_| rng.gen_range(1i64..=5)).collect::<Vec<_>>(),
        "complain" => complain,
        "estimatedsalary" => (0..n_rows).map(|_| rng.gen::<f64>() * 200_000.0).collect::<Vec<_>>(),
        "churn" => churn,
    }
    .expect("Failed to create DataFrame")
}

/// Benchmark derived feature computation for varying table sizes
fn benchmark_add_features(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_features");

    for n_rows in [1_000, 10_000, 100_000] {
        let df = generate_customers(n_rows, 42);
        group.throughput(Throughput::Elements(n_rows as u64));

        group.bench_with_input(BenchmarkId::from_parameter(n_rows), &df, |b, df| {
            b.iter(|| {
                let _ = add_features(black_box(df));
            });
        });
    }

    group.finish();
}

/// Benchmark the IRLS solver including encoding and the stratified split
fn benchmark_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");
    group.sample_size(10);

    for n_rows in [1_000, 10_000, 50_000] {
        let processed = add_features(&generate_customers(n_rows, 42)).expect("features");
        let split = prepare_data(&processed).expect("split");
        group.throughput(Throughput::Elements(n_rows as u64));

        group.bench_with_input(BenchmarkId::new("irls", n_rows), &split, |b, split| {
            b.iter(|| {
                let _ = train_model(
                    black_box(&split.x_train),
                    black_box(&split.y_train),
                    black_box(&TrainConfig::default()),
                );
            });
        });
    }

    group.finish();
}

/// Benchmark single-customer scoring latency
fn benchmark_scoring(c: &mut Criterion) {
    let processed = add_features(&generate_customers(5_000, 7)).expect("features");
    let split = prepare_data(&processed).expect("split");
    let model = train_model(&split.x_train, &split.y_train, &TrainConfig::default()).expect("model");

    let input = ScoringInput {
        age: 35,
        tenure: 3,
        balance: 50_000.0,
        num_products: 2,
        is_active_member: true,
        has_credit_card: true,
        satisfaction_score: 3,
        complain: false,
        estimated_salary: 60_000.0,
    };

    c.bench_function("score_single_customer", |b| {
        b.iter(|| {
            let _ = score(black_box(&input), black_box(&model));
        });
    });
}

criterion_group!(benches, benchmark_add_features, benchmark_training, benchmark_scoring);
criterion_main!(benches);
