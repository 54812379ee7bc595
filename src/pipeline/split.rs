//! Reproducible stratified train/test splitting

use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;

use super::error::PipelineError;

/// Fraction of rows held out for evaluation
pub const TEST_SIZE: f64 = 0.25;

/// Seed for the split permutation
pub const RANDOM_SEED: u64 = 42;

/// Row indices of the two partitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Split row indices so that every label keeps its share in both partitions.
///
/// Each class is shuffled independently and `round(class_size * test_size)`
/// of its rows go to the test partition. Both partitions are then shuffled so
/// classes are interleaved. The same labels, fraction and seed always produce
/// the same split.
///
/// # Errors
/// A data quality error when a class has fewer than two members or when
/// either partition would end up empty.
pub fn stratified_split(labels: &[i32], test_size: f64, seed: u64) -> Result<SplitIndices> {
    if !(test_size > 0.0 && test_size < 1.0) {
        anyhow::bail!("test_size must be in (0, 1), got {}", test_size);
    }

    let mut by_class: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for (idx, &label) in labels.iter().enumerate() {
        by_class.entry(label).or_default().push(idx);
    }

    if let Some((label, members)) = by_class.iter().find(|(_, m)| m.len() < 2) {
        return Err(PipelineError::data_quality(format!(
            "class {} has only {} member(s); at least 2 are needed for a stratified split",
            label,
            members.len()
        ))
        .into());
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(labels.len());
    let mut test = Vec::new();

    for members in by_class.values_mut() {
        members.shuffle(&mut rng);
        let n_test = (members.len() as f64 * test_size).round() as usize;
        let (class_test, class_train) = members.split_at(n_test);
        test.extend_from_slice(class_test);
        train.extend_from_slice(class_train);
    }

    if train.is_empty() || test.is_empty() {
        return Err(PipelineError::data_quality(format!(
            "{} row(s) are too few for a {:.0}% hold-out split",
            labels.len(),
            test_size * 100.0
        ))
        .into());
    }

    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    Ok(SplitIndices { train, test })
}
