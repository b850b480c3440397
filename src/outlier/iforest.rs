//! Isolation-forest detection.
//!
//! Classic iForest (Liu/Ting/Zhou): an ensemble of randomly-split trees where
//! anomalies isolate in fewer splits. Scores are `2^(-E[h(x)] / c(psi))` with
//! `psi` the subsample size; the top `contamination` fraction of scores is
//! flagged.
//!
//! The forest is fit over the jointly non-missing rows of the selected
//! columns; rows excluded by that filter are never flagged. The RNG is seeded
//! with a fixed constant so identical input and parameters always reproduce
//! the same mask.

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::domain::{AnomalyMask, Column, RecordTable};
use crate::error::AppError;

/// Minimum jointly-non-missing rows; below this the detector is skipped
/// entirely (all-false mask, not an error).
pub const MIN_COMPLETE_ROWS: usize = 20;

/// Inclusive contamination range accepted from callers.
pub const CONTAMINATION_RANGE: (f64, f64) = (0.01, 0.5);

const NUM_TREES: usize = 100;
const MAX_SUBSAMPLE: usize = 256;

/// Fixed RNG seed for reproducible masks.
const FOREST_SEED: u64 = 42;

/// Fit an isolation forest and flag the highest-scoring rows.
pub fn detect(
    table: &RecordTable,
    columns: &[Column],
    contamination: f64,
) -> Result<AnomalyMask, AppError> {
    let (lo, hi) = CONTAMINATION_RANGE;
    if !(contamination.is_finite() && (lo..=hi).contains(&contamination)) {
        return Err(AppError::invalid_parameter(format!(
            "isolation_forest contamination must be in [{lo}, {hi}], got {contamination}"
        )));
    }

    let mut mask = vec![false; table.len()];

    // Jointly non-missing rows only: the model never sees (and never flags)
    // rows with a hole in any selected column.
    let mut indices = Vec::new();
    let mut data: Vec<Vec<f64>> = Vec::new();
    for (i, row) in table.rows().iter().enumerate() {
        let features: Option<Vec<f64>> = columns.iter().map(|&c| row.value(c)).collect();
        if let Some(features) = features {
            indices.push(i);
            data.push(features);
        }
    }

    if data.len() < MIN_COMPLETE_ROWS {
        return Ok(mask);
    }

    let mut rng = StdRng::seed_from_u64(FOREST_SEED);
    let subsample = data.len().min(MAX_SUBSAMPLE);
    let height_limit = (subsample as f64).log2().ceil() as usize;

    let mut trees = Vec::with_capacity(NUM_TREES);
    for _ in 0..NUM_TREES {
        let sample: Vec<usize> = rand::seq::index::sample(&mut rng, data.len(), subsample).into_vec();
        trees.push(build_tree(&data, &sample, 0, height_limit, &mut rng));
    }

    let norm = average_path_length(subsample);
    let scores: Vec<f64> = data
        .iter()
        .map(|point| {
            let total: f64 = trees.iter().map(|t| path_length(t, point, 0)).sum();
            let mean_path = total / trees.len() as f64;
            2.0_f64.powf(-mean_path / norm)
        })
        .collect();

    // Rank descending by score (ties broken by row order) and flag the top
    // floor(contamination * n) rows.
    let flag_count = (contamination * scores.len() as f64).floor() as usize;
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    for &rank in order.iter().take(flag_count) {
        mask[indices[rank]] = true;
    }

    Ok(mask)
}

enum Tree {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Tree>,
        right: Box<Tree>,
    },
}

fn build_tree(
    data: &[Vec<f64>],
    sample: &[usize],
    depth: usize,
    height_limit: usize,
    rng: &mut StdRng,
) -> Tree {
    if depth >= height_limit || sample.len() <= 1 {
        return Tree::Leaf { size: sample.len() };
    }

    let dims = data[sample[0]].len();

    // Features with any spread in this node. When every remaining feature is
    // constant the node cannot be split further.
    let splittable: Vec<usize> = (0..dims)
        .filter(|&d| {
            let (min, max) = min_max(data, sample, d);
            max > min
        })
        .collect();
    let Some(&feature) = splittable.as_slice().choose(rng) else {
        return Tree::Leaf { size: sample.len() };
    };

    let (min, max) = min_max(data, sample, feature);
    let threshold = rng.gen_range(min..max);

    let (left, right): (Vec<usize>, Vec<usize>) = sample
        .iter()
        .partition(|&&i| data[i][feature] < threshold);

    Tree::Split {
        feature,
        threshold,
        left: Box::new(build_tree(data, &left, depth + 1, height_limit, rng)),
        right: Box::new(build_tree(data, &right, depth + 1, height_limit, rng)),
    }
}

fn min_max(data: &[Vec<f64>], sample: &[usize], feature: usize) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &i in sample {
        let v = data[i][feature];
        min = min.min(v);
        max = max.max(v);
    }
    (min, max)
}

fn path_length(tree: &Tree, point: &[f64], depth: usize) -> f64 {
    match tree {
        Tree::Leaf { size } => depth as f64 + average_path_length(*size),
        Tree::Split {
            feature,
            threshold,
            left,
            right,
        } => {
            if point[*feature] < *threshold {
                path_length(left, point, depth + 1)
            } else {
                path_length(right, point, depth + 1)
            }
        }
    }
}

/// Average path length of an unsuccessful BST search over `n` points,
/// the standard iForest normalization term c(n).
fn average_path_length(n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_9;
    let n = n as f64;
    2.0 * ((n - 1.0).ln() + EULER_MASCHERONI) - 2.0 * (n - 1.0) / n
}
