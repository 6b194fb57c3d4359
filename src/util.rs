//! Small helpers shared by callers of the weighted designs.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{check_weight, SamplingError};

/// Scale `weights` so they sum to one.
///
/// # Errors
/// - [`SamplingError::EmptyPopulation`] for an empty slice.
/// - [`SamplingError::NonPositiveWeight`] / [`SamplingError::NonFiniteWeight`]
///   for the first bad weight.
pub fn normalize_probabilities(weights: &[f64]) -> Result<Vec<f64>, SamplingError> {
    if weights.is_empty() {
        return Err(SamplingError::EmptyPopulation);
    }
    let mut sum = 0.0;
    for &w in weights {
        sum += check_weight(w)?;
    }
    Ok(weights.iter().map(|w| w / sum).collect())
}

/// Whether inclusion probabilities `k * w_i / Σw` can all be honoured,
/// i.e. none exceeds one.
///
/// An empty population is never feasible.
pub fn check_feasibility(weights: &[f64], k: usize) -> bool {
    let sum: f64 = weights.iter().sum();
    !weights.is_empty() && weights.iter().all(|&w| k as f64 * w / sum <= 1.0)
}

/// Multiset equality: same elements with the same multiplicities, in any order.
pub fn sequence_equals<T: Eq + Hash>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut counts: HashMap<&T, isize> = HashMap::with_capacity(a.len());
    for x in a {
        *counts.entry(x).or_default() += 1;
    }
    for x in b {
        match counts.get_mut(x) {
            Some(c) if *c > 0 => *c -= 1,
            _ => return false,
        }
    }
    true
}
