//! Simple random sampling without replacement.
//!
//! A virtual Fisher–Yates shuffle over `0..n`: only the positions that have
//! been swapped are stored, in a sparse map, so drawing `k` indices costs
//! O(k) time and memory regardless of `n`. Indices come out lazily in the
//! order they are drawn.

use std::collections::HashMap;

use rand::Rng;

use crate::error::SamplingError;
use crate::random::UniformSource;

/// Lazy iterator over `k` distinct uniform indices from `0..n`.
pub struct Swor<'r, R: ?Sized> {
    n: usize,
    k: usize,
    drawn: usize,
    swaps: HashMap<usize, usize>,
    rng: &'r mut R,
}

/// Draw `k` distinct indices from `0..n`, uniformly without replacement.
///
/// # Errors
/// [`SamplingError::SampleLargerThanPopulation`] if `k > n`.
pub fn swor<R: Rng + ?Sized>(n: usize, k: usize, rng: &mut R) -> Result<Swor<'_, R>, SamplingError> {
    if k > n {
        return Err(SamplingError::SampleLargerThanPopulation {
            sample_size: k,
            population: n,
        });
    }
    Ok(Swor {
        n,
        k,
        drawn: 0,
        swaps: HashMap::with_capacity(k),
        rng,
    })
}

/// Draw `k` distinct elements of `population`, uniformly without replacement.
///
/// # Errors
/// [`SamplingError::SampleLargerThanPopulation`] if `k > population.len()`.
pub fn swor_population<'a, T, R: Rng + ?Sized>(
    population: &'a [T],
    k: usize,
    rng: &'a mut R,
) -> Result<impl Iterator<Item = &'a T> + 'a, SamplingError> {
    Ok(swor(population.len(), k, rng)?.map(move |i| &population[i]))
}

impl<R: Rng + ?Sized> Iterator for Swor<'_, R> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.drawn == self.k {
            return None;
        }
        let last = self.n - self.drawn - 1;
        let pick = self.rng.index(self.n - self.drawn);
        let chosen = self.swaps.get(&pick).copied().unwrap_or(pick);
        let moved = self.swaps.get(&last).copied().unwrap_or(last);
        self.swaps.insert(pick, moved);
        self.drawn += 1;
        Some(chosen)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.k - self.drawn;
        (left, Some(left))
    }
}

impl<R: Rng + ?Sized> ExactSizeIterator for Swor<'_, R> {}
