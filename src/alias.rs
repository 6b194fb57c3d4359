//! Alias method (Vose's construction) for O(1) discrete sampling.
//!
//! Given a probability vector \(p_0, \dots, p_{n-1}\), the table stores, per
//! slot `i`, a threshold `u[i]` and an alias `k[i]`. A query draws one uniform
//! \(x \in [0,1)\), takes slot \(i = \lfloor n x \rfloor\) and the fractional
//! remainder \(y = n x - i\), and returns `i` if \(y < u_i\) and `k[i]`
//! otherwise.
//!
//! ## Properties
//! * **Build**: O(n) time and space
//! * **Sample**: O(1), one uniform draw
//!
//! ## References
//!
//! - Walker (1977): *An efficient method for generating discrete random
//!   variables with general distributions*.
//! - Vose (1991): *A linear algorithm for generating random numbers with a
//!   given distribution*.

use rand::Rng;

use crate::error::SamplingError;
use crate::random::UniformSource;

/// Alias table over `n` outcomes. Immutable after construction.
#[derive(Debug, Clone)]
pub struct AliasTable {
    thresholds: Vec<f64>,
    aliases: Vec<usize>,
}

impl AliasTable {
    /// Build a table from a probability vector.
    ///
    /// The vector is assumed, not verified, to sum to 1. Use
    /// [`crate::util::normalize_probabilities`] first for raw weights.
    ///
    /// # Errors
    /// [`SamplingError::EmptyPopulation`] if `probabilities` is empty.
    pub fn new(probabilities: &[f64]) -> Result<Self, SamplingError> {
        let n = probabilities.len();
        if n == 0 {
            return Err(SamplingError::EmptyPopulation);
        }

        let mut thresholds = Vec::with_capacity(n);
        let mut aliases: Vec<usize> = (0..n).collect();
        let mut small: Vec<usize> = Vec::with_capacity(n);
        let mut large: Vec<usize> = Vec::with_capacity(n);

        for (i, &p) in probabilities.iter().enumerate() {
            let scaled = n as f64 * p;
            if scaled > 1.0 {
                large.push(i);
            } else if scaled < 1.0 {
                small.push(i);
            }
            thresholds.push(scaled);
        }

        loop {
            let (Some(&s), Some(&l)) = (small.last(), large.last()) else {
                break;
            };
            small.pop();
            large.pop();
            aliases[s] = l;
            thresholds[l] = (thresholds[l] + thresholds[s]) - 1.0;
            if thresholds[l] < 1.0 {
                small.push(l);
            } else {
                large.push(l);
            }
        }

        // Leftovers are only off from 1 by rounding.
        for i in small.into_iter().chain(large) {
            thresholds[i] = 1.0;
        }

        Ok(Self {
            thresholds,
            aliases,
        })
    }

    /// Draw an outcome index in `[0, n)`.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let n = self.thresholds.len();
        let x = n as f64 * rng.uniform();
        let i = (x as usize).min(n - 1);
        let y = x - i as f64;
        if y < self.thresholds[i] {
            i
        } else {
            self.aliases[i]
        }
    }

    /// Number of outcomes.
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    /// Always `false`; construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }
}
