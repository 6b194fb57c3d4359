//! Jessen's whole-sample-space decomposition.
//!
//! Given weights \(w_i\) and a sample size \(k\), the target inclusion
//! probabilities are \(\pi_i = k w_i / \sum_j w_j\). The builder decomposes
//! them into an explicit list of fixed-size samples with probabilities (the
//! *tableau*) such that each element's total probability across the samples
//! containing it is exactly \(\pi_i\): the ratio-estimator property holds.
//!
//! Construction repeatedly takes the `k` elements with the most remaining
//! mass as one sample and gives it the largest probability that neither
//! overdraws the smallest of them nor starves the runner-up:
//!
//! \[
//! \delta = \min\big(r_{(k)},\; b - r_{(k+1)}\big)
//! \]
//!
//! where \(r_{(i)}\) is the i-th largest remaining mass and \(b\) the
//! probability still unassigned. Cost is O(k·n log n) time and O(n·k) tableau
//! memory. For weights in general position the tableau has at least `n`
//! entries; ties can merge steps.
//!
//! Querying wraps the tableau probabilities in an [`AliasTable`], so each
//! draw is O(1).
//!
//! ## References
//!
//! - Jessen (1969): *Some methods of probability non-replacement sampling*.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::ops::Index;

use rand::Rng;

use crate::alias::AliasTable;
use crate::error::{check_sample_fits, check_weight, SamplingError};

/// Accumulates weighted elements for a Jessen tableau.
#[derive(Debug, Clone)]
pub struct JessenBuilder<T> {
    items: Vec<T>,
    weights: Vec<f64>,
    weight_sum: f64,
}

impl<T> Default for JessenBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> JessenBuilder<T> {
    /// An empty builder.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            weights: Vec::new(),
            weight_sum: 0.0,
        }
    }

    /// Add one element.
    ///
    /// # Errors
    /// [`SamplingError::NonPositiveWeight`] / [`SamplingError::NonFiniteWeight`],
    /// the latter also when the weight sum would overflow; the builder is
    /// unchanged.
    pub fn add(&mut self, item: T, weight: f64) -> Result<&mut Self, SamplingError> {
        let weight = check_weight(weight)?;
        let weight_sum = self.weight_sum + weight;
        if !weight_sum.is_finite() {
            return Err(SamplingError::NonFiniteWeight(weight_sum));
        }
        self.items.push(item);
        self.weights.push(weight);
        self.weight_sum = weight_sum;
        Ok(self)
    }

    /// Add elements zipped with weights; stops at the shorter input.
    ///
    /// # Errors
    /// Stops at the first bad weight. Earlier pairs stay added.
    pub fn add_range<I, W>(&mut self, population: I, weights: W) -> Result<&mut Self, SamplingError>
    where
        I: IntoIterator<Item = T>,
        W: IntoIterator<Item = f64>,
    {
        for (item, weight) in population.into_iter().zip(weights) {
            self.add(item, weight)?;
        }
        Ok(self)
    }

    /// Add each element of `population` with weight `weight(&element)`.
    ///
    /// # Errors
    /// Stops at the first bad weight. Earlier elements stay added.
    pub fn add_mapping<I, F>(&mut self, population: I, mut weight: F) -> Result<&mut Self, SamplingError>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T) -> f64,
    {
        for item in population {
            let w = weight(&item);
            self.add(item, w)?;
        }
        Ok(self)
    }

    /// Add `(element, weight)` pairs, e.g. from a map.
    ///
    /// # Errors
    /// Stops at the first bad weight. Earlier pairs stay added.
    pub fn add_pairs<I>(&mut self, pairs: I) -> Result<&mut Self, SamplingError>
    where
        I: IntoIterator<Item = (T, f64)>,
    {
        for (item, weight) in pairs {
            self.add(item, weight)?;
        }
        Ok(self)
    }

    /// Drop every accumulated element.
    pub fn reset(&mut self) {
        self.items.clear();
        self.weights.clear();
        self.weight_sum = 0.0;
    }

    /// Number of accumulated elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of the accumulated weights.
    pub fn weight_sum(&self) -> f64 {
        self.weight_sum
    }

    /// Build the tableau for samples of size `k`.
    ///
    /// On success the builder is drained and ready for reuse. On failure it
    /// is left exactly as it was.
    ///
    /// # Errors
    /// - [`SamplingError::SampleLargerThanPopulation`] unless `0 < k <= n`.
    /// - [`SamplingError::Infeasible`] if some `k·w/Σw > 1`.
    pub fn build(&mut self, k: usize) -> Result<JessenSampling<T>, SamplingError> {
        let n = self.items.len();
        check_sample_fits(k, n)?;

        let normalized: Vec<f64> = self
            .weights
            .iter()
            .map(|&w| w * k as f64 / self.weight_sum)
            .collect();
        if let Some((index, &inclusion)) = normalized.iter().enumerate().find(|(_, &p)| p > 1.0) {
            log::trace!("jessen: element {index} has inclusion {inclusion} > 1 for k={k}");
            return Err(SamplingError::Infeasible { index, inclusion });
        }

        let (members, probabilities) = decompose(&normalized, k);
        let alias = AliasTable::new(&probabilities)?;

        let population = std::mem::take(&mut self.items);
        self.reset();

        log::debug!(
            "jessen: built tableau of {} samples from {n} elements (k={k})",
            probabilities.len()
        );

        Ok(JessenSampling {
            population,
            members,
            probabilities,
            k,
            alias,
        })
    }
}

impl JessenBuilder<usize> {
    /// Add a weight per index: element `i` of `weights` becomes element `i`.
    ///
    /// # Errors
    /// Stops at the first bad weight. Earlier weights stay added.
    pub fn add_weights<W>(&mut self, weights: W) -> Result<&mut Self, SamplingError>
    where
        W: IntoIterator<Item = f64>,
    {
        for (i, weight) in weights.into_iter().enumerate() {
            self.add(i, weight)?;
        }
        Ok(self)
    }

    /// Add elements `0..n`, element `i` with weight `weight(i)`.
    ///
    /// # Errors
    /// Stops at the first bad weight. Earlier elements stay added.
    pub fn add_indexed<F>(&mut self, n: usize, mut weight: F) -> Result<&mut Self, SamplingError>
    where
        F: FnMut(usize) -> f64,
    {
        self.add_mapping(0..n, |&i| weight(i))
    }
}

/// An element's remaining inclusion mass during decomposition.
#[derive(Debug, Clone, Copy)]
struct Pending {
    remaining: f64,
    index: usize,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    // Largest mass first; earlier elements win ties.
    fn cmp(&self, other: &Self) -> Ordering {
        self.remaining
            .total_cmp(&other.remaining)
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Greedy tableau construction over inclusion probabilities summing to `k`.
///
/// Returns the flattened member indices (`k` per sample) and the sample
/// probabilities.
fn decompose(inclusion: &[f64], k: usize) -> (Vec<usize>, Vec<f64>) {
    let mut heap: BinaryHeap<Pending> = inclusion
        .iter()
        .enumerate()
        .map(|(index, &remaining)| Pending { remaining, index })
        .collect();

    let mut members = Vec::with_capacity(inclusion.len() * k);
    let mut probabilities = Vec::with_capacity(inclusion.len());
    let mut popped: Vec<Pending> = Vec::with_capacity(k);
    let mut balance = 1.0;

    while heap.len() >= k {
        popped.clear();
        popped.extend(std::iter::from_fn(|| heap.pop()).take(k));

        let smallest = popped[k - 1].remaining;
        let reduce_by = match heap.peek() {
            Some(next) => smallest.min(balance - next.remaining),
            None => smallest,
        };
        if reduce_by <= 0.0 {
            break;
        }

        for p in &popped {
            let remaining = p.remaining - reduce_by;
            if remaining > 0.0 {
                heap.push(Pending {
                    remaining,
                    index: p.index,
                });
            }
        }
        members.extend(popped.iter().map(|p| p.index));
        probabilities.push(reduce_by);
        balance -= reduce_by;
    }

    (members, probabilities)
}

/// A built tableau, ready for O(1) sampling.
#[derive(Debug, Clone)]
pub struct JessenSampling<T> {
    population: Vec<T>,
    members: Vec<usize>,
    probabilities: Vec<f64>,
    k: usize,
    alias: AliasTable,
}

impl<T> JessenSampling<T> {
    /// Draw one sample of exactly `k` distinct elements.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> JessenSample<'_, T> {
        self.entry(self.alias.sample(rng))
    }

    /// Enumerate the tableau as `(sample, probability)` pairs.
    ///
    /// Each call starts over and yields the same sequence.
    pub fn sample_space(&self) -> SampleSpace<'_, T> {
        SampleSpace {
            sampling: self,
            next: 0,
        }
    }

    /// The sample size every tableau entry has.
    pub fn sample_size(&self) -> usize {
        self.k
    }

    /// Number of tableau entries.
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Whether the tableau is empty.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Tableau probabilities, aligned with [`sample_space`](Self::sample_space).
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// The population, in insertion order.
    pub fn population(&self) -> &[T] {
        &self.population
    }

    fn entry(&self, i: usize) -> JessenSample<'_, T> {
        JessenSample {
            population: &self.population,
            members: &self.members[i * self.k..(i + 1) * self.k],
        }
    }
}

/// Iterator over a tableau's `(sample, probability)` pairs.
#[derive(Debug)]
pub struct SampleSpace<'a, T> {
    sampling: &'a JessenSampling<T>,
    next: usize,
}

impl<T> Clone for SampleSpace<'_, T> {
    fn clone(&self) -> Self {
        Self {
            sampling: self.sampling,
            next: self.next,
        }
    }
}

impl<'a, T> Iterator for SampleSpace<'a, T> {
    type Item = (JessenSample<'a, T>, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let p = *self.sampling.probabilities.get(self.next)?;
        let sample = self.sampling.entry(self.next);
        self.next += 1;
        Some((sample, p))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.sampling.len() - self.next;
        (left, Some(left))
    }
}

impl<T> ExactSizeIterator for SampleSpace<'_, T> {}

/// One tableau entry: a read-only view of `k` population elements.
pub struct JessenSample<'a, T> {
    population: &'a [T],
    members: &'a [usize],
}

impl<'a, T> JessenSample<'a, T> {
    /// Number of elements (always the sample size).
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false` for a built tableau.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Element at position `i`.
    pub fn get(&self, i: usize) -> Option<&'a T> {
        self.members.get(i).map(|&m| &self.population[m])
    }

    /// Population indices of the sampled elements.
    pub fn indices(&self) -> &'a [usize] {
        self.members
    }

    /// Iterate over the sampled elements.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'a T> + 'a {
        let population = self.population;
        self.members.iter().map(move |&m| &population[m])
    }

    /// Copy the sampled elements out.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<T> Clone for JessenSample<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for JessenSample<'_, T> {}

impl<T> Index<usize> for JessenSample<'_, T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.population[self.members[i]]
    }
}

impl<T: fmt::Debug> fmt::Debug for JessenSample<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    fn inclusion_from_tableau(j: &JessenSampling<usize>) -> Vec<f64> {
        let mut pi = vec![0.0; j.population().len()];
        for (sample, p) in j.sample_space() {
            for &i in sample.iter() {
                pi[i] += p;
            }
        }
        pi
    }

    #[test]
    fn rejects_bad_weights() {
        let mut b = JessenBuilder::new();
        assert_eq!(b.add("a", 0.0).unwrap_err(), SamplingError::NonPositiveWeight(0.0));
        assert!(b.add("a", -2.0).is_err());
        assert!(b.add("a", f64::NAN).is_err());
        assert!(b.is_empty());
    }

    #[test]
    fn overflowing_weight_sum_is_rejected() {
        let mut b = JessenBuilder::new();
        let err = b.add_weights([1e308, 1e308]).unwrap_err();
        assert_eq!(err, SamplingError::NonFiniteWeight(f64::INFINITY));
        assert_eq!(b.len(), 1);
        assert_eq!(b.weight_sum(), 1e308);

        let j = b.build(1).unwrap();
        assert_eq!(j.len(), 1);
        assert_eq!(j.probabilities(), &[1.0]);
    }

    #[test]
    fn rejects_bad_sizes() {
        let mut b = JessenBuilder::new();
        b.add_weights([1.0, 2.0]).unwrap();
        assert!(matches!(
            b.build(0),
            Err(SamplingError::SampleLargerThanPopulation { .. })
        ));
        assert!(matches!(
            b.build(3),
            Err(SamplingError::SampleLargerThanPopulation {
                sample_size: 3,
                population: 2
            })
        ));
    }

    #[test]
    fn infeasible_build_leaves_builder_usable() {
        let mut b = JessenBuilder::new();
        b.add_weights([1.0, 1.0, 8.0]).unwrap();
        let err = b.build(2).unwrap_err();
        assert!(matches!(err, SamplingError::Infeasible { index: 2, inclusion } if inclusion > 1.0));
        assert_eq!(b.len(), 3);
        assert_eq!(b.weight_sum(), 10.0);

        // k = 1 is feasible for the same population.
        let j = b.build(1).unwrap();
        assert!(b.is_empty());
        let pi = inclusion_from_tableau(&j);
        for (got, want) in pi.iter().zip([0.1, 0.1, 0.8]) {
            assert!((got - want).abs() < 1e-12, "{pi:?}");
        }
    }

    #[test]
    fn tableau_reproduces_inclusion_probabilities() {
        let weights = [0.9, 2.3, 1.7, 3.1, 0.4, 1.6];
        let sum: f64 = weights.iter().sum();
        for k in 1..=3 {
            let j = JessenBuilder::new()
                .add_weights(weights)
                .unwrap()
                .build(k)
                .unwrap();
            assert!(j.len() >= weights.len(), "k={k}: {} entries", j.len());
            let total: f64 = j.probabilities().iter().sum();
            assert!((total - 1.0).abs() < 1e-9);
            for (sample, _) in j.sample_space() {
                assert_eq!(sample.len(), k);
                let mut idx = sample.indices().to_vec();
                idx.sort_unstable();
                idx.dedup();
                assert_eq!(idx.len(), k, "duplicate member in {sample:?}");
            }
            let pi = inclusion_from_tableau(&j);
            for (i, &w) in weights.iter().enumerate() {
                let want = w * k as f64 / sum;
                assert!((pi[i] - want).abs() < 1e-9, "k={k} i={i}: {} vs {want}", pi[i]);
            }
        }
    }

    #[test]
    fn uniform_weights_give_a_partition() {
        let j = JessenBuilder::new()
            .add_weights([1.0; 4])
            .unwrap()
            .build(2)
            .unwrap();
        assert_eq!(j.len(), 2);
        assert_eq!(j.probabilities(), &[0.5, 0.5]);
    }

    #[test]
    fn full_sample_is_certain() {
        let j = JessenBuilder::new()
            .add_range(["x", "y", "z"], [2.0, 2.0, 2.0])
            .unwrap()
            .build(3)
            .unwrap();
        assert_eq!(j.len(), 1);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut got = j.sample(&mut rng).to_vec();
        got.sort_unstable();
        assert_eq!(got, vec!["x", "y", "z"]);
    }

    #[test]
    fn sample_space_is_restartable() {
        let j = JessenBuilder::new()
            .add_indexed(7, |i| 1.0 + i as f64)
            .unwrap()
            .build(3)
            .unwrap();
        let first: Vec<(Vec<usize>, f64)> = j.sample_space().map(|(s, p)| (s.to_vec(), p)).collect();
        let second: Vec<(Vec<usize>, f64)> = j.sample_space().map(|(s, p)| (s.to_vec(), p)).collect();
        assert_eq!(first, second);
        assert_eq!(j.sample_space().len(), j.len());
    }

    #[test]
    fn builder_inputs_agree() {
        let mut by_map: HashMap<&str, f64> = HashMap::new();
        by_map.insert("a", 1.0);
        by_map.insert("b", 3.0);

        let mut b = JessenBuilder::new();
        b.add_pairs(by_map).unwrap();
        b.add_mapping(["cc", "dddd"], |s| s.len() as f64).unwrap();
        b.add("e", 2.0).unwrap();
        assert_eq!(b.len(), 5);
        assert_eq!(b.weight_sum(), 12.0);

        let j = b.build(2).unwrap();
        assert_eq!(j.sample_size(), 2);
        assert_eq!(j.population().len(), 5);
        assert!(b.is_empty());
        assert_eq!(b.weight_sum(), 0.0);
    }

    #[test]
    fn sampled_frequencies_follow_tableau() {
        let j = JessenBuilder::new()
            .add_weights([1.0, 2.0, 3.0, 4.0])
            .unwrap()
            .build(2)
            .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let trials = 100_000;
        let mut counts = [0usize; 4];
        for _ in 0..trials {
            for &i in j.sample(&mut rng).iter() {
                counts[i] += 1;
            }
        }
        for (i, c) in counts.iter().enumerate() {
            let want = (i + 1) as f64 * 2.0 / 10.0;
            let got = *c as f64 / trials as f64;
            assert!((got - want).abs() < 0.01, "i={i}: {got} vs {want}");
        }
    }
}
