//! Unweighted reservoir sampling.
//!
//! Maintains a uniform sample of size `k` from a stream of unknown length:
//! after `n >= k` elements, every element is in the reservoir with
//! probability `k/n`.
//!
//! The sampler is a skip-driven state machine. The first `k` elements are
//! appended. After that, a pluggable [`SkipStrategy`] says how many elements
//! to discard before the next one replaces a uniformly chosen slot, so the
//! number of RNG calls depends on the strategy rather than on the stream
//! length.
//!
//! Random-access input can go through [`ReservoirSampler::put_slice`], which
//! jumps over skipped elements arithmetically and touches only the admitted
//! ones. It consumes the RNG exactly like a `put` loop would, so the two
//! paths produce the same reservoir for the same seed.
//!
//! Notes:
//! - `new` constructors draw from `rand::rng()`; `with_rng` takes any
//!   generator for deterministic testing/benchmarking.
//! - Duplicates are not detected; equal elements put twice are two elements.

use rand::rngs::ThreadRng;
use rand::Rng;

use crate::error::{check_sample_size, SamplingError};
use crate::random::UniformSource;
use crate::skip::{SkipGenerator, SkipStrategy};
use crate::view::SampleView;

/// A reservoir sampler that maintains a uniform sample of size `k` from a stream.
#[derive(Debug, Clone)]
pub struct ReservoirSampler<T, R = ThreadRng> {
    k: usize,
    seen: usize,
    reservoir: Vec<T>,
    skip: u64,
    strategy: SkipStrategy,
    generator: SkipGenerator,
    rng: R,
}

impl<T> ReservoirSampler<T> {
    /// Create a sampler of size `k` driven by `strategy`, using `rand::rng()`.
    ///
    /// # Errors
    /// [`SamplingError::InvalidSampleSize`] if `k == 0`.
    pub fn new(strategy: SkipStrategy, k: usize) -> Result<Self, SamplingError> {
        Self::with_rng(strategy, k, rand::rng())
    }
}

impl<T, R: Rng> ReservoirSampler<T, R> {
    /// Create a sampler of size `k` driven by `strategy`, using a
    /// caller-supplied RNG.
    ///
    /// # Errors
    /// [`SamplingError::InvalidSampleSize`] if `k == 0`.
    pub fn with_rng(strategy: SkipStrategy, k: usize, mut rng: R) -> Result<Self, SamplingError> {
        let k = check_sample_size(k)?;
        let mut generator = SkipGenerator::new(strategy, k, &mut rng);
        let skip = generator.next_skip(k, &mut rng);
        log::debug!("reservoir sampler: strategy={strategy}, k={k}");
        Ok(Self {
            k,
            seen: 0,
            reservoir: Vec::with_capacity(k),
            skip,
            strategy,
            generator,
            rng,
        })
    }

    /// Offer an element from the stream.
    ///
    /// Returns `true` if the element entered the reservoir.
    #[inline]
    pub fn put(&mut self, element: T) -> bool {
        self.seen += 1;

        // Phase 1: filling the reservoir
        if self.reservoir.len() < self.k {
            self.reservoir.push(element);
            return true;
        }

        // Phase 2: skipping
        if self.skip > 0 {
            self.skip -= 1;
            return false;
        }

        self.replace(element);
        true
    }

    /// Offer every element of `elements`, in iteration order.
    ///
    /// Returns `true` if the reservoir changed.
    pub fn put_all<I: IntoIterator<Item = T>>(&mut self, elements: I) -> bool {
        let mut changed = false;
        for element in elements {
            changed |= self.put(element);
        }
        changed
    }

    /// Offer every element of a random-access sequence.
    ///
    /// Equivalent to `put_all(elements.iter().cloned())` in outcome and in
    /// [`stream_size`](Self::stream_size), but only the admitted elements are
    /// visited (and cloned).
    ///
    /// Returns `true` if the reservoir changed.
    pub fn put_slice(&mut self, elements: &[T]) -> bool
    where
        T: Clone,
    {
        let len = elements.len();
        let mut changed = false;
        let mut offset = 0;

        while offset < len && self.reservoir.len() < self.k {
            self.reservoir.push(elements[offset].clone());
            offset += 1;
            changed = true;
        }

        while ((len - offset) as u64) > self.skip {
            offset += self.skip as usize;
            self.replace(elements[offset].clone());
            offset += 1;
            changed = true;
        }
        self.skip -= (len - offset) as u64;

        self.seen += len;
        changed
    }

    fn replace(&mut self, element: T) {
        let slot = self.rng.index(self.k);
        self.reservoir[slot] = element;
        self.skip = self.generator.next_skip(self.k, &mut self.rng);
    }

    /// The sample size this sampler was created with.
    ///
    /// The reservoir holds fewer elements until `k` have been offered.
    pub fn sample_size(&self) -> usize {
        self.k
    }

    /// Number of elements offered over the sampler's lifetime.
    pub fn stream_size(&self) -> usize {
        self.seen
    }

    /// The strategy generating skips.
    pub fn strategy(&self) -> SkipStrategy {
        self.strategy
    }

    /// Read-only view of the reservoir (size ≤ k, no particular order).
    pub fn sample(&self) -> SampleView<'_, T, T> {
        SampleView::new(&self.reservoir, SampleView::identity)
    }

    /// Take ownership of the reservoir, consuming the sampler.
    pub fn into_sample(self) -> Vec<T> {
        self.reservoir
    }
}

/// Sample `k` elements from a slice using the random-access fast path.
///
/// Returns fewer than `k` elements if the slice is shorter than `k`.
///
/// # Errors
/// [`SamplingError::InvalidSampleSize`] if `k == 0`.
pub fn reservoir_sample_slice<T: Clone, R: Rng>(
    strategy: SkipStrategy,
    population: &[T],
    k: usize,
    rng: R,
) -> Result<Vec<T>, SamplingError> {
    let mut sampler = ReservoirSampler::with_rng(strategy, k, rng)?;
    sampler.put_slice(population);
    Ok(sampler.into_sample())
}

/// Sample `k` elements from a one-pass iterator.
///
/// # Errors
/// [`SamplingError::InvalidSampleSize`] if `k == 0`.
pub fn reservoir_sample_iter<I: IntoIterator, R: Rng>(
    strategy: SkipStrategy,
    population: I,
    k: usize,
    rng: R,
) -> Result<Vec<I::Item>, SamplingError> {
    let mut sampler = ReservoirSampler::with_rng(strategy, k, rng)?;
    sampler.put_all(population);
    Ok(sampler.into_sample())
}
