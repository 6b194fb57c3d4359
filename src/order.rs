//! Weighted reservoir sampling by order sampling.
//!
//! Each element gets a random key derived from its weight and one
//! exclusive-uniform draw; the sampler keeps the `k` largest keys seen so far
//! in a bounded min-heap. Once the heap is full, a new element replaces the
//! minimum iff its key is strictly larger (ties are rejected), as a single
//! heap-replace so the heap never holds more than `k` entries.
//!
//! Key strategies:
//!
//! | strategy | key | legal weights | default |
//! |---|---|---|---|
//! | [`KeyStrategy::Efraimidis`] | `u^(1/w)` | (0, ∞) | 1.0 |
//! | [`KeyStrategy::Pareto`] | `((1-r)·w) / (r·(1-w))` | (0, 1) | 0.5 |
//! | [`KeyStrategy::SequentialPoisson`] | `w / r` | (0, ∞) | 1.0 |
//!
//! None of these has inclusion probabilities exactly proportional to the
//! weights; all of them are monotone increasing in the weight. For Pareto the
//! weight is the target inclusion probability.
//!
//! ## References
//!
//! - Efraimidis & Spirakis (2006): *Weighted random sampling with a reservoir* (A-Res).
//! - Rosén (1997): *On sampling with probability proportional to size* (Pareto).
//! - Ohlsson (1998): *Sequential Poisson sampling*.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use std::str::FromStr;

use rand::rngs::ThreadRng;
use rand::Rng;

use crate::error::{check_sample_size, SamplingError, UnknownStrategy};
use crate::random::UniformSource;
use crate::view::SampleView;

/// How an element's weight becomes its ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyStrategy {
    /// Efraimidis–Spirakis A-Res: key `u^(1/w)`.
    #[default]
    Efraimidis,
    /// Rosén's Pareto sampling: weight is a target inclusion probability.
    Pareto,
    /// Ohlsson's sequential Poisson sampling: key `w / r`.
    SequentialPoisson,
}

impl KeyStrategy {
    /// All strategies, in a stable order.
    pub const ALL: [KeyStrategy; 3] = [Self::Efraimidis, Self::Pareto, Self::SequentialPoisson];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Efraimidis => "efraimidis",
            Self::Pareto => "pareto",
            Self::SequentialPoisson => "sequential-poisson",
        }
    }

    /// Human-readable legal weight domain.
    pub fn domain(self) -> &'static str {
        match self {
            Self::Efraimidis | Self::SequentialPoisson => "(0, inf)",
            Self::Pareto => "(0, 1)",
        }
    }

    /// Whether `weight` is accepted by this strategy.
    pub fn is_weight_legal(self, weight: f64) -> bool {
        match self {
            Self::Efraimidis | Self::SequentialPoisson => weight.is_finite() && weight > 0.0,
            Self::Pareto => weight > 0.0 && weight < 1.0,
        }
    }

    /// Weight used when the caller supplies none.
    pub fn default_weight(self) -> f64 {
        match self {
            Self::Efraimidis | Self::SequentialPoisson => 1.0,
            Self::Pareto => 0.5,
        }
    }

    /// Draw a key for an element of weight `weight`.
    ///
    /// The weight must be legal for this strategy.
    pub fn key<R: Rng + ?Sized>(self, weight: f64, rng: &mut R) -> f64 {
        let r = rng.uniform_exclusive();
        match self {
            Self::Efraimidis => r.powf(1.0 / weight),
            Self::Pareto => ((1.0 - r) * weight) / (r * (1.0 - weight)),
            Self::SequentialPoisson => weight / r,
        }
    }
}

impl fmt::Display for KeyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "efraimidis" | "efraimidis-spirakis" | "a-res" => Ok(Self::Efraimidis),
            "pareto" | "rosen" => Ok(Self::Pareto),
            "sequential-poisson" | "ohlsson" => Ok(Self::SequentialPoisson),
            _ => Err(UnknownStrategy(s.to_owned())),
        }
    }
}

/// A value with its ordering key. Ordered by key only.
#[derive(Debug, Clone)]
pub struct Keyed<T> {
    key: f64,
    value: T,
}

impl<T> Keyed<T> {
    /// The randomized key.
    pub fn key(&self) -> f64 {
        self.key
    }

    /// The sampled value.
    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T> PartialEq for Keyed<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key.total_cmp(&other.key) == Ordering::Equal
    }
}

impl<T> Eq for Keyed<T> {}

impl<T> PartialOrd for Keyed<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Keyed<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.total_cmp(&other.key)
    }
}

/// Heap slot; `Reverse` turns the max-heap into a min-heap on keys.
pub type Slot<T> = Reverse<Keyed<T>>;

fn slot_value<T>(slot: &Slot<T>) -> &T {
    &slot.0.value
}

fn slot_key<T>(slot: &Slot<T>) -> &f64 {
    &slot.0.key
}

/// A weighted reservoir sampler keeping the `k` largest keys.
#[derive(Debug, Clone)]
pub struct OrderSampler<T, R = ThreadRng> {
    k: usize,
    seen: usize,
    heap: BinaryHeap<Slot<T>>,
    strategy: KeyStrategy,
    rng: R,
}

impl<T> OrderSampler<T> {
    /// Create a sampler of size `k` using `rand::rng()`.
    ///
    /// # Errors
    /// [`SamplingError::InvalidSampleSize`] if `k == 0`.
    pub fn new(strategy: KeyStrategy, k: usize) -> Result<Self, SamplingError> {
        Self::with_rng(strategy, k, rand::rng())
    }
}

impl<T, R: Rng> OrderSampler<T, R> {
    /// Create a sampler of size `k` using a caller-supplied RNG.
    ///
    /// # Errors
    /// [`SamplingError::InvalidSampleSize`] if `k == 0`.
    pub fn with_rng(strategy: KeyStrategy, k: usize, rng: R) -> Result<Self, SamplingError> {
        let k = check_sample_size(k)?;
        log::debug!("order sampler: strategy={strategy}, k={k}");
        Ok(Self {
            k,
            seen: 0,
            heap: BinaryHeap::with_capacity(k),
            strategy,
            rng,
        })
    }

    /// Offer an element with the strategy's default weight.
    ///
    /// Returns `true` if the element entered the sample.
    pub fn put(&mut self, element: T) -> bool {
        let key = self.strategy.key(self.strategy.default_weight(), &mut self.rng);
        self.offer(element, key)
    }

    /// Offer a weighted element.
    ///
    /// Returns `true` if the element entered the sample.
    ///
    /// # Errors
    /// [`SamplingError::WeightOutOfDomain`] if the strategy rejects `weight`;
    /// the sampler is left unchanged.
    pub fn put_weighted(&mut self, element: T, weight: f64) -> Result<bool, SamplingError> {
        if !self.strategy.is_weight_legal(weight) {
            return Err(SamplingError::WeightOutOfDomain {
                weight,
                strategy: self.strategy,
            });
        }
        let key = self.strategy.key(weight, &mut self.rng);
        Ok(self.offer(element, key))
    }

    fn offer(&mut self, value: T, key: f64) -> bool {
        self.seen += 1;

        if self.heap.len() < self.k {
            self.heap.push(Reverse(Keyed { key, value }));
            return true;
        }

        match self.heap.peek_mut() {
            Some(mut min) if min.0.key < key => {
                *min = Reverse(Keyed { key, value });
                true
            }
            _ => false,
        }
    }

    /// Offer every element with the default weight.
    ///
    /// Returns `true` if the sample changed.
    pub fn put_all<I: IntoIterator<Item = T>>(&mut self, elements: I) -> bool {
        let mut changed = false;
        for element in elements {
            changed |= self.put(element);
        }
        changed
    }

    /// Offer elements zipped with weights; stops at the shorter input.
    ///
    /// Returns `true` if the sample changed.
    ///
    /// # Errors
    /// Stops at the first illegal weight. Elements before it stay offered.
    pub fn put_all_weighted<I, W>(&mut self, elements: I, weights: W) -> Result<bool, SamplingError>
    where
        I: IntoIterator<Item = T>,
        W: IntoIterator<Item = f64>,
    {
        let mut changed = false;
        for (element, weight) in elements.into_iter().zip(weights) {
            changed |= self.put_weighted(element, weight)?;
        }
        Ok(changed)
    }

    /// The sample size this sampler was created with.
    pub fn sample_size(&self) -> usize {
        self.k
    }

    /// Number of elements accepted for consideration (legal weights only).
    pub fn stream_size(&self) -> usize {
        self.seen
    }

    /// The key strategy in use.
    pub fn strategy(&self) -> KeyStrategy {
        self.strategy
    }

    /// Read-only view of the sampled values (size ≤ k, heap order).
    pub fn sample(&self) -> SampleView<'_, Slot<T>, T> {
        SampleView::new(self.heap.as_slice(), slot_value)
    }

    /// Keys for diagnostics, aligned with [`sample`](Self::sample).
    pub fn keys(&self) -> SampleView<'_, Slot<T>, f64> {
        SampleView::new(self.heap.as_slice(), slot_key)
    }

    /// Take ownership of the sampled values, consuming the sampler.
    pub fn into_sample(self) -> Vec<T> {
        self.heap.into_iter().map(|Reverse(k)| k.value).collect()
    }
}
