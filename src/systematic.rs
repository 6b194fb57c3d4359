//! Ordered systematic sampling.
//!
//! Lay the population out on a line, each element occupying a segment whose
//! length is its weight, then select the elements hit by `k` equally spaced
//! points `u, u + Σ/k, u + 2Σ/k, ...` with a single random start
//! \(u \sim U[0, Σ/k)\). Inclusion probabilities are exactly
//! \(k w_i / Σ\) whenever no weight exceeds \(Σ/k\), so the design satisfies
//! the ratio-estimator property. Second-order inclusion probabilities depend
//! on the population order.
//!
//! Sampling is one draw plus `k` binary searches over the cumulative sums.

use rand::Rng;

use crate::error::{check_sample_fits, check_weight, SamplingError};

/// Unweighted systematic sample: `k` indices of `0..n`, in increasing order.
///
/// # Errors
/// [`SamplingError::SampleLargerThanPopulation`] unless `0 < k <= n`.
pub fn ordered_systematic<R: Rng + ?Sized>(
    n: usize,
    k: usize,
    rng: &mut R,
) -> Result<impl Iterator<Item = usize>, SamplingError> {
    check_sample_fits(k, n)?;
    let step = n as f64 / k as f64;
    let start = rng.random_range(0.0..step);
    Ok((0..k).map(move |i| ((start + i as f64 * step) as usize).min(n - 1)))
}

/// Unweighted systematic sample over a slice.
///
/// # Errors
/// [`SamplingError::SampleLargerThanPopulation`] unless `0 < k <= population.len()`.
pub fn ordered_systematic_population<'a, T, R: Rng + ?Sized>(
    population: &'a [T],
    k: usize,
    rng: &mut R,
) -> Result<impl Iterator<Item = &'a T>, SamplingError> {
    let indices = ordered_systematic(population.len(), k, rng)?;
    Ok(indices.map(move |i| &population[i]))
}

/// Weighted ordered systematic sampling over element indices.
#[derive(Debug, Clone, Default)]
pub struct OrderedSystematic {
    cumulative: Vec<f64>,
    largest: f64,
    largest_index: usize,
}

impl OrderedSystematic {
    /// An empty population.
    pub fn new() -> Self {
        Self::default()
    }

    /// A population with the given weights.
    ///
    /// # Errors
    /// The first bad weight.
    pub fn from_weights<I: IntoIterator<Item = f64>>(weights: I) -> Result<Self, SamplingError> {
        let mut s = Self::new();
        for w in weights {
            s.push_weight(w)?;
        }
        Ok(s)
    }

    /// Append an element; returns its index.
    ///
    /// # Errors
    /// [`SamplingError::NonPositiveWeight`] / [`SamplingError::NonFiniteWeight`],
    /// the latter also when the running total would overflow.
    pub fn push_weight(&mut self, weight: f64) -> Result<usize, SamplingError> {
        let weight = check_weight(weight)?;
        let total = self.total() + weight;
        if !total.is_finite() {
            return Err(SamplingError::NonFiniteWeight(total));
        }
        self.cumulative.push(total);
        let index = self.cumulative.len() - 1;
        if weight > self.largest {
            self.largest = weight;
            self.largest_index = index;
        }
        Ok(index)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    /// Whether no element has been pushed.
    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Sum of the weights.
    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Draw `k` distinct indices in increasing order.
    ///
    /// # Errors
    /// - [`SamplingError::SampleLargerThanPopulation`] unless `0 < k <= n`.
    /// - [`SamplingError::Infeasible`] if the largest weight exceeds `Σ/k`.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        k: usize,
        rng: &mut R,
    ) -> Result<SystematicIndices<'_>, SamplingError> {
        check_sample_fits(k, self.len())?;
        let total = self.total();
        let inclusion = k as f64 * self.largest / total;
        if inclusion > 1.0 {
            return Err(SamplingError::Infeasible {
                index: self.largest_index,
                inclusion,
            });
        }

        let step = total / k as f64;
        Ok(SystematicIndices {
            cumulative: &self.cumulative,
            point: rng.random_range(0.0..step),
            step,
            left: k,
            lo: 0,
        })
    }
}

/// Indices hit by the equally spaced points of one systematic draw.
#[derive(Debug, Clone)]
pub struct SystematicIndices<'a> {
    cumulative: &'a [f64],
    point: f64,
    step: f64,
    left: usize,
    lo: usize,
}

impl Iterator for SystematicIndices<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.left == 0 {
            return None;
        }
        // bisect_right: first cumulative sum strictly above the point
        let point = self.point;
        let hit = self.lo + self.cumulative[self.lo..].partition_point(|&c| c <= point);
        self.lo = hit.min(self.cumulative.len() - 1);
        self.point += self.step;
        self.left -= 1;
        Some(self.lo)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.left, Some(self.left))
    }
}

impl ExactSizeIterator for SystematicIndices<'_> {}

/// Weighted ordered systematic sampling over stored values.
#[derive(Debug, Clone)]
pub struct OrderedSystematicPopulation<T> {
    index: OrderedSystematic,
    population: Vec<T>,
}

impl<T> Default for OrderedSystematicPopulation<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OrderedSystematicPopulation<T> {
    /// An empty population.
    pub fn new() -> Self {
        Self {
            index: OrderedSystematic::new(),
            population: Vec::new(),
        }
    }

    /// Append a weighted element.
    ///
    /// # Errors
    /// Bad weight; the population is unchanged.
    pub fn push_item(&mut self, element: T, weight: f64) -> Result<(), SamplingError> {
        self.index.push_weight(weight)?;
        self.population.push(element);
        Ok(())
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.population.len()
    }

    /// Whether the population is empty.
    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }

    /// Draw `k` elements in population order.
    ///
    /// # Errors
    /// As [`OrderedSystematic::sample`].
    pub fn sample<R: Rng + ?Sized>(
        &self,
        k: usize,
        rng: &mut R,
    ) -> Result<impl Iterator<Item = &T>, SamplingError> {
        Ok(self.index.sample(k, rng)?.map(move |i| &self.population[i]))
    }
}
