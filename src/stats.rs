//! Welford's one-pass variance.
//!
//! Constant memory, numerically stable, queryable at any point. Useful for
//! deciding when a Monte Carlo estimate has converged:
//!
//! ```
//! use rsx::WelfordVariance;
//!
//! let mut wf = WelfordVariance::new();
//! for x in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
//!     wf.add(x);
//! }
//! assert_eq!(wf.mean(), Some(5.0));
//! assert_eq!(wf.population_variance(), Some(4.0));
//! ```
//!
//! Quantities that are undefined for too few observations (a mean of nothing,
//! a sample variance of one value) are `None`.

/// Running sum, count and sum of squared deviations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WelfordVariance {
    observations: u64,
    sum: f64,
    m2: f64,
}

impl WelfordVariance {
    /// No observations yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one observation.
    pub fn add(&mut self, observation: f64) {
        let previous_mean = if self.observations == 0 {
            0.0
        } else {
            self.sum / self.observations as f64
        };
        self.observations += 1;
        self.sum += observation;
        let mean = self.sum / self.observations as f64;
        self.m2 += (observation - mean) * (observation - previous_mean);
    }

    /// Number of observations added.
    pub fn observations(&self) -> u64 {
        self.observations
    }

    /// Sum of the observations.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Mean of the observations.
    pub fn mean(&self) -> Option<f64> {
        (self.observations > 0).then(|| self.sum / self.observations as f64)
    }

    /// `M2 / n`.
    pub fn population_variance(&self) -> Option<f64> {
        (self.observations > 0).then(|| self.m2 / self.observations as f64)
    }

    /// `M2 / (n - 1)`.
    pub fn sample_variance(&self) -> Option<f64> {
        (self.observations > 1).then(|| self.m2 / (self.observations - 1) as f64)
    }

    /// `sqrt(population_variance / n)`.
    pub fn population_standard_error(&self) -> Option<f64> {
        self.population_variance()
            .map(|v| (v / self.observations as f64).sqrt())
    }

    /// `sqrt(sample_variance / n)`.
    pub fn sample_standard_error(&self) -> Option<f64> {
        self.sample_variance()
            .map(|v| (v / self.observations as f64).sqrt())
    }
}

impl Extend<f64> for WelfordVariance {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.add(x);
        }
    }
}

impl FromIterator<f64> for WelfordVariance {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut wf = Self::new();
        wf.extend(iter);
        wf
    }
}
