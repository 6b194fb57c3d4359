//! Error type shared by every sampling design in the crate.

use crate::order::KeyStrategy;

/// Errors surfaced by samplers, builders, and helpers.
///
/// Every failure is reported synchronously; nothing is retried internally.
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingError {
    /// Sample size must be at least 1.
    InvalidSampleSize(usize),
    /// The requested sample is larger than a population of known size.
    SampleLargerThanPopulation {
        /// Requested sample size.
        sample_size: usize,
        /// Number of elements available.
        population: usize,
    },
    /// The population (or probability vector) has no elements.
    EmptyPopulation,
    /// Weight is not finite (NaN/inf).
    NonFiniteWeight(f64),
    /// Weight is non-positive.
    NonPositiveWeight(f64),
    /// Weight lies outside the legal domain of an order-sampling key.
    WeightOutOfDomain {
        /// The rejected weight.
        weight: f64,
        /// The key strategy whose domain was violated.
        strategy: KeyStrategy,
    },
    /// An element's implied inclusion probability exceeds 1.
    Infeasible {
        /// Position of the offending element in insertion order.
        index: usize,
        /// The implied inclusion probability `weight * k / sum`.
        inclusion: f64,
    },
}

impl std::fmt::Display for SamplingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSampleSize(k) => write!(f, "sample size must be >= 1 (got {k})"),
            Self::SampleLargerThanPopulation {
                sample_size,
                population,
            } => write!(
                f,
                "condition 0 < k <= n not satisfied (k = {sample_size}, n = {population})"
            ),
            Self::EmptyPopulation => write!(f, "the population must contain at least one element"),
            Self::NonFiniteWeight(w) => write!(f, "weight must be finite (got {w})"),
            Self::NonPositiveWeight(w) => write!(f, "weight must be > 0 (got {w})"),
            Self::WeightOutOfDomain { weight, strategy } => write!(
                f,
                "weight {weight} is outside the {strategy} domain {}",
                strategy.domain()
            ),
            Self::Infeasible { index, inclusion } => write!(
                f,
                "infeasible case for element {index}: inclusion probability {inclusion} > 1"
            ),
        }
    }
}

impl std::error::Error for SamplingError {}

/// Error returned when parsing an unknown strategy name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStrategy(pub String);

impl std::fmt::Display for UnknownStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown sampling strategy `{}`", self.0)
    }
}

impl std::error::Error for UnknownStrategy {}

/// Validate a strictly positive, finite weight.
pub(crate) fn check_weight(weight: f64) -> Result<f64, SamplingError> {
    if !weight.is_finite() {
        return Err(SamplingError::NonFiniteWeight(weight));
    }
    if weight <= 0.0 {
        return Err(SamplingError::NonPositiveWeight(weight));
    }
    Ok(weight)
}

/// Validate a sample size `k >= 1`.
pub(crate) fn check_sample_size(sample_size: usize) -> Result<usize, SamplingError> {
    if sample_size < 1 {
        return Err(SamplingError::InvalidSampleSize(sample_size));
    }
    Ok(sample_size)
}

/// Validate `0 < k <= n` for designs over a population of known size.
pub(crate) fn check_sample_fits(sample_size: usize, population: usize) -> Result<(), SamplingError> {
    if sample_size == 0 || sample_size > population {
        return Err(SamplingError::SampleLargerThanPopulation {
            sample_size,
            population,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_checks() {
        assert_eq!(check_weight(0.5), Ok(0.5));
        assert_eq!(check_weight(0.0), Err(SamplingError::NonPositiveWeight(0.0)));
        assert_eq!(
            check_weight(-1.0),
            Err(SamplingError::NonPositiveWeight(-1.0))
        );
        assert!(matches!(
            check_weight(f64::NAN),
            Err(SamplingError::NonFiniteWeight(w)) if w.is_nan()
        ));
        assert_eq!(
            check_weight(f64::INFINITY),
            Err(SamplingError::NonFiniteWeight(f64::INFINITY))
        );
    }

    #[test]
    fn size_checks() {
        assert_eq!(check_sample_size(0), Err(SamplingError::InvalidSampleSize(0)));
        assert_eq!(check_sample_size(3), Ok(3));
        assert!(check_sample_fits(3, 3).is_ok());
        assert!(check_sample_fits(0, 3).is_err());
        assert_eq!(
            check_sample_fits(4, 3),
            Err(SamplingError::SampleLargerThanPopulation {
                sample_size: 4,
                population: 3
            })
        );
    }

    #[test]
    fn messages_name_the_problem() {
        let msg = SamplingError::WeightOutOfDomain {
            weight: 1.5,
            strategy: KeyStrategy::Pareto,
        }
        .to_string();
        assert!(msg.contains("pareto"), "{msg}");
        assert!(msg.contains("(0, 1)"), "{msg}");

        let msg = SamplingError::Infeasible {
            index: 2,
            inclusion: 1.25,
        }
        .to_string();
        assert!(msg.contains("element 2"), "{msg}");
    }
}
