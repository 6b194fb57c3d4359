//! `rsx`: random sampling designs over streams and finite populations.
//!
//! Two families of sampler, plus the supporting pieces they share:
//!
//! - Stream samplers that see each element once and keep a sample of size
//!   `k` with bounded memory:
//!   - `reservoir`: uniform reservoir sampling driven by a pluggable skip
//!     strategy (Waterman's R, Vitter's X and Z, Li's L).
//!   - `order`: weighted order sampling (Efraimidis–Spirakis, Pareto,
//!     sequential Poisson), keeping the `k` largest random keys.
//! - Designs over a finite, weighted population whose inclusion
//!   probabilities are exactly proportional to the weights:
//!   - `jessen`: Jessen's method 3, precomputed into a tableau of equal-size
//!     samples and drawn with an alias table.
//!   - `systematic`: ordered systematic sampling.
//! - `simple`: uniform sampling without replacement from `0..n`.
//! - `alias`: Vose's alias method for constant-time discrete draws.
//! - `stats`: Welford's one-pass variance, for convergence checks.
//! - `util`: weight normalisation and feasibility checks.
//!
//! Samplers default to `rand::rng()`; every one of them also accepts a
//! caller-supplied generator for reproducible runs.
//!
//! ```
//! use rsx::{ReservoirSampler, SkipStrategy};
//!
//! let mut sampler = ReservoirSampler::new(SkipStrategy::LiL, 10).unwrap();
//! sampler.put_all(0..1_000);
//! assert_eq!(sampler.sample().len(), 10);
//! assert_eq!(sampler.stream_size(), 1_000);
//! ```

#![forbid(unsafe_code)]

pub mod alias;
pub mod error;
pub mod jessen;
pub mod order;
pub mod random;
pub mod reservoir;
pub mod simple;
pub mod skip;
pub mod stats;
pub mod systematic;
pub mod util;
pub mod view;

pub use alias::AliasTable;
pub use error::{SamplingError, UnknownStrategy};
pub use jessen::{JessenBuilder, JessenSample, JessenSampling, SampleSpace};
pub use order::{KeyStrategy, Keyed, OrderSampler};
pub use random::UniformSource;
pub use reservoir::{reservoir_sample_iter, reservoir_sample_slice, ReservoirSampler};
pub use simple::{swor, swor_population, Swor};
pub use skip::SkipStrategy;
pub use stats::WelfordVariance;
pub use systematic::{
    ordered_systematic, ordered_systematic_population, OrderedSystematic,
    OrderedSystematicPopulation, SystematicIndices,
};
pub use util::{check_feasibility, normalize_probabilities, sequence_equals};
pub use view::SampleView;
