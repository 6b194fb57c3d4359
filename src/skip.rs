//! Skip generators for unweighted reservoir sampling.
//!
//! Once the reservoir holds `k` elements, the sampler only needs to know how
//! many elements to discard before the next replacement. Each strategy below
//! produces that sequence of skips lazily, using memory independent of `k`
//! and of the stream length.
//!
//! | strategy | draws per skip | notes |
//! |---|---|---|
//! | [`SkipStrategy::Waterman`] | O(skip) | Algorithm R, one test per element |
//! | [`SkipStrategy::VitterX`] | 1 | sequential search for the skip |
//! | [`SkipStrategy::VitterZ`] | ~3 expected | rejection with a majorizing density |
//! | [`SkipStrategy::LiL`] | 2 | geometric skip, closed form |
//!
//! Z and L carry a multiplicative state `w` whose precision degrades as the
//! stream grows. This is inherent to the algorithms.
//!
//! ## References
//!
//! - Vitter (1985): *Random sampling with a reservoir* (Algorithms R, X, Z).
//! - Li (1994): *Reservoir-sampling algorithms of time complexity
//!   O(n(1 + log(N/n)))* (Algorithm L).

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::error::UnknownStrategy;
use crate::random::UniformSource;

/// Which skip sequence drives a [`crate::ReservoirSampler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SkipStrategy {
    /// Waterman's Algorithm R: accept the `t`-th element with probability `k/t`.
    Waterman,
    /// Vitter's Algorithm X: invert the skip distribution by sequential search.
    VitterX,
    /// Vitter's Algorithm Z: acceptance/rejection, O(1) expected cost per skip.
    VitterZ,
    /// Li's Algorithm L: geometric skips with a shrinking success rate.
    #[default]
    LiL,
}

impl SkipStrategy {
    /// All strategies, in a stable order.
    pub const ALL: [SkipStrategy; 4] = [Self::Waterman, Self::VitterX, Self::VitterZ, Self::LiL];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Waterman => "waterman",
            Self::VitterX => "vitter-x",
            Self::VitterZ => "vitter-z",
            Self::LiL => "li-l",
        }
    }
}

impl fmt::Display for SkipStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SkipStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "waterman" | "r" | "algorithm-r" => Ok(Self::Waterman),
            "vitter-x" | "x" => Ok(Self::VitterX),
            "vitter-z" | "z" => Ok(Self::VitterZ),
            "li-l" | "l" | "algorithm-l" => Ok(Self::LiL),
            _ => Err(UnknownStrategy(s.to_owned())),
        }
    }
}

/// Per-strategy skip state.
///
/// `t` is the number of stream elements accounted for so far (starting at
/// `k`, the moment the reservoir first fills).
#[derive(Debug, Clone)]
pub(crate) enum SkipGenerator {
    Waterman { t: u64 },
    VitterX { t: u64 },
    VitterZ { t: u64, w: f64 },
    LiL { w: f64 },
}

impl SkipGenerator {
    pub(crate) fn new<R: Rng + ?Sized>(strategy: SkipStrategy, k: usize, rng: &mut R) -> Self {
        let t = k as u64;
        match strategy {
            SkipStrategy::Waterman => Self::Waterman { t },
            SkipStrategy::VitterX => Self::VitterX { t },
            SkipStrategy::VitterZ => Self::VitterZ {
                t,
                w: rng.uniform_exclusive().powf(-1.0 / k as f64),
            },
            SkipStrategy::LiL => Self::LiL {
                w: rng.uniform_exclusive().powf(1.0 / k as f64),
            },
        }
    }

    /// Advance and return the next skip.
    pub(crate) fn next_skip<R: Rng + ?Sized>(&mut self, k: usize, rng: &mut R) -> u64 {
        match self {
            Self::Waterman { t } => waterman(t, k, rng),
            Self::VitterX { t } => vitter_x(t, k, rng),
            Self::VitterZ { t, w } => vitter_z(t, w, k, rng),
            Self::LiL { w } => li_l(w, k, rng),
        }
    }
}

fn waterman<R: Rng + ?Sized>(t: &mut u64, k: usize, rng: &mut R) -> u64 {
    let k = k as f64;
    *t += 1;
    let mut skip = 0;
    while rng.uniform() * *t as f64 >= k {
        *t += 1;
        skip += 1;
    }
    skip
}

fn vitter_x<R: Rng + ?Sized>(t: &mut u64, k: usize, rng: &mut R) -> u64 {
    let k = k as f64;
    *t += 1;
    let v = rng.uniform();
    let mut skip = 0;
    // quot = P(skip > s) = prod_{j=t}^{t+s} (j - k) / j
    let mut quot = (*t as f64 - k) / *t as f64;
    while quot > v {
        *t += 1;
        skip += 1;
        quot = (quot * (*t as f64 - k)) / *t as f64;
    }
    skip
}

fn vitter_z<R: Rng + ?Sized>(t: &mut u64, w: &mut f64, k: usize, rng: &mut R) -> u64 {
    let n = k as f64;
    let k = k as u64;
    let tf = *t as f64;
    let term = *t - k + 1;
    let termf = term as f64;
    let mut rejections = 0u32;

    loop {
        let u = rng.uniform_exclusive();
        let x = tf * (*w - 1.0);
        let g = x as u64;
        let gf = g as f64;

        // U <= h(G) / cg(X)
        let lhs = ((u * ((tf + 1.0) / termf).powi(2) * (termf + gf)) / (tf + x)).powf(1.0 / n);
        let rhs = (((tf + x) / (termf + gf)) * termf) / tf;
        if lhs < rhs {
            *w = rhs / lhs;
            *t = t.saturating_add(g.saturating_add(1));
            return g;
        }

        // U <= f(G) / cg(X)
        let mut y = (((u * (tf + 1.0)) / termf) * (tf + gf + 1.0)) / (tf + x);
        let (mut denom, numer_lim) = if k < g {
            (tf, term + g)
        } else {
            ((*t - k + g) as f64, *t + 1)
        };
        for numer in (numer_lim..=t.saturating_add(g)).rev() {
            y = (y * numer as f64) / denom;
            denom -= 1.0;
        }

        *w = rng.uniform_exclusive().powf(-1.0 / n);
        if y.powf(1.0 / n) <= (tf + x) / tf {
            *t = t.saturating_add(g.saturating_add(1));
            return g;
        }

        rejections += 1;
        log::trace!("vitter-z: rejected candidate skip {g} at t={t} ({rejections} so far)");
    }
}

fn li_l<R: Rng + ?Sized>(w: &mut f64, k: usize, rng: &mut R) -> u64 {
    let r1 = rng.uniform_exclusive();
    let r2 = rng.uniform_exclusive();
    // Saturating cast: a vanishing w means "skip everything".
    let skip = (r1.ln() / (-*w).ln_1p()).floor() as u64;
    *w *= r2.powf(1.0 / k as f64);
    skip
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn names_round_trip_through_from_str() {
        for s in SkipStrategy::ALL {
            assert_eq!(s.name().parse::<SkipStrategy>(), Ok(s));
        }
        assert_eq!("Vitter_Z".parse::<SkipStrategy>(), Ok(SkipStrategy::VitterZ));
        assert_eq!("L".parse::<SkipStrategy>(), Ok(SkipStrategy::LiL));
        assert!("algorithm-q".parse::<SkipStrategy>().is_err());
        assert_eq!(SkipStrategy::default(), SkipStrategy::LiL);
    }

    /// Right after the reservoir fills, P(skip >= s) = prod_{j=1}^{s} j / (k + j).
    #[test]
    fn first_skip_distribution_agrees_across_strategies() {
        let k = 4;
        let trials = 40_000;
        let mut means = Vec::new();
        for strategy in SkipStrategy::ALL {
            let mut rng = ChaCha8Rng::seed_from_u64(11);
            let mut zero = 0usize;
            let mut small = 0usize;
            for _ in 0..trials {
                let mut g = SkipGenerator::new(strategy, k, &mut rng);
                let s = g.next_skip(k, &mut rng);
                if s == 0 {
                    zero += 1;
                }
                if s < 4 {
                    small += 1;
                }
            }
            means.push((
                strategy,
                zero as f64 / trials as f64,
                small as f64 / trials as f64,
            ));
        }
        // P(skip = 0) = k/(k+1) = 0.8 and P(skip >= 4) = 4!k!/(k+4)! = 1/70 for k = 4.
        for (strategy, p0, p_lt4) in means {
            assert!((p0 - 0.8).abs() < 0.01, "{strategy}: P(skip=0) = {p0}");
            assert!(
                (p_lt4 - (1.0 - 1.0 / 70.0)).abs() < 0.01,
                "{strategy}: P(skip<4) = {p_lt4}"
            );
        }
    }

    #[test]
    fn skips_advance_the_stream_position() {
        let k = 50;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for strategy in [SkipStrategy::Waterman, SkipStrategy::VitterX, SkipStrategy::VitterZ] {
            let mut g = SkipGenerator::new(strategy, k, &mut rng);
            let mut expected = k as u64;
            for _ in 0..20 {
                let s = g.next_skip(k, &mut rng);
                expected = expected.saturating_add(s.saturating_add(1));
            }
            let t = match g {
                SkipGenerator::Waterman { t }
                | SkipGenerator::VitterX { t }
                | SkipGenerator::VitterZ { t, .. } => t,
                SkipGenerator::LiL { .. } => unreachable!(),
            };
            assert_eq!(t, expected, "{strategy}");
        }
    }
}
