//! Monte Carlo checks of first-order inclusion probabilities.
//!
//! Every design is run many times over a small population with a fixed seed;
//! the observed inclusion frequencies are compared with the design's target.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rsx::{
    ordered_systematic, swor, JessenBuilder, KeyStrategy, OrderSampler, OrderedSystematic,
    ReservoirSampler, SkipStrategy,
};

fn mse(counts: &[usize], trials: usize, expected: &[f64]) -> f64 {
    counts
        .iter()
        .zip(expected)
        .map(|(&c, &e)| (c as f64 / trials as f64 - e).powi(2))
        .sum::<f64>()
        / counts.len() as f64
}

#[test]
fn reservoir_inclusion_is_k_over_n() {
    let n = 10;
    let trials = 200_000;
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);

    for strategy in SkipStrategy::ALL {
        for k in 1..=5 {
            let mut counts = vec![0usize; n];
            for _ in 0..trials {
                let mut s = ReservoirSampler::with_rng(strategy, k, &mut rng).unwrap();
                s.put_all(0..n);
                for &i in s.sample().iter() {
                    counts[i] += 1;
                }
            }
            let err = mse(&counts, trials, &vec![k as f64 / n as f64; n]);
            assert!(err < 1e-5, "{strategy}, k={k}: mse={err:e}, counts={counts:?}");
        }
    }
}

#[test]
fn reservoir_fast_path_inclusion_is_k_over_n() {
    let population: Vec<usize> = (0..10).collect();
    let trials = 200_000;
    let k = 3;
    let mut rng = ChaCha8Rng::seed_from_u64(0xfa57);

    for strategy in SkipStrategy::ALL {
        let mut counts = vec![0usize; population.len()];
        for _ in 0..trials {
            let mut s = ReservoirSampler::with_rng(strategy, k, &mut rng).unwrap();
            s.put_slice(&population);
            for i in s.into_sample() {
                counts[i] += 1;
            }
        }
        let err = mse(&counts, trials, &[0.3; 10]);
        assert!(err < 1e-5, "{strategy}: mse={err:e}, counts={counts:?}");
    }
}

#[test]
fn order_sampling_favours_heavier_elements() {
    let n = 10;
    let k = 3;
    let trials = 200_000;
    let weights: Vec<f64> = (0..n).map(|i| (i + 1) as f64 / (n + 1) as f64).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(0x04de);

    for strategy in KeyStrategy::ALL {
        let mut counts = vec![0usize; n];
        for _ in 0..trials {
            let mut s = OrderSampler::with_rng(strategy, k, &mut rng).unwrap();
            s.put_all_weighted(0..n, weights.iter().copied()).unwrap();
            for &i in s.sample().iter() {
                counts[i] += 1;
            }
        }
        assert_eq!(counts.iter().sum::<usize>(), k * trials);
        assert!(
            counts.windows(2).all(|w| w[0] < w[1]),
            "{strategy}: inclusion not increasing in weight: {counts:?}"
        );
    }
}

#[test]
fn jessen_inclusion_is_proportional_to_weight() {
    let weights: Vec<f64> = (1..=10).map(f64::from).collect();
    let sum: f64 = weights.iter().sum();
    let trials = 200_000;
    let mut rng = ChaCha8Rng::seed_from_u64(0x1e55e);

    for k in 1..=5 {
        let j = JessenBuilder::new()
            .add_weights(weights.iter().copied())
            .unwrap()
            .build(k)
            .unwrap();
        let mut counts = vec![0usize; weights.len()];
        for _ in 0..trials {
            for &i in j.sample(&mut rng).iter() {
                counts[i] += 1;
            }
        }
        let expected: Vec<f64> = weights.iter().map(|w| k as f64 * w / sum).collect();
        let err = mse(&counts, trials, &expected);
        assert!(err < 1e-5, "k={k}: mse={err:e}, counts={counts:?}");
    }
}

#[test]
fn systematic_inclusion_is_proportional_to_weight() {
    let weights: Vec<f64> = (1..=10).map(f64::from).collect();
    let sum: f64 = weights.iter().sum();
    let s = OrderedSystematic::from_weights(weights.iter().copied()).unwrap();
    let trials = 200_000;
    let mut rng = ChaCha8Rng::seed_from_u64(0x5157);

    for k in 1..=5 {
        let mut counts = vec![0usize; weights.len()];
        for _ in 0..trials {
            for i in s.sample(k, &mut rng).unwrap() {
                counts[i] += 1;
            }
        }
        let expected: Vec<f64> = weights.iter().map(|w| k as f64 * w / sum).collect();
        let err = mse(&counts, trials, &expected);
        assert!(err < 1e-5, "k={k}: mse={err:e}, counts={counts:?}");
    }
}

#[test]
fn unweighted_designs_are_uniform() {
    let n = 12;
    let k = 4;
    let trials = 200_000;
    let mut rng = ChaCha8Rng::seed_from_u64(0xe9);
    let expected = vec![k as f64 / n as f64; n];

    let mut counts = vec![0usize; n];
    for _ in 0..trials {
        for i in swor(n, k, &mut rng).unwrap() {
            counts[i] += 1;
        }
    }
    let err = mse(&counts, trials, &expected);
    assert!(err < 1e-5, "swor: mse={err:e}, counts={counts:?}");

    let mut counts = vec![0usize; n];
    for _ in 0..trials {
        for i in ordered_systematic(n, k, &mut rng).unwrap() {
            counts[i] += 1;
        }
    }
    let err = mse(&counts, trials, &expected);
    assert!(err < 1e-5, "systematic: mse={err:e}, counts={counts:?}");
}
