//! Weighted designs side by side: order sampling vs Jessen vs systematic.
//!
//! Order sampling keeps the heaviest random keys from a stream; its inclusion
//! probabilities grow with the weight but are not proportional to it. Jessen's
//! method and ordered systematic sampling need the whole population up front
//! and hit \(\pi_i = k w_i / \sum_j w_j\) exactly.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rsx::{
    check_feasibility, JessenBuilder, KeyStrategy, OrderSampler, OrderedSystematic,
    WelfordVariance,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Decaying weights: a few heavy elements, a long light tail.
    let weights: Vec<f64> = (0..12)
        .map(|i| 1.0 / (1.0 + i as f64).powf(0.8))
        .collect();
    let sum: f64 = weights.iter().sum();
    let k = 3usize;
    if !check_feasibility(&weights, k) {
        return Err(format!("k={k} is infeasible for these weights").into());
    }

    let trials = 50_000;
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let mut order = vec![0usize; weights.len()];
    for _ in 0..trials {
        let mut s = OrderSampler::with_rng(KeyStrategy::SequentialPoisson, k, &mut rng)?;
        s.put_all_weighted(0..weights.len(), weights.iter().copied())?;
        for &i in s.sample().iter() {
            order[i] += 1;
        }
    }

    let jessen = JessenBuilder::new()
        .add_weights(weights.iter().copied())?
        .build(k)?;
    let mut tableau = vec![0usize; weights.len()];
    for _ in 0..trials {
        for &i in jessen.sample(&mut rng).iter() {
            tableau[i] += 1;
        }
    }

    let systematic = OrderedSystematic::from_weights(weights.iter().copied())?;
    let mut spread = vec![0usize; weights.len()];
    for _ in 0..trials {
        for i in systematic.sample(k, &mut rng)? {
            spread[i] += 1;
        }
    }

    println!("k={k}, {trials} trials, tableau of {} samples", jessen.len());
    println!("   i   target   order  jessen  system");
    let mut residual = WelfordVariance::new();
    for (i, &w) in weights.iter().enumerate() {
        let target = k as f64 * w / sum;
        let freq = |c: usize| c as f64 / trials as f64;
        residual.add(freq(tableau[i]) - target);
        println!(
            "  {i:2}   {target:.4}  {:.4}  {:.4}  {:.4}",
            freq(order[i]),
            freq(tableau[i]),
            freq(spread[i])
        );
    }
    if let (Some(mean), Some(se)) = (residual.mean(), residual.sample_standard_error()) {
        println!();
        println!("jessen residual: mean={mean:+.5}, standard error={se:.5}");
    }

    Ok(())
}
