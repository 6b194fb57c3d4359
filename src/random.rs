//! Uniform variates on top of `rand`.
//!
//! All samplers draw through [`UniformSource`], which is implemented for every
//! [`Rng`]. Callers pick the generator: `rand::rng()` (OS-seeded CSPRNG) by
//! default, or any seeded generator for reproducible runs.

use rand::Rng;

/// Uniform draws used by the sampling designs.
pub trait UniformSource {
    /// A uniform variate in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// A uniform variate in `(0, 1)`.
    ///
    /// Zero is redrawn, so the result is safe to pass to `ln` or to divide by.
    fn uniform_exclusive(&mut self) -> f64;

    /// A uniform index in `[0, n)`.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    fn index(&mut self, n: usize) -> usize;
}

impl<R: Rng + ?Sized> UniformSource for R {
    #[inline]
    fn uniform(&mut self) -> f64 {
        self.random::<f64>()
    }

    #[inline]
    fn uniform_exclusive(&mut self) -> f64 {
        loop {
            let u = self.random::<f64>();
            if u > 0.0 {
                return u;
            }
        }
    }

    #[inline]
    fn index(&mut self, n: usize) -> usize {
        self.random_range(0..n)
    }
}
