//! Seeded random source shared by every generation stage.
//!
//! One instance is created per run and passed by `&mut` to each stage, so the
//! whole dataset is a pure function of the seed and the generation settings.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform integer in `[min, max]`.
    pub fn int_between(&mut self, min: i64, max: i64) -> i64 {
        self.rng.random_range(min..=max)
    }

    /// Uniform real in `[min, max]`.
    pub fn real_between(&mut self, min: f64, max: f64) -> f64 {
        self.rng.random_range(min..=max)
    }

    /// Uniform real in `[min, max]` rounded to `decimals` places.
    ///
    /// The result is clamped to the grid points inside the range. When the
    /// range holds no grid point it is clamped to the bounds themselves.
    pub fn rounded_real_between(&mut self, min: f64, max: f64, decimals: i32) -> f64 {
        let factor = 10f64.powi(decimals);
        let rounded = (self.real_between(min, max) * factor).round() / factor;
        // tolerance keeps bounds already on the grid from moving a step
        let grid_min = (min * factor - 1e-9).ceil() / factor;
        let grid_max = (max * factor + 1e-9).floor() / factor;
        if grid_min <= grid_max {
            rounded.clamp(grid_min, grid_max)
        } else {
            rounded.clamp(min, max)
        }
    }

    /// Bernoulli trial, true with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.random::<f64>() < p
    }

    /// Uniform index in `[0, len)`. `len` must be positive.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.index(items.len());
        items.get(index)
    }

    /// Weighted categorical choice over `weights`, returning the chosen index.
    ///
    /// Walks the cumulative weights until the running sum exceeds a uniform draw
    /// in `[0, total)`. Returns `None` when no weight is positive.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }
        let target = self.rng.random::<f64>() * total;
        let mut cumulative = 0.0;
        let mut last_positive = None;
        for (index, weight) in weights.iter().enumerate() {
            if *weight <= 0.0 {
                continue;
            }
            cumulative += weight;
            last_positive = Some(index);
            if target < cumulative {
                return Some(index);
            }
        }
        // rounding can leave target == total
        last_positive
    }

    /// Picks `amount` distinct elements, in draw order.
    pub fn sample_without_replacement<'a, T>(&mut self, items: &'a [T], amount: usize) -> Vec<&'a T> {
        let amount = amount.min(items.len());
        rand::seq::index::sample(&mut self.rng, items.len(), amount)
            .into_iter()
            .map(|index| &items[index])
            .collect()
    }
}
