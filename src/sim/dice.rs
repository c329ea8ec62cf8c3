//! Random draws for world generation
//!
//! Generation code only sees the `Dice` trait, so tests can script exact
//! outcomes while runs use a seeded PCG stream.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform draws
pub trait Dice {
    /// Uniform value in [0, 1)
    fn unit(&mut self) -> f32;

    /// Uniform integer in [0, n); `n` is never zero
    fn below(&mut self, n: u32) -> u32;

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }

    /// Fair coin
    fn coin(&mut self) -> bool {
        self.unit() > 0.5
    }

    /// Uniform integer in [lo, hi]
    fn between(&mut self, lo: u32, hi: u32) -> u32 {
        lo + self.below(hi - lo + 1)
    }

    /// Uniform value in [lo, hi)
    fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.unit()
    }
}

/// PCG-backed dice (reproducible for a given seed)
#[derive(Debug, Clone)]
pub struct SeededDice {
    seed: u64,
    rng: Pcg32,
}

impl SeededDice {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed from the thread RNG (production runs)
    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Dice for SeededDice {
    fn unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    fn below(&mut self, n: u32) -> u32 {
        self.rng.random_range(0..n.max(1))
    }
}
