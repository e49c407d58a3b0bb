//! Randomized impulse injection policy.
//!
//! Once per step the injector draws from a seeded RNG and, with fixed
//! probability, writes a unit impulse into one random cell of the input
//! buffer. The RNG state is per-simulation and single-writer, so a fixed
//! seed reproduces the same injection sequence for any kernel choice.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Range of the per-step integer draw.
const DRAW_RANGE: u32 = 1000;

/// Draws below this threshold trigger an injection (100/1000 = 10% of steps).
pub const DEFAULT_INJECT_THRESHOLD: u32 = 100;

/// Height written at the chosen cell.
pub const IMPULSE_AMPLITUDE: f32 = 1.0;

/// Seeded random impulse source.
#[derive(Debug)]
pub struct ImpulseInjector {
    rng: SmallRng,
    threshold: u32,
}

impl ImpulseInjector {
    /// Injector with the default 10% per-step probability.
    pub fn new(seed: u64) -> Self {
        Self::with_threshold(seed, DEFAULT_INJECT_THRESHOLD)
    }

    /// Injector with a custom threshold out of 1000. A threshold of 0
    /// disables injection without changing the draw sequence.
    pub fn with_threshold(seed: u64, threshold: u32) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            threshold: threshold.min(DRAW_RANGE),
        }
    }

    /// Decide whether to disturb the surface this step.
    ///
    /// Draws one integer in [0, 1000); below the threshold, draws a random
    /// cell and writes a unit impulse into `input`, reporting the chosen
    /// coordinates. At most one cell is written per call; on a failed draw
    /// `input` is left untouched. The integer draw happens on every call so
    /// the RNG advances identically whether or not an impulse lands.
    pub fn maybe_inject(&mut self, input: &mut [f32], size: u32) -> Option<(u32, u32)> {
        if self.rng.gen_range(0..DRAW_RANGE) >= self.threshold {
            return None;
        }

        let fx: f32 = self.rng.gen();
        let fy: f32 = self.rng.gen();
        // f*size can round up to exactly size when f is the largest float
        // below 1.0 and size is a power of two; clamp keeps the cell in range.
        let x = ((fx * size as f32) as u32).min(size - 1);
        let y = ((fy * size as f32) as u32).min(size - 1);

        input[(y * size + x) as usize] = IMPULSE_AMPLITUDE;
        Some((x, y))
    }
}
