//! Simulation core for 2D wave propagation on a toroidal grid.

mod grid;
mod impulse;
mod kernel;
mod params;
mod stepper;

#[cfg(feature = "simd")]
mod simd;

pub use grid::{WaveGrid, MIN_GRID_SIZE};
pub use impulse::{ImpulseInjector, DEFAULT_INJECT_THRESHOLD, IMPULSE_AMPLITUDE};
pub use kernel::step_scalar;
pub use params::{WaveParams, DAMPING, PACKED_DIFFUSION, SCALAR_DIFFUSION};
pub use stepper::{KernelKind, SimConfig, Simulation};

#[cfg(feature = "simd")]
pub use simd::step_packed;
