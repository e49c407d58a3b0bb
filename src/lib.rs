// Enable portable_simd for the packed kernel
#![cfg_attr(feature = "simd", feature(portable_simd))]

//! # Wavefield
//!
//! Real-time 2D wave propagation over a toroidal (wrap-around) grid.
//!
//! The simulator advances a height field with an explicit second-order
//! finite-difference stencil, double-buffered across steps. Sparse random
//! impulses disturb the surface and an exponential decay keeps it bounded.
//! The height buffer is consumed by an external renderer to deform a mesh;
//! this crate owns only the numerical core.
//!
//! ## Features
//!
//! - Scalar and 4-lane packed stencil kernels (the packed kernel lives
//!   behind the `simd` cargo feature and needs nightly Rust)
//! - Exact toroidal neighbor wrap for any grid size, no signed modulo
//! - Seeded, reproducible impulse injection
//! - Rayon-parallel stepping for large grids
//!
//! ## Run
//!
//! ```bash
//! cargo run --bin benchmark --release
//! ```

pub mod error;
pub mod simulation;

pub use error::{Result, WaveError};
pub use simulation::{KernelKind, SimConfig, Simulation, WaveParams};
