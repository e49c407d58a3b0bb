//! Simulation orchestration: per-step clear, inject, kernel dispatch, swap.

use crate::error::{Result, WaveError};

use super::grid::WaveGrid;
use super::impulse::{ImpulseInjector, DEFAULT_INJECT_THRESHOLD};
use super::kernel;
use super::params::WaveParams;

/// Which stencil kernel drives the update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernelKind {
    /// Per-cell scalar kernel.
    #[default]
    Scalar,
    /// 4-lane packed kernel (nightly `portable_simd`).
    #[cfg(feature = "simd")]
    Packed,
}

impl std::fmt::Display for KernelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelKind::Scalar => write!(f, "scalar"),
            #[cfg(feature = "simd")]
            KernelKind::Packed => write!(f, "packed"),
        }
    }
}

/// Configuration for a [`Simulation`].
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Grid side length; the grid holds `size * size` cells.
    pub size: u32,
    /// Seed for the impulse RNG.
    pub seed: u64,
    /// Stencil kernel choice.
    pub kernel: KernelKind,
    /// Injection threshold out of 1000 (100 = 10% of steps; 0 disables).
    pub inject_threshold: u32,
    /// Stencil coefficients; `None` picks the kernel's reference values.
    pub params: Option<WaveParams>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            size: 1024,
            seed: 12345,
            kernel: KernelKind::default(),
            inject_threshold: DEFAULT_INJECT_THRESHOLD,
            params: None,
        }
    }
}

impl SimConfig {
    /// Config with the given grid side length and defaults for the rest.
    pub fn new(size: u32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Select the stencil kernel.
    pub fn with_kernel(mut self, kernel: KernelKind) -> Self {
        self.kernel = kernel;
        self
    }

    /// Set the injection threshold out of 1000.
    pub fn with_inject_threshold(mut self, threshold: u32) -> Self {
        self.inject_threshold = threshold;
        self
    }

    /// Override the stencil coefficients.
    pub fn with_params(mut self, params: WaveParams) -> Self {
        self.params = Some(params);
        self
    }
}

/// A running wave simulation.
///
/// One logical owner drives the simulation; a step runs to completion before
/// the next can begin (enforced by `&mut self`). The height field returned by
/// [`Simulation::tick`] is valid until the next mutating call.
#[derive(Debug)]
pub struct Simulation {
    grid: Option<WaveGrid>,
    injector: ImpulseInjector,
    kernel: KernelKind,
    params: WaveParams,
    /// Manual impulses queued for the next step.
    pending: Vec<(u32, u32, f32)>,
    size: u32,
    steps: u64,
}

impl Simulation {
    /// Allocate and initialize a simulation.
    ///
    /// Fails with [`WaveError::InvalidConfig`] for grids smaller than 2x2 and
    /// [`WaveError::AllocationFailure`] if the buffers cannot be allocated.
    pub fn new(config: SimConfig) -> Result<Self> {
        let grid = WaveGrid::new(config.size)?;
        let params = config
            .params
            .unwrap_or_else(|| WaveParams::for_kernel(config.kernel));

        if !params.is_stable() {
            tracing::warn!(
                diffusion = params.diffusion,
                "diffusion coefficient outside the stable range"
            );
        }
        tracing::info!(
            size = config.size,
            seed = config.seed,
            kernel = %config.kernel,
            "created wave simulation"
        );

        Ok(Self {
            grid: Some(grid),
            injector: ImpulseInjector::with_threshold(config.seed, config.inject_threshold),
            kernel: config.kernel,
            params,
            pending: Vec::new(),
            size: config.size,
            steps: 0,
        })
    }

    /// Advance the simulation one step and expose the new height field.
    ///
    /// Clears the input buffer, lets the injector write at most one random
    /// impulse, applies queued manual impulses, runs the stencil kernel, and
    /// swaps the buffer roles. The returned view holds `size * size` floats,
    /// row-major.
    pub fn tick(&mut self) -> Result<&[f32]> {
        let grid = self.grid.as_mut().ok_or(WaveError::UseAfterFree)?;
        let size = grid.size();

        grid.clear_input();
        if let Some((x, y)) = self.injector.maybe_inject(grid.input_mut(), size) {
            tracing::trace!(x, y, step = self.steps, "impulse injected");
        }
        for (x, y, amplitude) in self.pending.drain(..) {
            grid.input_mut()[(y * size + x) as usize] = amplitude;
        }

        let (input, prev, cur) = grid.frames();
        match self.kernel {
            KernelKind::Scalar => kernel::step_scalar(input, prev, cur, size as usize, &self.params),
            #[cfg(feature = "simd")]
            KernelKind::Packed => {
                super::simd::step_packed(input, prev, cur, size as usize, &self.params)
            }
        }

        grid.swap();
        self.steps += 1;
        Ok(grid.heights())
    }

    /// Queue a manual impulse for the next step.
    ///
    /// The impulse lands in the input buffer after the per-step clear, so it
    /// overrides the stencil at that cell exactly like a random one.
    /// Out-of-range coordinates are ignored.
    pub fn inject(&mut self, x: u32, y: u32, amplitude: f32) -> Result<()> {
        let grid = self.grid.as_ref().ok_or(WaveError::UseAfterFree)?;
        if x < grid.size() && y < grid.size() {
            self.pending.push((x, y, amplitude));
        }
        Ok(())
    }

    /// The height field produced by the most recent step.
    pub fn heights(&self) -> Result<&[f32]> {
        Ok(self.grid.as_ref().ok_or(WaveError::UseAfterFree)?.heights())
    }

    /// Sum of squared cell heights.
    pub fn total_energy(&self) -> Result<f32> {
        Ok(self
            .grid
            .as_ref()
            .ok_or(WaveError::UseAfterFree)?
            .total_energy())
    }

    /// Largest absolute cell height.
    pub fn max_amplitude(&self) -> Result<f32> {
        Ok(self
            .grid
            .as_ref()
            .ok_or(WaveError::UseAfterFree)?
            .max_amplitude())
    }

    /// Grid side length.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of completed steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Whether [`Simulation::destroy`] has been called.
    pub fn is_destroyed(&self) -> bool {
        self.grid.is_none()
    }

    /// Release the grid buffers.
    ///
    /// Every later operation, including a second `destroy`, fails with
    /// [`WaveError::UseAfterFree`]. Dropping an undestroyed simulation still
    /// releases the buffers.
    pub fn destroy(&mut self) -> Result<()> {
        match self.grid.take() {
            Some(_) => {
                tracing::info!(size = self.size, steps = self.steps, "destroyed wave simulation");
                Ok(())
            }
            None => Err(WaveError::UseAfterFree),
        }
    }
}
