//! Grid state for the wave simulation.
//!
//! Three equal-length flat buffers over an N x N toroidal grid: an impulse
//! input buffer and a ping-pong pair whose prev/cur roles swap every step.
//! Buffers are row-major (`index = y*N + x`) and allocated once for the
//! lifetime of the grid.

use crate::error::{Result, WaveError};

/// Minimum grid side length.
///
/// The 4-neighbor stencil needs at least two cells per axis for the wrapped
/// neighbors to be distinct from the cell itself.
pub const MIN_GRID_SIZE: u32 = 2;

/// Owned buffer state for one simulation instance.
///
/// Exclusive access is enforced through `&mut self`; no two operations can
/// run concurrently against the same grid.
#[derive(Debug)]
pub struct WaveGrid {
    size: u32,
    input: Vec<f32>,
    buffer_a: Vec<f32>,
    buffer_b: Vec<f32>,
    /// Selects which ping-pong buffer currently holds the `prev` role.
    active: u8,
}

impl WaveGrid {
    /// Allocate a zeroed grid of `size * size` cells.
    pub fn new(size: u32) -> Result<Self> {
        if size < MIN_GRID_SIZE {
            return Err(WaveError::invalid_config(format!(
                "grid size must be at least {MIN_GRID_SIZE}, got {size}"
            )));
        }
        let cells = size as usize * size as usize;
        Ok(Self {
            size,
            input: try_zeroed(cells)?,
            buffer_a: try_zeroed(cells)?,
            buffer_b: try_zeroed(cells)?,
            active: 0,
        })
    }

    /// Grid side length.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.input.len()
    }

    /// Zero the impulse input buffer.
    pub fn clear_input(&mut self) {
        self.input.fill(0.0);
    }

    /// Mutable access to the impulse input buffer.
    pub fn input_mut(&mut self) -> &mut [f32] {
        &mut self.input
    }

    /// Resolve the buffer roles for the current step without copying.
    ///
    /// Returns `(input, prev, cur)`: `prev` holds the previous step's output,
    /// `cur` is about to be overwritten with this step's output. `cur` also
    /// still holds the output from two steps ago until it is rewritten.
    pub fn frames(&mut self) -> (&[f32], &[f32], &mut [f32]) {
        if self.active == 0 {
            (&self.input, &self.buffer_a, &mut self.buffer_b)
        } else {
            (&self.input, &self.buffer_b, &mut self.buffer_a)
        }
    }

    /// Exchange the prev/cur roles for the next step.
    ///
    /// Toggled unconditionally once per step.
    pub fn swap(&mut self) {
        self.active = 1 - self.active;
    }

    /// The height field produced by the most recent step.
    ///
    /// After `swap()` the freshly written buffer sits in the `prev` role, so
    /// this is the externally visible state. All zeros before the first step.
    pub fn heights(&self) -> &[f32] {
        if self.active == 0 {
            &self.buffer_a
        } else {
            &self.buffer_b
        }
    }

    /// Sum of squared cell heights.
    pub fn total_energy(&self) -> f32 {
        self.heights().iter().map(|h| h * h).sum()
    }

    /// Largest absolute cell height.
    pub fn max_amplitude(&self) -> f32 {
        self.heights().iter().map(|h| h.abs()).fold(0.0, f32::max)
    }
}

/// Allocate a zeroed buffer, surfacing allocation failure instead of aborting.
fn try_zeroed(len: usize) -> Result<Vec<f32>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|e| WaveError::AllocationFailure(e.to_string()))?;
    buf.resize(len, 0.0);
    Ok(buf)
}
