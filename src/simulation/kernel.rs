//! Scalar stencil kernel for the toroidal wave update.
//!
//! Each cell reads its four wrapped neighbors from `prev`, its own value from
//! two steps ago out of `cur` (captured before the overwrite), and writes its
//! next height into `cur`. A non-zero `input` cell overrides the computed
//! value with the impulse itself.

use super::params::WaveParams;
use rayon::prelude::*;

/// Grid side length at which stepping fans out across rayon workers.
///
/// Below this, sequential processing wins on overhead.
pub(crate) const PARALLEL_THRESHOLD: usize = 512;

/// Advance the whole grid one step with the per-cell scalar kernel.
///
/// Reads `input` and `prev`, overwrites every element of `cur`. Cells carry
/// no cross-cell write dependency, so rows are processed in parallel for
/// large grids; each worker owns a disjoint span of `cur` and the
/// two-steps-ago read stays inside that span.
pub fn step_scalar(input: &[f32], prev: &[f32], cur: &mut [f32], size: usize, params: &WaveParams) {
    debug_assert_eq!(input.len(), size * size);
    debug_assert_eq!(prev.len(), size * size);
    debug_assert_eq!(cur.len(), size * size);

    if size >= PARALLEL_THRESHOLD {
        cur.par_chunks_mut(size)
            .enumerate()
            .for_each(|(y, row)| step_span(input, prev, row, y * size, size, params));
    } else {
        step_span(input, prev, cur, 0, size, params);
    }
}

/// Scalar update for a contiguous span of cells starting at linear index
/// `base`. Shared by the sequential path, the row-parallel path, and the
/// packed kernel's remainder tail.
#[inline(always)]
pub(crate) fn step_span(
    input: &[f32],
    prev: &[f32],
    span: &mut [f32],
    base: usize,
    size: usize,
    params: &WaveParams,
) {
    let c = params.diffusion;
    let damping = params.damping;

    for (offset, out) in span.iter_mut().enumerate() {
        let i = base + offset;

        if input[i] != 0.0 {
            *out = input[i];
            continue;
        }

        // Two-steps-ago value: this slot held it until now.
        let prevprev = *out;
        let center = prev[i];

        // Toroidal wrap by row/column decomposition, never signed modulo.
        let x = i % size;
        let left = if x == 0 { i + (size - 1) } else { i - 1 };
        let right = if x == size - 1 { i - (size - 1) } else { i + 1 };

        let y = i / size;
        let up = if y == 0 { i + (size - 1) * size } else { i - size };
        let down = if y == size - 1 {
            i - (size - 1) * size
        } else {
            i + size
        };

        let neighbors = prev[left] + prev[right] + prev[up] + prev[down];
        let next = c * (neighbors - 4.0 * center) - prevprev + 2.0 * center;
        *out = next * damping;
    }
}
