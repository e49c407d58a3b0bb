//! Packed 4-lane stencil kernel.
//!
//! The scalar update applied to four consecutive linear indices at a time:
//! per-lane toroidal wrap via compare + select, neighbor gathers as four
//! independent scalar loads per direction, and a lane-predicated impulse
//! override so one lane's impulse never blocks the others. Requires nightly
//! `portable_simd`, enabled through the crate's `simd` feature.

use std::simd::cmp::SimdPartialEq;
use std::simd::{f32x4, usizex4};

use super::kernel::{step_span, PARALLEL_THRESHOLD};
use super::params::WaveParams;
use rayon::prelude::*;

const LANES: usize = 4;

/// Advance the whole grid one step with the packed kernel.
///
/// Functionally equivalent to [`super::step_scalar`] under the same
/// [`WaveParams`]; the batching never changes the per-cell arithmetic. A
/// remainder of `size*size % 4` cells is finished with the scalar update.
pub fn step_packed(input: &[f32], prev: &[f32], cur: &mut [f32], size: usize, params: &WaveParams) {
    debug_assert_eq!(input.len(), size * size);
    debug_assert_eq!(prev.len(), size * size);
    debug_assert_eq!(cur.len(), size * size);

    if size >= PARALLEL_THRESHOLD {
        // Spans of four rows are always a multiple of the lane width, so
        // batch boundaries match the sequential formulation exactly.
        let span_len = LANES * size;
        cur.par_chunks_mut(span_len)
            .enumerate()
            .for_each(|(i, span)| step_span_packed(input, prev, span, i * span_len, size, params));
    } else {
        step_span_packed(input, prev, cur, 0, size, params);
    }
}

/// Packed update for a contiguous span starting at linear index `base`.
/// `base` must be lane-aligned.
fn step_span_packed(
    input: &[f32],
    prev: &[f32],
    span: &mut [f32],
    base: usize,
    size: usize,
    params: &WaveParams,
) {
    debug_assert_eq!(base % LANES, 0);

    let c = f32x4::splat(params.diffusion);
    let damping = f32x4::splat(params.damping);
    let four = f32x4::splat(4.0);
    let two = f32x4::splat(2.0);
    let zero = f32x4::splat(0.0);

    let n = usizex4::splat(size);
    let n_minus_1 = usizex4::splat(size - 1);
    let col_wrap = usizex4::splat(size - 1);
    let row_wrap = usizex4::splat((size - 1) * size);
    let one = usizex4::splat(1);
    let zero_idx = usizex4::splat(0);

    let batches = span.len() / LANES;
    for b in 0..batches {
        let off = b * LANES;
        let i0 = base + off;
        let iv = usizex4::from_array([i0, i0 + 1, i0 + 2, i0 + 3]);

        // Two-steps-ago values: captured before this batch is overwritten.
        let prevprev = f32x4::from_slice(&span[off..off + LANES]);
        let center = f32x4::from_slice(&prev[i0..i0 + LANES]);

        // Per-lane row/column decomposition; each lane wraps independently.
        let x = iv % n;
        let y = iv / n;

        let left = x.simd_eq(zero_idx).select(iv + col_wrap, iv - one);
        let right = x.simd_eq(n_minus_1).select(iv - col_wrap, iv + one);
        let up = y.simd_eq(zero_idx).select(iv + row_wrap, iv - n);
        let down = y.simd_eq(n_minus_1).select(iv - row_wrap, iv + n);

        let left_v = gather(prev, left);
        let right_v = gather(prev, right);
        let up_v = gather(prev, up);
        let down_v = gather(prev, down);

        let neighbors = left_v + right_v + up_v + down_v;
        let wave = (neighbors - center * four) * c - prevprev + two * center;
        let damped = wave * damping;

        // Lane-predicated impulse override.
        let impulse = f32x4::from_slice(&input[i0..i0 + LANES]);
        let out = impulse.simd_ne(zero).select(impulse, damped);
        out.copy_to_slice(&mut span[off..off + LANES]);
    }

    // Cell count not divisible by the lane width: finish with the scalar
    // update under the same coefficients.
    let tail = batches * LANES;
    if tail < span.len() {
        step_span(input, prev, &mut span[tail..], base + tail, size, params);
    }
}

/// Four independent scalar loads; neighbor indices are not contiguous.
#[inline(always)]
fn gather(buf: &[f32], idx: usizex4) -> f32x4 {
    let idx = idx.to_array();
    f32x4::from_array([buf[idx[0]], buf[idx[1]], buf[idx[2]], buf[idx[3]]])
}
