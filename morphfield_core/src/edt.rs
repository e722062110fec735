// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exact squared Euclidean distance transform.
//!
//! Felzenszwalb and Huttenlocher's lower envelope of parabolas: every cell
//! `q` contributes a parabola `(x - q)² + f[q]` and the transform of a line is
//! the lower envelope of all of them. The envelope is built in one
//! left-to-right pass over a stack of vertices with their domain boundaries
//! and read back in a second pass. A 2D transform is a 1D pass over every row
//! followed by one over every column.
//!
//! Seeds hold `0` and background cells hold [`INF`]. A line without any
//! seed comes back as values at or above `INF`.

use alloc::vec;
use alloc::vec::Vec;

/// Background sentinel for cells that are not seeds.
pub const INF: f32 = 1e20;

/// Reusable buffers for [`edt1d_with`] and [`edt2d_with`].
///
/// Holding one across calls avoids allocating per line.
#[derive(Clone, Debug, Default)]
pub struct EdtScratch {
    /// Copy of the input line.
    f: Vec<f32>,
    /// Indices of parabola vertices in the lower envelope.
    v: Vec<usize>,
    /// Domain boundaries; parabola `v[k]` is lowest on `[z[k], z[k + 1]]`.
    z: Vec<f64>,
    /// Gathered column for the second 2D pass.
    column: Vec<f32>,
}

impl EdtScratch {
    /// Creates empty scratch space.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn prepare(&mut self, line: &[f32]) {
        let n = line.len();
        self.f.clear();
        self.f.extend_from_slice(line);
        self.v.resize(n, 0);
        self.z.resize(n + 1, 0.0);
    }
}

/// Transforms `line` in place. Allocates its own scratch.
pub fn edt1d(line: &mut [f32]) {
    edt1d_with(line, &mut EdtScratch::new());
}

/// Transforms `line` in place using `scratch`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "squared distances within a line fit f32; sentinel sums stay near INF"
)]
pub fn edt1d_with(line: &mut [f32], scratch: &mut EdtScratch) {
    if line.is_empty() {
        return;
    }
    scratch.prepare(line);
    let EdtScratch { f, v, z, .. } = scratch;

    let mut k = 0;
    v[0] = 0;
    z[0] = f64::NEG_INFINITY;
    z[1] = f64::INFINITY;

    for q in 1..line.len() {
        let mut s = intersection(f, v[k], q);
        while k > 0 && s <= z[k] {
            k -= 1;
            s = intersection(f, v[k], q);
        }
        k += 1;
        v[k] = q;
        z[k] = s;
        z[k + 1] = f64::INFINITY;
    }

    k = 0;
    for (q, out) in line.iter_mut().enumerate() {
        let x = q as f64;
        while z[k + 1] < x {
            k += 1;
        }
        let r = v[k];
        let d = x - r as f64;
        *out = (d * d + f64::from(f[r])) as f32;
    }
}

/// Horizontal position where the parabolas rooted at `r` and `q` cross.
///
/// The value difference is taken before adding the index term so two
/// sentinel cells cancel exactly instead of absorbing `q² - r²`.
#[inline]
fn intersection(f: &[f32], r: usize, q: usize) -> f64 {
    let (rf, qf) = (r as f64, q as f64);
    let value_diff = f64::from(f[q]) - f64::from(f[r]);
    (value_diff + (qf * qf - rf * rf)) / (2.0 * (qf - rf))
}

/// Transforms a row-major `width × height` grid in place.
///
/// # Panics
///
/// Panics if `grid.len() != width * height`.
pub fn edt2d(grid: &mut [f32], width: usize, height: usize) {
    edt2d_with(grid, width, height, &mut EdtScratch::new());
}

/// [`edt2d`] with caller-provided scratch.
///
/// # Panics
///
/// Panics if `grid.len() != width * height`.
pub fn edt2d_with(grid: &mut [f32], width: usize, height: usize, scratch: &mut EdtScratch) {
    assert_eq!(grid.len(), width * height, "grid does not match {width}x{height}");
    if width == 0 || height == 0 {
        return;
    }

    for row in grid.chunks_exact_mut(width) {
        edt1d_with(row, scratch);
    }

    let mut column = core::mem::take(&mut scratch.column);
    column.resize(height, 0.0);
    for x in 0..width {
        for (y, cell) in column.iter_mut().enumerate() {
            *cell = grid[y * width + x];
        }
        edt1d_with(&mut column, scratch);
        for (y, cell) in column.iter().enumerate() {
            grid[y * width + x] = *cell;
        }
    }
    scratch.column = column;
}

/// Seeds a transform input from a predicate: `0` where `seed` holds,
/// [`INF`] elsewhere.
#[must_use]
pub fn seeded(cells: &[bool], seed: bool) -> Vec<f32> {
    let mut out = vec![INF; cells.len()];
    for (o, &c) in out.iter_mut().zip(cells) {
        if c == seed {
            *o = 0.0;
        }
    }
    out
}
