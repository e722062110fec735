// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Signed distance fields.
//!
//! A [`DistanceField`] holds, per cell, the distance in pixels to the nearest
//! cell on the other side of the outline: negative inside, positive outside.
//! Cells adjacent to the boundary sit within one pixel of zero.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::edt::{self, EdtScratch, INF};
use crate::outline::Canvas;
use crate::raster::OccupancyGrid;

/// A `width × height` row-major grid of signed distances.
#[derive(Clone, PartialEq)]
pub struct DistanceField {
    canvas: Canvas,
    values: Vec<f32>,
}

impl DistanceField {
    /// The field's dimensions.
    #[inline]
    #[must_use]
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Signed distance at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        assert!(
            x < self.canvas.width && y < self.canvas.height,
            "cell ({x}, {y}) out of bounds"
        );
        self.values[y as usize * self.canvas.width as usize + x as usize]
    }

    /// All values in row-major order.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

impl core::fmt::Debug for DistanceField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DistanceField")
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}

/// Builds the signed distance field of `occupancy`.
///
/// Each cell is `sqrt(outside_dist) - sqrt(inside_dist)`, where
/// `outside_dist` is the squared distance to the nearest inside cell and
/// `inside_dist` the squared distance to the nearest outside cell. If a grid
/// has no cells of one kind, that distance is clamped to the grid diagonal.
#[must_use]
pub fn build_sdf(occupancy: &OccupancyGrid) -> DistanceField {
    build_sdf_with(occupancy, &mut EdtScratch::new())
}

/// [`build_sdf`] with caller-provided scratch.
#[must_use]
pub fn build_sdf_with(occupancy: &OccupancyGrid, scratch: &mut EdtScratch) -> DistanceField {
    let canvas = occupancy.canvas();
    let (w, h) = (canvas.width as usize, canvas.height as usize);
    let cells = occupancy.cells();

    let mut outside_dist = edt::seeded(cells, true);
    edt::edt2d_with(&mut outside_dist, w, h, scratch);
    let mut inside_dist = edt::seeded(cells, false);
    edt::edt2d_with(&mut inside_dist, w, h, scratch);

    let diagonal_sq = (w * w + h * h) as f32;
    let clamp = |d: f32| if d >= INF / 2.0 { diagonal_sq } else { d };

    let values = outside_dist
        .iter()
        .zip(&inside_dist)
        .map(|(&o, &i)| clamp(o).sqrt() - clamp(i).sqrt())
        .collect();
    DistanceField { canvas, values }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    /// Deterministic linear congruential generator.
    struct Lcg(u64);

    impl Lcg {
        fn next_bool(&mut self, one_in: u64) -> bool {
            self.0 = self
                .0
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (self.0 >> 33) % one_in == 0
        }
    }

    fn random_grid(seed: u64, canvas: Canvas) -> OccupancyGrid {
        let mut rng = Lcg(seed);
        OccupancyGrid::from_fn(canvas, |_, _| rng.next_bool(3))
    }

    fn brute_force(grid: &OccupancyGrid) -> Vec<f32> {
        let canvas = grid.canvas();
        let diag = (canvas.width * canvas.width + canvas.height * canvas.height) as f32;
        let nearest = |x: u32, y: u32, want: bool| {
            let mut best = f32::INFINITY;
            for sy in 0..canvas.height {
                for sx in 0..canvas.width {
                    if grid.get(sx, sy) == want {
                        let (dx, dy) = (x.abs_diff(sx), y.abs_diff(sy));
                        best = best.min((dx * dx + dy * dy) as f32);
                    }
                }
            }
            if best.is_finite() { best } else { diag }
        };
        let mut out = vec![];
        for y in 0..canvas.height {
            for x in 0..canvas.width {
                out.push(nearest(x, y, true).sqrt() - nearest(x, y, false).sqrt());
            }
        }
        out
    }

    #[test]
    fn matches_brute_force_on_random_grids() {
        let canvas = Canvas::new(16, 16);
        for seed in [1, 7, 42, 1234, 98_765] {
            let grid = random_grid(seed, canvas);
            let field = build_sdf(&grid);
            let reference = brute_force(&grid);
            for (i, (&got, &want)) in field.values().iter().zip(&reference).enumerate() {
                assert!(
                    (got - want).abs() < 1e-4,
                    "seed {seed} cell {i}: got {got}, want {want}"
                );
            }
        }
    }

    #[test]
    fn sign_follows_occupancy() {
        let canvas = Canvas::new(12, 9);
        let grid = OccupancyGrid::from_fn(canvas, |x, y| (3..9).contains(&x) && (2..7).contains(&y));
        let field = build_sdf(&grid);
        for y in 0..canvas.height {
            for x in 0..canvas.width {
                let v = field.get(x, y);
                if grid.get(x, y) {
                    assert!(v < 0.0, "inside cell ({x}, {y}) is {v}");
                } else {
                    assert!(v > 0.0, "outside cell ({x}, {y}) is {v}");
                }
            }
        }
    }

    #[test]
    fn boundary_cells_are_within_one_pixel() {
        let canvas = Canvas::new(16, 16);
        let grid = random_grid(5, canvas);
        let field = build_sdf(&grid);
        for y in 0..canvas.height {
            for x in 0..canvas.width {
                let here = grid.get(x, y);
                let neighbors = [
                    (x.wrapping_sub(1), y),
                    (x + 1, y),
                    (x, y.wrapping_sub(1)),
                    (x, y + 1),
                ];
                let mixed = neighbors
                    .iter()
                    .filter(|&&(nx, ny)| nx < canvas.width && ny < canvas.height)
                    .any(|&(nx, ny)| grid.get(nx, ny) != here);
                if mixed {
                    let v = field.get(x, y);
                    assert!(v.abs() <= 1.0, "boundary cell ({x}, {y}) is {v}");
                }
            }
        }
    }

    #[test]
    fn magnitude_grows_away_from_boundary() {
        let canvas = Canvas::new(20, 1);
        let grid = OccupancyGrid::from_fn(canvas, |x, _| x < 10);
        let field = build_sdf(&grid);
        let values = field.values();
        for pair in values[10..].windows(2) {
            assert!(pair[1] >= pair[0], "outside distance grows: {pair:?}");
        }
        for pair in values[..10].windows(2) {
            assert!(pair[1] >= pair[0], "inside distance shrinks toward the edge: {pair:?}");
        }
    }

    #[test]
    fn uniform_grids_stay_finite() {
        let canvas = Canvas::new(6, 8);
        let diagonal = 10.0;

        let full = build_sdf(&OccupancyGrid::from_fn(canvas, |_, _| true));
        assert!(
            full.values().iter().all(|&v| v == -diagonal),
            "full grid is the negated diagonal everywhere"
        );

        let empty = build_sdf(&OccupancyGrid::empty(canvas));
        assert!(
            empty.values().iter().all(|&v| v == diagonal),
            "empty grid is the diagonal everywhere"
        );
    }
}
