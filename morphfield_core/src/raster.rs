// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outline rasterization into binary occupancy.
//!
//! The outline is mapped into pixel space by its [`FitTransform`], flattened
//! into line edges, and scanned with [`SUBSAMPLES`] sub-scanlines per pixel
//! row. Each sub-scanline contributes the exact horizontal overlap of its
//! filled spans, so a pixel's coverage is an area estimate in `[0, 1]`. A
//! pixel is inside when its coverage exceeds [`COVERAGE_THRESHOLD`].

use alloc::vec;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{PathEl, Point};

use crate::error::MorphError;
use crate::outline::{Canvas, FitTransform, Outline};

/// Sub-scanlines sampled per pixel row.
pub const SUBSAMPLES: u32 = 4;

/// Coverage a pixel must exceed to count as inside.
pub const COVERAGE_THRESHOLD: f32 = 0.5;

/// Maximum distance, in pixels, between a curve and its flattened polyline.
const FLATTEN_TOLERANCE: f64 = 0.05;

/// Rule deciding which winding numbers are inside.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillRule {
    /// Inside where the winding number is non-zero (the SVG default).
    #[default]
    NonZero,
    /// Inside where the winding number is odd.
    EvenOdd,
}

impl FillRule {
    #[inline]
    const fn is_inside(self, winding: i32) -> bool {
        match self {
            Self::NonZero => winding != 0,
            Self::EvenOdd => winding % 2 != 0,
        }
    }
}

/// A `width × height` row-major grid of inside/outside cells.
#[derive(Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    canvas: Canvas,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Creates a grid with every cell outside.
    #[must_use]
    pub fn empty(canvas: Canvas) -> Self {
        Self {
            canvas,
            cells: vec![false; canvas.len()],
        }
    }

    /// Creates a grid by evaluating `inside(x, y)` for every cell.
    #[must_use]
    pub fn from_fn(canvas: Canvas, mut inside: impl FnMut(u32, u32) -> bool) -> Self {
        let mut cells = Vec::with_capacity(canvas.len());
        for y in 0..canvas.height {
            for x in 0..canvas.width {
                cells.push(inside(x, y));
            }
        }
        Self { canvas, cells }
    }

    /// The grid's dimensions.
    #[inline]
    #[must_use]
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Returns whether the cell at `(x, y)` is inside.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> bool {
        assert!(
            x < self.canvas.width && y < self.canvas.height,
            "cell ({x}, {y}) out of bounds"
        );
        self.cells[y as usize * self.canvas.width as usize + x as usize]
    }

    /// The cells in row-major order.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Number of inside cells.
    #[must_use]
    pub fn inside_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

impl core::fmt::Debug for OccupancyGrid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OccupancyGrid")
            .field("canvas", &self.canvas)
            .field("inside", &self.inside_count())
            .finish_non_exhaustive()
    }
}

/// Fills `outline` with the non-zero rule.
///
/// # Errors
///
/// Returns [`MorphError::EmptyCanvas`] for a zero-sized canvas.
pub fn rasterize(
    outline: &Outline,
    transform: FitTransform,
    canvas: Canvas,
) -> Result<OccupancyGrid, MorphError> {
    rasterize_with_rule(outline, transform, canvas, FillRule::NonZero)
}

/// Fills `outline` with an explicit [`FillRule`].
///
/// # Errors
///
/// Returns [`MorphError::EmptyCanvas`] for a zero-sized canvas and
/// [`MorphError::DegenerateBoundingBox`] if `transform` has a non-positive or
/// non-finite scale or a non-finite offset.
pub fn rasterize_with_rule(
    outline: &Outline,
    transform: FitTransform,
    canvas: Canvas,
    rule: FillRule,
) -> Result<OccupancyGrid, MorphError> {
    let canvas = canvas.require_non_empty()?;
    if !(transform.scale.is_finite()
        && transform.scale > 0.0
        && transform.offset_x.is_finite()
        && transform.offset_y.is_finite())
    {
        let view_box = outline.view_box();
        return Err(MorphError::DegenerateBoundingBox {
            width: view_box.width(),
            height: view_box.height(),
        });
    }
    let edges = collect_edges(outline, transform);

    let width = canvas.width as usize;
    let weight = 1.0 / SUBSAMPLES as f32;
    let mut cells = Vec::with_capacity(canvas.len());
    let mut coverage = vec![0.0_f32; width];
    let mut crossings: Vec<(f64, i32)> = Vec::new();

    for row in 0..canvas.height {
        coverage.fill(0.0);
        for sub in 0..SUBSAMPLES {
            let y = f64::from(row) + (f64::from(sub) + 0.5) / f64::from(SUBSAMPLES);

            crossings.clear();
            crossings.extend(
                edges
                    .iter()
                    .filter(|e| e.y0 <= y && y < e.y1)
                    .map(|e| (e.x_at(y), e.dir)),
            );
            crossings.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for (i, &(x, dir)) in crossings.iter().enumerate() {
                winding += dir;
                if rule.is_inside(winding)
                    && let Some(&(next_x, _)) = crossings.get(i + 1)
                {
                    add_span(&mut coverage, x, next_x, weight);
                }
            }
        }
        cells.extend(coverage.iter().map(|&c| c > COVERAGE_THRESHOLD));
    }

    Ok(OccupancyGrid { canvas, cells })
}

/// A non-horizontal line edge with `y0 < y1`.
#[derive(Clone, Copy, Debug)]
struct Edge {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    /// `+1` if the original segment pointed down the canvas, `-1` if up.
    dir: i32,
}

impl Edge {
    fn new(a: Point, b: Point) -> Option<Self> {
        if a.y == b.y || !a.is_finite() || !b.is_finite() {
            return None;
        }
        Some(if a.y < b.y {
            Self {
                x0: a.x,
                y0: a.y,
                x1: b.x,
                y1: b.y,
                dir: 1,
            }
        } else {
            Self {
                x0: b.x,
                y0: b.y,
                x1: a.x,
                y1: a.y,
                dir: -1,
            }
        })
    }

    #[inline]
    fn x_at(&self, y: f64) -> f64 {
        self.x0 + (y - self.y0) * (self.x1 - self.x0) / (self.y1 - self.y0)
    }
}

fn collect_edges(outline: &Outline, transform: FitTransform) -> Vec<Edge> {
    let mut path = outline.path().clone();
    path.apply_affine(transform.to_affine());

    let mut edges = Vec::new();
    let mut start = Point::ORIGIN;
    let mut last = Point::ORIGIN;
    let mut push = |a: Point, b: Point| edges.extend(Edge::new(a, b));

    // Subpaths are closed implicitly, as a fill would.
    kurbo::flatten(&path, FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => {
            push(last, start);
            start = p;
            last = p;
        }
        PathEl::LineTo(p) => {
            push(last, p);
            last = p;
        }
        PathEl::ClosePath => {
            push(last, start);
            last = start;
        }
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });
    push(last, start);
    edges
}

/// Adds `weight` times the overlap of `[x0, x1)` with each pixel column.
#[expect(
    clippy::cast_possible_truncation,
    reason = "span ends are clamped to [0, width] before conversion"
)]
fn add_span(coverage: &mut [f32], x0: f64, x1: f64, weight: f32) {
    let width = coverage.len() as f64;
    let (x0, x1) = (x0.clamp(0.0, width), x1.clamp(0.0, width));
    if x1 <= x0 {
        return;
    }
    let first = x0.floor() as usize;
    let end = (x1.ceil() as usize).min(coverage.len());
    for (px, cell) in coverage.iter_mut().enumerate().take(end).skip(first) {
        let left = px as f64;
        let overlap = x1.min(left + 1.0) - x0.max(left);
        if overlap > 0.0 {
            *cell += overlap as f32 * weight;
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Size;

    use super::*;

    fn square_grid(path: &str, box_side: f64, canvas: Canvas, rule: FillRule) -> OccupancyGrid {
        let outline = Outline::new(path, Size::new(box_side, box_side)).unwrap();
        let fit = outline.fit(canvas).unwrap();
        rasterize_with_rule(&outline, fit, canvas, rule).unwrap()
    }

    #[test]
    fn full_square_fills_every_cell() {
        let grid = square_grid("M0 0 H8 V8 H0 Z", 8.0, Canvas::new(8, 8), FillRule::NonZero);
        assert_eq!(grid.inside_count(), 64);
    }

    #[test]
    fn centered_square_fills_middle_block() {
        let grid = square_grid("M2 2 H6 V6 H2 Z", 8.0, Canvas::new(8, 8), FillRule::NonZero);
        assert_eq!(grid.inside_count(), 16);
        for y in 0..8 {
            for x in 0..8 {
                let expected = (2..6).contains(&x) && (2..6).contains(&y);
                assert_eq!(grid.get(x, y), expected, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn fit_scales_small_box_up() {
        let grid = square_grid("M0 0 H4 V4 H0 Z", 4.0, Canvas::new(8, 8), FillRule::NonZero);
        assert_eq!(grid.inside_count(), 64);
    }

    #[test]
    fn half_covered_diagonal_pixels_stay_outside() {
        // Diagonal pixels are exactly half covered, which is not more than 50%.
        let grid = square_grid("M0 0 L8 0 L0 8 Z", 8.0, Canvas::new(8, 8), FillRule::NonZero);
        assert_eq!(grid.inside_count(), 28);
        assert!(grid.get(0, 6), "x + y = 6 is inside");
        assert!(!grid.get(1, 6), "x + y = 7 sits on the hypotenuse");
    }

    #[test]
    fn fill_rules_differ_on_nested_same_direction_squares() {
        let nested = "M0 0 H8 V8 H0 Z M2 2 H6 V6 H2 Z";
        let nonzero = square_grid(nested, 8.0, Canvas::new(8, 8), FillRule::NonZero);
        let evenodd = square_grid(nested, 8.0, Canvas::new(8, 8), FillRule::EvenOdd);
        assert_eq!(nonzero.inside_count(), 64);
        assert_eq!(evenodd.inside_count(), 48);
        assert!(!evenodd.get(3, 3), "even-odd punches the inner square out");
    }

    #[test]
    fn unclosed_subpath_is_closed_implicitly() {
        let grid = square_grid("M2 2 H6 V6 H2", 8.0, Canvas::new(8, 8), FillRule::NonZero);
        assert_eq!(grid.inside_count(), 16);
    }

    #[test]
    fn curved_outline_is_deterministic() {
        let circle = "M8 0 A8 8 0 1 1 8 16 A8 8 0 1 1 8 0 Z";
        let a = square_grid(circle, 16.0, Canvas::new(32, 32), FillRule::NonZero);
        let b = square_grid(circle, 16.0, Canvas::new(32, 32), FillRule::NonZero);
        assert_eq!(a, b);
        // Area of a radius-16 disc is ~804 pixels.
        let area = a.inside_count();
        assert!((780..=830).contains(&area), "disc area {area}");
    }

    #[test]
    fn empty_canvas_is_rejected() {
        let outline = Outline::new("M0 0 H1 V1 Z", Size::new(1.0, 1.0)).unwrap();
        let fit = FitTransform {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        assert_eq!(
            rasterize(&outline, fit, Canvas::new(4, 0)).unwrap_err(),
            MorphError::EmptyCanvas
        );
    }

    #[test]
    fn degenerate_transforms_are_rejected() {
        let outline = Outline::new("M0 0 H8 V8 H0 Z", Size::new(8.0, 8.0)).unwrap();
        let good = FitTransform {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        let bad = [
            FitTransform { scale: 0.0, ..good },
            FitTransform { scale: -1.0, ..good },
            FitTransform { scale: f64::NAN, ..good },
            FitTransform { scale: f64::INFINITY, ..good },
            FitTransform { offset_x: f64::NAN, ..good },
            FitTransform { offset_y: f64::NEG_INFINITY, ..good },
        ];
        for fit in bad {
            assert_eq!(
                rasterize(&outline, fit, Canvas::new(8, 8)).unwrap_err(),
                MorphError::DegenerateBoundingBox {
                    width: 8.0,
                    height: 8.0
                },
                "{fit:?} should be rejected"
            );
        }
        assert_eq!(
            rasterize(&outline, good, Canvas::new(8, 8)).unwrap().inside_count(),
            64,
            "a unit transform still fills"
        );
    }
}
