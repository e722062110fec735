// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Field interpolation and pixel output.
//!
//! A frame at progress `p` blends two fields per cell as
//! `d = a·(1-p) + b·p - bulge(p)`, turns `d` into coverage with a smoothstep
//! band of half-width [`MorphStyle::aa_width`], and writes a solid color at
//! that coverage. The bulge is `sin(pπ)·bulge_max`, zero at both endpoints, so
//! `p = 0` and `p = 1` reproduce the single-field renders bit for bit.

use alloc::vec;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::error::MorphError;
use crate::field::{DistanceField, build_sdf};
use crate::outline::{Canvas, Outline};
use crate::raster::rasterize;

/// An opaque sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb {
    /// The stool orange, `#FF5300`.
    pub const STOOL_ORANGE: Self = Self::from_hex(0x00FF_5300);

    /// Creates a color from components.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from `0xRRGGBB`. Bits above the low 24 are ignored.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "each channel is masked to 8 bits first"
    )]
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::STOOL_ORANGE
    }
}

/// Byte order of the color channels within a pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChannelOrder {
    /// `R, G, B, A`, as canvas `ImageData` expects.
    #[default]
    Rgba,
    /// `B, G, R, A`, common for native surfaces.
    Bgra,
}

/// Whether color channels are scaled by alpha.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AlphaMode {
    /// Color channels hold the full color regardless of alpha.
    #[default]
    Straight,
    /// Color channels are multiplied by alpha.
    Premultiplied,
}

/// Layout of the 4-byte pixels in a [`PixelBuffer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelFormat {
    /// Channel order.
    pub order: ChannelOrder,
    /// Alpha mode.
    pub alpha: AlphaMode,
}

impl PixelFormat {
    /// Straight-alpha RGBA.
    pub const RGBA8: Self = Self {
        order: ChannelOrder::Rgba,
        alpha: AlphaMode::Straight,
    };

    /// Premultiplied BGRA.
    pub const BGRA8_PREMULTIPLIED: Self = Self {
        order: ChannelOrder::Bgra,
        alpha: AlphaMode::Premultiplied,
    };

    /// Encodes `color` at coverage `alpha`.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "c * a / 255 never exceeds 255"
    )]
    pub fn encode(self, color: Rgb, alpha: u8) -> [u8; 4] {
        let scale = |c: u8| match self.alpha {
            AlphaMode::Straight => c,
            AlphaMode::Premultiplied => ((u16::from(c) * u16::from(alpha) + 127) / 255) as u8,
        };
        let (r, g, b) = (scale(color.r), scale(color.g), scale(color.b));
        match self.order {
            ChannelOrder::Rgba => [r, g, b, alpha],
            ChannelOrder::Bgra => [b, g, r, alpha],
        }
    }
}

/// A `width × height` buffer of 4-byte pixels, row-major, no padding.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    canvas: Canvas,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a fully transparent buffer.
    #[must_use]
    pub fn new(canvas: Canvas, format: PixelFormat) -> Self {
        Self {
            canvas,
            format,
            data: vec![0; canvas.len() * 4],
        }
    }

    /// The buffer's dimensions.
    #[inline]
    #[must_use]
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// The buffer's pixel layout.
    #[inline]
    #[must_use]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw pixel bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The four bytes of pixel `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(
            x < self.canvas.width && y < self.canvas.height,
            "pixel ({x}, {y}) out of bounds"
        );
        let i = (y as usize * self.canvas.width as usize + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Makes every pixel transparent.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }
}

impl core::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("canvas", &self.canvas)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

/// Visual constants of the morph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MorphStyle {
    /// Peak outward swell, in pixels, reached at progress 0.5.
    pub bulge_max: f32,
    /// Half-width of the anti-aliasing band, in pixels. Zero gives hard edges.
    pub aa_width: f32,
    /// Coverage at or below which a pixel is written fully transparent.
    pub alpha_cutoff: f32,
}

impl MorphStyle {
    /// The default liquid look: 2 px swell, 0.75 px edge band.
    pub const LIQUID: Self = Self {
        bulge_max: 2.0,
        aa_width: 0.75,
        alpha_cutoff: 0.004,
    };

    /// No swell; a plain cross-fade of the two distance fields.
    pub const FLAT: Self = Self {
        bulge_max: 0.0,
        ..Self::LIQUID
    };
}

impl Default for MorphStyle {
    fn default() -> Self {
        Self::LIQUID
    }
}

/// What a composite wrote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompositeStats {
    /// Pixels written with non-zero alpha.
    pub covered: usize,
}

/// Hermite smoothstep: `t²(3 - 2t)` with `t = clamp((x - lo) / (hi - lo), 0, 1)`.
#[inline]
#[must_use]
pub fn smoothstep(lo: f32, hi: f32, x: f32) -> f32 {
    let t = ((x - lo) / (hi - lo)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Coverage of a cell at signed distance `d`.
///
/// A NaN distance is fully outside.
#[inline]
#[must_use]
pub fn coverage_alpha(d: f32, style: &MorphStyle) -> f32 {
    if d.is_nan() {
        return 0.0;
    }
    if style.aa_width <= 0.0 {
        return if d < 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - smoothstep(-style.aa_width, style.aa_width, d)
}

/// Per-frame blend weights.
#[derive(Clone, Copy, Debug)]
enum Mix {
    First,
    Second,
    Blend { wa: f32, wb: f32, bulge: f32 },
}

impl Mix {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "weights and bulge are small; f32 is the field precision"
    )]
    fn new(progress: f64, style: &MorphStyle) -> Self {
        let p = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        if p <= 0.0 {
            Self::First
        } else if p >= 1.0 {
            Self::Second
        } else {
            let bulge = (p * core::f64::consts::PI).sin() * f64::from(style.bulge_max);
            Self::Blend {
                wa: (1.0 - p) as f32,
                wb: p as f32,
                bulge: bulge as f32,
            }
        }
    }

    #[inline]
    fn distance(self, a: f32, b: f32) -> f32 {
        match self {
            Self::First => a,
            Self::Second => b,
            Self::Blend { wa, wb, bulge } => a * wa + b * wb - bulge,
        }
    }
}

/// Writes the morph of `a` into `b` at `progress` into `buffer`.
///
/// NaN progress counts as 0 and progress is clamped to `[0, 1]`.
///
/// # Errors
///
/// Returns [`MorphError::CanvasMismatch`] if the fields and the buffer differ
/// in size. The buffer is untouched in that case.
pub fn composite(
    a: &DistanceField,
    b: &DistanceField,
    progress: f64,
    color: Rgb,
    style: &MorphStyle,
    buffer: &mut PixelBuffer,
) -> Result<CompositeStats, MorphError> {
    check_canvas(a.canvas(), b.canvas())?;
    check_canvas(a.canvas(), buffer.canvas())?;
    let mix = Mix::new(progress, style);
    Ok(write_pixels(
        a.values().iter().zip(b.values()).map(|(&a, &b)| mix.distance(a, b)),
        color,
        style,
        buffer,
    ))
}

/// Writes a single field into `buffer`.
///
/// # Errors
///
/// Returns [`MorphError::CanvasMismatch`] if the field and the buffer differ
/// in size.
pub fn composite_single(
    field: &DistanceField,
    color: Rgb,
    style: &MorphStyle,
    buffer: &mut PixelBuffer,
) -> Result<CompositeStats, MorphError> {
    check_canvas(field.canvas(), buffer.canvas())?;
    Ok(write_pixels(field.values().iter().copied(), color, style, buffer))
}

/// Renders a still of `outline` with the same edge treatment as animated
/// frames.
///
/// # Errors
///
/// Propagates fit and rasterization errors, and returns
/// [`MorphError::CanvasMismatch`] if `buffer` is not `canvas`-sized.
pub fn render_static(
    outline: &Outline,
    canvas: Canvas,
    color: Rgb,
    style: &MorphStyle,
    buffer: &mut PixelBuffer,
) -> Result<CompositeStats, MorphError> {
    check_canvas(canvas, buffer.canvas())?;
    let fit = outline.fit(canvas)?;
    let field = build_sdf(&rasterize(outline, fit, canvas)?);
    composite_single(&field, color, style, buffer)
}

fn check_canvas(expected: Canvas, found: Canvas) -> Result<(), MorphError> {
    if expected == found {
        Ok(())
    } else {
        Err(MorphError::CanvasMismatch {
            expected: (expected.width, expected.height),
            found: (found.width, found.height),
        })
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "alpha is in [0, 1], so the rounded byte is at most 255"
)]
fn write_pixels(
    distances: impl Iterator<Item = f32>,
    color: Rgb,
    style: &MorphStyle,
    buffer: &mut PixelBuffer,
) -> CompositeStats {
    let format = buffer.format;
    let mut covered = 0;
    for (d, px) in distances.zip(buffer.data.chunks_exact_mut(4)) {
        let alpha = coverage_alpha(d, style);
        if alpha > style.alpha_cutoff {
            px.copy_from_slice(&format.encode(color, (alpha * 255.0 + 0.5) as u8));
            covered += 1;
        } else {
            px.fill(0);
        }
    }
    CompositeStats { covered }
}
