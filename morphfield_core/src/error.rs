// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by setup and rendering.
//!
//! Only setup can fail. Per-frame compositing guards its numeric inputs
//! instead of returning errors.

use core::fmt;

/// Why an outline's path descriptor could not be turned into fillable
/// geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutlineDefect {
    /// The descriptor is not valid SVG path data.
    Unparseable,
    /// The descriptor parsed but contains no drawable segments.
    Empty,
    /// A coordinate is NaN or infinite.
    NonFinite,
}

impl fmt::Display for OutlineDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unparseable => "path data could not be parsed",
            Self::Empty => "path data has no drawable segments",
            Self::NonFinite => "path data has non-finite coordinates",
        })
    }
}

/// Errors from outline parsing, setup and driver misuse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MorphError {
    /// The path descriptor cannot be parsed or filled.
    MalformedOutline(OutlineDefect),
    /// The bounding box has a zero, negative or non-finite side, so no fit
    /// scale exists.
    DegenerateBoundingBox {
        /// Box width in outline units.
        width: f64,
        /// Box height in outline units.
        height: f64,
    },
    /// The canvas has zero width or height.
    EmptyCanvas,
    /// An SVG document carries no `d="…"` attribute.
    MissingPathData,
    /// Fields and pixel buffer disagree on size.
    CanvasMismatch {
        /// Size the fields were built for, `(width, height)`.
        expected: (u32, u32),
        /// Size that was supplied, `(width, height)`.
        found: (u32, u32),
    },
    /// Rendering was requested before both fields exist.
    SetupIncomplete,
    /// The setup sender was dropped without delivering a result.
    SetupAbandoned,
}

impl fmt::Display for MorphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedOutline(defect) => write!(f, "malformed outline: {defect}"),
            Self::DegenerateBoundingBox { width, height } => {
                write!(f, "degenerate bounding box ({width} x {height})")
            }
            Self::EmptyCanvas => f.write_str("canvas has zero width or height"),
            Self::MissingPathData => f.write_str("SVG document has no path data attribute"),
            Self::CanvasMismatch { expected, found } => write!(
                f,
                "canvas mismatch: fields are {}x{}, buffer is {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            Self::SetupIncomplete => f.write_str("render requested before setup completed"),
            Self::SetupAbandoned => f.write_str("setup was dropped without a result"),
        }
    }
}

impl core::error::Error for MorphError {}

impl From<OutlineDefect> for MorphError {
    fn from(defect: OutlineDefect) -> Self {
        Self::MalformedOutline(defect)
    }
}
