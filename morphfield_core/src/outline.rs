// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outlines, canvases and the fit transform between them.
//!
//! An [`Outline`] is an SVG path descriptor parsed once into a
//! [`BezPath`] together with the view box it was authored in. The
//! [`FitTransform`] scales that view box uniformly so it fits the
//! [`Canvas`] and centers it.
//!
//! Fetched outlines arrive as whole SVG documents; [`extract_path_data`] and
//! [`extract_view_box`] pull the two attributes the engine needs out of the
//! text without a full XML parse.

use kurbo::{Affine, BezPath, PathEl, Point, Rect, Shape as _, Size};

use crate::error::{MorphError, OutlineDefect};

/// Pixel dimensions of the render target.
///
/// Held constant for a session. Changing it means rebuilding the fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// The 226×283 stool artboard.
    pub const STOOL: Self = Self::new(226, 283);

    /// Creates a canvas of the given size.
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if either side is zero.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub(crate) fn require_non_empty(self) -> Result<Self, MorphError> {
        if self.is_empty() {
            Err(MorphError::EmptyCanvas)
        } else {
            Ok(self)
        }
    }
}

/// An immutable closed vector path plus its authoring view box.
#[derive(Clone, Debug)]
pub struct Outline {
    path: BezPath,
    view_box: Rect,
}

impl Outline {
    /// Parses `path_data` and pairs it with a `size` view box anchored at the
    /// origin.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::MalformedOutline`] if the path data does not
    /// parse, has no drawable segments, or contains non-finite coordinates.
    pub fn new(path_data: &str, size: Size) -> Result<Self, MorphError> {
        Self::with_view_box(path_data, Rect::from_origin_size(Point::ORIGIN, size))
    }

    /// Parses `path_data` and pairs it with an explicit view box.
    ///
    /// # Errors
    ///
    /// See [`Outline::new`].
    pub fn with_view_box(path_data: &str, view_box: Rect) -> Result<Self, MorphError> {
        let path = parse_path(path_data)?;
        Ok(Self { path, view_box })
    }

    /// Builds an outline from an SVG document.
    ///
    /// The path is the first `d` attribute in the text. The view box is
    /// `view_box` if given, else the document's `viewBox` attribute, else the
    /// path's own bounds.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::MissingPathData`] if the document has no `d`
    /// attribute, or [`MorphError::MalformedOutline`] if it does not parse.
    pub fn from_svg_document(text: &str, view_box: Option<Rect>) -> Result<Self, MorphError> {
        let data = extract_path_data(text).ok_or(MorphError::MissingPathData)?;
        let path = parse_path(data)?;
        let view_box = view_box
            .or_else(|| extract_view_box(text))
            .unwrap_or_else(|| path.bounding_box());
        Ok(Self { path, view_box })
    }

    /// The parsed path in outline units.
    #[must_use]
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// The authoring view box in outline units.
    #[must_use]
    pub fn view_box(&self) -> Rect {
        self.view_box
    }

    /// Computes the transform that fits this outline into `canvas`.
    ///
    /// # Errors
    ///
    /// See [`FitTransform::fit`].
    pub fn fit(&self, canvas: Canvas) -> Result<FitTransform, MorphError> {
        FitTransform::fit(self.view_box, canvas)
    }
}

fn parse_path(data: &str) -> Result<BezPath, MorphError> {
    let path = BezPath::from_svg(data.trim()).map_err(|_| OutlineDefect::Unparseable)?;
    if path.segments().next().is_none() {
        return Err(OutlineDefect::Empty.into());
    }
    let finite = path.elements().iter().all(|el| match *el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => p.is_finite(),
        PathEl::QuadTo(p1, p2) => p1.is_finite() && p2.is_finite(),
        PathEl::CurveTo(p1, p2, p3) => p1.is_finite() && p2.is_finite() && p3.is_finite(),
        PathEl::ClosePath => true,
    });
    if !finite {
        return Err(OutlineDefect::NonFinite.into());
    }
    Ok(path)
}

/// Uniform scale plus offset that centers a view box inside a canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitTransform {
    /// Canvas pixels per outline unit. Always positive.
    pub scale: f64,
    /// Horizontal offset in canvas pixels.
    pub offset_x: f64,
    /// Vertical offset in canvas pixels.
    pub offset_y: f64,
}

impl FitTransform {
    /// Fits `view_box` into `canvas` with
    /// `scale = min(canvas_w / box_w, canvas_h / box_h)`, centered on the
    /// axis with slack.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::DegenerateBoundingBox`] if either side of the box
    /// is zero, negative or non-finite, and [`MorphError::EmptyCanvas`] for a
    /// zero-sized canvas.
    pub fn fit(view_box: Rect, canvas: Canvas) -> Result<Self, MorphError> {
        let (width, height) = (view_box.width(), view_box.height());
        let usable = |side: f64| side.is_finite() && side > 0.0;
        if !usable(width) || !usable(height) || !view_box.x0.is_finite() || !view_box.y0.is_finite()
        {
            return Err(MorphError::DegenerateBoundingBox { width, height });
        }
        let canvas = canvas.require_non_empty()?;
        let (cw, ch) = (f64::from(canvas.width), f64::from(canvas.height));
        let scale = (cw / width).min(ch / height);
        Ok(Self {
            scale,
            offset_x: (cw - width * scale) / 2.0 - view_box.x0 * scale,
            offset_y: (ch - height * scale) / 2.0 - view_box.y0 * scale,
        })
    }

    /// The transform as a `kurbo` affine map from outline units to pixels.
    #[must_use]
    pub fn to_affine(self) -> Affine {
        Affine::translate((self.offset_x, self.offset_y)) * Affine::scale(self.scale)
    }
}

/// Returns the value of the first `d` attribute in an SVG document.
///
/// Attribute names that merely end in `d` (such as `id`) are skipped. Both
/// quote styles are accepted.
#[must_use]
pub fn extract_path_data(svg: &str) -> Option<&str> {
    attribute_value(svg, "d")
}

/// Parses the first `viewBox="min-x min-y width height"` attribute.
///
/// Returns `None` if the attribute is absent or does not hold four numbers.
#[must_use]
pub fn extract_view_box(svg: &str) -> Option<Rect> {
    let raw = attribute_value(svg, "viewBox")?;
    let mut numbers = raw
        .split(|c: char| c.is_ascii_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::parse::<f64>);
    let mut next = || numbers.next()?.ok();
    let (x, y, w, h) = (next()?, next()?, next()?, next()?);
    Some(Rect::new(x, y, x + w, y + h))
}

fn attribute_value<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let bytes = text.as_bytes();
    let mut from = 0;
    while let Some(found) = text[from..].find(name) {
        let start = from + found;
        let after_name = start + name.len();
        from = after_name;

        let standalone = start == 0 || bytes[start - 1].is_ascii_whitespace();
        if !standalone {
            continue;
        }
        let rest = text[after_name..].trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();
        let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            continue;
        };
        let body = &rest[1..];
        return body.find(quote).map(|end| &body[..end]);
    }
    None
}
