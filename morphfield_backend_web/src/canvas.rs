// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas 2D presentation.

use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use morphfield_core::composite::{PixelBuffer, PixelFormat};
use morphfield_core::outline::Canvas;

/// A `<canvas>` element sized to a morph canvas, with its 2D context.
///
/// `ImageData` is straight-alpha RGBA, so buffers presented here must use
/// [`PixelFormat::RGBA8`].
#[derive(Debug)]
pub struct CanvasTarget {
    element: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    canvas: Canvas,
}

impl CanvasTarget {
    /// Sizes `element` to `canvas` and acquires its 2D context.
    ///
    /// # Errors
    ///
    /// Returns the JS exception if the element has no 2D context.
    pub fn new(element: HtmlCanvasElement, canvas: Canvas) -> Result<Self, JsValue> {
        element.set_width(canvas.width);
        element.set_height(canvas.height);
        let context = element
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            element,
            context,
            canvas,
        })
    }

    /// The pixel format `ImageData` expects.
    #[must_use]
    pub const fn pixel_format() -> PixelFormat {
        PixelFormat::RGBA8
    }

    /// The canvas element.
    #[must_use]
    pub fn element(&self) -> &HtmlCanvasElement {
        &self.element
    }

    /// Copies `buffer` onto the canvas at the origin.
    ///
    /// # Errors
    ///
    /// Fails if `buffer` has a different size or format, or if the browser
    /// rejects the image data.
    pub fn present(&self, buffer: &PixelBuffer) -> Result<(), JsValue> {
        if buffer.canvas() != self.canvas || buffer.format() != Self::pixel_format() {
            return Err(JsValue::from_str("pixel buffer does not match the canvas"));
        }
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(buffer.as_bytes()),
            self.canvas.width,
            self.canvas.height,
        )?;
        self.context.put_image_data(&image, 0.0, 0.0)
    }
}
