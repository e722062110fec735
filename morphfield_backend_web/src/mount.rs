// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mounting a morph onto a `<canvas>` element.
//!
//! [`MorphCanvas::mount`] starts fetching the second outline, builds both
//! distance fields once it arrives, and drives the animation from a
//! [`FrameLoop`]. Dropping the [`MorphCanvas`] stops the loop and releases
//! the fields. If the user prefers reduced motion, the first outline is
//! drawn once and nothing is fetched.

use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::RefCell;

use kurbo::Rect;
use wasm_bindgen::JsValue;
use web_sys::{HtmlCanvasElement, console};

use morphfield_core::composite::PixelBuffer;
use morphfield_core::driver::{AnimationState, DriverConfig, MorphDriver, Wake};
use morphfield_core::error::MorphError;
use morphfield_core::outline::{Canvas, Outline};
use morphfield_core::presets;
use morphfield_core::setup::{MorphFields, SetupSender, setup_channel};
use morphfield_core::time::HostTime;
use morphfield_core::trace::Tracer;

use crate::canvas::CanvasTarget;
use crate::console::ConsoleSink;
use crate::fetch::{fetch_text, prefers_reduced_motion};
use crate::raf::FrameLoop;

/// What to morph between, and where.
#[derive(Clone, Debug)]
pub struct MountOptions {
    /// The outline shown first, available immediately.
    pub first: Outline,
    /// URL of the SVG document holding the second outline.
    pub second_url: String,
    /// View box for the second outline when its document declares none.
    pub second_view_box: Option<Rect>,
    /// Output size in pixels.
    pub canvas: Canvas,
    /// Timing and appearance.
    pub config: DriverConfig,
}

impl MountOptions {
    /// The stool-to-chair morph on a [`Canvas::STOOL`] canvas.
    ///
    /// # Errors
    ///
    /// Only if the built-in stool outline fails to parse.
    pub fn stool_to_chair(config: DriverConfig) -> Result<Self, MorphError> {
        Ok(Self {
            first: presets::stool()?,
            second_url: String::from(presets::CHAIR_URL),
            second_view_box: Some(Rect::from_origin_size(
                (0.0, 0.0),
                presets::CHAIR_VIEW_BOX,
            )),
            canvas: Canvas::STOOL,
            config,
        })
    }
}

struct Session {
    driver: MorphDriver,
    buffer: PixelBuffer,
    target: CanvasTarget,
    sink: ConsoleSink,
}

impl Session {
    fn tick(&mut self, now: HostTime) -> Wake {
        let Self {
            driver,
            buffer,
            target,
            sink,
        } = self;
        let mut tracer = Tracer::new(sink);
        match driver.tick(now, buffer, &mut tracer) {
            Ok(report) => {
                if report.drawn.is_some()
                    && let Err(err) = target.present(buffer)
                {
                    console::error_1(&err);
                    return Wake::Never;
                }
                report.wake
            }
            Err(err) => {
                console::error_1(&JsValue::from_str(&format!("morphfield: {err}")));
                Wake::Never
            }
        }
    }

    fn teardown(&mut self) {
        let mut tracer = Tracer::new(&mut self.sink);
        self.driver.teardown(&mut tracer);
    }
}

/// Second-outline setup that runs after the fetch resolves.
struct SetupJob {
    sender: SetupSender,
    first: Outline,
    url: String,
    view_box: Option<Rect>,
    canvas: Canvas,
}

impl SetupJob {
    async fn run(self) {
        let text = match fetch_text(&self.url).await {
            Ok(text) => text,
            // Dropping the sender resolves setup as abandoned.
            Err(err) => {
                console::error_1(&err);
                return;
            }
        };
        if self.sender.is_canceled() {
            return;
        }
        let result = Outline::from_svg_document(&text, self.view_box)
            .and_then(|second| MorphFields::build(&self.first, &second, self.canvas));
        self.sender.complete(result);
    }
}

#[cfg(target_arch = "wasm32")]
fn spawn_setup(job: SetupJob) {
    wasm_bindgen_futures::spawn_local(job.run());
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_setup(_job: SetupJob) {}

/// A running morph bound to a canvas element.
///
/// Unmounts on drop.
pub struct MorphCanvas {
    session: Rc<RefCell<Session>>,
    frame_loop: FrameLoop,
}

impl MorphCanvas {
    /// Binds a morph to `element` and starts animating.
    ///
    /// # Errors
    ///
    /// Fails if the element has no 2D context, or if reduced motion is
    /// requested and the first outline cannot be drawn.
    pub fn mount(element: HtmlCanvasElement, options: MountOptions) -> Result<Self, JsValue> {
        let MountOptions {
            first,
            second_url,
            second_view_box,
            canvas,
            config,
        } = options;
        let target = CanvasTarget::new(element, canvas)?;
        let buffer = PixelBuffer::new(canvas, CanvasTarget::pixel_format());

        let driver = if prefers_reduced_motion() {
            MorphDriver::still(config, &first, canvas)
                .map_err(|err| JsValue::from_str(&format!("morphfield: {err}")))?
        } else {
            let (sender, receiver) = setup_channel();
            spawn_setup(SetupJob {
                sender,
                first,
                url: second_url,
                view_box: second_view_box,
                canvas,
            });
            MorphDriver::new(config, receiver)
        };

        let session = Rc::new(RefCell::new(Session {
            driver,
            buffer,
            target,
            sink: ConsoleSink,
        }));
        let frame_loop = FrameLoop::new({
            let session = Rc::clone(&session);
            move |now| session.borrow_mut().tick(now)
        });
        frame_loop.start();
        Ok(Self {
            session,
            frame_loop,
        })
    }

    /// Current animation state.
    #[must_use]
    pub fn state(&self) -> AnimationState {
        self.session.borrow().driver.state()
    }

    /// The setup failure, if setup failed.
    #[must_use]
    pub fn setup_error(&self) -> Option<MorphError> {
        self.session.borrow().driver.setup_error()
    }

    /// Stops the animation and releases its resources.
    pub fn unmount(self) {}
}

impl Drop for MorphCanvas {
    fn drop(&mut self) {
        self.frame_loop.stop();
        if let Ok(mut session) = self.session.try_borrow_mut() {
            session.teardown();
        }
    }
}

impl core::fmt::Debug for MorphCanvas {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MorphCanvas")
            .field("frame_loop", &self.frame_loop)
            .finish_non_exhaustive()
    }
}
