// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wake-driven frame loop.
//!
//! [`FrameLoop`] calls a tick callback and schedules the next call according
//! to the [`Wake`] it returns: [`Wake::NextFrame`] maps to
//! `requestAnimationFrame`, [`Wake::At`] to `setTimeout`, and [`Wake::Never`]
//! leaves the loop idle. Holds and setup polling therefore cost no frames.
//!
//! Times are microsecond [`HostTime`] ticks derived from `performance.now()`
//! (rAF timestamps share its origin).

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use morphfield_core::driver::Wake;
use morphfield_core::time::HostTime;

// Direct global bindings instead of `web_sys::Window` methods, so no Window
// object is fetched per frame.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);

    #[wasm_bindgen(js_name = "setTimeout")]
    fn set_timeout(callback: &JsValue, millis: i32) -> i32;

    #[wasm_bindgen(js_name = "clearTimeout")]
    fn clear_timeout(id: i32);
}

/// Converts a `DOMHighResTimeStamp` in milliseconds to microsecond ticks.
#[expect(
    clippy::cast_possible_truncation,
    reason = "timestamps are small positive f64; µs fits in u64"
)]
pub(crate) fn host_time_from_ms(ms: f64) -> HostTime {
    HostTime((ms.max(0.0) * 1000.0) as u64)
}

/// Whole milliseconds to wait from `now` until `at`, rounded up so a timer
/// never fires early.
pub(crate) fn delay_millis(now: HostTime, at: HostTime) -> i32 {
    let micros = at.saturating_duration_since(now).ticks();
    i32::try_from(micros.div_ceil(1000)).unwrap_or(i32::MAX)
}

/// A loop that ticks on animation frames or timers, as each tick requests.
///
/// Create with [`FrameLoop::new`], then call [`start`](Self::start). The loop
/// runs until its callback returns [`Wake::Never`], [`stop`](Self::stop) is
/// called, or the `FrameLoop` is dropped.
pub struct FrameLoop {
    inner: Rc<LoopInner>,
}

type RafClosure = Closure<dyn FnMut(f64)>;
type TimerClosure = Closure<dyn FnMut()>;

struct LoopInner {
    /// Registered with `requestAnimationFrame`.
    raf_closure: RefCell<Option<RafClosure>>,

    /// Registered with `setTimeout`.
    timer_closure: RefCell<Option<TimerClosure>>,

    callback: RefCell<Box<dyn FnMut(HostTime) -> Wake>>,

    running: Cell<bool>,
    raf_id: Cell<Option<i32>>,
    timer_id: Cell<Option<i32>>,

    /// Number of callback invocations.
    ticks: Cell<u64>,
}

impl LoopInner {
    fn dispatch(&self, now: HostTime) {
        if !self.running.get() {
            return;
        }
        self.ticks.set(self.ticks.get() + 1);
        let wake = self.callback.borrow_mut()(now);
        if self.running.get() {
            self.schedule(wake, now);
        }
    }

    fn schedule(&self, wake: Wake, now: HostTime) {
        match wake {
            Wake::NextFrame => {
                if let Some(ref closure) = *self.raf_closure.borrow() {
                    let id = request_animation_frame(closure.as_ref().unchecked_ref());
                    self.raf_id.set(Some(id));
                }
            }
            Wake::At(at) => {
                if let Some(ref closure) = *self.timer_closure.borrow() {
                    let id = set_timeout(closure.as_ref().unchecked_ref(), delay_millis(now, at));
                    self.timer_id.set(Some(id));
                }
            }
            Wake::Never => self.running.set(false),
        }
    }

    fn cancel_pending(&self) {
        if let Some(id) = self.raf_id.take() {
            cancel_animation_frame(id);
        }
        if let Some(id) = self.timer_id.take() {
            clear_timeout(id);
        }
    }
}

impl FrameLoop {
    /// Creates a loop that is **not yet running**.
    pub fn new(callback: impl FnMut(HostTime) -> Wake + 'static) -> Self {
        Self {
            inner: Rc::new(LoopInner {
                raf_closure: RefCell::new(None),
                timer_closure: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                running: Cell::new(false),
                raf_id: Cell::new(None),
                timer_id: Cell::new(None),
                ticks: Cell::new(0),
            }),
        }
    }

    /// Starts the loop with a tick on the next animation frame.
    ///
    /// If already running, this is a no-op.
    pub fn start(&self) {
        if self.inner.running.get() {
            return;
        }
        self.inner.running.set(true);

        if self.inner.raf_closure.borrow().is_none() {
            let inner = Rc::clone(&self.inner);
            let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
                inner.raf_id.set(None);
                inner.dispatch(host_time_from_ms(timestamp_ms));
            }) as Box<dyn FnMut(f64)>);
            *self.inner.raf_closure.borrow_mut() = Some(closure);
        }
        if self.inner.timer_closure.borrow().is_none() {
            let inner = Rc::clone(&self.inner);
            let closure = Closure::wrap(Box::new(move || {
                inner.timer_id.set(None);
                inner.dispatch(host_time_from_ms(performance_now()));
            }) as Box<dyn FnMut()>);
            *self.inner.timer_closure.borrow_mut() = Some(closure);
        }

        self.inner
            .schedule(Wake::NextFrame, host_time_from_ms(performance_now()));
    }

    /// Stops the loop and cancels any pending frame or timer.
    ///
    /// Can be restarted by calling [`start`](Self::start) again.
    pub fn stop(&self) {
        self.inner.running.set(false);
        self.inner.cancel_pending();
    }

    /// Returns `true` while callbacks are scheduled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
        // The closures hold `Rc<LoopInner>`; dropping them breaks the cycle.
        self.inner.raf_closure.borrow_mut().take();
        self.inner.timer_closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameLoop")
            .field("running", &self.inner.running.get())
            .field("ticks", &self.inner.ticks.get())
            .finish_non_exhaustive()
    }
}
