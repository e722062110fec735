// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for morphfield.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`FrameLoop`]: `requestAnimationFrame`/`setTimeout` tick source driven by [`Wake`]
//! - [`CanvasTarget`]: blits a [`PixelBuffer`] onto a 2D canvas
//! - [`fetch_text`]: loads an SVG document
//! - [`ConsoleSink`]: reports setup failures on the browser console
//! - [`MorphCanvas`]: wires all of the above to a [`MorphDriver`]
//!
//! [`Wake`]: morphfield_core::driver::Wake
//! [`PixelBuffer`]: morphfield_core::composite::PixelBuffer
//! [`MorphDriver`]: morphfield_core::driver::MorphDriver

#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "the mount path only runs in the browser")
)]

extern crate alloc;

mod canvas;
mod console;
mod fetch;
mod mount;
mod raf;

pub use canvas::CanvasTarget;
pub use console::ConsoleSink;
pub use fetch::{fetch_text, prefers_reduced_motion};
pub use mount::{MorphCanvas, MountOptions};
pub use raf::FrameLoop;

use morphfield_core::time::{HostTime, Timebase};

/// Returns the current host time from `performance.now()`.
///
/// The returned [`HostTime`] is in microsecond ticks. Use [`timebase`] to
/// convert to nanoseconds.
#[must_use]
pub fn now() -> HostTime {
    raf::host_time_from_ms(raf::performance_now())
}

/// Returns the web [`Timebase`]: 1 tick = 1 µs = 1000 ns.
#[must_use]
pub fn timebase() -> Timebase {
    Timebase::new(1000, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use morphfield_core::time::Duration;

    #[test]
    fn timebase_is_microsecond() {
        let tb = timebase();
        assert_eq!(tb.ticks_to_nanos(1), 1000, "1 tick = 1 µs");
        assert_eq!(tb.ticks_to_nanos(1_000_000), 1_000_000_000, "1 s");
    }

    #[test]
    fn default_durations_in_microseconds() {
        assert_eq!(Duration::from_millis(4000, timebase()), Duration(4_000_000), "morph");
        assert_eq!(Duration::from_millis(50, timebase()), Duration(50_000), "poll");
    }
}
