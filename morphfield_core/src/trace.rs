// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the morph driver.
//!
//! This module provides a [`MorphSink`] trait with one method per driver
//! event. All method bodies default to no-ops, so implementing only the
//! events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn MorphSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! Setup failures are only ever reported through this channel: the driver
//! keeps waiting and does not return them from `tick`.

use crate::driver::{Direction, Phase};
use crate::error::MorphError;
use crate::outline::Canvas;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted once, when the driver observes the setup result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SetupResolvedEvent {
    /// Host time of the poll that saw the result.
    pub at: HostTime,
    /// Size of the fields, when setup succeeded.
    pub canvas: Option<Canvas>,
    /// Why setup failed, when it did.
    pub error: Option<MorphError>,
}

/// Emitted on every state transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseChangeEvent {
    /// Host time of the transition.
    pub at: HostTime,
    /// State being left.
    pub from: Phase,
    /// State being entered.
    pub to: Phase,
    /// Direction of the next (or current) morph.
    pub direction: Direction,
    /// Completed morphs so far.
    pub cycle: u64,
}

/// Emitted after each frame written to the pixel buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameEvent {
    /// Monotonic count of drawn frames, starting at 0.
    pub frame_index: u64,
    /// Host time of the tick.
    pub at: HostTime,
    /// State the frame was drawn in.
    pub phase: Phase,
    /// Linear time through the current morph, `[0, 1]`. Holds report the
    /// endpoint they show.
    pub raw_t: f64,
    /// Eased, direction-adjusted progress that was composited.
    pub progress: f64,
    /// Pixels with non-zero alpha.
    pub covered: usize,
}

/// Emitted once when the driver is torn down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TeardownEvent {
    /// State at teardown.
    pub phase: Phase,
    /// Total frames drawn.
    pub frames_drawn: u64,
}

// ---------------------------------------------------------------------------
// MorphSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the driver.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait MorphSink {
    /// Called when the setup result is first observed.
    fn on_setup_resolved(&mut self, e: &SetupResolvedEvent) {
        _ = e;
    }

    /// Called on every state transition.
    fn on_phase_change(&mut self, e: &PhaseChangeEvent) {
        _ = e;
    }

    /// Called after each drawn frame.
    fn on_frame(&mut self, e: &FrameEvent) {
        _ = e;
    }

    /// Called when the driver is torn down.
    fn on_teardown(&mut self, e: &TeardownEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`MorphSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl MorphSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`MorphSink`].
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn MorphSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn MorphSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn MorphSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`SetupResolvedEvent`].
    #[inline]
    pub fn setup_resolved(&mut self, e: &SetupResolvedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_setup_resolved(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseChangeEvent`].
    #[inline]
    pub fn phase_change(&mut self, e: &PhaseChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_change(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameEvent`].
    #[inline]
    pub fn frame(&mut self, e: &FrameEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TeardownEvent`].
    #[inline]
    pub fn teardown(&mut self, e: &TeardownEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_teardown(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

impl Default for Tracer<'_> {
    fn default() -> Self {
        Self::none()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
