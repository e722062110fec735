// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Signed-distance-field shape morphing.
//!
//! `morphfield_core` turns two closed vector outlines into a continuously
//! interpolating, anti-aliased raster animation. It is `no_std` compatible
//! (with `alloc`) and leaves display, clocks and async I/O to the host.
//!
//! # Architecture
//!
//! Setup runs once per canvas size; the driver then composites one frame per
//! host callback:
//!
//! ```text
//!   Outline A ─┐                       ┌─► DistanceField A ─┐
//!              ├─► rasterize ─► build_sdf                   ├─► MorphFields
//!   Outline B ─┘                       └─► DistanceField B ─┘       │
//!                                                                    ▼
//!   SetupSender::complete() ──► SetupReceiver ──► MorphDriver::tick(now)
//!                                                        │
//!                                           composite(progress) ──► PixelBuffer
//!                                                        │
//!                                                        ▼
//!                                                  Wake (host schedules)
//! ```
//!
//! **[`outline`]** — Path descriptors, bounding boxes and the fit transform
//! that centers an outline in the canvas.
//!
//! **[`presets`]** — The built-in stool outline and the chair document's
//! location.
//!
//! **[`raster`]** — Scanline fill of an outline into an
//! [`OccupancyGrid`](raster::OccupancyGrid).
//!
//! **[`edt`]** — Separable exact Euclidean distance transform
//! (lower envelope of parabolas).
//!
//! **[`field`]** — Signed distance fields built from occupancy grids.
//!
//! **[`composite`]** — Field interpolation, bulge, smoothstep anti-aliasing
//! and pixel writes.
//!
//! **[`ease`]** — Timing curves.
//!
//! **[`setup`]** — One-time field construction and the one-shot readiness
//! signal between the host's async work and the driver.
//!
//! **[`driver`]** — The Pending/Holding/Morphing state machine.
//!
//! **[`time`]** — Monotonic host time and timebase conversion.
//!
//! **[`trace`]** — [`MorphSink`](trace::MorphSink) observability hooks with a
//! zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! **[`error`]** — [`MorphError`](error::MorphError).
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod composite;
pub mod driver;
pub mod ease;
pub mod edt;
pub mod error;
pub mod field;
pub mod outline;
pub mod presets;
pub mod raster;
pub mod setup;
pub mod time;
pub mod trace;
