// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-time field construction and the readiness signal.
//!
//! The host obtains the second outline asynchronously (a fetch on the web),
//! builds both fields with [`MorphFields::build`], and hands the result to
//! [`SetupSender::complete`]. The driver holds the matching
//! [`SetupReceiver`] and polls it while pending. Everything runs on one
//! thread, so the channel is a shared slot rather than a synchronized queue.
//!
//! Dropping a sender without completing it resolves the channel with
//! [`MorphError::SetupAbandoned`], so the driver can tell a setup that is
//! still running from one that will never finish.

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use crate::edt::EdtScratch;
use crate::error::MorphError;
use crate::field::{DistanceField, build_sdf_with};
use crate::outline::{Canvas, Outline};
use crate::raster::rasterize;

/// Both distance fields of a morph, built for one canvas size.
#[derive(Clone, Debug)]
pub struct MorphFields {
    first: DistanceField,
    second: DistanceField,
}

impl MorphFields {
    /// Fits, rasterizes and transforms both outlines for `canvas`.
    ///
    /// # Errors
    ///
    /// Returns the first error from fitting or rasterizing either outline.
    pub fn build(first: &Outline, second: &Outline, canvas: Canvas) -> Result<Self, MorphError> {
        let mut scratch = EdtScratch::new();
        let mut field = |outline: &Outline| -> Result<DistanceField, MorphError> {
            let fit = outline.fit(canvas)?;
            let occupancy = rasterize(outline, fit, canvas)?;
            Ok(build_sdf_with(&occupancy, &mut scratch))
        };
        let first = field(first)?;
        let second = field(second)?;
        Ok(Self { first, second })
    }

    /// Pairs two prebuilt fields.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::CanvasMismatch`] if their sizes differ.
    pub fn from_fields(first: DistanceField, second: DistanceField) -> Result<Self, MorphError> {
        if first.canvas() != second.canvas() {
            let (e, f) = (first.canvas(), second.canvas());
            return Err(MorphError::CanvasMismatch {
                expected: (e.width, e.height),
                found: (f.width, f.height),
            });
        }
        Ok(Self { first, second })
    }

    /// The field shown at progress 0.
    #[must_use]
    pub fn first(&self) -> &DistanceField {
        &self.first
    }

    /// The field shown at progress 1.
    #[must_use]
    pub fn second(&self) -> &DistanceField {
        &self.second
    }

    /// Size both fields were built for.
    #[must_use]
    pub fn canvas(&self) -> Canvas {
        self.first.canvas()
    }
}

enum Slot {
    Waiting,
    Ready(Result<MorphFields, MorphError>),
    Taken,
}

/// Creates a connected sender/receiver pair.
#[must_use]
pub fn setup_channel() -> (SetupSender, SetupReceiver) {
    let shared = Rc::new(RefCell::new(Slot::Waiting));
    (
        SetupSender {
            shared: Some(Rc::clone(&shared)),
        },
        SetupReceiver { shared },
    )
}

/// Completes a setup exactly once.
pub struct SetupSender {
    shared: Option<Rc<RefCell<Slot>>>,
}

impl SetupSender {
    /// Delivers the setup result.
    pub fn complete(mut self, result: Result<MorphFields, MorphError>) {
        if let Some(shared) = self.shared.take() {
            *shared.borrow_mut() = Slot::Ready(result);
        }
    }

    /// Returns `true` once the receiver is gone and a result would be
    /// discarded.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.shared
            .as_ref()
            .is_none_or(|shared| Rc::strong_count(shared) == 1)
    }
}

impl Drop for SetupSender {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.take() {
            let mut slot = shared.borrow_mut();
            if matches!(*slot, Slot::Waiting) {
                *slot = Slot::Ready(Err(MorphError::SetupAbandoned));
            }
        }
    }
}

impl fmt::Debug for SetupSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetupSender")
            .field("canceled", &self.is_canceled())
            .finish()
    }
}

/// Observes a setup result at most once.
pub struct SetupReceiver {
    shared: Rc<RefCell<Slot>>,
}

impl SetupReceiver {
    /// Takes the result if it has arrived.
    ///
    /// Returns `None` while the setup is running and after the result has
    /// been taken.
    pub fn try_take(&mut self) -> Option<Result<MorphFields, MorphError>> {
        let mut slot = self.shared.borrow_mut();
        match core::mem::replace(&mut *slot, Slot::Taken) {
            Slot::Ready(result) => Some(result),
            Slot::Waiting => {
                *slot = Slot::Waiting;
                None
            }
            Slot::Taken => None,
        }
    }

    /// Creates a receiver that is already resolved.
    #[must_use]
    pub fn ready(result: Result<MorphFields, MorphError>) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Slot::Ready(result))),
        }
    }
}

impl fmt::Debug for SetupReceiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match *self.shared.borrow() {
            Slot::Waiting => "waiting",
            Slot::Ready(Ok(_)) => "ready",
            Slot::Ready(Err(_)) => "failed",
            Slot::Taken => "taken",
        };
        f.debug_struct("SetupReceiver").field("state", &state).finish()
    }
}
