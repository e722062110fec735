// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The animation state machine.
//!
//! [`MorphDriver`] cycles `Pending → Holding → Morphing → Holding → …` for as
//! long as it is mounted. It never reads a clock or schedules anything
//! itself: the host calls [`MorphDriver::tick`] with the current
//! [`HostTime`], and the returned [`Wake`] says when the host should call
//! again.
//!
//! ```text
//!   Pending ──setup ok──► Holding ──hold elapsed──► Morphing
//!      │                     ▲                         │
//!   setup failed             └────── raw_t == 1 ───────┘
//!      │                          (direction flips)
//!      ▼
//!   Pending forever, Wake::Never
//! ```
//!
//! While pending, the setup channel is checked at most once per poll
//! interval. The first hold draws the first outline. Each morph draws one
//! frame per tick, and its final frame is exactly the endpoint the following
//! hold shows.

use crate::composite::{CompositeStats, MorphStyle, PixelBuffer, Rgb, composite, composite_single};
use crate::ease::Easing;
use crate::error::MorphError;
use crate::field::{DistanceField, build_sdf};
use crate::outline::{Canvas, Outline};
use crate::raster::rasterize;
use crate::setup::{MorphFields, SetupReceiver};
use crate::time::{Duration, HostTime, Timebase};
use crate::trace::{FrameEvent, PhaseChangeEvent, SetupResolvedEvent, TeardownEvent, Tracer};

/// Driver state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Waiting for setup to deliver both fields.
    Pending,
    /// Showing an endpoint for the hold duration.
    Holding,
    /// Interpolating between the endpoints.
    Morphing,
}

impl Phase {
    /// Short lowercase name, for logs and trace spans.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Holding => "holding",
            Self::Morphing => "morphing",
        }
    }
}

/// Which way the next morph runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// First outline to second.
    #[default]
    Forward,
    /// Second outline to first.
    Backward,
}

impl Direction {
    /// The opposite direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    /// Progress shown before a morph in this direction starts.
    #[must_use]
    pub const fn start_progress(self) -> f64 {
        match self {
            Self::Forward => 0.0,
            Self::Backward => 1.0,
        }
    }

    /// Maps eased time to progress.
    #[must_use]
    pub fn progress(self, eased: f64) -> f64 {
        match self {
            Self::Forward => eased,
            Self::Backward => 1.0 - eased,
        }
    }
}

/// Timing and look of a driver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriverConfig {
    /// Tick units of every [`HostTime`] passed to the driver.
    pub timebase: Timebase,
    /// Length of one morph.
    pub morph_duration: Duration,
    /// Pause at each endpoint.
    pub hold_duration: Duration,
    /// Minimum spacing between setup checks while pending.
    pub poll_interval: Duration,
    /// Timing curve of each morph.
    pub easing: Easing,
    /// Visual constants.
    pub style: MorphStyle,
    /// Fill color.
    pub color: Rgb,
}

impl DriverConfig {
    /// 4 s morphs, 0.5 s holds, 50 ms setup polling, quintic easing, liquid
    /// style, stool orange.
    #[must_use]
    pub const fn new(timebase: Timebase) -> Self {
        Self {
            timebase,
            morph_duration: Duration::from_millis(4000, timebase),
            hold_duration: Duration::from_millis(500, timebase),
            poll_interval: Duration::from_millis(50, timebase),
            easing: Easing::InOutQuint,
            style: MorphStyle::LIQUID,
            color: Rgb::STOOL_ORANGE,
        }
    }

    /// Sets the morph duration.
    #[must_use]
    pub const fn with_morph_duration(mut self, duration: Duration) -> Self {
        self.morph_duration = duration;
        self
    }

    /// Sets the hold duration.
    #[must_use]
    pub const fn with_hold_duration(mut self, duration: Duration) -> Self {
        self.hold_duration = duration;
        self
    }

    /// Sets the setup poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the timing curve.
    #[must_use]
    pub const fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Sets the visual constants.
    #[must_use]
    pub const fn with_style(mut self, style: MorphStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets the fill color.
    #[must_use]
    pub const fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }
}

/// When the host should tick the driver next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wake {
    /// On the next display frame.
    NextFrame,
    /// At or after the given time.
    At(HostTime),
    /// Not until something external changes. The driver is idle for good.
    Never,
}

/// Outcome of one [`MorphDriver::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    /// Set if the pixel buffer was rewritten and should be displayed.
    pub drawn: Option<CompositeStats>,
    /// When to tick next.
    pub wake: Wake,
}

impl FrameReport {
    const fn idle(wake: Wake) -> Self {
        Self { drawn: None, wake }
    }
}

/// Snapshot of a driver's state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationState {
    /// Current state.
    pub phase: Phase,
    /// Direction of the next (or current) morph.
    pub direction: Direction,
    /// When the current hold or morph began. `None` while pending.
    pub phase_start: Option<HostTime>,
    /// Completed morphs.
    pub cycle: u64,
    /// Frames written to the buffer.
    pub frames_drawn: u64,
}

enum Source {
    Waiting(SetupReceiver),
    Failed(MorphError),
    Ready(MorphFields),
    Still(DistanceField),
    Released,
}

/// Drives a ping-pong morph between two outlines.
pub struct MorphDriver {
    config: DriverConfig,
    source: Source,
    state: AnimationState,
    next_poll: Option<HostTime>,
    torn_down: bool,
}

impl core::fmt::Debug for MorphDriver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MorphDriver")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

impl MorphDriver {
    /// Creates a pending driver that animates once `setup` resolves.
    #[must_use]
    pub fn new(config: DriverConfig, setup: SetupReceiver) -> Self {
        Self {
            config,
            source: Source::Waiting(setup),
            state: AnimationState {
                phase: Phase::Pending,
                direction: Direction::Forward,
                phase_start: None,
                cycle: 0,
                frames_drawn: 0,
            },
            next_poll: None,
            torn_down: false,
        }
    }

    /// Creates a reduced-motion driver that draws `outline` once and then
    /// idles.
    ///
    /// # Errors
    ///
    /// Propagates fit and rasterization errors for `outline`.
    pub fn still(config: DriverConfig, outline: &Outline, canvas: Canvas) -> Result<Self, MorphError> {
        let fit = outline.fit(canvas)?;
        let field = build_sdf(&rasterize(outline, fit, canvas)?);
        Ok(Self {
            config,
            source: Source::Still(field),
            state: AnimationState {
                phase: Phase::Holding,
                direction: Direction::Forward,
                phase_start: None,
                cycle: 0,
                frames_drawn: 0,
            },
            next_poll: None,
            torn_down: false,
        })
    }

    /// The driver's configuration.
    #[must_use]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// The setup failure, if setup failed.
    #[must_use]
    pub fn setup_error(&self) -> Option<MorphError> {
        match self.source {
            Source::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Returns `true` after [`teardown`](Self::teardown).
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Advances the state machine to `now`, drawing into `buffer` if a frame
    /// is due.
    ///
    /// A failed setup is reported to `tracer` once; the driver then stays
    /// pending, returns [`Wake::Never`] and never touches `buffer`.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::CanvasMismatch`] if `buffer` does not match the
    /// fields.
    pub fn tick(
        &mut self,
        now: HostTime,
        buffer: &mut PixelBuffer,
        tracer: &mut Tracer<'_>,
    ) -> Result<FrameReport, MorphError> {
        if self.torn_down {
            return Ok(FrameReport::idle(Wake::Never));
        }
        match self.state.phase {
            Phase::Pending => self.poll_setup(now, buffer, tracer),
            Phase::Holding => self.hold(now, buffer, tracer),
            Phase::Morphing => self.morph(now, buffer, tracer),
        }
    }

    /// Composites an arbitrary `progress` into `buffer`, outside the timeline.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::SetupIncomplete`] while pending, after a failed
    /// setup, or after teardown, and [`MorphError::CanvasMismatch`] for a
    /// wrongly sized buffer.
    pub fn render(&self, progress: f64, buffer: &mut PixelBuffer) -> Result<CompositeStats, MorphError> {
        let DriverConfig { color, style, .. } = self.config;
        match &self.source {
            Source::Ready(fields) => {
                composite(fields.first(), fields.second(), progress, color, &style, buffer)
            }
            Source::Still(field) => composite_single(field, color, &style, buffer),
            Source::Waiting(_) | Source::Failed(_) | Source::Released => {
                Err(MorphError::SetupIncomplete)
            }
        }
    }

    /// Stops the driver for good and releases its fields.
    ///
    /// Every later [`tick`](Self::tick) returns [`Wake::Never`] without
    /// drawing. Calling this twice is harmless.
    pub fn teardown(&mut self, tracer: &mut Tracer<'_>) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.source = Source::Released;
        self.next_poll = None;
        tracer.teardown(&TeardownEvent {
            phase: self.state.phase,
            frames_drawn: self.state.frames_drawn,
        });
    }

    fn poll_setup(
        &mut self,
        now: HostTime,
        buffer: &mut PixelBuffer,
        tracer: &mut Tracer<'_>,
    ) -> Result<FrameReport, MorphError> {
        let Source::Waiting(receiver) = &mut self.source else {
            return Ok(FrameReport::idle(Wake::Never));
        };
        if let Some(next) = self.next_poll
            && now < next
        {
            return Ok(FrameReport::idle(Wake::At(next)));
        }
        match receiver.try_take() {
            None => {
                let next = now.saturating_add(self.config.poll_interval);
                self.next_poll = Some(next);
                Ok(FrameReport::idle(Wake::At(next)))
            }
            Some(Err(err)) => {
                self.source = Source::Failed(err);
                self.next_poll = None;
                tracer.setup_resolved(&SetupResolvedEvent {
                    at: now,
                    canvas: None,
                    error: Some(err),
                });
                Ok(FrameReport::idle(Wake::Never))
            }
            Some(Ok(fields)) => {
                tracer.setup_resolved(&SetupResolvedEvent {
                    at: now,
                    canvas: Some(fields.canvas()),
                    error: None,
                });
                self.source = Source::Ready(fields);
                self.next_poll = None;
                self.enter(Phase::Holding, now, tracer);
                let progress = self.state.direction.start_progress();
                let stats = self.draw(now, progress, progress, buffer, tracer)?;
                Ok(FrameReport {
                    drawn: Some(stats),
                    wake: Wake::At(now.saturating_add(self.config.hold_duration)),
                })
            }
        }
    }

    fn hold(
        &mut self,
        now: HostTime,
        buffer: &mut PixelBuffer,
        tracer: &mut Tracer<'_>,
    ) -> Result<FrameReport, MorphError> {
        if let Source::Still(_) = self.source {
            if self.state.frames_drawn > 0 {
                return Ok(FrameReport::idle(Wake::Never));
            }
            self.state.phase_start = Some(now);
            let stats = self.draw(now, 0.0, 0.0, buffer, tracer)?;
            return Ok(FrameReport {
                drawn: Some(stats),
                wake: Wake::Never,
            });
        }

        let start = self.state.phase_start.unwrap_or(now);
        let until = start.saturating_add(self.config.hold_duration);

        // The endpoint draw on entering the first hold may have failed.
        let drawn = if self.state.frames_drawn == 0 {
            let progress = self.state.direction.start_progress();
            Some(self.draw(now, progress, progress, buffer, tracer)?)
        } else {
            None
        };
        if now < until {
            return Ok(FrameReport {
                drawn,
                wake: Wake::At(until),
            });
        }
        self.enter(Phase::Morphing, now, tracer);
        Ok(FrameReport {
            drawn,
            wake: Wake::NextFrame,
        })
    }

    fn morph(
        &mut self,
        now: HostTime,
        buffer: &mut PixelBuffer,
        tracer: &mut Tracer<'_>,
    ) -> Result<FrameReport, MorphError> {
        let start = self.state.phase_start.unwrap_or(now);
        let raw_t = now
            .saturating_duration_since(start)
            .fraction_of(self.config.morph_duration);
        let eased = self.config.easing.apply(raw_t);
        let progress = self.state.direction.progress(eased);
        let stats = self.draw(now, raw_t, progress, buffer, tracer)?;

        if raw_t < 1.0 {
            return Ok(FrameReport {
                drawn: Some(stats),
                wake: Wake::NextFrame,
            });
        }
        self.state.direction = self.state.direction.flipped();
        self.state.cycle += 1;
        self.enter(Phase::Holding, now, tracer);
        Ok(FrameReport {
            drawn: Some(stats),
            wake: Wake::At(now.saturating_add(self.config.hold_duration)),
        })
    }

    fn enter(&mut self, phase: Phase, now: HostTime, tracer: &mut Tracer<'_>) {
        let from = self.state.phase;
        self.state.phase = phase;
        self.state.phase_start = Some(now);
        tracer.phase_change(&PhaseChangeEvent {
            at: now,
            from,
            to: phase,
            direction: self.state.direction,
            cycle: self.state.cycle,
        });
    }

    fn draw(
        &mut self,
        now: HostTime,
        raw_t: f64,
        progress: f64,
        buffer: &mut PixelBuffer,
        tracer: &mut Tracer<'_>,
    ) -> Result<CompositeStats, MorphError> {
        let stats = self.render(progress, buffer)?;
        tracer.frame(&FrameEvent {
            frame_index: self.state.frames_drawn,
            at: now,
            phase: self.state.phase,
            raw_t,
            progress,
            covered: stats.covered,
        });
        self.state.frames_drawn += 1;
        Ok(stats)
    }
}
