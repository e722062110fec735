// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`MorphSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to milliseconds using a [`Timebase`].

use std::io::Write;

use morphfield_core::time::{HostTime, Timebase};
use morphfield_core::trace::{
    FrameEvent, MorphSink, PhaseChangeEvent, SetupResolvedEvent, TeardownEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
    frames_only_every: u64,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .field("frames_only_every", &self.frames_only_every)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self::new(Box::new(std::io::stderr()), timebase)
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self::with_writer(writer, timebase)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self {
            writer,
            timebase,
            frames_only_every: 1,
        }
    }

    /// Prints only every `n`th frame event. Other events are always printed.
    ///
    /// A morph at display rate produces hundreds of frames; thinning keeps
    /// the log readable.
    #[must_use]
    pub fn every_nth_frame(mut self, n: u64) -> Self {
        self.frames_only_every = n.max(1);
        self
    }

    /// Consumes the sink and returns its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn host_ms(&self, t: HostTime) -> f64 {
        self.timebase.ticks_to_nanos(t.ticks()) as f64 / 1_000_000.0
    }
}

impl<W: Write> MorphSink for PrettyPrintSink<W> {
    fn on_setup_resolved(&mut self, e: &SetupResolvedEvent) {
        let at = self.host_ms(e.at);
        let _ = match (e.canvas, e.error) {
            (_, Some(err)) => writeln!(self.writer, "[setup] FAILED at {at:.1}ms: {err}"),
            (Some(canvas), None) => writeln!(
                self.writer,
                "[setup] ready at {at:.1}ms canvas={}x{}",
                canvas.width, canvas.height,
            ),
            (None, None) => writeln!(self.writer, "[setup] resolved at {at:.1}ms"),
        };
    }

    fn on_phase_change(&mut self, e: &PhaseChangeEvent) {
        let _ = writeln!(
            self.writer,
            "[phase] {} -> {} at {:.1}ms direction={:?} cycle={}",
            e.from.name(),
            e.to.name(),
            self.host_ms(e.at),
            e.direction,
            e.cycle,
        );
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        if e.frame_index % self.frames_only_every != 0 {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[frame] #{} {} at {:.1}ms t={:.3} p={:.3} covered={}",
            e.frame_index,
            e.phase.name(),
            self.host_ms(e.at),
            e.raw_t,
            e.progress,
            e.covered,
        );
    }

    fn on_teardown(&mut self, e: &TeardownEvent) {
        let _ = writeln!(
            self.writer,
            "[teardown] in {} after {} frames",
            e.phase.name(),
            e.frames_drawn,
        );
    }
}

#[cfg(test)]
mod tests {
    use morphfield_core::driver::{Direction, Phase};
    use morphfield_core::error::MorphError;

    use super::*;

    fn frame(index: u64) -> FrameEvent {
        FrameEvent {
            frame_index: index,
            at: HostTime(2_500_000_000),
            phase: Phase::Morphing,
            raw_t: 0.5,
            progress: 0.5,
            covered: 4321,
        }
    }

    #[test]
    fn pretty_print_frame() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::NANOS);
        sink.on_frame(&frame(12));
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert!(output.contains("[frame] #12 morphing"), "got: {output}");
        assert!(output.contains("at 2500.0ms"), "got: {output}");
        assert!(output.contains("covered=4321"), "got: {output}");
    }

    #[test]
    fn setup_failure_is_spelled_out() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::MICROS);
        sink.on_setup_resolved(&SetupResolvedEvent {
            at: HostTime(50_000),
            canvas: None,
            error: Some(MorphError::MissingPathData),
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert_eq!(
            output,
            "[setup] FAILED at 50.0ms: SVG document has no path data attribute\n"
        );
    }

    #[test]
    fn thinning_skips_frames_but_not_phases() {
        let mut sink =
            PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::NANOS).every_nth_frame(10);
        for i in 0..25 {
            sink.on_frame(&frame(i));
        }
        sink.on_phase_change(&PhaseChangeEvent {
            at: HostTime(0),
            from: Phase::Holding,
            to: Phase::Morphing,
            direction: Direction::Forward,
            cycle: 0,
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert_eq!(output.matches("[frame]").count(), 3, "frames 0, 10, 20");
        assert!(output.contains("[phase] holding -> morphing"), "got: {output}");
    }
}
