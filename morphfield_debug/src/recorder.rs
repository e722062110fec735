// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`MorphSink`] and encodes events into a
//! `Vec<u8>` as tagged little-endian records. [`decode`] reads them back as
//! an iterator of [`RecordedEvent`]. Floats are stored as their IEEE bit
//! patterns, so decoded events compare equal to the originals.

use morphfield_core::driver::{Direction, Phase};
use morphfield_core::error::{MorphError, OutlineDefect};
use morphfield_core::outline::Canvas;
use morphfield_core::time::HostTime;
use morphfield_core::trace::{
    FrameEvent, MorphSink, PhaseChangeEvent, SetupResolvedEvent, TeardownEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_SETUP_RESOLVED: u8 = 1;
const TAG_PHASE_CHANGE: u8 = 2;
const TAG_FRAME: u8 = 3;
const TAG_TEARDOWN: u8 = 4;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`MorphSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_phase(&mut self, p: Phase) {
        self.write_u8(match p {
            Phase::Pending => 0,
            Phase::Holding => 1,
            Phase::Morphing => 2,
        });
    }

    fn write_direction(&mut self, d: Direction) {
        self.write_u8(match d {
            Direction::Forward => 0,
            Direction::Backward => 1,
        });
    }

    fn write_option_canvas(&mut self, c: Option<Canvas>) {
        match c {
            Some(canvas) => {
                self.write_u8(1);
                self.write_u32(canvas.width);
                self.write_u32(canvas.height);
            }
            None => {
                self.write_u8(0);
                self.write_u32(0);
                self.write_u32(0);
            }
        }
    }

    fn write_option_error(&mut self, e: Option<MorphError>) {
        match e {
            None => self.write_u8(0),
            Some(MorphError::MalformedOutline(defect)) => {
                self.write_u8(1);
                self.write_u8(match defect {
                    OutlineDefect::Unparseable => 0,
                    OutlineDefect::Empty => 1,
                    OutlineDefect::NonFinite => 2,
                });
            }
            Some(MorphError::DegenerateBoundingBox { width, height }) => {
                self.write_u8(2);
                self.write_f64(width);
                self.write_f64(height);
            }
            Some(MorphError::EmptyCanvas) => self.write_u8(3),
            Some(MorphError::MissingPathData) => self.write_u8(4),
            Some(MorphError::CanvasMismatch { expected, found }) => {
                self.write_u8(5);
                self.write_u32(expected.0);
                self.write_u32(expected.1);
                self.write_u32(found.0);
                self.write_u32(found.1);
            }
            Some(MorphError::SetupIncomplete) => self.write_u8(6),
            Some(MorphError::SetupAbandoned) => self.write_u8(7),
        }
    }
}

impl MorphSink for RecorderSink {
    fn on_setup_resolved(&mut self, e: &SetupResolvedEvent) {
        self.write_u8(TAG_SETUP_RESOLVED);
        self.write_u64(e.at.ticks());
        self.write_option_canvas(e.canvas);
        self.write_option_error(e.error);
    }

    fn on_phase_change(&mut self, e: &PhaseChangeEvent) {
        self.write_u8(TAG_PHASE_CHANGE);
        self.write_u64(e.at.ticks());
        self.write_phase(e.from);
        self.write_phase(e.to);
        self.write_direction(e.direction);
        self.write_u64(e.cycle);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.write_u8(TAG_FRAME);
        self.write_u64(e.frame_index);
        self.write_u64(e.at.ticks());
        self.write_phase(e.phase);
        self.write_f64(e.raw_t);
        self.write_f64(e.progress);
        self.write_u64(e.covered as u64);
    }

    fn on_teardown(&mut self, e: &TeardownEvent) {
        self.write_u8(TAG_TEARDOWN);
        self.write_phase(e.phase);
        self.write_u64(e.frames_drawn);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`SetupResolvedEvent`].
    SetupResolved(SetupResolvedEvent),
    /// A [`PhaseChangeEvent`].
    PhaseChange(PhaseChangeEvent),
    /// A [`FrameEvent`].
    Frame(FrameEvent),
    /// A [`TeardownEvent`].
    Teardown(TeardownEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_phase(&mut self) -> Option<Phase> {
        Some(match self.read_u8()? {
            0 => Phase::Pending,
            1 => Phase::Holding,
            _ => Phase::Morphing,
        })
    }

    fn read_direction(&mut self) -> Option<Direction> {
        Some(match self.read_u8()? {
            0 => Direction::Forward,
            _ => Direction::Backward,
        })
    }

    fn read_option_canvas(&mut self) -> Option<Option<Canvas>> {
        let present = self.read_u8()?;
        let canvas = Canvas::new(self.read_u32()?, self.read_u32()?);
        Some((present != 0).then_some(canvas))
    }

    fn read_option_error(&mut self) -> Option<Option<MorphError>> {
        Some(Some(match self.read_u8()? {
            0 => return Some(None),
            1 => MorphError::MalformedOutline(match self.read_u8()? {
                0 => OutlineDefect::Unparseable,
                1 => OutlineDefect::Empty,
                _ => OutlineDefect::NonFinite,
            }),
            2 => MorphError::DegenerateBoundingBox {
                width: self.read_f64()?,
                height: self.read_f64()?,
            },
            3 => MorphError::EmptyCanvas,
            4 => MorphError::MissingPathData,
            5 => MorphError::CanvasMismatch {
                expected: (self.read_u32()?, self.read_u32()?),
                found: (self.read_u32()?, self.read_u32()?),
            },
            6 => MorphError::SetupIncomplete,
            _ => MorphError::SetupAbandoned,
        }))
    }

    fn decode_setup_resolved(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::SetupResolved(SetupResolvedEvent {
            at: HostTime(self.read_u64()?),
            canvas: self.read_option_canvas()?,
            error: self.read_option_error()?,
        }))
    }

    fn decode_phase_change(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseChange(PhaseChangeEvent {
            at: HostTime(self.read_u64()?),
            from: self.read_phase()?,
            to: self.read_phase()?,
            direction: self.read_direction()?,
            cycle: self.read_u64()?,
        }))
    }

    fn decode_frame(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Frame(FrameEvent {
            frame_index: self.read_u64()?,
            at: HostTime(self.read_u64()?),
            phase: self.read_phase()?,
            raw_t: self.read_f64()?,
            progress: self.read_f64()?,
            covered: usize::try_from(self.read_u64()?).ok()?,
        }))
    }

    fn decode_teardown(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Teardown(TeardownEvent {
            phase: self.read_phase()?,
            frames_drawn: self.read_u64()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_SETUP_RESOLVED => self.decode_setup_resolved(),
            TAG_PHASE_CHANGE => self.decode_phase_change(),
            TAG_FRAME => self.decode_frame(),
            TAG_TEARDOWN => self.decode_teardown(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> FrameEvent {
        FrameEvent {
            frame_index: 41,
            at: HostTime(1_234_567),
            phase: Phase::Morphing,
            raw_t: 0.3,
            progress: 0.1,
            covered: 9000,
        }
    }

    #[test]
    fn mixed_session_decodes_in_order() {
        let mut rec = RecorderSink::new();
        let setup = SetupResolvedEvent {
            at: HostTime(50),
            canvas: Some(Canvas::STOOL),
            error: None,
        };
        let phase = PhaseChangeEvent {
            at: HostTime(50),
            from: Phase::Pending,
            to: Phase::Holding,
            direction: Direction::Forward,
            cycle: 0,
        };
        let teardown = TeardownEvent {
            phase: Phase::Morphing,
            frames_drawn: 42,
        };
        rec.on_setup_resolved(&setup);
        rec.on_phase_change(&phase);
        rec.on_frame(&sample_frame());
        rec.on_teardown(&teardown);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events,
            [
                RecordedEvent::SetupResolved(setup),
                RecordedEvent::PhaseChange(phase),
                RecordedEvent::Frame(sample_frame()),
                RecordedEvent::Teardown(teardown),
            ]
        );
    }

    #[test]
    fn setup_errors_keep_their_payload() {
        let errors = [
            MorphError::MalformedOutline(OutlineDefect::NonFinite),
            MorphError::DegenerateBoundingBox {
                width: 84.0,
                height: 0.0,
            },
            MorphError::CanvasMismatch {
                expected: (226, 283),
                found: (8, 8),
            },
            MorphError::SetupAbandoned,
        ];
        let mut rec = RecorderSink::new();
        for err in errors {
            rec.on_setup_resolved(&SetupResolvedEvent {
                at: HostTime(7),
                canvas: None,
                error: Some(err),
            });
        }
        let decoded: Vec<_> = decode(rec.as_bytes())
            .map(|e| match e {
                RecordedEvent::SetupResolved(e) => e.error,
                other => panic!("expected SetupResolved, got {other:?}"),
            })
            .collect();
        assert_eq!(decoded, errors.map(Some));
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_frame(&sample_frame());
        rec.on_frame(&sample_frame());
        let bytes = rec.into_bytes();
        let cut = &bytes[..bytes.len() - 3];
        assert_eq!(decode(cut).count(), 1);
    }

    #[test]
    fn unknown_tag_stops_iteration() {
        assert_eq!(decode(&[0xEE, 1, 2, 3]).count(), 0);
    }

    #[test]
    fn abandoned_setup_reaches_the_sink() {
        use morphfield_core::composite::{PixelBuffer, PixelFormat};
        use morphfield_core::driver::{DriverConfig, MorphDriver};
        use morphfield_core::setup::setup_channel;
        use morphfield_core::time::Timebase;
        use morphfield_core::trace::Tracer;

        let (sender, receiver) = setup_channel();
        drop(sender);
        let mut driver = MorphDriver::new(DriverConfig::new(Timebase::NANOS), receiver);
        let mut buf = PixelBuffer::new(Canvas::new(8, 8), PixelFormat::RGBA8);
        let mut rec = RecorderSink::new();
        for t in [0, 50_000_000, 100_000_000] {
            let mut tracer = Tracer::new(&mut rec);
            driver.tick(HostTime(t), &mut buf, &mut tracer).unwrap();
        }

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events,
            [RecordedEvent::SetupResolved(SetupResolvedEvent {
                at: HostTime(0),
                canvas: None,
                error: Some(MorphError::SetupAbandoned),
            })],
            "the failure is reported exactly once"
        );
        assert!(buf.as_bytes().iter().all(|&b| b == 0), "buffer untouched");
    }
}
