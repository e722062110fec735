// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Driver states become `B`/`E` duration spans, drawn frames become instants,
//! and morph progress is plotted as a counter track.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use morphfield_core::driver::Phase;
use morphfield_core::time::Timebase;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
/// A state still open at the end of the recording (or at teardown) is closed
/// at the last timestamp seen.
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut open: Option<Phase> = None;
    let mut last_us = 0.0;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::SetupResolved(e) => {
                last_us = ticks_to_us(e.at.ticks(), timebase);
                events.push(json!({
                    "ph": "i",
                    "name": if e.error.is_some() { "SetupFailed" } else { "SetupReady" },
                    "cat": "Setup",
                    "ts": last_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "canvas": e.canvas.map(|c| format!("{}x{}", c.width, c.height)),
                        "error": e.error.map(|err| err.to_string()),
                    }
                }));
            }
            RecordedEvent::PhaseChange(e) => {
                last_us = ticks_to_us(e.at.ticks(), timebase);
                if let Some(phase) = open.take() {
                    events.push(span_end(phase, last_us));
                }
                events.push(json!({
                    "ph": "B",
                    "name": e.to.name(),
                    "cat": "Driver",
                    "ts": last_us,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "direction": format!("{:?}", e.direction),
                        "cycle": e.cycle,
                    }
                }));
                open = Some(e.to);
            }
            RecordedEvent::Frame(e) => {
                last_us = ticks_to_us(e.at.ticks(), timebase);
                events.push(json!({
                    "ph": "i",
                    "name": "Frame",
                    "cat": "Frame",
                    "ts": last_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "raw_t": e.raw_t,
                        "covered": e.covered,
                    }
                }));
                events.push(json!({
                    "ph": "C",
                    "name": "progress",
                    "ts": last_us,
                    "pid": 0,
                    "args": { "progress": e.progress }
                }));
            }
            RecordedEvent::Teardown(e) => {
                if let Some(phase) = open.take() {
                    events.push(span_end(phase, last_us));
                }
                events.push(json!({
                    "ph": "i",
                    "name": "Teardown",
                    "cat": "Driver",
                    "ts": last_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": { "frames_drawn": e.frames_drawn }
                }));
            }
        }
    }
    if let Some(phase) = open {
        events.push(span_end(phase, last_us));
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn span_end(phase: Phase, ts: f64) -> Value {
    json!({
        "ph": "E",
        "name": phase.name(),
        "cat": "Driver",
        "ts": ts,
        "pid": 0,
        "tid": 0,
    })
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use morphfield_core::driver::Direction;
    use morphfield_core::error::MorphError;
    use morphfield_core::outline::Canvas;
    use morphfield_core::time::HostTime;
    use morphfield_core::trace::{
        FrameEvent, MorphSink, PhaseChangeEvent, SetupResolvedEvent, TeardownEvent,
    };

    fn change(at: u64, from: Phase, to: Phase) -> PhaseChangeEvent {
        PhaseChangeEvent {
            at: HostTime(at),
            from,
            to,
            direction: Direction::Forward,
            cycle: 0,
        }
    }

    #[test]
    fn export_produces_spans_instants_and_counters() {
        let mut rec = RecorderSink::new();
        rec.on_setup_resolved(&SetupResolvedEvent {
            at: HostTime(1_000),
            canvas: Some(Canvas::STOOL),
            error: None,
        });
        rec.on_phase_change(&change(1_000, Phase::Pending, Phase::Holding));
        rec.on_phase_change(&change(501_000, Phase::Holding, Phase::Morphing));
        rec.on_frame(&FrameEvent {
            frame_index: 1,
            at: HostTime(517_000),
            phase: Phase::Morphing,
            raw_t: 0.004,
            progress: 0.0,
            covered: 5000,
        });
        rec.on_teardown(&TeardownEvent {
            phase: Phase::Morphing,
            frames_drawn: 2,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), Timebase::NANOS, &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&String::from_utf8(out).unwrap()).unwrap();

        let phases: Vec<_> = parsed.iter().map(|e| e["ph"].as_str().unwrap()).collect();
        assert_eq!(phases, ["i", "B", "E", "B", "i", "C", "E", "i"]);
        assert_eq!(parsed[0]["name"], "SetupReady");
        assert_eq!(parsed[0]["args"]["canvas"], "226x283");
        assert_eq!(parsed[1]["name"], "holding");
        assert_eq!(parsed[2]["name"], "holding");
        assert_eq!(parsed[2]["ts"], 501.0);
        assert_eq!(parsed[5]["args"]["progress"], 0.0);
        assert_eq!(parsed[6]["name"], "morphing");
        assert_eq!(parsed[6]["ts"], 517.0, "closed at the last timestamp");
    }

    #[test]
    fn failed_setup_carries_the_message() {
        let mut rec = RecorderSink::new();
        rec.on_setup_resolved(&SetupResolvedEvent {
            at: HostTime(0),
            canvas: None,
            error: Some(MorphError::SetupAbandoned),
        });
        let mut out = Vec::new();
        export(rec.as_bytes(), Timebase::NANOS, &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["name"], "SetupFailed");
        assert_eq!(
            parsed[0]["args"]["error"],
            "setup was dropped without a result"
        );
    }

    #[test]
    fn unfinished_span_is_closed() {
        let mut rec = RecorderSink::new();
        rec.on_phase_change(&change(0, Phase::Pending, Phase::Holding));
        let mut out = Vec::new();
        export(rec.as_bytes(), Timebase::NANOS, &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1]["ph"], "E");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], Timebase::NANOS, &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert!(parsed.is_empty(), "no events");
    }
}
