// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated frame loop that exercises the whole morph pipeline.
//!
//! Builds the stool and chair fields after a simulated fetch delay, runs the
//! driver at 60 Hz (jumping straight to timer wakeups during holds) for two
//! full ping-pong cycles, and records events to both a
//! [`PrettyPrintSink`](morphfield_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](morphfield_debug::recorder::RecorderSink). The recording
//! is exported as a Chrome trace JSON file.

use std::error::Error;
use std::fs::File;
use std::io::BufWriter;

use morphfield_core::composite::{PixelBuffer, PixelFormat};
use morphfield_core::driver::{DriverConfig, MorphDriver, Wake};
use morphfield_core::outline::{Canvas, Outline};
use morphfield_core::presets;
use morphfield_core::setup::{MorphFields, setup_channel};
use morphfield_core::time::{Duration, HostTime, Timebase};
use morphfield_core::trace::{
    FrameEvent, MorphSink, PhaseChangeEvent, SetupResolvedEvent, TeardownEvent, Tracer,
};

use morphfield_debug::pretty::PrettyPrintSink;
use morphfield_debug::recorder::RecorderSink;

/// 16.6ms refresh interval in nanoseconds (≈60 Hz).
const REFRESH_INTERVAL_NS: u64 = 16_666_667;
/// Simulated network latency before the chair document arrives.
const FETCH_LATENCY_MS: u64 = 180;
const CYCLES: u64 = 4;

const CHAIR_DOCUMENT: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 710 1027" fill="none">
  <path fill="#FF5300" d="M120 40 C300 -10 410 -10 590 40 L570 520 H650 V600 L600 1020 H540 L520 640 H190 L170 1020 H110 L60 600 V520 H140 Z"/>
</svg>"##;

/// Forwards every event to both debug sinks.
struct Fanout {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl MorphSink for Fanout {
    fn on_setup_resolved(&mut self, e: &SetupResolvedEvent) {
        self.pretty.on_setup_resolved(e);
        self.recorder.on_setup_resolved(e);
    }

    fn on_phase_change(&mut self, e: &PhaseChangeEvent) {
        self.pretty.on_phase_change(e);
        self.recorder.on_phase_change(e);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.pretty.on_frame(e);
        self.recorder.on_frame(e);
    }

    fn on_teardown(&mut self, e: &TeardownEvent) {
        self.pretty.on_teardown(e);
        self.recorder.on_teardown(e);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let timebase = Timebase::NANOS;
    let canvas = Canvas::STOOL;

    // -- sinks -------------------------------------------------------------
    let mut sinks = Fanout {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout()), timebase).every_nth_frame(30),
        recorder: RecorderSink::new(),
    };

    // -- driver ------------------------------------------------------------
    let config = DriverConfig::new(timebase);
    let (sender, receiver) = setup_channel();
    let mut driver = MorphDriver::new(config, receiver);
    let mut buffer = PixelBuffer::new(canvas, PixelFormat::RGBA8);

    let stool = presets::stool()?;
    let mut sender = Some(sender);

    // -- simulated loop ----------------------------------------------------
    let start = HostTime(1_000_000_000); // start at 1s
    let fetched_at = start.saturating_add(Duration::from_millis(FETCH_LATENCY_MS, timebase));
    let mut now = start;

    while driver.state().cycle < CYCLES {
        if now >= fetched_at
            && let Some(sender) = sender.take()
        {
            let chair = Outline::from_svg_document(CHAIR_DOCUMENT, None)?;
            sender.complete(MorphFields::build(&stool, &chair, canvas));
        }

        let report = {
            let mut tracer = Tracer::new(&mut sinks);
            driver.tick(now, &mut buffer, &mut tracer)?
        };
        if let Some(err) = driver.setup_error() {
            return Err(err.into());
        }

        now = match report.wake {
            Wake::NextFrame => HostTime(now.ticks() + REFRESH_INTERVAL_NS),
            Wake::At(at) => at.max(HostTime(now.ticks() + 1)),
            Wake::Never => break,
        };
    }

    let frames_drawn = driver.state().frames_drawn;
    driver.teardown(&mut Tracer::new(&mut sinks));

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let mut writer = BufWriter::new(File::create(path)?);
    morphfield_debug::chrome::export(sinks.recorder.as_bytes(), timebase, &mut writer)?;

    println!("Wrote {path} ({frames_drawn} frames over {CYCLES} morphs)");
    Ok(())
}
