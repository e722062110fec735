// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end scenarios: outlines in, pixels out, through the driver.

use kurbo::Size;
use morphfield_core::composite::{MorphStyle, PixelBuffer, PixelFormat, Rgb, composite};
use morphfield_core::driver::{Direction, DriverConfig, MorphDriver, Phase, Wake};
use morphfield_core::error::{MorphError, OutlineDefect};
use morphfield_core::outline::{Canvas, Outline};
use morphfield_core::setup::{MorphFields, SetupReceiver, setup_channel};
use morphfield_core::time::{Duration, HostTime, Timebase};
use morphfield_core::trace::Tracer;

const CANVAS: Canvas = Canvas::new(8, 8);

fn outline(path: &str) -> Outline {
    Outline::new(path, Size::new(8.0, 8.0)).unwrap()
}

fn squares() -> MorphFields {
    MorphFields::build(
        &outline("M0 0 H8 V8 H0 Z"),
        &outline("M2 2 H6 V6 H2 Z"),
        CANVAS,
    )
    .unwrap()
}

#[test]
fn square_center_is_opaque_at_every_progress() {
    let fields = squares();
    let mut buf = PixelBuffer::new(CANVAS, PixelFormat::RGBA8);
    for step in 0..=20 {
        let p = f64::from(step) / 20.0;
        composite(
            fields.first(),
            fields.second(),
            p,
            Rgb::STOOL_ORANGE,
            &MorphStyle::LIQUID,
            &mut buf,
        )
        .unwrap();
        for (x, y) in [(3, 3), (4, 4), (3, 4), (4, 3)] {
            assert_eq!(buf.pixel(x, y)[3], 255, "center ({x}, {y}) at progress {p}");
        }
    }
}

#[test]
fn midpoint_stays_near_the_union() {
    let canvas = Canvas::new(24, 16);
    let size = Size::new(24.0, 16.0);
    // Overlapping in x 10..14, y 3..10.
    let left = Outline::new("M2 3 H14 V13 H2 Z", size).unwrap();
    let right = Outline::new("M10 2 H22 V10 H10 Z", size).unwrap();
    let fields = MorphFields::build(&left, &right, canvas).unwrap();
    let style = MorphStyle::LIQUID;

    let mut buf = PixelBuffer::new(canvas, PixelFormat::RGBA8);
    let stats = composite(
        fields.first(),
        fields.second(),
        0.5,
        Rgb::STOOL_ORANGE,
        &style,
        &mut buf,
    )
    .unwrap();
    assert!(stats.covered > 0, "something is drawn");
    assert_eq!(buf.pixel(12, 6)[3], 255, "the shared region is opaque");
    assert_eq!(buf.pixel(0, 15)[3], 0, "a far corner stays clear");

    let reach = style.aa_width + style.bulge_max;
    let mut checked = 0;
    for y in 0..canvas.height {
        for x in 0..canvas.width {
            if buf.pixel(x, y)[3] > 0 {
                let nearest = fields.first().get(x, y).min(fields.second().get(x, y));
                assert!(
                    nearest < reach,
                    "({x}, {y}) is drawn {nearest} px from both shapes"
                );
                checked += 1;
            }
        }
    }
    assert_eq!(checked, stats.covered, "every covered pixel was checked");
}

#[test]
fn malformed_second_outline_keeps_driver_pending() {
    let document = r#"<svg viewBox="0 0 8 8"><path d="M0 0 L banana"/></svg>"#;
    let second = Outline::from_svg_document(document, None);
    assert_eq!(
        second.as_ref().unwrap_err(),
        &MorphError::MalformedOutline(OutlineDefect::Unparseable)
    );

    let (tx, rx) = setup_channel();
    let config = DriverConfig::new(Timebase::NANOS);
    let mut driver = MorphDriver::new(config, rx);
    let mut buf = PixelBuffer::new(CANVAS, PixelFormat::RGBA8);
    let mut tracer = Tracer::none();

    let report = driver.tick(HostTime(0), &mut buf, &mut tracer).unwrap();
    assert!(matches!(report.wake, Wake::At(_)), "still polling");

    let first = outline("M0 0 H8 V8 H0 Z");
    tx.complete(second.and_then(|second| MorphFields::build(&first, &second, CANVAS)));

    let mut now = HostTime(0);
    for _ in 0..10 {
        now = now.saturating_add(config.poll_interval);
        let report = driver.tick(now, &mut buf, &mut tracer).unwrap();
        assert!(report.drawn.is_none(), "nothing drawn at {now:?}");
    }
    assert_eq!(driver.state().phase, Phase::Pending);
    assert!(driver.setup_error().is_some(), "failure is retained");
    assert!(buf.as_bytes().iter().all(|&b| b == 0), "buffer untouched");
}

#[test]
fn backward_morph_replays_forward_frames_in_reverse() {
    let fields = MorphFields::build(
        &outline("M1 1 H7 V7 H1 Z"),
        &outline("M1 7 L4 1 L7 7 Z"),
        CANVAS,
    )
    .unwrap();
    let config = DriverConfig::new(Timebase::NANOS)
        .with_morph_duration(Duration(8000))
        .with_hold_duration(Duration(500));
    let mut driver = MorphDriver::new(config, SetupReceiver::ready(Ok(fields)));
    let mut buf = PixelBuffer::new(CANVAS, PixelFormat::RGBA8);
    let mut tracer = Tracer::none();

    driver.tick(HostTime(0), &mut buf, &mut tracer).unwrap();
    let first_hold = buf.clone();

    let mut run = |start: u64, driver: &mut MorphDriver, buf: &mut PixelBuffer| {
        let report = driver.tick(HostTime(start), buf, &mut tracer).unwrap();
        assert_eq!(report.wake, Wake::NextFrame, "morph starts at {start}");
        (1..=8)
            .map(|k| {
                driver.tick(HostTime(start + 1000 * k), buf, &mut tracer).unwrap();
                buf.clone()
            })
            .collect::<Vec<_>>()
    };

    let forward = run(500, &mut driver, &mut buf);
    assert_eq!(driver.state().direction, Direction::Backward);
    let backward = run(9000, &mut driver, &mut buf);
    assert_eq!(driver.state().direction, Direction::Forward);

    // forward[i] is step i + 1 of 8; backward step k mirrors forward step 8 - k.
    for k in 1..8 {
        assert_eq!(backward[k - 1], forward[8 - k - 1], "backward step {k}");
    }
    assert_eq!(backward[7], first_hold, "backward ends on the first outline");
    assert_ne!(forward[3], first_hold, "the midpoint differs from the start");
}

#[test]
fn stool_canvas_from_svg_documents() {
    let seat = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 84 105">
        <path id="seat" fill="#000" d="M10 10 H74 V40 H60 V95 H52 V40 H32 V95 H24 V40 H10 Z"/>
    </svg>"##;
    let stool = r#"<svg viewBox="0 0 710 1027"><path d="M100 80 C250 0 460 0 610 80 L560 980 H480 L420 300 H290 L230 980 H150 Z"/></svg>"#;
    let a = Outline::from_svg_document(seat, None).unwrap();
    let b = Outline::from_svg_document(stool, None).unwrap();
    let fields = MorphFields::build(&a, &b, Canvas::STOOL).unwrap();
    assert_eq!(fields.canvas(), Canvas::STOOL);

    let mut buf = PixelBuffer::new(Canvas::STOOL, PixelFormat::RGBA8);
    for p in [0.0, 0.5, 1.0] {
        let stats = composite(
            fields.first(),
            fields.second(),
            p,
            Rgb::STOOL_ORANGE,
            &MorphStyle::LIQUID,
            &mut buf,
        )
        .unwrap();
        assert!(stats.covered > 1000, "progress {p} covers {stats:?}");
    }
}
