// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser console sink.

use alloc::format;

use wasm_bindgen::JsValue;
use web_sys::console;

use morphfield_core::trace::{MorphSink, SetupResolvedEvent};

/// A [`MorphSink`] that reports setup failures with `console.error`.
///
/// All other events are ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink;

impl MorphSink for ConsoleSink {
    fn on_setup_resolved(&mut self, e: &SetupResolvedEvent) {
        if let Some(err) = e.error {
            console::error_1(&JsValue::from_str(&format!("morphfield setup failed: {err}")));
        }
    }
}
