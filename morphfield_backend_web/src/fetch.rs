// Copyright 2026 the Morphfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document fetching and media queries.

use alloc::string::String;

use js_sys::Promise;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

/// Fetches `url` and returns the response body as text.
///
/// # Errors
///
/// Returns the JS exception on network failure, or an error string when the
/// response status is not 2xx or the body is not text.
pub async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let request: Promise = window()?.fetch_with_str(url);
    let response = JsFuture::from(request).await?;
    let response: Response = response.dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&alloc::format!(
            "GET {url} returned {}",
            response.status()
        )));
    }
    let text: Promise = response.text()?;
    let body = JsFuture::from(text).await?;
    body.as_string()
        .ok_or_else(|| JsValue::from_str("response body is not text"))
}

/// Returns `true` when the user asked the system to minimize motion.
///
/// An unavailable media query counts as no preference.
#[must_use]
pub fn prefers_reduced_motion() -> bool {
    window()
        .ok()
        .and_then(|w| w.match_media(REDUCED_MOTION_QUERY).ok().flatten())
        .is_some_and(|list| list.matches())
}
