//! WASM bindings for timeline-engine.
//!
//! Exposes occurrence expansion, live-feed reconciliation, and the relevance
//! predicate to a JavaScript host via `wasm-bindgen`. All complex values
//! cross the boundary as JSON strings.
//!
//! Error policy follows the engine: a malformed interval or a malformed
//! record degrades to "produce nothing for this record" — only a payload
//! that is not JSON at all surfaces as a JS error.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p timeline-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/timeline-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/timeline_engine_wasm.wasm
//! ```

use chrono::{DateTime, Utc};
use timeline_engine::wire::{parse_instant, RawEventDefinition};
use timeline_engine::{expand, is_relevant, DisplaySet, EventDefinition, FeedMessage};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse both window bounds. `None` when either bound is unreadable — the
/// callers then degrade instead of throwing.
fn parse_window(range_start: &str, range_end: &str) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    Some((parse_instant(range_start)?, parse_instant(range_end)?))
}

/// Decode a JSON array of wire records, dropping individually corrupt ones.
fn parse_definitions_json(json: &str) -> Result<Vec<EventDefinition>, JsValue> {
    let raw: Vec<RawEventDefinition> = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid definitions JSON: {}", e)))?;

    Ok(raw
        .into_iter()
        .filter_map(RawEventDefinition::into_definition)
        .collect())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Expand event definitions into the occurrences intersecting
/// `[range_start, range_end]`.
///
/// `definitions_json` is a JSON array of event definition objects
/// (camelCase, ISO-8601 instant strings). Returns a JSON array of occurrence
/// objects. An unreadable or inverted window yields `"[]"`.
#[wasm_bindgen(js_name = "expandOccurrences")]
pub fn expand_occurrences(
    definitions_json: &str,
    range_start: &str,
    range_end: &str,
) -> Result<String, JsValue> {
    let definitions = parse_definitions_json(definitions_json)?;

    let occurrences = match parse_window(range_start, range_end) {
        Some((start, end)) => expand(&definitions, start, end),
        None => Vec::new(),
    };

    to_json(&occurrences)
}

/// Apply one live-feed message to a display set under the active window.
///
/// `display_json` is a JSON array of event definition objects;
/// `message_json` is one feed message (`{type, data}`). Returns the updated
/// definition set as a JSON array sorted by id, so output is deterministic
/// across calls. Unrecognized message types and unreadable windows leave the
/// set unchanged.
#[wasm_bindgen(js_name = "applyFeedMessage")]
pub fn apply_feed_message(
    display_json: &str,
    message_json: &str,
    range_start: &str,
    range_end: &str,
) -> Result<String, JsValue> {
    let mut set = DisplaySet::new();
    set.load(parse_definitions_json(display_json)?);

    let message: FeedMessage = serde_json::from_str(message_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid feed message JSON: {}", e)))?;

    if let (Some((start, end)), Some(delta)) =
        (parse_window(range_start, range_end), message.into_delta())
    {
        set.apply(delta, start, end);
    }

    let mut definitions = set.snapshot();
    definitions.sort_by(|a, b| a.id.cmp(&b.id));
    to_json(&definitions)
}

/// Decide whether a definition can contribute any occurrence to the window.
///
/// Returns `false` for unreadable windows and for records the engine would
/// drop (e.g. an unparseable `startTime`).
#[wasm_bindgen(js_name = "isRelevant")]
pub fn is_relevant_js(
    definition_json: &str,
    range_start: &str,
    range_end: &str,
) -> Result<bool, JsValue> {
    let raw: RawEventDefinition = serde_json::from_str(definition_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid definition JSON: {}", e)))?;

    let Some(definition) = raw.into_definition() else {
        return Ok(false);
    };
    let Some((start, end)) = parse_window(range_start, range_end) else {
        return Ok(false);
    };

    Ok(is_relevant(&definition, start, end))
}
