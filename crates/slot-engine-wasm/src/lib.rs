//! WASM bindings for slot-engine.
//!
//! Exposes slot evaluation, the conflict pre-check and the day timeline to the
//! browser front end via `wasm-bindgen`. All complex types cross the boundary
//! as JSON strings:
//!
//! - `snapshotJson`: a day snapshot (`{day, timezone?, bookings, unavailability}`)
//! - `requestJson`: engine settings (`{workday_start?, workday_end?,
//!   granularity_minutes?, duration_minutes?, occupancy?, timezone?}`); every
//!   key is optional, `""` or `"{}"` means defaults
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/src/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use slot_engine::parse::parse_time_of_day;
use slot_engine::{DaySnapshot, EngineConfig, ResolvedDay, SlotError, SlotRequest};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// JSON-in / JSON-out core, kept free of JsValue so it runs in native tests
// ---------------------------------------------------------------------------

fn load(snapshot_json: &str, request_json: &str) -> Result<(ResolvedDay, SlotRequest), String> {
    let config: EngineConfig = if request_json.trim().is_empty() {
        EngineConfig::default()
    } else {
        serde_json::from_str(request_json).map_err(|e| format!("Invalid request JSON: {}", e))?
    };
    let request = config.slot_request().map_err(to_message)?;
    let timezone = config.timezone().map_err(to_message)?;

    let day = DaySnapshot::from_json(snapshot_json)
        .and_then(|s| s.resolve_in(timezone))
        .map_err(to_message)?;
    Ok((day, request))
}

fn evaluate_json(snapshot_json: &str, request_json: &str, exclude: Option<&str>) -> Result<String, String> {
    let (day, request) = load(snapshot_json, request_json)?;
    let slots = day.evaluate(&request, exclude).map_err(to_message)?;
    to_json(&slots)
}

fn conflicts_json(
    snapshot_json: &str,
    request_json: &str,
    start: &str,
    exclude: Option<&str>,
) -> Result<String, String> {
    let (day, request) = load(snapshot_json, request_json)?;
    let start = parse_time_of_day(start).map_err(to_message)?;
    let conflicts = day.conflicts_at(start, &request, exclude).map_err(to_message)?;
    to_json(&conflicts)
}

fn timeline_json(snapshot_json: &str, request_json: &str, exclude: Option<&str>) -> Result<String, String> {
    let (day, request) = load(snapshot_json, request_json)?;
    let timeline = day.timeline(&request, exclude).map_err(to_message)?;
    to_json(&timeline)
}

fn to_message(e: SlotError) -> String {
    e.to_string()
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Classify every candidate slot of the snapshot's day.
///
/// Returns a JSON array of `{start, end, status}` objects where `status` is
/// `"available"`, `"booked"` or `"unavailable"`. Pass the id of a booking being
/// rescheduled as `exclude` so it does not conflict with itself.
#[wasm_bindgen(js_name = "evaluateSlots")]
pub fn evaluate_slots(
    snapshot_json: &str,
    request_json: &str,
    exclude: Option<String>,
) -> Result<String, JsValue> {
    evaluate_json(snapshot_json, request_json, exclude.as_deref()).map_err(|e| JsValue::from_str(&e))
}

/// Bookings that would overlap an appointment starting at `start` (`HH:MM`).
///
/// Returns a JSON array of `{booking, overlap_minutes}` objects; empty means
/// the proposal is clear in this snapshot. The backend must still re-check
/// when the booking is committed.
#[wasm_bindgen(js_name = "checkConflicts")]
pub fn check_conflicts(
    snapshot_json: &str,
    request_json: &str,
    start: &str,
    exclude: Option<String>,
) -> Result<String, JsValue> {
    conflicts_json(snapshot_json, request_json, start, exclude.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}

/// Merged booked, unavailable and free blocks of the workday.
#[wasm_bindgen(js_name = "dayTimeline")]
pub fn day_timeline(
    snapshot_json: &str,
    request_json: &str,
    exclude: Option<String>,
) -> Result<String, JsValue> {
    timeline_json(snapshot_json, request_json, exclude.as_deref()).map_err(|e| JsValue::from_str(&e))
}
