//! Wire formats crossing the store and live-feed boundaries.
//!
//! Definitions arrive as JSON with ISO-8601 instant *strings*. Parsing is
//! deliberately lenient at the record level: a record with an unparseable
//! date is dropped with a warning rather than failing the whole payload, so
//! one corrupt record cannot abort a view. The envelope itself is strict —
//! a body that is not JSON is an error.

use crate::error::{Result, TimelineError};
use crate::model::{EventDefinition, RecurrencePattern};
use crate::reconcile::Delta;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Parse an ISO-8601 instant string into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (with offset, e.g. `2024-01-08T10:00:00Z`), naive local
/// time interpreted as UTC (`2024-01-08T10:00:00`), and a bare date
/// interpreted as UTC midnight (`2024-01-08` — the form bulk-fetch range
/// bounds commonly use).
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(ndt.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}

/// Parse an instant the caller requires to be valid (e.g. a CLI range flag).
pub fn require_instant(s: &str) -> Result<DateTime<Utc>> {
    parse_instant(s).ok_or_else(|| TimelineError::InvalidInstant(s.to_string()))
}

/// An event definition as it appears on the wire, before date validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventDefinition {
    pub id: String,
    pub start_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_event_id: Option<String>,
}

impl RawEventDefinition {
    /// Validate the record into a typed [`EventDefinition`].
    ///
    /// Returns `None` (with a warning) for records the engine must drop:
    /// an unparseable `startTime` or `endTime`, or a recurring record whose
    /// `recurrenceEndDate` is present but unparseable — such a series can
    /// never be bounded, so it produces nothing. An unknown pattern string
    /// and a missing `originalEventId` are repaired instead of dropped.
    pub fn into_definition(self) -> Option<EventDefinition> {
        let Some(start_time) = parse_instant(&self.start_time) else {
            warn!(id = %self.id, raw = %self.start_time, "dropping event with unparseable startTime");
            return None;
        };

        let end_time = match self.end_time.as_deref() {
            Some(raw) => match parse_instant(raw) {
                Some(end) => Some(end),
                None => {
                    warn!(id = %self.id, raw = %raw, "dropping event with unparseable endTime");
                    return None;
                }
            },
            None => None,
        };

        let recurrence_pattern = match self.recurrence_pattern.as_deref() {
            Some("DAILY") => Some(RecurrencePattern::Daily),
            Some("WEEKLY") => Some(RecurrencePattern::Weekly),
            Some("MONTHLY") => Some(RecurrencePattern::Monthly),
            Some(other) => {
                warn!(id = %self.id, pattern = %other, "ignoring unknown recurrence pattern");
                None
            }
            None => None,
        };

        let recurrence_end_date = match self.recurrence_end_date.as_deref() {
            Some(raw) => match parse_instant(raw) {
                Some(until) => Some(until),
                None if recurrence_pattern.is_some() => {
                    warn!(id = %self.id, raw = %raw, "dropping recurring event with unparseable recurrenceEndDate");
                    return None;
                }
                None => None,
            },
            None => None,
        };

        let original_event_id = self.original_event_id.unwrap_or_else(|| self.id.clone());

        Some(EventDefinition {
            id: self.id,
            start_time,
            end_time,
            recurrence_pattern,
            recurrence_end_date,
            original_event_id,
        })
    }
}

/// Request body for a bulk fetch of definitions for one display interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    pub range_start: String,
    pub range_end: String,
}

impl FetchRequest {
    pub fn new(range_start: DateTime<Utc>, range_end: DateTime<Utc>) -> Self {
        Self {
            range_start: range_start.to_rfc3339_opts(SecondsFormat::Secs, true),
            range_end: range_end.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Response body of a bulk fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResponse {
    pub events: Vec<RawEventDefinition>,
}

impl FetchResponse {
    /// Validate every record through the lenient path, dropping the bad ones.
    pub fn into_definitions(self) -> Vec<EventDefinition> {
        self.events
            .into_iter()
            .filter_map(RawEventDefinition::into_definition)
            .collect()
    }
}

/// One message from the live delta feed.
///
/// The `type` field is an open string so unrecognized message kinds decode
/// fine and map to no delta (forward-compatible with new server message
/// types).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: FeedPayload,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<RawEventDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

impl FeedMessage {
    /// Map the message to a reconciler delta.
    ///
    /// Returns `None` for unrecognized types, for created/updated messages
    /// missing an event payload (or carrying a droppable record), and for
    /// deleted messages missing an event id.
    pub fn into_delta(self) -> Option<Delta> {
        match self.kind.as_str() {
            "created" => self
                .data
                .event
                .and_then(RawEventDefinition::into_definition)
                .map(Delta::Created),
            "updated" => self
                .data
                .event
                .and_then(RawEventDefinition::into_definition)
                .map(Delta::Updated),
            "deleted" => self.data.event_id.map(Delta::Deleted),
            other => {
                debug!(kind = %other, "ignoring unrecognized feed message type");
                None
            }
        }
    }
}

/// Strict decode of a bulk-fetch response body.
pub fn decode_fetch_response(json: &str) -> Result<FetchResponse> {
    Ok(serde_json::from_str(json)?)
}

/// Strict decode of one live-feed message.
pub fn decode_feed_message(json: &str) -> Result<FeedMessage> {
    Ok(serde_json::from_str(json)?)
}
