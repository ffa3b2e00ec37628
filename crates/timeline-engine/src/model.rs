//! Core data model — event definitions and materialized occurrences.
//!
//! An [`EventDefinition`] is the authoritative record for one logical event,
//! recurring or not; it is owned by the remote store and reaches the client
//! either via bulk fetch or via the live delta feed. An [`Occurrence`] is one
//! concrete, time-bounded instance derived from exactly one definition.
//! Occurrences are ephemeral: they are recomputed on every expansion call and
//! never persisted or individually addressed outside the current render.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Fixed-step recurrence patterns supported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    Monthly,
}

/// The authoritative record for one logical event.
///
/// `original_event_id` is a self-referencing identity anchor: for a plain
/// definition it equals `id`, and every occurrence generated from the
/// definition carries it, letting downstream code group occurrences back to
/// their source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDefinition {
    pub id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_pattern: Option<RecurrencePattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_end_date: Option<DateTime<Utc>>,
    pub original_event_id: String,
}

impl EventDefinition {
    /// The effective recurrence of this definition.
    ///
    /// Recurrence is only in effect when both the pattern and the end bound
    /// are present; a definition carrying one without the other behaves as
    /// non-recurring.
    pub fn recurrence(&self) -> Option<(RecurrencePattern, DateTime<Utc>)> {
        match (self.recurrence_pattern, self.recurrence_end_date) {
            (Some(pattern), Some(until)) => Some((pattern, until)),
            _ => None,
        }
    }

    /// Duration of one instance, preserved on every generated occurrence.
    /// `None` when the definition has no end time.
    pub fn duration(&self) -> Option<Duration> {
        self.end_time.map(|end| end - self.start_time)
    }
}

/// One concrete, display-ready instance of a definition.
///
/// Carries all definition fields with `start_time`/`end_time` replaced by the
/// occurrence's own instants. The base occurrence (the one starting exactly at
/// the definition's `start_time`) keeps the definition's `id`; every other
/// occurrence gets a [`synthetic_id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_pattern: Option<RecurrencePattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_end_date: Option<DateTime<Utc>>,
    pub original_event_id: String,
}

/// Deterministic identifier for a non-base occurrence.
///
/// Derived from the definition id and the occurrence start instant (RFC 3339,
/// second precision, `Z` suffix), so independent expansions of the same
/// definition over the same interval produce identical ids.
pub fn synthetic_id(definition_id: &str, start: DateTime<Utc>) -> String {
    format!(
        "{}_{}",
        definition_id,
        start.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}
