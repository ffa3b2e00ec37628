//! View-side state for a time-bounded event display.
//!
//! A [`TimelineView`] owns the active interval and the [`DisplaySet`] — the
//! state a calendar or feed component would otherwise keep in a module-level
//! mutable array. All mutation goes through the reconciler's merge rules or
//! through a bulk load, and bulk fetches are tagged with a generation so a
//! response that resolves after the interval moved on is discarded instead of
//! merged (abort-on-supersede).
//!
//! The view never fetches by itself; transport stays outside. The flow is:
//! `begin_fetch` → send [`crate::wire::FetchRequest`] → `complete_fetch` with
//! the validated definitions, and independently `apply_message` for each
//! live-feed message, re-reading `occurrences()` after every change.

use crate::expander::expand;
use crate::model::{EventDefinition, Occurrence};
use crate::reconcile::{Delta, DisplaySet};
use crate::wire::FeedMessage;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Opaque tag pairing a bulk-fetch response with the interval it was issued
/// for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken(u64);

#[derive(Debug, Clone)]
pub struct TimelineView {
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    display: DisplaySet,
    fetch_generation: u64,
}

impl TimelineView {
    pub fn new(range_start: DateTime<Utc>, range_end: DateTime<Utc>) -> Self {
        Self {
            range_start,
            range_end,
            display: DisplaySet::new(),
            fetch_generation: 0,
        }
    }

    pub fn range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.range_start, self.range_end)
    }

    /// Move the view to a new interval. Any in-flight fetch becomes stale.
    pub fn set_range(&mut self, range_start: DateTime<Utc>, range_end: DateTime<Utc>) {
        self.range_start = range_start;
        self.range_end = range_end;
        self.fetch_generation += 1;
    }

    /// Tag an outgoing bulk fetch with the current interval generation.
    pub fn begin_fetch(&self) -> FetchToken {
        FetchToken(self.fetch_generation)
    }

    /// Install a bulk-fetch result, replacing the display set.
    ///
    /// Returns `false` (leaving state untouched) when the token is stale —
    /// the interval changed while the request was in flight.
    pub fn complete_fetch(
        &mut self,
        token: FetchToken,
        definitions: Vec<EventDefinition>,
    ) -> bool {
        if token.0 != self.fetch_generation {
            debug!(
                stale = token.0,
                current = self.fetch_generation,
                "discarding bulk fetch superseded by a range change"
            );
            return false;
        }
        self.display.load(definitions);
        true
    }

    /// Apply one reconciler delta under the active interval.
    pub fn apply_delta(&mut self, delta: Delta) {
        self.display.apply(delta, self.range_start, self.range_end);
    }

    /// Apply one live-feed message. Returns `false` when the message carried
    /// no applicable delta (unrecognized type or droppable payload).
    pub fn apply_message(&mut self, message: FeedMessage) -> bool {
        match message.into_delta() {
            Some(delta) => {
                self.apply_delta(delta);
                true
            }
            None => false,
        }
    }

    /// Materialize the occurrence list for the active interval.
    ///
    /// Recomputed in full on every call: a recurrence edit can invalidate
    /// arbitrarily many occurrences at once, so the view re-derives rather
    /// than patching individual occurrences.
    pub fn occurrences(&self) -> Vec<Occurrence> {
        let definitions = self.display.snapshot();
        expand(&definitions, self.range_start, self.range_end)
    }

    pub fn display_set(&self) -> &DisplaySet {
        &self.display
    }
}
