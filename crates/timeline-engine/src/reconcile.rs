//! Live delta reconciliation — keeps the client-held definition set
//! consistent with an append-only stream of create/update/delete
//! notifications, without a full reload.
//!
//! The reconciler only mutates the [`DisplaySet`]; it never fetches and never
//! re-expands. After a delta is applied the view re-invokes
//! [`crate::expand`], which re-evaluates range membership for every
//! definition — that is what makes the `Updated` overwrite rule safe in both
//! directions (an edit moving an event into or out of the window).

use crate::expander::is_relevant;
use crate::model::EventDefinition;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A single live notification from the event feed, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Delta {
    Created(EventDefinition),
    Updated(EventDefinition),
    Deleted(String),
}

/// The client-held mapping of known definitions backing the rendered
/// interval. Mutated only by bulk [`load`](DisplaySet::load) and by
/// [`apply`](DisplaySet::apply); reads go through accessors so no call site
/// can touch the map directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplaySet {
    events: HashMap<String, EventDefinition>,
}

impl DisplaySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole set from a bulk fetch.
    pub fn load(&mut self, definitions: Vec<EventDefinition>) {
        self.events = definitions
            .into_iter()
            .map(|def| (def.id.clone(), def))
            .collect();
    }

    /// Apply one delta under the active display interval.
    ///
    /// - `Created`: upsert by id iff the definition is relevant to the
    ///   interval. Upsert (not insert) makes duplicate delivery of the same
    ///   creation notice idempotent.
    /// - `Updated`: overwrite if the id is already known, regardless of
    ///   current relevance — expansion re-evaluates range membership on the
    ///   next render. If unknown, insert iff relevant (an update can arrive
    ///   before the corresponding creation was locally known).
    /// - `Deleted`: remove if present; a delete for an unknown id is a no-op.
    pub fn apply(&mut self, delta: Delta, range_start: DateTime<Utc>, range_end: DateTime<Utc>) {
        match delta {
            Delta::Created(def) => {
                if is_relevant(&def, range_start, range_end) {
                    self.events.insert(def.id.clone(), def);
                }
            }
            Delta::Updated(def) => {
                if self.events.contains_key(&def.id)
                    || is_relevant(&def, range_start, range_end)
                {
                    self.events.insert(def.id.clone(), def);
                }
            }
            Delta::Deleted(id) => {
                self.events.remove(&id);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&EventDefinition> {
        self.events.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.events.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Current definitions, cloned for re-expansion. Order is unspecified;
    /// expansion output order follows this snapshot, and callers needing
    /// chronological occurrences sort the expansion result.
    pub fn snapshot(&self) -> Vec<EventDefinition> {
        self.events.values().cloned().collect()
    }
}
