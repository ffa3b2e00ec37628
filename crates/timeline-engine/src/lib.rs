//! # timeline-engine
//!
//! Event timeline materialization for time-bounded calendar and feed views.
//!
//! The engine does two things: it expands a set of stored event definitions —
//! some of which are recurring — into concrete, time-bounded occurrences for a
//! requested display window, and it keeps a client-held definition set
//! consistent with a live stream of create/update/delete notifications without
//! requiring a full reload.
//!
//! Expansion is cheap and deliberately re-run on every render instead of being
//! incrementally patched: a recurrence edit can invalidate arbitrarily many
//! occurrences at once, so re-deriving from the definition set is the simplest
//! strategy that stays correct.
//!
//! ## Modules
//!
//! - [`model`] — event definitions, occurrences, recurrence patterns
//! - [`expander`] — definitions + interval → concrete occurrence list
//! - [`reconcile`] — live-feed deltas applied to the [`DisplaySet`]
//! - [`view`] — view-owned state: interval, display set, stale-fetch discard
//! - [`wire`] — JSON shapes crossing the store and feed boundaries
//! - [`error`] — error types

pub mod error;
pub mod expander;
pub mod model;
pub mod reconcile;
pub mod view;
pub mod wire;

pub use error::TimelineError;
pub use expander::{expand, is_relevant, MAX_STEPS};
pub use model::{synthetic_id, EventDefinition, Occurrence, RecurrencePattern};
pub use reconcile::{Delta, DisplaySet};
pub use view::{FetchToken, TimelineView};
pub use wire::{FeedMessage, FetchRequest, FetchResponse, RawEventDefinition};
