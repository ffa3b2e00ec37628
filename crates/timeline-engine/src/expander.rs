//! Occurrence expansion — materializes event definitions into concrete
//! occurrences for a display window.
//!
//! Expansion is a pure function: same definitions, same interval, same output.
//! It never fails for malformed interval input (an inverted range yields an
//! empty result) and a recurrence walk is hard-capped at [`MAX_STEPS`] steps
//! per definition so corrupted recurrence data cannot loop unboundedly.

use crate::model::{synthetic_id, EventDefinition, Occurrence, RecurrencePattern};
use chrono::{DateTime, Duration, Months, Utc};

/// Safety bound on the recurrence walk, per definition.
///
/// A daily series spanning roughly three years hits this; anything past it is
/// either pathological data or a window no view realistically renders.
pub const MAX_STEPS: usize = 1000;

/// Expand definitions into the ordered set of occurrences intersecting
/// `[range_start, range_end]` (both bounds inclusive).
///
/// Each definition is processed independently; output follows the input order
/// of the definitions, with each definition's own occurrences chronological.
/// There is no global time sort — callers needing one sort the result.
///
/// An inverted range (`range_end < range_start`) yields an empty vec.
pub fn expand(
    definitions: &[EventDefinition],
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
) -> Vec<Occurrence> {
    if range_end < range_start {
        return Vec::new();
    }

    let mut occurrences = Vec::new();
    for definition in definitions {
        expand_definition(definition, range_start, range_end, &mut occurrences);
    }
    occurrences
}

/// Decide whether a definition can contribute any occurrence to the window.
///
/// Used by the reconciler to avoid accumulating definitions a range-scoped
/// view will never render. The recurring clause is a coarse overlap check
/// (`start_time <= range_end && recurrence_end_date >= range_start`) kept in
/// lockstep with [`expand`]'s walk termination conditions: a definition judged
/// irrelevant here never produces an in-range occurrence.
pub fn is_relevant(
    definition: &EventDefinition,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
) -> bool {
    if range_end < range_start {
        return false;
    }
    if definition.start_time >= range_start && definition.start_time <= range_end {
        return true;
    }
    match definition.recurrence() {
        Some((_, until)) => definition.start_time <= range_end && until >= range_start,
        None => false,
    }
}

fn expand_definition(
    definition: &EventDefinition,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    out: &mut Vec<Occurrence>,
) {
    let duration = definition.duration();

    let Some((pattern, until)) = definition.recurrence() else {
        // Non-recurring: exactly one occurrence, iff the start is in range.
        if definition.start_time >= range_start && definition.start_time <= range_end {
            out.push(make_occurrence(definition, definition.start_time, duration));
        }
        return;
    };

    // Series ended before the window opens.
    if until < range_start {
        return;
    }

    let mut current = definition.start_time;
    for _ in 0..MAX_STEPS {
        if current > range_end || current > until {
            break;
        }
        if current >= range_start {
            out.push(make_occurrence(definition, current, duration));
        }
        current = match step(current, pattern) {
            Some(next) => next,
            // chrono range overflow — terminate like the cap does.
            None => break,
        };
    }
}

/// Advance one recurrence step. Monthly uses calendar-month increment, so
/// day-of-month drift (Jan 31 → Feb 29) is absorbed by chrono's clamping.
fn step(instant: DateTime<Utc>, pattern: RecurrencePattern) -> Option<DateTime<Utc>> {
    match pattern {
        RecurrencePattern::Daily => instant.checked_add_signed(Duration::days(1)),
        RecurrencePattern::Weekly => instant.checked_add_signed(Duration::days(7)),
        RecurrencePattern::Monthly => instant.checked_add_months(Months::new(1)),
    }
}

fn make_occurrence(
    definition: &EventDefinition,
    start: DateTime<Utc>,
    duration: Option<Duration>,
) -> Occurrence {
    let id = if start == definition.start_time {
        definition.id.clone()
    } else {
        synthetic_id(&definition.id, start)
    };

    Occurrence {
        id,
        start_time: start,
        end_time: duration.map(|d| start + d),
        recurrence_pattern: definition.recurrence_pattern,
        recurrence_end_date: definition.recurrence_end_date,
        original_event_id: definition.original_event_id.clone(),
    }
}
