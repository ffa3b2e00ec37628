//! Tests for occurrence expansion.

use chrono::{DateTime, TimeZone, Utc};
use timeline_engine::{expand, EventDefinition, RecurrencePattern, MAX_STEPS};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

fn plain(id: &str, start: DateTime<Utc>) -> EventDefinition {
    EventDefinition {
        id: id.to_string(),
        start_time: start,
        end_time: None,
        recurrence_pattern: None,
        recurrence_end_date: None,
        original_event_id: id.to_string(),
    }
}

fn recurring(
    id: &str,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    pattern: RecurrencePattern,
    until: DateTime<Utc>,
) -> EventDefinition {
    EventDefinition {
        id: id.to_string(),
        start_time: start,
        end_time: end,
        recurrence_pattern: Some(pattern),
        recurrence_end_date: Some(until),
        original_event_id: id.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Weekly series intersecting a mid-series window
// ---------------------------------------------------------------------------

#[test]
fn weekly_series_mid_window_yields_synthetic_occurrences() {
    // Hour-long event every week from Jan 1, series ends Jan 31.
    // Window covers the 2nd and 3rd instances only.
    let def = recurring(
        "e1",
        utc(2024, 1, 1, 10, 0, 0),
        Some(utc(2024, 1, 1, 11, 0, 0)),
        RecurrencePattern::Weekly,
        utc(2024, 1, 31, 23, 59, 59),
    );

    let result = expand(
        std::slice::from_ref(&def),
        utc(2024, 1, 8, 0, 0, 0),
        utc(2024, 1, 15, 23, 59, 59),
    );

    assert_eq!(result.len(), 2);

    assert_eq!(result[0].start_time, utc(2024, 1, 8, 10, 0, 0));
    assert_eq!(result[0].end_time, Some(utc(2024, 1, 8, 11, 0, 0)));
    assert_eq!(result[0].id, "e1_2024-01-08T10:00:00Z");
    assert_eq!(result[0].original_event_id, "e1");

    assert_eq!(result[1].start_time, utc(2024, 1, 15, 10, 0, 0));
    assert_eq!(result[1].end_time, Some(utc(2024, 1, 15, 11, 0, 0)));
    assert_eq!(result[1].id, "e1_2024-01-15T10:00:00Z");
    assert_eq!(result[1].original_event_id, "e1");
}

#[test]
fn window_past_recurrence_end_yields_nothing() {
    let def = recurring(
        "e1",
        utc(2024, 1, 1, 10, 0, 0),
        Some(utc(2024, 1, 1, 11, 0, 0)),
        RecurrencePattern::Weekly,
        utc(2024, 1, 31, 23, 59, 59),
    );

    let result = expand(
        std::slice::from_ref(&def),
        utc(2024, 2, 1, 0, 0, 0),
        utc(2024, 2, 28, 23, 59, 59),
    );

    assert!(result.is_empty());
}

#[test]
fn base_occurrence_keeps_definition_id() {
    // Window covers the series start: the first instance keeps the
    // definition id, the next one gets the derived id.
    let def = recurring(
        "e1",
        utc(2024, 1, 1, 10, 0, 0),
        None,
        RecurrencePattern::Weekly,
        utc(2024, 1, 31, 23, 59, 59),
    );

    let result = expand(
        std::slice::from_ref(&def),
        utc(2024, 1, 1, 0, 0, 0),
        utc(2024, 1, 8, 23, 59, 59),
    );

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].id, "e1");
    assert_eq!(result[1].id, "e1_2024-01-08T10:00:00Z");
}

// ---------------------------------------------------------------------------
// Non-recurring definitions
// ---------------------------------------------------------------------------

#[test]
fn non_recurring_inside_window_appears_once() {
    let def = plain("e2", utc(2024, 3, 5, 9, 0, 0));

    let result = expand(
        std::slice::from_ref(&def),
        utc(2024, 3, 1, 0, 0, 0),
        utc(2024, 3, 31, 23, 59, 59),
    );

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, "e2");
    assert_eq!(result[0].start_time, utc(2024, 3, 5, 9, 0, 0));
    assert_eq!(result[0].end_time, None);
}

#[test]
fn non_recurring_outside_window_is_absent() {
    let def = plain("e2", utc(2024, 3, 5, 9, 0, 0));

    let result = expand(
        std::slice::from_ref(&def),
        utc(2024, 4, 1, 0, 0, 0),
        utc(2024, 4, 30, 0, 0, 0),
    );

    assert!(result.is_empty());
}

#[test]
fn window_bounds_are_inclusive() {
    // Degenerate window equal to the start instant still matches.
    let start = utc(2024, 3, 5, 9, 0, 0);
    let def = plain("e2", start);

    let result = expand(std::slice::from_ref(&def), start, start);
    assert_eq!(result.len(), 1);
}

// ---------------------------------------------------------------------------
// Malformed intervals
// ---------------------------------------------------------------------------

#[test]
fn inverted_range_yields_empty() {
    let defs = vec![
        plain("e2", utc(2024, 5, 5, 9, 0, 0)),
        recurring(
            "e1",
            utc(2024, 5, 1, 10, 0, 0),
            None,
            RecurrencePattern::Daily,
            utc(2024, 12, 31, 0, 0, 0),
        ),
    ];

    let result = expand(&defs, utc(2024, 5, 10, 0, 0, 0), utc(2024, 5, 1, 0, 0, 0));
    assert!(result.is_empty());
}

// ---------------------------------------------------------------------------
// Recurrence requires both fields
// ---------------------------------------------------------------------------

#[test]
fn pattern_without_end_date_is_non_recurring() {
    let mut def = plain("e3", utc(2024, 6, 3, 12, 0, 0));
    def.recurrence_pattern = Some(RecurrencePattern::Daily);

    let result = expand(
        std::slice::from_ref(&def),
        utc(2024, 6, 1, 0, 0, 0),
        utc(2024, 6, 30, 23, 59, 59),
    );

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, "e3");
}

#[test]
fn end_date_without_pattern_is_non_recurring() {
    let mut def = plain("e4", utc(2024, 6, 3, 12, 0, 0));
    def.recurrence_end_date = Some(utc(2024, 12, 31, 0, 0, 0));

    let result = expand(
        std::slice::from_ref(&def),
        utc(2024, 6, 1, 0, 0, 0),
        utc(2024, 6, 30, 23, 59, 59),
    );

    assert_eq!(result.len(), 1);
}

// ---------------------------------------------------------------------------
// Monthly stepping
// ---------------------------------------------------------------------------

#[test]
fn monthly_step_clamps_to_end_of_shorter_month() {
    // Jan 31 has no Feb 31; the calendar-month increment lands on Feb 29
    // (2024 is a leap year) instead of drifting into March.
    let def = recurring(
        "m1",
        utc(2024, 1, 31, 8, 0, 0),
        None,
        RecurrencePattern::Monthly,
        utc(2024, 3, 31, 23, 59, 59),
    );

    let result = expand(
        std::slice::from_ref(&def),
        utc(2024, 2, 1, 0, 0, 0),
        utc(2024, 2, 29, 23, 59, 59),
    );

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].start_time, utc(2024, 2, 29, 8, 0, 0));
    assert_eq!(result[0].id, "m1_2024-02-29T08:00:00Z");
}

#[test]
fn monthly_series_across_three_months() {
    let def = recurring(
        "m2",
        utc(2024, 2, 15, 18, 30, 0),
        Some(utc(2024, 2, 15, 20, 0, 0)),
        RecurrencePattern::Monthly,
        utc(2024, 12, 31, 0, 0, 0),
    );

    let result = expand(
        std::slice::from_ref(&def),
        utc(2024, 2, 1, 0, 0, 0),
        utc(2024, 4, 30, 23, 59, 59),
    );

    assert_eq!(result.len(), 3);
    assert_eq!(result[0].start_time, utc(2024, 2, 15, 18, 30, 0));
    assert_eq!(result[1].start_time, utc(2024, 3, 15, 18, 30, 0));
    assert_eq!(result[2].start_time, utc(2024, 4, 15, 18, 30, 0));
    // 90-minute duration preserved on each instance.
    for occ in &result {
        let end = occ.end_time.expect("duration preserved");
        assert_eq!((end - occ.start_time).num_minutes(), 90);
    }
}

// ---------------------------------------------------------------------------
// Iteration safety bound
// ---------------------------------------------------------------------------

#[test]
fn daily_walk_stops_at_the_step_cap() {
    // Six-year daily series over a six-year window: the cap kicks in first.
    let def = recurring(
        "runaway",
        utc(2024, 1, 1, 0, 0, 0),
        None,
        RecurrencePattern::Daily,
        utc(2030, 1, 1, 0, 0, 0),
    );

    let result = expand(
        std::slice::from_ref(&def),
        utc(2024, 1, 1, 0, 0, 0),
        utc(2030, 1, 1, 0, 0, 0),
    );

    assert_eq!(result.len(), MAX_STEPS);
}

// ---------------------------------------------------------------------------
// Cross-definition ordering
// ---------------------------------------------------------------------------

#[test]
fn output_follows_definition_input_order() {
    // The later event comes first in the input, so it comes first in the
    // output; callers wanting chronological order sort explicitly.
    let defs = vec![
        plain("late", utc(2024, 7, 20, 9, 0, 0)),
        plain("early", utc(2024, 7, 2, 9, 0, 0)),
    ];

    let result = expand(&defs, utc(2024, 7, 1, 0, 0, 0), utc(2024, 7, 31, 0, 0, 0));

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].id, "late");
    assert_eq!(result[1].id, "early");
}
