//! Property-based tests for the save-time checks using proptest.
//!
//! These hold for any interval on any ordinary (non-transition) day, not just
//! the scenarios in `hours_tests.rs` and `conflict_tests.rs`.

use appointment_engine::interval::touches;
use appointment_engine::model::{AppointmentDraft, ContactId, CustomerId, UserId};
use appointment_engine::{validate_business_hours, validate_chronology, BusinessHours};
use appointment_engine::{MemoryStore, ScheduleError, Scheduler};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use chrono_tz::{America, Asia, Europe, Tz};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_viewer() -> impl Strategy<Value = Tz> {
    prop_oneof![
        Just(America::New_York),
        Just(America::Los_Angeles),
        Just(Europe::London),
        Just(Asia::Tokyo),
        Just(Tz::UTC),
    ]
}

/// A summer date, away from every DST transition of the zones above.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2025i32..=2027, 6u32..=8, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn arb_datetime() -> impl Strategy<Value = NaiveDateTime> {
    (arb_date(), 0u32..24 * 60).prop_map(|(date, minute)| {
        date.and_hms_opt(0, 0, 0).unwrap() + Duration::minutes(i64::from(minute))
    })
}

const SHIFT_MINUTES: i64 = 14 * 60;

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    /// A start at or after the end is always rejected as an invalid interval.
    #[test]
    fn non_positive_length_is_invalid(start in arb_datetime(), back in 0i64..=600) {
        let end = start - Duration::minutes(back);
        let result = validate_chronology(start, end);
        let is_invalid = matches!(result, Err(ScheduleError::InvalidInterval { .. }));
        prop_assert!(is_invalid);
    }

    /// Any interval inside the shift, seen from any viewer zone, passes.
    #[test]
    fn inside_window_passes(
        date in arb_date(),
        viewer in arb_viewer(),
        offset in 0i64..SHIFT_MINUTES,
        length in 1i64..=SHIFT_MINUTES,
    ) {
        let hours = BusinessHours::default();
        let length = length.min(SHIFT_MINUTES - offset).max(1);
        let open = hours.opening_on(date).unwrap();
        let start = (open + Duration::minutes(offset)).with_timezone(&viewer).naive_local();
        let end = (open + Duration::minutes(offset + length)).with_timezone(&viewer).naive_local();

        prop_assert!(validate_business_hours(start, end, &hours, viewer).is_ok());
    }

    /// Starting before opening fails, however long the appointment.
    #[test]
    fn start_before_opening_fails(
        date in arb_date(),
        viewer in arb_viewer(),
        early in 1i64..=120,
        length in 1i64..=240,
    ) {
        let hours = BusinessHours::default();
        let open = hours.opening_on(date).unwrap();
        let start = (open - Duration::minutes(early)).with_timezone(&viewer).naive_local();
        let end = (open + Duration::minutes(length)).with_timezone(&viewer).naive_local();

        let result = validate_business_hours(start, end, &hours, viewer);
        let is_outside = matches!(result, Err(ScheduleError::OutsideBusinessHours { .. }));
        prop_assert!(is_outside);
    }

    /// Ending after closing fails.
    #[test]
    fn end_after_closing_fails(
        date in arb_date(),
        viewer in arb_viewer(),
        before in 1i64..=240,
        late in 1i64..=120,
    ) {
        let hours = BusinessHours::default();
        let close = hours.closing_on(date).unwrap();
        let start = (close - Duration::minutes(before)).with_timezone(&viewer).naive_local();
        let end = (close + Duration::minutes(late)).with_timezone(&viewer).naive_local();

        let result = validate_business_hours(start, end, &hours, viewer);
        let is_outside = matches!(result, Err(ScheduleError::OutsideBusinessHours { .. }));
        prop_assert!(is_outside);
    }

    /// The intersection rule is symmetric in its two intervals.
    #[test]
    fn touches_is_symmetric(
        a in arb_datetime(),
        a_len in 1i64..=300,
        b in arb_datetime(),
        b_len in 1i64..=300,
    ) {
        let a_end = a + Duration::minutes(a_len);
        let b_end = b + Duration::minutes(b_len);
        prop_assert_eq!(touches(a, a_end, b, b_end), touches(b, b_end, a, a_end));
    }

    /// An interval always conflicts with itself unless it is excluded by id.
    #[test]
    fn saved_interval_blocks_identical_copy(
        date in arb_date(),
        offset in 0i64..(SHIFT_MINUTES - 60),
    ) {
        let hours = BusinessHours::default();
        let start = hours.opening_on(date).unwrap().naive_local() + Duration::minutes(offset);
        let end = start + Duration::minutes(60);
        let mut scheduler = Scheduler::new(MemoryStore::new(), hours, America::New_York);
        let draft = AppointmentDraft {
            customer_id: CustomerId(1),
            contact_id: ContactId(1),
            contact_name: "Anika Costa".to_string(),
            user_id: UserId(1),
            title: "Sync".to_string(),
            description: "Weekly sync".to_string(),
            appointment_type: "Planning Session".to_string(),
            location: "Phoenix".to_string(),
            start,
            end,
        };
        let saved = scheduler.create(draft.clone()).unwrap();

        let is_conflict = matches!(
            scheduler.create(draft),
            Err(ScheduleError::Conflict { .. })
        );
        prop_assert!(is_conflict);
        prop_assert!(scheduler.check(start, end, Some(saved.id)).is_ok());
    }
}
