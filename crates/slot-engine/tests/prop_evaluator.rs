//! Property-based tests for slot evaluation using proptest.
//!
//! These check invariants that hold for *any* day of bookings and windows,
//! not just the scenarios in `evaluator_tests.rs`.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use proptest::prelude::*;
use slot_engine::{
    evaluate_slots, overlaps, Booking, BookingStatus, OccupancyPolicy, SlotRequest, SlotStatus,
    UnavailabilityWindow,
};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

/// Minute offset from midnight, on a 15-minute grid between 06:00 and 20:00.
fn arb_minute() -> impl Strategy<Value = i64> {
    (24i64..=80).prop_map(|q| q * 15)
}

fn arb_length() -> impl Strategy<Value = i64> {
    (1i64..=16).prop_map(|q| q * 15)
}

fn arb_status() -> impl Strategy<Value = BookingStatus> {
    prop_oneof![
        Just(BookingStatus::Scheduled),
        Just(BookingStatus::Completed),
        Just(BookingStatus::Cancelled),
        Just(BookingStatus::Pending),
    ]
}

fn arb_policy() -> impl Strategy<Value = OccupancyPolicy> {
    prop_oneof![
        Just(OccupancyPolicy::IncludingPending),
        Just(OccupancyPolicy::Confirmed),
    ]
}

fn at_minute(minute: i64) -> NaiveDateTime {
    day().and_time(NaiveTime::MIN) + Duration::minutes(minute)
}

fn arb_bookings() -> impl Strategy<Value = Vec<Booking>> {
    prop::collection::vec((arb_minute(), arb_length(), arb_status()), 0..8).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (start, len, status))| {
                Booking::with_duration(i.to_string(), at_minute(start), len, status).unwrap()
            })
            .collect()
    })
}

fn arb_windows() -> impl Strategy<Value = Vec<UnavailabilityWindow>> {
    prop::collection::vec((arb_minute(), arb_length()), 0..4).prop_map(|raw| {
        raw.into_iter()
            .map(|(start, len)| {
                UnavailabilityWindow::new(at_minute(start), at_minute(start + len), "prop").unwrap()
            })
            .collect()
    })
}

fn arb_request() -> impl Strategy<Value = SlotRequest> {
    (
        prop_oneof![Just(30i64), Just(60i64)],
        arb_length(),
        arb_policy(),
    )
        .prop_map(|(granularity, duration, policy)| {
            SlotRequest::new(duration).granularity(granularity).policy(policy)
        })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn precedence_holds_for_every_slot(
        request in arb_request(),
        bookings in arb_bookings(),
        windows in arb_windows(),
    ) {
        let slots = evaluate_slots(day(), &request, &bookings, &windows, None).unwrap();
        let workday_end = day().and_time(request.workday_end);

        for slot in &slots {
            let booked = bookings.iter().any(|b| {
                request.policy.occupies(b.status) && overlaps(slot.start, slot.end, b.start, b.end)
            });
            let blocked = windows.iter().any(|w| overlaps(slot.start, slot.end, w.start, w.end));
            let expected = if booked {
                SlotStatus::Booked
            } else if blocked || slot.end > workday_end {
                SlotStatus::Unavailable
            } else {
                SlotStatus::Available
            };
            prop_assert_eq!(slot.status, expected, "slot {} - {}", slot.start, slot.end);
        }
    }

    #[test]
    fn candidates_are_on_grid_inside_workday(request in arb_request()) {
        let slots = evaluate_slots(day(), &request, &[], &[], None).unwrap();
        let workday_start = day().and_time(request.workday_start);
        let workday_end = day().and_time(request.workday_end);

        prop_assert!(!slots.is_empty());
        for (i, slot) in slots.iter().enumerate() {
            prop_assert_eq!(
                slot.start,
                workday_start + Duration::minutes(request.granularity_minutes * i as i64)
            );
            prop_assert!(slot.start < workday_end);
            prop_assert_eq!((slot.end - slot.start).num_minutes(), request.duration_minutes);
        }
    }

    #[test]
    fn slot_past_workday_end_never_bookable(
        request in arb_request(),
        bookings in arb_bookings(),
        windows in arb_windows(),
    ) {
        let slots = evaluate_slots(day(), &request, &bookings, &windows, None).unwrap();
        let workday_end = day().and_time(request.workday_end);
        for slot in slots.iter().filter(|s| s.end > workday_end) {
            prop_assert!(!slot.is_bookable());
        }
    }

    #[test]
    fn evaluation_is_idempotent(
        request in arb_request(),
        bookings in arb_bookings(),
        windows in arb_windows(),
    ) {
        let first = evaluate_slots(day(), &request, &bookings, &windows, None).unwrap();
        let second = evaluate_slots(day(), &request, &bookings, &windows, None).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn excluded_booking_has_no_effect(
        request in arb_request(),
        bookings in arb_bookings(),
        windows in arb_windows(),
        pick in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!bookings.is_empty());
        let excluded = &bookings[pick.index(bookings.len())];

        let without: Vec<Booking> = bookings
            .iter()
            .filter(|b| b.id != excluded.id)
            .cloned()
            .collect();

        let with_exclusion =
            evaluate_slots(day(), &request, &bookings, &windows, Some(excluded.id.as_str())).unwrap();
        let removed = evaluate_slots(day(), &request, &without, &windows, None).unwrap();
        prop_assert_eq!(with_exclusion, removed);
    }

    #[test]
    fn cancelled_bookings_have_no_effect(
        request in arb_request(),
        bookings in arb_bookings(),
        windows in arb_windows(),
    ) {
        let active: Vec<Booking> = bookings
            .iter()
            .filter(|b| b.status != BookingStatus::Cancelled)
            .cloned()
            .collect();

        let all = evaluate_slots(day(), &request, &bookings, &windows, None).unwrap();
        let without_cancelled = evaluate_slots(day(), &request, &active, &windows, None).unwrap();
        prop_assert_eq!(all, without_cancelled);
    }
}
