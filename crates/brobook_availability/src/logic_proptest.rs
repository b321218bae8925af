#[cfg(test)]
mod tests {
    use crate::logic::{compute_raw_slots, exclude_blocked};
    use brobook_common::models::{DayHours, SlotPolicy, WorkingHoursConfig};
    use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
    use chrono_tz::Tz;
    use proptest::prelude::*;
    use std::collections::HashSet;

    const ZONE: Tz = chrono_tz::Europe::Zurich;

    // Helper producing a week that is open every day with the same hours
    fn open_week(open_hour: u32, close_hour: u32) -> WorkingHoursConfig {
        let hours = Some(DayHours {
            start: format!("{:02}:00", open_hour),
            end: format!("{:02}:00", close_hour),
        });
        WorkingHoursConfig {
            monday: hours.clone(),
            tuesday: hours.clone(),
            wednesday: hours.clone(),
            thursday: hours.clone(),
            friday: hours.clone(),
            saturday: hours.clone(),
            sunday: hours,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    // July has no DST transition in Zurich, so wall-clock arithmetic is
    // uniform and the grid-spacing property holds exactly.
    fn july_date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    proptest! {
        // Every slot starts within working hours and on the policy grid
        #[test]
        fn slots_start_within_hours_and_on_grid(
            day in 1u32..28,
            open_hour in 0u32..12,
            close_hour in 13u32..23,
            duration in 15u32..120,
            brk in 0u32..30,
        ) {
            let hours = open_week(open_hour, close_hour);
            let policy = SlotPolicy {
                slot_duration_minutes: duration,
                break_minutes: brk,
                booking_delay_hours: 0.0,
            };
            let slots = compute_raw_slots(july_date(day), &hours, &policy, fixed_now(), ZONE);

            let open = NaiveTime::from_hms_opt(open_hour, 0, 0).unwrap();
            let close = NaiveTime::from_hms_opt(close_hour, 0, 0).unwrap();
            let grid = i64::from(duration + brk);

            for slot in &slots {
                let time = slot.time();
                prop_assert!(time >= open, "slot {} starts before opening", slot);
                prop_assert!(time < close, "slot {} starts at or after close", slot);
                let offset = (time - open).num_minutes();
                prop_assert_eq!(offset % grid, 0, "slot {} is off the grid", slot);
            }
        }

        // Consecutive slots are exactly one grid step apart
        #[test]
        fn slots_are_evenly_spaced(
            day in 1u32..28,
            duration in 15u32..120,
            brk in 0u32..30,
        ) {
            let hours = open_week(8, 18);
            let policy = SlotPolicy {
                slot_duration_minutes: duration,
                break_minutes: brk,
                booking_delay_hours: 0.0,
            };
            let slots = compute_raw_slots(july_date(day), &hours, &policy, fixed_now(), ZONE);
            let grid = Duration::minutes(i64::from(duration + brk));

            prop_assert!(!slots.is_empty());
            for pair in slots.windows(2) {
                prop_assert_eq!(pair[1] - pair[0], grid);
            }
        }

        // The slot count matches the closed-form grid size: one slot per
        // grid step whose start lies strictly before close.
        #[test]
        fn slot_count_matches_window(
            day in 1u32..28,
            duration in 15u32..120,
            brk in 0u32..30,
        ) {
            let hours = open_week(9, 17);
            let policy = SlotPolicy {
                slot_duration_minutes: duration,
                break_minutes: brk,
                booking_delay_hours: 0.0,
            };
            let slots = compute_raw_slots(july_date(day), &hours, &policy, fixed_now(), ZONE);

            let window_minutes = 8 * 60;
            let grid = i64::from(duration + brk);
            let expected = (window_minutes + grid - 1) / grid; // ceil
            prop_assert_eq!(slots.len() as i64, expected);
        }

        // Customer-mode filtering never lets a blocked instant through
        #[test]
        fn excluded_output_never_contains_blocked_instants(
            day in 1u32..28,
            blocked_indices in proptest::collection::hash_set(0usize..16, 0..6),
        ) {
            let hours = open_week(9, 17);
            let policy = SlotPolicy {
                slot_duration_minutes: 30,
                break_minutes: 0,
                booking_delay_hours: 0.0,
            };
            let date = july_date(day);
            let raw = compute_raw_slots(date, &hours, &policy, fixed_now(), ZONE);

            let blocked_slots: HashSet<DateTime<Utc>> = blocked_indices
                .iter()
                .filter_map(|i| raw.get(*i))
                .map(|s| s.with_timezone(&Utc))
                .collect();
            let blocked_dates = HashSet::new();

            let open = exclude_blocked(raw.clone(), date, &blocked_dates, &blocked_slots);
            prop_assert_eq!(open.len(), raw.len() - blocked_slots.len());
            for slot in &open {
                prop_assert!(!blocked_slots.contains(&slot.with_timezone(&Utc)));
            }
        }

        // Same-day emission always respects the delay window
        #[test]
        fn same_day_slots_respect_delay(
            delay_hours in 0.0f64..6.0,
            now_minute in 0u32..60,
        ) {
            let hours = open_week(0, 23);
            let policy = SlotPolicy {
                slot_duration_minutes: 30,
                break_minutes: 0,
                booking_delay_hours: delay_hours,
            };
            // "now" on the queried day itself
            let date = july_date(10);
            let now = ZONE
                .with_ymd_and_hms(2025, 7, 10, 9, now_minute, 0)
                .unwrap()
                .with_timezone(&Utc);
            let slots = compute_raw_slots(date, &hours, &policy, now, ZONE);

            let cutoff = now + Duration::minutes((delay_hours * 60.0).round() as i64);
            for slot in &slots {
                prop_assert!(
                    slot.with_timezone(&Utc) > cutoff,
                    "slot {} violates the booking delay", slot
                );
            }
        }
    }
}
