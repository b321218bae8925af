#[cfg(test)]
mod tests {
    use crate::logic::compute_raw_slots;
    use brobook_common::models::{DayHours, SlotPolicy, WorkingHoursConfig};
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use chrono_tz::Tz;

    const ZONE: Tz = chrono_tz::Europe::Zurich;

    fn all_days(start: &str, end: &str) -> WorkingHoursConfig {
        let hours = Some(DayHours {
            start: start.to_string(),
            end: end.to_string(),
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

    fn policy(duration: u32) -> SlotPolicy {
        SlotPolicy {
            slot_duration_minutes: duration,
            break_minutes: 0,
            booking_delay_hours: 0.0,
        }
    }

    fn past_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn spring_forward_gap_produces_no_phantom_slots() {
        // Zurich skips 02:00-02:59 on 2025-03-30. Candidates falling into
        // the gap must be dropped, not shifted.
        let date = NaiveDate::from_ymd_opt(2025, 3, 30).unwrap();
        let slots = compute_raw_slots(date, &all_days("01:00", "05:00"), &policy(30), past_now(), ZONE);

        let times: Vec<String> = slots.iter().map(|s| s.format("%H:%M").to_string()).collect();
        assert_eq!(
            times,
            vec!["01:00", "01:30", "03:00", "03:30", "04:00", "04:30"],
            "the 02:xx wall-clock times do not exist on this day"
        );
    }

    #[test]
    fn fall_back_ambiguity_resolves_to_one_instant_per_wall_clock() {
        // Zurich repeats 02:00-02:59 on 2025-10-26; each wall-clock label
        // must still yield exactly one, strictly increasing, instant.
        let date = NaiveDate::from_ymd_opt(2025, 10, 26).unwrap();
        let slots = compute_raw_slots(date, &all_days("01:00", "04:00"), &policy(30), past_now(), ZONE);

        assert_eq!(slots.len(), 6);
        for pair in slots.windows(2) {
            assert!(
                pair[0].with_timezone(&Utc) < pair[1].with_timezone(&Utc),
                "slot instants must be strictly increasing across the overlap"
            );
        }
    }

    #[test]
    fn late_evening_slots_survive_up_to_midnight() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
        let slots = compute_raw_slots(date, &all_days("23:00", "23:59"), &policy(30), past_now(), ZONE);

        let times: Vec<String> = slots.iter().map(|s| s.format("%H:%M").to_string()).collect();
        assert_eq!(times, vec!["23:00", "23:30"]);
    }
}
