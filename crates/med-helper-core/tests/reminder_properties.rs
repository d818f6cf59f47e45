//! Property tests for classification and firing.

use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use med_helper_core::models::{DormantReason, Medication, ReminderTime};
use med_helper_core::scheduler::{classify, fire_due, next_occurrence};
use proptest::prelude::*;

fn offset_strategy() -> impl Strategy<Value = FixedOffset> {
    (-12i32..=14).prop_map(|h| FixedOffset::east_opt(h * 3600).unwrap())
}

fn now_strategy() -> impl Strategy<Value = DateTime<FixedOffset>> {
    (offset_strategy(), 1u32..=28, 0u32..24, 0u32..60, 0u32..60).prop_map(
        |(offset, day, h, m, s)| offset.with_ymd_and_hms(2024, 5, day, h, m, s).unwrap(),
    )
}

fn times_strategy() -> impl Strategy<Value = Vec<ReminderTime>> {
    prop::collection::vec((0u32..24, 0u32..60), 0..4).prop_map(|pairs| {
        pairs
            .into_iter()
            .filter_map(|(h, m)| ReminderTime::new(h, m))
            .collect()
    })
}

fn medication(id: i64, enabled: bool, times: &[ReminderTime]) -> Medication {
    let schedule = times
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    let mut med = Medication::new(format!("Med {}", id), "1 tab".into(), "daily".into())
        .with_reminders(&schedule);
    med.id = id;
    med.reminder_enabled = enabled;
    med
}

proptest! {
    #[test]
    fn disabled_is_always_dormant(now in now_strategy(), times in times_strategy()) {
        let med = medication(1, false, &times);
        let result = classify(now, &[med]);

        prop_assert!(result.due.is_empty());
        prop_assert!(result.upcoming.is_empty());
        prop_assert_eq!(result.dormant_reason(1), Some(DormantReason::Disabled));
    }

    #[test]
    fn every_medication_lands_in_one_bucket(
        now in now_strategy(),
        schedules in prop::collection::vec((any::<bool>(), times_strategy()), 0..8),
    ) {
        let meds: Vec<_> = schedules
            .iter()
            .enumerate()
            .map(|(i, (enabled, times))| medication(i as i64 + 1, *enabled, times))
            .collect();
        let result = classify(now, &meds);

        prop_assert_eq!(result.len(), meds.len());
        for med in &meds {
            let hits = result.due.iter().filter(|r| r.medication.id == med.id).count()
                + result.upcoming.iter().filter(|r| r.medication.id == med.id).count()
                + result.dormant.iter().filter(|d| d.medication.id == med.id).count();
            prop_assert_eq!(hits, 1);
        }
    }

    #[test]
    fn due_and_upcoming_are_ordered_and_windowed(
        now in now_strategy(),
        schedules in prop::collection::vec(times_strategy(), 0..8),
    ) {
        let meds: Vec<_> = schedules
            .iter()
            .enumerate()
            .map(|(i, times)| medication(i as i64 + 1, true, times))
            .collect();
        let result = classify(now, &meds);

        for pair in result.due.windows(2) {
            prop_assert!(pair[0].next_reminder <= pair[1].next_reminder);
        }
        for pair in result.upcoming.windows(2) {
            prop_assert!(pair[0].next_reminder <= pair[1].next_reminder);
        }
        for reminder in &result.due {
            let delta = reminder.next_reminder - now;
            prop_assert!(delta >= Duration::zero() && delta <= Duration::hours(1));
        }
        for reminder in &result.upcoming {
            let delta = reminder.next_reminder - now;
            prop_assert!(delta > Duration::hours(1) && delta <= Duration::hours(4));
        }
    }

    #[test]
    fn next_occurrence_is_within_a_day(now in now_strategy(), times in times_strategy()) {
        match next_occurrence(now, &times) {
            None => prop_assert!(times.is_empty()),
            Some(next) => {
                prop_assert!(next >= now);
                prop_assert!(next - now <= Duration::days(1));
            }
        }
    }

    #[test]
    fn exact_minute_fires_once_and_stamps_now(
        offset in offset_strategy(),
        day in 1u32..=28,
        hour in 0u32..24,
        minute in 0u32..60,
        second in 0u32..60,
    ) {
        let now = offset.with_ymd_and_hms(2024, 5, day, hour, minute, second).unwrap();
        let slot = ReminderTime::new(hour, minute).unwrap();
        let mut meds = vec![medication(1, true, &[slot])];
        let guard = Duration::seconds(300);

        let fired = fire_due(now, &mut meds, guard);
        prop_assert_eq!(fired.len(), 1);
        prop_assert_eq!(meds[0].last_reminded, Some(now));

        // Same minute, later second: guard holds
        let again = now + Duration::seconds(i64::from(59 - second));
        prop_assert!(fire_due(again, &mut meds, guard).is_empty());
        prop_assert_eq!(meds[0].last_reminded, Some(now));
    }

    #[test]
    fn never_fires_twice_within_guard(
        now in now_strategy(),
        elapsed in 0i64..=300,
    ) {
        let slot = ReminderTime::new(
            chrono::Timelike::hour(&now),
            chrono::Timelike::minute(&now),
        ).unwrap();
        let mut med = medication(1, true, &[slot]);
        med.last_reminded = Some(now - Duration::seconds(elapsed));
        let mut meds = vec![med];

        prop_assert!(fire_due(now, &mut meds, Duration::seconds(300)).is_empty());
    }
}
