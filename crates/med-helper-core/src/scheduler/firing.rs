//! Exact-minute reminder firing with a refire guard.

use chrono::{DateTime, Duration, FixedOffset, Timelike};

use crate::models::{FiredReminder, Medication, ReminderTime};

/// The wall-clock minute `now` falls in.
pub fn minute_of(now: DateTime<FixedOffset>) -> ReminderTime {
    ReminderTime {
        hour: now.hour(),
        minute: now.minute(),
    }
}

/// Whether `medication` should fire at `now`.
///
/// Requires an exact HH:MM match with one of its reminder times and no
/// acknowledgment within `guard` of `now`.
pub fn should_fire(now: DateTime<FixedOffset>, medication: &Medication, guard: Duration) -> bool {
    if !medication.reminder_enabled {
        return false;
    }

    let minute = minute_of(now);
    if !medication.parsed_reminder_times().contains(&minute) {
        return false;
    }

    match medication.last_reminded {
        None => true,
        Some(last) => now.signed_duration_since(last) > guard,
    }
}

/// Fire every matching medication, stamping `last_reminded = now` on each.
pub fn fire_due(
    now: DateTime<FixedOffset>,
    medications: &mut [Medication],
    guard: Duration,
) -> Vec<FiredReminder> {
    let mut fired = Vec::new();
    for medication in medications.iter_mut() {
        if should_fire(now, medication, guard) {
            medication.last_reminded = Some(now);
            fired.push(FiredReminder::from(&*medication));
        }
    }
    fired
}

/// How long a poller should sleep after a check at `now`.
///
/// Never sleeps past the start of the next wall-clock minute, so every
/// minute gets at least one check. Shorter intervals re-check within the
/// minute and rely on the guard window.
pub fn next_poll_delay(now: DateTime<FixedOffset>, interval: std::time::Duration) -> std::time::Duration {
    let into_minute = Duration::seconds(i64::from(now.second()))
        + Duration::nanoseconds(i64::from(now.nanosecond().min(999_999_999)));
    let to_boundary = (Duration::minutes(1) - into_minute)
        .to_std()
        .unwrap_or_default();
    interval.min(to_boundary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const GUARD: i64 = 300;

    fn at(day: u32, h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 7, day, h, m, s)
            .unwrap()
    }

    fn med(id: i64, times: &str) -> Medication {
        let mut med = Medication::new(format!("med-{}", id), "5mg".into(), "daily".into())
            .with_reminders(times);
        med.id = id;
        med.notes = Some("after breakfast".into());
        med
    }

    #[test]
    fn test_fires_on_exact_minute() {
        let now = at(1, 8, 0, 0);
        let mut meds = vec![med(1, "08:00,20:00")];

        let fired = fire_due(now, &mut meds, Duration::seconds(GUARD));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].name, "med-1");
        assert_eq!(fired[0].dosage, "5mg");
        assert_eq!(fired[0].notes, Some("after breakfast".into()));
        assert_eq!(meds[0].last_reminded, Some(now));
    }

    #[test]
    fn test_seconds_within_minute_still_match() {
        let mut meds = vec![med(1, "08:00")];
        let fired = fire_due(at(1, 8, 0, 59), &mut meds, Duration::seconds(GUARD));
        assert_eq!(fired.len(), 1);
    }

    #[test]
    fn test_near_miss_does_not_fire() {
        let mut meds = vec![med(1, "08:00")];
        assert!(fire_due(at(1, 7, 59, 59), &mut meds, Duration::seconds(GUARD)).is_empty());
        assert!(fire_due(at(1, 8, 1, 0), &mut meds, Duration::seconds(GUARD)).is_empty());
        assert_eq!(meds[0].last_reminded, None);
    }

    #[test]
    fn test_guard_prevents_refire() {
        let mut meds = vec![med(1, "08:00")];

        assert_eq!(fire_due(at(1, 8, 0, 0), &mut meds, Duration::seconds(GUARD)).len(), 1);
        assert!(fire_due(at(1, 8, 0, 30), &mut meds, Duration::seconds(GUARD)).is_empty());
        assert_eq!(meds[0].last_reminded, Some(at(1, 8, 0, 0)));
    }

    #[test]
    fn test_refires_next_day() {
        let mut meds = vec![med(1, "08:00")];

        assert_eq!(fire_due(at(1, 8, 0, 0), &mut meds, Duration::seconds(GUARD)).len(), 1);
        assert_eq!(fire_due(at(2, 8, 0, 0), &mut meds, Duration::seconds(GUARD)).len(), 1);
    }

    #[test]
    fn test_disabled_and_empty_never_fire() {
        let mut disabled = med(1, "08:00");
        disabled.reminder_enabled = false;
        let mut meds = vec![disabled, med(2, "")];

        assert!(fire_due(at(1, 8, 0, 0), &mut meds, Duration::seconds(GUARD)).is_empty());
    }

    #[test]
    fn test_fired_payload_omits_id() {
        let mut meds = vec![med(7, "08:00")];
        let fired = fire_due(at(1, 8, 0, 0), &mut meds, Duration::seconds(GUARD));
        assert_eq!(fired[0].medication_id, 7);

        let json = serde_json::to_value(&fired[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "med-7", "dosage": "5mg", "notes": "after breakfast"})
        );
    }

    #[test]
    fn test_poll_delay_stops_at_minute_boundary() {
        let minute = std::time::Duration::from_secs(60);

        assert_eq!(next_poll_delay(at(1, 8, 0, 45), minute), std::time::Duration::from_secs(15));
        assert_eq!(next_poll_delay(at(1, 8, 0, 0), minute), minute);

        let drifted = at(1, 8, 0, 59) + Duration::milliseconds(900);
        assert_eq!(next_poll_delay(drifted, minute), std::time::Duration::from_millis(100));
    }

    #[test]
    fn test_poll_delay_honors_shorter_interval() {
        let half = std::time::Duration::from_secs(30);
        assert_eq!(next_poll_delay(at(1, 8, 0, 10), half), half);
        assert_eq!(next_poll_delay(at(1, 8, 0, 40), half), std::time::Duration::from_secs(20));
    }
}
