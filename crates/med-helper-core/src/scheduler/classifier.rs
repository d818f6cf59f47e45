//! Windowed classification of medications into due, upcoming and dormant.

use chrono::{DateTime, Duration, FixedOffset, TimeZone};

use super::ReminderPolicy;
use crate::models::{
    Classification, DormantMedication, DormantReason, Medication, ReminderTime, ScheduledReminder,
};

/// Earliest occurrence of any of `times` at or after `now`, in `now`'s offset.
///
/// Each time is placed on `now`'s calendar day; slots already past roll
/// forward one day.
pub fn next_occurrence(
    now: DateTime<FixedOffset>,
    times: &[ReminderTime],
) -> Option<DateTime<FixedOffset>> {
    let offset = *now.offset();
    let today = now.date_naive();

    times
        .iter()
        .filter_map(|time| {
            offset
                .from_local_datetime(&today.and_time(time.as_naive_time()))
                .single()
        })
        .map(|candidate| {
            if candidate < now {
                candidate + Duration::days(1)
            } else {
                candidate
            }
        })
        .min()
}

/// Most recent past occurrence of the slot that `next` was computed from.
pub fn previous_occurrence(
    now: DateTime<FixedOffset>,
    next: DateTime<FixedOffset>,
) -> DateTime<FixedOffset> {
    if next > now {
        next - Duration::days(1)
    } else {
        next
    }
}

/// Sorts medications into reminder buckets. Pure; never touches storage.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    policy: ReminderPolicy,
}

impl Classifier {
    /// Create a classifier with the given windows.
    pub fn new(policy: ReminderPolicy) -> Self {
        Self { policy }
    }

    /// Partition `medications` relative to `now`.
    ///
    /// `due` and `upcoming` are ordered soonest first, ties keeping input
    /// order.
    pub fn classify(
        &self,
        now: DateTime<FixedOffset>,
        medications: &[Medication],
    ) -> Classification {
        let mut result = Classification::default();

        for medication in medications {
            match self.bucket(now, medication) {
                Bucket::Due(next) => result.due.push(scheduled(now, medication, next)),
                Bucket::Upcoming(next) => result.upcoming.push(scheduled(now, medication, next)),
                Bucket::Dormant(reason, next_reminder) => result.dormant.push(DormantMedication {
                    medication: medication.clone(),
                    reason,
                    next_reminder,
                }),
            }
        }

        // Stable sorts: equal instants keep input order
        result.due.sort_by_key(|r| r.next_reminder);
        result.upcoming.sort_by_key(|r| r.next_reminder);

        result
    }

    fn bucket(&self, now: DateTime<FixedOffset>, medication: &Medication) -> Bucket {
        if !medication.reminder_enabled {
            return Bucket::Dormant(DormantReason::Disabled, None);
        }

        let times = medication.parsed_reminder_times();
        let Some(next) = next_occurrence(now, &times) else {
            return Bucket::Dormant(DormantReason::NoSchedule, None);
        };

        // One scalar acknowledgment covers every slot of the medication
        if let Some(last) = medication.last_reminded {
            if last > previous_occurrence(now, next) {
                return Bucket::Dormant(DormantReason::Acknowledged, Some(next));
            }
        }

        let delta = next - now;
        if delta <= self.policy.due_window {
            Bucket::Due(next)
        } else if delta <= self.policy.upcoming_window {
            Bucket::Upcoming(next)
        } else {
            Bucket::Dormant(DormantReason::OutsideWindow, Some(next))
        }
    }
}

enum Bucket {
    Due(DateTime<FixedOffset>),
    Upcoming(DateTime<FixedOffset>),
    Dormant(DormantReason, Option<DateTime<FixedOffset>>),
}

fn scheduled(
    now: DateTime<FixedOffset>,
    medication: &Medication,
    next: DateTime<FixedOffset>,
) -> ScheduledReminder {
    ScheduledReminder {
        medication: medication.clone(),
        next_reminder: next,
        seconds_until: (next - now).num_seconds(),
    }
}

/// Classify with the default one-hour and four-hour windows.
pub fn classify(now: DateTime<FixedOffset>, medications: &[Medication]) -> Classification {
    Classifier::default().classify(now, medications)
}
