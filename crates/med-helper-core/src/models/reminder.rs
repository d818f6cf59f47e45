//! Reminder scheduling outputs.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::medication::Medication;

/// A medication with a next reminder inside the due or upcoming window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledReminder {
    pub medication: Medication,
    /// Next occurrence of any of the medication's reminder times
    pub next_reminder: DateTime<FixedOffset>,
    /// Seconds from the evaluation time until `next_reminder`
    pub seconds_until: i64,
}

/// Why a medication is not due or upcoming.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DormantReason {
    /// Reminders are switched off
    Disabled,
    /// Enabled, but no parseable reminder time
    NoSchedule,
    /// Already reminded for the current cycle
    Acknowledged,
    /// Next reminder is more than the upcoming window away
    OutsideWindow,
}

/// A medication that needs no attention right now.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DormantMedication {
    pub medication: Medication,
    pub reason: DormantReason,
    /// Next occurrence, when one could be computed
    pub next_reminder: Option<DateTime<FixedOffset>>,
}

/// Partition of medications into due, upcoming and dormant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Classification {
    /// Due within the due window, soonest first
    pub due: Vec<ScheduledReminder>,
    /// Due within the upcoming window, soonest first
    pub upcoming: Vec<ScheduledReminder>,
    /// Everything else, in no particular order
    pub dormant: Vec<DormantMedication>,
}

impl Classification {
    /// Total number of medications classified.
    pub fn len(&self) -> usize {
        self.due.len() + self.upcoming.len() + self.dormant.len()
    }

    /// Whether no medications were classified.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of due medications, in order.
    pub fn due_names(&self) -> Vec<&str> {
        self.due.iter().map(|r| r.medication.name.as_str()).collect()
    }

    /// Names of upcoming medications, in order.
    pub fn upcoming_names(&self) -> Vec<&str> {
        self.upcoming
            .iter()
            .map(|r| r.medication.name.as_str())
            .collect()
    }

    /// Look up the dormant reason for a medication, if it is dormant.
    pub fn dormant_reason(&self, medication_id: i64) -> Option<DormantReason> {
        self.dormant
            .iter()
            .find(|d| d.medication.id == medication_id)
            .map(|d| d.reason)
    }
}

/// A reminder that fired at an exact minute match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FiredReminder {
    #[serde(skip)]
    pub medication_id: i64,
    pub name: String,
    pub dosage: String,
    pub notes: Option<String>,
}

impl From<&Medication> for FiredReminder {
    fn from(med: &Medication) -> Self {
        Self {
            medication_id: med.id,
            name: med.name.clone(),
            dosage: med.dosage.clone(),
            notes: med.notes.clone(),
        }
    }
}

/// A `last_reminded` write that failed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistFailure {
    pub medication_id: i64,
    pub error: String,
}

/// Result of a push-style due check.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DueCheck {
    /// Reminders to deliver now
    pub fired: Vec<FiredReminder>,
    /// Non-fatal persistence failures; the reminders above still fired
    pub persist_failures: Vec<PersistFailure>,
}

impl DueCheck {
    /// Whether every fired reminder was persisted.
    pub fn fully_persisted(&self) -> bool {
        self.persist_failures.is_empty()
    }
}
