//! Medication reminder scheduling.
//!
//! Two entry points share one view of the medication list:
//!
//! - [`ReminderEngine::classify_all`]: windowed due/upcoming/dormant buckets
//!   for the dashboard. Read-only.
//! - [`ReminderEngine::check_due_now`]: exact-minute firing for push
//!   notifications. Stamps `last_reminded` on every medication it fires.

mod classifier;
mod firing;

pub use classifier::*;
pub use firing::*;

use chrono::{DateTime, Duration, FixedOffset};
use thiserror::Error;

use crate::db::{Database, DbError, DbResult};
use crate::models::{Classification, DueCheck, Medication, PersistFailure};

/// Scheduler errors.
#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Medication store error: {0}")]
    Store(#[from] DbError),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Window sizes for classification and the refire guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderPolicy {
    /// Next reminder at most this far away is due
    pub due_window: Duration,
    /// Next reminder at most this far away is upcoming
    pub upcoming_window: Duration,
    /// A fired medication will not fire again within this interval
    pub guard_window: Duration,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self {
            due_window: Duration::hours(1),
            upcoming_window: Duration::hours(4),
            guard_window: Duration::seconds(300),
        }
    }
}

/// Where the engine reads medications from and records fired reminders.
pub trait MedicationStore {
    /// Every medication, enabled or not.
    fn all_medications(&self) -> DbResult<Vec<Medication>>;

    /// Medications with reminders switched on.
    fn reminder_medications(&self) -> DbResult<Vec<Medication>>;

    /// Atomically set `last_reminded = at` unless it already lies within
    /// `guard` of `at`. Returns whether this caller won the claim.
    fn claim_reminder(&self, id: i64, at: DateTime<FixedOffset>, guard: Duration)
        -> DbResult<bool>;
}

impl MedicationStore for Database {
    fn all_medications(&self) -> DbResult<Vec<Medication>> {
        self.list_medications()
    }

    fn reminder_medications(&self) -> DbResult<Vec<Medication>> {
        self.list_reminder_medications()
    }

    fn claim_reminder(
        &self,
        id: i64,
        at: DateTime<FixedOffset>,
        guard: Duration,
    ) -> DbResult<bool> {
        Database::claim_reminder(self, id, at, guard)
    }
}

/// Reminder engine over a medication store.
pub struct ReminderEngine<'a, S: MedicationStore + ?Sized = Database> {
    store: &'a S,
    classifier: Classifier,
    policy: ReminderPolicy,
}

impl<'a, S: MedicationStore + ?Sized> ReminderEngine<'a, S> {
    /// Create an engine with the given policy.
    pub fn new(store: &'a S, policy: ReminderPolicy) -> Self {
        Self {
            store,
            classifier: Classifier::new(policy),
            policy,
        }
    }

    /// Create an engine with the default windows.
    pub fn with_defaults(store: &'a S) -> Self {
        Self::new(store, ReminderPolicy::default())
    }

    /// The policy in effect.
    pub fn policy(&self) -> &ReminderPolicy {
        &self.policy
    }

    /// Classify every stored medication relative to `now`.
    pub fn classify_all(&self, now: DateTime<FixedOffset>) -> SchedulerResult<Classification> {
        let medications = self.store.all_medications()?;
        Ok(self.classifier.classify(now, &medications))
    }

    /// Fire reminders whose time-of-day is exactly `now`'s minute.
    ///
    /// Each fired medication is claimed individually. A claim lost to
    /// another poller drops that reminder; a claim that errors keeps the
    /// reminder and is reported in `persist_failures`.
    pub fn check_due_now(&self, now: DateTime<FixedOffset>) -> SchedulerResult<DueCheck> {
        let guard = self.policy.guard_window;
        let mut medications = self.store.reminder_medications()?;
        let candidates = fire_due(now, &mut medications, guard);

        let mut check = DueCheck::default();
        for reminder in candidates {
            match self.store.claim_reminder(reminder.medication_id, now, guard) {
                Ok(true) => {
                    tracing::info!(
                        medication_id = reminder.medication_id,
                        name = %reminder.name,
                        "reminder fired"
                    );
                    check.fired.push(reminder);
                }
                Ok(false) => {
                    tracing::debug!(
                        medication_id = reminder.medication_id,
                        "reminder already claimed within guard window"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        medication_id = reminder.medication_id,
                        error = %e,
                        "failed to persist last_reminded"
                    );
                    check.persist_failures.push(PersistFailure {
                        medication_id: reminder.medication_id,
                        error: e.to_string(),
                    });
                    check.fired.push(reminder);
                }
            }
        }

        Ok(check)
    }
}
