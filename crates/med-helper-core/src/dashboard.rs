//! Home screen summary.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::models::{Classification, UserProfile, VitalSigns};
use crate::scheduler::{ReminderEngine, ReminderPolicy, SchedulerResult};

/// Everything the home screen shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub profile: UserProfile,
    /// Age in whole years on the evaluation date
    pub age: u32,
    pub reminders: Classification,
    pub latest_vitals: Option<VitalSigns>,
}

impl Dashboard {
    /// Assemble the dashboard as of `now`.
    pub fn load(
        db: &Database,
        now: DateTime<FixedOffset>,
        policy: ReminderPolicy,
    ) -> SchedulerResult<Self> {
        let today = now.date_naive();
        let profile = db.get_or_create_profile(today)?;
        let reminders = ReminderEngine::new(db, policy).classify_all(now)?;
        let latest_vitals = db.latest_vitals()?;

        Ok(Self {
            age: profile.age_on(today),
            profile,
            reminders,
            latest_vitals,
        })
    }
}
