//! Notification payload for polling clients.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::models::{DueCheck, FiredReminder};

/// Reminders fired in one check, as delivered to a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationPayload {
    /// When the check ran
    pub generated_at: String,
    /// Fired reminders, in firing order
    pub reminders: Vec<FiredReminder>,
}

impl NotificationPayload {
    /// Build a payload from a due check.
    pub fn from_check(check: &DueCheck, generated_at: DateTime<FixedOffset>) -> Self {
        Self {
            generated_at: generated_at.to_rfc3339(),
            reminders: check.fired.clone(),
        }
    }

    /// Whether there is anything to deliver.
    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    /// Notification title for a single reminder.
    pub fn title_for(reminder: &FiredReminder) -> String {
        format!("Medication Reminder: {}", reminder.name)
    }

    /// Notification body for a single reminder.
    pub fn body_for(reminder: &FiredReminder) -> String {
        match reminder.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            Some(notes) => format!("Time to take {} ({}). {}", reminder.name, reminder.dosage, notes),
            None => format!("Time to take {} ({})!", reminder.name, reminder.dosage),
        }
    }

    /// Export to compact JSON (one line per payload).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fired(name: &str, notes: Option<&str>) -> FiredReminder {
        FiredReminder {
            medication_id: 1,
            name: name.into(),
            dosage: "10mg".into(),
            notes: notes.map(Into::into),
        }
    }

    #[test]
    fn test_payload_json_shape() {
        let check = DueCheck {
            fired: vec![fired("Lisinopril", Some("With water"))],
            persist_failures: vec![],
        };
        let at = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 1, 8, 0, 0)
            .unwrap();

        let payload = NotificationPayload::from_check(&check, at);
        let json: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();

        assert_eq!(json["generated_at"], "2024-01-01T08:00:00+00:00");
        assert_eq!(json["reminders"][0]["name"], "Lisinopril");
        assert_eq!(json["reminders"][0]["dosage"], "10mg");
        assert_eq!(json["reminders"][0]["notes"], "With water");
        assert!(json["reminders"][0].get("medication_id").is_none());
    }

    #[test]
    fn test_title_and_body() {
        let with_notes = fired("Metformin", Some("After dinner"));
        assert_eq!(
            NotificationPayload::title_for(&with_notes),
            "Medication Reminder: Metformin"
        );
        assert_eq!(
            NotificationPayload::body_for(&with_notes),
            "Time to take Metformin (10mg). After dinner"
        );

        let bare = fired("Metformin", Some("  "));
        assert_eq!(NotificationPayload::body_for(&bare), "Time to take Metformin (10mg)!");
    }
}
