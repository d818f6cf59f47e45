//! Medication models and reminder time-of-day parsing.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};

/// A time of day at which a medication should be taken, independent of date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReminderTime {
    /// Hour, 0-23
    pub hour: u32,
    /// Minute, 0-59
    pub minute: u32,
}

impl ReminderTime {
    /// Build a reminder time, rejecting out-of-range components.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour <= 23 && minute <= 59).then_some(Self { hour, minute })
    }

    /// The wall-clock time this reminder represents.
    pub fn as_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ReminderTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("missing ':' in reminder time {:?}", s))?;

        let hour: u32 = hour
            .trim()
            .parse()
            .map_err(|_| format!("invalid hour in reminder time {:?}", s))?;
        let minute: u32 = minute
            .trim()
            .parse()
            .map_err(|_| format!("invalid minute in reminder time {:?}", s))?;

        Self::new(hour, minute).ok_or_else(|| format!("reminder time out of range: {:?}", s))
    }
}

/// Parse a stored comma-separated reminder list such as `"08:00,20:00"`.
///
/// Malformed entries are dropped; an empty or blank string yields no times.
pub fn parse_reminder_times(raw: &str) -> Vec<ReminderTime> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse::<ReminderTime>() {
            Ok(time) => Some(time),
            Err(reason) => {
                tracing::warn!(%reason, "skipping malformed reminder time");
                None
            }
        })
        .collect()
}

/// Encode reminder times back into the stored comma-separated form.
pub fn format_reminder_times(times: &[ReminderTime]) -> String {
    times
        .iter()
        .map(ReminderTime::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// A medication record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    /// Store-assigned ID (0 until inserted)
    pub id: i64,
    /// Display name
    pub name: String,
    /// Dosage, e.g. "10mg"
    pub dosage: String,
    /// Free-text frequency, e.g. "twice daily"
    pub frequency: String,
    /// Additional notes
    pub notes: Option<String>,
    /// Whether reminders are scheduled for this medication
    pub reminder_enabled: bool,
    /// Comma-separated HH:MM list as stored
    pub reminder_times: String,
    /// Last instant a reminder was acknowledged
    pub last_reminded: Option<DateTime<FixedOffset>>,
    /// Creation timestamp
    pub created_at: String,
}

impl Medication {
    /// Create a new medication with required fields. Reminders start disabled.
    pub fn new(name: String, dosage: String, frequency: String) -> Self {
        Self {
            id: 0,
            name,
            dosage,
            frequency,
            notes: None,
            reminder_enabled: false,
            reminder_times: String::new(),
            last_reminded: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Enable reminders at the given comma-separated times.
    pub fn with_reminders(mut self, times: &str) -> Self {
        self.reminder_enabled = true;
        self.reminder_times = times.to_string();
        self
    }

    /// Parsed reminder times; malformed entries are skipped.
    pub fn parsed_reminder_times(&self) -> Vec<ReminderTime> {
        parse_reminder_times(&self.reminder_times)
    }

    /// Whether this medication takes part in scheduling at all.
    pub fn is_schedulable(&self) -> bool {
        self.reminder_enabled && !self.parsed_reminder_times().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_time() {
        let time: ReminderTime = "08:30".parse().unwrap();
        assert_eq!(time, ReminderTime { hour: 8, minute: 30 });
        assert_eq!(time.to_string(), "08:30");
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!("24:00".parse::<ReminderTime>().is_err());
        assert!("12:60".parse::<ReminderTime>().is_err());
        assert!("noon".parse::<ReminderTime>().is_err());
        assert!("-1:30".parse::<ReminderTime>().is_err());
    }

    #[test]
    fn test_parse_list_skips_malformed() {
        let times = parse_reminder_times("08:00, bogus ,25:10,20:15,");
        assert_eq!(
            times,
            vec![
                ReminderTime { hour: 8, minute: 0 },
                ReminderTime { hour: 20, minute: 15 },
            ]
        );
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(parse_reminder_times("").is_empty());
        assert!(parse_reminder_times(" , ").is_empty());
    }

    #[test]
    fn test_single_digit_hour_accepted() {
        let times = parse_reminder_times("7:05");
        assert_eq!(times, vec![ReminderTime { hour: 7, minute: 5 }]);
        assert_eq!(format_reminder_times(&times), "07:05");
    }

    #[test]
    fn test_new_medication_not_schedulable() {
        let med = Medication::new("Lisinopril".into(), "10mg".into(), "daily".into());
        assert!(!med.reminder_enabled);
        assert!(!med.is_schedulable());

        let med = med.with_reminders("08:00");
        assert!(med.is_schedulable());
    }

    #[test]
    fn test_enabled_with_garbage_times_not_schedulable() {
        let med = Medication::new("Metformin".into(), "500mg".into(), "daily".into())
            .with_reminders("later,soon");
        assert!(!med.is_schedulable());
    }
}
