//! User profile model.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Well-known key of the single profile row.
pub const PROFILE_ID: i64 = 1;

/// The user's health profile. There is exactly one per database.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    /// Height in cm
    pub height_cm: Option<f64>,
    /// Weight in kg
    pub weight_kg: Option<f64>,
    /// Blood type, e.g. "O+"
    pub blood_type: Option<String>,
    pub allergies: Option<String>,
    pub medical_conditions: Option<String>,
    /// Last update timestamp
    pub last_updated: String,
}

impl UserProfile {
    /// Placeholder profile used until the user fills in their details.
    pub fn placeholder(today: NaiveDate) -> Self {
        Self {
            first_name: "Default User".into(),
            last_name: String::new(),
            date_of_birth: today,
            height_cm: Some(0.0),
            weight_kg: Some(0.0),
            blood_type: None,
            allergies: None,
            medical_conditions: None,
            last_updated: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Age in whole years on the given date.
    pub fn age_on(&self, date: NaiveDate) -> u32 {
        let dob = self.date_of_birth;
        let mut age = date.year() - dob.year();
        if (date.month(), date.day()) < (dob.month(), dob.day()) {
            age -= 1;
        }
        age.max(0) as u32
    }

    /// Display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_before_and_after_birthday() {
        let mut profile = UserProfile::placeholder(date(2024, 1, 1));
        profile.date_of_birth = date(1980, 6, 15);

        assert_eq!(profile.age_on(date(2024, 6, 14)), 43);
        assert_eq!(profile.age_on(date(2024, 6, 15)), 44);
    }

    #[test]
    fn test_age_never_negative() {
        let profile = UserProfile::placeholder(date(2030, 1, 1));
        assert_eq!(profile.age_on(date(2024, 1, 1)), 0);
    }

    #[test]
    fn test_full_name() {
        let mut profile = UserProfile::placeholder(date(2024, 1, 1));
        assert_eq!(profile.full_name(), "Default User");

        profile.first_name = "Ada".into();
        profile.last_name = "Lovelace".into();
        assert_eq!(profile.full_name(), "Ada Lovelace");
    }
}
