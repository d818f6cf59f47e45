//! Vital sign readings.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Input format for reading timestamps (`datetime-local` form value).
pub const VITALS_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// A single set of vital sign measurements. Every measurement is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VitalSigns {
    /// Store-assigned ID (0 until inserted)
    pub id: i64,
    /// Local wall-clock time of the reading
    pub recorded_at: NaiveDateTime,
    /// Systolic blood pressure (mmHg)
    pub systolic_bp: Option<i64>,
    /// Diastolic blood pressure (mmHg)
    pub diastolic_bp: Option<i64>,
    /// Heart rate (bpm)
    pub heart_rate: Option<i64>,
    /// Body temperature (°C)
    pub temperature_c: Option<f64>,
    /// Breaths per minute
    pub respiratory_rate: Option<i64>,
    /// SpO2 (%)
    pub oxygen_saturation: Option<i64>,
    /// Blood glucose level
    pub blood_sugar: Option<f64>,
    pub notes: Option<String>,
}

impl VitalSigns {
    /// Create an empty reading at the given time.
    pub fn new(recorded_at: NaiveDateTime) -> Self {
        Self {
            id: 0,
            recorded_at,
            systolic_bp: None,
            diastolic_bp: None,
            heart_rate: None,
            temperature_c: None,
            respiratory_rate: None,
            oxygen_saturation: None,
            blood_sugar: None,
            notes: None,
        }
    }

    /// Parse a `YYYY-MM-DDTHH:MM` reading time.
    pub fn parse_recorded_at(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        NaiveDateTime::parse_from_str(s.trim(), VITALS_DATETIME_FORMAT)
    }

    /// Blood pressure as "systolic/diastolic", if both are present.
    pub fn blood_pressure(&self) -> Option<String> {
        match (self.systolic_bp, self.diastolic_bp) {
            (Some(sys), Some(dia)) => Some(format!("{}/{}", sys, dia)),
            _ => None,
        }
    }
}
