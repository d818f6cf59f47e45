//! Vital signs log export (blood pressure, blood sugar and the rest).

use serde::{Deserialize, Serialize};

use crate::db::{Database, DbResult};
use crate::models::{VitalSigns, VITALS_DATETIME_FORMAT};

/// All recorded readings, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalsExport {
    /// Export timestamp
    pub exported_at: String,
    /// Readings, newest first
    pub readings: Vec<VitalSigns>,
}

impl VitalsExport {
    /// Wrap a set of readings.
    pub fn new(readings: Vec<VitalSigns>) -> Self {
        Self {
            exported_at: chrono::Utc::now().to_rfc3339(),
            readings,
        }
    }

    /// Load every reading from the database.
    pub fn load(db: &Database) -> DbResult<Self> {
        Ok(Self::new(db.list_vitals()?))
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("recorded_at,systolic_bp,diastolic_bp,heart_rate,temperature_c,respiratory_rate,oxygen_saturation,blood_sugar,notes\n");

        for reading in &self.readings {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{}\n",
                reading.recorded_at.format(VITALS_DATETIME_FORMAT),
                opt(reading.systolic_bp),
                opt(reading.diastolic_bp),
                opt(reading.heart_rate),
                opt(reading.temperature_c),
                opt(reading.respiratory_rate),
                opt(reading.oxygen_saturation),
                opt(reading.blood_sugar),
                escape_csv(reading.notes.as_deref().unwrap_or("")),
            ));
        }

        csv
    }
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
