//! Vital signs database operations.

use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::VitalSigns;

const STORED_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const VITALS_COLUMNS: &str = r#"
    id, recorded_at, systolic_bp, diastolic_bp, heart_rate, temperature_c,
    respiratory_rate, oxygen_saturation, blood_sugar, notes
"#;

impl Database {
    /// Record a new set of vital signs, returning its ID.
    pub fn insert_vitals(&self, vitals: &VitalSigns) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO vital_signs (
                recorded_at, systolic_bp, diastolic_bp, heart_rate, temperature_c,
                respiratory_rate, oxygen_saturation, blood_sugar, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                vitals.recorded_at.format(STORED_DATETIME_FORMAT).to_string(),
                vitals.systolic_bp,
                vitals.diastolic_bp,
                vitals.heart_rate,
                vitals.temperature_c,
                vitals.respiratory_rate,
                vitals.oxygen_saturation,
                vitals.blood_sugar,
                vitals.notes,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a reading by ID.
    pub fn get_vitals(&self, id: i64) -> DbResult<Option<VitalSigns>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM vital_signs WHERE id = ?", VITALS_COLUMNS),
                [id],
                VitalsRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all readings, newest first.
    pub fn list_vitals(&self) -> DbResult<Vec<VitalSigns>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM vital_signs ORDER BY recorded_at DESC, id DESC",
            VITALS_COLUMNS
        ))?;
        let rows = stmt.query_map([], VitalsRow::from_row)?;

        let mut readings = Vec::new();
        for row in rows {
            readings.push(row?.try_into()?);
        }
        tracing::debug!(count = readings.len(), "listed vital signs");
        Ok(readings)
    }

    /// The most recent reading, if any.
    pub fn latest_vitals(&self) -> DbResult<Option<VitalSigns>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM vital_signs ORDER BY recorded_at DESC, id DESC LIMIT 1",
                    VITALS_COLUMNS
                ),
                [],
                VitalsRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Delete a reading.
    pub fn delete_vitals(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM vital_signs WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct VitalsRow {
    id: i64,
    recorded_at: String,
    systolic_bp: Option<i64>,
    diastolic_bp: Option<i64>,
    heart_rate: Option<i64>,
    temperature_c: Option<f64>,
    respiratory_rate: Option<i64>,
    oxygen_saturation: Option<i64>,
    blood_sugar: Option<f64>,
    notes: Option<String>,
}

impl VitalsRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            recorded_at: row.get(1)?,
            systolic_bp: row.get(2)?,
            diastolic_bp: row.get(3)?,
            heart_rate: row.get(4)?,
            temperature_c: row.get(5)?,
            respiratory_rate: row.get(6)?,
            oxygen_saturation: row.get(7)?,
            blood_sugar: row.get(8)?,
            notes: row.get(9)?,
        })
    }
}

impl TryFrom<VitalsRow> for VitalSigns {
    type Error = DbError;

    fn try_from(row: VitalsRow) -> Result<Self, Self::Error> {
        let recorded_at = NaiveDateTime::parse_from_str(&row.recorded_at, STORED_DATETIME_FORMAT)
            .map_err(|_| DbError::InvalidValue {
                column: "recorded_at",
                value: row.recorded_at.clone(),
            })?;

        Ok(VitalSigns {
            id: row.id,
            recorded_at,
            systolic_bp: row.systolic_bp,
            diastolic_bp: row.diastolic_bp,
            heart_rate: row.heart_rate,
            temperature_c: row.temperature_c,
            respiratory_rate: row.respiratory_rate,
            oxygen_saturation: row.oxygen_saturation,
            blood_sugar: row.blood_sugar,
            notes: row.notes,
        })
    }
}
