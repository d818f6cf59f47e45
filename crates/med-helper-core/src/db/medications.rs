//! Medication database operations.

use chrono::{DateTime, Duration, FixedOffset};
use rusqlite::{params, OptionalExtension, Row, Transaction, TransactionBehavior};

use super::{Database, DbError, DbResult};
use crate::models::Medication;

const MEDICATION_COLUMNS: &str = r#"
    id, name, dosage, frequency, notes,
    reminder_enabled, reminder_times, last_reminded, created_at
"#;

impl Database {
    /// Insert a new medication, returning its store-assigned ID.
    pub fn insert_medication(&self, medication: &Medication) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO medications (
                name, dosage, frequency, notes,
                reminder_enabled, reminder_times, last_reminded, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                medication.name,
                medication.dosage,
                medication.frequency,
                medication.notes,
                medication.reminder_enabled,
                medication.reminder_times,
                medication.last_reminded.map(|t| t.to_rfc3339()),
                medication.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Update an editable medication. `last_reminded` is left untouched.
    pub fn update_medication(&self, medication: &Medication) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE medications SET
                name = ?2,
                dosage = ?3,
                frequency = ?4,
                notes = ?5,
                reminder_enabled = ?6,
                reminder_times = ?7
            WHERE id = ?1
            "#,
            params![
                medication.id,
                medication.name,
                medication.dosage,
                medication.frequency,
                medication.notes,
                medication.reminder_enabled,
                medication.reminder_times,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a medication by ID.
    pub fn get_medication(&self, id: i64) -> DbResult<Option<Medication>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM medications WHERE id = ?", MEDICATION_COLUMNS),
                [id],
                MedicationRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all medications in insertion order.
    pub fn list_medications(&self) -> DbResult<Vec<Medication>> {
        self.query_medications(&format!(
            "SELECT {} FROM medications ORDER BY id",
            MEDICATION_COLUMNS
        ))
    }

    /// List medications with reminders switched on, in insertion order.
    pub fn list_reminder_medications(&self) -> DbResult<Vec<Medication>> {
        self.query_medications(&format!(
            "SELECT {} FROM medications WHERE reminder_enabled = 1 ORDER BY id",
            MEDICATION_COLUMNS
        ))
    }

    fn query_medications(&self, sql: &str) -> DbResult<Vec<Medication>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], MedicationRow::from_row)?;

        // One unreadable stamp must not hide the rest of the list
        let mut medications = Vec::new();
        for row in rows {
            medications.push(row?.into_medication_lossy());
        }
        Ok(medications)
    }

    /// Delete a medication.
    pub fn delete_medication(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM medications WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Change a medication's reminder settings.
    pub fn set_reminder_schedule(&self, id: i64, enabled: bool, times: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE medications SET reminder_enabled = ?2, reminder_times = ?3 WHERE id = ?1",
            params![id, enabled, times],
        )?;
        Ok(rows_affected > 0)
    }

    /// Overwrite `last_reminded` unconditionally.
    pub fn set_last_reminded(&self, id: i64, at: Option<DateTime<FixedOffset>>) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE medications SET last_reminded = ?2 WHERE id = ?1",
            params![id, at.map(|t| t.to_rfc3339())],
        )?;
        Ok(rows_affected > 0)
    }

    /// Record that a reminder fired at `at`, unless another writer already
    /// recorded one within `guard` of it.
    ///
    /// Runs as a read-modify-write inside an immediate transaction so two
    /// pollers sharing the file cannot both claim the same minute. Returns
    /// `false` when the claim was lost.
    pub fn claim_reminder(
        &self,
        id: i64,
        at: DateTime<FixedOffset>,
        guard: Duration,
    ) -> DbResult<bool> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;

        let stored: Option<Option<String>> = tx
            .query_row(
                "SELECT last_reminded FROM medications WHERE id = ?",
                [id],
                |row| row.get(0),
            )
            .optional()?;

        let last_reminded = match stored {
            None => return Err(DbError::NotFound(format!("medication {}", id))),
            Some(raw) => parse_last_reminded(raw).unwrap_or_else(|e| {
                tracing::warn!(medication_id = id, error = %e, "overwriting unreadable last_reminded");
                None
            }),
        };

        if let Some(last) = last_reminded {
            if at.signed_duration_since(last) <= guard {
                return Ok(false);
            }
        }

        tx.execute(
            "UPDATE medications SET last_reminded = ?2 WHERE id = ?1",
            params![id, at.to_rfc3339()],
        )?;
        tx.commit()?;
        Ok(true)
    }
}

/// Intermediate row struct for database mapping.
struct MedicationRow {
    id: i64,
    name: String,
    dosage: String,
    frequency: String,
    notes: Option<String>,
    reminder_enabled: bool,
    reminder_times: String,
    last_reminded: Option<String>,
    created_at: String,
}

impl MedicationRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            dosage: row.get(2)?,
            frequency: row.get(3)?,
            notes: row.get(4)?,
            reminder_enabled: row.get(5)?,
            reminder_times: row.get(6)?,
            last_reminded: row.get(7)?,
            created_at: row.get(8)?,
        })
    }
}

impl MedicationRow {
    fn into_medication(self, last_reminded: Option<DateTime<FixedOffset>>) -> Medication {
        Medication {
            id: self.id,
            name: self.name,
            dosage: self.dosage,
            frequency: self.frequency,
            notes: self.notes,
            reminder_enabled: self.reminder_enabled,
            reminder_times: self.reminder_times,
            last_reminded,
            created_at: self.created_at,
        }
    }

    /// Convert, treating an unreadable `last_reminded` as never reminded.
    fn into_medication_lossy(mut self) -> Medication {
        let last_reminded = parse_last_reminded(self.last_reminded.take()).unwrap_or_else(|e| {
            tracing::warn!(medication_id = self.id, error = %e, "ignoring unreadable last_reminded");
            None
        });
        self.into_medication(last_reminded)
    }
}

impl TryFrom<MedicationRow> for Medication {
    type Error = DbError;

    fn try_from(mut row: MedicationRow) -> Result<Self, Self::Error> {
        let last_reminded = parse_last_reminded(row.last_reminded.take())?;
        Ok(row.into_medication(last_reminded))
    }
}

fn parse_last_reminded(raw: Option<String>) -> DbResult<Option<DateTime<FixedOffset>>> {
    raw.filter(|s| !s.is_empty())
        .map(|s| {
            DateTime::parse_from_rfc3339(&s).map_err(|_| DbError::InvalidValue {
                column: "last_reminded",
                value: s,
            })
        })
        .transpose()
}
