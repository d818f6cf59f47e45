//! Emergency contact database operations.

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::EmergencyContact;

fn contact_from_row(row: &Row<'_>) -> rusqlite::Result<EmergencyContact> {
    Ok(EmergencyContact {
        id: row.get(0)?,
        name: row.get(1)?,
        relationship: row.get(2)?,
        phone_primary: row.get(3)?,
        phone_secondary: row.get(4)?,
        email: row.get(5)?,
        address: row.get(6)?,
        notes: row.get(7)?,
        created_at: row.get(8)?,
        last_updated: row.get(9)?,
    })
}

impl Database {
    /// Insert a new emergency contact, returning its ID.
    pub fn insert_contact(&self, contact: &EmergencyContact) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO emergency_contacts (
                name, relationship, phone_primary, phone_secondary,
                email, address, notes, created_at, last_updated
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                contact.name,
                contact.relationship,
                contact.phone_primary,
                contact.phone_secondary,
                contact.email,
                contact.address,
                contact.notes,
                contact.created_at,
                contact.last_updated,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Update an existing contact.
    pub fn update_contact(&self, contact: &EmergencyContact) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE emergency_contacts SET
                name = ?2,
                relationship = ?3,
                phone_primary = ?4,
                phone_secondary = ?5,
                email = ?6,
                address = ?7,
                notes = ?8,
                last_updated = ?9
            WHERE id = ?1
            "#,
            params![
                contact.id,
                contact.name,
                contact.relationship,
                contact.phone_primary,
                contact.phone_secondary,
                contact.email,
                contact.address,
                contact.notes,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a contact by ID.
    pub fn get_contact(&self, id: i64) -> DbResult<Option<EmergencyContact>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, relationship, phone_primary, phone_secondary,
                       email, address, notes, created_at, last_updated
                FROM emergency_contacts
                WHERE id = ?
                "#,
                [id],
                contact_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List contacts, newest first.
    pub fn list_contacts(&self) -> DbResult<Vec<EmergencyContact>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, relationship, phone_primary, phone_secondary,
                   email, address, notes, created_at, last_updated
            FROM emergency_contacts
            ORDER BY created_at DESC, id DESC
            "#,
        )?;

        let rows = stmt.query_map([], contact_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a contact.
    pub fn delete_contact(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM emergency_contacts WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}
