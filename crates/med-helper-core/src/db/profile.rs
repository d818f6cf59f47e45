//! User profile database operations.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{UserProfile, PROFILE_ID};

impl Database {
    /// Get the profile, creating the placeholder row if it is missing.
    pub fn get_or_create_profile(&self, today: NaiveDate) -> DbResult<UserProfile> {
        if let Some(profile) = self.get_profile()? {
            return Ok(profile);
        }

        let profile = UserProfile::placeholder(today);
        self.conn.execute(
            r#"
            INSERT OR IGNORE INTO user_profile (
                id, first_name, last_name, date_of_birth, height_cm, weight_kg,
                blood_type, allergies, medical_conditions, last_updated
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                PROFILE_ID,
                profile.first_name,
                profile.last_name,
                profile.date_of_birth.to_string(),
                profile.height_cm,
                profile.weight_kg,
                profile.blood_type,
                profile.allergies,
                profile.medical_conditions,
                profile.last_updated,
            ],
        )?;
        tracing::info!("created default user profile");
        Ok(profile)
    }

    /// Get the profile, if present.
    pub fn get_profile(&self) -> DbResult<Option<UserProfile>> {
        self.conn
            .query_row(
                r#"
                SELECT first_name, last_name, date_of_birth, height_cm, weight_kg,
                       blood_type, allergies, medical_conditions, last_updated
                FROM user_profile
                WHERE id = ?
                "#,
                [PROFILE_ID],
                |row| {
                    Ok((
                        row.get::<_, String>(2)?,
                        UserProfile {
                            first_name: row.get(0)?,
                            last_name: row.get(1)?,
                            date_of_birth: NaiveDate::MIN,
                            height_cm: row.get(3)?,
                            weight_kg: row.get(4)?,
                            blood_type: row.get(5)?,
                            allergies: row.get(6)?,
                            medical_conditions: row.get(7)?,
                            last_updated: row.get(8)?,
                        },
                    ))
                },
            )
            .optional()?
            .map(|(dob, mut profile)| -> DbResult<UserProfile> {
                profile.date_of_birth = dob.parse().map_err(|_| DbError::InvalidValue {
                    column: "date_of_birth",
                    value: dob,
                })?;
                Ok(profile)
            })
            .transpose()
    }

    /// Overwrite the profile with new details.
    pub fn update_profile(&self, profile: &UserProfile) -> DbResult<()> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE user_profile SET
                first_name = ?2,
                last_name = ?3,
                date_of_birth = ?4,
                height_cm = ?5,
                weight_kg = ?6,
                blood_type = ?7,
                allergies = ?8,
                medical_conditions = ?9,
                last_updated = ?10
            WHERE id = ?1
            "#,
            params![
                PROFILE_ID,
                profile.first_name,
                profile.last_name,
                profile.date_of_birth.to_string(),
                profile.height_cm,
                profile.weight_kg,
                profile.blood_type,
                profile.allergies,
                profile.medical_conditions,
                Utc::now().to_rfc3339(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(DbError::NotFound("user profile".into()));
        }
        Ok(())
    }
}
