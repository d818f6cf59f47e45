//! SQLite schema, as an ordered list of migrations.

/// A single schema step. Applied at most once, in version order.
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub sql: &'static str,
}

/// Bookkeeping table, created before any migration runs.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
);
"#;

const V1_BASE_TABLES: &str = r#"
-- ============================================================================
-- Medications
-- ============================================================================

CREATE TABLE IF NOT EXISTS medications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    dosage TEXT NOT NULL,
    frequency TEXT NOT NULL DEFAULT '',
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_medications_name ON medications(name);

-- ============================================================================
-- User Profile (single row, id = 1)
-- ============================================================================

CREATE TABLE IF NOT EXISTS user_profile (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL DEFAULT '',
    date_of_birth TEXT NOT NULL,                 -- YYYY-MM-DD
    height_cm REAL,
    weight_kg REAL,
    blood_type TEXT,
    allergies TEXT,
    medical_conditions TEXT,
    last_updated TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
);

-- ============================================================================
-- Emergency Contacts
-- ============================================================================

CREATE TABLE IF NOT EXISTS emergency_contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    relationship TEXT NOT NULL,
    phone_primary TEXT NOT NULL,
    phone_secondary TEXT,
    email TEXT,
    address TEXT,
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
    last_updated TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_contacts_created ON emergency_contacts(created_at);

-- ============================================================================
-- Vital Signs
-- ============================================================================

CREATE TABLE IF NOT EXISTS vital_signs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    recorded_at TEXT NOT NULL,                   -- YYYY-MM-DDTHH:MM:SS, local
    systolic_bp INTEGER,
    diastolic_bp INTEGER,
    heart_rate INTEGER,
    temperature_c REAL,
    respiratory_rate INTEGER,
    oxygen_saturation INTEGER,
    blood_sugar REAL,
    notes TEXT
);

CREATE INDEX IF NOT EXISTS idx_vitals_recorded ON vital_signs(recorded_at);
"#;

const V2_REMINDER_COLUMNS: &str = r#"
ALTER TABLE medications ADD COLUMN reminder_enabled INTEGER NOT NULL DEFAULT 0;
ALTER TABLE medications ADD COLUMN reminder_times TEXT NOT NULL DEFAULT '';  -- "HH:MM,HH:MM"
ALTER TABLE medications ADD COLUMN last_reminded TEXT;                       -- RFC 3339

CREATE INDEX IF NOT EXISTS idx_medications_reminder ON medications(reminder_enabled);
"#;

const V3_SEED_PROFILE: &str = r#"
INSERT OR IGNORE INTO user_profile (id, first_name, last_name, date_of_birth, height_cm, weight_kg)
VALUES (1, 'Default User', '', date('now'), 0, 0);
"#;

/// All migrations, in the order they must be applied.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "base_tables",
        sql: V1_BASE_TABLES,
    },
    Migration {
        version: 2,
        name: "medication_reminder_columns",
        sql: V2_REMINDER_COLUMNS,
    },
    Migration {
        version: 3,
        name: "seed_default_profile",
        sql: V3_SEED_PROFILE,
    },
];

/// Highest schema version this build knows about.
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_migrations_valid_in_order() {
        let conn = Connection::open_in_memory().unwrap();
        for migration in MIGRATIONS {
            let result = conn.execute_batch(migration.sql);
            assert!(
                result.is_ok(),
                "Migration {} should be valid SQL: {:?}",
                migration.name,
                result
            );
        }
    }

    #[test]
    fn test_versions_strictly_increasing() {
        let versions: Vec<i64> = MIGRATIONS.iter().map(|m| m.version).collect();
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(latest_version(), 3);
    }

    #[test]
    fn test_profile_singleton_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        for migration in MIGRATIONS {
            conn.execute_batch(migration.sql).unwrap();
        }

        let result = conn.execute(
            "INSERT INTO user_profile (id, first_name, date_of_birth) VALUES (2, 'Second', '2000-01-01')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_reminder_columns_default_off() {
        let conn = Connection::open_in_memory().unwrap();
        for migration in MIGRATIONS {
            conn.execute_batch(migration.sql).unwrap();
        }

        conn.execute(
            "INSERT INTO medications (name, dosage) VALUES ('Aspirin', '81mg')",
            [],
        )
        .unwrap();

        let (enabled, times): (bool, String) = conn
            .query_row(
                "SELECT reminder_enabled, reminder_times FROM medications",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert!(!enabled);
        assert_eq!(times, "");
    }

    #[test]
    fn test_column_defaults_are_rfc3339() {
        let conn = Connection::open_in_memory().unwrap();
        for migration in MIGRATIONS {
            conn.execute_batch(migration.sql).unwrap();
        }

        conn.execute(
            "INSERT INTO emergency_contacts (name, relationship, phone_primary) VALUES ('Grace', 'Sister', '555-0100')",
            [],
        )
        .unwrap();

        let (created, updated): (String, String) = conn
            .query_row(
                "SELECT created_at, last_updated FROM emergency_contacts",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        let seeded: String = conn
            .query_row("SELECT last_updated FROM user_profile WHERE id = 1", [], |row| row.get(0))
            .unwrap();

        for stamp in [created, updated, seeded] {
            assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok(), "{}", stamp);
        }
    }
}
