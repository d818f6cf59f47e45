//! Med-Helper Core Library
//!
//! Local-first personal medication tracker with reminder scheduling.
//!
//! # Architecture
//!
//! ```text
//!   Presentation layer (native UI via UniFFI, or a polling client)
//!          │                                   ▲
//!    CRUD  │                                   │ NotificationPayload (JSON)
//!          ▼                                   │
//!   ┌─────────────┐   MedicationStore   ┌──────┴──────────┐
//!   │  Database   │◄────────────────────┤ ReminderEngine  │
//!   │  (SQLite)   │                     │  classify_all   │──► Dashboard
//!   │  migrations │   claim_reminder    │  check_due_now  │
//!   └─────────────┘◄────────────────────┴─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer with versioned migrations
//! - [`models`]: Domain types (Medication, UserProfile, VitalSigns, etc.)
//! - [`scheduler`]: Reminder classification and exact-minute firing
//! - [`dashboard`]: Home screen summary
//! - [`export`]: Notification payloads and vitals export
//! - [`config`]: Startup configuration

pub mod config;
pub mod dashboard;
pub mod db;
pub mod export;
pub mod models;
pub mod scheduler;

// Re-export commonly used types
pub use config::{AppConfig, ConfigError};
pub use dashboard::Dashboard;
pub use db::Database;
pub use models::{
    Classification, DormantReason, DueCheck, EmergencyContact, FiredReminder, Medication,
    ReminderTime, ScheduledReminder, UserProfile, VitalSigns,
};
pub use scheduler::{MedicationStore, ReminderEngine, ReminderPolicy};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MedHelperError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<db::DbError> for MedHelperError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(what) => MedHelperError::NotFound(what),
            other => MedHelperError::DatabaseError(other.to_string()),
        }
    }
}

impl From<scheduler::SchedulerError> for MedHelperError {
    fn from(e: scheduler::SchedulerError) -> Self {
        match e {
            scheduler::SchedulerError::Store(db) => db.into(),
        }
    }
}

impl From<serde_json::Error> for MedHelperError {
    fn from(e: serde_json::Error) -> Self {
        MedHelperError::SerializationError(e.to_string())
    }
}

impl From<ConfigError> for MedHelperError {
    fn from(e: ConfigError) -> Self {
        MedHelperError::ConfigError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for MedHelperError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MedHelperError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
///
/// `utc_offset` is the fixed local zone reminders are evaluated in, as
/// `+HH:MM` or `-HH:MM`.
#[uniffi::export]
pub fn open_database(path: String, utc_offset: String) -> Result<Arc<MedHelperCore>, MedHelperError> {
    let offset = config::parse_utc_offset(&utc_offset)?;
    let db = Database::open(&path)?;
    Ok(MedHelperCore::wrap(db, offset, ReminderPolicy::default()))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory(utc_offset: String) -> Result<Arc<MedHelperCore>, MedHelperError> {
    let offset = config::parse_utc_offset(&utc_offset)?;
    let db = Database::open_in_memory()?;
    Ok(MedHelperCore::wrap(db, offset, ReminderPolicy::default()))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct MedHelperCore {
    db: Arc<Mutex<Database>>,
    utc_offset: FixedOffset,
    policy: ReminderPolicy,
}

impl MedHelperCore {
    /// Build from resolved startup configuration.
    pub fn from_config(config: &AppConfig) -> Result<Arc<Self>, MedHelperError> {
        let db = Database::open(&config.database_path)?;
        db.set_busy_timeout(config.busy_timeout)?;
        Ok(Self::wrap(db, config.utc_offset, config.reminder_policy))
    }

    fn wrap(db: Database, utc_offset: FixedOffset, policy: ReminderPolicy) -> Arc<Self> {
        Arc::new(Self {
            db: Arc::new(Mutex::new(db)),
            utc_offset,
            policy,
        })
    }

    /// Resolve an optional RFC 3339 instant into the configured zone.
    fn resolve_now(&self, at: Option<String>) -> Result<DateTime<FixedOffset>, MedHelperError> {
        match at {
            None => Ok(Utc::now().with_timezone(&self.utc_offset)),
            Some(raw) => DateTime::parse_from_rfc3339(&raw)
                .map(|t| t.with_timezone(&self.utc_offset))
                .map_err(|e| MedHelperError::InvalidInput(format!("{}: {}", raw, e))),
        }
    }
}

#[uniffi::export]
impl MedHelperCore {
    // =========================================================================
    // Medication Operations
    // =========================================================================

    /// Add a medication. Returns the stored record with its new ID.
    pub fn add_medication(&self, medication: FfiMedication) -> Result<FfiMedication, MedHelperError> {
        let db = self.db.lock()?;
        let mut medication: Medication = medication.try_into()?;
        medication.created_at = Utc::now().to_rfc3339();
        medication.last_reminded = None;
        medication.id = db.insert_medication(&medication)?;
        Ok(medication.into())
    }

    /// Update a medication's editable fields.
    pub fn update_medication(&self, medication: FfiMedication) -> Result<(), MedHelperError> {
        let db = self.db.lock()?;
        let medication: Medication = medication.try_into()?;
        if !db.update_medication(&medication)? {
            return Err(MedHelperError::NotFound(format!("medication {}", medication.id)));
        }
        Ok(())
    }

    /// Get a medication by ID.
    pub fn get_medication(&self, id: i64) -> Result<Option<FfiMedication>, MedHelperError> {
        let db = self.db.lock()?;
        Ok(db.get_medication(id)?.map(Into::into))
    }

    /// List all medications.
    pub fn list_medications(&self) -> Result<Vec<FfiMedication>, MedHelperError> {
        let db = self.db.lock()?;
        Ok(db.list_medications()?.into_iter().map(Into::into).collect())
    }

    /// Delete a medication. Returns whether it existed.
    pub fn delete_medication(&self, id: i64) -> Result<bool, MedHelperError> {
        let db = self.db.lock()?;
        Ok(db.delete_medication(id)?)
    }

    /// Switch reminders on or off and set their times (`"08:00,20:00"`).
    pub fn set_reminder_schedule(
        &self,
        id: i64,
        enabled: bool,
        times: String,
    ) -> Result<(), MedHelperError> {
        let db = self.db.lock()?;
        if !db.set_reminder_schedule(id, enabled, &times)? {
            return Err(MedHelperError::NotFound(format!("medication {}", id)));
        }
        Ok(())
    }

    // =========================================================================
    // Reminder Operations
    // =========================================================================

    /// Classify medications into due/upcoming/dormant as of `at` (RFC 3339),
    /// or as of now when absent.
    pub fn classify_reminders(
        &self,
        at: Option<String>,
    ) -> Result<FfiClassification, MedHelperError> {
        let now = self.resolve_now(at)?;
        let db = self.db.lock()?;
        let engine = ReminderEngine::new(&*db, self.policy);
        Ok(engine.classify_all(now)?.into())
    }

    /// Fire reminders due at this exact minute and record them.
    pub fn check_due_now(&self, at: Option<String>) -> Result<FfiDueCheck, MedHelperError> {
        let now = self.resolve_now(at)?;
        let db = self.db.lock()?;
        let engine = ReminderEngine::new(&*db, self.policy);
        Ok(engine.check_due_now(now)?.into())
    }

    /// Same as `check_due_now`, rendered as the JSON notification payload.
    pub fn check_due_now_json(&self, at: Option<String>) -> Result<String, MedHelperError> {
        let now = self.resolve_now(at)?;
        let db = self.db.lock()?;
        let check = ReminderEngine::new(&*db, self.policy).check_due_now(now)?;
        Ok(export::NotificationPayload::from_check(&check, now).to_json()?)
    }

    // =========================================================================
    // Profile Operations
    // =========================================================================

    /// Get the user profile, creating the placeholder if needed.
    pub fn get_profile(&self) -> Result<FfiUserProfile, MedHelperError> {
        let today = self.resolve_now(None)?.date_naive();
        let db = self.db.lock()?;
        Ok(db.get_or_create_profile(today)?.into())
    }

    /// Replace the user profile.
    pub fn update_profile(&self, profile: FfiUserProfile) -> Result<(), MedHelperError> {
        let today = self.resolve_now(None)?.date_naive();
        let db = self.db.lock()?;
        db.get_or_create_profile(today)?;
        let profile: UserProfile = profile.try_into()?;
        db.update_profile(&profile)?;
        Ok(())
    }

    // =========================================================================
    // Emergency Contact Operations
    // =========================================================================

    /// Add an emergency contact. Returns the stored record with its new ID.
    pub fn add_contact(&self, contact: FfiEmergencyContact) -> Result<FfiEmergencyContact, MedHelperError> {
        let db = self.db.lock()?;
        let mut contact: EmergencyContact = contact.into();
        let now = Utc::now().to_rfc3339();
        contact.created_at = now.clone();
        contact.last_updated = now;
        contact.id = db.insert_contact(&contact)?;
        Ok(contact.into())
    }

    /// Update an emergency contact.
    pub fn update_contact(&self, contact: FfiEmergencyContact) -> Result<(), MedHelperError> {
        let db = self.db.lock()?;
        let contact: EmergencyContact = contact.into();
        if !db.update_contact(&contact)? {
            return Err(MedHelperError::NotFound(format!("contact {}", contact.id)));
        }
        Ok(())
    }

    /// List emergency contacts, newest first.
    pub fn list_contacts(&self) -> Result<Vec<FfiEmergencyContact>, MedHelperError> {
        let db = self.db.lock()?;
        Ok(db.list_contacts()?.into_iter().map(Into::into).collect())
    }

    /// Delete an emergency contact. Returns whether it existed.
    pub fn delete_contact(&self, id: i64) -> Result<bool, MedHelperError> {
        let db = self.db.lock()?;
        Ok(db.delete_contact(id)?)
    }

    // =========================================================================
    // Vitals Operations
    // =========================================================================

    /// Record a set of vital signs.
    pub fn add_vitals(&self, vitals: FfiVitalSigns) -> Result<FfiVitalSigns, MedHelperError> {
        let db = self.db.lock()?;
        let mut vitals: VitalSigns = vitals.try_into()?;
        vitals.id = db.insert_vitals(&vitals)?;
        Ok(vitals.into())
    }

    /// List readings, newest first.
    pub fn list_vitals(&self) -> Result<Vec<FfiVitalSigns>, MedHelperError> {
        let db = self.db.lock()?;
        Ok(db.list_vitals()?.into_iter().map(Into::into).collect())
    }

    /// Delete a reading. Returns whether it existed.
    pub fn delete_vitals(&self, id: i64) -> Result<bool, MedHelperError> {
        let db = self.db.lock()?;
        Ok(db.delete_vitals(id)?)
    }

    // =========================================================================
    // Dashboard & Export Operations
    // =========================================================================

    /// Home screen summary as of `at` (RFC 3339), or now.
    pub fn get_dashboard(&self, at: Option<String>) -> Result<FfiDashboard, MedHelperError> {
        let now = self.resolve_now(at)?;
        let db = self.db.lock()?;
        Ok(Dashboard::load(&db, now, self.policy)?.into())
    }

    /// Export vitals as JSON.
    pub fn export_vitals_json(&self) -> Result<String, MedHelperError> {
        let db = self.db.lock()?;
        Ok(export::VitalsExport::load(&db)?.to_json()?)
    }

    /// Export vitals as CSV.
    pub fn export_vitals_csv(&self) -> Result<String, MedHelperError> {
        let db = self.db.lock()?;
        Ok(export::VitalsExport::load(&db)?.to_csv())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe medication.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedication {
    pub id: i64,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub notes: Option<String>,
    pub reminder_enabled: bool,
    pub reminder_times: String,
    /// RFC 3339
    pub last_reminded: Option<String>,
    pub created_at: String,
}

impl From<Medication> for FfiMedication {
    fn from(med: Medication) -> Self {
        Self {
            id: med.id,
            name: med.name,
            dosage: med.dosage,
            frequency: med.frequency,
            notes: med.notes,
            reminder_enabled: med.reminder_enabled,
            reminder_times: med.reminder_times,
            last_reminded: med.last_reminded.map(|t| t.to_rfc3339()),
            created_at: med.created_at,
        }
    }
}

impl TryFrom<FfiMedication> for Medication {
    type Error = MedHelperError;

    fn try_from(med: FfiMedication) -> Result<Self, Self::Error> {
        let last_reminded = med
            .last_reminded
            .map(|raw| {
                DateTime::parse_from_rfc3339(&raw)
                    .map_err(|e| MedHelperError::InvalidInput(format!("last_reminded {}: {}", raw, e)))
            })
            .transpose()?;

        Ok(Medication {
            id: med.id,
            name: med.name,
            dosage: med.dosage,
            frequency: med.frequency,
            notes: med.notes,
            reminder_enabled: med.reminder_enabled,
            reminder_times: med.reminder_times,
            last_reminded,
            created_at: med.created_at,
        })
    }
}

/// FFI-safe due or upcoming reminder.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiScheduledReminder {
    pub medication: FfiMedication,
    pub next_reminder: String,
    pub seconds_until: i64,
}

impl From<ScheduledReminder> for FfiScheduledReminder {
    fn from(reminder: ScheduledReminder) -> Self {
        Self {
            medication: reminder.medication.into(),
            next_reminder: reminder.next_reminder.to_rfc3339(),
            seconds_until: reminder.seconds_until,
        }
    }
}

/// FFI-safe dormant medication.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDormantMedication {
    pub medication: FfiMedication,
    /// disabled, no_schedule, acknowledged or outside_window
    pub reason: String,
    pub next_reminder: Option<String>,
}

impl From<models::DormantMedication> for FfiDormantMedication {
    fn from(dormant: models::DormantMedication) -> Self {
        let reason = match dormant.reason {
            DormantReason::Disabled => "disabled",
            DormantReason::NoSchedule => "no_schedule",
            DormantReason::Acknowledged => "acknowledged",
            DormantReason::OutsideWindow => "outside_window",
        };
        Self {
            medication: dormant.medication.into(),
            reason: reason.to_string(),
            next_reminder: dormant.next_reminder.map(|t| t.to_rfc3339()),
        }
    }
}

/// FFI-safe classification.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClassification {
    pub due: Vec<FfiScheduledReminder>,
    pub upcoming: Vec<FfiScheduledReminder>,
    pub dormant: Vec<FfiDormantMedication>,
}

impl From<Classification> for FfiClassification {
    fn from(c: Classification) -> Self {
        Self {
            due: c.due.into_iter().map(Into::into).collect(),
            upcoming: c.upcoming.into_iter().map(Into::into).collect(),
            dormant: c.dormant.into_iter().map(Into::into).collect(),
        }
    }
}

/// FFI-safe fired reminder.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFiredReminder {
    pub medication_id: i64,
    pub name: String,
    pub dosage: String,
    pub notes: Option<String>,
}

impl From<FiredReminder> for FfiFiredReminder {
    fn from(f: FiredReminder) -> Self {
        Self {
            medication_id: f.medication_id,
            name: f.name,
            dosage: f.dosage,
            notes: f.notes,
        }
    }
}

/// FFI-safe due check result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDueCheck {
    pub fired: Vec<FfiFiredReminder>,
    /// "medication <id>: <error>" per failed write
    pub persist_failures: Vec<String>,
}

impl From<DueCheck> for FfiDueCheck {
    fn from(check: DueCheck) -> Self {
        Self {
            fired: check.fired.into_iter().map(Into::into).collect(),
            persist_failures: check
                .persist_failures
                .into_iter()
                .map(|f| format!("medication {}: {}", f.medication_id, f.error))
                .collect(),
        }
    }
}

/// FFI-safe user profile.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiUserProfile {
    pub first_name: String,
    pub last_name: String,
    /// YYYY-MM-DD
    pub date_of_birth: String,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub blood_type: Option<String>,
    pub allergies: Option<String>,
    pub medical_conditions: Option<String>,
}

impl From<UserProfile> for FfiUserProfile {
    fn from(p: UserProfile) -> Self {
        Self {
            first_name: p.first_name,
            last_name: p.last_name,
            date_of_birth: p.date_of_birth.to_string(),
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            blood_type: p.blood_type,
            allergies: p.allergies,
            medical_conditions: p.medical_conditions,
        }
    }
}

impl TryFrom<FfiUserProfile> for UserProfile {
    type Error = MedHelperError;

    fn try_from(p: FfiUserProfile) -> Result<Self, Self::Error> {
        let date_of_birth: NaiveDate = p.date_of_birth.parse().map_err(|_| {
            MedHelperError::InvalidInput(format!("date_of_birth {}", p.date_of_birth))
        })?;

        Ok(UserProfile {
            first_name: p.first_name,
            last_name: p.last_name,
            date_of_birth,
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            blood_type: p.blood_type,
            allergies: p.allergies,
            medical_conditions: p.medical_conditions,
            last_updated: Utc::now().to_rfc3339(),
        })
    }
}

/// FFI-safe emergency contact.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiEmergencyContact {
    pub id: i64,
    pub name: String,
    pub relationship: String,
    pub phone_primary: String,
    pub phone_secondary: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl From<EmergencyContact> for FfiEmergencyContact {
    fn from(c: EmergencyContact) -> Self {
        Self {
            id: c.id,
            name: c.name,
            relationship: c.relationship,
            phone_primary: c.phone_primary,
            phone_secondary: c.phone_secondary,
            email: c.email,
            address: c.address,
            notes: c.notes,
        }
    }
}

impl From<FfiEmergencyContact> for EmergencyContact {
    fn from(c: FfiEmergencyContact) -> Self {
        let mut contact = EmergencyContact::new(c.name, c.relationship, c.phone_primary);
        contact.id = c.id;
        contact.phone_secondary = c.phone_secondary;
        contact.email = c.email;
        contact.address = c.address;
        contact.notes = c.notes;
        contact
    }
}

/// FFI-safe vital signs reading.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVitalSigns {
    pub id: i64,
    /// YYYY-MM-DDTHH:MM, local
    pub recorded_at: String,
    pub systolic_bp: Option<i64>,
    pub diastolic_bp: Option<i64>,
    pub heart_rate: Option<i64>,
    pub temperature_c: Option<f64>,
    pub respiratory_rate: Option<i64>,
    pub oxygen_saturation: Option<i64>,
    pub blood_sugar: Option<f64>,
    pub notes: Option<String>,
}

impl From<VitalSigns> for FfiVitalSigns {
    fn from(v: VitalSigns) -> Self {
        Self {
            id: v.id,
            recorded_at: v.recorded_at.format(models::VITALS_DATETIME_FORMAT).to_string(),
            systolic_bp: v.systolic_bp,
            diastolic_bp: v.diastolic_bp,
            heart_rate: v.heart_rate,
            temperature_c: v.temperature_c,
            respiratory_rate: v.respiratory_rate,
            oxygen_saturation: v.oxygen_saturation,
            blood_sugar: v.blood_sugar,
            notes: v.notes,
        }
    }
}

impl TryFrom<FfiVitalSigns> for VitalSigns {
    type Error = MedHelperError;

    fn try_from(v: FfiVitalSigns) -> Result<Self, Self::Error> {
        let recorded_at = VitalSigns::parse_recorded_at(&v.recorded_at)
            .map_err(|e| MedHelperError::InvalidInput(format!("recorded_at {}: {}", v.recorded_at, e)))?;

        Ok(VitalSigns {
            id: v.id,
            recorded_at,
            systolic_bp: v.systolic_bp,
            diastolic_bp: v.diastolic_bp,
            heart_rate: v.heart_rate,
            temperature_c: v.temperature_c,
            respiratory_rate: v.respiratory_rate,
            oxygen_saturation: v.oxygen_saturation,
            blood_sugar: v.blood_sugar,
            notes: v.notes,
        })
    }
}

/// FFI-safe dashboard.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDashboard {
    pub profile: FfiUserProfile,
    pub age: u32,
    pub reminders: FfiClassification,
    pub latest_vitals: Option<FfiVitalSigns>,
}

impl From<Dashboard> for FfiDashboard {
    fn from(d: Dashboard) -> Self {
        Self {
            profile: d.profile.into(),
            age: d.age,
            reminders: d.reminders.into(),
            latest_vitals: d.latest_vitals.map(Into::into),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core() -> Arc<MedHelperCore> {
        open_database_in_memory("+01:00".into()).unwrap()
    }

    fn ffi_med(name: &str, times: &str) -> FfiMedication {
        FfiMedication {
            id: 0,
            name: name.into(),
            dosage: "20mg".into(),
            frequency: "daily".into(),
            notes: None,
            reminder_enabled: true,
            reminder_times: times.into(),
            last_reminded: None,
            created_at: String::new(),
        }
    }

    #[test]
    fn test_invalid_offset_rejected() {
        assert!(matches!(
            open_database_in_memory("local".into()),
            Err(MedHelperError::ConfigError(_))
        ));
    }

    #[test]
    fn test_medication_crud_through_ffi() {
        let core = core();

        let added = core.add_medication(ffi_med("Atorvastatin", "21:00")).unwrap();
        assert!(added.id > 0);
        assert!(!added.created_at.is_empty());

        let mut edited = added.clone();
        edited.dosage = "40mg".into();
        core.update_medication(edited).unwrap();
        assert_eq!(core.get_medication(added.id).unwrap().unwrap().dosage, "40mg");

        assert_eq!(core.list_medications().unwrap().len(), 1);
        assert!(core.delete_medication(added.id).unwrap());
        assert!(core.get_medication(added.id).unwrap().is_none());

        let missing = core.set_reminder_schedule(added.id, true, "08:00".into());
        assert!(matches!(missing, Err(MedHelperError::NotFound(_))));
    }

    #[test]
    fn test_reminders_through_ffi() {
        let core = core();
        let added = core.add_medication(ffi_med("Atorvastatin", "21:00")).unwrap();

        // 20:30 local (+01:00) given in UTC
        let classification = core
            .classify_reminders(Some("2024-05-01T19:30:00Z".into()))
            .unwrap();
        assert_eq!(classification.due.len(), 1);
        assert_eq!(classification.due[0].seconds_until, 1800);
        assert_eq!(classification.due[0].next_reminder, "2024-05-01T21:00:00+01:00");

        let check = core.check_due_now(Some("2024-05-01T21:00:00+01:00".into())).unwrap();
        assert_eq!(check.fired.len(), 1);
        assert_eq!(check.fired[0].medication_id, added.id);
        assert!(check.persist_failures.is_empty());

        let json = core
            .check_due_now_json(Some("2024-05-01T21:00:30+01:00".into()))
            .unwrap();
        assert!(json.contains("\"reminders\":[]"));

        let stored = core.get_medication(added.id).unwrap().unwrap();
        assert_eq!(stored.last_reminded, Some("2024-05-01T21:00:00+01:00".into()));
    }

    #[test]
    fn test_bad_timestamp_is_invalid_input() {
        let core = core();
        assert!(matches!(
            core.classify_reminders(Some("tomorrow".into())),
            Err(MedHelperError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_profile_contacts_vitals_through_ffi() {
        let core = core();

        let mut profile = core.get_profile().unwrap();
        profile.first_name = "Ada".into();
        profile.date_of_birth = "1990-02-03".into();
        core.update_profile(profile).unwrap();
        assert_eq!(core.get_profile().unwrap().first_name, "Ada");

        let contact = core
            .add_contact(FfiEmergencyContact {
                id: 0,
                name: "Grace".into(),
                relationship: "Sister".into(),
                phone_primary: "555-0100".into(),
                phone_secondary: None,
                email: None,
                address: None,
                notes: None,
            })
            .unwrap();
        assert_eq!(core.list_contacts().unwrap().len(), 1);
        assert!(core.delete_contact(contact.id).unwrap());

        let vitals = core
            .add_vitals(FfiVitalSigns {
                id: 0,
                recorded_at: "2024-05-01T07:15".into(),
                systolic_bp: Some(121),
                diastolic_bp: Some(79),
                heart_rate: Some(64),
                temperature_c: None,
                respiratory_rate: None,
                oxygen_saturation: Some(98),
                blood_sugar: Some(5.1),
                notes: None,
            })
            .unwrap();
        assert_eq!(vitals.recorded_at, "2024-05-01T07:15");
        assert!(core.export_vitals_csv().unwrap().contains("2024-05-01T07:15,121,79,64"));

        let dashboard = core.get_dashboard(Some("2024-05-01T08:00:00+01:00".into())).unwrap();
        assert_eq!(dashboard.profile.first_name, "Ada");
        assert_eq!(dashboard.age, 34);
        assert_eq!(dashboard.latest_vitals.unwrap().systolic_bp, Some(121));
    }
}
