//! Emergency contact model.

use serde::{Deserialize, Serialize};

/// Someone to call in an emergency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmergencyContact {
    /// Store-assigned ID (0 until inserted)
    pub id: i64,
    pub name: String,
    /// Relationship to the user, e.g. "Sister"
    pub relationship: String,
    pub phone_primary: String,
    pub phone_secondary: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub last_updated: String,
}

impl EmergencyContact {
    /// Create a new contact with required fields.
    pub fn new(name: String, relationship: String, phone_primary: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: 0,
            name,
            relationship,
            phone_primary,
            phone_secondary: None,
            email: None,
            address: None,
            notes: None,
            created_at: now.clone(),
            last_updated: now,
        }
    }
}
