use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A saved contact. Scoped to its owner: every query and mutation
/// filters on `owner_id` first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub phone: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    pub fn new(owner_id: Uuid, name: String, phone: String, notes: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name,
            phone,
            notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Payload for the "add" intent. `notes` left out is stored as empty.
#[derive(Debug, Clone, Default)]
pub struct ContactDraft {
    pub name: String,
    pub phone: String,
    pub notes: Option<String>,
}

/// Payload for the "edit" intent. `None` fields keep their stored
/// value; `id`, `owner_id` and `created_at` are never patchable.
#[derive(Debug, Clone, Default)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// Ordering for the live contact list.
///
/// `Name` sorts ascending by raw string (no locale collation);
/// `Date` sorts newest-first by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Date,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Date => "date",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "date" | "created" | "newest" => Self::Date,
            _ => Self::Name,
        }
    }
}
