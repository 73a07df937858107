use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account profile mirrored into the store at signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
    pub settings: UserSettings,
}

/// Free-form per-user preferences, stored as a JSON column. Unknown
/// fields from older or newer rows are ignored on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub theme: String,
    pub notifications: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            notifications: true,
        }
    }
}

/// The authenticated identity a repository is opened with. Obtained
/// from login/signup, never constructed from ambient global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub display_name: String,
    pub email: String,
}

impl From<&UserProfile> for Session {
    fn from(profile: &UserProfile) -> Self {
        Self {
            user_id: profile.id,
            display_name: profile.display_name.clone(),
            email: profile.email.clone(),
        }
    }
}
