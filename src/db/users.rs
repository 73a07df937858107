use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::Database;
use crate::models::{UserProfile, UserSettings};

/// Stored credential material for a login attempt, including the
/// throttle counters.
pub struct UserCredentials {
    pub user_id: Uuid,
    pub password_salt: String,
    pub password_hash: String,
    pub failed_logins: u32,
    pub last_failed_at: Option<DateTime<Utc>>,
}

fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_timestamp(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

impl Database {
    // ==================== USERS ====================

    pub fn insert_user(
        &self,
        profile: &UserProfile,
        password_salt: &str,
        password_hash: &str,
    ) -> Result<()> {
        let settings = serde_json::to_string(&profile.settings)?;
        self.conn.execute(
            r#"INSERT INTO users (
                id, display_name, email, password_salt, password_hash,
                settings, created_at, last_login_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
            params![
                profile.id.to_string(),
                profile.display_name,
                profile.email,
                password_salt,
                password_hash,
                settings,
                profile.created_at.to_rfc3339(),
                profile.last_login_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_user_by_id(&self, id: Uuid) -> Result<Option<UserProfile>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, display_name, email, settings, created_at, last_login_at
             FROM users WHERE id = ?",
        )?;

        let result = stmt.query_row([id.to_string()], Self::row_to_profile);

        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_user_credentials(&self, email: &str) -> Result<Option<UserCredentials>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, password_salt, password_hash, failed_logins, last_failed_at
             FROM users WHERE email = ? LIMIT 1",
        )?;

        let result = stmt.query_row([email], |row| {
            let last_failed: Option<String> = row.get(4)?;
            Ok(UserCredentials {
                user_id: parse_uuid(&row.get::<_, String>(0)?)?,
                password_salt: row.get(1)?,
                password_hash: row.get(2)?,
                failed_logins: row.get(3)?,
                last_failed_at: last_failed.as_deref().map(parse_timestamp).transpose()?,
            })
        });

        match result {
            Ok(creds) => Ok(Some(creds)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn user_email_exists(&self, email: &str) -> Result<bool> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM users WHERE email = ?",
            [email],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn display_name_exists(&self, display_name: &str) -> Result<bool> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM users WHERE display_name = ?",
            [display_name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn update_display_name(&self, user_id: Uuid, display_name: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE users SET display_name = ? WHERE id = ?",
            params![display_name, user_id.to_string()],
        )?;
        Ok(())
    }

    pub fn touch_last_login(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        self.conn.execute(
            "UPDATE users SET last_login_at = ? WHERE id = ?",
            params![at.to_rfc3339(), user_id.to_string()],
        )?;
        Ok(())
    }

    pub fn set_password(&self, user_id: Uuid, salt: &str, hash: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE users SET password_salt = ?, password_hash = ? WHERE id = ?",
            params![salt, hash, user_id.to_string()],
        )?;
        Ok(())
    }

    pub fn record_failed_login(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        self.conn.execute(
            "UPDATE users SET failed_logins = failed_logins + 1, last_failed_at = ? WHERE id = ?",
            params![at.to_rfc3339(), user_id.to_string()],
        )?;
        Ok(())
    }

    pub fn clear_failed_logins(&self, user_id: Uuid) -> Result<()> {
        self.conn.execute(
            "UPDATE users SET failed_logins = 0, last_failed_at = NULL WHERE id = ?",
            [user_id.to_string()],
        )?;
        Ok(())
    }

    fn row_to_profile(row: &Row) -> rusqlite::Result<UserProfile> {
        let settings_json: String = row.get(3)?;
        // Unknown or missing settings fields fall back to defaults
        let settings: UserSettings = serde_json::from_str(&settings_json).unwrap_or_default();
        Ok(UserProfile {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            display_name: row.get(1)?,
            email: row.get(2)?,
            settings,
            created_at: parse_timestamp(&row.get::<_, String>(4)?)?,
            last_login_at: parse_timestamp(&row.get::<_, String>(5)?)?,
        })
    }

    // ==================== SESSIONS ====================

    pub fn insert_session(
        &self,
        token_hash: &str,
        user_id: Uuid,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
            params![
                token_hash,
                user_id.to_string(),
                created_at.to_rfc3339(),
                expires_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Resolve a session token hash to its user and expiry.
    pub fn get_session(&self, token_hash: &str) -> Result<Option<(Uuid, DateTime<Utc>)>> {
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT user_id, expires_at FROM sessions WHERE token_hash = ?",
                [token_hash],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((user_id, expires_at)) => Ok(Some((
                parse_uuid(&user_id)?,
                parse_timestamp(&expires_at)?,
            ))),
            None => Ok(None),
        }
    }

    pub fn delete_session(&self, token_hash: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM sessions WHERE token_hash = ?", [token_hash])?;
        Ok(())
    }

    pub fn delete_sessions_for_user(&self, user_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM sessions WHERE user_id = ?",
            [user_id.to_string()],
        )?;
        Ok(())
    }

    // ==================== PASSWORD RESETS ====================

    pub fn insert_password_reset(
        &self,
        token_hash: &str,
        user_id: Uuid,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO password_resets (token_hash, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
            params![
                token_hash,
                user_id.to_string(),
                created_at.to_rfc3339(),
                expires_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Mark a reset token used and return its user. Returns None when
    /// the token is unknown, already used, or past its expiry.
    pub fn consume_password_reset(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>> {
        let row: Option<(String, String, Option<String>)> = self
            .conn
            .query_row(
                "SELECT user_id, expires_at, used_at FROM password_resets WHERE token_hash = ?",
                [token_hash],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let (user_id, expires_at, used_at) = match row {
            Some(r) => r,
            None => return Ok(None),
        };

        if used_at.is_some() || parse_timestamp(&expires_at)? < now {
            return Ok(None);
        }

        self.conn.execute(
            "UPDATE password_resets SET used_at = ? WHERE token_hash = ?",
            params![now.to_rfc3339(), token_hash],
        )?;

        Ok(Some(parse_uuid(&user_id)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn profile(name: &str, email: &str) -> UserProfile {
        let now = Utc::now();
        UserProfile {
            id: Uuid::new_v4(),
            display_name: name.to_string(),
            email: email.to_string(),
            created_at: now,
            last_login_at: now,
            settings: UserSettings::default(),
        }
    }

    #[test]
    fn test_user_roundtrip() {
        let db = Database::open_memory().unwrap();
        let p = profile("Ada", "ada@example.com");
        db.insert_user(&p, "salt", "hash").unwrap();

        let loaded = db.get_user_by_id(p.id).unwrap().unwrap();
        assert_eq!(loaded, p);

        assert!(db.user_email_exists("ada@example.com").unwrap());
        assert!(!db.user_email_exists("bob@example.com").unwrap());
        assert!(db.display_name_exists("Ada").unwrap());
    }

    #[test]
    fn test_credentials_and_throttle_counters() {
        let db = Database::open_memory().unwrap();
        let p = profile("Ada", "ada@example.com");
        db.insert_user(&p, "s1", "h1").unwrap();

        let creds = db.get_user_credentials("ada@example.com").unwrap().unwrap();
        assert_eq!(creds.user_id, p.id);
        assert_eq!(creds.password_salt, "s1");
        assert_eq!(creds.failed_logins, 0);
        assert!(creds.last_failed_at.is_none());

        let now = Utc::now();
        db.record_failed_login(p.id, now).unwrap();
        db.record_failed_login(p.id, now).unwrap();

        let creds = db.get_user_credentials("ada@example.com").unwrap().unwrap();
        assert_eq!(creds.failed_logins, 2);
        assert!(creds.last_failed_at.is_some());

        db.clear_failed_logins(p.id).unwrap();
        let creds = db.get_user_credentials("ada@example.com").unwrap().unwrap();
        assert_eq!(creds.failed_logins, 0);
    }

    #[test]
    fn test_session_roundtrip() {
        let db = Database::open_memory().unwrap();
        let p = profile("Ada", "ada@example.com");
        db.insert_user(&p, "s", "h").unwrap();

        let now = Utc::now();
        let expires = now + Duration::days(30);
        db.insert_session("tokhash", p.id, now, expires).unwrap();

        let (user_id, exp) = db.get_session("tokhash").unwrap().unwrap();
        assert_eq!(user_id, p.id);
        assert_eq!(exp, expires);

        db.delete_session("tokhash").unwrap();
        assert!(db.get_session("tokhash").unwrap().is_none());
    }

    #[test]
    fn test_password_reset_is_single_use() {
        let db = Database::open_memory().unwrap();
        let p = profile("Ada", "ada@example.com");
        db.insert_user(&p, "s", "h").unwrap();

        let now = Utc::now();
        db.insert_password_reset("rhash", p.id, now, now + Duration::hours(1))
            .unwrap();

        assert_eq!(db.consume_password_reset("rhash", now).unwrap(), Some(p.id));
        assert_eq!(db.consume_password_reset("rhash", now).unwrap(), None);
    }

    #[test]
    fn test_password_reset_expires() {
        let db = Database::open_memory().unwrap();
        let p = profile("Ada", "ada@example.com");
        db.insert_user(&p, "s", "h").unwrap();

        let now = Utc::now();
        db.insert_password_reset("rhash", p.id, now, now + Duration::hours(1))
            .unwrap();

        let later = now + Duration::hours(2);
        assert_eq!(db.consume_password_reset("rhash", later).unwrap(), None);
    }
}
