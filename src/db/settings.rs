use anyhow::Result;
use rusqlite::{params, OptionalExtension};

use super::Database;

impl Database {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM app_settings WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO app_settings (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn delete_setting(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM app_settings WHERE key = ?", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_roundtrip() {
        let db = Database::open_memory().unwrap();

        assert!(db.get_setting("session_token").unwrap().is_none());

        db.set_setting("session_token", "cs_abc").unwrap();
        assert_eq!(
            db.get_setting("session_token").unwrap().as_deref(),
            Some("cs_abc")
        );

        db.set_setting("session_token", "cs_def").unwrap();
        assert_eq!(
            db.get_setting("session_token").unwrap().as_deref(),
            Some("cs_def")
        );

        db.delete_setting("session_token").unwrap();
        assert!(db.get_setting("session_token").unwrap().is_none());
    }
}
