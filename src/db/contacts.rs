use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use uuid::Uuid;

use super::Database;
use crate::models::{Contact, SortKey};

/// Helper to convert UUID parse errors to rusqlite errors
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
    // ==================== CONTACT CREATE ====================

    pub fn insert_contact(&self, contact: &Contact) -> Result<()> {
        self.conn.execute(
            r#"INSERT INTO contacts (
                id, owner_id, name, phone, notes, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)"#,
            params![
                contact.id.to_string(),
                contact.owner_id.to_string(),
                contact.name,
                contact.phone,
                contact.notes,
                contact.created_at.to_rfc3339(),
                contact.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    // ==================== CONTACT READ ====================

    pub fn get_contact(&self, id: Uuid) -> Result<Option<Contact>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, name, phone, notes, created_at, updated_at
             FROM contacts WHERE id = ?",
        )?;

        let result = stmt.query_row([id.to_string()], Self::row_to_contact);

        match result {
            Ok(contact) => Ok(Some(contact)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List an owner's contacts with the requested ordering. Every read
    /// of the contacts table goes through the owner scope first.
    pub fn list_contacts(&self, owner_id: Uuid, sort: SortKey) -> Result<Vec<Contact>> {
        // Fixed ORDER BY per sort key; never interpolate caller input
        let order_by = match sort {
            SortKey::Name => "name ASC",
            SortKey::Date => "created_at DESC",
        };

        let sql = format!(
            "SELECT id, owner_id, name, phone, notes, created_at, updated_at
             FROM contacts WHERE owner_id = ? ORDER BY {}",
            order_by
        );

        let mut stmt = self.conn.prepare(&sql)?;

        let contacts = stmt
            .query_map([owner_id.to_string()], Self::row_to_contact)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(contacts)
    }

    /// Pre-write duplicate check: does this owner already hold a contact
    /// with exactly this phone string? Exact match, format-sensitive.
    pub fn contact_phone_exists(&self, owner_id: Uuid, phone: &str) -> Result<bool> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM contacts WHERE owner_id = ? AND phone = ?",
            params![owner_id.to_string(), phone],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn count_contacts(&self, owner_id: Uuid) -> Result<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM contacts WHERE owner_id = ?",
            [owner_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ==================== CONTACT UPDATE ====================

    pub fn update_contact(&self, contact: &Contact) -> Result<()> {
        self.conn.execute(
            r#"UPDATE contacts
               SET name = ?, phone = ?, notes = ?, updated_at = ?
               WHERE id = ?"#,
            params![
                contact.name,
                contact.phone,
                contact.notes,
                contact.updated_at.to_rfc3339(),
                contact.id.to_string(),
            ],
        )?;
        Ok(())
    }

    // ==================== CONTACT DELETE ====================

    /// Returns true if a row was removed.
    pub fn delete_contact(&self, id: Uuid) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }

    fn row_to_contact(row: &Row) -> rusqlite::Result<Contact> {
        Ok(Contact {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            owner_id: parse_uuid(&row.get::<_, String>(1)?)?,
            name: row.get(2)?,
            phone: row.get(3)?,
            notes: row.get(4)?,
            created_at: parse_timestamp(&row.get::<_, String>(5)?)?,
            updated_at: parse_timestamp(&row.get::<_, String>(6)?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{UserProfile, UserSettings};

    fn test_owner(db: &Database) -> Uuid {
        let now = Utc::now();
        let profile = UserProfile {
            id: Uuid::new_v4(),
            display_name: format!("owner-{}", Uuid::new_v4()),
            email: format!("{}@example.com", Uuid::new_v4()),
            created_at: now,
            last_login_at: now,
            settings: UserSettings::default(),
        };
        db.insert_user(&profile, "salt", "hash").unwrap();
        profile.id
    }

    fn contact(owner: Uuid, name: &str, phone: &str) -> Contact {
        Contact::new(owner, name.to_string(), phone.to_string(), String::new())
    }

    #[test]
    fn test_contact_crud() {
        let db = Database::open_memory().unwrap();
        let owner = test_owner(&db);

        let mut c = contact(owner, "Ada Lovelace", "+1-555-0100");
        c.notes = "met at conf".to_string();
        db.insert_contact(&c).unwrap();

        let loaded = db.get_contact(c.id).unwrap().unwrap();
        assert_eq!(loaded, c);

        let mut updated = loaded.clone();
        updated.notes = "analytical engines".to_string();
        updated.updated_at = Utc::now();
        db.update_contact(&updated).unwrap();

        let loaded = db.get_contact(c.id).unwrap().unwrap();
        assert_eq!(loaded.notes, "analytical engines");
        assert_eq!(loaded.created_at, c.created_at);

        assert!(db.delete_contact(c.id).unwrap());
        assert!(db.get_contact(c.id).unwrap().is_none());
        assert!(!db.delete_contact(c.id).unwrap());
    }

    #[test]
    fn test_phone_check_is_owner_scoped() {
        let db = Database::open_memory().unwrap();
        let alice = test_owner(&db);
        let bob = test_owner(&db);

        db.insert_contact(&contact(alice, "Ada", "+1-555-0100"))
            .unwrap();

        assert!(db.contact_phone_exists(alice, "+1-555-0100").unwrap());
        assert!(!db.contact_phone_exists(bob, "+1-555-0100").unwrap());

        // A second owner may hold the same phone value
        db.insert_contact(&contact(bob, "Ada", "+1-555-0100"))
            .unwrap();
        assert_eq!(db.count_contacts(alice).unwrap(), 1);
        assert_eq!(db.count_contacts(bob).unwrap(), 1);
    }

    #[test]
    fn test_phone_check_is_exact_match() {
        let db = Database::open_memory().unwrap();
        let owner = test_owner(&db);

        db.insert_contact(&contact(owner, "Ada", "+1-555-0100"))
            .unwrap();

        // Format-sensitive: a differently formatted string is not a match
        assert!(!db.contact_phone_exists(owner, "15550100").unwrap());
        assert!(db.contact_phone_exists(owner, "+1-555-0100").unwrap());
    }

    #[test]
    fn test_list_sorted_by_name() {
        let db = Database::open_memory().unwrap();
        let owner = test_owner(&db);

        db.insert_contact(&contact(owner, "Charlie", "1")).unwrap();
        db.insert_contact(&contact(owner, "Ada", "2")).unwrap();
        db.insert_contact(&contact(owner, "Bob", "3")).unwrap();

        let names: Vec<String> = db
            .list_contacts(owner, SortKey::Name)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Ada", "Bob", "Charlie"]);
    }

    #[test]
    fn test_list_sorted_by_date_newest_first() {
        let db = Database::open_memory().unwrap();
        let owner = test_owner(&db);

        let mut first = contact(owner, "First", "1");
        first.created_at = Utc::now() - chrono::Duration::hours(2);
        let mut second = contact(owner, "Second", "2");
        second.created_at = Utc::now() - chrono::Duration::hours(1);
        let third = contact(owner, "Third", "3");

        db.insert_contact(&first).unwrap();
        db.insert_contact(&third).unwrap();
        db.insert_contact(&second).unwrap();

        let names: Vec<String> = db
            .list_contacts(owner, SortKey::Date)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Third", "Second", "First"]);
    }

    #[test]
    fn test_list_is_scoped_to_owner() {
        let db = Database::open_memory().unwrap();
        let alice = test_owner(&db);
        let bob = test_owner(&db);

        db.insert_contact(&contact(alice, "Ada", "1")).unwrap();
        db.insert_contact(&contact(bob, "Bob", "2")).unwrap();

        let list = db.list_contacts(alice, SortKey::Name).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Ada");
    }
}
