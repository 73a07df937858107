use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;

use crate::db::Database;
use crate::models::{Contact, Session, SortKey};

/// Execute the export command: dump the owner's contacts as CSV to a
/// file or stdout.
pub fn run_export(db: &Database, session: Session, output: Option<&Path>) -> Result<()> {
    let contacts = db.list_contacts(session.user_id, SortKey::Name)?;

    match output {
        Some(path) => {
            let file = File::create(path)?;
            write_csv(&contacts, file)?;
            println!(
                "Exported {} contact{} to {}",
                contacts.len(),
                if contacts.len() == 1 { "" } else { "s" },
                path.display()
            );
        }
        None => {
            write_csv(&contacts, io::stdout().lock())?;
        }
    }

    Ok(())
}

fn write_csv<W: Write>(contacts: &[Contact], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["name", "phone", "notes", "created_at", "updated_at"])?;

    for contact in contacts {
        csv_writer.write_record([
            contact.name.as_str(),
            contact.phone.as_str(),
            contact.notes.as_str(),
            &contact.created_at.to_rfc3339(),
            &contact.updated_at.to_rfc3339(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_csv_has_header_and_one_row_per_contact() {
        let owner = Uuid::new_v4();
        let contacts = vec![
            Contact::new(owner, "Ada".to_string(), "+1-555-0100".to_string(), String::new()),
            Contact::new(
                owner,
                "Bob".to_string(),
                "+1-555-0199".to_string(),
                "plays chess".to_string(),
            ),
        ];

        let mut buf = Vec::new();
        write_csv(&contacts, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "name,phone,notes,created_at,updated_at");
        assert!(lines[1].starts_with("Ada,+1-555-0100,"));
        assert!(lines[2].contains("plays chess"));
    }

    #[test]
    fn test_csv_empty_list_is_header_only() {
        let mut buf = Vec::new();
        write_csv(&[], &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
