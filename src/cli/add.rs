use anyhow::Result;

use crate::cli::ui::prompt_field_optional;
use crate::db::Database;
use crate::models::{ContactDraft, Session};
use crate::repo::ContactRepository;

/// Execute the add command
pub fn run_add(
    db: &Database,
    session: Session,
    name: Option<String>,
    phone: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    // If no options provided, run interactive mode
    let (name, phone, notes) = if name.is_none() && phone.is_none() && notes.is_none() {
        match interactive_mode()? {
            Some(fields) => fields,
            None => {
                println!("Cancelled.");
                return Ok(());
            }
        }
    } else {
        (name, phone, notes)
    };

    let repo = ContactRepository::open(db, session);
    let contact = repo.add_contact(ContactDraft {
        name: name.unwrap_or_default(),
        phone: phone.unwrap_or_default(),
        notes,
    })?;

    println!("Created: {} ({})", contact.name, contact.phone);
    Ok(())
}

type DraftFields = (Option<String>, Option<String>, Option<String>);

fn interactive_mode() -> Result<Option<DraftFields>> {
    let name = match prompt_field_optional("name")? {
        Some(v) => Some(v),
        None => return Ok(None),
    };

    let phone = match prompt_field_optional("phone")? {
        Some(v) => Some(v),
        None => return Ok(None),
    };

    let notes = prompt_field_optional("notes")?;

    Ok(Some((name, phone, notes)))
}
