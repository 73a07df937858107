use anyhow::{anyhow, Result};

use crate::cli::display::print_contact;
use crate::cli::ui::resolve_contact;
use crate::db::Database;
use crate::models::{ContactPatch, Session};
use crate::repo::ContactRepository;

/// Execute the edit command
pub fn run_update(
    db: &Database,
    session: Session,
    identifier: &str,
    name: Option<String>,
    phone: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(anyhow!("Identifier cannot be empty."));
    }

    if name.is_none() && phone.is_none() && notes.is_none() {
        return Err(anyhow!(
            "No updates provided. Use -n, -p, or --notes to specify changes."
        ));
    }

    let contact = match resolve_contact(db, &session, identifier)? {
        Some(c) => c,
        None => {
            println!("No contact found matching \"{}\".", identifier);
            return Ok(());
        }
    };

    let mut changes = Vec::new();
    if let Some(ref n) = name {
        changes.push(format!("name -> {}", n));
    }
    if let Some(ref p) = phone {
        changes.push(format!("phone -> {}", p));
    }
    if notes.is_some() {
        changes.push("notes updated".to_string());
    }

    let repo = ContactRepository::open(db, session);
    let updated = repo.update_contact(contact.id, ContactPatch { name, phone, notes })?;

    println!("Updated: {}", updated.name);
    for change in changes {
        println!("  - {}", change);
    }
    println!();
    print_contact(&updated);

    Ok(())
}
