use anyhow::{anyhow, Result};
use inquire::Confirm;

use crate::cli::ui::{minimal_render_config, resolve_contact};
use crate::db::Database;
use crate::models::Session;
use crate::repo::ContactRepository;

/// Execute the delete command
pub fn run_delete(db: &Database, session: Session, identifier: &str, force: bool) -> Result<()> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(anyhow!("Identifier cannot be empty."));
    }

    let contact = match resolve_contact(db, &session, identifier)? {
        Some(c) => c,
        None => {
            println!("No contact found matching \"{}\".", identifier);
            return Ok(());
        }
    };

    if !force {
        let confirmed = Confirm::new(&format!("Delete {} ({})?", contact.name, contact.phone))
            .with_render_config(minimal_render_config())
            .with_default(false)
            .prompt()
            .unwrap_or(false);

        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let repo = ContactRepository::open(db, session);
    repo.delete_contact(contact.id)?;

    println!("Deleted: {}", contact.name);
    Ok(())
}
