use anyhow::Result;
use inquire::ui::RenderConfig;
use inquire::{Select, Text};
use uuid::Uuid;

use crate::db::Database;
use crate::models::{Contact, Session, SortKey};
use crate::repo;

pub fn minimal_render_config() -> RenderConfig<'static> {
    RenderConfig::default_colored()
        .with_prompt_prefix(inquire::ui::Styled::new(""))
        .with_answered_prompt_prefix(inquire::ui::Styled::new(""))
}

/// Prompt for a single optional field; empty input means "skip".
pub fn prompt_field_optional(label: &str) -> Result<Option<String>> {
    let value = Text::new(&format!("{}:", label))
        .with_render_config(minimal_render_config())
        .prompt_skippable()?;

    Ok(value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()))
}

/// Resolve an identifier to one of the session's contacts.
///
/// Accepts a full contact id, an id prefix, or a name fragment. With
/// several name matches the user picks one interactively.
pub fn resolve_contact(
    db: &Database,
    session: &Session,
    identifier: &str,
) -> Result<Option<Contact>> {
    let contacts = db.list_contacts(session.user_id, SortKey::Name)?;

    if let Ok(id) = Uuid::parse_str(identifier) {
        return Ok(contacts.into_iter().find(|c| c.id == id));
    }

    if identifier.len() >= 8 && identifier.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
        let mut matches: Vec<Contact> = contacts
            .iter()
            .filter(|c| c.id.to_string().starts_with(identifier))
            .cloned()
            .collect();
        if matches.len() == 1 {
            return Ok(Some(matches.remove(0)));
        }
    }

    let matches = repo::search(&contacts, identifier);
    match matches.len() {
        0 => Ok(None),
        1 => Ok(Some(matches.into_iter().next().unwrap())),
        _ => select_contact(&matches),
    }
}

/// Display a selection menu over matching contacts.
pub fn select_contact(matches: &[Contact]) -> Result<Option<Contact>> {
    let options: Vec<String> = matches
        .iter()
        .map(|c| format!("{}  {}  [{}]", c.name, c.phone, &c.id.to_string()[..8]))
        .collect();

    let chosen = Select::new("Multiple matches:", options.clone())
        .with_render_config(minimal_render_config())
        .prompt_skippable()?;

    Ok(chosen
        .and_then(|c| options.iter().position(|o| *o == c))
        .map(|i| matches[i].clone()))
}
