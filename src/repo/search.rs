use crate::models::Contact;

/// Filter a materialized contact list without touching the store.
///
/// Matches a case-insensitive substring of `name` or a literal
/// substring of `phone`. An empty query returns the list unchanged,
/// order preserved.
pub fn search(contacts: &[Contact], query: &str) -> Vec<Contact> {
    if query.is_empty() {
        return contacts.to_vec();
    }

    let needle = query.to_lowercase();
    contacts
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&needle) || c.phone.contains(query))
        .cloned()
        .collect()
}
