use chrono::Local;

use crate::models::Contact;

/// Print the contact list as aligned columns.
pub fn print_contact_table(contacts: &[Contact]) {
    if contacts.is_empty() {
        println!("No contacts.");
        return;
    }

    println!(
        "{:<10} {:<28} {:<18} {}",
        "ID", "NAME", "PHONE", "NOTES"
    );
    for contact in contacts {
        println!(
            "{:<10} {:<28} {:<18} {}",
            &contact.id.to_string()[..8],
            truncate(&contact.name, 26),
            truncate(&contact.phone, 16),
            truncate(&contact.notes, 40),
        );
    }
    println!();
    println!(
        "{} contact{}",
        contacts.len(),
        if contacts.len() == 1 { "" } else { "s" }
    );
}

/// Print full details for one contact.
pub fn print_contact(contact: &Contact) {
    println!("Name:    {}", contact.name);
    println!("Phone:   {}", contact.phone);
    if !contact.notes.is_empty() {
        println!("Notes:   {}", contact.notes);
    }
    println!(
        "Added:   {}",
        contact
            .created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
    );
    println!(
        "Updated: {}",
        contact
            .updated_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
    );
    println!("ID:      {}", contact.id);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
    format!("{}…", cut)
}
