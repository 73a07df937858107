//! The contact repository: translates a signed-in user's intents into
//! owner-scoped store operations and maintains a live ordered view of
//! that user's contacts.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tokio::sync::watch;
use uuid::Uuid;

use crate::db::Database;
use crate::error::Error;
use crate::models::{Contact, ContactDraft, ContactPatch, Session, SortKey};

mod feed;
mod search;

pub use feed::{ContactFeed, Snapshot};
pub use search::search;

/// Owner-scoped gateway to the contact collection.
///
/// One repository per signed-in session. At most one live feed exists
/// at a time: subscribing again (for instance with a different sort
/// key) ends the previous one.
pub struct ContactRepository<'a> {
    db: &'a Database,
    session: Session,
    feed: Mutex<Option<FeedHandle>>,
}

struct FeedHandle {
    sort: SortKey,
    tx: watch::Sender<Snapshot>,
}

impl<'a> ContactRepository<'a> {
    pub fn open(db: &'a Database, session: Session) -> Self {
        Self {
            db,
            session,
            feed: Mutex::new(None),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// End the session's live feed and release the repository.
    pub fn close(self) {}

    /// Open a live, ordered view of the owner's contacts. Produces an
    /// initial snapshot immediately, then a fresh one after every
    /// successful mutation. Replaces any prior subscription.
    pub fn subscribe(&self, sort: SortKey) -> Result<ContactFeed, Error> {
        let snapshot = self.load(sort)?;
        let (tx, rx) = watch::channel(snapshot);
        // Dropping the previous sender ends feeds handed out before
        *self.feed_slot() = Some(FeedHandle { sort, tx });
        Ok(ContactFeed::new(rx))
    }

    pub fn add_contact(&self, draft: ContactDraft) -> Result<Contact, Error> {
        let name = non_empty("name", "Name is required", &draft.name)?;
        let phone = non_empty("phone", "Phone number is required", &draft.phone)?;
        let notes = draft.notes.unwrap_or_default();

        // Check-then-insert; not atomic against a second writer
        if self.db.contact_phone_exists(self.session.user_id, &phone)? {
            return Err(Error::DuplicateContact);
        }

        let contact = Contact::new(self.session.user_id, name, phone, notes);
        self.db.insert_contact(&contact)?;
        self.publish()?;
        Ok(contact)
    }

    pub fn update_contact(&self, id: Uuid, patch: ContactPatch) -> Result<Contact, Error> {
        let name = patch
            .name
            .as_deref()
            .map(|n| non_empty("name", "Name is required", n))
            .transpose()?;
        let phone = patch
            .phone
            .as_deref()
            .map(|p| non_empty("phone", "Phone number is required", p))
            .transpose()?;

        let mut contact = self
            .db
            .get_contact(id)?
            .filter(|c| c.owner_id == self.session.user_id)
            .ok_or(Error::NotFound)?;

        if let Some(name) = name {
            contact.name = name;
        }
        if let Some(phone) = phone {
            // Re-check only when the phone actually changes; the stored
            // row no longer matches, so it excludes itself
            if phone != contact.phone {
                if self.db.contact_phone_exists(self.session.user_id, &phone)? {
                    return Err(Error::DuplicateContact);
                }
                contact.phone = phone;
            }
        }
        if let Some(notes) = patch.notes {
            contact.notes = notes;
        }

        contact.updated_at = Utc::now();
        self.db.update_contact(&contact)?;
        self.publish()?;
        Ok(contact)
    }

    /// Unconditional remove. Ownership is enforced by the listing scope
    /// the id came from, not re-checked here.
    pub fn delete_contact(&self, id: Uuid) -> Result<(), Error> {
        if !self.db.delete_contact(id)? {
            return Err(Error::NotFound);
        }
        self.publish()?;
        Ok(())
    }

    /// Re-read the owner's set and publish only if it differs from the
    /// last delivered snapshot. Lets a caller surface writes made
    /// outside this repository.
    pub fn refresh(&self) -> Result<(), Error> {
        self.publish()
    }

    fn load(&self, sort: SortKey) -> Result<Snapshot, Error> {
        Ok(self.db.list_contacts(self.session.user_id, sort)?.into())
    }

    fn publish(&self) -> Result<(), Error> {
        let slot = self.feed_slot();
        if let Some(handle) = slot.as_ref() {
            let snapshot = self.load(handle.sort)?;
            handle.tx.send_if_modified(|current| {
                if current.as_ref() != snapshot.as_ref() {
                    *current = snapshot.clone();
                    true
                } else {
                    false
                }
            });
        }
        Ok(())
    }

    fn feed_slot(&self) -> MutexGuard<'_, Option<FeedHandle>> {
        self.feed.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn non_empty(field: &'static str, message: &str, value: &str) -> Result<String, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, message));
    }
    Ok(trimmed.to_string())
}
