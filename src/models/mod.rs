pub mod contact;
pub mod user;

pub use contact::{Contact, ContactDraft, ContactPatch, SortKey};
pub use user::{Session, UserProfile, UserSettings};
