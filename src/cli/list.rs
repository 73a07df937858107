use anyhow::Result;

use crate::cli::display::print_contact_table;
use crate::db::Database;
use crate::models::{Session, SortKey};
use crate::repo::ContactRepository;

/// Execute the list command
pub fn run_list(db: &Database, session: Session, sort: SortKey) -> Result<()> {
    let repo = ContactRepository::open(db, session);
    let feed = repo.subscribe(sort)?;

    print_contact_table(&feed.snapshot());
    Ok(())
}
