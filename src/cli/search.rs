use anyhow::Result;

use crate::cli::display::print_contact_table;
use crate::db::Database;
use crate::models::{Session, SortKey};
use crate::repo::{self, ContactRepository};

/// Execute the search command: a local filter over the listed set,
/// matching name case-insensitively or phone literally.
pub fn run_search(db: &Database, session: Session, query: &str, sort: SortKey) -> Result<()> {
    let repo = ContactRepository::open(db, session);
    let feed = repo.subscribe(sort)?;

    let matches = repo::search(&feed.snapshot(), query);
    if matches.is_empty() {
        println!("No matches for \"{}\".", query);
        return Ok(());
    }

    print_contact_table(&matches);
    Ok(())
}
