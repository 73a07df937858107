use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};

use crate::cli::display::print_contact_table;
use crate::db::Database;
use crate::models::{Session, SortKey};
use crate::repo::{ContactRepository, Snapshot};

/// How often the live view re-reads the store to pick up writes made
/// by other processes.
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Execute the watch command: a live contact list that re-renders on
/// every snapshot until Ctrl-C.
pub fn run_watch(db: &Database, session: Session, sort: SortKey) -> Result<()> {
    let repo = ContactRepository::open(db, session);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let mut feed = repo.subscribe(sort)?;
        render(&repo, sort, &feed.snapshot())?;

        let mut poll = tokio::time::interval(POLL_INTERVAL);
        poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                _ = poll.tick() => repo.refresh()?,
                next = feed.changed() => match next {
                    Some(snapshot) => render(&repo, sort, &snapshot)?,
                    None => break,
                },
            }
        }

        anyhow::Ok(())
    })?;

    println!();
    Ok(())
}

fn render(repo: &ContactRepository<'_>, sort: SortKey, snapshot: &Snapshot) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;

    println!(
        "Watching contacts for {} (sorted by {}). Ctrl-C to quit.",
        repo.session().display_name,
        sort.as_str()
    );
    println!();
    print_contact_table(snapshot);

    stdout.flush()?;
    Ok(())
}
