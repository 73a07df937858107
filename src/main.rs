use clap::Parser;
use contactsaver::cli::{
    require_session, run_add, run_delete, run_export, run_list, run_login, run_logout,
    run_profile, run_reset_password, run_search, run_signup, run_update, run_watch, Cli, Commands,
};
use contactsaver::db::Database;
use contactsaver::models::SortKey;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let db = Database::open()?;

    match cli.command {
        None => {
            // No subcommand provided - show the contact list
            let session = require_session(&db)?;
            run_list(&db, session, SortKey::default())?;
        }
        Some(Commands::Signup(args)) => {
            run_signup(&db, &args.email, &args.name)?;
        }
        Some(Commands::Login(args)) => {
            run_login(&db, &args.email)?;
        }
        Some(Commands::Logout) => {
            run_logout(&db)?;
        }
        Some(Commands::ResetPassword(args)) => {
            run_reset_password(&db, args.email.as_deref(), args.token.as_deref())?;
        }
        Some(Commands::Profile(args)) => {
            let session = require_session(&db)?;
            run_profile(&db, &session, args.name.as_deref())?;
        }
        Some(Commands::List(args)) => {
            let session = require_session(&db)?;
            run_list(&db, session, SortKey::parse(&args.sort))?;
        }
        Some(Commands::Add(args)) => {
            let session = require_session(&db)?;
            run_add(&db, session, args.name, args.phone, args.notes)?;
        }
        Some(Commands::Edit(args)) => {
            let session = require_session(&db)?;
            run_update(
                &db,
                session,
                &args.identifier,
                args.name,
                args.phone,
                args.notes,
            )?;
        }
        Some(Commands::Delete(args)) => {
            let session = require_session(&db)?;
            run_delete(&db, session, &args.identifier, args.force)?;
        }
        Some(Commands::Search(args)) => {
            let session = require_session(&db)?;
            run_search(&db, session, &args.query, SortKey::parse(&args.sort))?;
        }
        Some(Commands::Watch(args)) => {
            let session = require_session(&db)?;
            run_watch(&db, session, SortKey::parse(&args.sort))?;
        }
        Some(Commands::Export(args)) => {
            let session = require_session(&db)?;
            run_export(&db, session, args.output.as_deref())?;
        }
    }

    Ok(())
}
