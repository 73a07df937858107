use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod account;
pub mod add;
pub mod delete;
pub mod display;
pub mod export;
pub mod list;
pub mod search;
pub mod ui;
pub mod update;
pub mod watch;

pub use account::{
    require_session, run_login, run_logout, run_profile, run_reset_password, run_signup,
};
pub use add::run_add;
pub use delete::run_delete;
pub use export::run_export;
pub use list::run_list;
pub use search::run_search;
pub use update::run_update;
pub use watch::run_watch;

#[derive(Parser)]
#[command(name = "contactsaver")]
#[command(about = "Contact manager with accounts and live views")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and sign in
    Signup(SignupArgs),
    /// Sign in to an existing account
    Login(LoginArgs),
    /// Sign out of the current session
    Logout,
    /// Request or complete a password reset
    ResetPassword(ResetPasswordArgs),
    /// Show or update the signed-in profile
    Profile(ProfileArgs),
    /// List contacts
    List(ListArgs),
    /// Add a new contact
    Add(AddArgs),
    /// Edit an existing contact
    Edit(EditArgs),
    /// Delete a contact
    Delete(DeleteArgs),
    /// Search contacts by name or phone
    Search(SearchArgs),
    /// Watch the contact list live
    Watch(WatchArgs),
    /// Export contacts to CSV
    Export(ExportArgs),
}

#[derive(Args)]
pub struct SignupArgs {
    #[arg(short, long)]
    pub email: String,
    /// Display name shown on your profile
    #[arg(short, long)]
    pub name: String,
}

#[derive(Args)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub email: String,
}

#[derive(Args)]
pub struct ResetPasswordArgs {
    /// Account email; requests a reset token
    #[arg(short, long)]
    pub email: Option<String>,
    /// Reset token; completes the reset with a new password
    #[arg(short, long)]
    pub token: Option<String>,
}

#[derive(Args)]
pub struct ProfileArgs {
    /// New display name
    #[arg(short, long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Sort order: "name" or "date"
    #[arg(short, long, default_value = "name")]
    pub sort: String,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(short, long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Contact id, id prefix, or name fragment
    pub identifier: String,
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(short, long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Contact id, id prefix, or name fragment
    pub identifier: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search query (name or phone)
    pub query: String,
    /// Sort order: "name" or "date"
    #[arg(short, long, default_value = "name")]
    pub sort: String,
}

#[derive(Args)]
pub struct WatchArgs {
    /// Sort order: "name" or "date"
    #[arg(short, long, default_value = "name")]
    pub sort: String,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Destination file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
