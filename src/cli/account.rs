use anyhow::{anyhow, Result};
use chrono::Local;
use inquire::{Password, PasswordDisplayMode};

use crate::auth;
use crate::cli::ui::minimal_render_config;
use crate::db::Database;
use crate::models::Session;

/// Execute the signup command. The password is prompted, never taken
/// as an argument.
pub fn run_signup(db: &Database, email: &str, name: &str) -> Result<()> {
    let password = Password::new("Password:")
        .with_render_config(minimal_render_config())
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;

    let session = auth::signup(db, email, &password, name)?;
    println!("Welcome, {}! You are now signed in.", session.display_name);
    Ok(())
}

/// Execute the login command
pub fn run_login(db: &Database, email: &str) -> Result<()> {
    let password = Password::new("Password:")
        .with_render_config(minimal_render_config())
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    let session = auth::login(db, email, &password)?;
    println!("Logged in as {} <{}>", session.display_name, session.email);
    Ok(())
}

pub fn run_logout(db: &Database) -> Result<()> {
    auth::logout(db)?;
    println!("Logged out.");
    Ok(())
}

/// Request or confirm a password reset. With only an email, a reset
/// token is minted and shown; with a token, the password is replaced.
pub fn run_reset_password(db: &Database, email: Option<&str>, token: Option<&str>) -> Result<()> {
    match (email, token) {
        (Some(email), None) => {
            let token = auth::request_password_reset(db, email)?;
            println!("Password reset token (valid for 1 hour):");
            println!("  {}", token);
            println!();
            println!("Complete the reset with:");
            println!("  contactsaver reset-password --token {}", token);
            Ok(())
        }
        (_, Some(token)) => {
            let password = Password::new("New password:")
                .with_render_config(minimal_render_config())
                .with_display_mode(PasswordDisplayMode::Masked)
                .prompt()?;

            auth::confirm_password_reset(db, token, &password)?;
            println!("Password updated. Log in with your new password.");
            Ok(())
        }
        (None, None) => Err(anyhow!(
            "Provide --email to request a reset, or --token to complete one."
        )),
    }
}

/// Show the signed-in profile, or update the display name.
pub fn run_profile(db: &Database, session: &Session, new_name: Option<&str>) -> Result<()> {
    if let Some(name) = new_name {
        let updated = auth::update_display_name(db, session, name)?;
        println!("Display name updated to {}", updated.display_name);
        return Ok(());
    }

    let profile = db
        .get_user_by_id(session.user_id)?
        .ok_or_else(|| anyhow!("Profile record missing for the current session"))?;

    println!("Name:       {}", profile.display_name);
    println!("Email:      {}", profile.email);
    println!(
        "Joined:     {}",
        profile
            .created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d")
    );
    println!(
        "Last login: {}",
        profile
            .last_login_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
    );
    println!("Theme:      {}", profile.settings.theme);
    Ok(())
}

/// Resolve the saved session or tell the user how to sign in.
pub fn require_session(db: &Database) -> Result<Session> {
    match auth::current_session(db) {
        Ok(Some(session)) => Ok(session),
        Ok(None) => Err(anyhow!(
            "Not signed in. Run `contactsaver login -e you@example.com` first."
        )),
        Err(e) => Err(e.into()),
    }
}
