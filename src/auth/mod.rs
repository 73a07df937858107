//! Account operations: signup, login, sessions, password reset,
//! profile updates. All failures carry provider-style codes the
//! presentation layer shows verbatim.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AuthCode, Error};
use crate::models::{Session, UserProfile, UserSettings};

pub mod credentials;

/// app_settings key holding the active raw session token.
const SESSION_TOKEN_KEY: &str = "session_token";

const SESSION_TTL_DAYS: i64 = 30;
const RESET_TTL_HOURS: i64 = 1;

/// Consecutive failed logins tolerated inside the throttle window.
const MAX_FAILED_LOGINS: u32 = 5;
const THROTTLE_WINDOW_MINUTES: i64 = 15;

const MIN_PASSWORD_LEN: usize = 6;

pub fn signup(
    db: &Database,
    email: &str,
    password: &str,
    display_name: &str,
) -> Result<Session, Error> {
    let email = normalize_email(email);
    let display_name = display_name.trim();

    if display_name.is_empty() {
        return Err(Error::validation("name", "Name is required"));
    }
    if !is_valid_email(&email) {
        return Err(AuthCode::InvalidEmail.into());
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AuthCode::WeakPassword.into());
    }

    // Uniqueness pre-checks, read-then-write like the contact phone check
    if db.user_email_exists(&email)? {
        return Err(AuthCode::EmailAlreadyInUse.into());
    }
    if db.display_name_exists(display_name)? {
        return Err(AuthCode::DisplayNameTaken.into());
    }

    let now = Utc::now();
    let profile = UserProfile {
        id: Uuid::new_v4(),
        display_name: display_name.to_string(),
        email,
        created_at: now,
        last_login_at: now,
        settings: UserSettings::default(),
    };

    let salt = credentials::generate_salt();
    let hash = credentials::hash_password(&salt, password);
    db.insert_user(&profile, &salt, &hash)?;

    open_session(db, &profile)
}

pub fn login(db: &Database, email: &str, password: &str) -> Result<Session, Error> {
    let email = normalize_email(email);

    // Unknown email and wrong password fail identically
    let creds = match db.get_user_credentials(&email)? {
        Some(c) => c,
        None => return Err(AuthCode::InvalidCredential.into()),
    };

    let now = Utc::now();
    let window = Duration::minutes(THROTTLE_WINDOW_MINUTES);
    match creds.last_failed_at {
        Some(at) if now - at < window => {
            if creds.failed_logins >= MAX_FAILED_LOGINS {
                return Err(AuthCode::TooManyRequests.into());
            }
        }
        Some(_) => db.clear_failed_logins(creds.user_id)?,
        None => {}
    }

    if !credentials::verify_password(&creds.password_salt, &creds.password_hash, password) {
        db.record_failed_login(creds.user_id, now)?;
        return Err(AuthCode::InvalidCredential.into());
    }

    db.clear_failed_logins(creds.user_id)?;
    db.touch_last_login(creds.user_id, now)?;

    let profile = db
        .get_user_by_id(creds.user_id)?
        .ok_or(AuthCode::InvalidCredential)?;
    open_session(db, &profile)
}

/// Close the active session, if any. Safe to call repeatedly.
pub fn logout(db: &Database) -> Result<(), Error> {
    if let Some(token) = db.get_setting(SESSION_TOKEN_KEY)? {
        db.delete_session(&credentials::hash_token(&token))?;
        db.delete_setting(SESSION_TOKEN_KEY)?;
    }
    Ok(())
}

/// Resolve the saved session token to an identity. Returns Ok(None)
/// when signed out; an expired session is an error so the caller can
/// tell the user to log in again.
pub fn current_session(db: &Database) -> Result<Option<Session>, Error> {
    let token = match db.get_setting(SESSION_TOKEN_KEY)? {
        Some(t) => t,
        None => return Ok(None),
    };

    let token_hash = credentials::hash_token(&token);
    let (user_id, expires_at) = match db.get_session(&token_hash)? {
        Some(s) => s,
        None => {
            // Stale client-side token with no matching session row
            db.delete_setting(SESSION_TOKEN_KEY)?;
            return Ok(None);
        }
    };

    if expires_at < Utc::now() {
        db.delete_session(&token_hash)?;
        db.delete_setting(SESSION_TOKEN_KEY)?;
        return Err(AuthCode::SessionExpired.into());
    }

    let profile = match db.get_user_by_id(user_id)? {
        Some(p) => p,
        None => {
            db.delete_session(&token_hash)?;
            db.delete_setting(SESSION_TOKEN_KEY)?;
            return Ok(None);
        }
    };

    Ok(Some(Session::from(&profile)))
}

/// Begin a password reset: mint a single-use token the user presents
/// back through the confirm step. Delivery (the original mails it) is
/// the caller's concern.
pub fn request_password_reset(db: &Database, email: &str) -> Result<String, Error> {
    let email = normalize_email(email);

    let creds = db
        .get_user_credentials(&email)?
        .ok_or(AuthCode::UserNotFound)?;

    let now = Utc::now();
    let (token, token_hash) = credentials::generate_token();
    db.insert_password_reset(
        &token_hash,
        creds.user_id,
        now,
        now + Duration::hours(RESET_TTL_HOURS),
    )?;

    Ok(token)
}

/// Complete a password reset. Consumes the token, replaces the
/// credential, and closes every open session for the user.
pub fn confirm_password_reset(db: &Database, token: &str, new_password: &str) -> Result<(), Error> {
    if new_password.len() < MIN_PASSWORD_LEN {
        return Err(AuthCode::WeakPassword.into());
    }

    let now = Utc::now();
    let user_id = db
        .consume_password_reset(&credentials::hash_token(token), now)?
        .ok_or(AuthCode::InvalidResetToken)?;

    let salt = credentials::generate_salt();
    let hash = credentials::hash_password(&salt, new_password);
    db.set_password(user_id, &salt, &hash)?;
    db.delete_sessions_for_user(user_id)?;
    db.clear_failed_logins(user_id)?;

    Ok(())
}

/// Update the one mutable profile field.
pub fn update_display_name(
    db: &Database,
    session: &Session,
    display_name: &str,
) -> Result<Session, Error> {
    let display_name = display_name.trim();
    if display_name.is_empty() {
        return Err(Error::validation("name", "Name is required"));
    }
    if display_name == session.display_name {
        return Ok(session.clone());
    }
    if db.display_name_exists(display_name)? {
        return Err(AuthCode::DisplayNameTaken.into());
    }

    db.update_display_name(session.user_id, display_name)?;

    Ok(Session {
        user_id: session.user_id,
        display_name: display_name.to_string(),
        email: session.email.clone(),
    })
}

fn open_session(db: &Database, profile: &UserProfile) -> Result<Session, Error> {
    let now = Utc::now();
    let (token, token_hash) = credentials::generate_token();
    db.insert_session(
        &token_hash,
        profile.id,
        now,
        now + Duration::days(SESSION_TTL_DAYS),
    )?;
    db.set_setting(SESSION_TOKEN_KEY, &token)?;

    Ok(Session::from(profile))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }
    let (local, domain) = (parts[0], parts[1]);
    !local.is_empty() && !domain.is_empty() && domain.contains('.')
}
