use thiserror::Error;

/// Errors surfaced by the repository and account layers.
///
/// Validation and duplicate errors are resolved locally before any store
/// call; `Store` wraps the underlying database failure and is the one
/// retryable case. No automatic retry happens at this layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("a contact with this phone number already exists")]
    DuplicateContact,

    #[error("contact not found")]
    NotFound,

    #[error("{0}")]
    Auth(AuthCode),

    #[error("contact store unavailable: {0}")]
    Store(#[from] anyhow::Error),
}

impl Error {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Provider-style account error codes, surfaced verbatim to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthCode {
    InvalidCredential,
    EmailAlreadyInUse,
    DisplayNameTaken,
    InvalidEmail,
    WeakPassword,
    TooManyRequests,
    SessionExpired,
    UserNotFound,
    InvalidResetToken,
}

impl AuthCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCredential => "invalid-credential",
            Self::EmailAlreadyInUse => "email-already-in-use",
            Self::DisplayNameTaken => "display-name-taken",
            Self::InvalidEmail => "invalid-email",
            Self::WeakPassword => "weak-password",
            Self::TooManyRequests => "too-many-requests",
            Self::SessionExpired => "session-expired",
            Self::UserNotFound => "user-not-found",
            Self::InvalidResetToken => "invalid-reset-token",
        }
    }

    /// Human-readable message shown next to the code.
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidCredential => "Incorrect email or password",
            Self::EmailAlreadyInUse => "An account with this email already exists",
            Self::DisplayNameTaken => "This name is already taken",
            Self::InvalidEmail => "Please enter a valid email address",
            Self::WeakPassword => "Password must be at least 6 characters",
            Self::TooManyRequests => "Too many failed attempts. Try again later",
            Self::SessionExpired => "Your session has expired. Please log in again",
            Self::UserNotFound => "No account found with this email address",
            Self::InvalidResetToken => "Reset token is invalid or has expired",
        }
    }
}

impl std::fmt::Display for AuthCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message(), self.as_str())
    }
}

impl From<AuthCode> for Error {
    fn from(code: AuthCode) -> Self {
        Self::Auth(code)
    }
}
