//! Identity provider errors.

use shopmall_core::EmailError;
use thiserror::Error;

/// Errors from credential operations.
///
/// The `Display` text is what the session slice records, so it is written
/// for end users.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The email could not be parsed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Unknown email or wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Sign-up for an email that already has an account.
    #[error("an account with this email already exists")]
    UserAlreadyExists,

    /// Sign-up password rejected.
    #[error("password too weak: {0}")]
    WeakPassword(String),

    /// The provider could not be reached.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}
