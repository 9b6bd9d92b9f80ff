//! Error types shared across the crate.
//!
//! Backend failures map onto the handful of categories the admin UI can
//! actually tell apart; everything else collapses into `Unexpected`. Nothing
//! is retried automatically — callers surface `user_message` as a transient
//! notification and move on.

use thiserror::Error;

/// Failure categories surfaced from the hosted data/auth service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Sign-in with a wrong email/password pair.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Unique-constraint violation (duplicate slug or invitation code).
    #[error("duplicate value for unique field: {0}")]
    Duplicate(String),

    /// Foreign-key violation (reference to a missing author or category).
    #[error("missing referenced record: {0}")]
    ForeignKey(String),

    /// Lookup of a record that does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Anything the UI cannot distinguish further.
    #[error("unexpected backend error: {0}")]
    Unexpected(String),
}

impl BackendError {
    /// The transient, user-facing notification text for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCredentials => "Invalid email or password.".to_string(),
            Self::Duplicate(field) => {
                format!("That {field} already exists. Try again.")
            }
            Self::ForeignKey(reference) => {
                format!("Referenced {reference} was not found. Contact an administrator.")
            }
            Self::NotFound(what) => format!("{what} was not found."),
            Self::Unexpected(_) => "Something went wrong. Try again later.".to_string(),
        }
    }
}
