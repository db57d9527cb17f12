//! Error types for persistence

use thiserror::Error;

/// Journal error type
#[derive(Error, Debug)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{0} must not be blank")]
    BlankField(&'static str),

    #[error("username already taken: {0}")]
    UserExists(String),

    #[error("wrong username or password")]
    BadCredentials,

    #[error("nobody is logged in")]
    NotLoggedIn,

    #[error("no history record with id {0}")]
    RecordNotFound(String),

    #[error("render error: {0}")]
    Render(String),
}

/// Result type alias
pub type JournalResult<T> = Result<T, JournalError>;
