use crate::record::RecordId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixError {
    #[error("invalid record id: {0:?}")]
    InvalidId(String),

    #[error("record {0} not found in catalog")]
    NotFound(RecordId),

    #[error("validator {name} failed: {reason}")]
    Validator { name: String, reason: String },

    #[error("catalog rejected update for {id}: {reason}")]
    UpdateFailed { id: RecordId, reason: String },

    #[error("backup store error: {0}")]
    Store(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("format error: {0}")]
    Format(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for FixError {
    fn from(e: reqwest::Error) -> Self {
        FixError::Transport(e.to_string())
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, FixError>;
