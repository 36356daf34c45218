//! Crate-wide error type.
//!
//! Library, config and import code propagate these with `?`. The UI layer
//! never surfaces them as faults: every variant ends up logged and mapped
//! to a status line or a display state.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The same file was already imported for this user
    #[error("already in the journal: {0}")]
    Duplicate(String),

    #[error("comment is empty")]
    EmptyComment,

    #[error("could not determine a data directory")]
    NoDataDir,

    #[error("background task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, JournalError>;
