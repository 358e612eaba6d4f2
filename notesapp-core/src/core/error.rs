//! Error types for the notes core library.

use thiserror::Error;

/// All errors that can occur within the notes core library.
#[derive(Debug, Error)]
pub enum NotesError {
    /// A SQLite operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Offsets violate `start <= end <= len` for the text they refer to.
    ///
    /// Raised before any clipping is applied; this always indicates a caller bug.
    #[error("Invalid span range {start}..{end} for text of length {len}")]
    InvalidSpanRange {
        start: usize,
        end: usize,
        len: usize,
    },

    /// A note ID was requested that does not exist in the database.
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    /// A note could not be saved in its current state.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// The supplied password does not match the note's password hash.
    #[error("Wrong password for this note")]
    WrongPassword,

    /// The opened file is not a notes database.
    #[error("Invalid database: {0}")]
    InvalidDatabase(String),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be (de)serialized as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias that pins the error type to [`NotesError`].
pub type Result<T> = std::result::Result<T, NotesError>;

impl NotesError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(e) => format!("Failed to save: {e}"),
            Self::InvalidSpanRange { .. } => "Formatting could not be applied".to_string(),
            Self::NoteNotFound(_) => "Note no longer exists".to_string(),
            Self::ValidationFailed(msg) => msg.clone(),
            Self::WrongPassword => "Wrong password, please try again".to_string(),
            Self::InvalidDatabase(_) => "Could not open notes database".to_string(),
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
        }
    }

    pub(crate) fn span_range(start: usize, end: usize, len: usize) -> Self {
        Self::InvalidSpanRange { start, end, len }
    }
}
