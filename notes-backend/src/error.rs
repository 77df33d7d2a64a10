//! Error types for note storage.
//!
//! Handlers translate these into HTTP responses: `Validation` is the only
//! variant a client can fix, `NotFound` maps to 404, and everything else is
//! reported as a generic internal error.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoteError {
    /// Input rejected by the store's validation rules.
    #[error("{0}")]
    Validation(String),

    /// No note exists under the requested id.
    #[error("note not found")]
    NotFound,

    /// The id is not a well-formed note identifier.
    #[error("malformed note id {0:?}")]
    MalformedId(String),

    /// A database query failed.
    #[error("database query failed: {0}")]
    Storage(#[from] rusqlite::Error),

    /// No pooled connection could be obtained.
    #[error("database pool unavailable: {0}")]
    Pool(#[from] r2d2::Error),

    /// The database directory could not be created.
    #[error("failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),
}

impl NoteError {
    pub fn is_internal(&self) -> bool {
        !matches!(self, NoteError::Validation(_) | NoteError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_classification() {
        assert!(!NoteError::Validation("Title is required".into()).is_internal());
        assert!(!NoteError::NotFound.is_internal());
        assert!(NoteError::MalformedId("abc".into()).is_internal());
        assert!(NoteError::Storage(rusqlite::Error::InvalidQuery).is_internal());
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = NoteError::Validation("Title is required".into());
        assert_eq!(err.to_string(), "Title is required");
    }
}
