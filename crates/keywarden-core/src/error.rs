//! Error types for Keywarden panel operations.

use thiserror::Error;

use crate::db::DatabaseError;

/// Result type alias using the Keywarden panel [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Panel error taxonomy.
///
/// The first six variants are expected outcomes and are rendered to the
/// operator as specific ephemeral messages. `Transient` and `Internal`
/// are caught at the dispatcher boundary, audited, and surfaced as a
/// generic failure notice.
#[derive(Debug, Error)]
pub enum Error {
    /// Entity missing for the given key.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique-constraint violation on create or rename.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unparseable date or number from a form field.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Denylist row already exists for the hardware id.
    #[error("Hardware id already banned: {0}")]
    AlreadyBanned(String),

    /// No denylist row exists for the hardware id.
    #[error("Hardware id not banned: {0}")]
    NotBanned(String),

    /// Invoking principal holds none of the required roles.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Store or network failure; not retried automatically.
    #[error("Transient failure: {0}")]
    Transient(String),

    /// Anything unexpected.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error class is an expected outcome, rendered as a
    /// specific user-facing message instead of a generic failure notice.
    pub const fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::Conflict(_)
                | Self::InvalidInput(_)
                | Self::AlreadyBanned(_)
                | Self::NotBanned(_)
                | Self::Unauthorized(_)
        )
    }
}

impl From<DatabaseError> for Error {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::NotFound(what) => Self::NotFound(what),
            DatabaseError::Conflict(what) => Self::Conflict(what),
            other => Self::Transient(other.to_string()),
        }
    }
}
