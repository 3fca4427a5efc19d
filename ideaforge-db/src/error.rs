use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

/// Server code for a write rejected by the collection's schema validator.
const DOCUMENT_VALIDATION_FAILURE: i32 = 121;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Failures surfaced by an `IdeaRepository`.
///
/// A missing record is not an error: lookups return `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("invalid idea id: `{0}`")]
    InvalidId(String),

    #[error("idea validation failed: {0}")]
    Validation(String),

    #[error("stored idea has no _id")]
    MissingId,

    #[error("database unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(mongodb::error::Error),
}

impl RepositoryError {
    /// True for failures caused by the caller's input rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidId(_) | Self::Validation(_))
    }
}

impl From<mongodb::error::Error> for RepositoryError {
    fn from(err: mongodb::error::Error) -> Self {
        let validation_message = match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write_error))
                if write_error.code == DOCUMENT_VALIDATION_FAILURE =>
            {
                Some(write_error.message.clone())
            }
            ErrorKind::Command(command_error) if command_error.code == DOCUMENT_VALIDATION_FAILURE => {
                Some(command_error.message.clone())
            }
            _ => None,
        };
        match validation_message {
            Some(message) => Self::Validation(message),
            None => Self::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_input_problems() {
        assert!(RepositoryError::InvalidId("x".into()).is_client_error());
        assert!(RepositoryError::Validation("title is required".into()).is_client_error());
        assert!(!RepositoryError::Unavailable("refused".into()).is_client_error());
        assert!(!RepositoryError::MissingId.is_client_error());
    }

    #[test]
    fn messages_carry_the_cause() {
        let err = RepositoryError::Validation("title is required".into());
        assert_eq!(err.to_string(), "idea validation failed: title is required");
        let err = RepositoryError::InvalidId("abc".into());
        assert_eq!(err.to_string(), "invalid idea id: `abc`");
    }
}
