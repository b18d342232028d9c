//! Error types for dsforum.

use thiserror::Error;

/// Common error type for dsforum.
#[derive(Error, Debug)]
pub enum ForumError {
    /// Database error.
    ///
    /// This is a generic database error that wraps statement and row-mapping
    /// failures from sqlx.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for ForumError {
    fn from(e: sqlx::Error) -> Self {
        ForumError::Database(e.to_string())
    }
}

/// Result type alias for dsforum operations.
pub type Result<T> = std::result::Result<T, ForumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = ForumError::Auth("invalid password".to_string());
        assert_eq!(err.to_string(), "authentication error: invalid password");
    }

    #[test]
    fn test_validation_error_display() {
        let err = ForumError::Validation("title too long".to_string());
        assert_eq!(err.to_string(), "validation error: title too long");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = ForumError::NotFound("thread".to_string());
        assert_eq!(err.to_string(), "thread not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ForumError = io_err.into();
        assert!(matches!(err, ForumError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(ForumError::Auth("test".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
